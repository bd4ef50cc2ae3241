#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("component \"{0}\" is already registered")]
    DuplicateIdentifier(String),

    #[error("component \"{0}\" is not registered")]
    UnknownIdentifier(String),

    #[error("signal names may not be empty")]
    EmptySignalName,

    #[error("wizard step out of range")]
    WizardOutOfRange,
}
