use std::fmt::Debug;

/// A named participant in the signal system, usually wrapping a widget owned
/// by the GUI layer. Implementations register with the core under their `id`
/// once their construction-critical state is in place.
pub trait Component: Debug {
    /// Stable identifier, unique within a running core.
    fn id(&self) -> &str;

    /// Enables or disables the component's interactive surface.
    fn set_sensitive(&self, _sensitive: bool) {}

    /// Marks the component as the currently-active screen or step.
    fn set_active(&self, _active: bool) {}
}
