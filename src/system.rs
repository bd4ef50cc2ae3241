/// The registry is the process-wide mapping from stable string identifiers
/// to live components. Anything that needs to poke another component (the
/// wizard toggling a screen, a callback forcing a refresh) looks it up here
/// by id rather than holding a direct reference.
pub mod registry;

/// The router decouples signal emitters from their listeners. Components
/// declare the signals they emit, other components subscribe callbacks
/// against a (sender id, signal name) pair, and an emission fans out to
/// every subscribed callback synchronously, in registration order.
pub mod router;

/// The runner moves long, blocking library calls (imports, validation,
/// exports) off the event-loop thread so the UI stays responsive, while
/// making sure two requests for the same kind of work never overlap.
pub mod runner;
