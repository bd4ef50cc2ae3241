use std::{
    cell::Cell,
    time::{Duration, Instant},
};

use crate::component::Component;

pub mod mock_library;

/// A minimal component that records what the registry, router callbacks,
/// and wizard do to it.
#[derive(Debug)]
pub struct TestComponent {
    id: String,
    pub active: Cell<bool>,
    pub sensitive: Cell<bool>,
}

impl TestComponent {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            active: Cell::new(false),
            sensitive: Cell::new(true),
        }
    }
}

impl Component for TestComponent {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_sensitive(&self, sensitive: bool) {
        self.sensitive.set(sensitive);
    }

    fn set_active(&self, active: bool) {
        self.active.set(active);
    }
}

/// Polls `probe` every few milliseconds until it returns `Some` or `timeout`
/// elapses. For asserting on work that finishes on a background thread.
pub fn wait_for<T>(timeout: Duration, mut probe: impl FnMut() -> Option<T>) -> Option<T> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(value) = probe() {
            return Some(value);
        }
        if Instant::now() >= deadline {
            return None;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}
