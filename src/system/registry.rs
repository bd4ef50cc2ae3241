use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{component::Component, error::Error};

/// Lookup of live components by identifier.
///
/// The registry owns the id-to-component mapping but not the components
/// themselves; entries normally live for the whole process. All access must
/// happen on the event-loop thread; the `RefCell` inside makes the type
/// `!Sync`, so the compiler enforces that.
#[derive(Debug, Default)]
pub struct Registry {
    components: RefCell<HashMap<String, Rc<dyn Component>>>,
}

impl Registry {
    /// Adds a component under its own id. Registering an id twice is a
    /// wiring bug and fails without touching the first registration.
    pub fn register(&self, component: Rc<dyn Component>) -> Result<(), Error> {
        let id = component.id().to_string();
        let mut components = self.components.borrow_mut();
        if components.contains_key(&id) {
            return Err(Error::DuplicateIdentifier(id));
        }
        tracing::debug!("Registered component \"{id}\"");
        components.insert(id, component);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Rc<dyn Component>, Error> {
        self.components
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownIdentifier(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.components.borrow().contains_key(id)
    }

    /// Drops a component from the mapping. Process-lifetime components never
    /// need this; windows that are torn down and rebuilt use it so their ids
    /// can be registered again.
    pub fn unregister(&self, id: &str) -> Result<(), Error> {
        self.components
            .borrow_mut()
            .remove(id)
            .map(|_| tracing::debug!("Unregistered component \"{id}\""))
            .ok_or_else(|| Error::UnknownIdentifier(id.to_string()))
    }
}
