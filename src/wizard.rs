use crate::{
    core::{ids, Core},
    error::Error,
};

/// Steps the main window through its fixed sequence of screens.
///
/// Each step deactivates the current page component, activates the next, and
/// keeps the back/forward buttons' sensitivity in sync with the ends of the
/// sequence. Pages are addressed by registry id, so the wizard works against
/// whatever the entry point registered under those ids.
#[derive(Debug)]
pub struct Wizard {
    pages: Vec<String>,
    active: usize,
}

impl Wizard {
    pub const fn new(pages: Vec<String>) -> Self {
        Self { pages, active: 0 }
    }

    pub fn from_core(core: &Core) -> Self {
        Self::new(core.config().wizard_pages.clone())
    }

    pub fn active_page(&self) -> Option<&str> {
        self.pages.get(self.active).map(String::as_str)
    }

    pub fn forward(&mut self, core: &Core) -> Result<(), Error> {
        if self.active + 1 >= self.pages.len() {
            return Err(Error::WizardOutOfRange);
        }

        core.get(&self.pages[self.active])?.set_active(false);
        core.get(ids::BACK)?.set_sensitive(true);

        self.active += 1;
        if self.active + 1 == self.pages.len() {
            core.get(ids::FORWARD)?.set_sensitive(false);
        }
        core.get(&self.pages[self.active])?.set_active(true);
        Ok(())
    }

    pub fn back(&mut self, core: &Core) -> Result<(), Error> {
        if self.active == 0 {
            return Err(Error::WizardOutOfRange);
        }

        core.get(&self.pages[self.active])?.set_active(false);
        core.get(ids::FORWARD)?.set_sensitive(true);

        self.active -= 1;
        if self.active == 0 {
            core.get(ids::BACK)?.set_sensitive(false);
        }
        core.get(&self.pages[self.active])?.set_active(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, testing::mock_library::MockLibrary, testing::TestComponent};
    use std::{rc::Rc, sync::Arc};

    struct Fixture {
        core: Core,
        pages: Vec<Rc<TestComponent>>,
        back: Rc<TestComponent>,
        forward: Rc<TestComponent>,
    }

    fn fixture() -> Fixture {
        let core = Core::new(
            Arc::new(MockLibrary::with_sample_benchmark()),
            Config::default(),
        );

        let pages: Vec<Rc<TestComponent>> = Config::default()
            .wizard_pages
            .iter()
            .map(|id| Rc::new(TestComponent::new(id)))
            .collect();
        let back = Rc::new(TestComponent::new(ids::BACK));
        let forward = Rc::new(TestComponent::new(ids::FORWARD));

        for component in pages.iter().chain([&back, &forward]) {
            core.register(component.clone())
                .expect("registration should succeed");
        }

        Fixture {
            core,
            pages,
            back,
            forward,
        }
    }

    #[test]
    fn forward_activates_the_next_page() {
        let fixture = fixture();
        let mut wizard = Wizard::from_core(&fixture.core);

        wizard.forward(&fixture.core).expect("step should succeed");

        assert!(!fixture.pages[0].active.get());
        assert!(fixture.pages[1].active.get());
        assert_eq!(wizard.active_page(), Some(ids::TAILORING));
        assert!(fixture.back.sensitive.get());
    }

    #[test]
    fn reaching_the_last_page_disables_forward() {
        let fixture = fixture();
        let mut wizard = Wizard::from_core(&fixture.core);

        for _ in 1..fixture.pages.len() {
            wizard.forward(&fixture.core).expect("step should succeed");
        }

        assert!(fixture.pages.last().expect("pages should exist").active.get());
        assert!(!fixture.forward.sensitive.get());
        assert_eq!(
            wizard.forward(&fixture.core),
            Err(Error::WizardOutOfRange)
        );
    }

    #[test]
    fn back_retraces_and_disables_at_the_start() {
        let fixture = fixture();
        let mut wizard = Wizard::from_core(&fixture.core);

        wizard.forward(&fixture.core).expect("step should succeed");
        wizard.back(&fixture.core).expect("step should succeed");

        assert!(fixture.pages[0].active.get());
        assert!(!fixture.pages[1].active.get());
        assert!(!fixture.back.sensitive.get());
        assert!(fixture.forward.sensitive.get());
        assert_eq!(wizard.back(&fixture.core), Err(Error::WizardOutOfRange));
    }

    #[test]
    fn stepping_with_unregistered_pages_fails() {
        let core = Core::new(
            Arc::new(MockLibrary::with_sample_benchmark()),
            Config::default(),
        );
        let mut wizard = Wizard::from_core(&core);

        assert!(wizard.forward(&core).is_err());
    }
}
