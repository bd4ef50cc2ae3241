use std::{
    cell::{Cell, RefCell},
    path::Path,
    rc::Rc,
    sync::Arc,
};

use anyhow::{Context, Result};

use crate::{
    component::Component,
    config::Config,
    error::Error,
    handler::DataHandler,
    library::{BenchmarkHandle, BenchmarkInfo, ContentLibrary, ProfileInfo},
    system::{
        registry::Registry,
        router::{Router, SignalCallback},
        runner::{TaskKey, TaskRunner},
    },
};

/// Well-known component ids wired during main-window construction.
pub mod ids {
    pub const OPEN_BENCHMARK: &str = "main:open-benchmark";
    pub const TAILORING: &str = "main:tailoring";
    pub const REFINES: &str = "tailoring:refines";
    pub const SCAN: &str = "main:scan";
    pub const BACK: &str = "main:back";
    pub const FORWARD: &str = "main:forward";
}

/// Signal names the core itself listens for.
pub mod signals {
    pub const LOAD: &str = "load";
}

#[derive(Debug, Clone)]
pub struct Selection {
    pub profile: Option<String>,
    pub item: Option<String>,
    pub lang: String,
}

/// The shared context every component gets a handle to.
///
/// Bundles the registry, router, and runner with the loaded benchmark and
/// the user's current selection, so call sites can stay decoupled from each
/// other and still reach all of the plumbing. Constructed once by the entry
/// point and passed to component constructors; tests build as many
/// independent cores as they like.
#[derive(Debug)]
pub struct Core {
    registry: Registry,
    router: Rc<Router>,
    runner: TaskRunner,
    handler: DataHandler,
    library: Arc<dyn ContentLibrary>,
    config: Config,

    benchmark: Cell<Option<BenchmarkHandle>>,
    selection: RefCell<Selection>,
    force_reload_items: Rc<Cell<bool>>,
    force_reload_profiles: Rc<Cell<bool>>,
}

impl Core {
    pub fn new(library: Arc<dyn ContentLibrary>, config: Config) -> Self {
        let router = Rc::new(Router::default());
        let runner = TaskRunner::default();
        let handler = DataHandler::new(library.clone(), runner.clone());
        let force_reload_items = Rc::new(Cell::new(false));
        let force_reload_profiles = Rc::new(Cell::new(false));

        // A freshly-opened benchmark invalidates everything derived from
        // the previous one.
        let items = force_reload_items.clone();
        let profiles = force_reload_profiles.clone();
        router.subscribe(
            ids::OPEN_BENCHMARK,
            signals::LOAD,
            Rc::new(move || {
                items.set(true);
                profiles.set(true);
            }),
        );

        let selection = Selection {
            profile: None,
            item: None,
            lang: config.lang.clone(),
        };

        Self {
            registry: Registry::default(),
            router,
            runner,
            handler,
            library,
            config,
            benchmark: Cell::new(None),
            selection: RefCell::new(selection),
            force_reload_items,
            force_reload_profiles,
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn handler(&self) -> &DataHandler {
        &self.handler
    }

    pub fn register(&self, component: Rc<dyn Component>) -> Result<(), Error> {
        self.registry.register(component)
    }

    pub fn get(&self, id: &str) -> Result<Rc<dyn Component>, Error> {
        self.registry.get(id)
    }

    pub fn unregister(&self, id: &str) -> Result<(), Error> {
        self.registry.unregister(id)
    }

    pub fn declare_sender(&self, id: &str, signal: &str) -> Result<(), Error> {
        self.router.declare_sender(id, signal)
    }

    /// Subscribes `callback` to `(sender_id, signal)`. Wiring often runs
    /// ahead of registration during window construction, so an unknown
    /// sender id is only worth a log line, not a failure.
    pub fn subscribe(&self, sender_id: &str, signal: &str, callback: SignalCallback) {
        if !self.registry.contains(sender_id) {
            tracing::debug!("Receiver added for unregistered sender \"{sender_id}\"");
        }
        self.router.subscribe(sender_id, signal, callback);
    }

    pub fn subscribe_at(
        &self,
        sender_id: &str,
        signal: &str,
        position: usize,
        callback: SignalCallback,
    ) {
        if !self.registry.contains(sender_id) {
            tracing::debug!("Receiver added for unregistered sender \"{sender_id}\"");
        }
        self.router.subscribe_at(sender_id, signal, position, callback);
    }

    pub fn emit(&self, sender_id: &str, signal: &str) {
        self.router.emit(sender_id, signal);
    }

    pub fn run_async<F>(&self, key: impl Into<TaskKey>, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.runner.run_async(key, task);
    }

    /// Loads a benchmark document, returning the previously-loaded one to
    /// the library first. Short call; background loads go through
    /// [`Self::handler`].
    pub fn load_benchmark(&self, path: &Path) -> Result<BenchmarkInfo> {
        if let Some(old) = self.benchmark.take() {
            self.library.free(old);
        }

        let handle = self.library.load_benchmark(path)?;
        self.benchmark.set(Some(handle));

        let info = self
            .library
            .benchmark_info(handle, &self.selection.borrow().lang)?;
        tracing::info!("Loaded benchmark \"{}\" ({})", info.title, info.version);
        Ok(info)
    }

    pub fn benchmark(&self) -> Option<BenchmarkHandle> {
        self.benchmark.get()
    }

    pub fn benchmark_info(&self) -> Result<BenchmarkInfo> {
        let handle = self.benchmark.get().context("no benchmark loaded")?;
        self.library
            .benchmark_info(handle, &self.selection.borrow().lang)
    }

    pub fn profiles(&self) -> Result<Vec<ProfileInfo>> {
        let handle = self.benchmark.get().context("no benchmark loaded")?;
        self.library.profiles(handle, &self.selection.borrow().lang)
    }

    pub fn resolve(&self) -> Result<()> {
        let handle = self.benchmark.get().context("no benchmark loaded")?;
        self.library.resolve(handle)
    }

    pub fn selected_profile(&self) -> Option<String> {
        self.selection.borrow().profile.clone()
    }

    pub fn select_profile(&self, profile: Option<String>) {
        self.selection.borrow_mut().profile = profile;
    }

    pub fn selected_item(&self) -> Option<String> {
        self.selection.borrow().item.clone()
    }

    pub fn select_item(&self, item: Option<String>) {
        self.selection.borrow_mut().item = item;
    }

    pub fn lang(&self) -> String {
        self.selection.borrow().lang.clone()
    }

    pub fn set_lang(&self, lang: &str) {
        lang.clone_into(&mut self.selection.borrow_mut().lang);
    }

    /// True once per "load" emission from the open-benchmark button; reading
    /// the flag clears it.
    pub fn take_force_reload_items(&self) -> bool {
        self.force_reload_items.replace(false)
    }

    /// See [`Self::take_force_reload_items`].
    pub fn take_force_reload_profiles(&self) -> bool {
        self.force_reload_profiles.replace(false)
    }
}

impl Drop for Core {
    fn drop(&mut self) {
        if let Some(handle) = self.benchmark.take() {
            self.library.free(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{mock_library::MockLibrary, TestComponent};
    use std::path::PathBuf;

    fn core_with_sample_library() -> (Arc<MockLibrary>, Core) {
        let library = Arc::new(MockLibrary::with_sample_benchmark());
        let core = Core::new(library.clone(), Config::default());
        (library, core)
    }

    #[test]
    fn reloading_frees_the_previous_handle() {
        let (library, core) = core_with_sample_library();

        core.load_benchmark(&PathBuf::from("benchmarks/first.xml"))
            .expect("first load should succeed");
        let first = core.benchmark().expect("a benchmark should be loaded");

        core.load_benchmark(&PathBuf::from("benchmarks/second.xml"))
            .expect("second load should succeed");

        assert!(library.freed_handles().contains(&first));
        assert_ne!(core.benchmark(), Some(first));
    }

    #[test]
    fn dropping_the_core_frees_the_loaded_handle() {
        let (library, core) = core_with_sample_library();

        core.load_benchmark(&PathBuf::from("benchmarks/first.xml"))
            .expect("load should succeed");
        let handle = core.benchmark().expect("a benchmark should be loaded");

        drop(core);

        assert!(library.freed_handles().contains(&handle));
    }

    #[test]
    fn opening_a_benchmark_forces_reloads() {
        let (_, core) = core_with_sample_library();
        core.register(Rc::new(TestComponent::new(ids::OPEN_BENCHMARK)))
            .expect("registration should succeed");
        core.declare_sender(ids::OPEN_BENCHMARK, signals::LOAD)
            .expect("declaration should succeed");

        assert!(!core.take_force_reload_items());

        core.emit(ids::OPEN_BENCHMARK, signals::LOAD);

        assert!(core.take_force_reload_items());
        assert!(core.take_force_reload_profiles());

        // reading the flags cleared them
        assert!(!core.take_force_reload_items());
        assert!(!core.take_force_reload_profiles());
    }

    #[test]
    fn subscribing_before_registration_still_dispatches() {
        let (_, core) = core_with_sample_library();
        let fired = Rc::new(Cell::new(false));

        let flag = fired.clone();
        core.subscribe(ids::SCAN, "scan-finished", Rc::new(move || flag.set(true)));
        core.register(Rc::new(TestComponent::new(ids::SCAN)))
            .expect("registration should succeed");

        core.emit(ids::SCAN, "scan-finished");

        assert!(fired.get());
    }

    #[test]
    fn profile_selection_round_trips() {
        let (_, core) = core_with_sample_library();

        assert_eq!(core.selected_profile(), None);
        core.select_profile(Some("xccdf_org.example_profile_baseline".to_string()));
        assert_eq!(
            core.selected_profile(),
            Some("xccdf_org.example_profile_baseline".to_string())
        );

        core.select_item(Some("xccdf_org.example_rule_password-length".to_string()));
        assert_eq!(
            core.selected_item(),
            Some("xccdf_org.example_rule_password-length".to_string())
        );
    }

    #[test]
    fn lang_defaults_from_config() {
        let library = Arc::new(MockLibrary::with_sample_benchmark());
        let config = Config {
            lang: "fr".to_string(),
            ..Default::default()
        };
        let core = Core::new(library, config);

        assert_eq!(core.lang(), "fr");
        core.set_lang("de");
        assert_eq!(core.lang(), "de");
    }

    #[test]
    fn benchmark_queries_without_a_loaded_benchmark_fail() {
        let (_, core) = core_with_sample_library();

        assert!(core.profiles().is_err());
        assert!(core.benchmark_info().is_err());
        assert!(core.resolve().is_err());
    }

    #[test]
    fn profiles_come_from_the_library() {
        let (_, core) = core_with_sample_library();
        core.load_benchmark(&PathBuf::from("benchmarks/first.xml"))
            .expect("load should succeed");

        let profiles = core.profiles().expect("profiles should be available");

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].id, "xccdf_org.example_profile_baseline");
    }
}
