use std::{
    path::PathBuf,
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc,
    },
};

use crate::{
    library::{BenchmarkHandle, ContentLibrary},
    system::runner::TaskRunner,
};

const SEND_ERR_MSG: &str = "Error occurred while delivering a library response.";

/// Completion notice posted by a background library call. Drained on the
/// event-loop thread via [`DataHandler::poll`]; the drainer decides which
/// signals to fire in response.
#[derive(Debug, Clone, strum_macros::Display)]
pub enum LibraryEvent {
    BenchmarkLoaded(BenchmarkHandle),
    ValidationFinished(bool),
    ExportFinished(PathBuf),
    LibraryErrorOccurred(String),
}

/// Runs long library operations off the event-loop thread.
///
/// Each request goes through the task runner under a stable key, so repeated
/// requests for the same operation serialize instead of overlapping. Worker
/// threads never touch the registry or router; they only post a
/// [`LibraryEvent`] back through the channel.
#[derive(Debug)]
pub struct DataHandler {
    library: Arc<dyn ContentLibrary>,
    runner: TaskRunner,

    response_send: Sender<LibraryEvent>,
    response_recv: Receiver<LibraryEvent>,
}

impl DataHandler {
    pub fn new(library: Arc<dyn ContentLibrary>, runner: TaskRunner) -> Self {
        let (response_send, response_recv) = mpsc::channel::<LibraryEvent>();
        Self {
            library,
            runner,
            response_send,
            response_recv,
        }
    }

    pub fn load_benchmark(&self, path: PathBuf) {
        let library = self.library.clone();
        let sender = self.response_send.clone();

        self.runner.run_async("benchmark-load", move || {
            let response = library.load_benchmark(&path).map_or_else(
                |err| LibraryEvent::LibraryErrorOccurred(err.to_string()),
                LibraryEvent::BenchmarkLoaded,
            );

            sender.send(response).expect(SEND_ERR_MSG);
        });
    }

    pub fn validate(&self, handle: BenchmarkHandle) {
        let library = self.library.clone();
        let sender = self.response_send.clone();

        self.runner.run_async("benchmark-validate", move || {
            let response = library.validate(handle).map_or_else(
                |err| LibraryEvent::LibraryErrorOccurred(err.to_string()),
                LibraryEvent::ValidationFinished,
            );

            sender.send(response).expect(SEND_ERR_MSG);
        });
    }

    pub fn export(&self, handle: BenchmarkHandle, path: PathBuf) {
        let library = self.library.clone();
        let sender = self.response_send.clone();

        self.runner.run_async("benchmark-export", move || {
            let response = library.export(handle, &path).map_or_else(
                |err| LibraryEvent::LibraryErrorOccurred(err.to_string()),
                |()| LibraryEvent::ExportFinished(path),
            );

            sender.send(response).expect(SEND_ERR_MSG);
        });
    }

    /// Drains completed background operations. Called from the event-loop
    /// thread, typically once per loop iteration.
    pub fn poll(&self) -> Vec<LibraryEvent> {
        let mut out = vec![];
        while let Ok(event) = self.response_recv.try_recv() {
            out.push(event);
        }
        out
    }
}
