//! Background requests against the notes server.
//!
//! Each request runs on its own thread so a slow delete never holds up a
//! like. The UI thread drains completions on each tick, so every outcome is
//! applied to the controller on the UI thread.

use log::{debug, error};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

use notekeep_core::backend::{ListingSource, NotesBackend};
use notekeep_core::models::Id;
use notekeep_core::page::PageData;
use notekeep_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Delete(Id),
    Like(Id),
    /// Load another page of the listing
    Listing(u64),
}

#[derive(Debug)]
pub enum Completion {
    Delete(Id, Result<()>),
    Like(Id, Result<()>),
    Listing(u64, Result<PageData>),
}

impl Completion {
    /// The completion a request resolves to when it never reached the server.
    pub fn failed(request: Request, err: Error) -> Self {
        match request {
            Request::Delete(id) => Completion::Delete(id, Err(err)),
            Request::Like(id) => Completion::Like(id, Err(err)),
            Request::Listing(page) => Completion::Listing(page, Err(err)),
        }
    }
}

/// Handle for dispatching requests and collecting their completions
pub struct RequestWorker {
    backend: Arc<dyn NotesBackend>,
    listing: Option<Arc<dyn ListingSource>>,
    completion_sender: Sender<Completion>,
    completion_receiver: Receiver<Completion>,
}

impl RequestWorker {
    pub fn new(backend: Arc<dyn NotesBackend>, listing: Option<Arc<dyn ListingSource>>) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel::<Completion>();
        Self {
            backend,
            listing,
            completion_sender: completion_tx,
            completion_receiver: completion_rx,
        }
    }

    /// Whether listing pages can be requested at all
    pub fn can_fetch_listing(&self) -> bool {
        self.listing.is_some()
    }

    /// Start `request` on a thread of its own. Requests are never merged or
    /// retried; an error means the request was not started.
    pub fn submit(&self, request: Request) -> Result<()> {
        let backend = Arc::clone(&self.backend);
        let listing = self.listing.clone();
        let sender = self.completion_sender.clone();

        thread::Builder::new()
            .name("notekeep-request".into())
            .spawn(move || {
                debug!("Sending {:?}", request);
                let completion = run_request(backend.as_ref(), listing.as_deref(), request);
                // the receiver is gone once the app has shut down
                let _ = sender.send(completion);
            })
            .map(|_| ())
            .map_err(|err| {
                error!("Could not start request thread: {}", err);
                Error::Transport(format!("could not start request: {}", err))
            })
    }

    pub fn try_recv(&self) -> Option<Completion> {
        match self.completion_receiver.try_recv() {
            Ok(completion) => Some(completion),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }
}

fn run_request(backend: &dyn NotesBackend, listing: Option<&dyn ListingSource>, request: Request) -> Completion {
    match request {
        Request::Delete(id) => {
            let outcome = guarded(|| backend.delete_note(&id));
            Completion::Delete(id, outcome)
        }
        Request::Like(id) => {
            let outcome = guarded(|| backend.like_note(&id));
            Completion::Like(id, outcome)
        }
        Request::Listing(page) => {
            let outcome = match listing {
                Some(listing) => guarded(|| listing.fetch_listing(page)),
                None => Err(Error::InvalidInput("no server listing to page through".to_string())),
            };
            Completion::Listing(page, outcome)
        }
    }
}

/// A panicking backend still produces a completion, so nothing stays in flight.
fn guarded<T>(call: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(call))
        .unwrap_or_else(|_| Err(Error::Transport("request panicked".to_string())))
}
