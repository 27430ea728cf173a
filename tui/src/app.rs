use anyhow::Result;
use log::{error, info};
use notekeep_core::{
    backend::{HttpBackend, ListingSource, NotesBackend},
    models::{Category, Id, Note},
    notification::{Notification, NotificationKind, NotificationSink},
    page::{load_page_data, DirectoryPage, PageData},
    NoteListController,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::worker::{Completion, Request, RequestWorker};

/// A notification and the moment it went on screen
#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

/// On-screen notifications, each dropped once its ttl has passed
#[derive(Debug, Default)]
pub struct Toasts {
    entries: Vec<Toast>,
}

impl Toasts {
    pub fn prune(&mut self, now: Instant) {
        self.entries
            .retain(|t| !t.notification.is_expired(now.saturating_duration_since(t.shown_at)));
    }

    pub fn visible(&self) -> &[Toast] {
        &self.entries
    }
}

impl NotificationSink for Toasts {
    fn show(&mut self, notification: Notification) {
        self.entries.push(Toast {
            notification,
            shown_at: Instant::now(),
        });
    }
}

/// Application state
pub struct App {
    pub should_quit: bool,
    pub controller: NoteListController,
    pub config: Config,
    pub selected_index: usize,
    pub search_open: bool,
    pub help_open: bool,
    pub toasts: Toasts,
    /// Id of the delete request awaiting its response
    pub delete_in_flight: Option<Id>,
    /// Listing page being fetched
    pub page_in_flight: Option<u64>,
    base_url: String,
    worker: RequestWorker,
}

impl App {
    /// Build the app against the configured server. The list comes from the
    /// data directory when one is configured, otherwise from the server's
    /// JSON listing; either way a failure leaves the list empty. Paging is
    /// only available for the server listing.
    pub fn new(config: Config) -> Result<Self> {
        let backend = Arc::new(
            HttpBackend::new(&config.server.base_url, Duration::from_secs(config.server.timeout_secs))
                .with_session_cookie(config.server.session_cookie.clone()),
        );

        let (data, listing) = match &config.data.dir {
            Some(dir) => (load_page_data(&DirectoryPage::new(dir)), None),
            None => {
                let data = backend.fetch_listing(1).unwrap_or_else(|err| {
                    error!("Failed to fetch notes from {}: {}", backend.base_url(), err);
                    PageData::default()
                });
                (data, Some(backend.clone() as Arc<dyn ListingSource>))
            }
        };
        info!("Loaded {} notes, {} categories", data.notes.len(), data.categories.len());

        let base_url = backend.base_url().to_string();
        Ok(Self::with_backend(config, data, backend, listing, base_url))
    }

    pub fn with_backend(
        config: Config,
        data: PageData,
        backend: Arc<dyn NotesBackend>,
        listing: Option<Arc<dyn ListingSource>>,
        base_url: String,
    ) -> Self {
        Self {
            should_quit: false,
            controller: NoteListController::new(data),
            config,
            selected_index: 0,
            search_open: false,
            help_open: false,
            toasts: Toasts::default(),
            delete_in_flight: None,
            page_in_flight: None,
            base_url,
            worker: RequestWorker::new(backend, listing),
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Apply finished requests and expire old notifications
    pub fn tick(&mut self) {
        while let Some(completion) = self.worker.try_recv() {
            self.apply_completion(completion);
        }
        self.toasts.prune(Instant::now());
        self.clamp_selection();
    }

    fn apply_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Delete(id, outcome) => {
                if self.delete_in_flight.as_ref() == Some(&id) {
                    self.delete_in_flight = None;
                }
                let notification = self.controller.finish_delete(&id, outcome);
                self.toasts.show(notification);
            }
            Completion::Like(id, outcome) => {
                self.controller.finish_like(&id, outcome);
            }
            Completion::Listing(page, outcome) => {
                if self.page_in_flight == Some(page) {
                    self.page_in_flight = None;
                }
                match outcome {
                    Ok(data) => {
                        info!("Loaded page {} with {} notes", page, data.notes.len());
                        self.controller.replace_page(data);
                        self.selected_index = 0;
                    }
                    Err(err) => {
                        error!("Failed to fetch page {}: {}", page, err);
                        self.toasts.show(Notification::error(format!("Could not load page {}", page)));
                    }
                }
            }
        }
    }

    /// Hand `request` to the worker; if it cannot start, resolve it as failed
    /// right away so nothing is left in flight.
    fn dispatch(&mut self, request: Request) {
        if let Err(err) = self.worker.submit(request.clone()) {
            self.apply_completion(Completion::failed(request, err));
        }
    }

    // =========================
    // Selection
    // =========================

    pub fn visible_notes(&self) -> Vec<&Note> {
        self.controller.filtered_notes()
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.visible_notes().get(self.selected_index).copied()
    }

    pub fn move_cursor_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_cursor_down(&mut self) {
        let len = self.visible_notes().len();
        if self.selected_index + 1 < len {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_notes().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    /// Category shown for a note: the known category list first, then the
    /// category embedded in the note itself.
    pub fn category_for<'a>(&'a self, note: &'a Note) -> Option<&'a Category> {
        note.category_id
            .as_ref()
            .and_then(|id| self.controller.category(id))
            .or(note.category.as_ref())
    }

    // =========================
    // Filters
    // =========================

    pub fn open_search(&mut self) {
        self.search_open = true;
    }

    /// Close the input; the query keeps filtering the list
    pub fn close_search(&mut self) {
        self.search_open = false;
    }

    pub fn update_search_query(&mut self, ch: char) {
        self.controller.push_search_char(ch);
        self.selected_index = 0;
    }

    pub fn backspace_search_query(&mut self) {
        self.controller.pop_search_char();
        self.selected_index = 0;
    }

    pub fn cycle_sort(&mut self) {
        self.controller.cycle_sort();
        self.selected_index = 0;
    }

    pub fn cycle_category(&mut self) {
        self.controller.cycle_category();
        self.selected_index = 0;
    }

    pub fn clear_filters(&mut self) {
        self.controller.clear_filters();
        self.selected_index = 0;
    }

    // =========================
    // Actions
    // =========================

    /// Open the selected note's page in the browser
    pub fn open_selected(&mut self) {
        let Some(path) = self.selected_note().and_then(|n| self.controller.view_note(&n.id)) else {
            return;
        };
        let url = format!("{}{}", self.base_url, path);
        if let Err(err) = opener::open(&url) {
            error!("Failed to open {}: {}", url, err);
            self.toasts.show(Notification::new(
                format!("Could not open {}", url),
                NotificationKind::Warning,
            ));
        }
    }

    pub fn like_selected(&mut self) {
        let Some(id) = self.selected_note().map(|n| n.id.clone()) else {
            return;
        };
        if let Some(id) = self.controller.begin_like(&id) {
            self.dispatch(Request::Like(id));
        }
    }

    pub fn initiate_delete(&mut self) {
        let note = self.selected_note().cloned();
        self.controller.confirm_delete(note.as_ref());
    }

    pub fn confirming_delete(&self) -> bool {
        self.controller.is_dialog_open()
    }

    /// Send the delete for the pending target; the dialog stays up until
    /// the response arrives.
    pub fn confirm_delete(&mut self) {
        if self.delete_in_flight.is_some() {
            return;
        }
        if let Some(id) = self.controller.begin_delete() {
            self.delete_in_flight = Some(id.clone());
            self.dispatch(Request::Delete(id));
        }
    }

    pub fn cancel_delete(&mut self) {
        self.controller.cancel_delete();
    }

    // =========================
    // Paging
    // =========================

    pub fn can_page(&self) -> bool {
        self.worker.can_fetch_listing()
    }

    pub fn next_page(&mut self) {
        let page = self.controller.next_page();
        self.load_page(page);
    }

    pub fn prev_page(&mut self) {
        let page = self.controller.prev_page();
        self.load_page(page);
    }

    fn load_page(&mut self, page: Option<u64>) {
        let Some(page) = page else { return };
        if !self.can_page() || self.page_in_flight.is_some() {
            return;
        }
        self.page_in_flight = Some(page);
        self.dispatch(Request::Listing(page));
    }

    pub fn open_help(&mut self) {
        self.help_open = true;
    }

    pub fn close_help(&mut self) {
        self.help_open = false;
    }
}
