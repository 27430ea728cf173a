//! Owns the note collection and runs the delete and like flows.

use log::{debug, error};
use std::collections::HashSet;

use crate::backend::{note_path, NotesBackend};
use crate::models::{Category, Id, Note};
use crate::notification::Notification;
use crate::page::{load_page_data, PageData, PageSource, Pagination};
use crate::view::{filtered_notes, SortKey, ViewState};
use crate::Result;

pub const DELETE_SUCCESS_MESSAGE: &str = "Note deleted successfully";
pub const DELETE_ERROR_MESSAGE: &str = "Error deleting note";

/// Result of a like attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// Falsy id or no such note.
    Skipped,
    /// A like for this note is still awaiting its response.
    InFlight,
    Liked,
    Failed,
}

pub struct NoteListController {
    notes: Vec<Note>,
    categories: Vec<Category>,
    pagination: Option<Pagination>,
    view: ViewState,
    dialog_open: bool,
    likes_in_flight: HashSet<Id>,
    revision: u64,
}

impl NoteListController {
    pub fn new(data: PageData) -> Self {
        Self {
            notes: data.notes,
            categories: data.categories,
            pagination: data.pagination,
            view: ViewState::default(),
            dialog_open: false,
            likes_in_flight: HashSet::new(),
            revision: 0,
        }
    }

    /// Initialize from embedded page data; falls back to empty collections.
    pub fn from_page(source: &dyn PageSource) -> Self {
        Self::new(load_page_data(source))
    }

    /// Swap in another page of the listing. Categories already known are
    /// kept and new ones appended, so the category filter survives paging.
    pub fn replace_page(&mut self, data: PageData) {
        for category in data.categories {
            if self.category(&category.id).is_none() {
                self.categories.push(category);
            }
        }
        self.notes = data.notes;
        self.pagination = data.pagination;
        self.revision += 1;
        debug!(
            "Showing page {:?} with {} notes",
            self.pagination.as_ref().and_then(|p| p.page),
            self.notes.len()
        );
    }

    /// Page number after the current one, if the listing has one.
    pub fn next_page(&self) -> Option<u64> {
        let pagination = self.pagination.as_ref().filter(|p| p.has_next)?;
        pagination.next_num.or_else(|| pagination.page.map(|n| n + 1))
    }

    /// Page number before the current one, if the listing has one.
    pub fn prev_page(&self) -> Option<u64> {
        let pagination = self.pagination.as_ref().filter(|p| p.has_prev)?;
        pagination
            .prev_num
            .or_else(|| pagination.page.and_then(|n| n.checked_sub(1)))
            .filter(|&n| n > 0)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Bumped every time the collection changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn pending_delete_target(&self) -> Option<&Note> {
        self.view.pending_delete_target.as_ref()
    }

    pub fn note(&self, id: &Id) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn category(&self, id: &Id) -> Option<&Category> {
        self.categories.iter().find(|c| c.id.loosely_eq(id))
    }

    pub fn filtered_notes(&self) -> Vec<&Note> {
        filtered_notes(&self.notes, &self.view)
    }

    // ---- View inputs ----

    pub fn set_search_query(&mut self, query: &str) {
        self.view.search_query = query.to_string();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.view.search_query.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.view.search_query.pop();
    }

    pub fn set_selected_category(&mut self, category: Option<Id>) {
        self.view.selected_category = category.filter(Id::is_truthy);
    }

    /// None → first category → ... → last category → None.
    pub fn cycle_category(&mut self) {
        let next = match &self.view.selected_category {
            None => self.categories.first(),
            Some(current) => self
                .categories
                .iter()
                .position(|c| c.id.loosely_eq(current))
                .and_then(|i| self.categories.get(i + 1)),
        };
        self.view.selected_category = next.map(|c| c.id.clone());
    }

    pub fn set_sort_by(&mut self, sort_by: SortKey) {
        self.view.sort_by = sort_by;
    }

    pub fn cycle_sort(&mut self) {
        self.view.sort_by = self.view.sort_by.next();
    }

    pub fn clear_filters(&mut self) {
        self.view.search_query.clear();
        self.view.selected_category = None;
    }

    /// Detail page path to navigate to, if the id is usable.
    pub fn view_note(&self, id: &Id) -> Option<String> {
        id.is_truthy().then(|| note_path(id))
    }

    // ---- Delete flow ----

    /// Ask for confirmation before deleting `note`.
    pub fn confirm_delete(&mut self, note: Option<&Note>) {
        let Some(note) = note else { return };
        debug!("Confirm delete requested for note {}", note.id);
        self.view.pending_delete_target = Some(note.clone());
        self.dialog_open = true;
    }

    /// Dismiss the dialog and forget the target. Does not cancel a request
    /// that is already on its way.
    pub fn cancel_delete(&mut self) {
        self.dialog_open = false;
        self.view.pending_delete_target = None;
    }

    /// Id to send a delete request for, if a target is pending.
    pub fn begin_delete(&self) -> Option<Id> {
        self.view.pending_delete_target.as_ref().map(|n| n.id.clone())
    }

    /// Apply the outcome of a delete request for `id`.
    ///
    /// On failure the collection, the target and the dialog are left as they
    /// were so the user can retry or dismiss.
    pub fn finish_delete(&mut self, id: &Id, outcome: Result<()>) -> Notification {
        match outcome {
            Ok(()) => {
                self.notes.retain(|n| &n.id != id);
                self.revision += 1;
                let still_targeted = self
                    .view
                    .pending_delete_target
                    .as_ref()
                    .is_some_and(|n| &n.id == id);
                if still_targeted {
                    self.dialog_open = false;
                    self.view.pending_delete_target = None;
                }
                debug!("Deleted note {}", id);
                Notification::success(DELETE_SUCCESS_MESSAGE)
            }
            Err(err) => {
                error!("Error deleting note {}: {}", id, err);
                Notification::error(DELETE_ERROR_MESSAGE)
            }
        }
    }

    /// Delete the pending target, waiting for the response.
    pub fn delete_note(&mut self, backend: &dyn NotesBackend) -> Option<Notification> {
        let id = self.begin_delete()?;
        let outcome = backend.delete_note(&id);
        Some(self.finish_delete(&id, outcome))
    }

    // ---- Like flow ----

    /// Id to send a like request for. Returns `None` for falsy ids, unknown
    /// notes, and notes whose previous like has not completed.
    pub fn begin_like(&mut self, id: &Id) -> Option<Id> {
        if self.like_blocker(id).is_some() {
            return None;
        }
        self.likes_in_flight.insert(id.clone());
        Some(id.clone())
    }

    fn like_blocker(&self, id: &Id) -> Option<LikeOutcome> {
        if !id.is_truthy() || self.note(id).is_none() {
            Some(LikeOutcome::Skipped)
        } else if self.likes_in_flight.contains(id) {
            Some(LikeOutcome::InFlight)
        } else {
            None
        }
    }

    /// Apply the outcome of a like request. Failures are logged only.
    pub fn finish_like(&mut self, id: &Id, outcome: Result<()>) -> LikeOutcome {
        self.likes_in_flight.remove(id);
        match outcome {
            Ok(()) => match self.notes.iter_mut().find(|n| &n.id == id) {
                Some(note) => {
                    note.add_like();
                    self.revision += 1;
                    LikeOutcome::Liked
                }
                None => LikeOutcome::Skipped,
            },
            Err(err) => {
                error!("Error liking note {}: {}", id, err);
                LikeOutcome::Failed
            }
        }
    }

    /// Like a note, waiting for the response.
    pub fn toggle_like(&mut self, id: &Id, backend: &dyn NotesBackend) -> LikeOutcome {
        if let Some(blocked) = self.like_blocker(id) {
            return blocked;
        }
        self.likes_in_flight.insert(id.clone());
        let outcome = backend.like_note(id);
        self.finish_like(id, outcome)
    }

    pub fn is_like_in_flight(&self, id: &Id) -> bool {
        self.likes_in_flight.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationKind;
    use crate::page::{categories_from_notes, parse_notes_payload, StaticPage, CATEGORIES_ELEMENT, NOTES_ELEMENT};
    use crate::Error;
    use std::sync::Mutex;

    /// Records requests and answers with a fixed outcome.
    struct StubBackend {
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    impl StubBackend {
        fn ok() -> Self {
            Self { fail: false, calls: Mutex::new(Vec::new()) }
        }

        fn failing() -> Self {
            Self { fail: true, calls: Mutex::new(Vec::new()) }
        }

        fn answer(&self, call: String) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(Error::Status(500))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl NotesBackend for StubBackend {
        fn delete_note(&self, id: &Id) -> Result<()> {
            self.answer(format!("delete {}", id))
        }

        fn like_note(&self, id: &Id) -> Result<()> {
            self.answer(format!("like {}", id))
        }
    }

    fn controller() -> NoteListController {
        let page = StaticPage::new()
            .with_element(
                NOTES_ELEMENT,
                r#"{"items": [
                    {"id": 3, "title": "Three", "category_id": 1, "likes_count": 2},
                    {"id": 7, "title": "Seven", "category_id": 2},
                    {"id": 9, "title": "Nine", "category_id": 1}
                ]}"#,
            )
            .with_element(
                CATEGORIES_ELEMENT,
                r##"[{"id": 1, "name": "Work", "color": "#f00"}, {"id": 2, "name": "Home", "color": null}]"##,
            );
        NoteListController::from_page(&page)
    }

    fn ids(controller: &NoteListController) -> Vec<Id> {
        controller.notes().iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn test_from_page() {
        let c = controller();
        assert_eq!(c.notes().len(), 3);
        assert_eq!(c.categories().len(), 2);
        assert!(c.pending_delete_target().is_none());
        assert!(!c.is_dialog_open());
    }

    #[test]
    fn test_from_empty_page_is_empty() {
        let c = NoteListController::from_page(&StaticPage::new());
        assert!(c.notes().is_empty());
        assert!(c.filtered_notes().is_empty());
    }

    #[test]
    fn test_confirm_delete_none_is_noop() {
        let mut c = controller();
        c.confirm_delete(None);
        assert!(c.pending_delete_target().is_none());
        assert!(!c.is_dialog_open());
    }

    #[test]
    fn test_delete_without_target_is_noop() {
        let mut c = controller();
        let backend = StubBackend::ok();
        assert!(c.delete_note(&backend).is_none());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_delete_success_removes_only_target() {
        let mut c = controller();
        let backend = StubBackend::ok();
        let target = c.note(&Id::Int(7)).cloned();
        c.confirm_delete(target.as_ref());
        assert!(c.is_dialog_open());

        let revision = c.revision();
        let notification = c.delete_note(&backend).unwrap();

        assert_eq!(ids(&c), vec![Id::Int(3), Id::Int(9)]);
        assert_eq!(notification.kind, NotificationKind::Success);
        assert_eq!(notification.message, DELETE_SUCCESS_MESSAGE);
        assert!(c.pending_delete_target().is_none());
        assert!(!c.is_dialog_open());
        assert!(c.revision() > revision);
        assert_eq!(backend.calls(), vec!["delete 7".to_string()]);
    }

    #[test]
    fn test_delete_failure_keeps_state() {
        let mut c = controller();
        let backend = StubBackend::failing();
        let target = c.note(&Id::Int(7)).cloned();
        c.confirm_delete(target.as_ref());

        let notification = c.delete_note(&backend).unwrap();

        assert_eq!(ids(&c), vec![Id::Int(3), Id::Int(7), Id::Int(9)]);
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.message, DELETE_ERROR_MESSAGE);
        assert_eq!(c.pending_delete_target().map(|n| n.id.clone()), Some(Id::Int(7)));
        assert!(c.is_dialog_open());
    }

    #[test]
    fn test_cancel_delete_clears_target() {
        let mut c = controller();
        let target = c.note(&Id::Int(3)).cloned();
        c.confirm_delete(target.as_ref());
        c.cancel_delete();
        assert!(c.pending_delete_target().is_none());
        assert!(!c.is_dialog_open());
        assert_eq!(c.notes().len(), 3);
    }

    #[test]
    fn test_late_delete_success_after_cancel() {
        let mut c = controller();
        let target = c.note(&Id::Int(3)).cloned();
        c.confirm_delete(target.as_ref());
        let id = c.begin_delete().unwrap();
        c.cancel_delete();

        let notification = c.finish_delete(&id, Ok(()));
        assert_eq!(notification.kind, NotificationKind::Success);
        assert!(c.note(&Id::Int(3)).is_none());
        assert!(!c.is_dialog_open());
    }

    #[test]
    fn test_like_from_absent_counter() {
        let mut c = controller();
        let backend = StubBackend::ok();

        assert_eq!(c.toggle_like(&Id::Int(7), &backend), LikeOutcome::Liked);
        assert_eq!(c.note(&Id::Int(7)).unwrap().likes_count, Some(1));

        assert_eq!(c.toggle_like(&Id::Int(7), &backend), LikeOutcome::Liked);
        assert_eq!(c.note(&Id::Int(7)).unwrap().likes_count, Some(2));
    }

    #[test]
    fn test_like_failure_is_silent() {
        let mut c = controller();
        let backend = StubBackend::failing();
        let revision = c.revision();

        assert_eq!(c.toggle_like(&Id::Int(3), &backend), LikeOutcome::Failed);
        assert_eq!(c.note(&Id::Int(3)).unwrap().likes_count, Some(2));
        assert_eq!(c.revision(), revision);
        assert!(!c.is_like_in_flight(&Id::Int(3)));
    }

    #[test]
    fn test_like_skips_falsy_or_unknown_ids() {
        let mut c = controller();
        let backend = StubBackend::ok();
        assert_eq!(c.toggle_like(&Id::Int(0), &backend), LikeOutcome::Skipped);
        assert_eq!(c.toggle_like(&Id::Int(42), &backend), LikeOutcome::Skipped);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_like_in_flight_guard() {
        let mut c = controller();
        let id = c.begin_like(&Id::Int(3)).unwrap();
        assert!(c.begin_like(&Id::Int(3)).is_none());

        let backend = StubBackend::ok();
        assert_eq!(c.toggle_like(&Id::Int(3), &backend), LikeOutcome::InFlight);
        assert!(backend.calls().is_empty());

        assert_eq!(c.finish_like(&id, Ok(())), LikeOutcome::Liked);
        assert_eq!(c.note(&Id::Int(3)).unwrap().likes_count, Some(3));
        assert!(c.begin_like(&Id::Int(3)).is_some());
    }

    #[test]
    fn test_like_result_after_note_deleted() {
        let mut c = controller();
        let id = c.begin_like(&Id::Int(9)).unwrap();
        let target = c.note(&Id::Int(9)).cloned();
        c.confirm_delete(target.as_ref());
        c.finish_delete(&Id::Int(9), Ok(()));

        assert_eq!(c.finish_like(&id, Ok(())), LikeOutcome::Skipped);
        assert!(c.note(&Id::Int(9)).is_none());
        assert!(!c.is_like_in_flight(&Id::Int(9)));
    }

    #[test]
    fn test_view_note_path() {
        let c = controller();
        assert_eq!(c.view_note(&Id::Int(7)), Some("/notes/7".to_string()));
        assert_eq!(c.view_note(&Id::Int(0)), None);
        assert_eq!(c.view_note(&Id::default()), None);
    }

    #[test]
    fn test_filters_flow_through_controller() {
        let mut c = controller();
        c.set_selected_category(Some(Id::from("1")));
        c.set_sort_by(SortKey::Title);
        let titles: Vec<&str> = c.filtered_notes().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Nine", "Three"]);

        c.set_search_query("thr");
        assert_eq!(c.filtered_notes().len(), 1);

        c.clear_filters();
        assert_eq!(c.filtered_notes().len(), 3);
    }

    #[test]
    fn test_cycle_category_wraps_to_none() {
        let mut c = controller();
        c.cycle_category();
        assert_eq!(c.view().selected_category, Some(Id::Int(1)));
        c.cycle_category();
        assert_eq!(c.view().selected_category, Some(Id::Int(2)));
        c.cycle_category();
        assert_eq!(c.view().selected_category, None);
    }

    #[test]
    fn test_replace_page_keeps_view_and_merges_categories() {
        let mut c = controller();
        c.set_selected_category(Some(Id::Int(1)));
        let revision = c.revision();

        let (notes, pagination) = parse_notes_payload(
            r#"{"items": [
                {"id": 13, "title": "Thirteen", "category_id": 1},
                {"id": 14, "title": "Fourteen", "category_id": 5, "category": {"id": 5, "name": "Travel"}},
                {"id": 15, "title": "Fifteen", "category_id": 2, "category": {"id": "2", "name": "Home"}}
            ], "page": 2, "pages": 2, "has_prev": true, "has_next": false, "prev_num": 1}"#,
        )
        .unwrap();
        let categories = categories_from_notes(&notes);
        c.replace_page(PageData { notes, categories, pagination });

        assert_eq!(ids(&c), vec![Id::Int(13), Id::Int(14), Id::Int(15)]);
        let names: Vec<&str> = c.categories().iter().map(|cat| cat.name.as_str()).collect();
        assert_eq!(names, vec!["Work", "Home", "Travel"]);
        assert_eq!(c.view().selected_category, Some(Id::Int(1)));
        assert_eq!(c.filtered_notes().len(), 1);
        assert!(c.revision() > revision);
        assert_eq!(c.prev_page(), Some(1));
        assert_eq!(c.next_page(), None);
    }

    #[test]
    fn test_page_numbers_from_pagination() {
        let mut c = controller();
        assert_eq!(c.next_page(), None);
        assert_eq!(c.prev_page(), None);

        c.replace_page(PageData {
            pagination: Some(Pagination {
                page: Some(1),
                pages: Some(3),
                has_next: true,
                ..Pagination::default()
            }),
            ..PageData::default()
        });
        assert_eq!(c.next_page(), Some(2));
        assert_eq!(c.prev_page(), None);
        assert!(c.notes().is_empty());
    }

    #[test]
    fn test_category_lookup_is_loose() {
        let c = controller();
        assert_eq!(c.category(&Id::from("2")).map(|cat| cat.name.as_str()), Some("Home"));
    }
}
