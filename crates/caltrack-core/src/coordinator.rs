//! Intent coordination
//!
//! The `Coordinator` owns the item store, the persistence adapter, and the
//! renderer, and is the only place control flow lives. Each intent runs to
//! completion: mutate the store, save the snapshot, re-render.
//!
//! ## Failure handling
//!
//! - Invalid form input rejects the intent before the store is touched
//! - An add with no id left is refused the same way
//! - Missing selections and unknown ids are no-ops
//! - A failed save keeps the in-memory change and still re-renders; the
//!   error is returned so the surface can report it

use thiserror::Error;
use tracing::{debug, error, info};

use crate::models::{ItemId, ItemInput, ValidationError};
use crate::storage::{ItemPersistence, SlotBackend, StorageError};
use crate::store::{ItemStore, StoreError};
use crate::view::{FormInput, Intent, Renderer};

/// Why an intent did not fully complete
#[derive(Error, Debug)]
pub enum IntentError {
    /// The form input was invalid; nothing changed
    #[error("{0}")]
    Rejected(#[from] ValidationError),

    /// The store could not take the change; nothing changed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The change was applied in memory but could not be saved
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Wires renderer intents to store mutations and persistence
pub struct Coordinator<R, B> {
    store: ItemStore,
    persistence: ItemPersistence<B>,
    renderer: R,
}

impl<R: Renderer, B: SlotBackend> Coordinator<R, B> {
    /// Create a coordinator, seeding the store from the persisted snapshot
    ///
    /// This is the only place the snapshot is loaded. Nothing is rendered
    /// until [`Coordinator::start`].
    pub fn new(persistence: ItemPersistence<B>, renderer: R) -> Self {
        let store = ItemStore::from_items(persistence.load());
        info!(count = store.len(), "Item store seeded");

        Self {
            store,
            persistence,
            renderer,
        }
    }

    /// Render the initial view: list (hidden if empty), total, create form
    pub fn start(&mut self) {
        self.refresh();
        self.renderer.show_create_mode();
    }

    /// Handle one user intent
    pub fn dispatch(&mut self, intent: Intent) -> Result<(), IntentError> {
        debug!(?intent, "Dispatching intent");

        match intent {
            Intent::SubmitNew(form) => self.submit_new(&form),
            Intent::RequestEdit(id) => {
                self.request_edit(id);
                Ok(())
            }
            Intent::SubmitUpdate(form) => self.submit_update(&form),
            Intent::RequestDelete => self.request_delete(),
            Intent::RequestClear => self.request_clear(),
            Intent::CancelEdit => {
                self.store.set_current(None);
                self.renderer.show_create_mode();
                Ok(())
            }
        }
    }

    // ==================== Accessors ====================

    /// The item store (read-only)
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// The id of the item being edited
    pub fn selection(&self) -> Option<ItemId> {
        self.store.current_id()
    }

    /// The persistence adapter
    pub fn persistence(&self) -> &ItemPersistence<B> {
        &self.persistence
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    // ==================== Handlers ====================

    fn submit_new(&mut self, form: &FormInput) -> Result<(), IntentError> {
        let input = ItemInput::parse(&form.name, &form.calories)?;

        let item = self.store.add(input)?;
        info!(id = %item.id, name = %item.name, calories = item.calories, "Added item");

        let saved = self.save();
        self.refresh();
        self.renderer.show_create_mode();
        saved
    }

    fn request_edit(&mut self, id: ItemId) {
        let Some(item) = self.store.get_by_id(id) else {
            debug!(%id, "Edit requested for unknown item");
            return;
        };

        self.renderer.show_edit_mode(item);
        self.store.set_current(Some(id));
    }

    fn submit_update(&mut self, form: &FormInput) -> Result<(), IntentError> {
        if self.store.current().is_none() {
            debug!("Update submitted with nothing selected");
            self.store.set_current(None);
            self.renderer.show_create_mode();
            return Ok(());
        }

        // Invalid input leaves the form in edit mode
        let input = ItemInput::parse(&form.name, &form.calories)?;

        let updated = self.store.update(input);
        if updated {
            info!(id = ?self.store.current_id(), "Updated item");
        }

        let saved = if updated { self.save() } else { Ok(()) };
        self.refresh();
        self.store.set_current(None);
        self.renderer.show_create_mode();
        saved
    }

    fn request_delete(&mut self) -> Result<(), IntentError> {
        let Some(id) = self.store.current_id() else {
            debug!("Delete requested with nothing selected");
            self.renderer.show_create_mode();
            return Ok(());
        };

        let deleted = self.store.delete(id);
        self.store.set_current(None);
        if deleted {
            info!(%id, "Deleted item");
        }

        let saved = if deleted { self.save() } else { Ok(()) };
        self.refresh();
        self.renderer.show_create_mode();
        saved
    }

    fn request_clear(&mut self) -> Result<(), IntentError> {
        let count = self.store.len();
        self.store.clear();
        self.store.set_current(None);
        info!(count, "Cleared all items");

        let removed = self.persistence.remove().map_err(|e| {
            error!(error = %e, "Failed to remove item snapshot");
            IntentError::from(e)
        });
        self.refresh();
        self.renderer.show_create_mode();
        removed
    }

    /// Save the full collection, logging on failure
    fn save(&mut self) -> Result<(), IntentError> {
        self.persistence.save(self.store.list()).map_err(|e| {
            error!(error = %e, "Failed to save item snapshot");
            IntentError::from(e)
        })
    }

    /// Re-render the list and total; an empty list is hidden
    fn refresh(&mut self) {
        self.renderer.render_list(self.store.list());
        if self.store.is_empty() {
            self.renderer.hide_list();
        }
        self.renderer.render_total(self.store.total_calories());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use crate::storage::{MemorySlots, StorageResult, ITEMS_SLOT};
    use crate::view::FormMode;

    /// Renderer that records what it was told to show
    #[derive(Default)]
    struct RecordingRenderer {
        rows: Vec<Item>,
        total: Option<u64>,
        list_visible: bool,
        mode: FormMode,
        fields: FormInput,
        calls: Vec<&'static str>,
    }

    impl Renderer for RecordingRenderer {
        fn render_list(&mut self, items: &[Item]) {
            self.rows = items.to_vec();
            self.list_visible = true;
            self.calls.push("render_list");
        }

        fn render_total(&mut self, total: u64) {
            self.total = Some(total);
            self.calls.push("render_total");
        }

        fn hide_list(&mut self) {
            self.list_visible = false;
            self.calls.push("hide_list");
        }

        fn show_create_mode(&mut self) {
            self.mode = FormMode::Create;
            self.fields = FormInput::default();
            self.calls.push("show_create_mode");
        }

        fn show_edit_mode(&mut self, item: &Item) {
            self.mode = FormMode::Edit(item.id);
            self.fields = FormInput::from_item(item);
            self.calls.push("show_edit_mode");
        }
    }

    /// Backend whose writes always fail
    struct FailingSlots;

    impl SlotBackend for FailingSlots {
        fn read(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn write(&mut self, key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::from_io(
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                key.into(),
            ))
        }

        fn remove(&mut self, key: &str) -> StorageResult<()> {
            self.write(key, "")
        }
    }

    type TestCoordinator = Coordinator<RecordingRenderer, MemorySlots>;

    fn coordinator() -> TestCoordinator {
        let mut c = Coordinator::new(
            ItemPersistence::new(MemorySlots::new()),
            RecordingRenderer::default(),
        );
        c.start();
        c
    }

    fn coordinator_with(items: &[Item]) -> TestCoordinator {
        let mut persistence = ItemPersistence::new(MemorySlots::new());
        persistence.save(items).unwrap();
        let mut c = Coordinator::new(persistence, RecordingRenderer::default());
        c.start();
        c
    }

    fn add(c: &mut TestCoordinator, name: &str, calories: &str) {
        c.dispatch(Intent::SubmitNew(FormInput::new(name, calories)))
            .unwrap();
    }

    fn sample() -> TestCoordinator {
        let mut c = coordinator();
        add(&mut c, "Steak Dinner", "1200");
        add(&mut c, "Cookie", "400");
        c
    }

    #[test]
    fn test_start_with_empty_slot_hides_list() {
        let c = coordinator();

        let r = c.renderer();
        assert!(!r.list_visible);
        assert_eq!(r.total, Some(0));
        assert_eq!(r.mode, FormMode::Create);
    }

    #[test]
    fn test_start_renders_persisted_items() {
        let items = vec![
            Item::new(ItemId(0), "Steak Dinner", 1200),
            Item::new(ItemId(1), "Cookie", 400),
        ];
        let c = coordinator_with(&items);

        let r = c.renderer();
        assert!(r.list_visible);
        assert_eq!(r.rows, items);
        assert_eq!(r.total, Some(1600));
    }

    #[test]
    fn test_submit_new_adds_persists_and_renders() {
        let c = sample();

        let expected = vec![
            Item::new(ItemId(0), "Steak Dinner", 1200),
            Item::new(ItemId(1), "Cookie", 400),
        ];
        assert_eq!(c.store().list(), expected.as_slice());
        assert_eq!(c.persistence().load(), expected);
        assert_eq!(c.renderer().rows, expected);
        assert_eq!(c.renderer().total, Some(1600));
        assert!(c.renderer().list_visible);
        assert_eq!(c.renderer().fields, FormInput::default());
    }

    #[test]
    fn test_submit_new_rejects_invalid_input() {
        let mut c = sample();
        c.renderer_mut().calls.clear();

        let err = c
            .dispatch(Intent::SubmitNew(FormInput::new("Pie", "lots")))
            .unwrap_err();
        assert!(matches!(
            err,
            IntentError::Rejected(ValidationError::InvalidCalories(_))
        ));

        let err = c
            .dispatch(Intent::SubmitNew(FormInput::new("", "")))
            .unwrap_err();
        assert!(matches!(err, IntentError::Rejected(ValidationError::EmptyName)));

        assert_eq!(c.store().len(), 2);
        assert_eq!(c.persistence().load().len(), 2);
        assert!(c.renderer().calls.is_empty());
    }

    #[test]
    fn test_request_edit_enters_edit_mode() {
        let mut c = sample();

        c.dispatch(Intent::RequestEdit(ItemId(1))).unwrap();

        assert_eq!(c.selection(), Some(ItemId(1)));
        assert_eq!(c.renderer().mode, FormMode::Edit(ItemId(1)));
        assert_eq!(c.renderer().fields, FormInput::new("Cookie", "400"));
    }

    #[test]
    fn test_request_edit_unknown_id_is_noop() {
        let mut c = sample();

        c.dispatch(Intent::RequestEdit(ItemId(42))).unwrap();

        assert!(c.selection().is_none());
        assert_eq!(c.renderer().mode, FormMode::Create);
    }

    #[test]
    fn test_submit_update() {
        let mut c = sample();
        c.dispatch(Intent::RequestEdit(ItemId(0))).unwrap();

        c.dispatch(Intent::SubmitUpdate(FormInput::new("Salad", "350")))
            .unwrap();

        let expected = vec![
            Item::new(ItemId(0), "Salad", 350),
            Item::new(ItemId(1), "Cookie", 400),
        ];
        assert_eq!(c.store().list(), expected.as_slice());
        assert_eq!(c.persistence().load(), expected);
        assert_eq!(c.renderer().total, Some(750));
        assert_eq!(c.renderer().mode, FormMode::Create);
        assert!(c.selection().is_none());
    }

    #[test]
    fn test_submit_update_invalid_stays_in_edit() {
        let mut c = sample();
        c.dispatch(Intent::RequestEdit(ItemId(0))).unwrap();

        let err = c
            .dispatch(Intent::SubmitUpdate(FormInput::new("Salad", "abc")))
            .unwrap_err();

        assert!(matches!(err, IntentError::Rejected(_)));
        assert_eq!(c.selection(), Some(ItemId(0)));
        assert_eq!(c.renderer().mode, FormMode::Edit(ItemId(0)));
        assert_eq!(c.store().get_by_id(ItemId(0)).unwrap().name, "Steak Dinner");
    }

    #[test]
    fn test_submit_update_without_selection_is_noop() {
        let mut c = sample();
        let before = c.persistence().backend().read(ITEMS_SLOT).unwrap();

        c.dispatch(Intent::SubmitUpdate(FormInput::new("Salad", "350")))
            .unwrap();

        assert_eq!(c.store().total_calories(), 1600);
        assert_eq!(c.persistence().backend().read(ITEMS_SLOT).unwrap(), before);
        assert_eq!(c.renderer().mode, FormMode::Create);
    }

    #[test]
    fn test_request_delete() {
        let mut c = sample();
        c.dispatch(Intent::RequestEdit(ItemId(0))).unwrap();

        c.dispatch(Intent::RequestDelete).unwrap();

        let expected = vec![Item::new(ItemId(1), "Cookie", 400)];
        assert_eq!(c.store().list(), expected.as_slice());
        assert_eq!(c.persistence().load(), expected);
        assert_eq!(c.renderer().total, Some(400));
        assert_eq!(c.renderer().mode, FormMode::Create);
        assert!(c.selection().is_none());

        // Selection is gone, so a follow-up update does nothing
        c.dispatch(Intent::SubmitUpdate(FormInput::new("Ghost", "1")))
            .unwrap();
        assert_eq!(c.store().list(), expected.as_slice());
    }

    #[test]
    fn test_request_delete_without_selection_is_noop() {
        let mut c = sample();

        c.dispatch(Intent::RequestDelete).unwrap();

        assert_eq!(c.store().len(), 2);
    }

    #[test]
    fn test_delete_last_item_hides_list() {
        let mut c = coordinator();
        add(&mut c, "Cookie", "400");
        c.dispatch(Intent::RequestEdit(ItemId(0))).unwrap();

        c.dispatch(Intent::RequestDelete).unwrap();

        assert!(!c.renderer().list_visible);
        assert_eq!(c.renderer().total, Some(0));
    }

    #[test]
    fn test_request_clear_removes_slot() {
        let mut c = sample();
        c.dispatch(Intent::RequestEdit(ItemId(1))).unwrap();

        c.dispatch(Intent::RequestClear).unwrap();

        assert!(c.store().is_empty());
        assert!(c.selection().is_none());
        assert!(!c.persistence().backend().contains(ITEMS_SLOT));
        assert!(c.renderer().rows.is_empty());
        assert_eq!(c.renderer().total, Some(0));
        assert!(!c.renderer().list_visible);
        assert_eq!(c.renderer().mode, FormMode::Create);
    }

    #[test]
    fn test_clear_then_add_restarts_ids() {
        let mut c = sample();
        c.dispatch(Intent::RequestClear).unwrap();

        add(&mut c, "Eggs", "300");

        assert_eq!(c.store().list()[0].id, ItemId(0));
        assert!(c.renderer().list_visible);
    }

    #[test]
    fn test_cancel_edit() {
        let mut c = sample();
        c.dispatch(Intent::RequestEdit(ItemId(1))).unwrap();

        c.dispatch(Intent::CancelEdit).unwrap();

        assert!(c.selection().is_none());
        assert_eq!(c.renderer().mode, FormMode::Create);
        assert_eq!(c.renderer().fields, FormInput::default());
        assert_eq!(c.store().total_calories(), 1600);
    }

    #[test]
    fn test_render_order_after_mutation() {
        let mut c = coordinator();
        c.renderer_mut().calls.clear();

        add(&mut c, "Cookie", "400");

        assert_eq!(
            c.renderer().calls,
            vec!["render_list", "render_total", "show_create_mode"]
        );
    }

    #[test]
    fn test_save_failure_is_reported_but_view_stays_consistent() {
        let mut c = Coordinator::new(
            ItemPersistence::new(FailingSlots),
            RecordingRenderer::default(),
        );
        c.start();

        let err = c
            .dispatch(Intent::SubmitNew(FormInput::new("Cookie", "400")))
            .unwrap_err();

        assert!(matches!(err, IntentError::Storage(_)));
        assert_eq!(c.store().len(), 1);
        assert_eq!(c.renderer().rows.len(), 1);
        assert_eq!(c.renderer().total, Some(400));

        // The loop keeps going
        let err = c.dispatch(Intent::RequestClear).unwrap_err();
        assert!(matches!(err, IntentError::Storage(_)));
        assert!(c.store().is_empty());
    }

    #[test]
    fn test_malformed_snapshot_starts_empty() {
        let mut slots = MemorySlots::new();
        slots.write(ITEMS_SLOT, "not json at all").unwrap();
        let mut c = Coordinator::new(
            ItemPersistence::new(slots),
            RecordingRenderer::default(),
        );
        c.start();

        assert!(c.store().is_empty());
        assert_eq!(c.renderer().total, Some(0));

        add(&mut c, "Cookie", "400");
        assert_eq!(c.persistence().load().len(), 1);
    }

    #[test]
    fn test_submit_new_after_max_id_is_refused() {
        let mut slots = MemorySlots::new();
        slots
            .write(
                ITEMS_SLOT,
                r#"[{"id":18446744073709551615,"name":"Eggs","calories":300}]"#,
            )
            .unwrap();
        let mut c = Coordinator::new(
            ItemPersistence::new(slots),
            RecordingRenderer::default(),
        );
        c.start();
        let before = c.persistence().backend().read(ITEMS_SLOT).unwrap();

        let err = c
            .dispatch(Intent::SubmitNew(FormInput::new("Cookie", "400")))
            .unwrap_err();

        assert!(matches!(
            err,
            IntentError::Store(StoreError::IdsExhausted(ItemId(u64::MAX)))
        ));
        assert_eq!(c.store().len(), 1);
        assert_eq!(c.persistence().backend().read(ITEMS_SLOT).unwrap(), before);
    }
}
