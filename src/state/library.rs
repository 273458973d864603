use std::collections::HashSet;
use thiserror::Error;

use super::data::{Item, ItemId};
use super::form::ValidatedDraft;
use super::storage::{Storage, StorageError};

/// Storage key holding the serialized item list
pub const ITEMS_KEY: &str = "items";

/// Errors raised by the library
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("saved catalog is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("failed to serialize catalog: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("an item with id {0} already exists")]
    DuplicateId(ItemId),

    #[error("item {0} has no cover image")]
    MissingCoverImage(ItemId),

    #[error("no item id left after {0}")]
    IdsExhausted(ItemId),
}

/// The Library owns the ordered, append-only list of catalog items.
///
/// Every successful append rewrites the whole list under [`ITEMS_KEY`].
/// Readers only ever get an immutable slice.
pub struct Library {
    storage: Box<dyn Storage>,
    items: Vec<Item>,
    recovered_from_corrupt: bool,
}

impl Library {
    /// Restore the library from storage.
    ///
    /// Missing data means an empty library. Corrupt data is logged and the
    /// library starts empty; the bad value stays in storage until the next
    /// append overwrites it. Read failures are propagated.
    pub fn load(storage: Box<dyn Storage>) -> Result<Self, LibraryError> {
        let mut library = Library::empty(storage);
        library.reload()?;
        Ok(library)
    }

    /// An empty library over `storage`, without reading what it holds
    pub fn empty(storage: Box<dyn Storage>) -> Self {
        Library {
            storage,
            items: Vec::new(),
            recovered_from_corrupt: false,
        }
    }

    /// Like [`Library::load`], but corrupt data is an error
    pub fn load_strict(storage: Box<dyn Storage>) -> Result<Self, LibraryError> {
        let items = read_items(storage.as_ref())?;
        tracing::info!(count = items.len(), "catalog loaded");
        Ok(Library {
            storage,
            items,
            recovered_from_corrupt: false,
        })
    }

    /// Replace the in-memory list with what storage currently holds
    pub fn reload(&mut self) -> Result<(), LibraryError> {
        match read_items(self.storage.as_ref()) {
            Ok(items) => {
                tracing::info!(count = items.len(), "catalog loaded");
                self.items = items;
                self.recovered_from_corrupt = false;
                Ok(())
            }
            Err(err @ (LibraryError::Corrupt(_)
            | LibraryError::DuplicateId(_)
            | LibraryError::MissingCoverImage(_))) => {
                tracing::warn!(error = %err, "saved catalog is unreadable, starting empty");
                self.items.clear();
                self.recovered_from_corrupt = true;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Create an item from a validated draft and append it.
    ///
    /// Returns the id assigned to the new item.
    pub fn add(&mut self, draft: ValidatedDraft) -> Result<ItemId, LibraryError> {
        let last = self.items.iter().map(|item| item.id).max();
        let Some(id) = ItemId::generate(last) else {
            return Err(LibraryError::IdsExhausted(last.unwrap_or(ItemId(i64::MAX))));
        };
        let item = draft.into_item(id);
        self.append(item)?;
        Ok(id)
    }

    /// Append `item` to the end of the list and persist the full list.
    ///
    /// A duplicate id or a blank cover image is rejected without touching
    /// the list or storage. If the write fails the item is kept in memory
    /// for the rest of the session and the storage error is returned.
    pub fn append(&mut self, item: Item) -> Result<(), LibraryError> {
        check_item(&item)?;
        if self.get(item.id).is_some() {
            return Err(LibraryError::DuplicateId(item.id));
        }

        let id = item.id;
        self.items.push(item);

        if let Err(err) = self.persist() {
            tracing::warn!(%id, error = %err, "item kept in memory but not saved");
            return Err(err);
        }

        tracing::info!(%id, count = self.items.len(), "item added");
        Ok(())
    }

    fn persist(&self) -> Result<(), LibraryError> {
        let json = serde_json::to_string(&self.items).map_err(LibraryError::Serialize)?;
        self.storage.set(ITEMS_KEY, &json)?;
        Ok(())
    }

    /// Snapshot of all items in insertion order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Look up an item by id
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the last load discarded unreadable saved data
    pub fn recovered_from_corrupt(&self) -> bool {
        self.recovered_from_corrupt
    }
}

/// Every stored item needs a cover image
fn check_item(item: &Item) -> Result<(), LibraryError> {
    if item.cover_image.trim().is_empty() {
        return Err(LibraryError::MissingCoverImage(item.id));
    }
    Ok(())
}

fn read_items(storage: &dyn Storage) -> Result<Vec<Item>, LibraryError> {
    let Some(json) = storage.get(ITEMS_KEY)? else {
        return Ok(Vec::new());
    };

    let items: Vec<Item> = serde_json::from_str(&json).map_err(LibraryError::Corrupt)?;
    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        check_item(item)?;
        if !seen.insert(item.id) {
            return Err(LibraryError::DuplicateId(item.id));
        }
    }
    Ok(items)
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("items", &self.items.len())
            .field("recovered_from_corrupt", &self.recovered_from_corrupt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::ItemType;
    use crate::state::form::{validate, Draft};
    use crate::state::storage::{MemoryStorage, SqliteStorage};
    use std::rc::Rc;

    /// Storage whose writes always fail
    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    /// Storage shared between two libraries to observe what was written
    #[derive(Clone, Default)]
    struct SharedStorage(Rc<MemoryStorage>);

    impl Storage for SharedStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.set(key, value)
        }
    }

    fn draft(name: &str) -> ValidatedDraft {
        let draft = Draft {
            name: name.to_string(),
            item_type: Some(ItemType::Shoes),
            description: "Trail runners".to_string(),
            cover_image: "https://example.com/cover.jpg".to_string(),
            additional_images: vec!["https://example.com/side.jpg".to_string()],
        };
        validate(&draft).unwrap()
    }

    fn item(id: i64) -> Item {
        Item {
            id: ItemId(id),
            name: format!("item {id}"),
            item_type: ItemType::Other,
            description: "desc".to_string(),
            cover_image: "cover".to_string(),
            additional_images: Vec::new(),
        }
    }

    #[test]
    fn test_load_empty_storage() {
        let library = Library::load(Box::new(MemoryStorage::new())).unwrap();
        assert!(library.is_empty());
        assert!(!library.recovered_from_corrupt());
    }

    #[test]
    fn test_add_appends_with_unique_ids() {
        let mut library = Library::load(Box::new(MemoryStorage::new())).unwrap();

        let first = library.add(draft("first")).unwrap();
        let second = library.add(draft("second")).unwrap();

        assert_eq!(library.len(), 2);
        assert_ne!(first, second);
        assert_eq!(library.items().last().unwrap().id, second);
        assert_eq!(library.items().last().unwrap().name, "second");
    }

    #[test]
    fn test_round_trip_through_storage() {
        let shared = SharedStorage::default();
        let mut library = Library::load(Box::new(shared.clone())).unwrap();
        library.add(draft("a")).unwrap();
        library.add(draft("b")).unwrap();
        library.append(item(1)).unwrap();

        let restored = Library::load(Box::new(shared)).unwrap();
        assert_eq!(restored.items(), library.items());
    }

    #[test]
    fn test_round_trip_through_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");

        let saved = {
            let storage = SqliteStorage::open(&path).unwrap();
            let mut library = Library::load(Box::new(storage)).unwrap();
            library.add(draft("boots")).unwrap();
            library.items().to_vec()
        };

        let storage = SqliteStorage::open(&path).unwrap();
        let library = Library::load_strict(Box::new(storage)).unwrap();
        assert_eq!(library.items(), saved.as_slice());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut library = Library::load(Box::new(MemoryStorage::new())).unwrap();
        library.append(item(7)).unwrap();

        let err = library.append(item(7)).unwrap_err();
        assert!(matches!(err, LibraryError::DuplicateId(ItemId(7))));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_corrupt_data_starts_empty() {
        let storage = MemoryStorage::new();
        storage.set(ITEMS_KEY, "{not json").unwrap();

        let library = Library::load(Box::new(storage)).unwrap();
        assert!(library.is_empty());
        assert!(library.recovered_from_corrupt());
    }

    #[test]
    fn test_blank_cover_image_rejected() {
        let shared = SharedStorage::default();
        let mut library = Library::load(Box::new(shared.clone())).unwrap();

        let mut blank = item(4);
        blank.cover_image = "  ".to_string();

        let err = library.append(blank).unwrap_err();
        assert!(matches!(err, LibraryError::MissingCoverImage(ItemId(4))));
        assert!(library.is_empty());
        assert_eq!(shared.get(ITEMS_KEY).unwrap(), None);
    }

    #[test]
    fn test_saved_item_without_cover_is_corrupt() {
        let storage = MemoryStorage::new();
        storage
            .set(
                ITEMS_KEY,
                r#"[{"id":1,"name":"n","type":"Other","description":"d","coverImage":""}]"#,
            )
            .unwrap();

        let err = Library::load_strict(Box::new(storage)).unwrap_err();
        assert!(matches!(err, LibraryError::MissingCoverImage(ItemId(1))));
    }

    #[test]
    fn test_saved_duplicate_ids_start_empty() {
        let storage = MemoryStorage::new();
        let json = serde_json::to_string(&[item(2), item(2)]).unwrap();
        storage.set(ITEMS_KEY, &json).unwrap();

        let library = Library::load(Box::new(storage)).unwrap();
        assert!(library.is_empty());
        assert!(library.recovered_from_corrupt());
    }

    #[test]
    fn test_add_after_max_id_fails_cleanly() {
        let mut library = Library::load(Box::new(MemoryStorage::new())).unwrap();
        library.append(item(i64::MAX)).unwrap();

        let err = library.add(draft("late")).unwrap_err();
        assert!(matches!(err, LibraryError::IdsExhausted(ItemId(i64::MAX))));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_corrupt_data_strict_load_fails() {
        let storage = MemoryStorage::new();
        storage.set(ITEMS_KEY, "[{\"id\":1}]").unwrap();

        let err = Library::load_strict(Box::new(storage)).unwrap_err();
        assert!(matches!(err, LibraryError::Corrupt(_)));
    }

    #[test]
    fn test_append_after_corruption_overwrites() {
        let shared = SharedStorage::default();
        shared.set(ITEMS_KEY, "garbage").unwrap();

        let mut library = Library::load(Box::new(shared.clone())).unwrap();
        library.append(item(3)).unwrap();

        let restored = Library::load_strict(Box::new(shared)).unwrap();
        assert_eq!(restored.items(), &[item(3)]);
    }

    #[test]
    fn test_failed_write_keeps_item_in_memory() {
        let mut library = Library::load(Box::new(ReadOnlyStorage)).unwrap();

        let err = library.append(item(9)).unwrap_err();
        assert!(matches!(err, LibraryError::Storage(StorageError::Unavailable(_))));
        assert_eq!(library.items(), &[item(9)]);
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let shared = SharedStorage::default();
        let mut library = Library::load(Box::new(shared.clone())).unwrap();

        let mut other = Library::load(Box::new(shared)).unwrap();
        other.append(item(11)).unwrap();

        assert!(library.is_empty());
        library.reload().unwrap();
        assert_eq!(library.items(), &[item(11)]);
        assert!(library.get(ItemId(11)).is_some());
    }
}
