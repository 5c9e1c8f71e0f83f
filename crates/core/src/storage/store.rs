use std::sync::Mutex;

use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::linked_item::LinkedItem;

/// Read/write access to the user's linked items.
///
/// The analytics pipeline only calls `list`; `add`/`remove` belong to the
/// account-linking flow.
pub trait LinkedItemStore: Send + Sync {
    fn list(&self) -> Result<Vec<LinkedItem>, CoreError>;

    /// Insert an item, replacing any stored item with the same id.
    fn add(&self, item: LinkedItem) -> Result<(), CoreError>;

    fn remove(&self, id: Uuid) -> Result<LinkedItem, CoreError>;
}

/// Insert or replace by id, keeping the original position on replace.
pub(crate) fn upsert(items: &mut Vec<LinkedItem>, item: LinkedItem) {
    match items.iter().position(|i| i.id == item.id) {
        Some(idx) => items[idx] = item,
        None => items.push(item),
    }
}

pub(crate) fn take(items: &mut Vec<LinkedItem>, id: Uuid) -> Result<LinkedItem, CoreError> {
    let idx = items
        .iter()
        .position(|i| i.id == id)
        .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
    Ok(items.remove(idx))
}

/// In-process store. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    items: Mutex<Vec<LinkedItem>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<LinkedItem>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }
}

impl LinkedItemStore for MemoryItemStore {
    fn list(&self) -> Result<Vec<LinkedItem>, CoreError> {
        Ok(self.items.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn add(&self, item: LinkedItem) -> Result<(), CoreError> {
        upsert(&mut self.items.lock().unwrap_or_else(|e| e.into_inner()), item);
        Ok(())
    }

    fn remove(&self, id: Uuid) -> Result<LinkedItem, CoreError> {
        take(&mut self.items.lock().unwrap_or_else(|e| e.into_inner()), id)
    }
}
