// cartsync/src/core/item_list.rs
use crate::core::item::StoredItem;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, interior-mutable in-memory item list using parking_lot::RwLock.
///
/// IMPORTANT: Lock guards obtained from this struct are blocking and MUST NOT
/// be held across `.await` suspension points. Take a [`snapshot`](Self::snapshot)
/// or finish the edit before calling into a remote collaborator.
#[derive(Debug)]
pub struct ItemList<T: StoredItem>(Arc<RwLock<Vec<T>>>);

impl<T: StoredItem> ItemList<T> {
  pub fn new(items: Vec<T>) -> Self {
    ItemList(Arc::new(RwLock::new(items)))
  }

  /// Acquires a read lock. The guard MUST be dropped before any `.await` point.
  pub fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
    self.0.read()
  }

  /// Acquires a write lock. The guard MUST be dropped before any `.await` point.
  pub fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
    self.0.write()
  }

  /// Owned copy of the current list.
  pub fn snapshot(&self) -> Vec<T> {
    self.0.read().clone()
  }

  pub fn len(&self) -> usize {
    self.0.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.read().is_empty()
  }

  /// Wholesale replacement, used by loads.
  pub fn replace(&self, items: Vec<T>) {
    *self.0.write() = items;
  }

  pub fn find_by_id(&self, id: &str) -> Option<T> {
    self.0.read().iter().find(|item| item.id() == id).cloned()
  }

  pub fn find_by_product(&self, product_id: &str) -> Option<T> {
    self.0.read().iter().find(|item| item.product_id() == product_id).cloned()
  }

  pub fn push(&self, item: T) {
    self.0.write().push(item);
  }

  /// Removes the row with `id`, returning it if it was present.
  pub fn remove_by_id(&self, id: &str) -> Option<T> {
    let mut guard = self.0.write();
    let idx = guard.iter().position(|item| item.id() == id)?;
    Some(guard.remove(idx))
  }

  /// Runs `f` on the row with `id`. Returns false if no such row exists.
  pub fn update_by_id(&self, id: &str, f: impl FnOnce(&mut T)) -> bool {
    let mut guard = self.0.write();
    match guard.iter_mut().find(|item| item.id() == id) {
      Some(item) => {
        f(item);
        true
      }
      None => false,
    }
  }
}

impl<T: StoredItem> Clone for ItemList<T> {
  fn clone(&self) -> Self {
    ItemList(Arc::clone(&self.0))
  }
}

impl<T: StoredItem> Default for ItemList<T> {
  fn default() -> Self {
    Self::new(Vec::new())
  }
}
