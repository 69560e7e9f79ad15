// cartsync/src/store/definition.rs

//! Contains the `ItemStore<T>` struct, its constructor, read accessors and the
//! persistence helpers shared by every operation.

use crate::backend::local::LocalStore;
use crate::backend::remote::RemoteTable;
use crate::backend::session::{SessionResolver, UserIdentity};
use crate::core::item::{CartItem, StoredItem, WishlistItem};
use crate::core::item_list::ItemList;
use crate::core::state::LoadState;
use crate::error::SyncResult;
use crate::store::options::StoreOptions;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};
use tracing::{event, Level};

/// In-memory list of items mirroring whichever backing store is authoritative:
/// the remote table while a user is signed in, the local fallback store otherwise.
///
/// Every operation resolves the session first, then routes to exactly one of the
/// two stores. The in-memory list only changes after the backing store accepted
/// the change, so a failed remote call leaves it untouched.
pub struct ItemStore<T: StoredItem> {
  pub(crate) session: Arc<dyn SessionResolver>,
  pub(crate) remote: Arc<dyn RemoteTable<T>>,
  pub(crate) local: Arc<dyn LocalStore>,
  pub(crate) items: ItemList<T>,
  pub(crate) state: RwLock<LoadState>,
  // Serializes loads and mutations when `options.serialize_mutations` is set.
  pub(crate) gate: AsyncMutex<()>,
  pub(crate) options: StoreOptions,
}

pub type CartStore = ItemStore<CartItem>;
pub type WishlistStore = ItemStore<WishlistItem>;

impl<T: StoredItem> ItemStore<T> {
  pub fn new(
    session: Arc<dyn SessionResolver>,
    remote: Arc<dyn RemoteTable<T>>,
    local: Arc<dyn LocalStore>,
    options: StoreOptions,
  ) -> Self {
    event!(Level::DEBUG, kind = T::KIND, table = T::TABLE, ?options, "Creating item store.");
    Self {
      session,
      remote,
      local,
      items: ItemList::default(),
      state: RwLock::new(LoadState::Uninitialized),
      gate: AsyncMutex::new(()),
      options,
    }
  }

  /// Owned copy of the current items, in list order.
  pub fn items(&self) -> Vec<T> {
    self.items.snapshot()
  }

  /// Shared handle to the live list, for consumers that re-render on demand.
  pub fn item_list(&self) -> ItemList<T> {
    self.items.clone()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn state(&self) -> LoadState {
    *self.state.read()
  }

  pub fn is_ready(&self) -> bool {
    self.state().is_ready()
  }

  pub fn is_loading(&self) -> bool {
    self.state() == LoadState::Loading
  }

  pub fn options(&self) -> &StoreOptions {
    &self.options
  }

  pub fn find_by_id(&self, item_id: &str) -> Option<T> {
    self.items.find_by_id(item_id)
  }

  pub fn find_by_product(&self, product_id: &str) -> Option<T> {
    self.items.find_by_product(product_id)
  }

  pub fn contains_product(&self, product_id: &str) -> bool {
    self.items.find_by_product(product_id).is_some()
  }

  pub(crate) fn set_state(&self, state: LoadState) {
    *self.state.write() = state;
  }

  /// Waits for the operation gate when serialization is on. Mutations issued
  /// before the first load are a caller error; they are logged and allowed.
  pub(crate) async fn enter(&self, operation: &'static str) -> Option<AsyncMutexGuard<'_, ()>> {
    if !self.is_ready() {
      event!(Level::WARN, kind = T::KIND, operation, state = ?self.state(), "Operation issued before the store is ready.");
    }
    if self.options.serialize_mutations {
      Some(self.gate.lock().await)
    } else {
      None
    }
  }

  pub(crate) async fn resolve_user(&self) -> SyncResult<Option<UserIdentity>> {
    self.session.current_user().await
  }

  /// Reads and parses the guest snapshot. Missing, unreadable or malformed
  /// snapshots all yield an empty list.
  pub(crate) fn read_local(&self) -> Vec<T> {
    let raw = match self.local.get_snapshot(T::LOCAL_KEY) {
      Ok(Some(raw)) => raw,
      Ok(None) => return Vec::new(),
      Err(e) => {
        event!(Level::WARN, kind = T::KIND, error = %e, "Failed to read local snapshot.");
        return Vec::new();
      }
    };
    match serde_json::from_str::<Vec<T>>(&raw) {
      Ok(items) => items,
      Err(e) => {
        event!(Level::WARN, kind = T::KIND, error = %e, "Failed to parse local snapshot; treating as empty.");
        Vec::new()
      }
    }
  }

  /// Replaces the in-memory list and writes it to the local store. A failed
  /// write is logged and the in-memory list keeps the new value.
  pub(crate) fn commit_local(&self, updated: Vec<T>) {
    match serde_json::to_string(&updated) {
      Ok(json) => {
        if let Err(e) = self.local.set_snapshot(T::LOCAL_KEY, &json) {
          event!(Level::WARN, kind = T::KIND, error = %e, "Failed to persist local snapshot.");
        }
      }
      Err(e) => {
        event!(Level::WARN, kind = T::KIND, error = %e, "Failed to serialize local snapshot.");
      }
    }
    self.items.replace(updated);
  }
}
