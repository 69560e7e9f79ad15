// cartsync/src/backend/remote.rs

//! The Remote Table Client seam and an in-process table implementation.

use crate::backend::session::UserIdentity;
use crate::core::input::NewItem;
use crate::core::item::{ItemPatch, StoredItem};
use crate::error::RemoteError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{event, Level};
use uuid::Uuid;

/// Authenticated CRUD against one hosted per-user table (`T::TABLE`).
///
/// Every call is scoped either by the owning user or by the row id. The wire
/// protocol is up to the implementation.
#[async_trait]
pub trait RemoteTable<T: StoredItem>: Send + Sync {
  /// All rows owned by `user`, in insertion order.
  async fn select_all_for_user(&self, user: &UserIdentity) -> Result<Vec<T>, RemoteError>;

  /// Inserts a row for `user` and returns it as stored, with the server-assigned id.
  async fn insert(&self, user: &UserIdentity, new_item: &NewItem) -> Result<T, RemoteError>;

  async fn update_fields(&self, id: &str, patch: &ItemPatch) -> Result<(), RemoteError>;

  /// Deleting an id that does not exist succeeds.
  async fn delete_by_id(&self, id: &str) -> Result<(), RemoteError>;

  async fn delete_all_for_user(&self, user: &UserIdentity) -> Result<(), RemoteError>;
}

/// Remote table operations, used to inject failures and count calls on [`MemoryTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableOp {
  Select,
  Insert,
  Update,
  Delete,
  DeleteAll,
}

struct StoredRow<T> {
  owner: String,
  row: T,
}

struct MemoryTableState<T> {
  rows: Vec<StoredRow<T>>,
  failing: HashSet<TableOp>,
  calls: HashMap<TableOp, usize>,
  latency: Option<Duration>,
}

/// In-process table shared by every clone (like two tabs on the same account).
pub struct MemoryTable<T: StoredItem> {
  state: Arc<Mutex<MemoryTableState<T>>>,
}

impl<T: StoredItem> Clone for MemoryTable<T> {
  fn clone(&self) -> Self {
    Self {
      state: Arc::clone(&self.state),
    }
  }
}

impl<T: StoredItem> Default for MemoryTable<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: StoredItem> MemoryTable<T> {
  pub fn new() -> Self {
    Self {
      state: Arc::new(Mutex::new(MemoryTableState {
        rows: Vec::new(),
        failing: HashSet::new(),
        calls: HashMap::new(),
        latency: None,
      })),
    }
  }

  /// Every call sleeps for `latency` before touching the table.
  pub fn with_latency(self, latency: Duration) -> Self {
    self.state.lock().latency = Some(latency);
    self
  }

  /// Makes `op` fail with a transport error until [`heal`](Self::heal) is called.
  pub fn fail_on(&self, op: TableOp) {
    self.state.lock().failing.insert(op);
  }

  pub fn heal(&self) {
    self.state.lock().failing.clear();
  }

  pub fn calls(&self, op: TableOp) -> usize {
    self.state.lock().calls.get(&op).copied().unwrap_or(0)
  }

  /// Rows owned by `user_id`, bypassing failure injection.
  pub fn rows_for(&self, user_id: &str) -> Vec<T> {
    self
      .state
      .lock()
      .rows
      .iter()
      .filter(|stored| stored.owner == user_id)
      .map(|stored| stored.row.clone())
      .collect()
  }

  /// Inserts a row directly, as another client would.
  pub fn seed(&self, user_id: &str, new_item: &NewItem) -> T {
    let row = T::from_new(Uuid::new_v4().to_string(), new_item);
    self.state.lock().rows.push(StoredRow {
      owner: user_id.to_string(),
      row: row.clone(),
    });
    row
  }

  async fn enter(&self, op: TableOp) -> Result<(), RemoteError> {
    let latency = {
      let mut guard = self.state.lock();
      *guard.calls.entry(op).or_insert(0) += 1;
      guard.latency
    };
    if let Some(latency) = latency {
      tokio::time::sleep(latency).await;
    }
    if self.state.lock().failing.contains(&op) {
      event!(Level::DEBUG, table = T::TABLE, ?op, "Injected remote failure.");
      return Err(RemoteError::Transport(format!("injected failure on {:?} against {}", op, T::TABLE)));
    }
    Ok(())
  }
}

#[async_trait]
impl<T: StoredItem> RemoteTable<T> for MemoryTable<T> {
  async fn select_all_for_user(&self, user: &UserIdentity) -> Result<Vec<T>, RemoteError> {
    self.enter(TableOp::Select).await?;
    Ok(self.rows_for(&user.id))
  }

  async fn insert(&self, user: &UserIdentity, new_item: &NewItem) -> Result<T, RemoteError> {
    self.enter(TableOp::Insert).await?;
    Ok(self.seed(&user.id, new_item))
  }

  async fn update_fields(&self, id: &str, patch: &ItemPatch) -> Result<(), RemoteError> {
    self.enter(TableOp::Update).await?;
    let mut guard = self.state.lock();
    match guard.rows.iter_mut().find(|stored| stored.row.id() == id) {
      Some(stored) => {
        patch.apply_to(&mut stored.row);
        Ok(())
      }
      None => Err(RemoteError::Rejected {
        table: T::TABLE.to_string(),
        message: format!("no row with id {}", id),
      }),
    }
  }

  async fn delete_by_id(&self, id: &str) -> Result<(), RemoteError> {
    self.enter(TableOp::Delete).await?;
    self.state.lock().rows.retain(|stored| stored.row.id() != id);
    Ok(())
  }

  async fn delete_all_for_user(&self, user: &UserIdentity) -> Result<(), RemoteError> {
    self.enter(TableOp::DeleteAll).await?;
    self.state.lock().rows.retain(|stored| stored.owner != user.id);
    Ok(())
  }
}
