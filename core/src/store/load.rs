// cartsync/src/store/load.rs

//! `ItemStore::load()` and the guest-item adoption run on sign-in.

use crate::backend::session::UserIdentity;
use crate::core::item::StoredItem;
use crate::core::state::LoadState;
use crate::error::{SyncError, SyncResult};
use crate::store::definition::ItemStore;
use std::collections::HashSet;
use tracing::{event, instrument, Level};

impl<T: StoredItem> ItemStore<T> {
  /// Replaces the in-memory list with the contents of the authoritative store.
  ///
  /// Signed in: every remote row owned by the user. Guest: the local snapshot,
  /// or nothing if it is missing or malformed. The store is `Ready` afterwards
  /// even when the load failed; in that case the list is left empty and the
  /// error is returned.
  ///
  /// Returns the number of items loaded.
  #[instrument(name = "ItemStore::load", skip_all, fields(kind = T::KIND), err(Display))]
  pub async fn load(&self) -> SyncResult<usize> {
    let _permit = if self.options.serialize_mutations {
      Some(self.gate.lock().await)
    } else {
      None
    };
    self.set_state(LoadState::Loading);
    let result = self.load_from_authoritative().await;
    if result.is_err() {
      self.items.replace(Vec::new());
    }
    self.set_state(LoadState::Ready);
    result
  }

  async fn load_from_authoritative(&self) -> SyncResult<usize> {
    match self.resolve_user().await? {
      Some(user) => {
        let rows = self
          .remote
          .select_all_for_user(&user)
          .await
          .map_err(|e| SyncError::remote("select_all_for_user", e))?;
        let count = rows.len();
        self.items.replace(rows);
        event!(Level::INFO, kind = T::KIND, user_id = %user.id, count, "Loaded items from remote table.");
        Ok(count)
      }
      None => {
        let items = self.read_local();
        let count = items.len();
        self.items.replace(items);
        event!(Level::INFO, kind = T::KIND, count, "Loaded items from local snapshot.");
        Ok(count)
      }
    }
  }

  /// Copies guest items into `user`'s remote table.
  ///
  /// Items whose `product_id` the account already holds are skipped (the
  /// account's row wins). The guest snapshot is deleted once every remaining
  /// item was inserted; on a failed insert it is kept so a later sign-in can
  /// retry without duplicating what already made it across.
  ///
  /// Does not touch the in-memory list; call [`load`](Self::load) afterwards.
  #[instrument(name = "ItemStore::adopt_guest_items", skip_all, fields(kind = T::KIND, user_id = %user.id), err(Display))]
  pub async fn adopt_guest_items(&self, user: &UserIdentity) -> SyncResult<usize> {
    let _permit = self.enter("adopt_guest_items").await;
    let guest_items = self.read_local();
    if guest_items.is_empty() {
      return Ok(0);
    }

    let remote_rows = self
      .remote
      .select_all_for_user(user)
      .await
      .map_err(|e| SyncError::remote("select_all_for_user", e))?;
    let mut owned: HashSet<String> = remote_rows.iter().map(|row| row.product_id().to_string()).collect();

    let mut adopted = 0;
    for guest in &guest_items {
      if !owned.insert(guest.product_id().to_string()) {
        event!(Level::DEBUG, product_id = guest.product_id(), "Account already holds product; keeping remote row.");
        continue;
      }
      self
        .remote
        .insert(user, &guest.to_new())
        .await
        .map_err(|e| SyncError::remote("insert", e))?;
      adopted += 1;
    }

    if let Err(e) = self.local.delete_snapshot(T::LOCAL_KEY) {
      event!(Level::WARN, kind = T::KIND, error = %e, "Failed to delete adopted guest snapshot.");
    }
    event!(Level::INFO, adopted, skipped = guest_items.len() - adopted, "Adopted guest items into account.");
    Ok(adopted)
  }
}
