// cartsync/src/store/mutation.rs

//! Mutations shared by the cart and the wishlist: add, remove, clear.
//!
//! Each public operation resolves the session once and hands the result to the
//! row helpers below, which talk to exactly one backing store and only then
//! update the in-memory list.

use crate::backend::session::UserIdentity;
use crate::core::input::{NewItem, ProductInput, MAX_QUANTITY};
use crate::core::item::{ItemPatch, StoredItem};
use crate::core::state::AddOutcome;
use crate::error::{SyncError, SyncResult};
use crate::store::definition::ItemStore;
use tracing::{event, instrument, Level};
use uuid::Uuid;

impl<T: StoredItem> ItemStore<T> {
  /// Adds one unit of a product. See [`add_item_with_quantity`](Self::add_item_with_quantity).
  pub async fn add_item(&self, input: ProductInput) -> SyncResult<AddOutcome<T>> {
    self.add_item_with_quantity(input, 1).await
  }

  /// Adds `quantity` units of a product.
  ///
  /// If a row for the same `product_id` exists, a cart row has its quantity
  /// raised by `quantity` and a wishlist reports [`AddOutcome::AlreadyPresent`].
  /// Otherwise a new row is inserted and appended to the list.
  #[instrument(
    name = "ItemStore::add_item",
    skip_all,
    fields(kind = T::KIND, product_id = %input.product_id, quantity = quantity),
    err(Display)
  )]
  pub async fn add_item_with_quantity(&self, input: ProductInput, quantity: u32) -> SyncResult<AddOutcome<T>> {
    let new_item = input.validate(quantity)?;
    let _permit = self.enter("add_item").await;

    // Looked up before the session call; concurrent unserialized adds may both miss.
    let existing = self.items.find_by_product(&new_item.product_id);
    let user = self.resolve_user().await?;

    match existing {
      Some(_) if !T::HAS_QUANTITY => {
        event!(Level::DEBUG, "Product already present; nothing to add.");
        Ok(AddOutcome::AlreadyPresent)
      }
      Some(existing) => {
        let quantity = existing
          .quantity()
          .checked_add(new_item.quantity)
          .filter(|total| *total <= MAX_QUANTITY)
          .ok_or_else(|| {
            SyncError::InvalidArgument(format!(
              "adding {} to row {} would exceed the maximum quantity of {}",
              new_item.quantity,
              existing.id(),
              MAX_QUANTITY
            ))
          })?;
        self.write_quantity(user.as_ref(), existing.id(), quantity).await?;
        Ok(AddOutcome::Incremented {
          id: existing.id().to_string(),
          quantity,
        })
      }
      None => {
        let row = self.insert_row(user.as_ref(), &new_item).await?;
        Ok(AddOutcome::Inserted(row))
      }
    }
  }

  /// Removes the row whose own `id` is `item_id`.
  ///
  /// Returns whether the row was in the list. Removing an unknown id is not an
  /// error. When signed in, the remote delete must succeed before the row leaves
  /// the list.
  #[instrument(name = "ItemStore::remove_item", skip(self), fields(kind = T::KIND), err(Display))]
  pub async fn remove_item(&self, item_id: &str) -> SyncResult<bool> {
    let _permit = self.enter("remove_item").await;
    let user = self.resolve_user().await?;
    self.delete_row(user.as_ref(), item_id).await
  }

  /// Removes every item owned by the current session and empties the list.
  #[instrument(name = "ItemStore::clear", skip_all, fields(kind = T::KIND), err(Display))]
  pub async fn clear(&self) -> SyncResult<()> {
    let _permit = self.enter("clear").await;
    match self.resolve_user().await? {
      Some(user) => {
        self
          .remote
          .delete_all_for_user(&user)
          .await
          .map_err(|e| SyncError::remote("delete_all_for_user", e))?;
      }
      None => {
        if let Err(e) = self.local.delete_snapshot(T::LOCAL_KEY) {
          event!(Level::WARN, error = %e, "Failed to delete local snapshot.");
        }
      }
    }
    self.items.replace(Vec::new());
    event!(Level::INFO, "Cleared all items.");
    Ok(())
  }

  pub(crate) async fn insert_row(&self, user: Option<&UserIdentity>, new_item: &NewItem) -> SyncResult<T> {
    match user {
      Some(user) => {
        let row = self
          .remote
          .insert(user, new_item)
          .await
          .map_err(|e| SyncError::remote("insert", e))?;
        self.items.push(row.clone());
        event!(Level::INFO, item_id = row.id(), product_id = row.product_id(), "Inserted remote row.");
        Ok(row)
      }
      None => {
        let row = T::from_new(Uuid::new_v4().to_string(), new_item);
        let mut updated = self.items.snapshot();
        updated.push(row.clone());
        self.commit_local(updated);
        event!(Level::INFO, item_id = row.id(), product_id = row.product_id(), "Inserted guest row.");
        Ok(row)
      }
    }
  }

  pub(crate) async fn write_quantity(&self, user: Option<&UserIdentity>, item_id: &str, quantity: u32) -> SyncResult<()> {
    match user {
      Some(_) => {
        self
          .remote
          .update_fields(item_id, &ItemPatch::quantity(quantity))
          .await
          .map_err(|e| SyncError::remote("update_fields", e))?;
        self.items.update_by_id(item_id, |item| item.set_quantity(quantity));
      }
      None => {
        let mut updated = self.items.snapshot();
        if let Some(item) = updated.iter_mut().find(|item| item.id() == item_id) {
          item.set_quantity(quantity);
        }
        self.commit_local(updated);
      }
    }
    event!(Level::DEBUG, item_id, quantity, "Quantity written.");
    Ok(())
  }

  pub(crate) async fn delete_row(&self, user: Option<&UserIdentity>, item_id: &str) -> SyncResult<bool> {
    match user {
      Some(_) => {
        self
          .remote
          .delete_by_id(item_id)
          .await
          .map_err(|e| SyncError::remote("delete_by_id", e))?;
        Ok(self.items.remove_by_id(item_id).is_some())
      }
      None => {
        let mut updated = self.items.snapshot();
        let before = updated.len();
        updated.retain(|item| item.id() != item_id);
        if updated.len() == before {
          event!(Level::DEBUG, item_id, "No guest row with this id.");
          return Ok(false);
        }
        self.commit_local(updated);
        Ok(true)
      }
    }
  }
}
