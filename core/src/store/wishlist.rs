// cartsync/src/store/wishlist.rs
use crate::core::input::ProductInput;
use crate::core::item::{StoredItem, WishlistItem};
use crate::core::state::ToggleOutcome;
use crate::error::SyncResult;
use crate::store::definition::WishlistStore;
use tracing::instrument;

impl WishlistStore {
  /// Removes the product if it is on the wishlist, adds it otherwise.
  ///
  /// Shares the presence check with `add_item`; the difference is only what
  /// happens when the product is already there.
  #[instrument(name = "WishlistStore::toggle_item", skip_all, fields(product_id = %input.product_id), err(Display))]
  pub async fn toggle_item(&self, input: ProductInput) -> SyncResult<ToggleOutcome<WishlistItem>> {
    let new_item = input.validate(1)?;
    let _permit = self.enter("toggle_item").await;

    let existing = self.items.find_by_product(&new_item.product_id);
    let user = self.resolve_user().await?;

    match existing {
      Some(existing) => {
        self.delete_row(user.as_ref(), existing.id()).await?;
        Ok(ToggleOutcome::Removed(existing))
      }
      None => {
        let row = self.insert_row(user.as_ref(), &new_item).await?;
        Ok(ToggleOutcome::Added(row))
      }
    }
  }
}
