// cartsync/src/store/cart.rs

//! Cart-only operations: quantity edits and derived totals.

use crate::core::input::MAX_QUANTITY;
use crate::core::item::CartItem;
use crate::core::state::OrderSummary;
use crate::error::{SyncError, SyncResult};
use crate::store::definition::CartStore;
use tracing::{event, instrument, Level};

impl CartStore {
  /// Sets the quantity of the row `item_id`.
  ///
  /// A quantity of zero or less removes the row, exactly like
  /// [`remove_item`](Self::remove_item). Returns whether the row was in the list;
  /// an unknown id changes nothing and makes no remote call.
  #[instrument(name = "CartStore::update_quantity", skip(self), err(Display))]
  pub async fn update_quantity(&self, item_id: &str, quantity: i64) -> SyncResult<bool> {
    let quantity = match u32::try_from(quantity) {
      Ok(quantity) if quantity <= MAX_QUANTITY => quantity,
      Err(_) if quantity < 0 => 0,
      _ => {
        return Err(SyncError::InvalidArgument(format!(
          "quantity {} exceeds the maximum of {}",
          quantity, MAX_QUANTITY
        )))
      }
    };
    let _permit = self.enter("update_quantity").await;
    let user = self.resolve_user().await?;

    if quantity == 0 {
      event!(Level::DEBUG, "Non-positive quantity; removing row.");
      return self.delete_row(user.as_ref(), item_id).await;
    }

    if self.items.find_by_id(item_id).is_none() {
      event!(Level::DEBUG, "No cart row with this id.");
      return Ok(false);
    }
    self.write_quantity(user.as_ref(), item_id, quantity).await?;
    Ok(true)
  }

  /// Sum of `price × quantity` over every row. Recomputed on each call.
  pub fn total_price(&self) -> f64 {
    self.items.read().iter().map(CartItem::line_total).sum()
  }

  /// Number of units in the cart (the header badge count). Saturates at `u32::MAX`.
  pub fn total_quantity(&self) -> u32 {
    self
      .items
      .read()
      .iter()
      .fold(0u32, |total, item| total.saturating_add(item.quantity))
  }

  /// Subtotal, tax and total using the store's configured tax rate.
  pub fn summary(&self) -> OrderSummary {
    self.summary_with_rate(self.options.tax_rate)
  }

  pub fn summary_with_rate(&self, tax_rate: f64) -> OrderSummary {
    let subtotal = self.total_price();
    let tax = subtotal * tax_rate;
    OrderSummary {
      item_count: self.total_quantity(),
      subtotal,
      tax,
      total: subtotal + tax,
    }
  }
}
