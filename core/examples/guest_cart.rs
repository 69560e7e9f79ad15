// cartsync/examples/guest_cart.rs

use cartsync::{
  CartItem, CartStore, MemoryLocalStore, MemorySession, MemoryTable, ProductInput, StoreOptions, StoredItem, SyncError,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), SyncError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Guest Cart Example ---");

  // 1. Collaborators: nobody signed in, so the local store is authoritative.
  let local = MemoryLocalStore::new();
  let cart = CartStore::new(
    Arc::new(MemorySession::new()),
    Arc::new(MemoryTable::<CartItem>::new()),
    Arc::new(local.clone()),
    StoreOptions::default(),
  );

  // 2. Load once before interacting.
  cart.load().await?;

  // 3. Mutate. Adding the same product twice raises its quantity.
  cart.add_item(ProductInput::new(2u32, 149.0).with_name("Toor Dal 1kg")).await?;
  cart.add_item(ProductInput::new(2u32, 149.0).with_name("Toor Dal 1kg")).await?;
  cart
    .add_item_with_quantity(ProductInput::new("4", 299.0).with_name("Raw Honey 500g"), 3)
    .await?;

  let honey_id = cart.find_by_product("4").map(|item| item.id).unwrap_or_default();
  cart.update_quantity(&honey_id, 1).await?;

  // 4. Render.
  for item in cart.items() {
    info!("{} x{} = {:.2}", item.product_name, item.quantity, item.line_total());
  }
  let summary = cart.summary();
  info!(
    "items {} | subtotal {:.2} | tax {:.2} | total {:.2}",
    summary.item_count, summary.subtotal, summary.tax, summary.total
  );

  // 5. The snapshot a browser would keep under the cart key.
  info!("snapshot: {}", local.raw(CartItem::LOCAL_KEY).unwrap_or_default());
  Ok(())
}
