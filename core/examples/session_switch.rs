// cartsync/examples/session_switch.rs

use cartsync::{
  CartItem, MemoryLocalStore, MemorySession, MemoryTable, MergePolicy, ProductInput, StoreOptions, Storefront, SyncError,
  UserIdentity, WishlistItem,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), SyncError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Session Switch Example ---");

  let session = MemorySession::new();
  let storefront = Storefront::new(
    Arc::new(session.clone()),
    Arc::new(MemoryTable::<CartItem>::new()),
    Arc::new(MemoryTable::<WishlistItem>::new()),
    Arc::new(MemoryLocalStore::new()),
    // Keep what the guest collected when they sign in.
    StoreOptions::default().merge_policy(MergePolicy::UnionRemoteWins),
  );
  storefront.load_all().await?;

  // Shop as a guest.
  storefront.cart().add_item(ProductInput::new("2", 149.0).with_name("Toor Dal 1kg")).await?;
  storefront.wishlist().toggle_item(ProductInput::new("3", 449.0).with_name("A2 Ghee 500ml")).await?;
  info!("guest cart: {} rows, wishlist: {} rows", storefront.cart().len(), storefront.wishlist().len());

  // Reload on auth changes in the background.
  let (handle, mut worker) = storefront.session_sync().start();

  session.sign_in(UserIdentity::new("user-42").with_email("shopper@example.com"));
  worker.process_next().await;
  info!(
    "signed in: cart {} rows, wishlist {} rows",
    storefront.cart().len(),
    storefront.wishlist().len()
  );

  if let Some(wish) = storefront.wishlist().items().first() {
    storefront.move_to_cart(&wish.id).await?;
  }
  info!("after move: cart total {:.2}", storefront.cart().total_price());

  session.sign_out();
  worker.process_next().await;
  info!("signed out: cart {} rows (guest snapshot was adopted)", storefront.cart().len());

  handle.shutdown();
  worker.run().await;
  Ok(())
}
