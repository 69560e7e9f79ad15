// cartsync/src/storefront.rs

//! `Storefront` bundles the cart and the wishlist over one set of collaborators
//! and hosts the operations that span both.

use crate::backend::local::LocalStore;
use crate::backend::remote::RemoteTable;
use crate::backend::session::SessionResolver;
use crate::core::input::ProductInput;
use crate::core::item::{CartItem, WishlistItem};
use crate::core::state::AddOutcome;
use crate::error::SyncResult;
use crate::store::definition::{CartStore, WishlistStore};
use crate::store::options::StoreOptions;
use crate::sync::SessionSync;
use std::sync::Arc;
use tracing::{event, instrument, Level};

pub struct Storefront {
  session: Arc<dyn SessionResolver>,
  cart: Arc<CartStore>,
  wishlist: Arc<WishlistStore>,
}

impl Storefront {
  pub fn new(
    session: Arc<dyn SessionResolver>,
    cart_table: Arc<dyn RemoteTable<CartItem>>,
    wishlist_table: Arc<dyn RemoteTable<WishlistItem>>,
    local: Arc<dyn LocalStore>,
    options: StoreOptions,
  ) -> Self {
    let cart = Arc::new(CartStore::new(
      Arc::clone(&session),
      cart_table,
      Arc::clone(&local),
      options.clone(),
    ));
    let wishlist = Arc::new(WishlistStore::new(Arc::clone(&session), wishlist_table, local, options));
    Self { session, cart, wishlist }
  }

  pub fn cart(&self) -> &Arc<CartStore> {
    &self.cart
  }

  pub fn wishlist(&self) -> &Arc<WishlistStore> {
    &self.wishlist
  }

  /// Loads both stores. Both are attempted; the first error is returned.
  pub async fn load_all(&self) -> SyncResult<()> {
    let cart = self.cart.load().await;
    let wishlist = self.wishlist.load().await;
    cart.and(wishlist).map(|_| ())
  }

  /// A session sync watching both stores. See [`SessionSync::start`].
  pub fn session_sync(&self) -> SessionSync {
    SessionSync::new(Arc::clone(&self.session))
      .watch(self.cart.clone())
      .watch(self.wishlist.clone())
  }

  /// Adds a wishlist row to the cart, then removes it from the wishlist.
  ///
  /// Returns `Ok(None)` if no wishlist row has this id. If the cart add fails
  /// the wishlist is left as it was.
  #[instrument(name = "Storefront::move_to_cart", skip(self), err(Display))]
  pub async fn move_to_cart(&self, wishlist_item_id: &str) -> SyncResult<Option<AddOutcome<CartItem>>> {
    let Some(item) = self.wishlist.find_by_id(wishlist_item_id) else {
      event!(Level::DEBUG, "No wishlist row with this id.");
      return Ok(None);
    };

    let mut input = ProductInput::new(item.product_id.as_str(), item.price).with_name(item.product_name.as_str());
    if let Some(image_url) = &item.image_url {
      input = input.with_image(image_url.as_str());
    }
    let outcome = self.cart.add_item(input).await?;
    self.wishlist.remove_item(wishlist_item_id).await?;
    Ok(Some(outcome))
  }
}
