// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use cartsync::{
  CartItem, CartStore, MemoryLocalStore, MemorySession, MemoryTable, ProductInput, StoreOptions, Storefront,
  UserIdentity, WishlistItem, WishlistStore,
};
use std::sync::Arc;
use tracing::Level;

// --- Common Fixture ---

/// Every collaborator of a storefront, kept as concrete in-process types so
/// tests can drive sign-in, inject remote failures and inspect persisted state.
pub struct Fixture {
  pub session: MemorySession,
  pub cart_table: MemoryTable<CartItem>,
  pub wishlist_table: MemoryTable<WishlistItem>,
  pub local: MemoryLocalStore,
  pub options: StoreOptions,
}

impl Fixture {
  pub fn guest() -> Self {
    Self::with_local(MemoryLocalStore::new())
  }

  pub fn with_local(local: MemoryLocalStore) -> Self {
    Self {
      session: MemorySession::new(),
      cart_table: MemoryTable::new(),
      wishlist_table: MemoryTable::new(),
      local,
      options: StoreOptions::default(),
    }
  }

  pub fn signed_in(user: UserIdentity) -> Self {
    let fixture = Self::guest();
    let session = MemorySession::signed_in(user);
    Self { session, ..fixture }
  }

  pub fn options(mut self, options: StoreOptions) -> Self {
    self.options = options;
    self
  }

  pub fn cart(&self) -> CartStore {
    CartStore::new(
      Arc::new(self.session.clone()),
      Arc::new(self.cart_table.clone()),
      Arc::new(self.local.clone()),
      self.options.clone(),
    )
  }

  pub fn wishlist(&self) -> WishlistStore {
    WishlistStore::new(
      Arc::new(self.session.clone()),
      Arc::new(self.wishlist_table.clone()),
      Arc::new(self.local.clone()),
      self.options.clone(),
    )
  }

  pub fn storefront(&self) -> Storefront {
    Storefront::new(
      Arc::new(self.session.clone()),
      Arc::new(self.cart_table.clone()),
      Arc::new(self.wishlist_table.clone()),
      Arc::new(self.local.clone()),
      self.options.clone(),
    )
  }

  /// A cart that already finished its first load.
  pub async fn ready_cart(&self) -> CartStore {
    let cart = self.cart();
    cart.load().await.expect("initial cart load");
    cart
  }

  pub async fn ready_wishlist(&self) -> WishlistStore {
    let wishlist = self.wishlist();
    wishlist.load().await.expect("initial wishlist load");
    wishlist
  }
}

// --- Common Inputs ---

pub fn alice() -> UserIdentity {
  UserIdentity::new("user-alice").with_email("alice@example.com")
}

pub fn bob() -> UserIdentity {
  UserIdentity::new("user-bob")
}

/// Products from the sample catalog.
pub fn lentils() -> ProductInput {
  ProductInput::new("2", 149.0)
    .with_name("Organic Red Lentils 500g")
    .with_image("/red-lentils.jpg")
}

pub fn honey() -> ProductInput {
  ProductInput::new("4", 299.0)
    .with_name("Raw Honey 500g")
    .with_image("/golden-honey-jar.png")
}

pub fn ghee() -> ProductInput {
  ProductInput::new(3u64, 449.0).with_name("Pure Ghee 500ml")
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
