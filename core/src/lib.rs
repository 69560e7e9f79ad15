// src/lib.rs

//! cartsync: cart and wishlist state for storefront clients.
//!
//! An [`ItemStore`] owns the in-memory list a UI renders from and decides, per
//! operation, which backing store is authoritative:
//!  - the hosted per-user table ([`RemoteTable`]) while someone is signed in,
//!  - the browser-style key-value fallback ([`LocalStore`]) for guests.
//!
//! Features:
//!  - One generic store, instantiated as [`CartStore`] and [`WishlistStore`].
//!  - Collaborators injected at construction, with in-process implementations
//!    for tests and offline hosts.
//!  - Mutations that only touch the in-memory list after the backing store
//!    accepted them.
//!  - Optional serialization of concurrent operations per store.
//!  - Reload on sign-in / sign-out via [`SessionSync`], with an opt-in policy
//!    for adopting guest items into the account.

pub mod backend;
pub mod core;
pub mod error;
pub mod store;
pub mod storefront;
pub mod sync;

// --- Re-exports for the Public API ---

pub use crate::core::input::{NewItem, ProductInput, ProductKey, MAX_QUANTITY, UNKNOWN_PRODUCT_NAME};
pub use crate::core::item::{CartItem, ItemPatch, StoredItem, WishlistItem};
pub use crate::core::item_list::ItemList;
pub use crate::core::state::{AddOutcome, LoadState, OrderSummary, ToggleOutcome};

pub use crate::backend::local::{FileLocalStore, LocalStore, MemoryLocalStore};
pub use crate::backend::remote::{MemoryTable, RemoteTable, TableOp};
pub use crate::backend::session::{AuthEvent, AuthListener, MemorySession, SessionResolver, Subscription, UserIdentity};

pub use crate::store::{CartStore, ItemStore, MergePolicy, StoreOptions, WishlistStore, DEFAULT_TAX_RATE};
pub use crate::storefront::Storefront;
pub use crate::sync::{Reloadable, SessionSync, SessionSyncHandle, SessionSyncWorker};

pub use crate::error::{LocalStoreError, RemoteError, SyncError, SyncResult};

/*
    Typical wiring:
    1. Build the collaborators: a `SessionResolver`, one `RemoteTable<CartItem>`,
       one `RemoteTable<WishlistItem>` and a `LocalStore`.
    2. `Storefront::new(...)` with `StoreOptions` (serialization, merge policy, tax rate).
    3. `storefront.load_all().await` once at mount; gate UI interaction on `is_ready()`.
    4. `let (handle, worker) = storefront.session_sync().start();`
       `tokio::spawn(worker.run());` and keep `handle` alive.
    5. Call store operations from UI events; render from `items()` / `summary()`.
*/
