pub mod input;
pub mod item;
pub mod item_list;
pub mod state;

pub use input::{NewItem, ProductInput, ProductKey};
pub use item::{CartItem, ItemPatch, StoredItem, WishlistItem};
pub use item_list::ItemList;
pub use state::{AddOutcome, LoadState, OrderSummary, ToggleOutcome};
