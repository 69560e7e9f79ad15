// tests/wishlist_tests.rs
mod common;
use cartsync::{AddOutcome, ProductInput, StoredItem, TableOp, ToggleOutcome, WishlistItem};
use common::*;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_guest_toggle_adds_then_removes() {
  setup_tracing();
  let fixture = Fixture::guest();
  let wishlist = fixture.ready_wishlist().await;

  let first = wishlist.toggle_item(ProductInput::new("4", 299.0)).await.unwrap();
  assert!(first.is_present());
  assert_eq!(wishlist.items().len(), 1);
  assert_eq!(wishlist.items()[0].product_id, "4");

  let second = wishlist.toggle_item(ProductInput::new("4", 299.0)).await.unwrap();
  assert!(matches!(second, ToggleOutcome::Removed(ref item) if item.product_id == "4"));
  assert!(wishlist.is_empty());
  assert_eq!(fixture.local.raw(WishlistItem::LOCAL_KEY).as_deref(), Some("[]"));
}

#[tokio::test]
#[serial]
async fn test_add_is_noop_when_already_present() {
  setup_tracing();
  let fixture = Fixture::guest();
  let wishlist = fixture.ready_wishlist().await;

  assert!(matches!(wishlist.add_item(honey()).await.unwrap(), AddOutcome::Inserted(_)));
  assert_eq!(wishlist.add_item(honey()).await.unwrap(), AddOutcome::AlreadyPresent);
  assert_eq!(wishlist.len(), 1);
  assert_eq!(wishlist.items()[0].quantity(), 1);
}

#[tokio::test]
#[serial]
async fn test_signed_in_toggle_round_trips_through_remote() {
  setup_tracing();
  let fixture = Fixture::signed_in(alice());
  let wishlist = fixture.ready_wishlist().await;

  wishlist.toggle_item(lentils()).await.unwrap();
  assert_eq!(fixture.wishlist_table.rows_for(&alice().id).len(), 1);
  assert_eq!(wishlist.items(), fixture.wishlist_table.rows_for(&alice().id));

  wishlist.toggle_item(lentils()).await.unwrap();
  assert!(fixture.wishlist_table.rows_for(&alice().id).is_empty());
  assert!(wishlist.is_empty());
}

#[tokio::test]
#[serial]
async fn test_signed_in_toggle_remove_failure_keeps_item() {
  setup_tracing();
  let fixture = Fixture::signed_in(alice());
  let wishlist = fixture.ready_wishlist().await;
  wishlist.toggle_item(honey()).await.unwrap();

  fixture.wishlist_table.fail_on(TableOp::Delete);
  assert!(wishlist.toggle_item(honey()).await.is_err());
  assert!(wishlist.contains_product("4"));
}

#[tokio::test]
#[serial]
async fn test_wishlist_and_cart_use_separate_snapshots() {
  setup_tracing();
  let fixture = Fixture::guest();
  let cart = fixture.ready_cart().await;
  let wishlist = fixture.ready_wishlist().await;

  cart.add_item(lentils()).await.unwrap();
  wishlist.add_item(honey()).await.unwrap();

  let reopened_wishlist = fixture.ready_wishlist().await;
  assert_eq!(reopened_wishlist.items().len(), 1);
  assert_eq!(reopened_wishlist.items()[0].product_id, "4");
  let reopened_cart = fixture.ready_cart().await;
  assert_eq!(reopened_cart.items()[0].product_id, "2");
}

#[tokio::test]
#[serial]
async fn test_wishlist_clear_removes_snapshot() {
  setup_tracing();
  let fixture = Fixture::guest();
  let wishlist = fixture.ready_wishlist().await;
  wishlist.add_item(honey()).await.unwrap();
  wishlist.add_item(ghee()).await.unwrap();

  wishlist.clear().await.unwrap();
  assert!(wishlist.is_empty());
  assert_eq!(fixture.local.raw(WishlistItem::LOCAL_KEY), None);
}
