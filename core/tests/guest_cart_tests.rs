// tests/guest_cart_tests.rs
mod common;
use cartsync::{AddOutcome, CartItem, LoadState, MemoryLocalStore, ProductInput, StoredItem};
use common::*;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_guest_cart_scenario_two_adds_and_total() {
  setup_tracing();
  let fixture = Fixture::guest();
  let cart = fixture.ready_cart().await;
  assert!(cart.is_empty());

  let first = cart.add_item(lentils()).await.unwrap();
  assert!(matches!(first, AddOutcome::Inserted(_)));
  let items = cart.items();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].product_id, "2");
  assert_eq!(items[0].quantity, 1);
  assert_eq!(items[0].price, 149.0);

  let second = cart.add_item(ProductInput::new("2", 149.0)).await.unwrap();
  assert_eq!(
    second,
    AddOutcome::Incremented {
      id: items[0].id.clone(),
      quantity: 2
    }
  );
  assert_eq!(cart.items()[0].quantity, 2);
  assert_eq!(cart.total_price(), 298.0);
}

#[tokio::test]
#[serial]
async fn test_repeated_adds_keep_one_row_per_product() {
  setup_tracing();
  let fixture = Fixture::guest();
  let cart = fixture.ready_cart().await;

  for _ in 0..5 {
    cart.add_item(honey()).await.unwrap();
  }
  // Numeric and text ids for the same product land on the same row.
  cart.add_item(ProductInput::new(4u64, 299.0)).await.unwrap();

  let items = cart.items();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].quantity, 6);
  assert_eq!(cart.total_quantity(), 6);
}

#[tokio::test]
#[serial]
async fn test_add_with_quantity_increments_by_that_amount() {
  setup_tracing();
  let fixture = Fixture::guest();
  let cart = fixture.ready_cart().await;

  cart.add_item_with_quantity(ghee(), 3).await.unwrap();
  cart.add_item_with_quantity(ghee(), 2).await.unwrap();

  assert_eq!(cart.items()[0].quantity, 5);
  assert_eq!(cart.total_price(), 449.0 * 5.0);
}

#[tokio::test]
#[serial]
async fn test_update_quantity_zero_equals_remove() {
  setup_tracing();
  let via_update = Fixture::guest();
  let via_remove = Fixture::guest();
  let cart_a = via_update.ready_cart().await;
  let cart_b = via_remove.ready_cart().await;

  for cart in [&cart_a, &cart_b] {
    cart.add_item(lentils()).await.unwrap();
    cart.add_item(honey()).await.unwrap();
  }
  let lentils_a = cart_a.find_by_product("2").unwrap();
  let lentils_b = cart_b.find_by_product("2").unwrap();

  assert!(cart_a.update_quantity(&lentils_a.id, 0).await.unwrap());
  assert!(cart_b.remove_item(&lentils_b.id).await.unwrap());

  let products = |items: Vec<CartItem>| -> Vec<(String, u32)> {
    items.into_iter().map(|i| (i.product_id, i.quantity)).collect()
  };
  assert_eq!(products(cart_a.items()), products(cart_b.items()));
  assert_eq!(products(cart_a.items()), vec![("4".to_string(), 1)]);
}

#[tokio::test]
#[serial]
async fn test_negative_quantity_removes_and_positive_sets() {
  setup_tracing();
  let fixture = Fixture::guest();
  let cart = fixture.ready_cart().await;
  cart.add_item(lentils()).await.unwrap();
  let id = cart.items()[0].id.clone();

  assert!(cart.update_quantity(&id, 7).await.unwrap());
  assert_eq!(cart.items()[0].quantity, 7);

  assert!(cart.update_quantity(&id, -1).await.unwrap());
  assert!(cart.is_empty());
}

#[tokio::test]
#[serial]
async fn test_remove_twice_is_noop_second_time() {
  setup_tracing();
  let fixture = Fixture::guest();
  let cart = fixture.ready_cart().await;
  cart.add_item(lentils()).await.unwrap();
  cart.add_item(honey()).await.unwrap();
  let id = cart.find_by_product("2").unwrap().id;

  assert!(cart.remove_item(&id).await.unwrap());
  let after_first = cart.items();
  assert!(!cart.remove_item(&id).await.unwrap());
  assert_eq!(cart.items(), after_first);
}

#[tokio::test]
#[serial]
async fn test_guest_items_survive_a_fresh_load() {
  setup_tracing();
  let fixture = Fixture::guest();
  let cart = fixture.ready_cart().await;
  cart.add_item(lentils()).await.unwrap();
  cart.add_item(lentils()).await.unwrap();
  cart.add_item(ProductInput::new("9", 12.5)).await.unwrap();
  let before = cart.items();

  // New store instance over the same local store, nobody signed in.
  let reopened = fixture.ready_cart().await;
  assert_eq!(reopened.items(), before);
  assert_eq!(reopened.items()[1].product_name, cartsync::UNKNOWN_PRODUCT_NAME);
}

#[tokio::test]
#[serial]
async fn test_clear_then_load_is_empty() {
  setup_tracing();
  let fixture = Fixture::guest();
  let cart = fixture.ready_cart().await;
  cart.add_item(lentils()).await.unwrap();
  cart.clear().await.unwrap();
  assert!(cart.is_empty());
  assert_eq!(fixture.local.raw(CartItem::LOCAL_KEY), None);

  cart.load().await.unwrap();
  assert!(cart.is_empty());
}

#[tokio::test]
#[serial]
async fn test_malformed_snapshot_loads_empty_and_ready() {
  setup_tracing();
  let fixture = Fixture::guest();
  fixture.local.put_raw(CartItem::LOCAL_KEY, "{not json");
  let cart = fixture.cart();
  assert_eq!(cart.state(), LoadState::Uninitialized);

  assert_eq!(cart.load().await.unwrap(), 0);
  assert!(cart.is_empty());
  assert_eq!(cart.state(), LoadState::Ready);
}

#[tokio::test]
#[serial]
async fn test_quota_failure_keeps_in_memory_mutation() {
  setup_tracing();
  let fixture = Fixture::with_local(MemoryLocalStore::with_quota(8));
  let cart = fixture.ready_cart().await;

  let outcome = cart.add_item(lentils()).await;
  assert!(outcome.is_ok());
  assert_eq!(cart.len(), 1);
  // Nothing was written; a reload falls back to the (absent) snapshot.
  assert_eq!(fixture.local.raw(CartItem::LOCAL_KEY), None);
}

#[tokio::test]
#[serial]
async fn test_snapshot_is_json_array_of_rows() {
  setup_tracing();
  let fixture = Fixture::guest();
  let cart = fixture.ready_cart().await;
  cart.add_item(ProductInput::new("5", 199.0).with_name("Moong Dal 1kg")).await.unwrap();

  let raw = fixture.local.raw(CartItem::LOCAL_KEY).unwrap();
  let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
  let row = &value.as_array().unwrap()[0];
  assert_eq!(row["product_id"], "5");
  assert_eq!(row["product_name"], "Moong Dal 1kg");
  assert_eq!(row["quantity"], 1);
  assert!(row.get("image_url").is_none());
}

#[tokio::test]
#[serial]
async fn test_order_summary_applies_tax() {
  setup_tracing();
  let fixture = Fixture::guest();
  let cart = fixture.ready_cart().await;
  cart.add_item_with_quantity(ProductInput::new("a", 10.0), 2).await.unwrap();
  cart.add_item(ProductInput::new("b", 5.0)).await.unwrap();

  let summary = cart.summary();
  assert_eq!(summary.item_count, 3);
  assert!((summary.subtotal - 25.0).abs() < 1e-9);
  assert!((summary.tax - 2.5).abs() < 1e-9);
  assert!((summary.total - 27.5).abs() < 1e-9);

  let untaxed = cart.summary_with_rate(0.0);
  assert_eq!(untaxed.total, untaxed.subtotal);
}
