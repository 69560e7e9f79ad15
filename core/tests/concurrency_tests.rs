// tests/concurrency_tests.rs
mod common;
use cartsync::{CartItem, MemoryTable, StoreOptions};
use common::*;
use serial_test::serial;
use std::time::Duration;

fn slow_fixture(options: StoreOptions) -> Fixture {
  let mut fixture = Fixture::signed_in(alice()).options(options);
  fixture.cart_table = MemoryTable::<CartItem>::new().with_latency(Duration::from_millis(20));
  fixture.cart_table.seed(&alice().id, &lentils().validate(1).unwrap());
  fixture
}

#[tokio::test]
#[serial]
async fn test_serialized_adds_both_count() {
  setup_tracing();
  let fixture = slow_fixture(StoreOptions::default());
  let cart = fixture.ready_cart().await;

  let (a, b) = tokio::join!(cart.add_item(lentils()), cart.add_item(lentils()));
  a.unwrap();
  b.unwrap();

  assert_eq!(cart.items()[0].quantity, 3);
  assert_eq!(fixture.cart_table.rows_for(&alice().id)[0].quantity, 3);
}

#[tokio::test]
#[serial]
async fn test_unserialized_adds_are_last_writer_wins() {
  setup_tracing();
  let fixture = slow_fixture(StoreOptions::default().serialize_mutations(false));
  let cart = fixture.ready_cart().await;

  let (a, b) = tokio::join!(cart.add_item(lentils()), cart.add_item(lentils()));
  a.unwrap();
  b.unwrap();

  // Both calls started from quantity 1; one increment is lost.
  assert_eq!(cart.items()[0].quantity, 2);
  assert_eq!(fixture.cart_table.rows_for(&alice().id)[0].quantity, 2);
}

#[tokio::test]
#[serial]
async fn test_serialized_remove_then_update_sees_removal() {
  setup_tracing();
  let fixture = slow_fixture(StoreOptions::default());
  let cart = fixture.ready_cart().await;
  let id = cart.items()[0].id.clone();

  let (removed, updated) = tokio::join!(cart.remove_item(&id), cart.update_quantity(&id, 5));
  assert!(removed.unwrap());
  // The update queued behind the removal and found nothing to update.
  assert!(!updated.unwrap());
  assert!(cart.is_empty());
  assert!(fixture.cart_table.rows_for(&alice().id).is_empty());
}

#[tokio::test]
#[serial]
async fn test_load_waits_for_in_flight_mutation() {
  setup_tracing();
  let fixture = slow_fixture(StoreOptions::default());
  let cart = fixture.ready_cart().await;

  let (added, loaded) = tokio::join!(cart.add_item(honey()), cart.load());
  added.unwrap();
  assert_eq!(loaded.unwrap(), 2);
  assert_eq!(cart.len(), 2);
}
