// tests/storefront_tests.rs
mod common;
use cartsync::{AddOutcome, TableOp};
use common::*;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_move_to_cart_as_guest() {
  setup_tracing();
  let fixture = Fixture::guest();
  let storefront = fixture.storefront();
  storefront.load_all().await.unwrap();
  storefront.wishlist().add_item(honey()).await.unwrap();
  let wish_id = storefront.wishlist().items()[0].id.clone();

  let outcome = storefront.move_to_cart(&wish_id).await.unwrap();
  match outcome {
    Some(AddOutcome::Inserted(row)) => {
      assert_eq!(row.product_id, "4");
      assert_eq!(row.product_name, "Raw Honey 500g");
      assert_eq!(row.image_url.as_deref(), Some("/golden-honey-jar.png"));
    }
    other => panic!("Expected Some(Inserted), got {:?}", other),
  }
  assert!(storefront.wishlist().is_empty());
  assert_eq!(storefront.cart().total_price(), 299.0);
}

#[tokio::test]
#[serial]
async fn test_move_to_cart_increments_existing_cart_row() {
  setup_tracing();
  let fixture = Fixture::signed_in(alice());
  let storefront = fixture.storefront();
  storefront.load_all().await.unwrap();
  storefront.cart().add_item(lentils()).await.unwrap();
  storefront.wishlist().add_item(lentils()).await.unwrap();
  let wish_id = storefront.wishlist().items()[0].id.clone();

  let outcome = storefront.move_to_cart(&wish_id).await.unwrap();
  assert!(matches!(outcome, Some(AddOutcome::Incremented { quantity: 2, .. })));
  assert!(fixture.wishlist_table.rows_for(&alice().id).is_empty());
}

#[tokio::test]
#[serial]
async fn test_move_to_cart_unknown_id_is_none() {
  setup_tracing();
  let fixture = Fixture::guest();
  let storefront = fixture.storefront();
  storefront.load_all().await.unwrap();
  assert_eq!(storefront.move_to_cart("nope").await.unwrap(), None);
  assert!(storefront.cart().is_empty());
}

#[tokio::test]
#[serial]
async fn test_move_to_cart_failure_keeps_wishlist_row() {
  setup_tracing();
  let fixture = Fixture::signed_in(alice());
  let storefront = fixture.storefront();
  storefront.load_all().await.unwrap();
  storefront.wishlist().add_item(ghee()).await.unwrap();
  let wish_id = storefront.wishlist().items()[0].id.clone();

  fixture.cart_table.fail_on(TableOp::Insert);
  assert!(storefront.move_to_cart(&wish_id).await.is_err());
  assert!(storefront.wishlist().contains_product("3"));
  assert!(storefront.cart().is_empty());
}

#[tokio::test]
#[serial]
async fn test_load_all_reports_failure_but_loads_both() {
  setup_tracing();
  let fixture = Fixture::signed_in(alice());
  fixture.wishlist_table.seed(&alice().id, &honey().validate(1).unwrap());
  fixture.cart_table.fail_on(TableOp::Select);
  let storefront = fixture.storefront();

  assert!(storefront.load_all().await.is_err());
  assert!(storefront.cart().is_ready());
  assert!(storefront.wishlist().is_ready());
  assert_eq!(storefront.wishlist().len(), 1);
}
