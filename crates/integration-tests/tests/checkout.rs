//! Integration tests for cart validation and order placement.
//!
//! These tests require a running `PostgreSQL` database; see the crate docs.

use bookshop_core::{
    BookId, Cart, CartError, CheckoutDetails, PaymentCard, ShippingAddress, UserId,
};
use bookshop_integration_tests::{
    TestContext, insert_book, insert_user, stock_and_counter, test_pool,
};
use bookshop_storefront::db::{OrderError, OrderRepository};

fn details() -> CheckoutDetails {
    CheckoutDetails {
        address: ShippingAddress {
            name: "Ada Reader".to_string(),
            street: "1 Library Lane".to_string(),
            town: "Booktown".to_string(),
            postcode: "BK1 2AB".to_string(),
        },
        card: PaymentCard::new(4_111_111_111_111_111, 123).expect("valid test card"),
    }
}

fn cart_of(ids: &[BookId]) -> Cart {
    ids.iter().copied().collect()
}

async fn order_count(pool: &sqlx::PgPool, owner: UserId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM purchase WHERE purchase_user_id = $1")
        .bind(owner)
        .fetch_one(pool)
        .await
        .expect("count query failed")
}

// =============================================================================
// Order Writer
// =============================================================================

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_checkout_writes_order_and_adjusts_stock() {
    let pool = test_pool().await;
    let a = insert_book(&pool, "Book A", "5.00", 5).await;
    let b = insert_book(&pool, "Book B", "10.00", 5).await;
    let owner = insert_user(&pool).await;

    let order_id = OrderRepository::new(&pool)
        .place_order(owner, &cart_of(&[a, a, b]), &details())
        .await
        .expect("order should be placed");

    let lines: Vec<(BookId, i32)> = sqlx::query_as(
        "SELECT item_id, quantity FROM purchased_item WHERE purchase_id = $1 ORDER BY item_id",
    )
    .bind(order_id)
    .fetch_all(&pool)
    .await
    .expect("line query failed");
    assert_eq!(lines, vec![(a, 2), (b, 1)]);

    let (ship_to, payment): (String, String) = sqlx::query_as(
        "SELECT purchase_ship_to, purchase_payment FROM purchase WHERE purchase_id = $1",
    )
    .bind(order_id)
    .fetch_one(&pool)
    .await
    .expect("header query failed");
    assert_eq!(ship_to, "Ada Reader, 1 Library Lane, Booktown, BK1 2AB");
    assert_eq!(payment, "4111111111111111, 123");

    assert_eq!(stock_and_counter(&pool, a).await, (3, 2));
    assert_eq!(stock_and_counter(&pool, b).await, (4, 1));

    let history = OrderRepository::new(&pool)
        .list_for_user(owner)
        .await
        .expect("history query failed");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].units(), 3);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_empty_cart_creates_no_order() {
    let pool = test_pool().await;
    let owner = insert_user(&pool).await;

    let result = OrderRepository::new(&pool)
        .place_order(owner, &Cart::new(), &details())
        .await;

    match result {
        Err(OrderError::Rejected(rejection)) => {
            assert!(matches!(rejection.errors(), [CartError::EmptyCart]));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(order_count(&pool, owner).await, 0);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_short_stock_rejects_whole_order() {
    let pool = test_pool().await;
    let plenty = insert_book(&pool, "Plenty", "3.00", 10).await;
    let scarce = insert_book(&pool, "Scarce", "7.00", 1).await;
    let owner = insert_user(&pool).await;

    let result = OrderRepository::new(&pool)
        .place_order(owner, &cart_of(&[plenty, scarce, scarce]), &details())
        .await;

    match result {
        Err(OrderError::Rejected(rejection)) => {
            assert_eq!(
                rejection.notices(),
                vec!["We only have 1 copy of Scarce in stock.".to_string()]
            );
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    // Nothing was written for either book.
    assert_eq!(order_count(&pool, owner).await, 0);
    assert_eq!(stock_and_counter(&pool, plenty).await, (10, 0));
    assert_eq!(stock_and_counter(&pool, scarce).await, (1, 0));
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_concurrent_checkouts_cannot_oversell() {
    let pool = test_pool().await;
    let last_copy = insert_book(&pool, "Last Copy", "12.00", 1).await;
    let first = insert_user(&pool).await;
    let second = insert_user(&pool).await;

    let cart = cart_of(&[last_copy]);
    let details = details();
    let orders = OrderRepository::new(&pool);
    let (r1, r2) = tokio::join!(
        orders.place_order(first, &cart, &details),
        orders.place_order(second, &cart, &details),
    );

    assert_eq!(
        usize::from(r1.is_ok()) + usize::from(r2.is_ok()),
        1,
        "exactly one checkout should win: {r1:?} {r2:?}"
    );
    assert_eq!(stock_and_counter(&pool, last_copy).await, (0, 1));
}

// =============================================================================
// Checkout over HTTP
// =============================================================================

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_anonymous_checkout_over_http() {
    let ctx = TestContext::new().await;
    let a = insert_book(&ctx.pool, "Http Book A", "5.00", 5).await;
    let b = insert_book(&ctx.pool, "Http Book B", "10.00", 5).await;

    ctx.page(&format!("/add_to_cart/{a}")).await;
    ctx.page(&format!("/add_to_cart/{a}")).await;
    let cart_page = ctx.page(&format!("/add_to_cart/{b}")).await;
    assert!(cart_page.contains("Http Book B has been added to your shopping cart."));
    assert!(cart_page.contains("$20.00"));

    let town = format!("Town {a}");
    let home = ctx
        .client
        .post(ctx.url("/checkout"))
        .form(&[
            ("ship_name", "Anon Buyer"),
            ("ship_street", "2 Side Street"),
            ("ship_town", town.as_str()),
            ("ship_postcode", "AB12 3CD"),
            ("card_number", "4000123412341234"),
            ("card_ccv", "7"),
        ])
        .send()
        .await
        .expect("checkout request failed")
        .text()
        .await
        .expect("body was not text");
    assert!(home.contains("Purchase successful"), "{home}");

    let (owner, payment): (UserId, String) = sqlx::query_as(
        "SELECT purchase_user_id, purchase_payment FROM purchase WHERE purchase_ship_to LIKE $1",
    )
    .bind(format!("%, {town}, %"))
    .fetch_one(&ctx.pool)
    .await
    .expect("order not recorded");
    assert_eq!(owner, UserId::ANONYMOUS);
    assert_eq!(payment, "4000123412341234, 007");

    assert_eq!(stock_and_counter(&ctx.pool, a).await, (3, 2));
    assert_eq!(stock_and_counter(&ctx.pool, b).await, (4, 1));

    let cart_page = ctx.page("/cart").await;
    assert!(cart_page.contains("Your cart is empty."));
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_checkout_with_empty_cart_redirects_with_notice() {
    let ctx = TestContext::new().await;

    let body = ctx.page("/checkout").await;
    assert!(body.contains("There are no items in your cart."));
    assert!(body.contains("Your cart"));
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_out_of_stock_checkout_reports_each_problem() {
    let ctx = TestContext::new().await;
    let gone = insert_book(&ctx.pool, "Gone Book", "4.00", 0).await;
    let short = insert_book(&ctx.pool, "Short Book", "6.00", 2).await;

    ctx.page(&format!("/add_to_cart/{gone}")).await;
    for _ in 0..3 {
        ctx.page(&format!("/add_to_cart/{short}")).await;
    }

    let body = ctx.page("/checkout").await;
    assert!(body.contains("Gone Book is out of stock and cannot be purchased."));
    assert!(body.contains("We only have 2 copies of Short Book in stock."));
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_add_unknown_book_to_cart_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .get(ctx.url("/add_to_cart/2147483000"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_add_then_remove_leaves_cart_empty() {
    let ctx = TestContext::new().await;
    let book = insert_book(&ctx.pool, "Round Trip", "2.50", 3).await;

    ctx.page(&format!("/add_to_cart/{book}")).await;
    let body = ctx.page(&format!("/remove_from_cart/{book}")).await;

    assert!(body.contains("Item removed from your cart."));
    assert!(body.contains("Your cart is empty."));
}
