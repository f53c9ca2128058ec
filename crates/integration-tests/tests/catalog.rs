//! Integration tests for catalog ordering.

#![allow(clippy::unwrap_used)]

use bookshop_core::PriceOrder;
use bookshop_integration_tests::{TestContext, insert_book, test_pool};
use bookshop_storefront::db::BookRepository;

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_ascending_is_reverse_of_descending() {
    let pool = test_pool().await;
    // Two books at the same price exercise the id tie-break.
    insert_book(&pool, "Tie One", "4.99", 1).await;
    insert_book(&pool, "Tie Two", "4.99", 1).await;
    insert_book(&pool, "Pricier", "24.99", 1).await;

    let books = BookRepository::new(&pool);
    let ascending: Vec<_> = books
        .list(PriceOrder::Ascending)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.book_id)
        .collect();
    let mut descending: Vec<_> = books
        .list(PriceOrder::Descending)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.book_id)
        .collect();
    descending.reverse();

    assert_eq!(ascending, descending);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_book_page_shows_details() {
    let ctx = TestContext::new().await;
    let book = insert_book(&ctx.pool, "Detailed Book", "13.50", 3).await;

    let body = ctx.page(&format!("/viewinfo?id={book}")).await;
    assert!(body.contains("Detailed Book"));
    assert!(body.contains("$13.50"));
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_unknown_book_page_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .get(ctx.url("/viewinfo?id=2147483000"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
