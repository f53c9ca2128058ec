//! Integration tests for book reviews.

#![allow(clippy::unwrap_used)]

use bookshop_core::ReviewOrder;
use bookshop_integration_tests::{TestContext, insert_book, insert_user, test_pool};
use bookshop_storefront::db::{RepositoryError, ReviewRepository};

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_one_review_per_reader() {
    let pool = test_pool().await;
    let user = insert_user(&pool).await;
    let book = insert_book(&pool, "Reviewed Once", "9.00", 1).await;
    let reviews = ReviewRepository::new(&pool);

    reviews.create(book, user, 4, "Good").await.unwrap();
    let second = reviews.create(book, user, 2, "Changed my mind").await;

    assert!(matches!(second, Err(RepositoryError::Conflict(_))));
    let listed = reviews.list_for_book(book, ReviewOrder::Newest).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].star_rating, 4);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_delete_own_review() {
    let pool = test_pool().await;
    let author = insert_user(&pool).await;
    let other = insert_user(&pool).await;
    let book = insert_book(&pool, "Regretted", "9.00", 1).await;
    let reviews = ReviewRepository::new(&pool);

    assert!(!reviews.delete_own(book, author).await.unwrap());

    reviews.create(book, author, 1, "Meh").await.unwrap();
    assert!(!reviews.delete_own(book, other).await.unwrap());
    assert!(reviews.delete_own(book, author).await.unwrap());
    assert!(!reviews.exists(book, author).await.unwrap());
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_reviews_sort_by_rating() {
    let pool = test_pool().await;
    let book = insert_book(&pool, "Divisive", "9.00", 1).await;
    let reviews = ReviewRepository::new(&pool);
    for rating in [3, 5, 1] {
        let user = insert_user(&pool).await;
        reviews.create(book, user, rating, "Opinion").await.unwrap();
    }

    let ratings = |order: ReviewOrder| {
        let reviews = &reviews;
        async move {
            reviews
                .list_for_book(book, order)
                .await
                .unwrap()
                .into_iter()
                .map(|r| r.star_rating)
                .collect::<Vec<_>>()
        }
    };
    assert_eq!(ratings(ReviewOrder::HighestRated).await, vec![5, 3, 1]);
    assert_eq!(ratings(ReviewOrder::LowestRated).await, vec![1, 3, 5]);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_review_over_http() {
    let ctx = TestContext::new().await;
    let username = ctx.register_and_login().await;
    let book = insert_book(&ctx.pool, "Http Reviewed", "9.00", 1).await;

    let body = ctx
        .client
        .post(ctx.url(&format!("/viewinfo?id={book}")))
        .form(&[("star_rating", "5"), ("content", "A page turner")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Review submitted"), "{body}");
    assert!(body.contains("A page turner"));
    assert!(body.contains(&username));

    let body = ctx.page(&format!("/delete_review/{book}")).await;
    assert!(body.contains("Your review has been deleted."));
    assert!(!body.contains("A page turner"));

    let body = ctx.page(&format!("/delete_review/{book}")).await;
    assert!(body.contains("You have not reviewed this book"));
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_invalid_review_rerenders_form() {
    let ctx = TestContext::new().await;
    ctx.register_and_login().await;
    let book = insert_book(&ctx.pool, "Unrated", "9.00", 1).await;

    let body = ctx
        .client
        .post(ctx.url(&format!("/viewinfo?id={book}")))
        .form(&[("star_rating", ""), ("content", "No stars")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Please award a star-rating"));
    assert!(!ReviewRepository::new(&ctx.pool)
        .list_for_book(book, ReviewOrder::Newest)
        .await
        .unwrap()
        .iter()
        .any(|r| r.content == "No stars"));
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_overlong_review_is_a_field_error() {
    let ctx = TestContext::new().await;
    ctx.register_and_login().await;
    let book = insert_book(&ctx.pool, "Verbose", "9.00", 1).await;
    let essay = "x".repeat(6000);

    let response = ctx
        .client
        .post(ctx.url(&format!("/viewinfo?id={book}")))
        .form(&[("star_rating", "4"), ("content", essay.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body = response.text().await.unwrap();
    assert!(body.contains("Your review should be at most 5000 characters long."));
    assert!(ReviewRepository::new(&ctx.pool)
        .list_for_book(book, ReviewOrder::Newest)
        .await
        .unwrap()
        .is_empty());
}
