//! Integration tests for registration, login and the account page.

#![allow(clippy::unwrap_used)]

use bookshop_integration_tests::{PASSWORD, TestContext, insert_book};

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_account_page_shows_username() {
    let ctx = TestContext::new().await;
    let username = ctx.register_and_login().await;

    let body = ctx.page("/user").await;
    assert!(body.contains(&username));
    assert!(body.contains("Purchases"));
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_duplicate_registration_reports_field() {
    let ctx = TestContext::new().await;
    let username = ctx.register_and_login().await;

    let body = ctx
        .client
        .post(ctx.url("/register"))
        .form(&[
            ("username", username.as_str()),
            ("email", "someone-else@example.com"),
            ("password", PASSWORD),
            ("confirm_password", PASSWORD),
        ])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("That username is taken. Please choose a different one."));
    assert!(!body.contains("Registration successful!"));
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_wrong_password_is_rejected() {
    let ctx = TestContext::new().await;
    let username = ctx.register_and_login().await;
    ctx.page("/logout").await;

    let body = ctx
        .client
        .post(ctx.url("/login"))
        .form(&[
            ("email", format!("{username}@example.com").as_str()),
            ("password", "not-the-password"),
        ])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Invalid email address or password."));
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_logout_empties_cart() {
    let ctx = TestContext::new().await;
    ctx.register_and_login().await;
    let book = insert_book(&ctx.pool, "Left Behind", "3.00", 2).await;
    ctx.page(&format!("/add_to_cart/{book}")).await;

    let body = ctx.page("/logout").await;
    assert!(body.contains("Logout successful."));

    let body = ctx.page("/cart").await;
    assert!(body.contains("Your cart is empty."));

    let response = ctx.client.get(ctx.url("/user")).send().await.unwrap();
    assert!(response.url().path().ends_with("/login"));
}
