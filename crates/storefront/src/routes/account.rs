//! Account route handlers.
//!
//! These routes require authentication.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{OrderRepository, ReviewRepository};
use crate::error::AppError;
use crate::middleware::{PageContext, RequireAuth};
use crate::models::{Order, UserReview};
use crate::state::AppState;

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "user.html")]
pub struct UserTemplate {
    pub ctx: PageContext,
    pub purchases: Vec<Order>,
    pub reviews: Vec<UserReview>,
}

/// Display the caller's purchases and reviews.
#[instrument(skip(state, session, current_user))]
pub async fn user(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current_user): RequireAuth,
) -> Result<UserTemplate, AppError> {
    let purchases = OrderRepository::new(state.pool())
        .list_for_user(current_user.id)
        .await?;
    let reviews = ReviewRepository::new(state.pool())
        .list_for_user(current_user.id)
        .await?;

    Ok(UserTemplate {
        ctx: PageContext::load(&state, &session).await?,
        purchases,
        reviews,
    })
}
