//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tracing::instrument;

use bookshop_core::PriceOrder;

use crate::db::BookRepository;
use crate::error::AppError;
use crate::middleware::PageContext;
use crate::models::Book;
use crate::routes::SortQuery;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub books: Vec<Book>,
    pub ascending: bool,
}

/// Display the catalog ordered by price.
#[instrument(skip(state, ctx))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<SortQuery>,
    ctx: PageContext,
) -> Result<HomeTemplate, AppError> {
    let order = PriceOrder::from_catalog_param(query.value());
    let books = BookRepository::new(state.pool()).list(order).await?;

    Ok(HomeTemplate {
        ctx,
        books,
        ascending: order == PriceOrder::Ascending,
    })
}
