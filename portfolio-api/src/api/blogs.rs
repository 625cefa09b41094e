use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use blog_aggregator::{AggregatedPage, PageQuery};
use chrono::Utc;
use tracing::{error, info};

use crate::api::models::BlogQuery;
use crate::AppState;

pub const FAILURE_NOTICE: &str = "Failed to fetch blog posts, returning fallback data";

/// Always 200: a request that cannot be read at all is answered with the
/// fallback set and an `error` note.
pub async fn aggregated_articles(
    State(state): State<AppState>,
    query: Result<Query<BlogQuery>, QueryRejection>,
) -> Json<AggregatedPage> {
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            error!("Blog API error: {}", rejection);
            return Json(AggregatedPage::fallback(Utc::now(), FAILURE_NOTICE));
        }
    };

    let page_query = PageQuery::from_params(params.limit.as_deref(), params.page.as_deref());
    let page = state.aggregator.aggregate(page_query).await;
    info!(
        "Serving {} of {} articles (page {}, source {:?})",
        page.posts.len(),
        page.total,
        page.pagination.page,
        page.source
    );

    Json(page)
}
