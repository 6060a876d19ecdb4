//! HTTP surface of the export service.

use crate::application::report::{ReportRequest, ReportService};
use crate::error::IntegraError;
use axum::extract::{Query, Request, State};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Header carrying the number of upstream records left out of the report.
pub const REJECTED_RECORDS_HEADER: &str = "x-rejected-records";

#[derive(Debug, Deserialize)]
pub struct TransactionsParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub token: Option<String>,
}

impl From<TransactionsParams> for ReportRequest {
    fn from(params: TransactionsParams) -> Self {
        Self {
            from: params.from,
            to: params.to,
            token: params.token,
        }
    }
}

pub fn router(service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/", get(info))
        .route("/api/transactions", get(transactions))
        // Span carries the path only; the query string holds the caller's token.
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
            tracing::info_span!("request", method = %req.method(), path = %req.uri().path())
        }))
        .with_state(service)
}

async fn info() -> Json<Value> {
    Json(json!({
        "message": "Integra export API is running",
        "endpoints": {
            "transactions": "/api/transactions?from=YYYYMMDD&to=YYYYMMDD&token=YOUR_TOKEN"
        }
    }))
}

async fn transactions(
    State(service): State<Arc<ReportService>>,
    Query(params): Query<TransactionsParams>,
) -> Result<Response, IntegraError> {
    let outcome = service.build_report(params.into()).await?;
    let mut response = Json(outcome.report).into_response();
    response.headers_mut().insert(
        REJECTED_RECORDS_HEADER,
        HeaderValue::from(outcome.rejected.len()),
    );
    Ok(response)
}
