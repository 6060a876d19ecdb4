#![allow(dead_code)]

use axum::Router;
use integra_bridge::application::report::ReportService;
use integra_bridge::application::transformer::IntegraTransformer;
use integra_bridge::domain::timestamp::ReportTimeZone;
use integra_bridge::infrastructure::in_memory::StaticPaymentSource;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const TOKEN: &str = "secret";
pub const BUSINESS_ID: &str = "biz-1";

pub fn utc_transformer() -> IntegraTransformer {
    IntegraTransformer::new(ReportTimeZone::parse_offset("+00:00").unwrap())
}

/// One payment: total 118, tax 18, a single Tea line worth 100.
pub fn tea_payment() -> Value {
    json!({
        "billInvoice": 123,
        "createdAt": { "$date": "2024-01-15T09:30:00.000Z" },
        "total": 118,
        "tax": 18,
        "subTotal": 100,
        "billItems": [{ "dish": { "price": 100, "name": "Tea" }, "quantity": 1 }]
    })
}

pub fn static_service(records: Vec<Value>) -> ReportService {
    ReportService::new(
        Box::new(StaticPaymentSource::new(records)),
        utc_transformer(),
        TOKEN,
    )
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
