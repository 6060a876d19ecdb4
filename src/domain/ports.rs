use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

/// Date range and credentials for one upstream report fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub token: String,
}

impl ReportQuery {
    pub fn from_code(&self) -> String {
        self.from.format("%Y%m%d").to_string()
    }

    pub fn to_code(&self) -> String {
        self.to.format("%Y%m%d").to_string()
    }
}

/// Source of raw upstream payment records.
///
/// Records are returned untyped so malformed entries can be rejected one by
/// one instead of failing the whole batch.
#[async_trait]
pub trait PaymentSource: Send + Sync {
    async fn fetch_payments(&self, query: &ReportQuery) -> Result<Vec<Value>>;
}

pub type PaymentSourceBox = Box<dyn PaymentSource>;
