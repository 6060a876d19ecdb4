use crate::domain::ports::{PaymentSource, ReportQuery};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A payment source serving a fixed set of records.
///
/// Every query returns the same records regardless of date range. Lets the
/// report service run without an upstream, which is how the tests wire it.
#[derive(Default, Clone)]
pub struct StaticPaymentSource {
    records: Arc<Vec<Value>>,
}

impl StaticPaymentSource {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }
}

#[async_trait]
impl PaymentSource for StaticPaymentSource {
    async fn fetch_payments(&self, _query: &ReportQuery) -> Result<Vec<Value>> {
        Ok(self.records.as_ref().clone())
    }
}
