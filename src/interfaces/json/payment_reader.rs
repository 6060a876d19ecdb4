use crate::error::Result;
use crate::infrastructure::hipalz::extract_records;
use serde_json::Value;
use std::io::Read;

/// Reads a saved upstream response body from any `Read` source.
///
/// The body may be the full upstream envelope or a bare array of payments.
pub struct PaymentReader<R: Read> {
    source: R,
}

impl<R: Read> PaymentReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn records(self) -> Result<Vec<Value>> {
        let body: Value = serde_json::from_reader(self.source)?;
        extract_records(body)
    }
}
