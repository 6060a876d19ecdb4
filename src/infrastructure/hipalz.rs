use crate::domain::ports::{PaymentSource, ReportQuery};
use crate::error::{IntegraError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Path of the report script on the upstream API.
pub const REPORT_PATH: &str = "/script/path_finder_test";

/// HTTP client for the upstream POS reporting API.
pub struct HipalzClient {
    client: reqwest::Client,
    base_url: String,
    business_id: String,
    timeout: Duration,
}

impl HipalzClient {
    pub fn new(
        base_url: impl Into<String>,
        business_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IntegraError::Config(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            business_id: business_id.into(),
            timeout,
        })
    }

    fn map_transport_error(&self, e: reqwest::Error) -> IntegraError {
        if e.is_timeout() {
            IntegraError::UpstreamTimeout(self.timeout)
        } else {
            IntegraError::UpstreamTransport(e.without_url().to_string())
        }
    }
}

#[async_trait]
impl PaymentSource for HipalzClient {
    async fn fetch_payments(&self, query: &ReportQuery) -> Result<Vec<Value>> {
        let url = format!("{}{}", self.base_url, REPORT_PATH);
        let (from, to) = (query.from_code(), query.to_code());
        let params = [
            ("businessId", self.business_id.as_str()),
            ("from", from.as_str()),
            ("to", to.as_str()),
            ("token", query.token.as_str()),
        ];
        tracing::debug!(%url, from = %query.from, to = %query.to, "Requesting upstream payments");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(&params)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        tracing::debug!(%status, "Upstream responded");
        if !status.is_success() {
            tracing::error!(%status, "Upstream payment request failed");
            return Err(IntegraError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let body: Value = serde_json::from_str(&body)
            .map_err(|e| IntegraError::UpstreamBody(format!("invalid JSON: {}", e)))?;
        extract_records(body)
    }
}

/// Pulls the payment array out of an upstream response body.
///
/// Accepts `{"data": [..]}`, `{"data": {"data": [..]}}` or a bare array.
pub fn extract_records(body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(records)) => Ok(records),
            Some(Value::Object(mut inner)) => match inner.remove("data") {
                Some(Value::Array(records)) => Ok(records),
                _ => Err(IntegraError::UpstreamBody(
                    "'data.data' is not an array".to_string(),
                )),
            },
            _ => Err(IntegraError::UpstreamBody(
                "missing 'data' array".to_string(),
            )),
        },
        _ => Err(IntegraError::UpstreamBody(
            "expected a JSON object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_records_shapes() {
        let one = json!({ "total": 1 });
        assert_eq!(extract_records(json!({ "data": [one] })).unwrap(), vec![one.clone()]);
        assert_eq!(
            extract_records(json!({ "data": { "data": [one] } })).unwrap(),
            vec![one.clone()]
        );
        assert_eq!(extract_records(json!([one])).unwrap(), vec![one]);
    }

    #[test]
    fn test_extract_records_rejects_other_shapes() {
        for body in [json!({}), json!({ "data": "x" }), json!({ "data": {} }), json!(3)] {
            assert!(matches!(
                extract_records(body),
                Err(IntegraError::UpstreamBody(_))
            ));
        }
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client =
            HipalzClient::new("http://localhost:1/", "biz", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://localhost:1");
    }
}
