use super::transformer::{IntegraTransformer, TransformOutcome};
use crate::domain::ports::{PaymentSourceBox, ReportQuery};
use crate::error::{IntegraError, Result};
use chrono::NaiveDate;

/// Query parameters of a report request, exactly as received.
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub token: Option<String>,
}

/// Checks report requests and turns upstream payments into Integra reports.
pub struct ReportService {
    source: PaymentSourceBox,
    transformer: IntegraTransformer,
    access_token: String,
}

impl ReportService {
    /// # Arguments
    ///
    /// * `source` - Where payment records are fetched from.
    /// * `transformer` - Maps payments onto the Integra schema.
    /// * `access_token` - Shared secret callers must present.
    pub fn new(
        source: PaymentSourceBox,
        transformer: IntegraTransformer,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            source,
            transformer,
            access_token: access_token.into(),
        }
    }

    /// Validates the request, fetches the date range and transforms it.
    ///
    /// Token checks run before anything else; the date range is checked
    /// before the upstream API is contacted.
    pub async fn build_report(&self, request: ReportRequest) -> Result<TransformOutcome> {
        let query = self.validate(request)?;
        tracing::info!(from = %query.from, to = %query.to, "Fetching payments");

        let records = self.source.fetch_payments(&query).await?;
        let outcome = self.transformer.transform(&records);
        tracing::info!(
            received = records.len(),
            exported = outcome.report.transactions.len(),
            rejected = outcome.rejected.len(),
            "Report built"
        );
        Ok(outcome)
    }

    fn validate(&self, request: ReportRequest) -> Result<ReportQuery> {
        let token = match request.token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(IntegraError::MissingToken),
        };
        if token != self.access_token {
            return Err(IntegraError::InvalidToken);
        }

        let from = parse_date_code("from", request.from.as_deref())?;
        let to = parse_date_code("to", request.to.as_deref())?;
        if from > to {
            return Err(IntegraError::Validation(
                "'from' date cannot be greater than 'to' date".to_string(),
            ));
        }
        Ok(ReportQuery { from, to, token })
    }
}

fn parse_date_code(name: &str, raw: Option<&str>) -> Result<NaiveDate> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(IntegraError::Validation(format!("Missing '{}' date", name)));
    }
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IntegraError::Validation(format!(
            "'{}' must be a date in YYYYMMDD format",
            name
        )));
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map_err(|_| IntegraError::Validation(format!("'{}' is not a valid calendar date", name)))
}
