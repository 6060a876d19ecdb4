//! Application layer orchestrating report requests.
//!
//! `IntegraTransformer` is the pure mapping from upstream payments to the
//! Integra schema; `ReportService` validates requests and drives a
//! `PaymentSource` through it.

pub mod report;
pub mod transformer;
