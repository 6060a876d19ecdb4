//! Domain types and pure business rules.

pub mod integra;
pub mod money;
pub mod payment;
pub mod ports;
pub mod timestamp;
