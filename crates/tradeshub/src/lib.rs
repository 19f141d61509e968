//! Trust and safety workflows for the TradesHub marketplace.
//!
//! The crate screens free text for personal data before bad payer reports are
//! published, drives the report moderation lifecycle, and keeps tradesperson
//! rating aggregates consistent while reviews are moderated.

pub mod config;
pub mod content_filter;
pub mod error;
pub mod telemetry;
pub mod workflows;
