//! Test-metadata normalization and reporting.
//!
//! A host test framework hands [`TeardownHook::on_teardown`] the property
//! store, identity and outcome of each finished test. The metadata is
//! normalized against a fixed taxonomy into a [`TestRecord`] and reported in
//! tabular or structured form.

pub use crate::config::{ReportFormat, ReportPolicy, ReporterConfig};
pub use crate::diagnostics::{ErrorType, Result, VerdictError};
pub use crate::hook::TeardownHook;
pub use crate::normalizer::{normalize, Normalizer};
pub use crate::record::{HostOutcome, ResultStatus, TestIdentity, TestRecord, Timeout};
pub use crate::report::Reporter;
pub use crate::store::{Declarations, PropertyBag, PropertyStore, PropertyValue};

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod hook;
pub mod normalizer;
pub mod record;
pub mod report;
pub mod store;
pub mod taxonomy;
