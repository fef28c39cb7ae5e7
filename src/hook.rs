//! Teardown integration.
//!
//! The host framework calls [`TeardownHook::on_teardown`] once per test after
//! the test body completes. The hook normalizes the test's metadata, decides
//! whether the outcome is worth reporting, and reports it.
//!
//! A hook holds no per-test state, so a single instance can be shared across
//! parallel test workers; the sink provides the per-block atomicity.

use std::sync::Arc;

use tracing::trace;

use crate::config::ReporterConfig;
use crate::diagnostics::Result;
use crate::normalizer::Normalizer;
use crate::record::{HostOutcome, TestIdentity, TestRecord};
use crate::report::{Reporter, SharedSink, StdoutSink};
use crate::store::PropertyStore;

#[derive(Debug, Clone)]
pub struct TeardownHook {
    normalizer: Normalizer,
    reporter: Reporter,
}

impl TeardownHook {
    pub fn new(config: ReporterConfig, sink: SharedSink) -> Self {
        Self {
            normalizer: Normalizer::new(config.safe_char),
            reporter: Reporter::new(config, sink),
        }
    }

    /// A hook writing to stdout, configured from defaults plus `VERDICT_*` variables.
    pub fn from_env() -> Result<Self> {
        let config = ReporterConfig::default().with_env_overrides()?;
        let sink = Arc::new(StdoutSink::new(config.use_colors));
        Ok(Self::new(config, sink))
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Normalizes and, if the report policy allows, reports one finished test.
    ///
    /// Returns the record when it was reported and `None` when the policy
    /// skipped it. An unrecognized outcome status is returned as an error and
    /// nothing is written.
    pub fn on_teardown<S>(
        &self,
        store: &S,
        identity: &TestIdentity,
        outcome: &HostOutcome,
    ) -> Result<Option<TestRecord>>
    where
        S: PropertyStore + ?Sized,
    {
        let record = if identity.current_directory.is_empty() {
            let mut identity = identity.clone();
            identity.current_directory = current_directory();
            self.normalizer.normalize(store, &identity, outcome)?
        } else {
            self.normalizer.normalize(store, identity, outcome)?
        };

        if !self.reporter.config().policy.should_report(record.status()) {
            trace!(test_id = %record.context.id, "report skipped by policy");
            return Ok(None);
        }
        self.reporter.report(&record);
        Ok(Some(record))
    }
}

fn current_directory() -> String {
    std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}
