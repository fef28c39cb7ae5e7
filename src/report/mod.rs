//! Rendering and emitting normalized test records.
//!
//! - [`tabular`]: aligned `label<TAB>value` sections, every field shown.
//! - [`structured`]: JSON with default-valued fields suppressed.
//! - [`output`]: sinks that write one block per test atomically.
//!
//! [`Reporter`] ties a [`ReporterConfig`] to a sink. Reporting never fails
//! from the caller's point of view: a broken sink is logged and ignored so it
//! cannot mask the test's own pass/fail signal.

use tracing::warn;

use crate::config::{ReportFormat, ReporterConfig};
use crate::record::TestRecord;

pub mod output;
pub mod structured;
pub mod tabular;

pub use output::{OutputBuffer, OutputSink, ReportBlock, SharedSink, StdoutSink, WriterSink};
pub use structured::JsonLayout;

/// Renders records with one configuration and writes them to one sink.
#[derive(Clone)]
pub struct Reporter {
    config: ReporterConfig,
    sink: SharedSink,
}

impl Reporter {
    pub fn new(config: ReporterConfig, sink: SharedSink) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Renders a record in the configured format without writing it.
    pub fn render(&self, record: &TestRecord) -> ReportBlock {
        render(record, &self.config)
    }

    /// Renders a record and writes it to the sink as one block.
    pub fn report(&self, record: &TestRecord) {
        let block = self.render(record);
        if let Err(e) = self.sink.emit_block(&block) {
            warn!(
                test_id = %record.context.id,
                error = %e,
                "failed to write test report"
            );
        }
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Renders a record in the format selected by `config`.
pub fn render(record: &TestRecord, config: &ReporterConfig) -> ReportBlock {
    match config.format {
        ReportFormat::Tabular => tabular::render(record, config),
        ReportFormat::Json => structured::render(record, JsonLayout::Pretty),
        ReportFormat::JsonLines => structured::render(record, JsonLayout::Compact),
    }
}
