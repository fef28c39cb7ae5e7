//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use verdict::report::OutputBuffer;
use verdict::{ReportPolicy, ReporterConfig, TeardownHook, TestIdentity};

/// A hook writing to an in-memory buffer, colors off.
pub fn buffered_hook(config: ReporterConfig) -> (TeardownHook, Arc<OutputBuffer>) {
    let buffer = Arc::new(OutputBuffer::new());
    let hook = TeardownHook::new(config.with_colors(false), buffer.clone());
    (hook, buffer)
}

pub fn report_everything() -> ReporterConfig {
    ReporterConfig::default().with_policy(ReportPolicy::Always)
}

pub fn identity(id: &str, name: &str) -> TestIdentity {
    TestIdentity {
        id: id.to_string(),
        name: name.to_string(),
        method_name: name.to_string(),
        class_name: "UnitTest1".to_string(),
        full_name: format!("Project.UnitTest1.{}", name),
        current_directory: "/work/project".to_string(),
        test_directory: "/work/project/bin".to_string(),
        work_directory: "/work/project/logs".to_string(),
    }
}

/// The value column of the line whose label is `label`.
pub fn field<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    text.lines().find_map(|line| {
        let (name, value) = line.split_once('\t')?;
        (name.trim_end() == label).then_some(value)
    })
}
