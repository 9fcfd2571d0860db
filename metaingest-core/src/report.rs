//! Run reports for sources and sinks.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceReport {
    pub workunits_produced: usize,
    pub workunit_ids: Vec<String>,
    /// Warning reasons keyed by the item they concern.
    pub warnings: BTreeMap<String, Vec<String>>,
    pub failures: BTreeMap<String, Vec<String>>,
}

impl SourceReport {
    pub fn report_workunit(&mut self, id: impl Into<String>) {
        self.workunits_produced += 1;
        self.workunit_ids.push(id.into());
    }

    pub fn report_warning(&mut self, key: impl Into<String>, reason: impl Into<String>) {
        self.warnings.entry(key.into()).or_default().push(reason.into());
    }

    pub fn report_failure(&mut self, key: impl Into<String>, reason: impl Into<String>) {
        self.failures.entry(key.into()).or_default().push(reason.into());
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.values().map(Vec::len).sum()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SinkReport {
    pub records_written: usize,
    pub warnings: Vec<String>,
    pub failures: Vec<String>,
}

impl SinkReport {
    pub fn report_record_written(&mut self) {
        self.records_written += 1;
    }

    pub fn report_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn report_failure(&mut self, failure: impl Into<String>) {
        self.failures.push(failure.into());
    }
}

/// Render a report as pretty JSON.
pub fn render<R: Serialize>(report: &R) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("<unrenderable report: {e}>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_report_counts() {
        let mut report = SourceReport::default();
        report.report_workunit("a");
        report.report_workunit("b");
        report.report_warning("a", "slow");
        report.report_failure("b", "bad json");
        report.report_failure("b", "bad urn");

        assert_eq!(report.workunits_produced, 2);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.failure_count(), 2);
    }

    #[test]
    fn test_render_is_json() {
        let mut report = SinkReport::default();
        report.report_record_written();
        let rendered = render(&report);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["records_written"], 1);
    }
}
