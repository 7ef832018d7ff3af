use oran_abstract::{FieldValue, ReportKind};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::query::ReportEntry;

/// One stored report, flattened for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRecord {
    pub index: u64,
    pub kind: ReportKind,
    pub reporter: String,
    pub time: f64,
    pub fields: BTreeMap<String, FieldValue>,
    pub text: String,
}

impl From<&ReportEntry> for ReportRecord {
    fn from(entry: &ReportEntry) -> Self {
        let report = entry.report();
        Self {
            index: entry.index(),
            kind: report.kind(),
            reporter: report.reporter().as_str().to_string(),
            time: report.time().as_secs(),
            fields: report
                .measurements()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
            text: report.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryTrace {
    pub total_reports: usize,
    pub entities: BTreeMap<String, Vec<ReportRecord>>,
}
