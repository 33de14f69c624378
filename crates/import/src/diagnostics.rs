use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

use crate::importer::RowError;

/// A data row left out of the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line number in the input.
    pub line: usize,
    #[serde(serialize_with = "as_display")]
    pub reason: RowError,
}

fn as_display<S: Serializer, T: fmt::Display>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Summary of one import, for the caller to show after the fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportDiagnostics {
    pub succeeded: usize,
    pub failed: usize,
    /// Rows whose date came from the integer-extraction fallback.
    pub dates_guessed: usize,
    /// Distinct date cells that no known pattern matched.
    pub unparsed_dates: BTreeSet<String>,
    /// The first few skipped rows, capped like the date samples.
    pub skipped: Vec<SkippedRow>,
    #[serde(skip)]
    max_samples: usize,
}

impl ImportDiagnostics {
    pub fn new(max_samples: usize) -> Self {
        Self {
            max_samples,
            ..Self::default()
        }
    }

    pub(crate) fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub(crate) fn record_failure(&mut self, line: usize, reason: RowError) {
        self.failed += 1;
        if self.skipped.len() < self.max_samples {
            self.skipped.push(SkippedRow { line, reason });
        }
    }

    /// Blank cells count as guessed but are not kept as samples.
    pub(crate) fn record_guessed_date(&mut self, raw: &str) {
        self.dates_guessed += 1;
        let raw = raw.trim();
        if !raw.is_empty() {
            self.unparsed_dates.insert(raw.to_string());
        }
    }

    pub fn rows_seen(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Up to `max_samples` unparsed date strings, in sorted order.
    pub fn date_samples(&self) -> impl Iterator<Item = &str> {
        self.unparsed_dates
            .iter()
            .take(self.max_samples)
            .map(String::as_str)
    }
}

impl fmt::Display for ImportDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "imported {}, skipped {}, {} dates guessed",
            self.succeeded, self.failed, self.dates_guessed
        )
    }
}
