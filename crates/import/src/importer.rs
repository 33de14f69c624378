use chrono::Local;
use fathom_core::{DraftRecord, RecordError, TransactionRecord, TransactionType};
use serde::Serialize;
use std::io::BufRead;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::classify::{classify_headers, is_native_header};
use crate::config::ImportOptions;
use crate::diagnostics::ImportDiagnostics;
use crate::encoding::{decode, strip_bom};
use crate::mapping::{self, FieldKey, FieldMapping};
use crate::normalize::{
    infer_type, parse_amount, parse_recurrence, parse_type, resolve_icon, AmountError, DateParser,
    ParsedDate,
};
use crate::tokenize::{split_lines, split_row};

/// Why a single data row was left out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("Row has {found} fields, expected at least {expected}")]
    TooFewColumns { expected: usize, found: usize },
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// File-level failures. Row problems never surface here.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("File is empty")]
    EmptyFile,
    #[error("Missing required columns: {}", field_list(.0))]
    MissingRequiredColumns(Vec<FieldKey>),
    #[error("No valid transactions: {0}")]
    NoValidTransactions(ImportDiagnostics),
}

fn field_list(fields: &[FieldKey]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub records: Vec<TransactionRecord>,
    pub diagnostics: ImportDiagnostics,
    /// The mapping the rows were read with.
    pub mapping: FieldMapping,
}

/// What the header row alone says, before any data is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderPreview {
    pub headers: Vec<String>,
    pub detected: FieldMapping,
    /// `detected` with the configured override applied.
    pub resolved: FieldMapping,
    pub missing: Vec<FieldKey>,
}

pub struct Importer {
    options: ImportOptions,
}

impl Importer {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    pub fn import_text(&self, text: &str) -> Result<ImportReport, ImportError> {
        let mut session = self.session();
        for (idx, line) in split_lines(strip_bom(text)).enumerate() {
            session.feed_line(idx + 1, line)?;
        }
        session.finish()
    }

    /// Whole-file bytes, decoded line by line as in [`import_reader`](Self::import_reader).
    pub fn import_bytes(&self, bytes: &[u8]) -> Result<ImportReport, ImportError> {
        self.import_reader(bytes)
    }

    /// Line-at-a-time import. Each line is decoded on its own, so a stray
    /// Windows-1252 byte only affects the line it sits on.
    pub fn import_reader<R: BufRead>(&self, mut reader: R) -> Result<ImportReport, ImportError> {
        let mut session = self.session();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let text = decode(&buf);
            // A file with bare `\r` endings arrives here as one chunk.
            for line in split_lines(&text) {
                line_no += 1;
                let line = if line_no == 1 { strip_bom(line) } else { line };
                session.feed_line(line_no, line)?;
            }
        }

        session.finish()
    }

    /// Classify the first non-blank line of `text` as a header row.
    pub fn preview(&self, text: &str) -> Option<HeaderPreview> {
        let header = split_lines(strip_bom(text)).find(|l| !l.trim().is_empty())?;
        let headers = split_row(header, self.options.delimiter);
        let detected = classify_headers(&headers);
        let resolved = mapping::resolve(&detected, self.options.mapping_override());
        let missing = resolved.missing_required();
        Some(HeaderPreview {
            headers,
            detected,
            resolved,
            missing,
        })
    }

    pub fn session(&self) -> ImportSession<'_> {
        let reference = self
            .options
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        ImportSession {
            options: &self.options,
            dates: DateParser::new(self.options.date_order, reference),
            mapping: None,
            infer_missing_type: true,
            records: Vec::new(),
            diagnostics: ImportDiagnostics::new(self.options.max_samples),
        }
    }
}

/// Incremental import state. Feed lines in order, then call [`finish`](Self::finish).
/// After `feed_line` returns an error the session should be dropped.
pub struct ImportSession<'a> {
    options: &'a ImportOptions,
    dates: DateParser,
    mapping: Option<FieldMapping>,
    /// Rows without a type column take it from the amount's sign.
    infer_missing_type: bool,
    records: Vec<TransactionRecord>,
    diagnostics: ImportDiagnostics,
}

impl ImportSession<'_> {
    pub fn feed_line(&mut self, line_no: usize, line: &str) -> Result<(), ImportError> {
        if line.trim().is_empty() {
            return Ok(());
        }

        let fields = split_row(line, self.options.delimiter);

        let Some(mapping) = &self.mapping else {
            self.mapping = Some(self.read_header(&fields)?);
            self.infer_missing_type = !is_native_header(&fields);
            return Ok(());
        };

        match build_record(&fields, mapping, &self.dates, self.infer_missing_type) {
            Ok((record, date)) => {
                trace!(line = line_no, "Row imported");
                if date.is_guessed() {
                    let raw = cell(&fields, mapping, FieldKey::Date).unwrap_or_default();
                    warn!(line = line_no, raw, guessed = %date.date, "Date not recognized, guessed");
                    self.diagnostics.record_guessed_date(raw);
                }
                self.diagnostics.record_success();
                self.records.push(record);
            }
            Err(reason) => {
                warn!(line = line_no, %reason, "Skipping row");
                self.diagnostics.record_failure(line_no, reason);
            }
        }

        Ok(())
    }

    fn read_header(&self, headers: &[String]) -> Result<FieldMapping, ImportError> {
        let detected = classify_headers(headers);
        debug!(?headers, ?detected, "Header classified");

        let resolved = mapping::resolve(&detected, self.options.mapping_override());
        let missing = resolved.missing_required();
        if !missing.is_empty() {
            return Err(ImportError::MissingRequiredColumns(missing));
        }

        if let Some((field, column)) = resolved.iter().find(|(_, c)| *c >= headers.len()) {
            warn!(%field, column, width = headers.len(), "Mapped column is past the header row");
        }
        debug!(mapping = ?resolved, "Mapping resolved");

        Ok(resolved)
    }

    pub fn finish(self) -> Result<ImportReport, ImportError> {
        let Some(mapping) = self.mapping else {
            return Err(ImportError::EmptyFile);
        };

        let diagnostics = self.diagnostics;
        debug!(
            succeeded = diagnostics.succeeded,
            failed = diagnostics.failed,
            dates_guessed = diagnostics.dates_guessed,
            "Import finished"
        );

        if diagnostics.succeeded == 0 && diagnostics.failed > 0 {
            return Err(ImportError::NoValidTransactions(diagnostics));
        }

        Ok(ImportReport {
            records: self.records,
            diagnostics,
            mapping,
        })
    }
}

fn cell<'f>(fields: &'f [String], mapping: &FieldMapping, field: FieldKey) -> Option<&'f str> {
    mapping
        .column_for(field)
        .and_then(|c| fields.get(c))
        .map(String::as_str)
}

/// Normalize one data row. Amount and category are the only fields that can
/// reject it; every other field falls back to a default.
fn build_record(
    fields: &[String],
    mapping: &FieldMapping,
    dates: &DateParser,
    infer_missing_type: bool,
) -> Result<(TransactionRecord, ParsedDate), RowError> {
    let expected = mapping.required_width();
    if fields.len() < expected {
        return Err(RowError::TooFewColumns {
            expected,
            found: fields.len(),
        });
    }

    let amount = parse_amount(cell(fields, mapping, FieldKey::Amount).unwrap_or_default())?;

    let category = cell(fields, mapping, FieldKey::Category).unwrap_or_default();
    if category.trim().is_empty() {
        return Err(RecordError::EmptyCategory.into());
    }

    let date = dates.parse(cell(fields, mapping, FieldKey::Date).unwrap_or_default());

    let transaction_type = match mapping.column_for(FieldKey::Type) {
        Some(_) => parse_type(cell(fields, mapping, FieldKey::Type).unwrap_or_default()),
        None if infer_missing_type => infer_type(amount),
        None => TransactionType::default(),
    };

    let draft = DraftRecord {
        amount,
        category: category.to_string(),
        transaction_type,
        recurrence: parse_recurrence(cell(fields, mapping, FieldKey::Recurrence).unwrap_or_default()),
        notes: cell(fields, mapping, FieldKey::Notes).map(str::to_string),
        icon: resolve_icon(cell(fields, mapping, FieldKey::Icon), category),
        date: date.date,
    };

    Ok((TransactionRecord::validate(draft)?, date))
}
