use anyhow::Context;
use fathom_core::TransactionRecord;
use fathom_import::{ColumnOverride, DateOrder, FieldKey, ImportOptions, ImportReport, Importer};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;
use tracing::info;

use crate::Format;

pub fn load_options(path: Option<&Path>) -> anyhow::Result<ImportOptions> {
    let Some(path) = path else {
        return Ok(ImportOptions::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    ImportOptions::from_toml(&content)
        .with_context(|| format!("Invalid config {}", path.display()))
}

pub fn apply_flags(
    options: &mut ImportOptions,
    day_first: bool,
    map: Vec<(FieldKey, ColumnOverride)>,
) {
    if day_first {
        options.date_order = DateOrder::DayFirst;
    }
    for (field, choice) in map {
        options.mapping.insert(field, choice);
    }
}

pub fn detect(file: &Path, options: ImportOptions) -> anyhow::Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let text = fathom_import::encoding::decode(&bytes);
    let preview = Importer::new(options)
        .preview(&text)
        .with_context(|| format!("{} has no header row", file.display()))?;

    let mut out = io::stdout().lock();
    for (column, header) in preview.headers.iter().enumerate() {
        let field = preview
            .resolved
            .field_at(column)
            .map_or("-", FieldKey::as_str);
        writeln!(out, "{column:>3}  {header:<30} {field}")?;
    }
    if !preview.missing.is_empty() {
        let missing: Vec<_> = preview.missing.iter().map(|f| f.as_str()).collect();
        writeln!(out, "missing required: {}", missing.join(", "))?;
    }
    Ok(())
}

pub fn import(file: &Path, options: ImportOptions, format: Format) -> anyhow::Result<()> {
    info!(file = %file.display(), ?format, "Importing");
    let reader = BufReader::new(
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?,
    );
    let importer = Importer::new(options);
    let max_samples = importer.options().max_samples;
    let report = importer
        .import_reader(reader)
        .with_context(|| format!("Import of {} failed", file.display()))?;

    match format {
        Format::Json => write_json(&report)?,
        Format::Csv => write_csv(&report.records)?,
    }

    let diagnostics = &report.diagnostics;
    eprintln!("{diagnostics}");
    for skipped in &diagnostics.skipped {
        eprintln!("  line {}: {}", skipped.line, skipped.reason);
    }
    if diagnostics.failed > diagnostics.skipped.len() {
        eprintln!("  ... and {} more", diagnostics.failed - diagnostics.skipped.len());
    }
    if !diagnostics.unparsed_dates.is_empty() {
        let samples: Vec<_> = diagnostics.date_samples().map(|d| format!("{d:?}")).collect();
        eprintln!("  guessed dates from: {}", samples.join(", "));
        if diagnostics.unparsed_dates.len() > max_samples {
            eprintln!("  ... and {} more", diagnostics.unparsed_dates.len() - max_samples);
        }
    }
    Ok(())
}

fn write_json(report: &ImportReport) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, report)?;
    writeln!(out)?;
    Ok(())
}

/// One CSV output line. Columns are written in this order.
#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    amount: String,
    category: &'a str,
    #[serde(rename = "type")]
    transaction_type: String,
    recurrence: String,
    notes: &'a str,
    icon: &'a str,
}

impl<'a> From<&'a TransactionRecord> for CsvRow<'a> {
    fn from(r: &'a TransactionRecord) -> Self {
        CsvRow {
            date: r.date().to_string(),
            amount: r.amount().as_decimal().to_string(),
            category: r.category(),
            transaction_type: r.transaction_type().to_string(),
            recurrence: r.recurrence().to_string(),
            notes: r.notes().unwrap_or_default(),
            icon: r.icon().as_str(),
        }
    }
}

fn write_csv(records: &[TransactionRecord]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_extend_config() {
        let mut options = ImportOptions::default();
        apply_flags(
            &mut options,
            true,
            vec![(FieldKey::Amount, ColumnOverride::Column(2))],
        );
        assert_eq!(options.date_order, DateOrder::DayFirst);
        assert!(options.mapping_override().is_some());
    }

    #[test]
    fn missing_config_path_is_default() {
        assert_eq!(load_options(None).unwrap(), ImportOptions::default());
    }

    #[test]
    fn csv_row_shape() {
        let report = Importer::new(ImportOptions::default())
            .import_text("amount,category,date,notes\n-4.5,Coffee,2025-02-28,\"flat white, large\"\n")
            .unwrap();
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(CsvRow::from(&report.records[0])).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            out,
            "date,amount,category,type,recurrence,notes,icon\n\
             2025-02-28,-4.5,Coffee,expense,one-time,\"flat white, large\",🍔\n"
        );
    }
}
