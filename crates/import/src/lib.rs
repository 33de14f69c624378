pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod encoding;
pub mod importer;
pub mod mapping;
pub mod normalize;
pub mod tokenize;

pub use classify::classify_headers;
pub use config::{ConfigError, ImportOptions};
pub use diagnostics::{ImportDiagnostics, SkippedRow};
pub use importer::{HeaderPreview, ImportError, ImportReport, ImportSession, Importer, RowError};
pub use mapping::{ColumnOverride, FieldKey, FieldMapping, MappingOverride};
pub use normalize::{DateConfidence, DateOrder, DateParser, ParsedDate};
pub use tokenize::{split_lines, split_row};

pub mod import {
    use crate::*;

    pub fn import_text(text: &str, options: &ImportOptions) -> Result<ImportReport, ImportError> {
        Importer::new(options.clone()).import_text(text)
    }

    pub fn import_reader<R: std::io::BufRead>(
        reader: R,
        options: &ImportOptions,
    ) -> Result<ImportReport, ImportError> {
        Importer::new(options.clone()).import_reader(reader)
    }

    pub fn detect_mapping(header_line: &str, options: &ImportOptions) -> FieldMapping {
        classify_headers(&split_row(header_line, options.delimiter))
    }
}
