//! Error types for record export/import.

use std::path::PathBuf;

use thiserror::Error;

use crate::spec::EnumScalarKind;

/// Failure to parse one cell into a field's native kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {text:?} as {kind}")]
pub struct CoerceError {
    pub text: String,
    pub kind: EnumScalarKind,
}

/// Hard errors surfaced by export/import calls.
#[derive(Debug, Error)]
pub enum XlsxRecordError {
    #[error("empty data list: nothing to export")]
    EmptyInput,

    #[error("invalid record type: {0}")]
    InvalidRecordType(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("invalid sheet name {sheet_name:?}: {detail}")]
    InvalidSheetName { sheet_name: String, detail: String },

    #[error("grid overflow: {0}")]
    GridOverflow(String),

    #[error("failed to open workbook {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("invalid or empty sheet {sheet_name:?}: {detail}")]
    InvalidSheet { sheet_name: String, detail: String },

    #[error("row {row}, column {label:?}: {source}")]
    CellParse {
        /// 1-based sheet row number.
        row: usize,
        label: String,
        #[source]
        source: CoerceError,
    },

    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("cannot write after close()")]
    WriterClosed,
}
