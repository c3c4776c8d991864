//! `axiomkit_xlsx_record` v1:
//! Map collections of typed records to and from single-sheet XLSX workbooks.
//!
//! Modules:
//! - `conf`   : constants and default presets
//! - `spec`   : schema descriptors, options and reports
//! - `error`  : error types
//! - `coerce` : scalar <-> cell text conversion
//! - `access` : record traits and dotted-path value access
//! - `path`   : field path enumeration
//! - `column` : header labels, column order and width hints
//! - `grid`   : records <-> in-memory grid
//! - `util`   : pure helper functions
//! - `writer` : rust_xlsxwriter-backed export kernel
//! - `reader` : calamine-backed import kernel
//!
//! Derived impls refer to this crate by its absolute path.
extern crate self as axiomkit_xlsx_record;

pub mod access;
pub mod coerce;
pub mod column;
pub mod conf;
pub mod error;
pub mod grid;
pub mod path;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use access::{
    EnumFieldMut, EnumFieldRef, EnumWriteOutcome, RecordAccess, XlsxRecord, read_value_by_path,
    write_value_by_path,
};
pub use axiomkit_xlsx_record_derive::XlsxRecord;
pub use coerce::{CellScalar, ScalarSlot, parse_cell_text, render_cell_value};
pub use column::plan_columns;
pub use conf::{
    C_FMT_TIMESTAMP, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    N_ORDER_UNSET, N_WIDTH_CELL_MAX, N_WIDTH_CELL_PADDING, TUP_EXCEL_ILLEGAL,
};
pub use error::{CoerceError, XlsxRecordError};
pub use grid::{build_export_grid, parse_grid_rows};
pub use path::enumerate_field_paths;
pub use reader::{import_records, import_records_with_options, read_sheet_rows};
pub use spec::{
    CellValuePolicy, EnumCellValue, EnumCoerceMode, EnumFieldKind, EnumScalarKind, FieldPath,
    HeaderPolicy, SpecCellFormat, SpecColumn, SpecColumnWidthPolicy, SpecField, SpecFieldLeaf,
    SpecHeaderDecision, SpecRecordType, SpecXlsxExportOptions, SpecXlsxGrid,
    SpecXlsxImportOptions, SpecXlsxReport,
};
pub use writer::{
    XlsxRecordWriter, export_records, export_records_with_options, export_records_with_policies,
};
