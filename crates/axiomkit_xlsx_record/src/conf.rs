//! Record mapping constants and default preset factories.

use crate::spec::SpecCellFormat;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Width units added to the widest label/value of a column.
pub const N_WIDTH_CELL_PADDING: usize = 2;
/// Upper bound of an exported column width.
pub const N_WIDTH_CELL_MAX: usize = 80;

/// Order assigned to columns without an explicit order.
///
/// Sorts after every explicit order; declaration order breaks ties.
pub const N_ORDER_UNSET: i64 = i64::MAX;

/// Field tag value that removes a field from export and import matching.
pub const C_TAG_EXCLUDED: &str = "-";
/// Separator between segments of a flattened field path.
pub const C_FIELD_PATH_SEP: &str = ".";

/// Canonical timestamp text layout (render and first parse attempt).
pub const C_FMT_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";
/// Date-only fallback layout for timestamp parsing.
pub const C_FMT_DATE: &str = "%Y-%m-%d";

/// Build the default header cell format.
pub fn derive_default_header_format() -> SpecCellFormat {
    SpecCellFormat {
        bold: Some(true),
        ..Default::default()
    }
}

/// Build the format applied to cells holding multi-line text.
pub fn derive_default_wrap_format() -> SpecCellFormat {
    SpecCellFormat {
        text_wrap: Some(true),
        valign: Some("top".to_string()),
        ..Default::default()
    }
}
