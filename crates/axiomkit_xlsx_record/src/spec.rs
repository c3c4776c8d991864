//! Shared record-mapping specification models.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;

use crate::conf::{
    C_FIELD_PATH_SEP, C_TAG_EXCLUDED, N_WIDTH_CELL_MAX, N_WIDTH_CELL_PADDING,
    derive_default_header_format, derive_default_wrap_format,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification for header and wrapped cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,
    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Text wrap.
    pub text_wrap: Option<bool>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RecordSchemaSpecification

/// Native kind of a scalar (leaf) field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumScalarKind {
    /// Verbatim text.
    Text,
    /// Base-10 integer.
    Integer,
    /// Floating point number.
    Float,
    /// Boolean.
    Boolean,
    /// Date-time with second precision.
    Timestamp,
}

impl fmt::Display for EnumScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c_name = match self {
            EnumScalarKind::Text => "text",
            EnumScalarKind::Integer => "integer",
            EnumScalarKind::Float => "float",
            EnumScalarKind::Boolean => "boolean",
            EnumScalarKind::Timestamp => "timestamp",
        };
        f.write_str(c_name)
    }
}

/// Shape of one declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumFieldKind {
    /// Leaf value converted to/from one cell.
    Scalar(EnumScalarKind),
    /// Nested record flattened into dotted sub-paths.
    Record(SpecRecordType),
    /// Field that never takes part in mapping.
    Excluded,
}

/// One field of a [`SpecRecordType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecField {
    /// Declared field name (path segment).
    pub name: String,
    /// Export tag: `None`/empty keeps the name, `"-"` excludes, else the label.
    pub tag: Option<String>,
    /// Whether the field is visible to the mapper.
    pub if_public: bool,
    /// Field kind.
    pub kind: EnumFieldKind,
}

impl SpecField {
    /// Public scalar field.
    pub fn scalar(name: impl Into<String>, kind: EnumScalarKind) -> Self {
        Self {
            name: name.into(),
            tag: None,
            if_public: true,
            kind: EnumFieldKind::Scalar(kind),
        }
    }

    /// Public nested-record field.
    pub fn record(name: impl Into<String>, record_type: SpecRecordType) -> Self {
        Self {
            name: name.into(),
            tag: None,
            if_public: true,
            kind: EnumFieldKind::Record(record_type),
        }
    }

    /// Field that is declared but never mapped.
    pub fn excluded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: Some(C_TAG_EXCLUDED.to_string()),
            if_public: true,
            kind: EnumFieldKind::Excluded,
        }
    }

    /// Set the export tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Mark the field as not visible to the mapper.
    pub fn with_private(mut self) -> Self {
        self.if_public = false;
        self
    }

    /// Whether the tag or kind removes this field from mapping.
    pub fn is_excluded(&self) -> bool {
        matches!(self.kind, EnumFieldKind::Excluded) || self.tag.as_deref() == Some(C_TAG_EXCLUDED)
    }

    /// Segment text used when composing a default column label.
    pub fn display_name(&self) -> &str {
        match self.tag.as_deref() {
            Some(tag) if !tag.is_empty() && tag != C_TAG_EXCLUDED => tag,
            _ => &self.name,
        }
    }
}

/// Schema description of one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRecordType {
    /// Type name, used in diagnostics.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<SpecField>,
}

impl SpecRecordType {
    pub fn new(name: impl Into<String>, fields: Vec<SpecField>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Check that field names are unique on every level.
    pub fn validate(&self) -> Result<(), String> {
        let mut set_names = BTreeSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(format!("Record type {:?} has an unnamed field.", self.name));
            }
            if field.name.contains(C_FIELD_PATH_SEP) {
                return Err(format!(
                    "Field name {:?} of record type {:?} contains the path separator.",
                    field.name, self.name
                ));
            }
            if !set_names.insert(field.name.as_str()) {
                return Err(format!(
                    "Duplicate field name {:?} in record type {:?}.",
                    field.name, self.name
                ));
            }
            if let EnumFieldKind::Record(record_type) = &field.kind {
                record_type.validate()?;
            }
        }
        Ok(())
    }
}

/// Dotted path locating a scalar field, possibly through nested records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    dotted: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Build from segments; `None` when empty or any segment is empty.
    pub fn from_segments(segments: Vec<String>) -> Option<Self> {
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self {
            dotted: segments.join(C_FIELD_PATH_SEP),
            segments,
        })
    }

    /// Parse a dotted path such as `Address.City`.
    pub fn parse(dotted: &str) -> Option<Self> {
        Self::from_segments(dotted.split(C_FIELD_PATH_SEP).map(str::to_string).collect())
    }

    /// Dotted form.
    pub fn as_str(&self) -> &str {
        &self.dotted
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted)
    }
}

/// Scalar field discovered by path enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFieldLeaf {
    /// Path from the root record.
    pub path: FieldPath,
    /// Native kind of the leaf.
    pub kind: EnumScalarKind,
    /// Default label: segment display names joined with `.`.
    pub label_declared: String,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValueSpecification

/// Typed value of one scalar field.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Integer value; covers the full `i64` and `u64` ranges.
    Integer(i128),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
    /// Timestamp value.
    Timestamp(NaiveDateTime),
}

/// Handling of cells that fail to parse during import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumCoerceMode {
    /// Fall back to the kind's zero value and continue (default).
    #[default]
    Lenient,
    /// Abort the import with the offending row and column.
    Strict,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnSpecification

/// Header policy verdict for one field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecHeaderDecision {
    /// Header label; empty excludes the path.
    pub label: String,
    /// Explicit column order; `None` sorts after explicit orders.
    pub order: Option<i64>,
}

impl SpecHeaderDecision {
    /// Label without explicit order.
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            order: None,
        }
    }

    /// Label with explicit order.
    pub fn ordered(label: impl Into<String>, order: i64) -> Self {
        Self {
            label: label.into(),
            order: Some(order),
        }
    }
}

/// Resolved export/import column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecColumn {
    /// Field path behind the column.
    pub path: FieldPath,
    /// Native kind of the field.
    pub kind: EnumScalarKind,
    /// Header label.
    pub label: String,
    /// Sort key; see [`crate::conf::N_ORDER_UNSET`].
    pub order: i64,
    /// Advisory display width.
    pub width_hint: usize,
}

/// Column width inference policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecColumnWidthPolicy {
    /// Width padding added to label and value widths.
    pub width_cell_padding: usize,
    /// Maximum final width.
    pub width_cell_max: usize,
}

impl Default for SpecColumnWidthPolicy {
    fn default() -> Self {
        Self {
            width_cell_padding: N_WIDTH_CELL_PADDING,
            width_cell_max: N_WIDTH_CELL_MAX,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region OptionsSpecification

/// Header policy callback: label and order per field path, `None` excludes.
pub type HeaderPolicy<'a> = dyn Fn(&FieldPath) -> Option<SpecHeaderDecision> + 'a;

/// Cell value callback: `None` or empty text defers to default rendering.
pub type CellValuePolicy<'a, T> = dyn Fn(&T, &FieldPath) -> Option<String> + 'a;

/// Export call options.
pub struct SpecXlsxExportOptions<'a, T> {
    /// Optional header policy; absent keeps declared labels and order.
    pub header_policy: Option<Box<HeaderPolicy<'a>>>,
    /// Optional per-cell rendering override.
    pub cell_value_policy: Option<Box<CellValuePolicy<'a, T>>>,
    /// Column width inference policy.
    pub policy_width: SpecColumnWidthPolicy,
    /// Apply `fmt_wrap` to cells holding line breaks.
    pub if_wrap_multiline: bool,
    /// Header row format.
    pub fmt_header: SpecCellFormat,
    /// Format for multi-line cells.
    pub fmt_wrap: SpecCellFormat,
}

impl<T> Default for SpecXlsxExportOptions<'_, T> {
    fn default() -> Self {
        Self {
            header_policy: None,
            cell_value_policy: None,
            policy_width: SpecColumnWidthPolicy::default(),
            if_wrap_multiline: true,
            fmt_header: derive_default_header_format(),
            fmt_wrap: derive_default_wrap_format(),
        }
    }
}

impl<T> fmt::Debug for SpecXlsxExportOptions<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecXlsxExportOptions")
            .field("header_policy", &self.header_policy.is_some())
            .field("cell_value_policy", &self.cell_value_policy.is_some())
            .field("policy_width", &self.policy_width)
            .field("if_wrap_multiline", &self.if_wrap_multiline)
            .field("fmt_header", &self.fmt_header)
            .field("fmt_wrap", &self.fmt_wrap)
            .finish()
    }
}

/// Import call options.
#[derive(Default)]
pub struct SpecXlsxImportOptions<'a> {
    /// Optional header policy; must match the one used at export.
    pub header_policy: Option<Box<HeaderPolicy<'a>>>,
    /// Parse-failure handling.
    pub coerce_mode: EnumCoerceMode,
}

impl fmt::Debug for SpecXlsxImportOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecXlsxImportOptions")
            .field("header_policy", &self.header_policy.is_some())
            .field("coerce_mode", &self.coerce_mode)
            .finish()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region GridSpecification

/// In-memory sheet produced by the export planner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxGrid {
    /// Ordered columns with final width hints.
    pub columns: Vec<SpecColumn>,
    /// Rendered data rows (header excluded).
    pub rows: Vec<Vec<String>>,
    /// `(data_row_idx, col_idx)` of cells holding line breaks.
    pub cells_wrap: BTreeSet<(usize, usize)>,
}

impl SpecXlsxGrid {
    /// Header labels in column order.
    pub fn header_row(&self) -> Vec<String> {
        self.columns.iter().map(|col| col.label.clone()).collect()
    }

    /// Number of data rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-export call report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Sheet written.
    pub sheet_name: String,
    /// Data rows written (header excluded).
    pub n_rows: usize,
    /// Columns written.
    pub n_cols: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
