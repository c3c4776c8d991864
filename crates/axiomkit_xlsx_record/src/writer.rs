//! XLSX writer kernel and record export entry points.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, FormatAlign, Workbook};

use crate::access::XlsxRecord;
use crate::error::XlsxRecordError;
use crate::grid::build_export_grid;
use crate::spec::{
    FieldPath, SpecCellFormat, SpecHeaderDecision, SpecXlsxExportOptions, SpecXlsxGrid,
    SpecXlsxReport,
};
use crate::util::{
    cast_col_num, cast_row_num, describe_duplicate_labels, validate_grid_size,
    validate_sheet_name,
};

////////////////////////////////////////////////////////////////////////////////
// #region ExportEntryPoints

/// Export `records` to a new workbook at `path` with one sheet `sheet_name`.
///
/// Labels come from field tags (or dotted paths), columns follow declaration
/// order.
pub fn export_records<T: XlsxRecord>(
    records: &[T],
    path: impl AsRef<Path>,
    sheet_name: &str,
) -> Result<SpecXlsxReport, XlsxRecordError> {
    export_records_with_options(records, path, sheet_name, &SpecXlsxExportOptions::default())
}

/// Export with a header policy and a cell-value policy.
pub fn export_records_with_policies<'a, T, H, C>(
    records: &[T],
    path: impl AsRef<Path>,
    sheet_name: &str,
    header_policy: H,
    cell_value_policy: C,
) -> Result<SpecXlsxReport, XlsxRecordError>
where
    T: XlsxRecord,
    H: Fn(&FieldPath) -> Option<SpecHeaderDecision> + 'a,
    C: Fn(&T, &FieldPath) -> Option<String> + 'a,
{
    let options = SpecXlsxExportOptions {
        header_policy: Some(Box::new(header_policy)),
        cell_value_policy: Some(Box::new(cell_value_policy)),
        ..Default::default()
    };
    export_records_with_options(records, path, sheet_name, &options)
}

/// Export with the full option set.
///
/// Nothing is written when `records` is empty or planning fails; a failed
/// save drops the in-memory workbook.
pub fn export_records_with_options<T: XlsxRecord>(
    records: &[T],
    path: impl AsRef<Path>,
    sheet_name: &str,
    options: &SpecXlsxExportOptions<'_, T>,
) -> Result<SpecXlsxReport, XlsxRecordError> {
    let path = path.as_ref();
    let _span = tracing::debug_span!(
        "export_records",
        path = %path.display(),
        sheet_name,
        n_records = records.len()
    )
    .entered();

    let grid = build_export_grid(records, options)?;

    let mut writer = XlsxRecordWriter::new(
        path.to_path_buf(),
        options.fmt_header.clone(),
        options.fmt_wrap.clone(),
    );
    let report = writer.write_grid(&grid, sheet_name)?;
    writer.close()?;

    tracing::debug!(
        n_rows = report.n_rows,
        n_cols = report.n_cols,
        n_warnings = report.warnings.len(),
        "export finished"
    );
    Ok(report)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Writer

/// Stateful workbook writer.
///
/// The workbook is buffered in memory until [`Self::close`] is called.
pub struct XlsxRecordWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    fmt_header: SpecCellFormat,
    fmt_wrap: SpecCellFormat,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
    if_closed: bool,
}

impl XlsxRecordWriter {
    pub fn new(path_file_out: PathBuf, fmt_header: SpecCellFormat, fmt_wrap: SpecCellFormat) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            fmt_header,
            fmt_wrap,
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Return immutable snapshot of per-sheet write reports.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), XlsxRecordError> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook.save(&self.path_file_out)?;
        self.if_closed = true;
        Ok(())
    }

    /// Write header row, data rows, wrap flags and width hints of `grid`.
    pub fn write_grid(
        &mut self,
        grid: &SpecXlsxGrid,
        sheet_name: &str,
    ) -> Result<SpecXlsxReport, XlsxRecordError> {
        if self.if_closed {
            return Err(XlsxRecordError::WriterClosed);
        }
        validate_sheet_name(sheet_name)?;
        if self.set_sheet_names_existing.contains(sheet_name) {
            return Err(XlsxRecordError::InvalidSheetName {
                sheet_name: sheet_name.to_string(),
                detail: "sheet already written".to_string(),
            });
        }
        validate_grid_size(grid.height(), grid.width())?;

        let mut report = SpecXlsxReport {
            sheet_name: sheet_name.to_string(),
            n_rows: grid.height(),
            n_cols: grid.width(),
            warnings: vec![],
        };
        if grid.columns.is_empty() {
            report.warn("Record type has no exportable fields; sheet has no columns.");
        }
        if let Some(c_msg) = describe_duplicate_labels(&grid.header_row()) {
            tracing::warn!(sheet_name, "duplicate column labels: {c_msg}");
            report.warn(format!(
                "Duplicate column labels (import matches the first): {c_msg}"
            ));
        }

        let fmt_header = derive_rust_xlsx_format(&self.fmt_header);
        let fmt_wrap = derive_rust_xlsx_format(&self.fmt_wrap);

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(sheet_name)?;

        for (n_idx_col, column) in grid.columns.iter().enumerate() {
            worksheet.write_string_with_format(
                0,
                cast_col_num(n_idx_col)?,
                &column.label,
                &fmt_header,
            )?;
        }

        for (n_idx_row, l_row) in grid.rows.iter().enumerate() {
            let n_row = cast_row_num(n_idx_row + 1)?;
            for (n_idx_col, c_value) in l_row.iter().enumerate() {
                let n_col = cast_col_num(n_idx_col)?;
                if grid.cells_wrap.contains(&(n_idx_row, n_idx_col)) {
                    worksheet.write_string_with_format(n_row, n_col, c_value, &fmt_wrap)?;
                } else {
                    worksheet.write_string(n_row, n_col, c_value)?;
                }
            }
        }

        for (n_idx_col, column) in grid.columns.iter().enumerate() {
            worksheet.set_column_width(cast_col_num(n_idx_col)?, column.width_hint as f64)?;
        }

        self.set_sheet_names_existing.insert(sheet_name.to_string());
        self.l_reports.push(report.clone());
        Ok(report)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatConversion

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "justify" => Some(FormatAlign::Justify),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
