//! Record collection <-> in-memory grid planning.
//!
//! These functions carry the whole mapping contract; the `writer` and
//! `reader` modules only move the grid in and out of a workbook file.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::access::{EnumWriteOutcome, XlsxRecord, read_value_by_path, write_value_by_path};
use crate::coerce::{parse_cell_text, parse_cell_text_lenient, render_cell_value};
use crate::column::{plan_columns, update_column_width};
use crate::error::{CoerceError, XlsxRecordError};
use crate::spec::{
    CellValuePolicy, EnumCoerceMode, FieldPath, SpecColumn, SpecColumnWidthPolicy,
    SpecXlsxExportOptions, SpecXlsxGrid, SpecXlsxImportOptions,
};
use crate::util::{if_text_has_line_break, validate_grid_size};

////////////////////////////////////////////////////////////////////////////////
// #region Export

/// Render `records` into a grid: columns planned once, one row per record.
///
/// Fails with [`XlsxRecordError::EmptyInput`] before any planning when
/// `records` is empty.
pub fn build_export_grid<T: XlsxRecord>(
    records: &[T],
    options: &SpecXlsxExportOptions<'_, T>,
) -> Result<SpecXlsxGrid, XlsxRecordError> {
    if records.is_empty() {
        return Err(XlsxRecordError::EmptyInput);
    }

    let mut l_columns = plan_columns(
        &T::record_type(),
        options.header_policy.as_deref(),
        &options.policy_width,
    )?;
    validate_grid_size(records.len(), l_columns.len())?;
    tracing::debug!(
        n_cols = l_columns.len(),
        n_rows = records.len(),
        "export columns planned"
    );

    let mut l_rows = Vec::with_capacity(records.len());
    let mut set_cells_wrap = BTreeSet::new();
    for (n_idx_row, record) in records.iter().enumerate() {
        let mut l_row = Vec::with_capacity(l_columns.len());
        for (n_idx_col, column) in l_columns.iter_mut().enumerate() {
            let c_value =
                render_record_cell(record, &column.path, options.cell_value_policy.as_deref());
            update_column_width(column, &c_value, &options.policy_width);
            if options.if_wrap_multiline && if_text_has_line_break(&c_value) {
                set_cells_wrap.insert((n_idx_row, n_idx_col));
            }
            l_row.push(c_value);
        }
        l_rows.push(l_row);
    }

    Ok(SpecXlsxGrid {
        columns: l_columns,
        rows: l_rows,
        cells_wrap: set_cells_wrap,
    })
}

/// Text of one cell: the cell-value policy wins unless it yields nothing,
/// then default rendering; an unresolved path renders as empty text.
pub fn render_record_cell<T: XlsxRecord>(
    record: &T,
    path: &FieldPath,
    cell_value_policy: Option<&CellValuePolicy<'_, T>>,
) -> String {
    if let Some(policy) = cell_value_policy
        && let Some(c_value) = policy(record, path)
        && !c_value.is_empty()
    {
        return c_value;
    }

    match read_value_by_path(record, path) {
        Some(value) => render_cell_value(&value),
        None => {
            tracing::trace!(path = %path, "unresolved field path rendered as empty cell");
            String::new()
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Import

/// Parse string rows (row 0 = header) into one record per data row.
///
/// Header cells are matched against the planned column labels (first column
/// wins on duplicate labels); unmatched cells and cells beyond the header
/// width are ignored.
pub fn parse_grid_rows<T: XlsxRecord>(
    rows: &[Vec<String>],
    sheet_name: &str,
    options: &SpecXlsxImportOptions<'_>,
) -> Result<Vec<T>, XlsxRecordError> {
    if rows.len() < 2 {
        return Err(XlsxRecordError::InvalidSheet {
            sheet_name: sheet_name.to_string(),
            detail: format!(
                "expected a header row and at least one data row, found {} row(s)",
                rows.len()
            ),
        });
    }

    let l_columns = plan_columns(
        &T::record_type(),
        options.header_policy.as_deref(),
        &SpecColumnWidthPolicy::default(),
    )?;

    let mut dict_column_by_label: HashMap<&str, &SpecColumn> = HashMap::new();
    for column in &l_columns {
        dict_column_by_label
            .entry(column.label.as_str())
            .or_insert(column);
    }

    let l_header = &rows[0];
    // Only the first header cell carrying a label feeds its field.
    let mut set_labels_claimed: HashSet<&str> = HashSet::new();
    let l_targets: Vec<Option<&SpecColumn>> = l_header
        .iter()
        .map(|c_label| {
            let column = dict_column_by_label.get(c_label.as_str()).copied()?;
            set_labels_claimed.insert(c_label.as_str()).then_some(column)
        })
        .collect();
    tracing::debug!(
        sheet_name,
        n_header_cols = l_header.len(),
        n_matched_cols = l_targets.iter().flatten().count(),
        n_rows = rows.len() - 1,
        "import header matched"
    );

    let mut l_records = Vec::with_capacity(rows.len() - 1);
    for (n_idx_row, l_row) in rows.iter().enumerate().skip(1) {
        let mut record = T::default();
        for (n_idx_col, c_text) in l_row.iter().enumerate() {
            let Some(Some(column)) = l_targets.get(n_idx_col) else {
                continue;
            };
            import_cell(&mut record, column, c_text, n_idx_row + 1, options.coerce_mode)?;
        }
        l_records.push(record);
    }

    Ok(l_records)
}

fn import_cell<T: XlsxRecord>(
    record: &mut T,
    column: &SpecColumn,
    text: &str,
    n_row: usize,
    coerce_mode: EnumCoerceMode,
) -> Result<(), XlsxRecordError> {
    // Blank cells keep the default value; absent optional records stay absent.
    if text.is_empty() {
        return Ok(());
    }

    let derive_err = |source: CoerceError| XlsxRecordError::CellParse {
        row: n_row,
        label: column.label.clone(),
        source,
    };

    match coerce_mode {
        EnumCoerceMode::Lenient => {
            let Some(value) = parse_cell_text_lenient(text, column.kind) else {
                return Ok(());
            };
            let outcome = write_value_by_path(record, &column.path, value);
            if outcome != EnumWriteOutcome::Written {
                tracing::trace!(
                    row = n_row,
                    path = %column.path,
                    ?outcome,
                    "cell value not written"
                );
            }
        }
        EnumCoerceMode::Strict => {
            let value = parse_cell_text(text, column.kind).map_err(derive_err)?;
            if write_value_by_path(record, &column.path, value) == EnumWriteOutcome::Rejected {
                return Err(derive_err(CoerceError {
                    text: text.to_string(),
                    kind: column.kind,
                }));
            }
        }
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
