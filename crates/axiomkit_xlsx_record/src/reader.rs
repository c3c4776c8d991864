//! XLSX reader kernel and record import entry points.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};

use crate::access::XlsxRecord;
use crate::conf::C_FMT_TIMESTAMP;
use crate::error::XlsxRecordError;
use crate::grid::parse_grid_rows;
use crate::spec::SpecXlsxImportOptions;

////////////////////////////////////////////////////////////////////////////////
// #region ImportEntryPoints

/// Import every data row of `sheet_name` as one `T`.
pub fn import_records<T: XlsxRecord>(
    path: impl AsRef<Path>,
    sheet_name: &str,
) -> Result<Vec<T>, XlsxRecordError> {
    import_records_with_options(path, sheet_name, &SpecXlsxImportOptions::default())
}

/// Import with a header policy and/or strict coercion.
pub fn import_records_with_options<T: XlsxRecord>(
    path: impl AsRef<Path>,
    sheet_name: &str,
    options: &SpecXlsxImportOptions<'_>,
) -> Result<Vec<T>, XlsxRecordError> {
    let path = path.as_ref();
    let _span = tracing::debug_span!(
        "import_records",
        path = %path.display(),
        sheet_name,
        coerce_mode = ?options.coerce_mode
    )
    .entered();

    let l_rows = read_sheet_rows(path, sheet_name)?;
    let l_records = parse_grid_rows(&l_rows, sheet_name, options)?;
    tracing::debug!(n_records = l_records.len(), "import finished");
    Ok(l_records)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetReading

/// Read `sheet_name` as text rows anchored at cell A1.
///
/// The workbook is closed before returning.
pub fn read_sheet_rows(
    path: &Path,
    sheet_name: &str,
) -> Result<Vec<Vec<String>>, XlsxRecordError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| XlsxRecordError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|err| XlsxRecordError::InvalidSheet {
            sheet_name: sheet_name.to_string(),
            detail: err.to_string(),
        })?;

    Ok(derive_string_rows_from_range(&range))
}

/// Convert a used range to text rows, padding the rows and columns that lie
/// before the range start.
pub fn derive_string_rows_from_range(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((n_row_start, n_col_start)) = range.start() else {
        return vec![];
    };

    let mut l_rows = vec![Vec::new(); n_row_start as usize];
    for row in range.rows() {
        let mut l_row = vec![String::new(); n_col_start as usize];
        l_row.extend(row.iter().map(derive_cell_text_from_data));
        l_rows.push(l_row);
    }
    l_rows
}

/// Text form of one calamine cell.
pub fn derive_cell_text_from_data(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(val) => val.clone(),
        Data::Int(val) => val.to_string(),
        Data::Float(val) => val.to_string(),
        Data::Bool(val) => val.to_string(),
        Data::DateTime(val) => match val.as_datetime() {
            Some(dt) => dt.format(C_FMT_TIMESTAMP).to_string(),
            None => val.as_f64().to_string(),
        },
        Data::DateTimeIso(val) => val.clone(),
        Data::DurationIso(val) => val.clone(),
        Data::Error(err) => err.to_string(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
