//! Stateless helper utilities shared by the planners and the XLSX backends.

use std::collections::BTreeMap;

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::error::XlsxRecordError;
use crate::spec::SpecColumnWidthPolicy;

////////////////////////////////////////////////////////////////////////////////
// #region WidthEstimation

/// Estimate displayed width units of `s`; non-ASCII characters count 1.6.
pub fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

/// Whether a rendered value needs wrapped display.
pub fn if_text_has_line_break(s: &str) -> bool {
    s.contains('\n') || s.contains('\r')
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Validation

/// Describe duplicated labels, `None` when all labels are unique.
pub fn describe_duplicate_labels(labels: &[String]) -> Option<String> {
    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_label) in labels.iter().enumerate() {
        dict_pos.entry(c_label).or_default().push(n_idx);
    }

    let c_msg = dict_pos
        .iter()
        .filter_map(|(c_label, l_pos)| {
            if l_pos.len() > 1 {
                Some(format!(
                    "{c_label:?} x{} at indices {:?}",
                    l_pos.len(),
                    l_pos
                ))
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("; ");

    if c_msg.is_empty() { None } else { Some(c_msg) }
}

/// Reject names Excel would refuse for a worksheet.
pub fn validate_sheet_name(name: &str) -> Result<(), XlsxRecordError> {
    let derive_err = |detail: String| XlsxRecordError::InvalidSheetName {
        sheet_name: name.to_string(),
        detail,
    };

    if name.trim().is_empty() {
        return Err(derive_err("name is empty".to_string()));
    }
    if name.chars().count() > N_LEN_EXCEL_SHEET_NAME_MAX {
        return Err(derive_err(format!(
            "name exceeds {N_LEN_EXCEL_SHEET_NAME_MAX} characters"
        )));
    }
    if let Some(c_illegal) = TUP_EXCEL_ILLEGAL.iter().find(|chr| name.contains(**chr)) {
        return Err(derive_err(format!("name contains {c_illegal:?}")));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(derive_err("name starts or ends with an apostrophe".to_string()));
    }
    Ok(())
}

/// Check that a header row plus `height_data` rows and `width` columns fit
/// into one worksheet.
pub fn validate_grid_size(height_data: usize, width: usize) -> Result<(), XlsxRecordError> {
    if height_data + 1 > N_NROWS_EXCEL_MAX {
        return Err(XlsxRecordError::GridOverflow(format!(
            "{height_data} data rows exceed the sheet limit of {} rows.",
            N_NROWS_EXCEL_MAX - 1
        )));
    }
    if width > N_NCOLS_EXCEL_MAX {
        return Err(XlsxRecordError::GridOverflow(format!(
            "{width} columns exceed the sheet limit of {N_NCOLS_EXCEL_MAX} columns."
        )));
    }
    Ok(())
}

/// Validate width inference bounds.
pub fn validate_policy_width(policy_width: &SpecColumnWidthPolicy) -> Result<(), XlsxRecordError> {
    if policy_width.width_cell_max == 0 {
        return Err(XlsxRecordError::InvalidOption(
            "policy_width.width_cell_max must be >= 1.".to_string(),
        ));
    }
    if policy_width.width_cell_max > 255 {
        return Err(XlsxRecordError::InvalidOption(
            "policy_width.width_cell_max must be <= 255.".to_string(),
        ));
    }
    if policy_width.width_cell_padding > policy_width.width_cell_max {
        return Err(XlsxRecordError::InvalidOption(
            "policy_width.width_cell_padding must be <= width_cell_max.".to_string(),
        ));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region IndexCasting

pub fn cast_row_num(value: usize) -> Result<u32, XlsxRecordError> {
    u32::try_from(value)
        .map_err(|_| XlsxRecordError::GridOverflow(format!("row index overflow: {value}")))
}

pub fn cast_col_num(value: usize) -> Result<u16, XlsxRecordError> {
    u16::try_from(value)
        .map_err(|_| XlsxRecordError::GridOverflow(format!("column index overflow: {value}")))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
