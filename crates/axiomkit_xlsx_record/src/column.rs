//! Header label, column order and width planning.

use crate::conf::N_ORDER_UNSET;
use crate::error::XlsxRecordError;
use crate::path::enumerate_field_paths;
use crate::spec::{HeaderPolicy, SpecColumn, SpecColumnWidthPolicy, SpecRecordType};
use crate::util::{estimate_unicode_string_width, validate_policy_width};

/// Resolve the ordered columns of `record_type`.
///
/// With a header policy, a `None` verdict or an empty label drops the path and
/// a missing order sorts after explicit orders. Without one, every path keeps
/// its declared label in declaration order. Sorting is stable.
pub fn plan_columns(
    record_type: &SpecRecordType,
    header_policy: Option<&HeaderPolicy<'_>>,
    policy_width: &SpecColumnWidthPolicy,
) -> Result<Vec<SpecColumn>, XlsxRecordError> {
    record_type
        .validate()
        .map_err(XlsxRecordError::InvalidRecordType)?;
    validate_policy_width(policy_width)?;

    let mut l_columns = Vec::new();
    for leaf in enumerate_field_paths(record_type) {
        let (c_label, n_order) = match header_policy {
            Some(policy) => match policy(&leaf.path) {
                Some(decision) if !decision.label.is_empty() => {
                    (decision.label, decision.order.unwrap_or(N_ORDER_UNSET))
                }
                _ => continue,
            },
            None => (leaf.label_declared, N_ORDER_UNSET),
        };

        let n_width_hint = usize::min(
            policy_width.width_cell_max,
            estimate_unicode_string_width(&c_label)
                .saturating_add(policy_width.width_cell_padding),
        );
        l_columns.push(SpecColumn {
            path: leaf.path,
            kind: leaf.kind,
            label: c_label,
            order: n_order,
            width_hint: n_width_hint,
        });
    }

    l_columns.sort_by_key(|column| column.order);
    Ok(l_columns)
}

/// Widen `column` to fit `value`, capped by the policy maximum.
pub fn update_column_width(
    column: &mut SpecColumn,
    value: &str,
    policy_width: &SpecColumnWidthPolicy,
) {
    let n_width_value =
        estimate_unicode_string_width(value).saturating_add(policy_width.width_cell_padding);
    column.width_hint = usize::min(
        policy_width.width_cell_max,
        usize::max(column.width_hint, n_width_value),
    );
}
