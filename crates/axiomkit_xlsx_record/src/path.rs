//! Field path discovery over a record schema.

use crate::conf::C_FIELD_PATH_SEP;
use crate::spec::{EnumFieldKind, FieldPath, SpecFieldLeaf, SpecRecordType};

/// Enumerate exportable scalar field paths in pre-order.
///
/// Excluded and non-public fields are skipped. Nested records are never
/// emitted themselves; their scalar descendants appear at the parent's
/// position, prefixed with the parent's name.
pub fn enumerate_field_paths(record_type: &SpecRecordType) -> Vec<SpecFieldLeaf> {
    let mut l_leaves = Vec::new();
    extend_field_paths(record_type, &[], &[], &mut l_leaves);
    l_leaves
}

fn extend_field_paths(
    record_type: &SpecRecordType,
    prefix: &[String],
    prefix_labels: &[String],
    l_leaves: &mut Vec<SpecFieldLeaf>,
) {
    for field in &record_type.fields {
        if !field.if_public || field.is_excluded() {
            continue;
        }

        let mut l_segments = prefix.to_vec();
        l_segments.push(field.name.clone());
        let mut l_labels = prefix_labels.to_vec();
        l_labels.push(field.display_name().to_string());

        match &field.kind {
            EnumFieldKind::Scalar(kind) => {
                let Some(path) = FieldPath::from_segments(l_segments) else {
                    continue;
                };
                l_leaves.push(SpecFieldLeaf {
                    path,
                    kind: *kind,
                    label_declared: l_labels.join(C_FIELD_PATH_SEP),
                });
            }
            EnumFieldKind::Record(nested) => {
                extend_field_paths(nested, &l_segments, &l_labels, l_leaves);
            }
            EnumFieldKind::Excluded => {}
        }
    }
}
