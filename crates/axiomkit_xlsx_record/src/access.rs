//! Record schema providers and dotted-path value access.

use crate::coerce::ScalarSlot;
use crate::spec::{EnumCellValue, FieldPath, SpecRecordType};

////////////////////////////////////////////////////////////////////////////////
// #region RecordTraits

/// Read-only view of one field of a record instance.
pub enum EnumFieldRef<'a> {
    /// Scalar value.
    Scalar(EnumCellValue),
    /// Nested record; `None` for an absent optional record.
    Record(Option<&'a dyn RecordAccess>),
}

/// Mutable view of one field of a record instance.
pub enum EnumFieldMut<'a> {
    /// Scalar slot.
    Scalar(&'a mut dyn ScalarSlot),
    /// Nested record, materialized if it was absent.
    Record(&'a mut dyn RecordAccess),
}

/// Field-by-name access on a record instance.
///
/// Non-public fields are not reachable: both lookups return `None` for them.
pub trait RecordAccess {
    fn get_field(&self, name: &str) -> Option<EnumFieldRef<'_>>;

    fn get_field_mut(&mut self, name: &str) -> Option<EnumFieldMut<'_>>;
}

/// Record type that can be exported to and imported from a sheet.
///
/// Usually implemented with `#[derive(XlsxRecord)]`; a hand-written impl is
/// the registration path for types the derive cannot describe.
pub trait XlsxRecord: RecordAccess + Default {
    /// Schema of the type, built once per export/import call.
    fn record_type() -> SpecRecordType;
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathAccess

/// Result of writing one value through a field path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumWriteOutcome {
    /// Value stored.
    Written,
    /// Path did not resolve to a reachable scalar field.
    Unresolved,
    /// Field refused the value (kind or range mismatch).
    Rejected,
}

/// Read the scalar at `path`; `None` when the path does not resolve.
pub fn read_value_by_path(record: &dyn RecordAccess, path: &FieldPath) -> Option<EnumCellValue> {
    let (c_last, l_parents) = path.segments().split_last()?;

    let mut current = record;
    for c_segment in l_parents {
        match current.get_field(c_segment)? {
            EnumFieldRef::Record(Some(next)) => current = next,
            EnumFieldRef::Record(None) | EnumFieldRef::Scalar(_) => return None,
        }
    }

    match current.get_field(c_last)? {
        EnumFieldRef::Scalar(value) => Some(value),
        EnumFieldRef::Record(_) => None,
    }
}

/// Write `value` into the scalar at `path`.
pub fn write_value_by_path(
    record: &mut dyn RecordAccess,
    path: &FieldPath,
    value: EnumCellValue,
) -> EnumWriteOutcome {
    let Some((c_last, l_parents)) = path.segments().split_last() else {
        return EnumWriteOutcome::Unresolved;
    };

    let mut current = record;
    for c_segment in l_parents {
        match current.get_field_mut(c_segment) {
            Some(EnumFieldMut::Record(next)) => current = next,
            _ => return EnumWriteOutcome::Unresolved,
        }
    }

    match current.get_field_mut(c_last) {
        Some(EnumFieldMut::Scalar(slot)) => {
            if slot.assign_cell_value(value) {
                EnumWriteOutcome::Written
            } else {
                EnumWriteOutcome::Rejected
            }
        }
        _ => EnumWriteOutcome::Unresolved,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::CellScalar;
    use crate::spec::{EnumScalarKind, SpecField};

    #[derive(Debug, Default, PartialEq)]
    struct Address {
        city: String,
        zip: i32,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Person {
        name: String,
        home: Address,
        work: Option<Address>,
        secret: String,
    }

    impl RecordAccess for Address {
        fn get_field(&self, name: &str) -> Option<EnumFieldRef<'_>> {
            match name {
                "city" => Some(EnumFieldRef::Scalar(self.city.to_cell_value())),
                "zip" => Some(EnumFieldRef::Scalar(self.zip.to_cell_value())),
                _ => None,
            }
        }

        fn get_field_mut(&mut self, name: &str) -> Option<EnumFieldMut<'_>> {
            match name {
                "city" => Some(EnumFieldMut::Scalar(&mut self.city)),
                "zip" => Some(EnumFieldMut::Scalar(&mut self.zip)),
                _ => None,
            }
        }
    }

    impl XlsxRecord for Address {
        fn record_type() -> SpecRecordType {
            SpecRecordType::new(
                "Address",
                vec![
                    SpecField::scalar("city", EnumScalarKind::Text),
                    SpecField::scalar("zip", EnumScalarKind::Integer),
                ],
            )
        }
    }

    // `secret` is private: no accessor arms.
    impl RecordAccess for Person {
        fn get_field(&self, name: &str) -> Option<EnumFieldRef<'_>> {
            match name {
                "name" => Some(EnumFieldRef::Scalar(self.name.to_cell_value())),
                "home" => Some(EnumFieldRef::Record(Some(&self.home as &dyn RecordAccess))),
                "work" => Some(EnumFieldRef::Record(
                    self.work.as_ref().map(|val| val as &dyn RecordAccess),
                )),
                _ => None,
            }
        }

        fn get_field_mut(&mut self, name: &str) -> Option<EnumFieldMut<'_>> {
            match name {
                "name" => Some(EnumFieldMut::Scalar(&mut self.name)),
                "home" => Some(EnumFieldMut::Record(&mut self.home)),
                "work" => Some(EnumFieldMut::Record(self.work.get_or_insert_with(Default::default))),
                _ => None,
            }
        }
    }

    fn path(dotted: &str) -> FieldPath {
        FieldPath::parse(dotted).unwrap()
    }

    fn person() -> Person {
        Person {
            name: "Alice".to_string(),
            home: Address {
                city: "Oslo".to_string(),
                zip: 150,
            },
            work: None,
            secret: "hidden".to_string(),
        }
    }

    #[test]
    fn test_read_descends_nested_records() {
        let person = person();
        assert_eq!(
            read_value_by_path(&person, &path("name")),
            Some(EnumCellValue::String("Alice".to_string()))
        );
        assert_eq!(
            read_value_by_path(&person, &path("home.zip")),
            Some(EnumCellValue::Integer(150))
        );
    }

    #[test]
    fn test_read_failures_are_absent_values() {
        let person = person();
        assert_eq!(read_value_by_path(&person, &path("work.city")), None);
        assert_eq!(read_value_by_path(&person, &path("home")), None);
        assert_eq!(read_value_by_path(&person, &path("name.first")), None);
        assert_eq!(read_value_by_path(&person, &path("home.street")), None);
        assert_eq!(read_value_by_path(&person, &path("secret")), None);
    }

    #[test]
    fn test_write_materializes_optional_nested_record() {
        let mut person = Person::default();
        assert_eq!(
            write_value_by_path(
                &mut person,
                &path("work.city"),
                EnumCellValue::String("Bergen".to_string())
            ),
            EnumWriteOutcome::Written
        );
        assert_eq!(person.work.as_ref().map(|val| val.city.as_str()), Some("Bergen"));
    }

    #[test]
    fn test_write_skips_private_and_rejects_mismatched_kind() {
        let mut person = person();
        assert_eq!(
            write_value_by_path(
                &mut person,
                &path("secret"),
                EnumCellValue::String("x".to_string())
            ),
            EnumWriteOutcome::Unresolved
        );
        assert_eq!(person.secret, "hidden");

        assert_eq!(
            write_value_by_path(&mut person, &path("home.zip"), EnumCellValue::Boolean(true)),
            EnumWriteOutcome::Rejected
        );
        assert_eq!(person.home.zip, 150);
    }
}
