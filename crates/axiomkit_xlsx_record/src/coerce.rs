//! Conversion between native field values and grid text.
//!
//! Rendering uses each kind's default textual form. Parsing is best-effort:
//! [`parse_cell_text`] reports failures, [`parse_cell_text_lenient`] folds
//! them into the kind's zero value so one bad cell never aborts an import.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::conf::{C_FMT_DATE, C_FMT_TIMESTAMP};
use crate::error::CoerceError;
use crate::spec::{EnumCellValue, EnumScalarKind};

////////////////////////////////////////////////////////////////////////////////
// #region ScalarTraits

/// Rust type that maps to one spreadsheet cell.
pub trait CellScalar: Sized {
    /// Native kind used to parse imported text.
    const KIND: EnumScalarKind;

    /// Typed value for rendering.
    fn to_cell_value(&self) -> EnumCellValue;

    /// Convert a parsed value; `None` when the value does not fit this type.
    ///
    /// [`EnumCellValue::None`] (blank cell) yields the type's zero value.
    fn from_cell_value(value: EnumCellValue) -> Option<Self>;
}

/// Object-safe write handle onto a scalar field.
pub trait ScalarSlot {
    /// Store `value`; returns `false` and leaves the field untouched when the
    /// value does not fit.
    fn assign_cell_value(&mut self, value: EnumCellValue) -> bool;
}

impl<T: CellScalar> ScalarSlot for T {
    fn assign_cell_value(&mut self, value: EnumCellValue) -> bool {
        match T::from_cell_value(value) {
            Some(val) => {
                *self = val;
                true
            }
            None => false,
        }
    }
}

macro_rules! impl_cell_scalar_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CellScalar for $ty {
                const KIND: EnumScalarKind = EnumScalarKind::Integer;

                fn to_cell_value(&self) -> EnumCellValue {
                    // Lossless: every primitive up to 64 bits fits in i128.
                    EnumCellValue::Integer(*self as i128)
                }

                fn from_cell_value(value: EnumCellValue) -> Option<Self> {
                    match value {
                        EnumCellValue::None => Some(0),
                        EnumCellValue::Integer(val) => <$ty>::try_from(val).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_cell_scalar_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl CellScalar for f64 {
    const KIND: EnumScalarKind = EnumScalarKind::Float;

    fn to_cell_value(&self) -> EnumCellValue {
        EnumCellValue::Float(*self)
    }

    fn from_cell_value(value: EnumCellValue) -> Option<Self> {
        match value {
            EnumCellValue::None => Some(0.0),
            EnumCellValue::Float(val) => Some(val),
            EnumCellValue::Integer(val) => Some(val as f64),
            _ => None,
        }
    }
}

impl CellScalar for f32 {
    const KIND: EnumScalarKind = EnumScalarKind::Float;

    fn to_cell_value(&self) -> EnumCellValue {
        // Widen through the shortest f32 text so 0.1f32 renders as "0.1".
        EnumCellValue::Float(
            self.to_string()
                .parse::<f64>()
                .unwrap_or_else(|_| f64::from(*self)),
        )
    }

    fn from_cell_value(value: EnumCellValue) -> Option<Self> {
        match value {
            EnumCellValue::None => Some(0.0),
            EnumCellValue::Float(val) => Some(val as f32),
            EnumCellValue::Integer(val) => Some(val as f32),
            _ => None,
        }
    }
}

impl CellScalar for bool {
    const KIND: EnumScalarKind = EnumScalarKind::Boolean;

    fn to_cell_value(&self) -> EnumCellValue {
        EnumCellValue::Boolean(*self)
    }

    fn from_cell_value(value: EnumCellValue) -> Option<Self> {
        match value {
            EnumCellValue::None => Some(false),
            EnumCellValue::Boolean(val) => Some(val),
            _ => None,
        }
    }
}

impl CellScalar for String {
    const KIND: EnumScalarKind = EnumScalarKind::Text;

    fn to_cell_value(&self) -> EnumCellValue {
        EnumCellValue::String(self.clone())
    }

    fn from_cell_value(value: EnumCellValue) -> Option<Self> {
        match value {
            EnumCellValue::None => Some(String::new()),
            EnumCellValue::String(val) => Some(val),
            other => Some(render_cell_value(&other)),
        }
    }
}

impl CellScalar for NaiveDateTime {
    const KIND: EnumScalarKind = EnumScalarKind::Timestamp;

    fn to_cell_value(&self) -> EnumCellValue {
        EnumCellValue::Timestamp(*self)
    }

    fn from_cell_value(value: EnumCellValue) -> Option<Self> {
        match value {
            EnumCellValue::None => Some(NaiveDateTime::default()),
            EnumCellValue::Timestamp(val) => Some(val),
            _ => None,
        }
    }
}

impl CellScalar for DateTime<Utc> {
    const KIND: EnumScalarKind = EnumScalarKind::Timestamp;

    fn to_cell_value(&self) -> EnumCellValue {
        EnumCellValue::Timestamp(self.naive_utc())
    }

    fn from_cell_value(value: EnumCellValue) -> Option<Self> {
        match value {
            EnumCellValue::None => Some(DateTime::<Utc>::default()),
            EnumCellValue::Timestamp(val) => Some(DateTime::from_naive_utc_and_offset(val, Utc)),
            _ => None,
        }
    }
}

impl<T: CellScalar> CellScalar for Option<T> {
    const KIND: EnumScalarKind = T::KIND;

    fn to_cell_value(&self) -> EnumCellValue {
        match self {
            Some(val) => val.to_cell_value(),
            None => EnumCellValue::None,
        }
    }

    fn from_cell_value(value: EnumCellValue) -> Option<Self> {
        match value {
            EnumCellValue::None => Some(None),
            EnumCellValue::String(val) if val.is_empty() => Some(None),
            other => T::from_cell_value(other).map(Some),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Rendering

/// Render a typed value with its default textual form.
pub fn render_cell_value(value: &EnumCellValue) -> String {
    match value {
        EnumCellValue::None => String::new(),
        EnumCellValue::String(val) => val.clone(),
        EnumCellValue::Integer(val) => val.to_string(),
        EnumCellValue::Float(val) => val.to_string(),
        EnumCellValue::Boolean(val) => val.to_string(),
        EnumCellValue::Timestamp(val) => val.format(C_FMT_TIMESTAMP).to_string(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Parsing

/// Parse grid text into `kind`.
///
/// Empty text is a blank cell for every kind but text.
pub fn parse_cell_text(text: &str, kind: EnumScalarKind) -> Result<EnumCellValue, CoerceError> {
    if kind == EnumScalarKind::Text {
        return Ok(EnumCellValue::String(text.to_string()));
    }
    if text.is_empty() {
        return Ok(EnumCellValue::None);
    }

    let value = match kind {
        EnumScalarKind::Text => Some(EnumCellValue::String(text.to_string())),
        EnumScalarKind::Integer => text.parse::<i128>().ok().map(EnumCellValue::Integer),
        EnumScalarKind::Float => text.parse::<f64>().ok().map(EnumCellValue::Float),
        EnumScalarKind::Boolean => parse_bool_text(text).map(EnumCellValue::Boolean),
        EnumScalarKind::Timestamp => parse_timestamp_text(text).map(EnumCellValue::Timestamp),
    };

    value.ok_or_else(|| CoerceError {
        text: text.to_string(),
        kind,
    })
}

/// Parse grid text into `kind`, absorbing failures.
///
/// Failed integer/float/boolean cells become zero/`false`. A failed timestamp
/// returns `None`: the field keeps its unset value.
pub fn parse_cell_text_lenient(text: &str, kind: EnumScalarKind) -> Option<EnumCellValue> {
    match parse_cell_text(text, kind) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::trace!(%err, "cell parse failure absorbed");
            derive_zero_cell_value(kind)
        }
    }
}

/// Zero value substituted for an unparsable cell.
pub fn derive_zero_cell_value(kind: EnumScalarKind) -> Option<EnumCellValue> {
    match kind {
        EnumScalarKind::Text => Some(EnumCellValue::String(String::new())),
        EnumScalarKind::Integer => Some(EnumCellValue::Integer(0)),
        EnumScalarKind::Float => Some(EnumCellValue::Float(0.0)),
        EnumScalarKind::Boolean => Some(EnumCellValue::Boolean(false)),
        EnumScalarKind::Timestamp => None,
    }
}

/// Accept the canonical boolean spellings.
pub fn parse_bool_text(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Try the full date-time layout, then the date-only layout.
pub fn parse_timestamp_text(text: &str) -> Option<NaiveDateTime> {
    if let Ok(val) = NaiveDateTime::parse_from_str(text, C_FMT_TIMESTAMP) {
        return Some(val);
    }
    NaiveDate::parse_from_str(text, C_FMT_DATE)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
