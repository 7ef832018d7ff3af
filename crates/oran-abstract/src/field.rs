use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ReportError;
use crate::report::ReportKind;

/// Name of the header field carrying the reporting node id.
pub const REPORTER_FIELD: &str = "reporter";
/// Name of the header field carrying the report timestamp in seconds.
pub const TIME_FIELD: &str = "time";

/// Header fields shared by every report kind.
pub const HEADER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(REPORTER_FIELD, FieldType::Text, "E2 node that produced the report"),
    FieldSpec::new(TIME_FIELD, FieldType::Float, "Simulation time of the report (s)"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Bool,
    Unsigned,
    Float,
    Text,
    Vector,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Bool => "bool",
            FieldType::Unsigned => "unsigned",
            FieldType::Float => "float",
            FieldType::Text => "text",
            FieldType::Vector => "vector",
        };
        f.write_str(name)
    }
}

/// A dynamically typed field value, used when reports are populated or
/// inspected without compile-time knowledge of the concrete type.
///
/// Untagged so scenario files can write `cell_load = 0.73` or
/// `position = [1.0, 2.0, 0.0]` directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Unsigned(u64),
    Float(f64),
    Text(String),
    Vector([f64; 3]),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::Unsigned(_) => FieldType::Unsigned,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Vector(_) => FieldType::Vector,
        }
    }

    /// Integers are accepted where a float is expected.
    pub fn to_f64(&self, kind: ReportKind, field: &str) -> Result<f64, ReportError> {
        match self {
            FieldValue::Float(v) => Ok(*v),
            FieldValue::Unsigned(v) => Ok(*v as f64),
            other => Err(other.mismatch(kind, field, FieldType::Float)),
        }
    }

    /// Narrowing conversion for unsigned fields, rejecting values that do not fit `T`.
    pub fn to_unsigned<T: TryFrom<u64>>(
        &self,
        kind: ReportKind,
        field: &str,
    ) -> Result<T, ReportError> {
        match self {
            FieldValue::Unsigned(v) => T::try_from(*v).map_err(|_| {
                ReportError::invalid_field(
                    kind,
                    field,
                    format!("value {v} is out of range for this field"),
                )
            }),
            other => Err(other.mismatch(kind, field, FieldType::Unsigned)),
        }
    }

    pub fn to_bool(&self, kind: ReportKind, field: &str) -> Result<bool, ReportError> {
        match self {
            FieldValue::Bool(v) => Ok(*v),
            other => Err(other.mismatch(kind, field, FieldType::Bool)),
        }
    }

    pub fn to_text(&self, kind: ReportKind, field: &str) -> Result<&str, ReportError> {
        match self {
            FieldValue::Text(v) => Ok(v),
            other => Err(other.mismatch(kind, field, FieldType::Text)),
        }
    }

    pub fn to_vector(&self, kind: ReportKind, field: &str) -> Result<[f64; 3], ReportError> {
        match self {
            FieldValue::Vector(v) => Ok(*v),
            other => Err(other.mismatch(kind, field, FieldType::Vector)),
        }
    }

    fn mismatch(&self, kind: ReportKind, field: &str, expected: FieldType) -> ReportError {
        ReportError::invalid_field(
            kind,
            field,
            format!("expected {expected}, got {}", self.field_type()),
        )
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Unsigned(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Text(v) => f.write_str(v),
            FieldValue::Vector([x, y, z]) => write!(f, "{x}:{y}:{z}"),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Unsigned(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Describes one field of a report type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub description: &'static str,
}

impl FieldSpec {
    pub const fn new(name: &'static str, ty: FieldType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            description,
        }
    }
}

/// Field layout of a report kind, handed to the registry at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    pub kind: ReportKind,
    pub description: &'static str,
    /// Measurement fields only; [`HEADER_FIELDS`] apply to every kind.
    pub fields: &'static [FieldSpec],
}

impl TypeDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        HEADER_FIELDS
            .iter()
            .chain(self.fields.iter())
            .find(|spec| spec.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIND: ReportKind = ReportKind::new("Test");

    #[test]
    fn test_integers_widen_to_float() {
        assert_eq!(FieldValue::Unsigned(3).to_f64(KIND, "x"), Ok(3.0));
        assert_eq!(FieldValue::Float(0.25).to_f64(KIND, "x"), Ok(0.25));
    }

    #[test]
    fn test_narrowing_rejects_out_of_range() {
        let ok: u16 = FieldValue::Unsigned(65_535).to_unsigned(KIND, "rnti").unwrap();
        assert_eq!(ok, 65_535);

        let err = FieldValue::Unsigned(70_000)
            .to_unsigned::<u16>(KIND, "rnti")
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidField { ref field, .. } if field == "rnti"));
    }

    #[test]
    fn test_type_mismatch_names_both_types() {
        let err = FieldValue::Text("high".into())
            .to_f64(KIND, "cell_load")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid field 'cell_load' on Test: expected float, got text"
        );
    }

    #[test]
    fn test_vector_display() {
        assert_eq!(FieldValue::Vector([1.0, 2.5, 0.0]).to_string(), "1:2.5:0");
    }
}
