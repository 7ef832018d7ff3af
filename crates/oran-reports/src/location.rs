use oran_abstract::{
    FieldSpec, FieldType, FieldValue, Report, ReportError, ReportHeader, ReportKind, ReportType,
    TypeDescriptor,
};
use std::any::Any;
use std::fmt;

const POSITION: &str = "position";

const FIELDS: &[FieldSpec] = &[FieldSpec::new(
    POSITION,
    FieldType::Vector,
    "Cartesian position of the node (m)",
)];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.x, self.y, self.z)
    }
}

/// Position of a node at the time of the report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationReport {
    header: ReportHeader,
    position: Position,
}

impl LocationReport {
    pub fn new(header: ReportHeader, position: Position) -> Self {
        Self { header, position }
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

impl fmt::Display for LocationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({};{POSITION}={})",
            Self::KIND,
            self.header,
            self.position
        )
    }
}

impl Report for LocationReport {
    fn kind(&self) -> ReportKind {
        Self::KIND
    }

    fn header(&self) -> &ReportHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ReportHeader {
        &mut self.header
    }

    fn measurements(&self) -> Vec<(&'static str, FieldValue)> {
        let Position { x, y, z } = self.position;
        vec![(POSITION, FieldValue::Vector([x, y, z]))]
    }

    fn set_measurement(&mut self, name: &str, value: FieldValue) -> Result<(), ReportError> {
        match name {
            POSITION => self.position = value.to_vector(Self::KIND, name)?.into(),
            _ => return Err(ReportError::unknown_field(Self::KIND, name)),
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ReportType for LocationReport {
    const KIND: ReportKind = ReportKind::new("Location");

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor {
            kind: Self::KIND,
            description: "Position of a node",
            fields: FIELDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oran_abstract::SimTime;

    #[test]
    fn test_location_display() {
        let r = LocationReport::new(
            ReportHeader::new("ue-3", SimTime::from_secs(2.0)),
            Position::new(10.0, -5.5, 1.5),
        );
        assert_eq!(
            r.to_string(),
            "Location(reporter=ue-3;time=+2s;position=10:-5.5:1.5)"
        );
    }

    #[test]
    fn test_position_field_requires_vector() {
        let mut r = LocationReport::default();
        r.set_field("position", FieldValue::Vector([1.0, 2.0, 3.0]))
            .unwrap();
        assert_eq!(r.position(), Position::new(1.0, 2.0, 3.0));
        assert!(r.set_field("position", 4.0.into()).is_err());
    }
}
