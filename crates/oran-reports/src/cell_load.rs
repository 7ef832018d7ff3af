use oran_abstract::{
    FieldSpec, FieldType, FieldValue, Report, ReportError, ReportHeader, ReportKind, ReportType,
    TypeDescriptor,
};
use std::any::Any;
use std::fmt;

const CELL_LOAD: &str = "cell_load";

const FIELDS: &[FieldSpec] = &[FieldSpec::new(
    CELL_LOAD,
    FieldType::Float,
    "Fraction of cell resources in use, nominally in [0, 1]",
)];

/// Load of an LTE cell as reported by its eNB.
///
/// The load is stored exactly as given; values outside `[0, 1]` are kept so
/// that consumers see what the producer measured.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LteCellLoadReport {
    header: ReportHeader,
    cell_load: f64,
}

impl LteCellLoadReport {
    pub fn new(header: ReportHeader, cell_load: f64) -> Self {
        Self { header, cell_load }
    }

    pub fn cell_load(&self) -> f64 {
        self.cell_load
    }
}

impl fmt::Display for LteCellLoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({};{CELL_LOAD}={})",
            Self::KIND,
            self.header,
            self.cell_load
        )
    }
}

impl Report for LteCellLoadReport {
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
        vec![(CELL_LOAD, FieldValue::Float(self.cell_load))]
    }

    fn set_measurement(&mut self, name: &str, value: FieldValue) -> Result<(), ReportError> {
        match name {
            CELL_LOAD => self.cell_load = value.to_f64(Self::KIND, name)?,
            _ => return Err(ReportError::unknown_field(Self::KIND, name)),
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ReportType for LteCellLoadReport {
    const KIND: ReportKind = ReportKind::new("LteCellLoad");

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor {
            kind: Self::KIND,
            description: "Load of an LTE cell",
            fields: FIELDS,
        }
    }
}
