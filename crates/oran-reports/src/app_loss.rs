use oran_abstract::{
    FieldSpec, FieldType, FieldValue, Report, ReportError, ReportHeader, ReportKind, ReportType,
    TypeDescriptor,
};
use std::any::Any;
use std::fmt;

const LOSS: &str = "loss";

const FIELDS: &[FieldSpec] = &[FieldSpec::new(
    LOSS,
    FieldType::Float,
    "Fraction of application packets lost since the last report",
)];

/// Application-level packet loss observed on a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppLossReport {
    header: ReportHeader,
    loss: f64,
}

impl AppLossReport {
    pub fn new(header: ReportHeader, loss: f64) -> Self {
        Self { header, loss }
    }

    pub fn loss(&self) -> f64 {
        self.loss
    }
}

impl fmt::Display for AppLossReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({};{LOSS}={})", Self::KIND, self.header, self.loss)
    }
}

impl Report for AppLossReport {
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
        vec![(LOSS, FieldValue::Float(self.loss))]
    }

    fn set_measurement(&mut self, name: &str, value: FieldValue) -> Result<(), ReportError> {
        match name {
            LOSS => self.loss = value.to_f64(Self::KIND, name)?,
            _ => return Err(ReportError::unknown_field(Self::KIND, name)),
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ReportType for AppLossReport {
    const KIND: ReportKind = ReportKind::new("AppLoss");

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor {
            kind: Self::KIND,
            description: "Application packet loss of a node",
            fields: FIELDS,
        }
    }
}
