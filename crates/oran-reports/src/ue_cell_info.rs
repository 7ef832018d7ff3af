use oran_abstract::{
    FieldSpec, FieldType, FieldValue, Report, ReportError, ReportHeader, ReportKind, ReportType,
    TypeDescriptor,
};
use std::any::Any;
use std::fmt;

const CELL_ID: &str = "cell_id";
const RNTI: &str = "rnti";
const ECGI: &str = "ecgi";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new(CELL_ID, FieldType::Unsigned, "Cell ID of the serving eNB (16 bit)"),
    FieldSpec::new(RNTI, FieldType::Unsigned, "RNTI of the UE in the serving cell (16 bit)"),
    FieldSpec::new(ECGI, FieldType::Unsigned, "E-UTRAN cell global identifier"),
];

/// Serving cell of an LTE UE.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LteUeCellInfoReport {
    header: ReportHeader,
    cell_id: u16,
    rnti: u16,
    ecgi: u64,
}

impl LteUeCellInfoReport {
    pub fn new(header: ReportHeader, cell_id: u16, rnti: u16, ecgi: u64) -> Self {
        Self {
            header,
            cell_id,
            rnti,
            ecgi,
        }
    }

    pub fn cell_id(&self) -> u16 {
        self.cell_id
    }

    pub fn rnti(&self) -> u16 {
        self.rnti
    }

    pub fn ecgi(&self) -> u64 {
        self.ecgi
    }
}

impl fmt::Display for LteUeCellInfoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({};{CELL_ID}={};{RNTI}={};{ECGI}={})",
            Self::KIND,
            self.header,
            self.cell_id,
            self.rnti,
            self.ecgi
        )
    }
}

impl Report for LteUeCellInfoReport {
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
        vec![
            (CELL_ID, FieldValue::Unsigned(self.cell_id.into())),
            (RNTI, FieldValue::Unsigned(self.rnti.into())),
            (ECGI, FieldValue::Unsigned(self.ecgi)),
        ]
    }

    fn set_measurement(&mut self, name: &str, value: FieldValue) -> Result<(), ReportError> {
        match name {
            CELL_ID => self.cell_id = value.to_unsigned(Self::KIND, name)?,
            RNTI => self.rnti = value.to_unsigned(Self::KIND, name)?,
            ECGI => self.ecgi = value.to_unsigned(Self::KIND, name)?,
            _ => return Err(ReportError::unknown_field(Self::KIND, name)),
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ReportType for LteUeCellInfoReport {
    const KIND: ReportKind = ReportKind::new("LteUeCellInfo");

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor {
            kind: Self::KIND,
            description: "Serving cell of an LTE UE",
            fields: FIELDS,
        }
    }
}
