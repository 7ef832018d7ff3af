use oran_abstract::{
    FieldSpec, FieldType, FieldValue, Report, ReportError, ReportHeader, ReportKind, ReportType,
    TypeDescriptor,
};
use std::any::Any;
use std::fmt;

const RNTI: &str = "rnti";
const CELL_ID: &str = "cell_id";
const RSRP: &str = "rsrp";
const RSRQ: &str = "rsrq";
const IS_SERVING: &str = "is_serving";
const COMPONENT_CARRIER_ID: &str = "component_carrier_id";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new(RNTI, FieldType::Unsigned, "RNTI of the UE (16 bit)"),
    FieldSpec::new(CELL_ID, FieldType::Unsigned, "Measured cell (16 bit)"),
    FieldSpec::new(RSRP, FieldType::Float, "Reference signal received power"),
    FieldSpec::new(RSRQ, FieldType::Float, "Reference signal received quality"),
    FieldSpec::new(IS_SERVING, FieldType::Bool, "Whether the measured cell serves the UE"),
    FieldSpec::new(
        COMPONENT_CARRIER_ID,
        FieldType::Unsigned,
        "Component carrier of the measurement (8 bit)",
    ),
];

/// RSRP/RSRQ measurement of one cell made by an LTE UE.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LteUeRsrpRsrqReport {
    header: ReportHeader,
    rnti: u16,
    cell_id: u16,
    rsrp: f64,
    rsrq: f64,
    is_serving: bool,
    component_carrier_id: u8,
}

impl LteUeRsrpRsrqReport {
    pub fn new(
        header: ReportHeader,
        rnti: u16,
        cell_id: u16,
        rsrp: f64,
        rsrq: f64,
        is_serving: bool,
        component_carrier_id: u8,
    ) -> Self {
        Self {
            header,
            rnti,
            cell_id,
            rsrp,
            rsrq,
            is_serving,
            component_carrier_id,
        }
    }

    pub fn rnti(&self) -> u16 {
        self.rnti
    }

    pub fn cell_id(&self) -> u16 {
        self.cell_id
    }

    pub fn rsrp(&self) -> f64 {
        self.rsrp
    }

    pub fn rsrq(&self) -> f64 {
        self.rsrq
    }

    pub fn is_serving(&self) -> bool {
        self.is_serving
    }

    pub fn component_carrier_id(&self) -> u8 {
        self.component_carrier_id
    }
}

impl fmt::Display for LteUeRsrpRsrqReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({};{RNTI}={};{CELL_ID}={};{RSRP}={};{RSRQ}={};{IS_SERVING}={};{COMPONENT_CARRIER_ID}={})",
            Self::KIND,
            self.header,
            self.rnti,
            self.cell_id,
            self.rsrp,
            self.rsrq,
            self.is_serving,
            self.component_carrier_id
        )
    }
}

impl Report for LteUeRsrpRsrqReport {
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
            (RNTI, FieldValue::Unsigned(self.rnti.into())),
            (CELL_ID, FieldValue::Unsigned(self.cell_id.into())),
            (RSRP, FieldValue::Float(self.rsrp)),
            (RSRQ, FieldValue::Float(self.rsrq)),
            (IS_SERVING, FieldValue::Bool(self.is_serving)),
            (
                COMPONENT_CARRIER_ID,
                FieldValue::Unsigned(self.component_carrier_id.into()),
            ),
        ]
    }

    fn set_measurement(&mut self, name: &str, value: FieldValue) -> Result<(), ReportError> {
        match name {
            RNTI => self.rnti = value.to_unsigned(Self::KIND, name)?,
            CELL_ID => self.cell_id = value.to_unsigned(Self::KIND, name)?,
            RSRP => self.rsrp = value.to_f64(Self::KIND, name)?,
            RSRQ => self.rsrq = value.to_f64(Self::KIND, name)?,
            IS_SERVING => self.is_serving = value.to_bool(Self::KIND, name)?,
            COMPONENT_CARRIER_ID => {
                self.component_carrier_id = value.to_unsigned(Self::KIND, name)?
            }
            _ => return Err(ReportError::unknown_field(Self::KIND, name)),
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ReportType for LteUeRsrpRsrqReport {
    const KIND: ReportKind = ReportKind::new("LteUeRsrpRsrq");

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor {
            kind: Self::KIND,
            description: "RSRP/RSRQ measurement made by an LTE UE",
            fields: FIELDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oran_abstract::SimTime;

    #[test]
    fn test_rsrp_rsrq_display() {
        let r = LteUeRsrpRsrqReport::new(
            ReportHeader::new("ue-4", SimTime::from_secs(9.0)),
            5,
            1,
            -95.5,
            -10.25,
            true,
            0,
        );
        assert_eq!(
            r.to_string(),
            "LteUeRsrpRsrq(reporter=ue-4;time=+9s;rnti=5;cell_id=1;rsrp=-95.5;rsrq=-10.25;is_serving=true;component_carrier_id=0)"
        );
    }

    #[test]
    fn test_set_measurements_by_name() {
        let mut r = LteUeRsrpRsrqReport::default();
        r.set_field("rsrp", FieldValue::Float(-100.0)).unwrap();
        r.set_field("is_serving", FieldValue::Bool(true)).unwrap();
        assert_eq!(r.rsrp(), -100.0);
        assert!(r.is_serving());
        assert!(
            r.set_field("component_carrier_id", FieldValue::Unsigned(300))
                .is_err()
        );
    }
}
