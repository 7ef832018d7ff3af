use serde::{Deserialize, Serialize};
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;

use crate::error::ReportError;
use crate::field::{FieldValue, REPORTER_FIELD, TIME_FIELD, TypeDescriptor};

/// Identifier of a simulated E2 node (eNB, UE, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            f.write_str("<unset>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Simulation time in seconds.
///
/// Ordering is total (`f64::total_cmp`), so times can key ranges and sorts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct SimTime(f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// `-0.0` is stored as `0.0` so both compare equal under the total order.
    pub const fn from_secs(secs: f64) -> Self {
        Self(secs + 0.0)
    }

    pub fn from_millis(ms: u64) -> Self {
        Self(ms as f64 / 1000.0)
    }

    pub const fn as_secs(self) -> f64 {
        self.0
    }
}

impl From<f64> for SimTime {
    fn from(secs: f64) -> Self {
        Self::from_secs(secs)
    }
}

impl From<SimTime> for f64 {
    fn from(time: SimTime) -> Self {
        time.0
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_nan() {
            f.write_str("<invalid>")
        } else if self.0.is_sign_negative() {
            write!(f, "{}s", self.0)
        } else {
            write!(f, "+{}s", self.0)
        }
    }
}

/// Stable identifier of a concrete report type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ReportKind(&'static str);

impl ReportKind {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Identity and timestamp common to every report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportHeader {
    reporter: NodeId,
    time: SimTime,
}

impl ReportHeader {
    pub fn new(reporter: impl Into<NodeId>, time: SimTime) -> Self {
        Self {
            reporter: reporter.into(),
            time,
        }
    }

    pub fn reporter(&self) -> &NodeId {
        &self.reporter
    }

    pub fn time(&self) -> SimTime {
        self.time
    }
}

/// Renders as `reporter=<id>;time=<time>`.
impl fmt::Display for ReportHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{REPORTER_FIELD}={};{TIME_FIELD}={}",
            self.reporter, self.time
        )
    }
}

/// A timestamped observation made by a simulated node.
///
/// `Display` is the textual form of a report and must be deterministic and
/// side-effect free. Implementations render as
/// `<Kind>(reporter=<id>;time=<time>;<field>=<value>...)`.
///
/// Reports are only mutable while exclusively owned. Once shared (the
/// repository stores `Arc<dyn Report>`) they are read-only.
pub trait Report: fmt::Display + fmt::Debug + Send + Sync + 'static {
    fn kind(&self) -> ReportKind;

    fn header(&self) -> &ReportHeader;

    fn header_mut(&mut self) -> &mut ReportHeader;

    /// Measurement fields in declaration order, header excluded.
    fn measurements(&self) -> Vec<(&'static str, FieldValue)>;

    /// Set one measurement field by name.
    fn set_measurement(&mut self, name: &str, value: FieldValue) -> Result<(), ReportError>;

    fn as_any(&self) -> &dyn Any;

    fn reporter(&self) -> &NodeId {
        self.header().reporter()
    }

    fn time(&self) -> SimTime {
        self.header().time()
    }

    /// Header fields followed by the measurements.
    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        let header = self.header();
        let mut fields = vec![
            (
                REPORTER_FIELD,
                FieldValue::Text(header.reporter().as_str().to_string()),
            ),
            (TIME_FIELD, FieldValue::Float(header.time().as_secs())),
        ];
        fields.extend(self.measurements());
        fields
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields()
            .into_iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Set a header or measurement field by name.
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), ReportError> {
        match name {
            REPORTER_FIELD => {
                let reporter = NodeId::new(value.to_text(self.kind(), name)?);
                self.header_mut().reporter = reporter;
                Ok(())
            }
            TIME_FIELD => {
                let time = SimTime::from_secs(value.to_f64(self.kind(), name)?);
                self.header_mut().time = time;
                Ok(())
            }
            _ => self.set_measurement(name, value),
        }
    }
}

impl dyn Report {
    pub fn is<T: Report>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Report>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Static description of a concrete report type, used for registration.
pub trait ReportType: Report + Default {
    const KIND: ReportKind;

    fn descriptor() -> TypeDescriptor;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_display() {
        assert_eq!(SimTime::from_secs(120.5).to_string(), "+120.5s");
        assert_eq!(SimTime::from_secs(0.0).to_string(), "+0s");
        assert_eq!(SimTime::from_secs(-1.0).to_string(), "-1s");
        assert_eq!(SimTime::from_secs(f64::NAN).to_string(), "<invalid>");
    }

    #[test]
    fn test_time_is_totally_ordered() {
        let mut times = vec![
            SimTime::from_secs(3.0),
            SimTime::from_millis(500),
            SimTime::ZERO,
        ];
        times.sort();
        assert_eq!(
            times,
            vec![SimTime::ZERO, SimTime::from_secs(0.5), SimTime::from_secs(3.0)]
        );
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let time = SimTime::from_secs(-0.0);
        assert_eq!(time, SimTime::ZERO);
        assert!(time.as_secs().is_sign_positive());
        assert_eq!(time.to_string(), "+0s");
    }

    #[test]
    fn test_unset_node_uses_sentinel() {
        assert_eq!(NodeId::default().to_string(), "<unset>");
        assert_eq!(NodeId::from("enb-7").to_string(), "enb-7");
    }

    #[test]
    fn test_header_display() {
        let header = ReportHeader::new("enb-7", SimTime::from_secs(120.5));
        assert_eq!(header.to_string(), "reporter=enb-7;time=+120.5s");
    }
}
