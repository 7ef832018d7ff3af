pub mod config;
pub mod error;
pub mod field;
pub mod interface;
pub mod report;
pub mod scenario;

pub use config::RepositoryConfig;
pub use error::ReportError;
pub use field::{
    FieldSpec, FieldType, FieldValue, HEADER_FIELDS, REPORTER_FIELD, TIME_FIELD, TypeDescriptor,
};
pub use interface::{ReportContext, ReportProducer};
pub use report::{NodeId, Report, ReportHeader, ReportKind, ReportType, SimTime};
pub use scenario::{RepositoryConfigOverride, ReportScenario, ScenarioAction, ScenarioAssertion};
