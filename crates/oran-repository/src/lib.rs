pub mod query;
pub mod repository;
pub mod trace;

pub use query::{ReportEntry, ReportQuery};
pub use repository::{EntityWriter, ReportRepository};
pub use trace::{ReportRecord, RepositoryTrace};
