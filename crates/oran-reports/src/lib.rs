//! Built-in O-RAN report types and the registry that constructs reports by kind.

mod app_loss;
mod cell_load;
mod location;
pub mod registry;
mod rsrp_rsrq;
mod ue_cell_info;

pub use app_loss::AppLossReport;
pub use cell_load::LteCellLoadReport;
pub use location::{LocationReport, Position};
pub use registry::{ReportFactory, ReportRegistry, TypeHandle};
pub use rsrp_rsrq::LteUeRsrpRsrqReport;
pub use ue_cell_info::LteUeCellInfoReport;
