use crate::report::{NodeId, Report, SimTime};

/// The capability handed to a report producer while it has append rights on
/// one entity's report stream.
pub trait ReportContext {
    /// Entity the submitted reports describe.
    fn entity(&self) -> &NodeId;

    /// Current simulation time.
    fn now(&self) -> SimTime;

    /// Hand a finished report over to the stream. Total: never fails.
    fn submit(&mut self, report: Box<dyn Report>);
}

/// Something that observes a node and emits reports about it.
pub trait ReportProducer {
    /// Entity this producer reports on.
    fn entity(&self) -> &NodeId;

    /// Called whenever the producer is due to report.
    fn produce(&mut self, ctx: &mut dyn ReportContext);
}
