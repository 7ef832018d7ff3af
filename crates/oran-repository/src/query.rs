use oran_abstract::{Report, ReportKind, ReportType, SimTime};
use std::ops::{Bound, RangeBounds};
use std::sync::Arc;

/// A report stored in an entity's stream together with its insertion index.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    index: u64,
    report: Arc<dyn Report>,
}

impl ReportEntry {
    pub(crate) fn new(index: u64, report: Arc<dyn Report>) -> Self {
        Self { index, report }
    }

    /// Per-entity insertion index. Strictly increasing, never reused.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn report(&self) -> &Arc<dyn Report> {
        &self.report
    }

    pub fn kind(&self) -> ReportKind {
        self.report.kind()
    }

    pub fn time(&self) -> SimTime {
        self.report.time()
    }
}

/// Lazy, restartable view over one entity's reports in insertion order.
///
/// Filters narrow the view; every call to [`iter`](Self::iter) starts from
/// the beginning again.
#[derive(Debug, Clone, Copy)]
pub struct ReportQuery<'a> {
    entries: &'a [ReportEntry],
    kind: Option<ReportKind>,
    from: Bound<SimTime>,
    until: Bound<SimTime>,
}

impl<'a> ReportQuery<'a> {
    pub(crate) fn new(entries: &'a [ReportEntry]) -> Self {
        Self {
            entries,
            kind: None,
            from: Bound::Unbounded,
            until: Bound::Unbounded,
        }
    }

    /// Keep only reports of `kind`.
    pub fn kind(mut self, kind: ReportKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Keep only reports whose timestamp falls in `range`.
    pub fn time_range(mut self, range: impl RangeBounds<SimTime>) -> Self {
        self.from = range.start_bound().cloned();
        self.until = range.end_bound().cloned();
        self
    }

    pub fn iter(self) -> impl Iterator<Item = &'a ReportEntry> + Clone + 'a {
        self.entries.iter().filter(move |entry| self.matches(entry))
    }

    pub fn reports(self) -> impl Iterator<Item = &'a Arc<dyn Report>> + Clone + 'a {
        self.iter().map(ReportEntry::report)
    }

    /// Typed access: only reports of `T`, downcast.
    pub fn of_type<T: ReportType>(self) -> impl Iterator<Item = &'a T> + Clone + 'a {
        self.kind(T::KIND)
            .iter()
            .filter_map(|entry| entry.report.downcast_ref::<T>())
    }

    /// Most recently appended matching entry.
    pub fn latest(self) -> Option<&'a ReportEntry> {
        self.entries
            .iter()
            .rev()
            .find(|entry| self.matches(entry))
    }

    pub fn count(self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(self) -> bool {
        self.iter().next().is_none()
    }

    fn matches(&self, entry: &ReportEntry) -> bool {
        if let Some(kind) = self.kind
            && entry.kind() != kind
        {
            return false;
        }
        (self.from, self.until).contains(&entry.time())
    }
}
