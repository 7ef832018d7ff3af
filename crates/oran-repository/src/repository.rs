use oran_abstract::{NodeId, Report, ReportContext, RepositoryConfig, SimTime};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::query::{ReportEntry, ReportQuery};
use crate::trace::{RepositoryTrace, ReportRecord};

#[derive(Debug, Default)]
struct EntityStream {
    next_index: u64,
    entries: Vec<ReportEntry>,
}

/// Append-only store of reports, one ordered stream per reporting entity.
///
/// Reports are frozen on append: the repository keeps them as
/// `Arc<dyn Report>` and only ever hands out shared references.
#[derive(Debug, Default)]
pub struct ReportRepository {
    config: RepositoryConfig,
    streams: HashMap<NodeId, EntityStream>,
}

impl ReportRepository {
    pub fn new(config: RepositoryConfig) -> Self {
        Self {
            config,
            streams: HashMap::new(),
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Append `report` at the tail of `entity`'s stream and return its index.
    pub fn append(&mut self, entity: &NodeId, report: Box<dyn Report>) -> u64 {
        let capacity = self.config.initial_capacity;
        let stream = self
            .streams
            .entry(entity.clone())
            .or_insert_with(|| EntityStream {
                next_index: 0,
                entries: Vec::with_capacity(capacity),
            });

        let index = stream.next_index;
        stream.next_index += 1;
        debug!("[{}] APPEND #{} {}", entity, index, report);
        stream.entries.push(ReportEntry::new(index, Arc::from(report)));
        index
    }

    pub fn push<T: Report>(&mut self, entity: &NodeId, report: T) -> u64 {
        self.append(entity, Box::new(report))
    }

    /// All reports of `entity`; empty when nothing was ever appended for it.
    pub fn query(&self, entity: &NodeId) -> ReportQuery<'_> {
        let entries = self
            .streams
            .get(entity)
            .map(|stream| stream.entries.as_slice())
            .unwrap_or(&[]);
        ReportQuery::new(entries)
    }

    /// Remove every entry of `entity` for which `predicate` holds.
    pub fn evict(
        &mut self,
        entity: &NodeId,
        mut predicate: impl FnMut(&ReportEntry) -> bool,
    ) -> usize {
        let Some(stream) = self.streams.get_mut(entity) else {
            return 0;
        };
        let before = stream.entries.len();
        stream.entries.retain(|entry| !predicate(entry));
        let evicted = before - stream.entries.len();
        if evicted > 0 {
            debug!("[{}] EVICT {} reports", entity, evicted);
        }
        evicted
    }

    /// Remove reports strictly older than `cutoff` from every entity.
    pub fn evict_before(&mut self, cutoff: SimTime) -> usize {
        let entities: Vec<NodeId> = self.streams.keys().cloned().collect();
        let evicted: usize = entities
            .iter()
            .map(|entity| self.evict(entity, |entry| entry.time() < cutoff))
            .sum();
        if evicted > 0 {
            info!("Evicted {} reports older than {}", evicted, cutoff);
        }
        evicted
    }

    /// Apply the configured retention window relative to `now`.
    ///
    /// A negative or non-finite window fails [`RepositoryConfig::validate`] and
    /// is treated here as no window at all.
    pub fn enforce_retention(&mut self, now: SimTime) -> usize {
        match self.config.retention_window() {
            Some(secs) => self.evict_before(SimTime::from_secs(now.as_secs() - secs)),
            None => {
                if let Some(secs) = self.config.retention_secs {
                    warn!("Ignoring invalid retention window {}s", secs);
                }
                0
            }
        }
    }

    /// Exclusive append handle for one entity's stream.
    pub fn writer(&mut self, entity: NodeId, now: SimTime) -> EntityWriter<'_> {
        EntityWriter {
            repository: self,
            entity,
            now,
            appended: 0,
        }
    }

    /// Entities that have a stream, sorted.
    pub fn entities(&self) -> Vec<&NodeId> {
        let mut entities: Vec<_> = self.streams.keys().collect();
        entities.sort();
        entities
    }

    /// Total number of stored reports.
    pub fn len(&self) -> usize {
        self.streams.values().map(|s| s.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Produce a serializable snapshot of every stream.
    pub fn export_trace(&self) -> RepositoryTrace {
        let entities = self
            .entities()
            .into_iter()
            .map(|entity| {
                let records: Vec<ReportRecord> =
                    self.query(entity).iter().map(ReportRecord::from).collect();
                (entity.as_str().to_string(), records)
            })
            .collect();
        RepositoryTrace {
            total_reports: self.len(),
            entities,
        }
    }
}

/// Append rights on a single entity's stream, handed to report producers.
pub struct EntityWriter<'a> {
    repository: &'a mut ReportRepository,
    entity: NodeId,
    now: SimTime,
    appended: usize,
}

impl EntityWriter<'_> {
    /// Number of reports appended through this writer.
    pub fn appended(&self) -> usize {
        self.appended
    }
}

impl ReportContext for EntityWriter<'_> {
    fn entity(&self) -> &NodeId {
        &self.entity
    }

    fn now(&self) -> SimTime {
        self.now
    }

    fn submit(&mut self, report: Box<dyn Report>) {
        self.repository.append(&self.entity, report);
        self.appended += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oran_abstract::{ReportHeader, ReportType};
    use oran_reports::{AppLossReport, LteCellLoadReport};

    fn load(node: &str, time: f64, value: f64) -> LteCellLoadReport {
        LteCellLoadReport::new(ReportHeader::new(node, SimTime::from_secs(time)), value)
    }

    fn loss(node: &str, time: f64, value: f64) -> AppLossReport {
        AppLossReport::new(ReportHeader::new(node, SimTime::from_secs(time)), value)
    }

    #[test]
    fn test_query_returns_insertion_order() {
        let mut repo = ReportRepository::default();
        let enb1 = NodeId::from("enb-1");
        for (i, value) in [0.1, 0.5, 0.9].into_iter().enumerate() {
            assert_eq!(repo.push(&enb1, load("enb-1", i as f64, value)), i as u64);
        }

        let loads: Vec<f64> = repo
            .query(&enb1)
            .of_type::<LteCellLoadReport>()
            .map(|r| r.cell_load())
            .collect();
        assert_eq!(loads, vec![0.1, 0.5, 0.9]);

        let indices: Vec<u64> = repo.query(&enb1).iter().map(|e| e.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_unknown_entity_is_empty() {
        let repo = ReportRepository::default();
        let query = repo.query(&NodeId::from("enb-404"));
        assert!(query.is_empty());
        assert_eq!(query.count(), 0);
        assert!(query.latest().is_none());
    }

    #[test]
    fn test_kind_filter_returns_subsequence() {
        let mut repo = ReportRepository::default();
        let enb = NodeId::from("enb-1");
        repo.push(&enb, load("enb-1", 1.0, 0.2));
        repo.push(&enb, loss("enb-1", 1.0, 0.01));
        repo.push(&enb, load("enb-1", 2.0, 0.3));
        repo.push(&enb, loss("enb-1", 2.0, 0.02));

        let kinds: Vec<_> = repo
            .query(&enb)
            .kind(AppLossReport::KIND)
            .iter()
            .map(|e| (e.index(), e.kind()))
            .collect();
        assert_eq!(
            kinds,
            vec![(1, AppLossReport::KIND), (3, AppLossReport::KIND)]
        );
        assert_eq!(repo.query(&enb).count(), 4);
    }

    #[test]
    fn test_time_range_filter() {
        let mut repo = ReportRepository::default();
        let enb = NodeId::from("enb-1");
        for t in 0..5 {
            repo.push(&enb, load("enb-1", t as f64, 0.1 * t as f64));
        }

        let from = SimTime::from_secs(1.0);
        let until = SimTime::from_secs(3.0);
        assert_eq!(repo.query(&enb).time_range(from..=until).count(), 3);
        assert_eq!(repo.query(&enb).time_range(from..until).count(), 2);
        assert_eq!(repo.query(&enb).time_range(until..).count(), 2);
        assert_eq!(
            repo.query(&enb)
                .kind(AppLossReport::KIND)
                .time_range(..)
                .count(),
            0
        );
    }

    #[test]
    fn test_query_is_restartable() {
        let mut repo = ReportRepository::default();
        let enb = NodeId::from("enb-1");
        repo.push(&enb, load("enb-1", 0.0, 0.4));
        repo.push(&enb, load("enb-1", 1.0, 0.6));

        let query = repo.query(&enb);
        let first: Vec<String> = query.reports().map(|r| r.to_string()).collect();
        let second: Vec<String> = query.reports().map(|r| r.to_string()).collect();
        assert_eq!(first, second);

        let iter = query.iter();
        assert_eq!(iter.clone().count(), iter.count());
    }

    #[test]
    fn test_latest_respects_filters() {
        let mut repo = ReportRepository::default();
        let enb = NodeId::from("enb-1");
        repo.push(&enb, load("enb-1", 0.0, 0.4));
        repo.push(&enb, loss("enb-1", 1.0, 0.1));

        let latest = repo.query(&enb).kind(LteCellLoadReport::KIND).latest().unwrap();
        assert_eq!(latest.index(), 0);
        assert_eq!(repo.query(&enb).latest().unwrap().index(), 1);
    }

    #[test]
    fn test_entities_are_independent() {
        let mut repo = ReportRepository::default();
        let a = NodeId::from("enb-1");
        let b = NodeId::from("enb-2");
        repo.push(&a, load("enb-1", 0.0, 0.1));
        repo.push(&b, load("enb-2", 0.0, 0.2));
        repo.push(&b, load("enb-2", 1.0, 0.3));

        assert_eq!(repo.query(&a).count(), 1);
        assert_eq!(repo.query(&b).count(), 2);
        assert_eq!(repo.entities(), vec![&a, &b]);
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn test_evict_keeps_indices() {
        let mut repo = ReportRepository::default();
        let enb = NodeId::from("enb-1");
        for t in 0..4 {
            repo.push(&enb, load("enb-1", t as f64, 0.5));
        }

        let evicted = repo.evict(&enb, |entry| entry.index() % 2 == 0);
        assert_eq!(evicted, 2);
        let indices: Vec<u64> = repo.query(&enb).iter().map(|e| e.index()).collect();
        assert_eq!(indices, vec![1, 3]);

        assert_eq!(repo.push(&enb, load("enb-1", 5.0, 0.5)), 4);
        assert_eq!(repo.evict(&NodeId::from("enb-9"), |_| true), 0);
    }

    #[test]
    fn test_retention_window() {
        let mut repo = ReportRepository::new(RepositoryConfig {
            retention_secs: Some(2.0),
            ..Default::default()
        });
        let enb = NodeId::from("enb-1");
        for t in 0..6 {
            repo.push(&enb, load("enb-1", t as f64, 0.5));
        }

        assert_eq!(repo.enforce_retention(SimTime::from_secs(5.0)), 3);
        let times: Vec<f64> = repo
            .query(&enb)
            .iter()
            .map(|e| e.time().as_secs())
            .collect();
        assert_eq!(times, vec![3.0, 4.0, 5.0]);

        let mut unbounded = ReportRepository::default();
        unbounded.push(&enb, load("enb-1", 0.0, 0.5));
        assert_eq!(unbounded.enforce_retention(SimTime::from_secs(100.0)), 0);
    }

    #[test]
    fn test_invalid_retention_keeps_everything() {
        let enb = NodeId::from("enb-1");
        for secs in [f64::NAN, -1.0] {
            let mut repo = ReportRepository::new(RepositoryConfig {
                retention_secs: Some(secs),
                ..Default::default()
            });
            repo.push(&enb, load("enb-1", 5.0, 0.5));
            assert_eq!(repo.enforce_retention(SimTime::from_secs(5.0)), 0);
            assert_eq!(repo.query(&enb).count(), 1);
        }
    }

    #[test]
    fn test_negative_zero_time_is_in_range() {
        let mut repo = ReportRepository::default();
        let enb = NodeId::from("enb-1");
        repo.push(&enb, load("enb-1", -0.0, 0.5));

        let until = SimTime::from_secs(1.0);
        assert_eq!(repo.query(&enb).time_range(SimTime::ZERO..=until).count(), 1);
        assert_eq!(repo.evict_before(SimTime::ZERO), 0);
    }

    #[test]
    fn test_writer_appends_to_its_entity() {
        let mut repo = ReportRepository::default();
        let enb = NodeId::from("enb-1");
        {
            let mut writer = repo.writer(enb.clone(), SimTime::from_secs(7.0));
            let now = writer.now();
            let reporter = writer.entity().clone();
            writer.submit(Box::new(LteCellLoadReport::new(
                ReportHeader::new(reporter, now),
                0.8,
            )));
            assert_eq!(writer.appended(), 1);
        }
        let entry = repo.query(&enb).latest().unwrap();
        assert_eq!(
            entry.report().to_string(),
            "LteCellLoad(reporter=enb-1;time=+7s;cell_load=0.8)"
        );
    }
}
