use anyhow::{Context, Result};
use oran_abstract::{
    FieldValue, NodeId, REPORTER_FIELD, ReportScenario, RepositoryConfig, ScenarioAction,
    ScenarioAssertion, SimTime, TIME_FIELD,
};
use oran_reports::ReportRegistry;
use oran_repository::{ReportQuery, ReportRepository};
use std::fs;
use std::ops::Bound;
use std::path::Path;
use tracing::{info, warn};

/// Result of replaying a scenario: the populated repository plus every
/// assertion that did not hold.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub repository: ReportRepository,
    pub failures: Vec<String>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn load_scenario(path: &Path) -> Result<ReportScenario> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
    parse_scenario(&content)
}

pub fn parse_scenario(content: &str) -> Result<ReportScenario> {
    toml::from_str(content).context("Failed to parse scenario file")
}

pub fn run_scenario(
    scenario: &ReportScenario,
    registry: &ReportRegistry,
) -> Result<ScenarioOutcome> {
    info!("Running Scenario: {}", scenario.name);
    if !scenario.description.is_empty() {
        info!("Description: {}", scenario.description);
    }

    let mut config = RepositoryConfig::default();
    scenario.config.apply_to(&mut config);
    config
        .validate()
        .with_context(|| format!("Invalid config in scenario '{}'", scenario.name))?;
    let mut repository = ReportRepository::new(config);
    let mut now = SimTime::ZERO;

    for (step, action) in scenario.actions.iter().enumerate() {
        match action {
            ScenarioAction::Append {
                entity,
                kind,
                reporter,
                time,
                fields,
            } => {
                let header = [
                    (REPORTER_FIELD, FieldValue::from(reporter.as_str())),
                    (TIME_FIELD, FieldValue::Float(*time)),
                ];
                let measurements = fields
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.clone()));
                let report = registry
                    .build(kind, header.into_iter().chain(measurements))
                    .with_context(|| format!("Action #{step}: cannot build {kind} report"))?;

                let entity = NodeId::new(entity.as_deref().unwrap_or(reporter));
                repository.append(&entity, report);

                now = now.max(SimTime::from_secs(*time));
                repository.enforce_retention(now);
            }
            ScenarioAction::EvictBefore { time } => {
                repository.evict_before(SimTime::from_secs(*time));
            }
        }
    }

    let mut failures = Vec::new();
    for assertion in &scenario.assertions {
        if let Err(message) = check_assertion(&repository, registry, assertion)? {
            warn!("Assertion Failed: {}", message);
            failures.push(message);
        }
    }

    info!(
        "Scenario '{}' finished: {} reports stored, {}/{} assertions passed",
        scenario.name,
        repository.len(),
        scenario.assertions.len() - failures.len(),
        scenario.assertions.len()
    );
    Ok(ScenarioOutcome {
        repository,
        failures,
    })
}

/// Outer error: the assertion itself is malformed (e.g. unknown kind).
/// Inner error: the assertion does not hold.
fn check_assertion(
    repository: &ReportRepository,
    registry: &ReportRegistry,
    assertion: &ScenarioAssertion,
) -> Result<std::result::Result<(), String>> {
    let outcome = match assertion {
        ScenarioAssertion::ReportCount {
            entity,
            kind,
            from,
            until,
            count,
        } => {
            let range = (
                from.map_or(Bound::Unbounded, |t| Bound::Included(SimTime::from_secs(t))),
                until.map_or(Bound::Unbounded, |t| Bound::Included(SimTime::from_secs(t))),
            );
            let query =
                filtered(repository, registry, entity, kind.as_deref())?.time_range(range);
            let actual = query.count();
            if actual == *count {
                Ok(())
            } else {
                Err(format!("{entity} has {actual} matching reports, expected {count}"))
            }
        }
        ScenarioAssertion::LatestField {
            entity,
            kind,
            field,
            value,
        } => {
            let query = filtered(repository, registry, entity, Some(kind.as_str()))?;
            match query.latest().map(|entry| entry.report().field(field)) {
                None => Err(format!("{entity} has no {kind} report")),
                Some(None) => Err(format!("{kind} has no field '{field}'")),
                Some(Some(actual)) if same_value(&actual, value) => Ok(()),
                Some(Some(actual)) => Err(format!(
                    "latest {kind} of {entity} has {field}={actual}, expected {value}"
                )),
            }
        }
        ScenarioAssertion::TextContains {
            entity,
            kind,
            needle,
        } => {
            let query = filtered(repository, registry, entity, kind.as_deref())?;
            if query.reports().any(|report| report.to_string().contains(needle)) {
                Ok(())
            } else {
                Err(format!("no report of {entity} contains {needle:?}"))
            }
        }
    };
    Ok(outcome)
}

fn filtered<'a>(
    repository: &'a ReportRepository,
    registry: &ReportRegistry,
    entity: &str,
    kind: Option<&str>,
) -> Result<ReportQuery<'a>> {
    let query = repository.query(&NodeId::new(entity));
    Ok(match kind {
        Some(kind) => query.kind(registry.resolve(kind)?),
        None => query,
    })
}

/// Numeric values compare by magnitude so `1` in a scenario matches a float `1.0`.
fn same_value(actual: &FieldValue, expected: &FieldValue) -> bool {
    match (actual, expected) {
        (FieldValue::Float(a), FieldValue::Unsigned(b)) => *a == *b as f64,
        (FieldValue::Unsigned(a), FieldValue::Float(b)) => *a as f64 == *b,
        (a, b) => a == b,
    }
}
