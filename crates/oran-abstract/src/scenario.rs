use crate::config::RepositoryConfig;
use crate::field::FieldValue;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Deserialize, Debug, Clone)]
pub struct ReportScenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: RepositoryConfigOverride,
    #[serde(default)]
    pub actions: Vec<ScenarioAction>,
    #[serde(default)]
    pub assertions: Vec<ScenarioAssertion>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RepositoryConfigOverride {
    pub retention_secs: Option<f64>,
    pub initial_capacity: Option<usize>,
}

impl RepositoryConfigOverride {
    pub fn apply_to(&self, config: &mut RepositoryConfig) {
        if let Some(v) = self.retention_secs {
            config.retention_secs = Some(v);
        }
        if let Some(v) = self.initial_capacity {
            config.initial_capacity = v;
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioAction {
    /// Build a report by kind and append it to an entity's stream
    Append {
        /// Defaults to the reporter when omitted
        entity: Option<String>,
        kind: String,
        reporter: String,
        time: f64,
        #[serde(default)]
        fields: BTreeMap<String, FieldValue>,
    },
    /// Drop every report older than `time` from all entities
    EvictBefore { time: f64 },
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioAssertion {
    /// Assert how many reports a query over one entity yields
    ReportCount {
        entity: String,
        kind: Option<String>,
        from: Option<f64>,
        until: Option<f64>,
        count: usize,
    },
    /// Assert a field of the most recent report of a kind
    LatestField {
        entity: String,
        kind: String,
        field: String,
        value: FieldValue,
    },
    /// Assert that some report of the entity renders text containing `needle`
    TextContains {
        entity: String,
        kind: Option<String>,
        needle: String,
    },
}
