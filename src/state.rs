//! Application state: the matching engine over the loaded catalog and the current
//! mapping snapshot.
//!
//! The engine is read-only and shared freely. The snapshot sits behind a write
//! lock so manual overrides are applied one at a time; each snapshot carries a
//! uuid revision so an editor working from an older snapshot is told so instead
//! of silently discarding someone else's reassignment.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_catalog_from_env, CatalogConfig, CatalogSource};
use crate::domain::MappingResult;
use crate::engine::MatchingEngine;

#[derive(Clone, Debug)]
pub struct MappingSnapshot {
    pub revision: String,
    pub mapping: Arc<MappingResult>,
}

impl MappingSnapshot {
    fn new(mapping: MappingResult) -> Self {
        Self { revision: Uuid::new_v4().to_string(), mapping: Arc::new(mapping) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverrideRejection {
    UnknownRule(u32),
    UnknownQuestion(String),
    StaleRevision { current: String },
}

impl std::fmt::Display for OverrideRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverrideRejection::UnknownRule(id) => write!(f, "Unknown ruleId: {id}"),
            OverrideRejection::UnknownQuestion(id) => write!(f, "Unknown questionId: {id}"),
            OverrideRejection::StaleRevision { current } => {
                write!(f, "Mapping changed since this edit was prepared (current revision {current})")
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchingEngine>,
    pub current: Arc<RwLock<MappingSnapshot>>,
    pub catalog_source: CatalogSource,
}

impl AppState {
    /// Build state from env: load the catalog (or seeds) and compute the initial mapping.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let (catalog, source) = load_catalog_from_env();
        Self::from_catalog(catalog, source)
    }

    /// A catalog whose taxonomy cannot be resolved is replaced by the built-in one.
    pub fn from_catalog(catalog: CatalogConfig, catalog_source: CatalogSource) -> Self {
        let (engine, catalog_source) = match catalog.into_engine() {
            Ok(engine) => (engine, catalog_source),
            Err(e) => {
                error!(target: "grammar_match", error = %e, "Catalog has no usable taxonomy; using built-in seeds");
                let seeds = CatalogConfig::seed();
                (MatchingEngine::new(seeds.rules, seeds.questions), CatalogSource::Seed)
            }
        };
        let snapshot = MappingSnapshot::new(engine.create_mapping());

        let stats = engine.get_matching_stats(&snapshot.mapping);
        info!(
            target: "grammar_match",
            source = ?catalog_source,
            rules = engine.rules().len(),
            questions = stats.total_questions,
            matched = stats.matched_questions,
            unmatched = stats.unmatched_questions,
            revision = %snapshot.revision,
            "Startup mapping built"
        );

        Self {
            engine: Arc::new(engine),
            current: Arc::new(RwLock::new(snapshot)),
            catalog_source,
        }
    }

    pub async fn snapshot(&self) -> MappingSnapshot {
        self.current.read().await.clone()
    }

    /// Recompute the mapping from the catalog, discarding manual overrides.
    #[instrument(level = "info", skip(self))]
    pub async fn rebuild(&self) -> MappingSnapshot {
        let engine = self.engine.clone();
        let mapping = match tokio::task::spawn_blocking(move || engine.create_mapping()).await {
            Ok(m) => m,
            Err(e) => {
                warn!(target: "grammar_match", error = %e, "Background rebuild failed; rebuilding inline");
                self.engine.create_mapping()
            }
        };
        let snapshot = MappingSnapshot::new(mapping);
        *self.current.write().await = snapshot.clone();
        info!(target: "grammar_match", revision = %snapshot.revision, "Mapping rebuilt");
        snapshot
    }

    /// Apply an editor override. When `base_revision` is given it must match the
    /// current snapshot.
    #[instrument(level = "info", skip(self))]
    pub async fn apply_manual(
        &self,
        rule_id: u32,
        question_id: &str,
        base_revision: Option<&str>,
    ) -> Result<MappingSnapshot, OverrideRejection> {
        if self.engine.rule(rule_id).is_none() {
            return Err(OverrideRejection::UnknownRule(rule_id));
        }
        if self.engine.question(question_id).is_none() {
            return Err(OverrideRejection::UnknownQuestion(question_id.to_string()));
        }

        let mut current = self.current.write().await;
        if let Some(base) = base_revision {
            if base != current.revision {
                warn!(target: "grammar_match", %base, current = %current.revision, "Rejected manual mapping on stale revision");
                return Err(OverrideRejection::StaleRevision { current: current.revision.clone() });
            }
        }

        let mapping = self.engine.add_manual_mapping(rule_id, question_id, &current.mapping);
        *current = MappingSnapshot::new(mapping);
        info!(target: "grammar_match", rule_id, %question_id, revision = %current.revision, "Manual mapping applied");
        Ok(current.clone())
    }
}
