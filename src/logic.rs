//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Handlers stay thin: they parse input, call into here, and serialize whatever
//! comes back. Nothing here fails on odd input; unknown ids produce empty
//! results, and only manual overrides can be rejected.

use tracing::{debug, info, instrument};

use crate::domain::{MatchingStats, Question, QuestionAnalysis};
use crate::protocol::{MappingOut, RuleOut};
use crate::state::{AppState, MappingSnapshot, OverrideRejection};

pub fn to_mapping_out(snapshot: &MappingSnapshot) -> MappingOut {
  MappingOut {
    revision: snapshot.revision.clone(),
    result: (*snapshot.mapping).clone(),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn list_rules(state: &AppState) -> Vec<RuleOut> {
  let snapshot = state.snapshot().await;
  state
    .engine
    .rule_coverage(&snapshot.mapping)
    .into_iter()
    .map(|(rule, count)| RuleOut { rule: rule.clone(), question_count: count })
    .collect()
}

#[instrument(level = "info", skip(state))]
pub async fn current_mapping(state: &AppState) -> MappingOut {
  to_mapping_out(&state.snapshot().await)
}

#[instrument(level = "info", skip(state))]
pub async fn questions_for_rule(state: &AppState, rule_id: u32) -> Vec<Question> {
  let snapshot = state.snapshot().await;
  let questions = state.engine.get_questions_for_rule(rule_id, &snapshot.mapping);
  debug!(target: "grammar_match", rule_id, count = questions.len(), "Questions resolved for rule");
  questions
}

#[instrument(level = "info", skip(state))]
pub async fn stats(state: &AppState) -> MatchingStats {
  let snapshot = state.snapshot().await;
  state.engine.get_matching_stats(&snapshot.mapping)
}

/// Analyse the given question ids, or the whole catalog when the list is empty.
/// Unknown ids are skipped.
#[instrument(level = "info", skip(state, question_ids), fields(requested = question_ids.len()))]
pub async fn analyze(state: &AppState, question_ids: &[String]) -> Vec<QuestionAnalysis> {
  let engine = &state.engine;
  if question_ids.is_empty() {
    return engine.analyze_questions(engine.questions());
  }
  let subset: Vec<Question> = question_ids
    .iter()
    .filter_map(|id| engine.question(id).cloned())
    .collect();
  if subset.len() < question_ids.len() {
    debug!(target: "grammar_match", skipped = question_ids.len() - subset.len(), "Unknown question ids skipped");
  }
  engine.analyze_questions(&subset)
}

#[instrument(level = "info", skip(state))]
pub async fn manual_mapping(
  state: &AppState,
  rule_id: u32,
  question_id: &str,
  base_revision: Option<&str>,
) -> Result<MappingOut, OverrideRejection> {
  let snapshot = state.apply_manual(rule_id, question_id, base_revision).await?;
  Ok(to_mapping_out(&snapshot))
}

#[instrument(level = "info", skip(state))]
pub async fn rebuild(state: &AppState) -> MappingOut {
  let snapshot = state.rebuild().await;
  info!(target: "grammar_match", revision = %snapshot.revision, unmatched = snapshot.mapping.unmatched_questions().len(), "Rebuild served");
  to_mapping_out(&snapshot)
}
