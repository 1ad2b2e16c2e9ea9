//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, State}, http::StatusCode, Json, response::IntoResponse};
use tracing::{info, instrument, warn};

use crate::protocol::*;
use crate::state::{AppState, OverrideRejection};
use crate::logic::*;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let revision = state.snapshot().await.revision;
  Json(HealthOut { ok: true, revision })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_rules(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(list_rules(&state).await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_rule_questions(
  State(state): State<Arc<AppState>>,
  Path(rule_id): Path<u32>,
) -> impl IntoResponse {
  let questions = questions_for_rule(&state, rule_id).await;
  info!(target: "grammar_match", rule_id, count = questions.len(), "HTTP rule questions served");
  Json(RuleQuestionsOut { rule_id, questions })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_mapping(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(current_mapping(&state).await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_rebuild(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(rebuild(&state).await)
}

#[instrument(level = "info", skip(state, body), fields(rule_id = body.rule_id, question_id = %body.question_id))]
pub async fn http_post_manual_mapping(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ManualMappingIn>,
) -> impl IntoResponse {
  match manual_mapping(&state, body.rule_id, &body.question_id, body.base_revision.as_deref()).await {
    Ok(out) => {
      info!(target: "grammar_match", rule_id = body.rule_id, question_id = %body.question_id, "HTTP manual mapping applied");
      (StatusCode::OK, Json(out)).into_response()
    }
    Err(e) => {
      warn!(target: "grammar_match", error = %e, "HTTP manual mapping rejected");
      let status = match e {
        OverrideRejection::UnknownRule(_) | OverrideRejection::UnknownQuestion(_) => StatusCode::NOT_FOUND,
        OverrideRejection::StaleRevision { .. } => StatusCode::CONFLICT,
      };
      (status, Json(ErrorOut { message: e.to_string() })).into_response()
    }
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(stats(&state).await)
}

#[instrument(level = "info", skip(state, body), fields(requested = body.question_ids.len()))]
pub async fn http_post_analyze(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnalyzeIn>,
) -> impl IntoResponse {
  let analyses = analyze(&state, &body.question_ids).await;
  Json(AnalyzeOut { analyses })
}
