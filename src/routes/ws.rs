//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "grammar_match", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "grammar_match", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "grammar_match", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "grammar_match", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "grammar_match", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
pub(crate) async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::GetStats => ServerWsMessage::Stats { stats: stats(state).await },

    ClientWsMessage::GetMapping => ServerWsMessage::Mapping { mapping: current_mapping(state).await },

    ClientWsMessage::RuleQuestions { rule_id } => {
      let questions = questions_for_rule(state, rule_id).await;
      ServerWsMessage::RuleQuestions { rule_id, questions }
    }

    ClientWsMessage::Analyze { question_ids } => {
      let analyses = analyze(state, &question_ids).await;
      ServerWsMessage::Analysis { analyses }
    }

    ClientWsMessage::ManualMapping { rule_id, question_id, base_revision } => {
      match manual_mapping(state, rule_id, &question_id, base_revision.as_deref()).await {
        Ok(mapping) => {
          info!(target: "grammar_match", rule_id, %question_id, "WS manual_mapping applied");
          ServerWsMessage::Mapping { mapping }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::Rebuild => ServerWsMessage::Mapping { mapping: rebuild(state).await },
  }
}
