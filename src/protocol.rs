//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable so the content site can evolve independently.

use serde::{Deserialize, Serialize};

use crate::domain::{MappingResult, MatchingStats, Question, QuestionAnalysis, Rule};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    GetStats,
    GetMapping,
    RuleQuestions {
        #[serde(rename = "ruleId")]
        rule_id: u32,
    },
    Analyze {
        #[serde(rename = "questionIds", default)]
        question_ids: Vec<String>,
    },
    ManualMapping {
        #[serde(rename = "ruleId")]
        rule_id: u32,
        #[serde(rename = "questionId")]
        question_id: String,
        #[serde(rename = "baseRevision", default)]
        base_revision: Option<String>,
    },
    Rebuild,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Stats {
        stats: MatchingStats,
    },
    Mapping {
        mapping: MappingOut,
    },
    RuleQuestions {
        #[serde(rename = "ruleId")]
        rule_id: u32,
        questions: Vec<Question>,
    },
    Analysis {
        analyses: Vec<QuestionAnalysis>,
    },
    Error {
        message: String,
    },
}

/// Mapping plus the revision it was produced under.
#[derive(Debug, Serialize)]
pub struct MappingOut {
    pub revision: String,
    #[serde(flatten)]
    pub result: MappingResult,
}

/// Rule with the number of questions currently mapped to it.
#[derive(Debug, Serialize)]
pub struct RuleOut {
    #[serde(flatten)]
    pub rule: Rule,
    #[serde(rename = "questionCount")]
    pub question_count: usize,
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct AnalyzeIn {
    #[serde(rename = "questionIds", default)]
    pub question_ids: Vec<String>,
}
#[derive(Debug, Serialize)]
pub struct AnalyzeOut {
    pub analyses: Vec<QuestionAnalysis>,
}

#[derive(Debug, Deserialize)]
pub struct ManualMappingIn {
    #[serde(rename = "ruleId")]
    pub rule_id: u32,
    #[serde(rename = "questionId")]
    pub question_id: String,
    #[serde(rename = "baseRevision", default)]
    pub base_revision: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RuleQuestionsOut {
    #[serde(rename = "ruleId")]
    pub rule_id: u32,
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub revision: String,
}
