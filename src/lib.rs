//! Grammar Match · rule/question matching engine
//!
//! Associates free-text exam questions with the grammar rules they most likely
//! exercise, using the instructional hints authors put in parentheses:
//!
//!   question text -> hints -> keywords -> taxonomy candidates -> confidence -> mapping
//!
//! The engine (`engine::MatchingEngine`) is synchronous and pure over its
//! catalogs. The remaining modules host it behind a small axum API.

pub mod domain;
pub mod hints;
pub mod keywords;
pub mod taxonomy;
pub mod suggest;
pub mod confidence;
pub mod engine;
pub mod stats;
pub mod seeds;
pub mod config;
pub mod telemetry;
pub mod state;
pub mod protocol;
pub mod logic;
pub mod routes;

pub use domain::{MappingResult, MatchingStats, Question, QuestionAnalysis, Rule};
pub use engine::MatchingEngine;
