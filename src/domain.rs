//! Domain models: catalog records (rules, questions) and the matching outputs
//! (per-question analysis, rule-indexed mapping, aggregate statistics).

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Grammar rule from the catalog. Never mutated by the engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Rule {
  pub id: u32,
  pub label: String,   // e.g. "Rule 5"
  pub title: String,
  #[serde(default)] pub description: String,
  #[serde(default)] pub examples: Vec<String>,
}

/// Exam question from the catalog. Topic/level/board/year are descriptive only.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub id: String,
  pub question: String,
  #[serde(default)] pub answer: Option<String>,
  #[serde(default)] pub topic: String,
  #[serde(default)] pub level: String,
  #[serde(default)] pub board: String,
  #[serde(default)] pub year: Option<u16>,
  /// Editor-assigned rule, informational only.
  #[serde(default)] pub rule_id: Option<u32>,
}

/// Result of running extraction, keywording, suggestion and scoring on one question.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnalysis {
  pub question_id: String,
  pub hints: Vec<String>,
  pub keywords: Vec<String>,
  pub suggested_rule_ids: Vec<u32>,
  pub confidence: f32,
}

/// Rule-indexed association of questions. A value object: every edit yields a new one.
///
/// `question_counts` is always derived from `mapping`, so the two cannot disagree.
#[derive(Clone, Debug, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MappingResult {
  mapping: BTreeMap<u32, Vec<String>>,
  question_counts: BTreeMap<u32, usize>,
  unmatched_questions: Vec<String>,
  analysis_results: Vec<QuestionAnalysis>,
  manual_assignments: BTreeMap<String, u32>,
}

impl MappingResult {
  pub fn new(
    mapping: BTreeMap<u32, Vec<String>>,
    unmatched_questions: Vec<String>,
    analysis_results: Vec<QuestionAnalysis>,
  ) -> Self {
    Self::from_parts(mapping, unmatched_questions, analysis_results, BTreeMap::new())
  }

  fn from_parts(
    mapping: BTreeMap<u32, Vec<String>>,
    unmatched_questions: Vec<String>,
    analysis_results: Vec<QuestionAnalysis>,
    manual_assignments: BTreeMap<String, u32>,
  ) -> Self {
    let question_counts = mapping.iter().map(|(id, qs)| (*id, qs.len())).collect();
    Self { mapping, question_counts, unmatched_questions, analysis_results, manual_assignments }
  }

  pub fn mapping(&self) -> &BTreeMap<u32, Vec<String>> { &self.mapping }
  pub fn question_counts(&self) -> &BTreeMap<u32, usize> { &self.question_counts }
  pub fn unmatched_questions(&self) -> &[String] { &self.unmatched_questions }
  pub fn analysis_results(&self) -> &[QuestionAnalysis] { &self.analysis_results }
  pub fn manual_assignments(&self) -> &BTreeMap<String, u32> { &self.manual_assignments }

  /// Question ids mapped to `rule_id`, or an empty slice for unknown rules.
  pub fn questions_for(&self, rule_id: u32) -> &[String] {
    self.mapping.get(&rule_id).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn count_for(&self, rule_id: u32) -> usize {
    self.question_counts.get(&rule_id).copied().unwrap_or(0)
  }

  /// New result where `question_id` sits only under `rule_id`.
  /// Re-applying the same assignment yields an identical result.
  pub fn with_manual_assignment(&self, rule_id: u32, question_id: &str) -> Self {
    let mut mapping = self.mapping.clone();
    for ids in mapping.values_mut() {
      ids.retain(|q| q != question_id);
    }
    mapping.entry(rule_id).or_default().push(question_id.to_string());

    let unmatched = self
      .unmatched_questions
      .iter()
      .filter(|q| q.as_str() != question_id)
      .cloned()
      .collect();

    let mut manual = self.manual_assignments.clone();
    manual.insert(question_id.to_string(), rule_id);

    Self::from_parts(mapping, unmatched, self.analysis_results.clone(), manual)
  }

  /// Combine the results of two independently built shards.
  ///
  /// Lists are unioned per rule id in encounter order, unmatched lists and analyses are
  /// concatenated, and counts are recomputed from the merged lists.
  pub fn merge(self, other: MappingResult) -> Self {
    let mut mapping = self.mapping;
    for (rule_id, ids) in other.mapping {
      let entry = mapping.entry(rule_id).or_default();
      let mut seen: HashSet<String> = entry.iter().cloned().collect();
      for id in ids {
        if seen.insert(id.clone()) {
          entry.push(id);
        }
      }
    }

    let mut unmatched = self.unmatched_questions;
    unmatched.extend(other.unmatched_questions);
    let mut analyses = self.analysis_results;
    analyses.extend(other.analysis_results);
    let mut manual = self.manual_assignments;
    manual.extend(other.manual_assignments);

    Self::from_parts(mapping, unmatched, analyses, manual)
  }
}

/// Aggregate counts derived from a `MappingResult`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchingStats {
  pub total_questions: usize,
  pub matched_questions: usize,
  pub unmatched_questions: usize,
  pub average_confidence: f32,
  pub rules_with_questions: usize,
  pub rules_without_questions: usize,
  /// Matched questions whose confidence is still below the low-confidence boundary.
  pub low_confidence_count: usize,
  pub editor_agreement: EditorAgreement,
}

/// How often the suggestions contain the rule an editor already assigned.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EditorAgreement {
  pub assigned: usize,
  pub agreeing: usize,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> MappingResult {
    let mut mapping = BTreeMap::new();
    mapping.insert(1, vec!["q1".to_string(), "q2".to_string()]);
    mapping.insert(5, vec!["q2".to_string()]);
    mapping.insert(9, vec![]);
    MappingResult::new(mapping, vec!["q3".into()], vec![])
  }

  #[test]
  fn counts_follow_lists() {
    let m = sample();
    for (id, ids) in m.mapping() {
      assert_eq!(m.question_counts()[id], ids.len());
    }
    assert_eq!(m.count_for(1), 2);
    assert_eq!(m.count_for(42), 0);
    assert!(m.questions_for(42).is_empty());
  }

  #[test]
  fn manual_assignment_replaces_automatic_ones() {
    let m = sample().with_manual_assignment(9, "q2");
    assert_eq!(m.questions_for(1), ["q1".to_string()]);
    assert!(m.questions_for(5).is_empty());
    assert_eq!(m.questions_for(9), ["q2".to_string()]);
    assert_eq!(m.count_for(9), 1);
    assert_eq!(m.manual_assignments().get("q2"), Some(&9));
  }

  #[test]
  fn manual_assignment_is_idempotent_and_leaves_source_untouched() {
    let base = sample();
    let once = base.with_manual_assignment(1, "q3");
    let twice = once.with_manual_assignment(1, "q3");
    assert_eq!(once, twice);
    assert!(once.unmatched_questions().is_empty());
    assert_eq!(base.unmatched_questions(), ["q3".to_string()]);
    assert_eq!(base.count_for(1), 2);
  }

  #[test]
  fn merge_unions_lists_without_duplicates() {
    let mut left = BTreeMap::new();
    left.insert(1, vec!["a".to_string()]);
    left.insert(2, vec![]);
    let mut right = BTreeMap::new();
    right.insert(1, vec!["a".to_string(), "b".to_string()]);
    right.insert(2, vec!["c".to_string()]);

    let merged = MappingResult::new(left, vec!["x".into()], vec![])
      .merge(MappingResult::new(right, vec!["y".into()], vec![]));

    assert_eq!(merged.questions_for(1), ["a".to_string(), "b".to_string()]);
    assert_eq!(merged.count_for(2), 1);
    assert_eq!(merged.unmatched_questions(), ["x".to_string(), "y".to_string()]);
  }
}
