//! Aggregate statistics over a mapping result. Pure fold, no hidden state.

use std::collections::{HashMap, HashSet};

use crate::confidence::is_low;
use crate::domain::{EditorAgreement, MappingResult, MatchingStats, Question};

pub fn matching_stats(result: &MappingResult, questions: &[Question]) -> MatchingStats {
  let analyses = result.analysis_results();
  let unmatched: HashSet<&str> = result.unmatched_questions().iter().map(String::as_str).collect();

  let total = analyses.len();
  let unmatched_count = analyses
    .iter()
    .filter(|a| unmatched.contains(a.question_id.as_str()))
    .count();

  let average_confidence = if total == 0 {
    0.0
  } else {
    analyses.iter().map(|a| a.confidence).sum::<f32>() / total as f32
  };

  let low_confidence_count = analyses
    .iter()
    .filter(|a| !unmatched.contains(a.question_id.as_str()) && is_low(a.confidence))
    .count();

  let rules_with = result.question_counts().values().filter(|&&n| n > 0).count();
  let rules_without = result.question_counts().len() - rules_with;

  MatchingStats {
    total_questions: total,
    matched_questions: total - unmatched_count,
    unmatched_questions: unmatched_count,
    average_confidence,
    rules_with_questions: rules_with,
    rules_without_questions: rules_without,
    low_confidence_count,
    editor_agreement: editor_agreement(result, questions),
  }
}

fn editor_agreement(result: &MappingResult, questions: &[Question]) -> EditorAgreement {
  let mut assigned_by_id: HashMap<&str, Option<u32>> = HashMap::with_capacity(questions.len());
  for q in questions {
    assigned_by_id.entry(q.id.as_str()).or_insert(q.rule_id);
  }

  let mut agreement = EditorAgreement::default();
  for analysis in result.analysis_results() {
    let assigned = assigned_by_id.get(analysis.question_id.as_str()).copied().flatten();
    if let Some(rule_id) = assigned {
      agreement.assigned += 1;
      if analysis.suggested_rule_ids.contains(&rule_id) {
        agreement.agreeing += 1;
      }
    }
  }
  agreement
}
