//! Mapping builder: runs the hint -> keyword -> suggestion -> confidence pipeline
//! over the question catalog and produces the rule-indexed mapping.
//!
//! The engine holds the catalogs read-only. Every operation is a pure function of
//! the catalogs and its arguments; a manual override returns a new mapping.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info, instrument, warn};

use crate::confidence::{self, MATCH_THRESHOLD};
use crate::domain::{MappingResult, MatchingStats, Question, QuestionAnalysis, Rule};
use crate::hints::extract_hints;
use crate::keywords::{extract_keywords, merge_keywords};
use crate::stats::matching_stats;
use crate::suggest::suggest_rules;
use crate::taxonomy::Taxonomy;

#[derive(Clone, Debug)]
pub struct MatchingEngine {
  rules: Vec<Rule>,
  questions: Vec<Question>,
  taxonomy: Taxonomy,
  known_rules: HashSet<u32>,
  // id -> position; the first record wins on duplicate ids
  rule_index: HashMap<u32, usize>,
  question_index: HashMap<String, usize>,
}

impl MatchingEngine {
  pub fn new(rules: Vec<Rule>, questions: Vec<Question>) -> Self {
    Self::with_taxonomy(rules, questions, Taxonomy::modifiers())
  }

  pub fn with_taxonomy(rules: Vec<Rule>, questions: Vec<Question>, taxonomy: Taxonomy) -> Self {
    let known_rules = rules.iter().map(|r| r.id).collect();
    let mut rule_index = HashMap::with_capacity(rules.len());
    for (i, r) in rules.iter().enumerate() {
      rule_index.entry(r.id).or_insert(i);
    }
    let mut question_index = HashMap::with_capacity(questions.len());
    for (i, q) in questions.iter().enumerate() {
      question_index.entry(q.id.clone()).or_insert(i);
    }
    Self { rules, questions, taxonomy, known_rules, rule_index, question_index }
  }

  pub fn rules(&self) -> &[Rule] { &self.rules }
  pub fn questions(&self) -> &[Question] { &self.questions }

  pub fn taxonomy(&self) -> &Taxonomy { &self.taxonomy }

  pub fn rule(&self, rule_id: u32) -> Option<&Rule> {
    self.rule_index.get(&rule_id).map(|&i| &self.rules[i])
  }

  pub fn question(&self, question_id: &str) -> Option<&Question> {
    self.question_index.get(question_id).map(|&i| &self.questions[i])
  }

  /// Analyse a single question.
  pub fn analyze_question(&self, q: &Question) -> QuestionAnalysis {
    let hints = extract_hints(&q.question);
    let per_hint: Vec<Vec<String>> = hints.iter().map(|h| extract_keywords(h)).collect();
    let suggestions = suggest_rules(&self.taxonomy, &per_hint, &self.known_rules);
    let confidence = confidence::score(&suggestions);
    debug!(
      target: "matcher",
      question_id = %q.id,
      hints = hints.len(),
      matched_hints = suggestions.matched_hints,
      confidence,
      "Question analysed"
    );
    QuestionAnalysis {
      question_id: q.id.clone(),
      keywords: merge_keywords(&per_hint),
      suggested_rule_ids: suggestions.rule_ids(),
      hints,
      confidence,
    }
  }

  /// Analyse an arbitrary subset of questions without building a mapping.
  #[instrument(level = "debug", skip_all, fields(count = questions.len()))]
  pub fn analyze_questions(&self, questions: &[Question]) -> Vec<QuestionAnalysis> {
    questions.iter().map(|q| self.analyze_question(q)).collect()
  }

  /// Build the mapping for the whole question catalog.
  #[instrument(level = "info", skip(self), fields(rules = self.rules.len(), questions = self.questions.len()))]
  pub fn create_mapping(&self) -> MappingResult {
    let result = self.create_mapping_for(&self.questions);
    info!(
      target: "matcher",
      mapped_rules = result.mapping().values().filter(|ids| !ids.is_empty()).count(),
      unmatched = result.unmatched_questions().len(),
      "Mapping created"
    );
    result
  }

  /// Build the mapping for one shard of questions. Every catalog rule is a key.
  /// Shard results combine with `MappingResult::merge`.
  pub fn create_mapping_for(&self, questions: &[Question]) -> MappingResult {
    let mut mapping: BTreeMap<u32, Vec<String>> =
      self.rules.iter().map(|r| (r.id, Vec::new())).collect();
    let mut unmatched = vec![];

    let analyses = self.analyze_questions(questions);
    for analysis in &analyses {
      if is_matched(analysis) {
        for rule_id in &analysis.suggested_rule_ids {
          mapping.entry(*rule_id).or_default().push(analysis.question_id.clone());
        }
      } else {
        unmatched.push(analysis.question_id.clone());
      }
    }

    MappingResult::new(mapping, unmatched, analyses)
  }

  /// Full question records for a rule, in mapping order. Unknown ids are skipped.
  pub fn get_questions_for_rule(&self, rule_id: u32, mapping: &MappingResult) -> Vec<Question> {
    mapping
      .questions_for(rule_id)
      .iter()
      .filter_map(|id| self.question(id).cloned())
      .collect()
  }

  /// Editor override: `question_id` ends up under `rule_id` only.
  #[instrument(level = "info", skip(self, current))]
  pub fn add_manual_mapping(&self, rule_id: u32, question_id: &str, current: &MappingResult) -> MappingResult {
    if self.rule(rule_id).is_none() {
      warn!(target: "matcher", rule_id, "Manual mapping onto a rule missing from the catalog");
    }
    if self.question(question_id).is_none() {
      warn!(target: "matcher", %question_id, "Manual mapping of a question missing from the catalog");
    }
    current.with_manual_assignment(rule_id, question_id)
  }

  pub fn get_matching_stats(&self, mapping: &MappingResult) -> MatchingStats {
    matching_stats(mapping, &self.questions)
  }

  /// (rule, question count) in catalog order.
  pub fn rule_coverage<'a>(&'a self, mapping: &MappingResult) -> Vec<(&'a Rule, usize)> {
    self.rules.iter().map(|r| (r, mapping.count_for(r.id))).collect()
  }
}

fn is_matched(analysis: &QuestionAnalysis) -> bool {
  !analysis.suggested_rule_ids.is_empty() && analysis.confidence >= MATCH_THRESHOLD
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::{seed_questions, seed_rules};

  fn rule(id: u32, title: &str) -> Rule {
    Rule {
      id,
      label: format!("Rule {id}"),
      title: title.into(),
      description: String::new(),
      examples: vec![],
    }
  }

  fn question(id: &str, text: &str) -> Question {
    Question {
      id: id.into(),
      question: text.into(),
      answer: None,
      topic: "modifiers".into(),
      level: "HSC".into(),
      board: String::new(),
      year: None,
      rule_id: None,
    }
  }

  const CRICKET: &str = "Cricket is an (a) --- (pre-modify the noun) game. It is not a game of (b) --- \
                         (use possessive to pre-modify the noun) country.";

  fn small_engine() -> MatchingEngine {
    MatchingEngine::new(
      vec![rule(1, "Adjective as pre-modifier"), rule(5, "Possessive as pre-modifier")],
      vec![
        question("q1", CRICKET),
        question("q2", "He is a good boy."),
        question("q3", "(a) test with (Dhaka-2023) and (use adjective to pre-modify the noun)"),
        question("q4", "It was a (a) --- (use an appositive) day."),
      ],
    )
  }

  fn assert_invariants(engine: &MatchingEngine, m: &MappingResult) {
    for (rule_id, ids) in m.mapping() {
      assert_eq!(m.question_counts()[rule_id], ids.len());
    }
    for q in engine.questions() {
      let in_lists = m.mapping().values().any(|ids| ids.contains(&q.id));
      let in_unmatched = m.unmatched_questions().contains(&q.id);
      assert!(in_lists ^ in_unmatched, "{} must be in exactly one place", q.id);
    }
    for a in m.analysis_results() {
      assert!((0.0..=1.0).contains(&a.confidence));
      if a.hints.is_empty() {
        assert!(a.confidence < 0.5);
      }
    }
  }

  #[test]
  fn cricket_question_maps_to_both_rules() {
    let engine = small_engine();
    let a = engine.analyze_question(&engine.questions()[0]);
    assert_eq!(a.hints, vec!["pre-modify the noun", "use possessive to pre-modify the noun"]);
    assert!(a.suggested_rule_ids.contains(&1));
    assert!(a.suggested_rule_ids.contains(&5));
    assert!(a.confidence > 0.5, "confidence={}", a.confidence);

    let m = engine.create_mapping();
    assert!(m.questions_for(1).contains(&"q1".to_string()));
    assert!(m.questions_for(5).contains(&"q1".to_string()));
    assert_invariants(&engine, &m);
  }

  #[test]
  fn question_without_parentheses_is_unmatched() {
    let engine = small_engine();
    let a = engine.analyze_question(&engine.questions()[1]);
    assert!(a.hints.is_empty());
    assert!(a.keywords.is_empty());
    assert!(a.suggested_rule_ids.is_empty());
    assert!(a.confidence < 0.5);
    assert!(engine.create_mapping().unmatched_questions().contains(&"q2".to_string()));
  }

  #[test]
  fn labels_and_citations_are_not_hints() {
    let engine = small_engine();
    let a = engine.analyze_question(&engine.questions()[2]);
    assert_eq!(a.hints, vec!["use adjective to pre-modify the noun"]);
    assert_eq!(a.suggested_rule_ids, vec![1]);
  }

  #[test]
  fn suggestions_outside_the_catalog_leave_question_unmatched() {
    // "appositive" points at rule 15, which this catalog does not have.
    let engine = small_engine();
    let m = engine.create_mapping();
    assert_eq!(m.unmatched_questions(), ["q2".to_string(), "q4".to_string()]);
    assert_eq!(m.mapping().keys().copied().collect::<Vec<_>>(), vec![1, 5]);
  }

  #[test]
  fn empty_question_list_keeps_every_rule_key() {
    let rules = (1..=4).map(|id| rule(id, "r")).collect();
    let engine = MatchingEngine::new(rules, vec![]);
    let m = engine.create_mapping();
    assert_eq!(m.mapping().len(), 4);
    assert!(m.mapping().values().all(Vec::is_empty));
    assert!(m.unmatched_questions().is_empty());
  }

  #[test]
  fn empty_rule_list_leaves_everything_unmatched() {
    let engine = MatchingEngine::new(vec![], vec![question("q1", CRICKET)]);
    let m = engine.create_mapping();
    assert!(m.mapping().is_empty());
    assert_eq!(m.unmatched_questions(), ["q1".to_string()]);
  }

  #[test]
  fn manual_mapping_of_unmatched_question() {
    let engine = small_engine();
    let m = engine.create_mapping();
    assert!(m.unmatched_questions().contains(&"q4".to_string()));

    let edited = engine.add_manual_mapping(1, "q4", &m);
    assert!(edited.questions_for(1).contains(&"q4".to_string()));
    assert!(!edited.questions_for(5).contains(&"q4".to_string()));
    assert_invariants(&engine, &edited);
    // source mapping untouched
    assert!(!m.questions_for(1).contains(&"q4".to_string()));
  }

  #[test]
  fn manual_mapping_replaces_multi_rule_assignment_and_is_idempotent() {
    let engine = small_engine();
    let m = engine.create_mapping();
    let once = engine.add_manual_mapping(5, "q1", &m);
    let twice = engine.add_manual_mapping(5, "q1", &once);
    assert_eq!(once, twice);
    assert!(!once.questions_for(1).contains(&"q1".to_string()));
    assert_eq!(once.questions_for(5).iter().filter(|q| *q == "q1").count(), 1);
  }

  #[test]
  fn questions_for_rule_skips_unknown_ids() {
    let engine = small_engine();
    let m = engine.add_manual_mapping(1, "ghost", &engine.create_mapping());
    let qs = engine.get_questions_for_rule(1, &m);
    let ids: Vec<&str> = qs.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["q1", "q3"]);
    assert!(engine.get_questions_for_rule(99, &m).is_empty());
  }

  #[test]
  fn stats_add_up() {
    let engine = small_engine();
    let stats = engine.get_matching_stats(&engine.create_mapping());
    assert_eq!(stats.total_questions, 4);
    assert_eq!(stats.matched_questions, 2);
    assert_eq!(stats.unmatched_questions, 2);
    assert_eq!(stats.rules_with_questions, 2);
    assert_eq!(stats.rules_without_questions, 0);
  }

  #[test]
  fn sharded_mappings_merge_to_the_full_mapping() {
    let engine = MatchingEngine::new(seed_rules(), seed_questions());
    let full = engine.create_mapping();
    let (left, right) = engine.questions().split_at(engine.questions().len() / 2);
    let merged = engine.create_mapping_for(left).merge(engine.create_mapping_for(right));
    assert_eq!(merged, full);
    assert_invariants(&engine, &merged);
  }

  #[test]
  fn seed_catalog_is_mostly_covered() {
    let engine = MatchingEngine::new(seed_rules(), seed_questions());
    let m = engine.create_mapping();
    assert_invariants(&engine, &m);
    assert_eq!(m.mapping().len(), 21);
    let stats = engine.get_matching_stats(&m);
    assert!(stats.matched_questions > stats.unmatched_questions);
    let coverage = engine.rule_coverage(&m);
    assert_eq!(coverage.len(), 21);
    assert_eq!(coverage[0].0.id, 1);
  }

  #[test]
  fn pre_modifier_question_stays_off_post_modifier_rules() {
    let mut questions = seed_questions();
    questions.push(question("p1", "Do not get off a (a) --- (use present participle to pre-modify the noun) bus."));
    let engine = MatchingEngine::new(seed_rules(), questions);
    let m = engine.create_mapping();
    for id in ["p1", "mod-002"] {
      assert!(m.questions_for(3).contains(&id.to_string()), "{id} missing from rule 3");
      assert!(!m.questions_for(13).contains(&id.to_string()), "{id} under rule 13");
      assert!(!m.questions_for(14).contains(&id.to_string()), "{id} under rule 14");
    }
    assert_invariants(&engine, &m);
  }

  #[test]
  fn lookups_by_id_use_first_record() {
    let engine = MatchingEngine::new(
      vec![rule(1, "first"), rule(1, "second")],
      vec![question("q1", "first text"), question("q1", "second text")],
    );
    assert_eq!(engine.rule(1).map(|r| r.title.as_str()), Some("first"));
    assert_eq!(engine.question("q1").map(|q| q.question.as_str()), Some("first text"));
    assert!(engine.rule(2).is_none());
    assert!(engine.question("q2").is_none());
  }

  #[test]
  fn adding_a_confirming_hint_never_lowers_confidence() {
    let engine = small_engine();
    let base = engine.analyze_question(&question("m1", "A (a) --- (pre-modify the noun) game."));
    let more = engine.analyze_question(&question(
      "m2",
      "A (a) --- (pre-modify the noun) game of (b) --- (use possessive) country.",
    ));
    let failing = engine.analyze_question(&question(
      "m3",
      "A (a) --- (pre-modify the noun) game of (b) --- (say it loudly) country.",
    ));
    assert!(more.confidence >= base.confidence);
    assert!(failing.confidence <= base.confidence);
  }
}
