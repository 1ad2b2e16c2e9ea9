//! Confidence scoring for one question's suggestions.
//!
//! score = 0.35 * best strength
//!       + 0.35 * matched hints / total hints
//!       + 0.30 * min(matched hints, 3) / 3
//!
//! No matched hint means every term is zero. A confirming hint raises or keeps
//! all three terms; a failing hint only lowers the coverage term.

use crate::suggest::Suggestions;

/// Minimum confidence for a question to enter the mapping.
pub const MATCH_THRESHOLD: f32 = 0.3;

/// Matched questions under this boundary are flagged for review.
pub const LOW_CONFIDENCE: f32 = 0.5;

const STRENGTH_WEIGHT: f32 = 0.35;
const COVERAGE_WEIGHT: f32 = 0.35;
const VOLUME_WEIGHT: f32 = 0.30;
const VOLUME_SATURATION: usize = 3;

pub fn score(s: &Suggestions) -> f32 {
  if s.total_hints == 0 || s.matched_hints == 0 {
    return 0.0;
  }
  let coverage = s.matched_hints as f32 / s.total_hints as f32;
  let volume = s.matched_hints.min(VOLUME_SATURATION) as f32 / VOLUME_SATURATION as f32;
  let raw = STRENGTH_WEIGHT * s.best_strength() + COVERAGE_WEIGHT * coverage + VOLUME_WEIGHT * volume;
  raw.clamp(0.0, 1.0)
}

pub fn is_low(confidence: f32) -> bool {
  confidence < LOW_CONFIDENCE
}
