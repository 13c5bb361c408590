//! ATS scoring — pluggable, trait-based scorer that measures a resume
//! against a job description.
//!
//! Default: `KeywordAtsScorer` (pure-Rust, fast, deterministic, fully
//! testable). `AppState` holds an `Arc<dyn ResumeScorer>`, built at startup
//! from the configured skill vocabulary.

use std::collections::HashSet;

// Fixed design constants of the heuristic.
const KEYWORD_OVERLAP_WEIGHT: f64 = 0.6;
const LENGTH_BONUS: f64 = 0.2;
const LENGTH_BONUS_MIN_WORDS: usize = 300;
const SKILL_BONUS_PER_HIT: f64 = 0.05;
const SKILL_BONUS_CAP: f64 = 0.2;

/// The scorer seam. Implement this to swap backends without touching the
/// handler or the feedback rules.
pub trait ResumeScorer: Send + Sync {
    /// Returns a score in [0.0, 1.0], rounded to 2 decimal places.
    /// Pure function of its inputs; empty inputs degrade to 0.0.
    fn score(&self, resume_text: &str, job_description: &str) -> f64;
}

/// Keyword-overlap heuristic scorer.
///
/// Contributions:
/// 1. keyword overlap ratio × 0.6, where the ratio is
///    |resume ∩ jd| / max(|jd|, 1) over lowercased whitespace-split word sets
/// 2. flat 0.2 when the resume exceeds 300 whitespace-split tokens
/// 3. 0.05 per vocabulary skill appearing as a substring, capped at 0.2
///
/// The sum is clamped to 1.0 and rounded to 2 decimals.
pub struct KeywordAtsScorer {
    skill_vocabulary: Vec<String>,
}

impl KeywordAtsScorer {
    /// `vocabulary` entries are matched as lowercase substrings, so
    /// multi-word skills ("machine learning") are supported.
    pub fn new(vocabulary: Vec<String>) -> Self {
        Self {
            skill_vocabulary: vocabulary.into_iter().map(|s| s.to_lowercase()).collect(),
        }
    }
}

impl ResumeScorer for KeywordAtsScorer {
    fn score(&self, resume_text: &str, job_description: &str) -> f64 {
        let resume_lower = resume_text.to_lowercase();
        let jd_lower = job_description.to_lowercase();

        let resume_words: HashSet<&str> = resume_lower.split_whitespace().collect();
        let jd_words: HashSet<&str> = jd_lower.split_whitespace().collect();

        let overlap = resume_words.intersection(&jd_words).count();
        let keyword_match = overlap as f64 / jd_words.len().max(1) as f64;
        let mut score = keyword_match * KEYWORD_OVERLAP_WEIGHT;

        if resume_text.split_whitespace().count() > LENGTH_BONUS_MIN_WORDS {
            score += LENGTH_BONUS;
        }

        let skill_hits = self
            .skill_vocabulary
            .iter()
            .filter(|skill| resume_lower.contains(skill.as_str()))
            .count();
        score += (skill_hits as f64 * SKILL_BONUS_PER_HIT).min(SKILL_BONUS_CAP);

        round2(score.min(1.0))
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> KeywordAtsScorer {
        KeywordAtsScorer::new(vec![
            "python".to_string(),
            "java".to_string(),
            "sql".to_string(),
            "machine learning".to_string(),
            "data science".to_string(),
        ])
    }

    #[test]
    fn test_score_bounded_and_deterministic() {
        let s = scorer();
        let resume = "python java sql machine learning data science ".repeat(100);
        let jd = "python java sql developer";
        let first = s.score(&resume, jd);
        assert!((0.0..=1.0).contains(&first));
        assert_eq!(first, s.score(&resume, jd));
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        let s = scorer();
        assert_eq!(s.score("", ""), 0.0);
        assert_eq!(s.score("", "python developer"), 0.0);
    }

    #[test]
    fn test_empty_job_description_guarded() {
        // max(|jd_words|, 1) denominator keeps this finite
        let s = scorer();
        let score = s.score("a short resume", "");
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn test_monotone_in_keyword_overlap() {
        let s = scorer();
        let jd = "rust backend engineer tokio axum";
        let less = s.score("rust engineer", jd);
        let more = s.score("rust backend engineer", jd);
        assert!(more >= less, "overlap up, score down: {less} -> {more}");
    }

    #[test]
    fn test_length_bonus_over_300_words() {
        let s = scorer();
        let jd = "completely unrelated text";
        let short = "word ".repeat(200);
        let long = "word ".repeat(301);
        assert!((s.score(&long, jd) - s.score(&short, jd) - LENGTH_BONUS).abs() < 1e-9);
    }

    #[test]
    fn test_skill_bonus_capped() {
        let s = scorer();
        // All five skills present: 5 * 0.05 = 0.25, capped at 0.2
        let resume = "python java sql machine learning data science";
        let jd = "zzz";
        assert!((s.score(resume, jd) - SKILL_BONUS_CAP).abs() < 1e-9);
    }

    #[test]
    fn test_multiword_skill_matches_as_substring() {
        let s = KeywordAtsScorer::new(vec!["machine learning".to_string()]);
        assert_eq!(s.score("experienced in machine learning", "zzz"), 0.05);
        assert_eq!(s.score("machine and learning separately", "zzz"), 0.0);
    }

    #[test]
    fn test_known_scenario_score() {
        // 2 of 3 jd keywords matched (0.667 * 0.6 = 0.4) + python skill (0.05)
        let s = scorer();
        let score = s.score(
            "I am a python developer with 5 years experience on projects",
            "python developer needed",
        );
        assert!((score - 0.45).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.24999), 0.25);
        assert_eq!(round2(0.2), 0.2);
        assert_eq!(round2(1.0), 1.0);
    }
}
