//! Advisory feedback for a single resume.
//!
//! Rules fire in a fixed order so the output list is stable: score tier,
//! resume length, projects mention, Python gap. Between zero and four extra
//! messages follow the mandatory tier message.

use crate::screening::ats::ResumeScorer;

const LOW_TIER_THRESHOLD: f64 = 0.5;
const MODERATE_TIER_THRESHOLD: f64 = 0.75;
const SHORT_RESUME_CHARS: usize = 500;

const LOW_TIER_MSG: &str = "Low ATS score: many keywords missing. Add relevant skills.";
const MODERATE_TIER_MSG: &str = "Moderate ATS score: improve keyword relevance and completeness.";
const HIGH_TIER_MSG: &str = "High ATS score: strong match! Tailor further for best impact.";
const SHORT_RESUME_MSG: &str =
    "Your resume is quite short. Consider adding more detail about your skills and experience.";
const ADD_PROJECTS_MSG: &str = "Include any significant projects or achievements for more impact.";
const HIGHLIGHT_PYTHON_MSG: &str =
    "The job mentions Python, but your resume does not. Highlight your Python skills.";

/// Produces the ordered advisory list for one resume. The ATS score is
/// recomputed through the scorer rather than passed in, so feedback can never
/// disagree with the score it describes.
pub fn generate_feedback(
    resume_text: &str,
    job_description: &str,
    scorer: &dyn ResumeScorer,
) -> Vec<String> {
    let ats_score = scorer.score(resume_text, job_description);
    let resume_lower = resume_text.to_lowercase();
    let jd_lower = job_description.to_lowercase();

    let mut feedback = Vec::new();

    let tier = if ats_score < LOW_TIER_THRESHOLD {
        LOW_TIER_MSG
    } else if ats_score < MODERATE_TIER_THRESHOLD {
        MODERATE_TIER_MSG
    } else {
        HIGH_TIER_MSG
    };
    feedback.push(tier.to_string());

    if resume_text.chars().count() < SHORT_RESUME_CHARS {
        feedback.push(SHORT_RESUME_MSG.to_string());
    }
    if !resume_lower.contains("project") {
        feedback.push(ADD_PROJECTS_MSG.to_string());
    }
    if jd_lower.contains("python") && !resume_lower.contains("python") {
        feedback.push(HIGHLIGHT_PYTHON_MSG.to_string());
    }

    feedback
}
