use serde::{Deserialize, Serialize};

/// One accepted upload, extracted and scored. Filename, text, score, and
/// feedback travel together so nothing can drift out of alignment.
#[derive(Debug, Clone)]
pub struct UploadedResume {
    /// Sanitized original filename, shown back to the user.
    pub filename: String,
    pub raw_text: String,
    pub ats_score: f64,
    pub feedback: Vec<String>,
}

/// Per-resume record in the final ranked response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub filename: String,
    /// Cosine similarity to the job description, rounded to 2 decimals.
    pub score: f64,
    pub ats_score: f64,
    pub feedback: Vec<String>,
}
