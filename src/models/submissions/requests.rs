use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}
