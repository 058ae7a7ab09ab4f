use crate::error::{InterviewError, Result, SetupIssue};

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Uploaded CV document
#[derive(Debug, Clone)]
pub struct CvDocument {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Intake collected during the setup stage
#[derive(Debug, Clone)]
pub struct SetupRequest {
    pub job_description: String,
    pub cv: Option<CvDocument>,
}

impl SetupRequest {
    pub fn new(job_description: impl Into<String>, cv: CvDocument) -> Self {
        Self {
            job_description: job_description.into(),
            cv: Some(cv),
        }
    }

    /// Check the intake before any network call
    pub fn validate(&self) -> Result<&CvDocument> {
        if self.job_description.trim().is_empty() {
            return Err(InterviewError::InvalidSetup(SetupIssue::MissingJobDescription));
        }

        let cv = match &self.cv {
            Some(cv) if !cv.bytes.is_empty() => cv,
            _ => return Err(InterviewError::InvalidSetup(SetupIssue::MissingCv)),
        };

        if !cv.content_type.eq_ignore_ascii_case(PDF_MIME_TYPE) {
            return Err(InterviewError::InvalidSetup(SetupIssue::InvalidCvType));
        }

        Ok(cv)
    }
}
