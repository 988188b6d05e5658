use serde::{Deserialize, Serialize};
use viralens::{PostAnalysis, PostAnalysisInput};

#[derive(Debug, Deserialize)]
pub struct ApiCaptionRequest {
    pub caption: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiAnalysisRequest {
    pub request_id: Option<String>,
    #[serde(flatten)]
    pub input: PostAnalysisInput,
}

impl ApiAnalysisRequest {
    pub fn into_input(self) -> Result<PostAnalysisInput, String> {
        if let Some(subject) = self.input.subject.as_ref() {
            if !(subject.width > 0.0 && subject.height > 0.0) {
                return Err(format!(
                    "invalid subject frame: {}x{}",
                    subject.width, subject.height
                ));
            }
        }
        Ok(self.input)
    }
}

#[derive(Debug, Serialize)]
pub struct ApiAnalysisResponse {
    pub request_id: String,
    #[serde(flatten)]
    pub analysis: PostAnalysis,
}

impl ApiAnalysisResponse {
    pub fn from_analysis(analysis: PostAnalysis, request_id: String) -> Self {
        Self {
            request_id,
            analysis,
        }
    }
}
