use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::caption::SentimentClassifier;
use crate::config::ClassifierConfig;
use crate::SentimentProbs;

/// Text-classification client for a hosted sentiment model.
///
/// Speaks the Hugging Face inference protocol: `{"inputs": text}` in, a list of
/// `{label, score}` pairs out.
#[derive(Clone)]
pub struct HttpSentimentClassifier {
    client: reqwest::Client,
    url: String,
    api_token: Option<String>,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl HttpSentimentClassifier {
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, String> {
        let url = format!(
            "{}/{}",
            config.endpoint.trim_end_matches('/'),
            config.model.trim_start_matches('/')
        );
        Self::new(
            url,
            config.api_token.clone(),
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn new(url: String, api_token: Option<String>, timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| format!("failed to build classifier client: {}", err))?;
        Ok(Self {
            client,
            url,
            api_token,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SentimentClassifier for HttpSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentProbs, String> {
        let mut request = self.client.post(&self.url).json(&ClassifyRequest { inputs: text });
        if let Some(token) = self.api_token.as_ref() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|err| format!("classifier request failed: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = body.trim();
            if detail.is_empty() {
                return Err(format!("classifier error: {}", status));
            }
            return Err(format!("classifier error: {} {}", status, detail));
        }

        let body: ClassifyResponse = response
            .json()
            .await
            .map_err(|err| format!("classifier response parse failed: {}", err))?;

        let labels = match body {
            ClassifyResponse::Batched(mut batches) => {
                if batches.is_empty() {
                    return Err("classifier response missing scores".to_string());
                }
                batches.swap_remove(0)
            }
            ClassifyResponse::Flat(labels) => labels,
        };

        probs_from_labels(&labels)
    }
}

/// Collects label scores into probabilities; labels that never appear count as 0.
///
/// Accepts both named labels and the positional `LABEL_0..2` form.
pub fn probs_from_labels(labels: &[LabelScore]) -> Result<SentimentProbs, String> {
    if labels.is_empty() {
        return Err("classifier response missing scores".to_string());
    }

    let mut probs = SentimentProbs::default();
    for entry in labels {
        match entry.label.to_lowercase().as_str() {
            "negative" | "neg" | "label_0" => probs.negative = entry.score,
            "neutral" | "neu" | "label_1" => probs.neutral = entry.score,
            "positive" | "pos" | "label_2" => probs.positive = entry.score,
            other => return Err(format!("unknown sentiment label: {}", other)),
        }
    }
    Ok(probs)
}
