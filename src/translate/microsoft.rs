//! Microsoft Translator (Azure Cognitive Services, API v3).

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use super::Translator;
use crate::error::TranslationError;

pub const DEFAULT_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";
const API_VERSION: &str = "3.0";

/// `:name` placeholders must survive translation untouched.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(:[a-zA-Z0-9_.-]+)").expect("valid placeholder regex"));
static PROTECTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="notranslate">(.+?)</span>"#).expect("valid protected regex")
});

#[derive(Debug, Deserialize)]
struct Detection {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

pub struct MicrosoftTranslator {
    agent: ureq::Agent,
    endpoint: String,
    key: String,
    region: Option<String>,
    default_from: Option<String>,
}

impl MicrosoftTranslator {
    pub fn new(endpoint: &str, key: &str, region: Option<&str>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build();
        Self {
            agent,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            key: key.to_string(),
            region: region.map(str::to_string),
            default_from: None,
        }
    }

    /// Source language used when the caller does not name one.
    pub fn with_default_from(mut self, locale: &str) -> Self {
        self.default_from = Some(locale.to_string());
        self
    }

    fn request(&self, text: &str, to: &str, from: Option<&str>) -> Result<String, TranslationError> {
        let url = format!("{}/translate", self.endpoint);
        let mut request = self
            .agent
            .post(&url)
            .query("api-version", API_VERSION)
            .query("to", to)
            .query("textType", "html")
            .set("Ocp-Apim-Subscription-Key", &self.key);
        if let Some(from) = from {
            request = request.query("from", from);
        }
        if let Some(region) = &self.region {
            request = request.set("Ocp-Apim-Subscription-Region", region);
        }

        let response = request
            .send_json(json!([{ "Text": protect(text) }]))
            .map_err(|e| match e {
                ureq::Error::Status(code, response) => TranslationError::Request(format!(
                    "HTTP {code}: {}",
                    response.into_string().unwrap_or_default().trim()
                )),
                other => TranslationError::Request(other.to_string()),
            })?;

        let detections: Vec<Detection> = response
            .into_json()
            .map_err(|e| TranslationError::Request(format!("invalid response: {e}")))?;

        detections
            .into_iter()
            .flat_map(|detection| detection.translations)
            .map(|translation| unprotect(&translation.text))
            .next()
            .ok_or_else(|| TranslationError::Empty(text.to_string()))
    }
}

impl Translator for MicrosoftTranslator {
    fn translate(&self, text: &str, to: &str, from: Option<&str>) -> Result<String, TranslationError> {
        let to = service_locale(to);
        let from = from
            .or(self.default_from.as_deref())
            .map(service_locale);

        if from.as_deref() == Some(to.as_str()) {
            return Ok(text.to_string());
        }
        self.request(text, &to, from.as_deref())
    }
}

/// `pt_BR` → `pt-BR`.
fn service_locale(locale: &str) -> String {
    locale.replace('_', "-")
}

fn protect(text: &str) -> String {
    PLACEHOLDER
        .replace_all(text, r#"<span class="notranslate">$1</span>"#)
        .into_owned()
}

fn unprotect(text: &str) -> String {
    PROTECTED.replace_all(text, "$1").into_owned()
}
