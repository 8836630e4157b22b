use crate::completion::CompletionService;
use crate::error::Result;
use crate::model::HierarchyResult;
use docsift_scanner::{NoopReporter, PageRecord, ProgressReporter};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_CHAR_BUDGET: usize = 30_000;

/// Separator placed between page blocks in the prompt context.
const PAGE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Maximum number of characters of crawled text sent to the model.
    pub char_budget: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            char_budget: DEFAULT_CHAR_BUDGET,
        }
    }
}

impl ExtractorConfig {
    pub fn with_char_budget(mut self, char_budget: usize) -> Self {
        self.char_budget = char_budget;
        self
    }
}

/// Turns crawled pages into a [`HierarchyResult`] with one model call.
pub struct HierarchyExtractor<C> {
    service: C,
    config: ExtractorConfig,
    reporter: Arc<dyn ProgressReporter>,
}

impl<C: CompletionService> HierarchyExtractor<C> {
    pub fn new(service: C) -> Self {
        Self {
            service,
            config: ExtractorConfig::default(),
            reporter: Arc::new(NoopReporter),
        }
    }

    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Ask the model for the product hierarchy described by `pages`.
    ///
    /// A failed service call is returned as an error. A reply that is not
    /// valid JSON is reported through the reporter and yields an empty
    /// result instead.
    pub async fn extract(&self, pages: &[PageRecord], target_url: &str) -> Result<HierarchyResult> {
        let context = build_context(pages, self.config.char_budget);
        let prompt = build_prompt(target_url, &context);

        info!(
            pages = pages.len(),
            context_chars = context.chars().count(),
            "Requesting hierarchy extraction for {}",
            target_url
        );

        let reply = self.service.complete(&prompt).await?;
        let cleaned = strip_code_fences(&reply);

        match parse_hierarchy(&cleaned) {
            Ok(result) => {
                debug!(
                    modules = result.modules.len(),
                    features = result.feature_count(),
                    "Parsed hierarchy"
                );
                Ok(result)
            }
            Err(e) => {
                warn!("Model reply is not valid hierarchy JSON: {}", e);
                self.reporter
                    .on_error("Failed to parse JSON from AI response.");
                Ok(HierarchyResult::default())
            }
        }
    }
}

/// Parse a cleaned model reply. Only invalid JSON or a non-object top level
/// is an error; mistyped fields inside the object fall back to empty values.
pub fn parse_hierarchy(reply: &str) -> serde_json::Result<HierarchyResult> {
    let value: Value = serde_json::from_str(reply)?;
    if !value.is_object() {
        return Err(serde::de::Error::custom(format!(
            "expected a JSON object, found {}",
            json_kind(&value)
        )));
    }
    serde_json::from_value(value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Join the pages into one `SOURCE:`/`CONTENT:` document, cut to
/// `char_budget` characters.
pub fn build_context(pages: &[PageRecord], char_budget: usize) -> String {
    let joined = pages
        .iter()
        .map(PageRecord::as_context)
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR);

    truncate_chars(&joined, char_budget).to_string()
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn build_prompt(target_url: &str, documentation: &str) -> String {
    format!(
        r#"
You are an expert product analyst.

Analyze documentation from: {target_url}

Return ONLY valid JSON:
{{
  "product": "Product name",
  "overview": "Short overview",
  "modules": [
    {{
      "module_name": "Module name",
      "purpose": "Why it exists",
      "submodules": [
        {{
          "name": "Feature name",
          "details": "What it does"
        }}
      ]
    }}
  ]
}}

DOCUMENTATION:
{documentation}
"#
    )
}

/// Drop Markdown code-fence markers the model tends to wrap JSON in.
pub fn strip_code_fences(reply: &str) -> String {
    reply.replace("```json", "").replace("```", "").trim().to_string()
}
