use crate::domain::error::ServiceError;
use crate::domain::model::TranslationResult;
use crate::domain::traits::LlmGateway;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Persona sent as the system message
pub const TRANSLATION_SYSTEM_PROMPT: &str = "You are a professional Chinese-English translator. \
Your task is to translate Chinese text to accurate, natural-sounding English. \
Additionally, extract 3-5 relevant keywords from the translated text.";

const TRANSLATION_PROMPT_TEMPLATE: &str = "Translate the following Chinese text to English \
and extract 3-5 relevant keywords.\n\n\
Please return the result in the following JSON format:\n\
{\n  \"translation\": \"<translated English text>\",\n  \
\"keywords\": [\"<keyword1>\", \"<keyword2>\", ...]\n}\n\n\
Chinese text to translate:\n";

const STUB_PREFIX_CHARS: usize = 50;
const FALLBACK_KEYWORD_LIMIT: usize = 5;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").expect("word pattern is valid"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "has", "have",
        "this", "with", "that", "were", "which", "their", "there", "from", "been", "more",
        "will", "would", "about",
    ]
    .into_iter()
    .collect()
});

/// Turns Chinese text into an English translation plus keywords
///
/// Partial or malformed model output is repaired locally; only a failed
/// gateway call is an error.
pub struct TranslationService {
    llm: Arc<dyn LlmGateway>,
}

impl TranslationService {
    pub fn new(llm: Arc<dyn LlmGateway>) -> Self {
        tracing::info!("Translation service initialized");
        Self { llm }
    }

    pub async fn translate(&self, text: &str) -> Result<TranslationResult, ServiceError> {
        if text.trim().is_empty() {
            tracing::error!("Validation error: text cannot be empty");
            return Err(ServiceError::internal("Text cannot be empty"));
        }

        tracing::info!(text_len = text.chars().count(), "Starting translation");

        let prompt = build_prompt(text);
        let structured = self
            .llm
            .generate_structured(&prompt, Some(TRANSLATION_SYSTEM_PROMPT))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, code = e.code(), "Translation failed");
                ServiceError::internal_from(format!("Failed to translate text: {}", e), &e)
            })?;

        let result = assemble_result(text, &structured);

        tracing::info!(
            translation_len = result.translation.chars().count(),
            keywords = result.keywords.len(),
            "Translation completed"
        );

        Ok(result)
    }

    /// Translate several texts in order, one at a time.
    ///
    /// A failing item becomes `(stub, [])`; it never aborts the batch.
    pub async fn batch_translate(&self, texts: &[String]) -> Vec<TranslationResult> {
        let total = texts.len();
        let mut results = Vec::with_capacity(total);
        for (i, text) in texts.iter().enumerate() {
            tracing::info!(item = i + 1, total, "Processing batch translation");
            match self.translate(text).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!(item = i + 1, error = %e, "Failed to translate batch item");
                    results.push(TranslationResult::new(fallback_translation(text), Vec::new()));
                }
            }
        }
        results
    }
}

/// Embed the input text into the instruction template
pub fn build_prompt(text: &str) -> String {
    let mut prompt = String::with_capacity(TRANSLATION_PROMPT_TEMPLATE.len() + text.len());
    prompt.push_str(TRANSLATION_PROMPT_TEMPLATE);
    prompt.push_str(text);
    prompt
}

/// Apply both fallbacks and keyword normalisation to the model payload
fn assemble_result(text: &str, structured: &Map<String, Value>) -> TranslationResult {
    let mut translation = structured
        .get("translation")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    let mut keywords: Vec<String> = match structured.get("keywords") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    if translation.is_empty() {
        tracing::warn!("LLM returned empty translation, using fallback");
        translation = fallback_translation(text);
    }

    if keywords.is_empty() {
        tracing::warn!("LLM returned empty keywords, extracting from translation");
        keywords = extract_keywords(&translation);
    }

    TranslationResult::new(translation, normalize_keywords(keywords))
}

/// Deterministic stand-in used when no translation is available
pub fn fallback_translation(text: &str) -> String {
    let prefix: String = text.chars().take(STUB_PREFIX_CHARS).collect();
    format!("[Translation unavailable for: {}...]", prefix)
}

/// Frequency-based keywords: the 5 most common non-stop words of 3+ letters.
///
/// Ties keep first-occurrence order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for word in WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| !STOP_WORDS.contains(*w))
    {
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    // sort_by is stable, so equal counts stay in first-seen order
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    let keywords: Vec<String> = order
        .into_iter()
        .take(FALLBACK_KEYWORD_LIMIT)
        .map(str::to_string)
        .collect();

    tracing::debug!(?keywords, "Extracted keywords using fallback");
    keywords
}

/// Trim, lowercase, drop empties and de-duplicate keeping first occurrence
pub fn normalize_keywords<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;

    /// Gateway double returning canned structured results in order
    struct StubGateway {
        responses: Mutex<Vec<Result<Value, ServiceError>>>,
        prompts: Mutex<Vec<(String, Option<String>)>>,
    }

    impl StubGateway {
        fn new(responses: Vec<Result<Value, ServiceError>>) -> Arc<Self> {
            let mut responses = responses;
            responses.reverse();
            Arc::new(Self {
                responses: Mutex::new(responses),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn returning(value: Value) -> Arc<Self> {
            Self::new(vec![Ok(value)])
        }
    }

    #[async_trait]
    impl LlmGateway for StubGateway {
        async fn generate_text(
            &self,
            _prompt: &str,
            _system_prompt: Option<&str>,
        ) -> Result<String, ServiceError> {
            Err(ServiceError::internal("not used"))
        }

        async fn generate_structured(
            &self,
            prompt: &str,
            system_prompt: Option<&str>,
        ) -> Result<Map<String, Value>, ServiceError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), system_prompt.map(str::to_string)));
            match self.responses.lock().unwrap().pop() {
                Some(Ok(Value::Object(map))) => Ok(map),
                Some(Ok(_)) => Ok(Map::new()),
                Some(Err(e)) => Err(e),
                None => Err(ServiceError::llm_service("exhausted", "stub", "no response")),
            }
        }
    }

    fn service(gateway: Arc<StubGateway>) -> TranslationService {
        TranslationService::new(gateway)
    }

    #[tokio::test]
    async fn test_translate_success() {
        let gateway = StubGateway::returning(json!({
            "translation": "Hello World",
            "keywords": ["hello", "world"]
        }));
        let result = service(gateway.clone()).translate("你好世界").await.unwrap();

        assert_eq!(result.translation, "Hello World");
        assert_eq!(result.keywords, vec!["hello", "world"]);

        let prompts = gateway.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].0.ends_with("Chinese text to translate:\n你好世界"));
        assert_eq!(prompts[0].1.as_deref(), Some(TRANSLATION_SYSTEM_PROMPT));
    }

    #[tokio::test]
    async fn test_translate_rejects_blank_text() {
        for text in ["", "   ", "\n\t"] {
            let gateway = StubGateway::new(vec![]);
            let err = service(gateway.clone()).translate(text).await.unwrap_err();
            assert!(matches!(err, ServiceError::Internal(_)));
            assert!(gateway.prompts.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_translate_downgrades_gateway_error() {
        let gateway = StubGateway::new(vec![Err(ServiceError::llm_service(
            "Failed to generate response from LLM",
            "qwen",
            "timeout",
        ))]);
        let err = service(gateway).translate("你好世界").await.unwrap_err();

        assert!(matches!(err, ServiceError::Internal(_)));
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert!(err.message().starts_with("Failed to translate text:"));
        assert_eq!(
            err.details()["original_error"],
            "Failed to generate response from LLM"
        );
    }

    #[tokio::test]
    async fn test_translate_empty_translation_fallback() {
        let gateway = StubGateway::returning(json!({
            "translation": "",
            "keywords": ["hello", "world"]
        }));
        let result = service(gateway).translate("你好世界").await.unwrap();

        assert_eq!(result.translation, "[Translation unavailable for: 你好世界...]");
        assert_eq!(result.keywords, vec!["hello", "world"]);
    }

    #[tokio::test]
    async fn test_translate_empty_keywords_fallback() {
        let gateway = StubGateway::returning(json!({
            "translation": "Hello World",
            "keywords": []
        }));
        let result = service(gateway).translate("你好世界").await.unwrap();

        assert_eq!(result.translation, "Hello World");
        assert_eq!(result.keywords, vec!["hello", "world"]);
    }

    #[tokio::test]
    async fn test_translate_missing_keys_uses_both_fallbacks() {
        let gateway = StubGateway::returning(json!({"unexpected": true}));
        let result = service(gateway).translate("你好世界").await.unwrap();

        assert_eq!(result.translation, "[Translation unavailable for: 你好世界...]");
        assert_eq!(result.keywords, vec!["translation", "unavailable"]);
    }

    #[tokio::test]
    async fn test_translate_keyword_cleanup() {
        let gateway = StubGateway::returning(json!({
            "translation": "  Hello World  ",
            "keywords": [" hello ", "world", "", "  "]
        }));
        let result = service(gateway).translate("你好世界").await.unwrap();

        assert_eq!(result.translation, "Hello World");
        assert_eq!(result.keywords, vec!["hello", "world"]);
    }

    #[tokio::test]
    async fn test_translate_keyword_deduplication() {
        let gateway = StubGateway::returning(json!({
            "translation": "Hello World",
            "keywords": ["hello", "world", "Hello", "hello"]
        }));
        let result = service(gateway).translate("你好世界").await.unwrap();
        assert_eq!(result.keywords, vec!["hello", "world"]);
    }

    #[tokio::test]
    async fn test_translate_ignores_non_string_values() {
        let gateway = StubGateway::returning(json!({
            "translation": 42,
            "keywords": ["ok", 7, null]
        }));
        let result = service(gateway).translate("数字").await.unwrap();
        assert_eq!(result.translation, "[Translation unavailable for: 数字...]");
        assert_eq!(result.keywords, vec!["ok"]);
    }

    #[tokio::test]
    async fn test_batch_translate_preserves_order_on_failure() {
        let gateway = StubGateway::new(vec![
            Ok(json!({"translation": "Hello", "keywords": ["hello"]})),
            Err(ServiceError::llm_service("boom", "qwen", "503")),
        ]);
        let texts = vec!["你好".to_string(), "世界".to_string()];
        let results = service(gateway).batch_translate(&texts).await;

        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0],
            TranslationResult::new("Hello".to_string(), vec!["hello".to_string()])
        );
        assert_eq!(
            results[1],
            TranslationResult::new("[Translation unavailable for: 世界...]".to_string(), vec![])
        );
    }

    #[tokio::test]
    async fn test_batch_translate_blank_item_gets_stub() {
        let gateway = StubGateway::new(vec![Ok(json!({"translation": "Hi", "keywords": ["hi"]}))]);
        let texts = vec!["  ".to_string(), "嗨".to_string()];
        let results = service(gateway).batch_translate(&texts).await;

        assert_eq!(results[0].translation, "[Translation unavailable for:   ...]");
        assert!(results[0].keywords.is_empty());
        assert_eq!(results[1].translation, "Hi");
    }

    #[test]
    fn test_fallback_translation_truncates_to_50_chars() {
        let text = "测".repeat(60);
        let stub = fallback_translation(&text);
        assert_eq!(
            stub,
            format!("[Translation unavailable for: {}...]", "测".repeat(50))
        );
    }

    #[test]
    fn test_extract_keywords_frequency_and_ties() {
        let text =
            "Rust code compiles. The rust compiler checks code, and code runs fast with zero cost";
        let keywords = extract_keywords(text);
        // code x3, rust x2, then first-seen order among singletons
        assert_eq!(
            keywords,
            vec!["code", "rust", "compiles", "compiler", "checks"]
        );
    }

    #[test]
    fn test_extract_keywords_drops_stop_words_and_short_words() {
        let keywords = extract_keywords("The cat and the dog are not here with you, ok?");
        assert_eq!(keywords, vec!["cat", "dog", "here"]);
    }

    #[test]
    fn test_extract_keywords_ignores_non_ascii_words() {
        assert!(extract_keywords("你好世界").is_empty());
        assert_eq!(extract_keywords("café naïve world"), vec!["world"]);
    }

    #[test]
    fn test_normalize_keywords() {
        assert_eq!(
            normalize_keywords([" hello ", "world", "", "  "]),
            vec!["hello", "world"]
        );
        assert_eq!(
            normalize_keywords(["hello", "world", "hello", "hello"]),
            vec!["hello", "world"]
        );
        assert_eq!(
            normalize_keywords(["MACHINE Learning", "machine learning "]),
            vec!["machine learning"]
        );
    }

    #[test]
    fn test_build_prompt_embeds_text() {
        let prompt = build_prompt("今天天气很好");
        assert!(prompt.contains("\"translation\": \"<translated English text>\""));
        assert!(prompt.ends_with("今天天气很好"));
    }
}
