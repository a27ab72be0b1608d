use async_trait::async_trait;

/// Source language meaning "let the backend detect it".
pub const AUTO_SOURCE: &str = "auto";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslationError {
    /// The translation backend failed or rejected the input. Not retried.
    #[error("{0}")]
    Service(String),
}

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` (may be [`AUTO_SOURCE`]) into `target`.
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError>;

    /// Short provider name used in logs.
    fn provider(&self) -> &'static str;
}
