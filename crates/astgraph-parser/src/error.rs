use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no parser available for language: {0}")]
    LanguageUnsupported(String),
    #[error("failed to parse {language} source")]
    ParseFailure { language: &'static str },
    #[error("failed to load {language} grammar: {message}")]
    Grammar {
        language: &'static str,
        message: String,
    },
}
