use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Lua,
    JavaScript,
    TypeScript,
    Tsx,
}

impl Language {
    /// Resolve a file extension, with or without its leading `.`.
    ///
    /// Matching is case-sensitive: `.TS` is not a TypeScript file.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.strip_prefix('.').unwrap_or(ext) {
            "lua" => Some(Language::Lua),
            "js" | "jsx" => Some(Language::JavaScript),
            "ts" => Some(Language::TypeScript),
            "tsx" => Some(Language::Tsx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Resolve a language identifier as returned by [`Language::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|lang| lang.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Lua => "lua",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
        }
    }

    pub fn file_extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Lua => &["lua"],
            Language::JavaScript => &["js", "jsx"],
            Language::TypeScript => &["ts"],
            Language::Tsx => &["tsx"],
        }
    }

    pub fn all() -> &'static [Language] {
        &[
            Language::Lua,
            Language::JavaScript,
            Language::TypeScript,
            Language::Tsx,
        ]
    }

    fn grammar(&self) -> tree_sitter::Language {
        match self {
            Language::Lua => tree_sitter_lua::LANGUAGE.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One tree-sitter parser per supported language.
pub struct LanguageSupport {
    parsers: HashMap<Language, tree_sitter::Parser>,
}

impl LanguageSupport {
    pub fn new() -> Result<Self, ParseError> {
        let mut parsers = HashMap::new();

        for &lang in Language::all() {
            Self::add_parser(&mut parsers, lang, lang.grammar())?;
        }

        debug!("Loaded {} tree-sitter grammars", parsers.len());
        Ok(Self { parsers })
    }

    fn add_parser(
        parsers: &mut HashMap<Language, tree_sitter::Parser>,
        lang: Language,
        grammar: tree_sitter::Language,
    ) -> Result<(), ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&grammar)
            .map_err(|e| ParseError::Grammar {
                language: lang.name(),
                message: e.to_string(),
            })?;
        parsers.insert(lang, parser);
        Ok(())
    }

    /// Parse `source` into a syntax tree.
    ///
    /// Invalid input still yields a tree; tree-sitter marks the broken spans
    /// with `ERROR` and `MISSING` nodes instead of failing.
    pub fn parse(
        &mut self,
        lang: Language,
        source: &[u8],
    ) -> Result<tree_sitter::Tree, ParseError> {
        let parser = self
            .parsers
            .get_mut(&lang)
            .ok_or_else(|| ParseError::LanguageUnsupported(lang.name().to_string()))?;

        parser
            .parse(source, None)
            .ok_or(ParseError::ParseFailure {
                language: lang.name(),
            })
    }

    /// Parse using a language identifier such as `"typescript"`.
    pub fn parse_named(
        &mut self,
        name: &str,
        source: &[u8],
    ) -> Result<tree_sitter::Tree, ParseError> {
        let lang = Language::from_name(name)
            .ok_or_else(|| ParseError::LanguageUnsupported(name.to_string()))?;
        self.parse(lang, source)
    }
}

// No Default impl: loading a grammar can fail on an ABI mismatch.
