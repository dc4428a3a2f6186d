//! Helpful error types for CLI commands
//!
//! Every error includes what went wrong and, where possible, how to fix it.

use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    /// Create a new helpful error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a suggestion for fixing the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add multiple suggestions
    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// Input file does not exist
    pub fn file_not_found(path: &Path) -> Self {
        Self::new(format!("File not found: {}", path.display()))
            .with_context("The specified file does not exist")
            .with_suggestions([
                format!("TRY: Check if the file exists: ls -la {}", path.display()),
                "TRY: Check for typos in the path".to_string(),
            ])
    }

    /// Input file is not valid JSON
    pub fn invalid_json(path: &Path, err: &serde_json::Error) -> Self {
        Self::new(format!("Invalid JSON in {}", path.display()))
            .with_context(format!("line {}, column {}: {}", err.line(), err.column(), err))
            .with_suggestion(format!("TRY: Validate the file: python3 -m json.tool {}", path.display()))
    }

    /// Engine configuration file failed to parse
    pub fn invalid_config(path: &Path, err: &toml::de::Error) -> Self {
        Self::new(format!("Invalid configuration in {}", path.display()))
            .with_context(err.to_string())
            .with_suggestion("TRY: Run 'decision-schema config' without --config to see the defaults")
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR: {}", self.message)?;
        if let Some(ref context) = self.context {
            write!(f, "\n\n{}", context)?;
        }
        for suggestion in &self.suggestions {
            write!(f, "\n{}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_suggestions() {
        let err = HelpfulError::file_not_found(Path::new("/tmp/missing.json"));
        let rendered = err.to_string();
        assert!(rendered.starts_with("ERROR: File not found: /tmp/missing.json"));
        assert!(rendered.contains("TRY: Check if the file exists"));
        assert_eq!(err.suggestions.len(), 2);
    }

    #[test]
    fn test_with_suggestions_appends_in_order() {
        let err = HelpfulError::new("boom")
            .with_suggestion("first")
            .with_suggestions(["second", "third"]);
        assert_eq!(err.suggestions, vec!["first", "second", "third"]);
        assert_eq!(err.to_string(), "ERROR: boom\nfirst\nsecond\nthird");
    }
}
