//! Compilation results and identities

use crate::entry::EntryType;

/// Identity of a source document, used only for compiler bookkeeping and
/// diagnostic locations; the service performs no file I/O on it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceDocument {
    path: String,
}

impl SourceDocument {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// One consumer-facing compiler message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationMessage {
    pub text: String,
}

/// Outcome of a compile call. Environment failures never appear here; they
/// surface as `ServiceError` on the call itself.
#[derive(Debug)]
pub enum CompilationResult {
    /// The source compiled and the entry type was resolved
    Success { entry: EntryType },
    /// The source did not compile
    Failure {
        /// The source text as submitted, for display alongside the messages
        source_text: String,
        /// Formatted error messages, in backend order
        messages: Vec<CompilationMessage>,
    },
}

impl CompilationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CompilationResult::Success { .. })
    }

    pub fn entry(&self) -> Option<&EntryType> {
        match self {
            CompilationResult::Success { entry } => Some(entry),
            CompilationResult::Failure { .. } => None,
        }
    }

    pub fn messages(&self) -> &[CompilationMessage] {
        match self {
            CompilationResult::Success { .. } => &[],
            CompilationResult::Failure { messages, .. } => messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_accessors() {
        let result = CompilationResult::Failure {
            source_text: "view X\nend\n".to_string(),
            messages: vec![CompilationMessage {
                text: "boom".to_string(),
            }],
        };
        assert!(!result.is_success());
        assert!(result.entry().is_none());
        assert_eq!(result.messages().len(), 1);
    }
}
