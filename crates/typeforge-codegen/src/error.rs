//! Error types and batch error reporting for file assembly
//!
//! Unresolved symbols are not fatal one at a time: assembly walks every file,
//! collects each miss into a [`BatchErrors`] and reports them together.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use typeforge_core::{CoreError, PipelineError};

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Invalid output pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Path collision at '{path}': '{first}' and '{second}'")]
    PathCollision {
        path: String,
        first: String,
        second: String,
    },

    #[error("'{name}' in '{path}' is not reachable from '{root}'")]
    Unreachable {
        name: String,
        path: String,
        root: String,
    },

    #[error("Index files re-export each other in a cycle through '{0}'")]
    IndexCycle(String),

    #[error("Batch errors ({count} total):\n{summary}")]
    Batch { count: usize, summary: String },
}

impl CodegenError {
    pub fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        CodegenError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    /// The categorized core error, when there is one underneath
    pub fn core_error(&self) -> Option<&CoreError> {
        match self {
            CodegenError::Core(e) => Some(e),
            CodegenError::Pipeline(e) => Some(e.core_error()),
            _ => None,
        }
    }
}

pub type CodegenResult<T> = Result<T, CodegenError>;

/// Location context for where an error occurred
#[derive(Debug, Clone, Default)]
pub struct ErrorLocation {
    /// Output file (e.g., "user/user.model.ts")
    pub file: Option<String>,
    /// Declaration name (e.g., "UserWhereInput")
    pub type_name: Option<String>,
    /// Field name (e.g., "posts")
    pub field: Option<String>,
}

impl ErrorLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn in_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, &self.type_name, &self.field) {
            (Some(p), Some(t), Some(field)) => write!(f, "{}:{}.{}", p, t, field),
            (Some(p), Some(t), None) => write!(f, "{}:{}", p, t),
            (Some(p), None, Some(field)) => write!(f, "{}:.{}", p, field),
            (Some(p), None, None) => write!(f, "{}", p),
            (None, Some(t), Some(field)) => write!(f, "{}.{}", t, field),
            (None, Some(t), None) => write!(f, "{}", t),
            (None, None, Some(field)) => write!(f, ".{}", field),
            (None, None, None) => write!(f, "<unknown location>"),
        }
    }
}

/// Category of error for better organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCategory {
    /// Referenced name is not declared in any file
    UnresolvedSymbol,
    /// An index re-exports a path that is not in the tree
    MissingTarget,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::UnresolvedSymbol => write!(f, "UNRESOLVED_SYMBOL"),
            ErrorCategory::MissingTarget => write!(f, "MISSING_TARGET"),
        }
    }
}

/// A single error entry in the batch
#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub category: ErrorCategory,
    pub location: ErrorLocation,
    pub message: String,
}

impl ErrorEntry {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            location: ErrorLocation::new(),
            message: message.into(),
        }
    }

    pub fn at(mut self, location: ErrorLocation) -> Self {
        self.location = location;
        self
    }

    pub fn unresolved_symbol(name: &str) -> Self {
        Self::new(
            ErrorCategory::UnresolvedSymbol,
            format!("'{}' is not declared in any output file", name),
        )
    }

    pub fn missing_target(path: &str) -> Self {
        Self::new(
            ErrorCategory::MissingTarget,
            format!("re-export target '{}' does not exist", path),
        )
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] at {}: {}", self.category, self.location, self.message)
    }
}

/// Batch error collector
///
/// ```
/// use typeforge_codegen::error::{BatchErrors, CodegenError, ErrorEntry};
///
/// let mut errors = BatchErrors::new();
/// errors.set_file_context("post/post.model.ts");
/// errors.add(ErrorEntry::unresolved_symbol("Author"));
///
/// let err: CodegenError = errors.into();
/// assert!(err.to_string().contains("Author"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchErrors {
    entries: Vec<ErrorEntry>,
    file_context: Option<String>,
    type_context: Option<String>,
}

impl BatchErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_file_context(&mut self, file: impl Into<String>) {
        self.file_context = Some(file.into());
    }

    pub fn set_type_context(&mut self, type_name: impl Into<String>) {
        self.type_context = Some(type_name.into());
    }

    pub fn clear_type_context(&mut self) {
        self.type_context = None;
    }

    /// Add an error, filling unset location parts from the current context
    pub fn add(&mut self, mut entry: ErrorEntry) {
        if entry.location.file.is_none() {
            entry.location.file = self.file_context.clone();
        }
        if entry.location.type_name.is_none() {
            entry.location.type_name = self.type_context.clone();
        }
        self.entries.push(entry);
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    /// `Err` with the whole batch when anything was collected
    pub fn into_result(self) -> CodegenResult<()> {
        if self.has_errors() {
            Err(self.into())
        } else {
            Ok(())
        }
    }

    /// Format errors as a summary report, grouped by category
    pub fn format_summary(&self) -> String {
        if self.entries.is_empty() {
            return "No errors".to_string();
        }

        let mut by_category: BTreeMap<ErrorCategory, Vec<&ErrorEntry>> = BTreeMap::new();
        for entry in &self.entries {
            by_category.entry(entry.category).or_default().push(entry);
        }

        let mut lines = Vec::new();
        lines.push(format!("Found {} error(s):", self.entries.len()));
        lines.push(String::new());

        for (category, entries) in by_category {
            lines.push(format!("## {} ({} errors):", category, entries.len()));
            for entry in entries.iter().take(10) {
                lines.push(format!("  - {}", entry));
            }
            if entries.len() > 10 {
                lines.push(format!("  ... and {} more", entries.len() - 10));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

impl From<BatchErrors> for CodegenError {
    fn from(errors: BatchErrors) -> Self {
        CodegenError::Batch {
            count: errors.count(),
            summary: errors.format_summary(),
        }
    }
}

impl fmt::Display for BatchErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_summary())
    }
}
