//! Provides definition for diagnostics, which are normally errors and
//! warnings associated with compilation.
//!
//! There exist crates that make this easy, but we need different
//! information for different integrations and there is no one crate that
//! does it all.
use ferroplc_problems::Problem;

use crate::core::{FileId, SourceSpan};

/// A position marker that only has an offset in a file.
#[derive(Debug, Clone)]
pub struct Location {
    /// Byte offset from start of string (0-indexed)
    pub start: usize,
    /// Byte offset from end of string (0-indexed)
    pub end: usize,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Location")
            .field("start", &self.start)
            .field("end", &self.end)
            .finish()
    }
}

/// A label that refers to some range in a file and possibly associated
/// with a message related to that range.
///
/// Normally this indicates the location of an error or warning along with
/// a text message describing that position.
#[derive(Debug, Clone)]
pub struct Label {
    /// The position of label.
    pub location: Location,

    /// Identifier for the file.
    pub file_id: FileId,

    /// A message describing this label.
    pub message: String,
}

impl Label {
    pub fn span(span: SourceSpan, message: impl Into<String>) -> Self {
        Self {
            location: Location {
                start: span.start,
                end: span.end,
            },
            file_id: span.file_id,
            message: message.into(),
        }
    }
}

/// A diagnostic. Diagnostics have a code that is indicative of the
/// category and a primary location.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// A normally unique value describing the type of diagnostic.
    pub code: String,

    description: String,

    /// The primary or first diagnostic.
    pub primary: Label,

    /// Additional descriptions to the constant description.
    pub described: Vec<String>,
}

impl Diagnostic {
    /// Creates a diagnostic from the problem code and with the specified
    /// label.
    ///
    /// The label associates the problem to a particular instance in
    /// IEC 61131-3 source file.
    pub fn problem(problem: Problem, primary: Label) -> Self {
        Self {
            code: problem.code().to_string(),
            description: problem.message().to_string(),
            primary,
            described: vec![],
        }
    }

    /// Adds to the problem description (primary text) additional context
    /// about the problem.
    ///
    /// This forms part of the main description and does not need to be
    /// related to a position in a source file.
    pub fn with_context(mut self, description: &str, item: &String) -> Self {
        self.described.push(format!("{}={}", description, item));
        self
    }

    /// Returns the description for the diagnostic. This may add in other
    /// data in addition that is part of the diagnostic.
    pub fn description(&self) -> String {
        if self.described.is_empty() {
            self.description.clone()
        } else {
            format!("{} ({})", self.description, self.described.join(", "))
        }
    }
}

impl From<Diagnostic> for () {
    fn from(_value: Diagnostic) -> Self {
        // Just drop the diagnostic!
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_when_context_then_appends_items() {
        let diagnostic = Diagnostic::problem(
            Problem::InvalidLiteral,
            Label::span(SourceSpan::default(), "Literal"),
        )
        .with_context("text", &String::from("1_2_"));

        assert!(diagnostic.description().contains("text=1_2_"));
    }

    #[test]
    fn problem_when_created_then_has_stable_code() {
        let diagnostic = Diagnostic::problem(
            Problem::NoContent,
            Label::span(SourceSpan::default(), "First location"),
        );
        assert_eq!(diagnostic.code, "P0001");
    }
}
