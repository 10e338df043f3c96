use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// The source did not parse. Nothing was executed.
    #[strum(serialize = "SyntaxError")]
    Syntax,

    /// A value was thrown while the program was running.
    #[strum(serialize = "RuntimeError")]
    Runtime,

    /// The engine stopped evaluation (runtime limit, oversized source, ...).
    #[strum(serialize = "Aborted")]
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

/// What a single evaluation produced.
///
/// `captured_output` always holds the lines emitted before evaluation ended,
/// whether it ended normally or with a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOutcome {
    pub captured_output: String,
    pub failure: Option<Failure>,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl ExecutionOutcome {
    pub fn completed(lines: &[String]) -> Self {
        Self {
            captured_output: lines.join("\n"),
            failure: None,
        }
    }

    pub fn failed(lines: &[String], failure: Failure) -> Self {
        Self {
            captured_output: lines.join("\n"),
            failure: Some(failure),
        }
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self::failed(&[], Failure::new(FailureKind::Aborted, message))
    }

    pub fn failure_message(&self) -> Option<&str> {
        self.failure.as_ref().map(|f| f.message.as_str())
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(|f| f.kind)
    }
}
