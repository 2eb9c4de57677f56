use crate::error::{ConnectorError, ErrorKind};
use serde::Serialize;

/// Why one item of a write did not go through
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    /// Target id, absent for creates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub kind: ErrorKind,
    pub message: String,
}

impl ItemFailure {
    pub fn new(id: Option<&str>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            id: id.map(str::to_string),
            kind,
            message: message.into(),
        }
    }

    pub fn from_error(id: Option<&str>, err: &ConnectorError) -> Self {
        Self::new(id, err.kind(), err.to_string())
    }
}

/// Result of a write or batch of writes
///
/// `success` is true only when every item went through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    pub success: bool,
    pub affected_ids: Vec<String>,
    pub failures: Vec<ItemFailure>,
}

impl WriteOutcome {
    pub fn new() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self, id: String) {
        self.affected_ids.push(id);
    }

    pub fn record_failure(&mut self, failure: ItemFailure) {
        self.success = false;
        self.failures.push(failure);
    }

    /// Outcome of a single write
    pub fn single(id: Option<&str>, result: Result<String, ConnectorError>) -> Self {
        let mut outcome = Self::new();
        match result {
            Ok(affected) => outcome.record_success(affected),
            Err(err) => outcome.record_failure(ItemFailure::from_error(id, &err)),
        }
        outcome
    }
}
