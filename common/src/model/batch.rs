//! The result of folding a recipient roster through the generation
//! pipeline. Rows are processed strictly in order; a failing row is
//! recorded here and the batch continues.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFailure {
    /// 1-based row number in the uploaded roster (excluding the header).
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<RowFailure>,
    /// Verification ids of the records written, in row order.
    pub record_ids: Vec<String>,
}

impl BatchReport {
    pub fn new(total: usize) -> Self {
        BatchReport {
            total,
            succeeded: 0,
            failed: 0,
            failures: Vec::new(),
            record_ids: Vec::new(),
        }
    }

    pub fn record_success(&mut self, record_id: String) {
        self.succeeded += 1;
        self.record_ids.push(record_id);
    }

    pub fn record_failure(&mut self, row: usize, message: impl Into<String>) {
        self.failed += 1;
        self.failures.push(RowFailure {
            row,
            message: message.into(),
        });
    }

    /// Rows processed so far, successful or not.
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn summary(&self) -> String {
        if self.failed == 0 {
            format!("Batch complete: {} certificates generated", self.succeeded)
        } else {
            format!(
                "Batch complete: {} generated, {} failed",
                self.succeeded, self.failed
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_both_outcomes() {
        let mut report = BatchReport::new(3);
        report.record_success("a".to_string());
        report.record_failure(2, "asset missing");
        report.record_success("c".to_string());
        assert_eq!(report.processed(), 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].row, 2);
        assert_eq!(report.record_ids, vec!["a", "c"]);
        assert_eq!(report.summary(), "Batch complete: 2 generated, 1 failed");
    }
}
