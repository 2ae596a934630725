//! Workload metrics.

use std::collections::HashMap;

/// Operation acceptance metrics for a simulation run.
#[derive(Debug, Clone, Default)]
pub struct WorkloadMetrics {
    /// Total operations attempted.
    pub total_operations: u64,
    /// Accepted operations.
    pub accepted_operations: u64,
    /// Rejected operations.
    pub rejected_operations: u64,
    /// Rejections tallied by error code.
    rejections_by_code: HashMap<String, u64>,
}

impl WorkloadMetrics {
    /// Create new metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted operation.
    pub fn record_accepted(&mut self) {
        self.total_operations += 1;
        self.accepted_operations += 1;
    }

    /// Record a rejected operation.
    pub fn record_rejected(&mut self, code: &str) {
        self.total_operations += 1;
        self.rejected_operations += 1;
        *self.rejections_by_code.entry(code.to_string()).or_insert(0) += 1;
    }

    /// Get the rejection count for one error code.
    #[allow(dead_code)]
    pub fn rejections_for(&self, code: &str) -> u64 {
        self.rejections_by_code.get(code).copied().unwrap_or(0)
    }

    /// Get (code, count) pairs sorted by code, for reporting.
    pub fn rejection_breakdown(&self) -> Vec<(String, u64)> {
        let mut breakdown: Vec<_> = self
            .rejections_by_code
            .iter()
            .map(|(code, count)| (code.clone(), *count))
            .collect();
        breakdown.sort();
        breakdown
    }

    /// Get the acceptance rate.
    #[allow(dead_code)]
    pub fn acceptance_rate(&self) -> f64 {
        if self.total_operations == 0 {
            return 0.0;
        }

        self.accepted_operations as f64 / self.total_operations as f64
    }
}
