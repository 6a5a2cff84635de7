//! Solver configuration types.

use super::error::SolverError;

/// Default tolerance when deciding whether a value is integral.
pub const DEFAULT_INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Configuration options for solver behavior.
///
/// This struct provides a unified way to configure solver parameters
/// across different solver backends. Backends ignore options they cannot
/// honor and log that at `debug`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverConfig {
    /// Time limit in seconds. `None` means no limit; so does a limit too
    /// large to represent as a [`std::time::Duration`].
    ///
    /// Backends without a native limit stop waiting when it expires but
    /// cannot interrupt the search, which keeps running in the background
    /// until it finishes on its own.
    pub time_limit: Option<f64>,
    /// Relative MIP gap tolerance. `None` uses solver default.
    pub mip_gap: Option<f64>,
    /// Number of threads to use. `None` uses solver default.
    pub threads: Option<u32>,
    /// Enable/disable presolve. `None` uses solver default.
    pub presolve: Option<bool>,
    /// Integrality tolerance. `None` uses [`DEFAULT_INTEGRALITY_TOLERANCE`].
    pub integrality_tolerance: Option<f64>,
    /// Log solver output to console. `None` uses solver default.
    pub log_to_console: Option<bool>,
}

impl SolverConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Set the relative MIP gap tolerance.
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    /// Set the number of threads.
    pub fn with_threads(mut self, count: u32) -> Self {
        self.threads = Some(count);
        self
    }

    /// Enable or disable presolve.
    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = Some(enabled);
        self
    }

    /// Set the integrality tolerance.
    pub fn with_integrality_tolerance(mut self, tol: f64) -> Self {
        self.integrality_tolerance = Some(tol);
        self
    }

    /// Enable or disable console logging.
    pub fn with_log_to_console(mut self, enabled: bool) -> Self {
        self.log_to_console = Some(enabled);
        self
    }

    /// Integrality tolerance with the default applied.
    pub fn integrality_tolerance_or_default(&self) -> f64 {
        self.integrality_tolerance
            .unwrap_or(DEFAULT_INTEGRALITY_TOLERANCE)
    }

    /// Reject values no backend can honor: NaN or negative limits and
    /// tolerances.
    pub fn validate(&self) -> Result<(), SolverError> {
        let checks = [
            ("time_limit", self.time_limit),
            ("mip_gap", self.mip_gap),
            ("integrality_tolerance", self.integrality_tolerance),
        ];
        for (option, value) in checks {
            let Some(value) = value else { continue };
            if value.is_nan() || value < 0.0 {
                return Err(SolverError::InvalidConfig(format!(
                    "{option} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.mip_gap.is_some_and(f64::is_infinite) {
            return Err(SolverError::InvalidConfig(
                "mip_gap must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Check if this configuration is completely empty (all defaults).
    pub fn is_empty(&self) -> bool {
        self.time_limit.is_none()
            && self.mip_gap.is_none()
            && self.threads.is_none()
            && self.presolve.is_none()
            && self.integrality_tolerance.is_none()
            && self.log_to_console.is_none()
    }
}
