//! Degradation tracking for a year build.
//!
//! Every fallback path notes a human-readable reason here; the final
//! response carries `quality` plus the reason list so callers can detect
//! reduced precision without parsing logs.

use tracing::warn;

/// Collects approximation reasons during a request.
#[derive(Debug, Default, Clone)]
pub struct QualityLog {
    reasons: Vec<String>,
    approx: bool,
    fast: bool,
}

impl QualityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an approximate fallback with its reason. Deduplicated.
    pub fn note_approx(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(%reason, "approximate fallback used");
        self.approx = true;
        if !self.reasons.contains(&reason) {
            self.reasons.push(reason);
        }
    }

    /// Mark the build as a reduced-detail fast build.
    pub fn note_fast(&mut self) {
        self.fast = true;
    }

    pub fn is_approx(&self) -> bool {
        self.approx
    }

    /// Overall quality: approx beats fast beats full.
    pub fn quality(&self) -> &'static str {
        if self.approx {
            "approx"
        } else if self.fast {
            "fast"
        } else {
            "full"
        }
    }

    /// Reasons, synthesizing one if approx was flagged without any.
    pub fn reasons(&self) -> Vec<String> {
        if self.approx && self.reasons.is_empty() {
            vec!["approximate values substituted for unavailable exact data".to_string()]
        } else {
            self.reasons.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_by_default() {
        let q = QualityLog::new();
        assert_eq!(q.quality(), "full");
        assert!(q.reasons().is_empty());
    }

    #[test]
    fn approx_wins_over_fast() {
        let mut q = QualityLog::new();
        q.note_fast();
        assert_eq!(q.quality(), "fast");
        q.note_approx("noaa sunset used");
        assert_eq!(q.quality(), "approx");
    }

    #[test]
    fn reasons_deduplicated() {
        let mut q = QualityLog::new();
        q.note_approx("x");
        q.note_approx("x");
        assert_eq!(q.reasons().len(), 1);
    }

    #[test]
    fn approx_always_has_a_reason() {
        let mut q = QualityLog::new();
        q.approx = true;
        assert_eq!(q.reasons().len(), 1);
    }
}
