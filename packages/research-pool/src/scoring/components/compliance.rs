//! Compliance adjustment, applied after the weighted average.
//!
//! COMPLIANT earns a +1 bonus (capped at 10), WARNING passes through
//! unchanged, REJECTED forces the final score to 0 regardless of every
//! other signal.

use crate::models::ComplianceStatus;

const COMPLIANT_BONUS: f64 = 1.0;
const MAX_SCORE: f64 = 10.0;
const MIN_SCORE: f64 = 0.0;

/// Outcome of the compliance adjustment calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceAdjustment {
    pub bonus: f64,
    pub is_rejected: bool,
    pub notes: &'static str,
}

/// Applies the non-linear compliance adjustment.
#[derive(Debug, Default)]
pub struct ComplianceAdjuster;

impl ComplianceAdjuster {
    pub fn new() -> Self {
        Self
    }

    pub fn adjust(&self, status: ComplianceStatus) -> ComplianceAdjustment {
        match status {
            ComplianceStatus::Compliant => ComplianceAdjustment {
                bonus: COMPLIANT_BONUS,
                is_rejected: false,
                notes: "COMPLIANT status: +1 bonus",
            },
            ComplianceStatus::Warning => ComplianceAdjustment {
                bonus: 0.0,
                is_rejected: false,
                notes: "WARNING status: no adjustment",
            },
            ComplianceStatus::Rejected => ComplianceAdjustment {
                bonus: 0.0,
                is_rejected: true,
                notes: "REJECTED status: score forced to 0",
            },
        }
    }

    pub fn apply(&self, base: f64, adjustment: &ComplianceAdjustment) -> f64 {
        if adjustment.is_rejected {
            return MIN_SCORE;
        }
        (base + adjustment.bonus).min(MAX_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compliant_gets_bonus_capped_at_ten() {
        let adjuster = ComplianceAdjuster::new();
        let adj = adjuster.adjust(ComplianceStatus::Compliant);
        assert_eq!(adjuster.apply(7.0, &adj), 8.0);
        assert_eq!(adjuster.apply(9.8, &adj), 10.0);
    }

    #[test]
    fn warning_passes_through() {
        let adjuster = ComplianceAdjuster::new();
        let adj = adjuster.adjust(ComplianceStatus::Warning);
        assert_eq!(adjuster.apply(6.3, &adj), 6.3);
    }

    #[test]
    fn rejected_dominates_everything() {
        let adjuster = ComplianceAdjuster::new();
        let adj = adjuster.adjust(ComplianceStatus::Rejected);
        assert_eq!(adjuster.apply(10.0, &adj), 0.0);
    }
}
