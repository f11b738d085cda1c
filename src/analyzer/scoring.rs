//! Baseline-minus-deductions scoring

use crate::domain::findings::Finding;

/// Lowest possible score
pub const MIN_SCORE: i64 = 0;
/// Highest possible score
pub const MAX_SCORE: i64 = 100;

/// Subtract every finding's deduction from the baseline and clamp to 0..=100
pub fn score(baseline: u32, findings: &[Finding]) -> u32 {
    let deducted: i64 = findings.iter().map(|f| i64::from(f.deduction)).sum();
    let raw = i64::from(baseline) - deducted;

    // Clamped value always fits
    raw.clamp(MIN_SCORE, MAX_SCORE) as u32
}
