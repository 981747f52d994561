//! Stage output types shared by every source.

use std::time::Duration;

/// Recency window accepted by source search endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeWindow {
    /// Wall-clock span of the window.
    pub fn duration(&self) -> Duration {
        const HOUR: u64 = 3_600;
        match self {
            TimeWindow::Hour => Duration::from_secs(HOUR),
            TimeWindow::Day => Duration::from_secs(24 * HOUR),
            TimeWindow::Week => Duration::from_secs(7 * 24 * HOUR),
            TimeWindow::Month => Duration::from_secs(30 * 24 * HOUR),
            TimeWindow::Year => Duration::from_secs(365 * 24 * HOUR),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
        }
    }
}

/// Statistics from a scanner run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub queries_executed: u32,
    pub queries_failed: u32,
    /// Records returned across all queries, before any filtering.
    pub total_found: u32,
    /// Records surviving dedup by source-native id.
    pub unique_after_dedup: u32,
    /// Records dropped by the engagement or recency thresholds.
    pub filtered_out: u32,
}

/// Scanner output: deduplicated raw records plus per-query error notes.
#[derive(Debug, Clone)]
pub struct ScanOutput<R> {
    pub records: Vec<R>,
    pub stats: ScanStats,
    /// Safe descriptions of non-fatal per-query failures.
    pub errors: Vec<String>,
}

impl<R> ScanOutput<R> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            stats: ScanStats::default(),
            errors: Vec::new(),
        }
    }
}

/// Harvester output: enriched records plus drop/failure counts.
///
/// Dropped records (upstream deleted, empty payload) are not failures;
/// failed records hit per-item network errors and were skipped.
#[derive(Debug, Clone)]
pub struct HarvestOutput<H> {
    pub records: Vec<H>,
    pub dropped: u32,
    pub failed: u32,
}

impl<H> HarvestOutput<H> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            dropped: 0,
            failed: 0,
        }
    }
}
