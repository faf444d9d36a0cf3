//! # Overview Panel
//!
//! Aggregate view of the capture: status class counts, transfer totals,
//! and the list of failed requests. Picking a failure hands the shell an
//! [`Anchor`] to resolve against the requests panel, the same path any
//! link into the capture takes.

use crossterm::event::KeyEvent;
use std::sync::Arc;

use crate::record::{Anchor, Record};
use crate::ui::panel::{Panel, PanelId, ScrollRegion, StatusBarItem};

/// Totals shown in the summary block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrafficSummary {
    pub total: usize,
    pub ok: usize,
    pub redirect: usize,
    pub client_error: usize,
    pub server_error: usize,
    /// Requests that never completed.
    pub failed: usize,
    pub total_bytes: i64,
    pub total_time_ms: f64,
}

pub struct OverviewPanel {
    summary: TrafficSummary,
    /// Failed request URLs in capture order. Kept as URLs rather than
    /// ids so revealing one goes through anchor resolution.
    failures: Vec<String>,
    /// URL and duration of the slowest request, first wins on a tie.
    slowest: Option<(String, f64)>,
    selected: usize,
}

impl OverviewPanel {
    pub fn new(records: &[Arc<Record>]) -> Self {
        let (summary, failures, slowest) = compute(records);
        Self {
            summary,
            failures,
            slowest,
            selected: 0,
        }
    }

    /// Recompute from the current records, e.g. after the grid was
    /// cleared.
    pub fn refresh(&mut self, records: &[Arc<Record>]) {
        let (summary, failures, slowest) = compute(records);
        self.summary = summary;
        self.failures = failures;
        self.slowest = slowest;
        if self.selected >= self.failures.len() {
            self.selected = self.failures.len().saturating_sub(1);
        }
    }

    pub fn summary(&self) -> TrafficSummary {
        self.summary
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn slowest(&self) -> Option<(&str, f64)> {
        self.slowest.as_ref().map(|(url, ms)| (url.as_str(), *ms))
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if !self.failures.is_empty() {
            self.selected = (self.selected + 1) % self.failures.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.failures.is_empty() {
            self.selected = if self.selected == 0 {
                self.failures.len() - 1
            } else {
                self.selected - 1
            };
        }
    }

    /// Anchor for the highlighted failure, ready for the shell to
    /// resolve.
    pub fn anchor_for_selected(&self) -> Option<Anchor> {
        self.failures
            .get(self.selected)
            .map(|url| Anchor::for_href(url))
    }
}

fn compute(records: &[Arc<Record>]) -> (TrafficSummary, Vec<String>, Option<(String, f64)>) {
    let mut summary = TrafficSummary::default();
    let mut failures = Vec::new();
    let mut slowest: Option<(String, f64)> = None;

    for record in records {
        summary.total += 1;
        match record.status {
            0 => summary.failed += 1,
            s if s >= 500 => summary.server_error += 1,
            s if s >= 400 => summary.client_error += 1,
            s if s >= 300 => summary.redirect += 1,
            _ => summary.ok += 1,
        }
        if record.response_size > 0 {
            summary.total_bytes += record.response_size;
        }
        summary.total_time_ms += record.duration_ms;
        if record.is_failure() {
            failures.push(record.url.clone());
        }
        if slowest.as_ref().is_none_or(|(_, ms)| record.duration_ms > *ms) {
            slowest = Some((record.url.clone(), record.duration_ms));
        }
    }

    (summary, failures, slowest)
}

impl Panel for OverviewPanel {
    fn id(&self) -> PanelId {
        PanelId::Overview
    }

    fn handle_shortcut(&mut self, _key: &KeyEvent) -> bool {
        false
    }

    fn status_bar_items(&self) -> Vec<StatusBarItem> {
        vec![
            StatusBarItem {
                key: "j/k",
                label: "move",
            },
            StatusBarItem {
                key: "Enter",
                label: "reveal",
            },
        ]
    }

    fn scroll_restore_regions(&self) -> Vec<ScrollRegion> {
        vec![ScrollRegion::FailureList]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Timings;
    use chrono::Utc;

    fn make_record(id: &str, url: &str, status: u16, size: i64) -> Arc<Record> {
        Arc::new(Record {
            id: id.to_string(),
            url: url.to_string(),
            method: "GET".to_string(),
            status,
            status_text: String::new(),
            mime_type: "text/html".to_string(),
            started_at: Utc::now(),
            duration_ms: 25.0,
            request_headers: Vec::new(),
            response_headers: Vec::new(),
            response_body: None,
            response_size: size,
            timings: Timings::default(),
        })
    }

    fn sample() -> Vec<Arc<Record>> {
        vec![
            make_record("r1", "https://a.example/", 200, 1000),
            make_record("r2", "https://a.example/old", 301, 0),
            make_record("r3", "https://a.example/missing", 404, 50),
            make_record("r4", "https://a.example/boom", 500, 80),
            make_record("r5", "https://a.example/hang", 0, -1),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let panel = OverviewPanel::new(&sample());
        let summary = panel.summary();

        assert_eq!(summary.total, 5);
        assert_eq!(summary.ok, 1);
        assert_eq!(summary.redirect, 1);
        assert_eq!(summary.client_error, 1);
        assert_eq!(summary.server_error, 1);
        assert_eq!(summary.failed, 1);
        // Unknown (-1) and zero sizes are not counted.
        assert_eq!(summary.total_bytes, 1130);
        assert_eq!(summary.total_time_ms, 125.0);
    }

    #[test]
    fn test_slowest_request() {
        let timed = |id: &str, url: &str, duration_ms: f64| {
            let mut record = (*make_record(id, url, 200, 10)).clone();
            record.duration_ms = duration_ms;
            Arc::new(record)
        };

        let panel = OverviewPanel::new(&[
            timed("r1", "https://a.example/fast", 12.0),
            timed("r2", "https://a.example/slow", 740.0),
            timed("r3", "https://a.example/mid", 95.0),
        ]);

        assert_eq!(panel.slowest(), Some(("https://a.example/slow", 740.0)));
    }

    #[test]
    fn test_slowest_tie_keeps_first() {
        let panel = OverviewPanel::new(&sample());
        // All sample records share one duration, so the earliest wins.
        assert_eq!(panel.slowest(), Some(("https://a.example/", 25.0)));
    }

    #[test]
    fn test_failures_in_capture_order() {
        let panel = OverviewPanel::new(&sample());
        assert_eq!(
            panel.failures(),
            &[
                "https://a.example/missing".to_string(),
                "https://a.example/boom".to_string(),
                "https://a.example/hang".to_string(),
            ]
        );
    }

    #[test]
    fn test_anchor_for_selected_failure() {
        let mut panel = OverviewPanel::new(&sample());
        panel.select_next();

        let anchor = panel.anchor_for_selected().unwrap();
        assert!(anchor.request_id.is_none());
        assert_eq!(anchor.href.as_deref(), Some("https://a.example/boom"));
    }

    #[test]
    fn test_no_anchor_without_failures() {
        let panel = OverviewPanel::new(&[make_record("r1", "https://a.example/", 200, 10)]);
        assert!(panel.anchor_for_selected().is_none());
    }

    #[test]
    fn test_selection_wraps() {
        let mut panel = OverviewPanel::new(&sample());
        panel.select_previous();
        assert_eq!(panel.selected(), 2);
        panel.select_next();
        assert_eq!(panel.selected(), 0);
    }

    #[test]
    fn test_refresh_after_clear() {
        let mut panel = OverviewPanel::new(&sample());
        panel.select_previous();

        panel.refresh(&[]);

        assert_eq!(panel.summary().total, 0);
        assert!(panel.failures().is_empty());
        assert!(panel.slowest().is_none());
        assert_eq!(panel.selected(), 0);
        assert!(panel.anchor_for_selected().is_none());
    }
}
