use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset};
use tracing::{info, warn};

use crate::models::{ContestSummary, HasId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContestStatus {
    Upcoming,
    Ongoing,
    Ended,
}

impl ContestStatus {
    pub fn at(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        now: DateTime<FixedOffset>,
    ) -> Self {
        if now < start {
            ContestStatus::Upcoming
        } else if now < end {
            ContestStatus::Ongoing
        } else {
            ContestStatus::Ended
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContestStatus::Upcoming => "Upcoming",
            ContestStatus::Ongoing => "Live",
            ContestStatus::Ended => "Ended",
        }
    }

    fn listing_rank(self) -> u8 {
        match self {
            ContestStatus::Ongoing => 0,
            ContestStatus::Upcoming => 1,
            ContestStatus::Ended => 2,
        }
    }
}

impl ContestSummary {
    pub fn status(&self, now: DateTime<FixedOffset>) -> ContestStatus {
        ContestStatus::at(self.start_time, self.end_time, now)
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Countdown text for the listing row.
    pub fn time_label(&self, now: DateTime<FixedOffset>) -> String {
        match self.status(now) {
            ContestStatus::Upcoming => {
                format!("Starts in {}", format_span(self.start_time - now))
            }
            ContestStatus::Ongoing => format!("Ends in {}", format_span(self.end_time - now)),
            ContestStatus::Ended => "Ended".to_string(),
        }
    }
}

/// Two most significant units out of days, hours and minutes.
pub fn format_span(span: Duration) -> String {
    let total_minutes = span.num_minutes().max(0);
    if total_minutes == 0 {
        return "<1m".to_string();
    }

    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    let parts: Vec<String> = [(days, "d"), (hours, "h"), (minutes, "m")]
        .into_iter()
        .skip_while(|(value, _)| *value == 0)
        .take(2)
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect();
    parts.join(" ")
}

/// Live contests first (ending soonest), then upcoming (starting soonest),
/// then finished ones (most recent first).
pub fn sort_for_listing(contests: &mut [ContestSummary], now: DateTime<FixedOffset>) {
    contests.sort_by(|a, b| {
        let (sa, sb) = (a.status(now), b.status(now));
        sa.listing_rank()
            .cmp(&sb.listing_rank())
            .then_with(|| match sa {
                ContestStatus::Ongoing => a.end_time.cmp(&b.end_time),
                ContestStatus::Upcoming => a.start_time.cmp(&b.start_time),
                ContestStatus::Ended => b.end_time.cmp(&a.end_time),
            })
            .then_with(|| a.id.cmp(&b.id))
    });
}

pub fn count_by_status(
    contests: &[ContestSummary],
    now: DateTime<FixedOffset>,
) -> HashMap<ContestStatus, usize> {
    let mut counts = HashMap::new();
    for contest in contests {
        *counts.entry(contest.status(now)).or_insert(0) += 1;
    }
    counts
}

/// Parses a JSON array of contests. Later duplicates replace earlier ones;
/// contests that end before they start are dropped with a warning.
pub fn parse_contests(raw: &str) -> Result<(Vec<ContestSummary>, Vec<String>)> {
    let parsed: Vec<ContestSummary> =
        serde_json::from_str(raw).context("contest list is not a JSON array of contests")?;

    let mut warnings = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();
    let mut contests: Vec<ContestSummary> = Vec::with_capacity(parsed.len());

    for contest in parsed {
        if contest.end_time <= contest.start_time {
            let warning = format!(
                "Skipping contest {}: end time {} is not after start time {}",
                contest.id(),
                contest.end_time,
                contest.start_time
            );
            warn!("{warning}");
            warnings.push(warning);
            continue;
        }

        match by_id.get(contest.id()) {
            Some(&index) => {
                warn!("Updating existing contest {}", contest.id());
                contests[index] = contest;
            }
            None => {
                by_id.insert(contest.id().to_string(), contests.len());
                contests.push(contest);
            }
        }
    }

    Ok((contests, warnings))
}

pub fn load_contests(path: &Path) -> Result<(Vec<ContestSummary>, Vec<String>)> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read contest file {}", path.display()))?;
    let (contests, warnings) = parse_contests(&raw)
        .with_context(|| format!("failed to parse contest file {}", path.display()))?;
    info!(
        "Loaded {} contests from {} ({} skipped)",
        contests.len(),
        path.display(),
        warnings.len()
    );
    Ok((contests, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn contest(id: &str, start: &str, end: &str) -> ContestSummary {
        ContestSummary {
            id: id.to_string(),
            title: format!("Contest {id}"),
            description: None,
            start_time: ts(start),
            end_time: ts(end),
            problem_ids: Vec::new(),
        }
    }

    #[test]
    fn status_follows_timestamps() {
        let c = contest("a", "2026-03-01T10:00:00Z", "2026-03-01T12:00:00Z");
        assert_eq!(c.status(ts("2026-03-01T09:59:59Z")), ContestStatus::Upcoming);
        assert_eq!(c.status(ts("2026-03-01T10:00:00Z")), ContestStatus::Ongoing);
        assert_eq!(c.status(ts("2026-03-01T11:59:59Z")), ContestStatus::Ongoing);
        assert_eq!(c.status(ts("2026-03-01T12:00:00Z")), ContestStatus::Ended);
    }

    #[test]
    fn status_respects_offsets() {
        let c = contest("a", "2026-03-01T10:00:00+02:00", "2026-03-01T12:00:00+02:00");
        assert_eq!(c.status(ts("2026-03-01T08:30:00Z")), ContestStatus::Ongoing);
    }

    #[test]
    fn spans_show_two_largest_units() {
        assert_eq!(format_span(Duration::days(2) + Duration::hours(3)), "2d 3h");
        assert_eq!(
            format_span(Duration::days(1) + Duration::minutes(5)),
            "1d"
        );
        assert_eq!(format_span(Duration::minutes(45)), "45m");
        assert_eq!(format_span(Duration::minutes(61)), "1h 1m");
        assert_eq!(format_span(Duration::seconds(30)), "<1m");
        assert_eq!(format_span(Duration::seconds(-30)), "<1m");
    }

    #[test]
    fn time_labels_match_status() {
        let c = contest("a", "2026-03-01T10:00:00Z", "2026-03-01T12:00:00Z");
        assert_eq!(c.time_label(ts("2026-02-27T07:00:00Z")), "Starts in 2d 3h");
        assert_eq!(c.time_label(ts("2026-03-01T11:15:00Z")), "Ends in 45m");
        assert_eq!(c.time_label(ts("2026-03-02T00:00:00Z")), "Ended");
    }

    #[test]
    fn listing_puts_live_first_then_upcoming_then_recent() {
        let now = ts("2026-03-10T12:00:00Z");
        let mut contests = vec![
            contest("old", "2026-01-01T00:00:00Z", "2026-01-01T02:00:00Z"),
            contest("later", "2026-03-20T00:00:00Z", "2026-03-20T02:00:00Z"),
            contest("live-long", "2026-03-10T10:00:00Z", "2026-03-10T18:00:00Z"),
            contest("recent", "2026-03-09T00:00:00Z", "2026-03-09T02:00:00Z"),
            contest("soon", "2026-03-11T00:00:00Z", "2026-03-11T02:00:00Z"),
            contest("live-short", "2026-03-10T11:00:00Z", "2026-03-10T13:00:00Z"),
        ];
        sort_for_listing(&mut contests, now);
        let order: Vec<&str> = contests.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            order,
            vec!["live-short", "live-long", "soon", "later", "recent", "old"]
        );

        let counts = count_by_status(&contests, now);
        assert_eq!(counts.get(&ContestStatus::Ongoing), Some(&2));
        assert_eq!(counts.get(&ContestStatus::Upcoming), Some(&2));
        assert_eq!(counts.get(&ContestStatus::Ended), Some(&2));
    }

    #[test]
    fn parse_skips_inverted_and_replaces_duplicates() {
        let raw = r#"[
            {"id": "w1", "title": "Weekly 1", "start_time": "2026-03-01T10:00:00Z", "end_time": "2026-03-01T12:00:00Z"},
            {"id": "bad", "title": "Broken", "start_time": "2026-03-01T10:00:00Z", "end_time": "2026-03-01T10:00:00Z"},
            {"id": "w1", "title": "Weekly 1 (rescheduled)", "start_time": "2026-03-02T10:00:00Z", "end_time": "2026-03-02T12:00:00Z", "problem_ids": ["p1", "p2"]}
        ]"#;
        let (contests, warnings) = parse_contests(raw).unwrap();
        assert_eq!(contests.len(), 1);
        assert_eq!(contests[0].title, "Weekly 1 (rescheduled)");
        assert_eq!(contests[0].problem_ids, vec!["p1", "p2"]);
        assert_eq!(contests[0].duration(), Duration::hours(2));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("bad"));
    }

    #[test]
    fn parse_rejects_non_array() {
        assert!(parse_contests(r#"{"id": "x"}"#).is_err());
    }
}
