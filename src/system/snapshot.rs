use chrono::{DateTime, Local, SecondsFormat, TimeZone};

use super::aggregate::AggregateTotals;
use super::memory::{TotalMemory, estimate_mib};
use super::project::ProjectTable;
use crate::format::format_percent;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotRow {
    pub timestamp: String,
    pub host: String,
    pub user: String,
    pub project: String,
    pub command: String,
    pub cpu_percent: String,
    pub mem_mib: u64,
}

impl SnapshotRow {
    pub fn fields(&self) -> [String; 7] {
        [
            self.timestamp.clone(),
            self.host.clone(),
            self.user.clone(),
            self.project.clone(),
            self.command.clone(),
            self.cpu_percent.clone(),
            self.mem_mib.to_string(),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub timestamp: String,
    pub host: String,
    pub rows: Vec<SnapshotRow>,
}

/// Local wall-clock time with its numeric UTC offset,
/// e.g. `2026-10-18T09:15:02.123456+02:00`.
pub fn capture_timestamp() -> String {
    format_timestamp(&Local::now())
}

pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.to_rfc3339_opts(SecondsFormat::Micros, false)
}

pub fn build_rows(
    timestamp: &str,
    host: &str,
    totals: &AggregateTotals,
    projects: &ProjectTable,
    total_memory: TotalMemory,
) -> Vec<SnapshotRow> {
    totals
        .iter()
        .map(|(key, usage)| SnapshotRow {
            timestamp: timestamp.to_string(),
            host: host.to_string(),
            user: key.user.clone(),
            project: projects.project_for(&key.user).to_string(),
            command: key.command.clone(),
            cpu_percent: format_percent(usage.cpu_percent),
            mem_mib: estimate_mib(total_memory, usage.mem_percent),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;
    use crate::system::aggregate::{AggregateKey, Usage};

    fn totals() -> AggregateTotals {
        [
            (
                AggregateKey::new("bob", "chromium"),
                Usage {
                    cpu_percent: 20.0,
                    mem_percent: 30.0,
                },
            ),
            (
                AggregateKey::new("alice", "slack"),
                Usage {
                    cpu_percent: 10.04,
                    mem_percent: 5.0,
                },
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn rows_carry_project_and_memory() {
        let projects = ProjectTable::from_pairs([("bob".to_string(), "nn9999k".to_string())]);
        let rows = build_rows(
            "2026-10-18T09:00:00.000000+02:00",
            "c1-7",
            &totals(),
            &projects,
            TotalMemory::Known(1024 * 1024 * 1024),
        );

        assert_eq!(
            rows,
            vec![
                SnapshotRow {
                    timestamp: "2026-10-18T09:00:00.000000+02:00".into(),
                    host: "c1-7".into(),
                    user: "alice".into(),
                    project: "-".into(),
                    command: "slack".into(),
                    cpu_percent: "10.0".into(),
                    mem_mib: 51,
                },
                SnapshotRow {
                    timestamp: "2026-10-18T09:00:00.000000+02:00".into(),
                    host: "c1-7".into(),
                    user: "bob".into(),
                    project: "nn9999k".into(),
                    command: "chromium".into(),
                    cpu_percent: "20.0".into(),
                    mem_mib: 307,
                },
            ]
        );
    }

    #[test]
    fn unknown_memory_reports_zero_mib() {
        let rows = build_rows("t", "h", &totals(), &ProjectTable::empty(), TotalMemory::Unknown);
        assert!(rows.iter().all(|r| r.mem_mib == 0));
    }

    #[test]
    fn timestamp_uses_numeric_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let at = offset.with_ymd_and_hms(2026, 10, 18, 9, 15, 2).unwrap();
        assert_eq!(format_timestamp(&at), "2026-10-18T09:15:02.000000+02:00");

        let utc = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(&utc), "2026-01-01T00:00:00.000000+00:00");
    }

    #[test]
    fn captured_timestamp_has_fixed_width() {
        let ts = capture_timestamp();
        assert_eq!(ts.len(), 32, "{ts}");
        assert!(!ts.ends_with('Z'));
        let sign = ts.as_bytes()[26];
        assert!(sign == b'+' || sign == b'-');
    }
}
