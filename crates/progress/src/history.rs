//! Progress history - read-only views over a goal's records.

use std::sync::Arc;
use chrono::NaiveDate;
use goaltrack_core::{GoalId, OwnerKey, Progress, ProgressPayload, Time};
use goaltrack_storage::OwnerStore;
use serde::Serialize;
use tracing::{debug, warn};

/// Reads goal histories from an [`OwnerStore`]. Never writes.
#[derive(Clone)]
pub struct HistoryAggregator {
    storage: Arc<dyn OwnerStore>,
}

impl HistoryAggregator {
    /// Create a new aggregator.
    pub fn new(storage: Arc<dyn OwnerStore>) -> Self {
        Self { storage }
    }

    /// The goal's records in insertion order.
    ///
    /// Empty when the owner or goal does not exist or storage fails.
    pub async fn progress_history(&self, owner: &OwnerKey, goal_id: &GoalId) -> Vec<Progress> {
        let record = match self.storage.load_owner(owner).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("No owner {}, empty history for goal {}", owner, goal_id);
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to load owner {}: {}", owner, e);
                return Vec::new();
            }
        };

        let Some(goal) = record.goals.into_iter().find(|g| &g.id == goal_id) else {
            debug!("No goal {} for owner {}, empty history", goal_id, owner);
            return Vec::new();
        };

        if let Err(e) = goal.check_history() {
            warn!("Goal {} has an inconsistent history: {}", goal_id, e);
        }

        goal.progress_history
    }
}

/// Display line for a record's payload.
pub fn render_value(payload: &ProgressPayload) -> String {
    match payload {
        ProgressPayload::Binary { completed: true } => "✅ completed".to_string(),
        ProgressPayload::Binary { completed: false } => "❌ not completed".to_string(),
        ProgressPayload::Quantitative { value } => format!("value: {}", value),
        ProgressPayload::TimeBased { actual_time, deviation, .. } => {
            format!("actual: {} (deviation: {})", actual_time, deviation)
        }
    }
}

/// A record prepared for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// Calendar day of the event (UTC)
    pub date: NaiveDate,
    /// Rendered payload
    pub value: String,
    /// Notes, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&Progress> for HistoryEntry {
    fn from(record: &Progress) -> Self {
        Self {
            date: record.date.date_naive(),
            value: render_value(&record.payload),
            notes: record.notes.clone(),
        }
    }
}

impl std::fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  {}", self.date, self.value)?;
        if let Some(notes) = &self.notes {
            write!(f, "  ({})", notes)?;
        }
        Ok(())
    }
}

/// Render records one by one, keeping their order.
pub fn render_history(records: &[Progress]) -> Vec<HistoryEntry> {
    records.iter().map(HistoryEntry::from).collect()
}

/// Aggregate figures over a goal's history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    /// Number of records
    pub records: usize,
    /// Creation time of the first record
    pub first_recorded: Option<Time>,
    /// Creation time of the last record
    pub last_recorded: Option<Time>,
    /// Completed binary records
    pub completions: usize,
    /// Value of the last quantitative record
    pub latest_value: Option<f64>,
    /// Time-based records within tolerance
    pub hits: usize,
    /// Time-based records outside tolerance
    pub misses: usize,
    /// Smallest time-based deviation
    pub best_deviation: Option<u64>,
}

impl HistorySummary {
    /// Share of time-based records within tolerance, `None` without any.
    pub fn success_rate(&self) -> Option<f64> {
        let attempts = self.hits + self.misses;
        (attempts > 0).then(|| self.hits as f64 / attempts as f64)
    }
}

impl std::fmt::Display for HistorySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.records == 0 {
            return f.write_str("no progress recorded");
        }
        write!(f, "{} record(s)", self.records)?;
        if self.completions > 0 {
            write!(f, ", {} completed", self.completions)?;
        }
        if let Some(value) = self.latest_value {
            write!(f, ", latest value {}", value)?;
        }
        if let Some(rate) = self.success_rate() {
            write!(
                f,
                ", {}/{} on target ({:.0}%)",
                self.hits,
                self.hits + self.misses,
                rate * 100.0
            )?;
        }
        if let Some(best) = self.best_deviation {
            write!(f, ", best deviation {}", best)?;
        }
        Ok(())
    }
}

/// Summarize records in insertion order.
pub fn summarize(records: &[Progress]) -> HistorySummary {
    let mut summary = HistorySummary {
        records: records.len(),
        first_recorded: records.first().map(|r| r.created_at),
        last_recorded: records.last().map(|r| r.created_at),
        ..Default::default()
    };

    for record in records {
        match &record.payload {
            ProgressPayload::Binary { completed } => {
                if *completed {
                    summary.completions += 1;
                }
            }
            ProgressPayload::Quantitative { value } => summary.latest_value = Some(*value),
            ProgressPayload::TimeBased { deviation, success, .. } => {
                if *success {
                    summary.hits += 1;
                } else {
                    summary.misses += 1;
                }
                summary.best_deviation = Some(
                    summary.best_deviation.map_or(*deviation, |best| best.min(*deviation)),
                );
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use goaltrack_core::{Goal, OwnerRecord, TimeSubtype};
    use goaltrack_storage::MemoryStorage;

    fn at(hour: u32) -> Time {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn timed(goal: &Goal, actual: &str, deviation: u64, success: bool, when: Time) -> Progress {
        Progress::new(
            goal.id.clone(),
            ProgressPayload::TimeBased {
                actual_time: actual.to_string(),
                deviation,
                success,
            },
            when,
            None,
        )
    }

    fn store_with(goal: Goal) -> Arc<MemoryStorage> {
        let mut owner = OwnerRecord::new("alice");
        owner.add_goal(goal);
        Arc::new(MemoryStorage::with_owners([owner]))
    }

    #[tokio::test]
    async fn test_history_keeps_insertion_order() {
        let mut goal = Goal::time_based("Wake up", "", "07:00", TimeSubtype::ClockTime, None);
        // Later event first: order must follow insertion, not `date`.
        let late = timed(&goal, "07:30", 30, false, at(9));
        let early = timed(&goal, "07:05", 5, true, at(8));
        goal.append_progress(late.clone()).unwrap();
        goal.append_progress(early.clone()).unwrap();
        let id = goal.id.clone();
        let aggregator = HistoryAggregator::new(store_with(goal));

        let history = aggregator.progress_history(&OwnerKey::new("alice"), &id).await;
        assert_eq!(history, vec![late, early]);
    }

    #[tokio::test]
    async fn test_empty_and_missing_histories() {
        let goal = Goal::binary("Meditate", "");
        let id = goal.id.clone();
        let aggregator = HistoryAggregator::new(store_with(goal));

        assert!(aggregator.progress_history(&OwnerKey::new("alice"), &id).await.is_empty());
        assert!(aggregator.progress_history(&OwnerKey::new("alice"), &GoalId::new()).await.is_empty());
        assert!(aggregator.progress_history(&OwnerKey::new("bob"), &id).await.is_empty());
        assert!(aggregator.progress_history(&OwnerKey::new(""), &id).await.is_empty());
    }

    #[tokio::test]
    async fn test_reading_twice_is_stable() {
        let mut goal = Goal::quantitative("Read", "", "pages");
        let record = Progress::new(goal.id.clone(), ProgressPayload::Quantitative { value: 3.0 }, at(8), None);
        goal.append_progress(record).unwrap();
        let id = goal.id.clone();
        let storage = store_with(goal);
        let before = storage.load_owner(&OwnerKey::new("alice")).await.unwrap();
        let aggregator = HistoryAggregator::new(storage.clone());

        let first = aggregator.progress_history(&OwnerKey::new("alice"), &id).await;
        let second = aggregator.progress_history(&OwnerKey::new("alice"), &id).await;

        assert_eq!(first, second);
        assert_eq!(storage.load_owner(&OwnerKey::new("alice")).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_history_of_stored_goal_with_timestamp_ids() {
        let owner: OwnerRecord = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "goals": [{
                "id": "1712345678901",
                "type": "BINARY",
                "title": "Stretch",
                "description": "",
                "categoryId": "",
                "deadline": "",
                "priority": "",
                "progressHistory": [{
                    "id": "1712345679000",
                    "goalId": "1712345678901",
                    "date": "2024-04-05T19:34:39.000Z",
                    "createdAt": "2024-04-05T19:34:39.000Z",
                    "type": "BINARY",
                    "completed": true,
                    "notes": "morning"
                }]
            }]
        }))
        .unwrap();
        let aggregator = HistoryAggregator::new(Arc::new(MemoryStorage::with_owners([owner])));
        let id: GoalId = "1712345678901".parse().unwrap();

        let history = aggregator.progress_history(&OwnerKey::new("alice"), &id).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id.as_str(), "1712345679000");

        let entries = render_history(&history);
        assert_eq!(entries[0].to_string(), "2024-04-05  ✅ completed  (morning)");
        assert_eq!(summarize(&history).completions, 1);
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&ProgressPayload::Binary { completed: true }), "✅ completed");
        assert_eq!(render_value(&ProgressPayload::Binary { completed: false }), "❌ not completed");
        assert_eq!(render_value(&ProgressPayload::Quantitative { value: 12.0 }), "value: 12");
        assert_eq!(render_value(&ProgressPayload::Quantitative { value: 2.5 }), "value: 2.5");
        assert_eq!(
            render_value(&ProgressPayload::TimeBased {
                actual_time: "09:10".to_string(),
                deviation: 10,
                success: true,
            }),
            "actual: 09:10 (deviation: 10)"
        );
    }

    #[test]
    fn test_history_entry_display() {
        let goal = Goal::binary("Meditate", "");
        let record = Progress::new(
            goal.id.clone(),
            ProgressPayload::Binary { completed: true },
            at(8),
            Some("ten minutes".to_string()),
        );
        let entries = render_history(&[record]);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(entries[0].to_string(), "2024-03-01  ✅ completed  (ten minutes)");
    }

    #[test]
    fn test_summarize_time_based() {
        let goal = Goal::time_based("Wake up", "", "07:00", TimeSubtype::ClockTime, None);
        let records = vec![
            timed(&goal, "07:30", 30, false, at(8)),
            timed(&goal, "07:05", 5, true, at(8) + Duration::days(1)),
            timed(&goal, "07:10", 10, true, at(8) + Duration::days(2)),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.records, 3);
        assert_eq!(summary.hits, 2);
        assert_eq!(summary.misses, 1);
        assert_eq!(summary.best_deviation, Some(5));
        assert_eq!(summary.first_recorded, Some(at(8)));
        assert_eq!(summary.last_recorded, Some(at(8) + Duration::days(2)));
        assert!((summary.success_rate().unwrap() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            summary.to_string(),
            "3 record(s), 2/3 on target (67%), best deviation 5"
        );
    }

    #[test]
    fn test_summarize_quantitative_uses_last_inserted() {
        let goal = Goal::quantitative("Read", "", "pages");
        let records = vec![
            Progress::new(goal.id.clone(), ProgressPayload::Quantitative { value: 40.0 }, at(9), None),
            Progress::new(goal.id.clone(), ProgressPayload::Quantitative { value: 25.0 }, at(8), None),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.latest_value, Some(25.0));
        assert_eq!(summary.success_rate(), None);
        assert_eq!(summary.to_string(), "2 record(s), latest value 25");
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary, HistorySummary::default());
        assert_eq!(summary.to_string(), "no progress recorded");
    }
}
