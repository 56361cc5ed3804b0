//! Advisory History Storage
//!
//! Append-only log of advisory records over a sled embedded database, plus
//! aggregate statistics recomputed from the full record set.
//!
//! Key: timestamp in milliseconds shifted left 16 bits, OR-ed with a
//! process-local sequence counter in the low bits. Keys sort
//! chronologically and two appends within the same millisecond can never
//! collide, so concurrent appends are neither lost nor duplicated.
//! Value: JSON-serialized [`AdvisoryRecord`].
//!
//! Note: Does not call flush() on each write for performance. Sled provides
//! durability via background flushing; on crash at most the last few
//! appends may be lost, which the history contract tolerates.

use crate::types::{AdvisoryRecord, AdvisoryStatistics, AlertLevel};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Low bits of every key reserved for the same-millisecond sequence.
const SEQ_BITS: u64 = 16;
const SEQ_MASK: u64 = (1 << SEQ_BITS) - 1;

/// Error type for history operations
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("database error: {0}")]
    Database(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Append-only advisory history. Cheap to clone; clones share the same
/// underlying database.
#[derive(Clone)]
pub struct AdvisoryHistory {
    db: Arc<sled::Db>,
    seq: Arc<AtomicU64>,
}

impl AdvisoryHistory {
    /// Open or create the history store at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HistoryError> {
        let db = sled::open(path)?;
        Ok(Self {
            db: Arc::new(db),
            seq: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Open an in-memory store (tests, `--simulate` dry runs).
    pub fn open_temp() -> Result<Self, HistoryError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self {
            db: Arc::new(db),
            seq: Arc::new(AtomicU64::new(0)),
        })
    }

    fn next_key(&self, record: &AdvisoryRecord) -> [u8; 8] {
        let millis = u64::try_from(record.timestamp.timestamp_millis()).unwrap_or(0);
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) & SEQ_MASK;
        ((millis << SEQ_BITS) | seq).to_be_bytes()
    }

    /// Append one record. Callers in the advisory path log failures instead
    /// of propagating them; persistence must never fail an advisory
    /// response.
    pub fn append(&self, record: &AdvisoryRecord) -> Result<(), HistoryError> {
        let key = self.next_key(record);
        let value = serde_json::to_vec(record)?;
        self.db.insert(key, value)?;
        Ok(())
    }

    /// Most recent `limit` records, newest first.
    pub fn recent(&self, limit: usize) -> Vec<AdvisoryRecord> {
        let mut records = Vec::with_capacity(limit.min(self.db.len()));

        for item in self.db.iter().rev() {
            if records.len() >= limit {
                break;
            }
            if let Ok((_key, value)) = item {
                if let Ok(record) = serde_json::from_slice::<AdvisoryRecord>(&value) {
                    records.push(record);
                }
            }
        }

        records
    }

    /// Total number of stored records.
    pub fn count(&self) -> usize {
        self.db.len()
    }

    /// Aggregate statistics over the full stored set. Recomputed on every
    /// call; idempotent between appends.
    pub fn statistics(&self) -> AdvisoryStatistics {
        let mut stats = AdvisoryStatistics::default();
        let mut impact_sum = 0.0;
        let mut most_recent: Option<AlertLevel> = None;

        for item in self.db.iter() {
            let Ok((_key, value)) = item else { continue };
            let Ok(record) = serde_json::from_slice::<AdvisoryRecord>(&value) else {
                continue;
            };

            stats.total_advisories += 1;
            impact_sum += record.advisory.predicted_health_impact;
            stats.max_impact = stats.max_impact.max(record.advisory.predicted_health_impact);
            match record.advisory.alert_level {
                AlertLevel::Safe => stats.safe_count += 1,
                AlertLevel::Warning => stats.warning_count += 1,
                AlertLevel::Danger => stats.danger_count += 1,
            }
            // Iteration is key-ordered, so the last seen record is newest
            most_recent = Some(record.advisory.alert_level);
        }

        if stats.total_advisories > 0 {
            stats.mean_impact = impact_sum / stats.total_advisories as f64;
        }
        stats.most_recent_alert = most_recent;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AdviceOrigin, Advisory, Conditions, DeviceState};
    use chrono::{TimeZone, Utc};

    fn record(battery_temp: f64, impact: f64, level: AlertLevel, millis: i64) -> AdvisoryRecord {
        AdvisoryRecord {
            conditions: Conditions {
                battery_temp,
                ambient_temp: 25.0,
                device_state: DeviceState::Idle,
                battery_level: 75,
                cpu_temp: None,
            },
            advisory: Advisory {
                predicted_health_impact: impact,
                alert_level: level,
                advice_text: "test".to_string(),
                recommended_action: None,
                advice_source: AdviceOrigin::Fallback,
            },
            timestamp: Utc.timestamp_millis_opt(millis).single().unwrap(),
        }
    }

    #[test]
    fn test_append_and_recent_ordering() {
        let history = AdvisoryHistory::open_temp().unwrap();
        history
            .append(&record(30.0, 0.02, AlertLevel::Safe, 1_000))
            .unwrap();
        history
            .append(&record(50.0, 0.12, AlertLevel::Danger, 2_000))
            .unwrap();

        // query(limit=1) returns the newest record
        let recent = history.recent(1);
        assert_eq!(recent.len(), 1);
        assert!((recent[0].conditions.battery_temp - 50.0).abs() < 1e-9);

        let all = history.recent(50);
        assert_eq!(all.len(), 2);
        assert!((all[0].conditions.battery_temp - 50.0).abs() < 1e-9);
        assert!((all[1].conditions.battery_temp - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_millisecond_appends_not_lost() {
        let history = AdvisoryHistory::open_temp().unwrap();
        for i in 0..10 {
            history
                .append(&record(30.0 + f64::from(i), 0.02, AlertLevel::Safe, 1_000))
                .unwrap();
        }
        assert_eq!(history.count(), 10);
    }

    #[test]
    fn test_statistics() {
        let history = AdvisoryHistory::open_temp().unwrap();
        history
            .append(&record(30.0, 0.02, AlertLevel::Safe, 1_000))
            .unwrap();
        history
            .append(&record(42.0, 0.06, AlertLevel::Warning, 2_000))
            .unwrap();
        history
            .append(&record(50.0, 0.13, AlertLevel::Danger, 3_000))
            .unwrap();

        let stats = history.statistics();
        assert_eq!(stats.total_advisories, 3);
        assert!((stats.mean_impact - 0.07).abs() < 1e-9);
        assert!((stats.max_impact - 0.13).abs() < 1e-9);
        assert_eq!(stats.safe_count, 1);
        assert_eq!(stats.warning_count, 1);
        assert_eq!(stats.danger_count, 1);
        assert_eq!(stats.most_recent_alert, Some(AlertLevel::Danger));
    }

    #[test]
    fn test_statistics_idempotent() {
        let history = AdvisoryHistory::open_temp().unwrap();
        history
            .append(&record(42.0, 0.06, AlertLevel::Warning, 1_000))
            .unwrap();
        assert_eq!(history.statistics(), history.statistics());
    }

    #[test]
    fn test_empty_statistics() {
        let history = AdvisoryHistory::open_temp().unwrap();
        let stats = history.statistics();
        assert_eq!(stats.total_advisories, 0);
        assert!((stats.mean_impact - 0.0).abs() < f64::EPSILON);
        assert!(stats.most_recent_alert.is_none());
    }
}
