use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::trace;
use uuid::Uuid;

/// Default number of records kept in the history window
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Lifecycle state of a logged trade attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeStatus {
    /// Attempt is queued but not yet submitted
    Pending,

    /// Buy submitted, awaiting the fill
    Buying,

    /// Buy filled
    Bought,

    /// Sell submitted, awaiting the fill
    Selling,

    /// Sell filled
    Success,

    /// Attempt failed
    Error,
}

impl TradeStatus {
    /// Whether this status ends a trade attempt
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TradeStatus::Bought | TradeStatus::Success | TradeStatus::Error
        )
    }

    /// Whether this status ends a trade attempt successfully
    pub fn is_success(&self) -> bool {
        matches!(self, TradeStatus::Bought | TradeStatus::Success)
    }
}

/// One append-only entry in the trade log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Id linking the entries of one logical trade attempt
    pub attempt_id: Uuid,

    /// Token mint address
    pub mint: Pubkey,

    /// Token symbol
    pub symbol: String,

    /// Lifecycle state at the time of the entry
    pub status: TradeStatus,

    /// Human-readable details
    pub details: String,

    /// When the entry was appended
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    /// Build an entry stamped with the current time
    pub fn now(
        attempt_id: Uuid,
        mint: Pubkey,
        symbol: &str,
        status: TradeStatus,
        details: String,
    ) -> Self {
        Self {
            attempt_id,
            mint,
            symbol: symbol.to_string(),
            status,
            details,
            timestamp: Utc::now(),
        }
    }

    fn dedup_key(&self) -> (Pubkey, TradeStatus, DateTime<Utc>) {
        (self.mint, self.status, self.timestamp)
    }
}

/// Time-ordered, deduplicated trade log capped to a window.
///
/// Entries are deduplicated by `(mint, status, timestamp)` so overlapping
/// refresh calls converge instead of appending duplicates. Terminal
/// entries feed lifetime attempt/success counters that survive window
/// eviction.
pub struct TransactionHistory {
    inner: Mutex<HistoryInner>,
    limit: usize,
    attempts: AtomicU64,
    successes: AtomicU64,
}

struct HistoryInner {
    records: VecDeque<TransactionRecord>,
    seen: HashSet<(Pubkey, TradeStatus, DateTime<Utc>)>,
}

impl TransactionHistory {
    /// Create a history with the default window
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a history capped to `limit` records
    pub fn with_limit(limit: usize) -> Self {
        Self {
            inner: Mutex::new(HistoryInner {
                records: VecDeque::new(),
                seen: HashSet::new(),
            }),
            limit: limit.max(1),
            attempts: AtomicU64::new(0),
            successes: AtomicU64::new(0),
        }
    }

    /// Append a record unless an identical one is already present.
    /// Returns whether the record was new.
    pub fn record(&self, record: TransactionRecord) -> bool {
        let mut inner = self.inner.lock();
        if !inner.seen.insert(record.dedup_key()) {
            trace!(mint = %record.mint, status = ?record.status, "duplicate trade record dropped");
            return false;
        }

        if record.status.is_terminal() {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if record.status.is_success() {
                self.successes.fetch_add(1, Ordering::SeqCst);
            }
        }

        inner.records.push_back(record);
        while inner.records.len() > self.limit {
            if let Some(evicted) = inner.records.pop_front() {
                inner.seen.remove(&evicted.dedup_key());
            }
        }
        true
    }

    /// Merge a batch of records, skipping any already present. Returns
    /// how many were actually new.
    pub fn merge(&self, batch: impl IntoIterator<Item = TransactionRecord>) -> usize {
        batch
            .into_iter()
            .filter(|record| self.record(record.clone()))
            .count()
    }

    /// Snapshot of the window, newest first
    pub fn snapshot(&self) -> Vec<TransactionRecord> {
        let inner = self.inner.lock();
        inner.records.iter().rev().cloned().collect()
    }

    /// Completed trade attempts over the history's lifetime
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Successfully completed trade attempts over the history's lifetime
    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::SeqCst)
    }

    /// Successful trades over total attempts, 0.0 when nothing completed
    pub fn success_rate(&self) -> f64 {
        let attempts = self.attempts();
        if attempts == 0 {
            return 0.0;
        }
        self.successes() as f64 / attempts as f64
    }

    /// Number of records currently in the window
    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    /// Whether the window is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().records.is_empty()
    }
}

impl Default for TransactionHistory {
    fn default() -> Self {
        Self::new()
    }
}
