//! Snowflake style id generator for artifacts.
//!
//! Layout of the 63 usable bits, high to low: 41 bits of milliseconds since
//! [`EPOCH_MS`], 5 bits datacenter id, 5 bits worker id, 12 bits sequence.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::errors::ServiceError;

/// 2010-11-04T01:42:54.657Z
pub const EPOCH_MS: i64 = 1_288_834_974_657;

const WORKER_ID_BITS: u32 = 5;
const DATACENTER_ID_BITS: u32 = 5;
const SEQUENCE_BITS: u32 = 12;

pub const MAX_WORKER_ID: i64 = (1 << WORKER_ID_BITS) - 1;
pub const MAX_DATACENTER_ID: i64 = (1 << DATACENTER_ID_BITS) - 1;
const SEQUENCE_MASK: i64 = (1 << SEQUENCE_BITS) - 1;

/// Largest backwards clock step absorbed by waiting; anything bigger is an error.
pub const MAX_CLOCK_DRIFT_MS: i64 = 5;

const WORKER_ID_SHIFT: u32 = SEQUENCE_BITS;
const DATACENTER_ID_SHIFT: u32 = SEQUENCE_BITS + WORKER_ID_BITS;
const TIMESTAMP_SHIFT: u32 = SEQUENCE_BITS + WORKER_ID_BITS + DATACENTER_ID_BITS;

#[derive(Debug, Default)]
struct State {
    last_timestamp: i64,
    sequence: i64,
}

#[derive(Debug)]
pub struct IdWorker {
    worker_id: i64,
    datacenter_id: i64,
    state: Mutex<State>,
}

impl IdWorker {
    pub fn new(worker_id: i64, datacenter_id: i64) -> Result<Self, ServiceError> {
        if !(0..=MAX_WORKER_ID).contains(&worker_id) {
            return Err(ServiceError::Validation(format!("worker id must be within 0..={MAX_WORKER_ID}")));
        }
        if !(0..=MAX_DATACENTER_ID).contains(&datacenter_id) {
            return Err(ServiceError::Validation(format!("datacenter id must be within 0..={MAX_DATACENTER_ID}")));
        }
        Ok(Self { worker_id, datacenter_id, state: Mutex::new(State::default()) })
    }

    /// Next id; strictly greater than every id this worker returned before.
    ///
    /// Fails when the wall clock is more than [`MAX_CLOCK_DRIFT_MS`] behind the
    /// last issued timestamp, instead of blocking the caller until it catches up.
    pub fn next_id(&self) -> Result<i64, ServiceError> {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut now = current_millis();
        if now < state.last_timestamp {
            let drift = state.last_timestamp - now;
            if drift > MAX_CLOCK_DRIFT_MS {
                return Err(ServiceError::IdGeneration(format!("clock moved backwards by {drift} ms")));
            }
            now = wait_until(state.last_timestamp);
        }
        if now == state.last_timestamp {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // sequence exhausted within this millisecond
                now = wait_until(state.last_timestamp + 1);
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp = now;

        Ok(((now - EPOCH_MS) << TIMESTAMP_SHIFT)
            | (self.datacenter_id << DATACENTER_ID_SHIFT)
            | (self.worker_id << WORKER_ID_SHIFT)
            | state.sequence)
    }

    /// [`next_id`](Self::next_id) rendered as a decimal string, the form artifact ids are stored in.
    pub fn next_id_string(&self) -> Result<String, ServiceError> { self.next_id().map(|id| id.to_string()) }
}

impl Default for IdWorker {
    fn default() -> Self {
        Self { worker_id: 0, datacenter_id: 0, state: Mutex::new(State::default()) }
    }
}

fn current_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(EPOCH_MS)
}

/// Spin until the wall clock reaches at least `min_ms`. Callers bound the distance.
fn wait_until(min_ms: i64) -> i64 {
    let mut now = current_millis();
    while now < min_ms {
        std::thread::yield_now();
        now = current_millis();
    }
    now
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn ids_are_strictly_increasing() {
        let worker = IdWorker::new(1, 1).unwrap();
        let mut last = worker.next_id().unwrap();
        for _ in 0..10_000 {
            let id = worker.next_id().unwrap();
            assert!(id > last, "{id} <= {last}");
            last = id;
        }
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let worker = Arc::new(IdWorker::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let w = Arc::clone(&worker);
                std::thread::spawn(move || (0..2_000).map(|_| w.next_id().unwrap()).collect::<Vec<_>>())
            })
            .collect();
        let mut seen = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 8_000);
    }

    #[test]
    fn worker_and_datacenter_bits_are_embedded() {
        let worker = IdWorker::new(3, 7).unwrap();
        let id = worker.next_id().unwrap();
        assert_eq!((id >> WORKER_ID_SHIFT) & MAX_WORKER_ID, 3);
        assert_eq!((id >> DATACENTER_ID_SHIFT) & MAX_DATACENTER_ID, 7);
        assert!(id > 0);
    }

    #[test]
    fn out_of_range_ids_are_rejected() {
        assert!(IdWorker::new(32, 0).is_err());
        assert!(IdWorker::new(0, -1).is_err());
    }

    #[test]
    fn string_form_is_decimal() {
        let s = IdWorker::default().next_id_string().unwrap();
        assert!(s.chars().all(|c| c.is_ascii_digit()));
        assert!(s.len() >= 18);
    }

    #[test]
    fn large_clock_step_back_is_an_error() {
        let worker = IdWorker::default();
        worker.state.lock().unwrap().last_timestamp = current_millis() + 60_000;
        let err = worker.next_id().unwrap_err();
        assert!(matches!(err, ServiceError::IdGeneration(_)));
        assert!(err.to_string().contains("clock moved backwards"));
    }

    #[test]
    fn small_clock_step_back_is_absorbed() {
        let worker = IdWorker::default();
        let ahead = current_millis() + 2;
        worker.state.lock().unwrap().last_timestamp = ahead;
        let id = worker.next_id().unwrap();
        assert!((id >> TIMESTAMP_SHIFT) + EPOCH_MS >= ahead);
    }
}
