//! store.rs - latest-reading cache
//!
//! one slot per device id, last write wins. there is no history and no
//! eviction: an entry is only ever superseded by the next push from the
//! same meter, and everything is gone on restart (the meter re-pushes
//! within seconds, so losing state is fine).
//!
//! shared between the ingest handler (writes) and the read handler (reads)
//! as Arc<LatestStore>; whole-value replacement under the write lock keeps
//! every entry internally consistent for readers.

use crate::clock::Clock;
use crate::reading::{RawReading, Reading};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct LatestStore {
    clock: Arc<dyn Clock>,
    readings: RwLock<HashMap<String, Reading>>,
}

impl LatestStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            readings: RwLock::new(HashMap::new()),
        }
    }

    /// normalize and store a pushed payload, overwriting any prior entry
    /// for the same device. never fails; returns the stored form.
    pub async fn put(&self, raw: RawReading) -> Reading {
        let reading = Reading::from_raw(raw, self.clock.now_ms());
        let mut map = self.readings.write().await;
        map.insert(reading.device_id.clone(), reading.clone());
        reading
    }

    /// most recent reading for a device, if any was ever pushed
    pub async fn get(&self, device_id: &str) -> Option<Reading> {
        let map = self.readings.read().await;
        map.get(device_id).cloned()
    }
}
