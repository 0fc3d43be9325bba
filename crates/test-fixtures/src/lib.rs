//! Shared test doubles for the thermal crates: an in-memory state provider,
//! a recording notification sender, a counting persistence callback, and
//! probe builders anchored to a fixed clock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Duration, TimeZone, Utc};
use thermal_core::errors::{ThermalError, ThermalResult};
use thermal_core::models::ProbeResult;
use thermal_core::traits::{EntityState, NotificationAction, NotificationSender, PersistCallback, StateProvider};

/// A fixed reference instant (2026-01-15 12:00:00 UTC, a Thursday).
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("fixture base time is ambiguous"))
}

/// `base_time()` on the same day at the given UTC wall-clock time.
pub fn at_hm(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, hour, minute, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid fixture time {hour}:{minute}"))
}

/// A completed probe finished `days_ago` days before `base_time()`.
pub fn probe_days_ago(days_ago: i64, tau: f64, confidence: f64, outdoor: Option<f64>) -> ProbeResult {
    ProbeResult::new(tau, confidence, 3600, 0.9, false)
        .with_timestamp(base_time() - Duration::days(days_ago))
        .with_outdoor_temp(outdoor)
}

/// A completed probe finished `hours_ago` hours before `now`.
pub fn probe_hours_before(now: DateTime<Utc>, hours_ago: i64, outdoor: Option<f64>) -> ProbeResult {
    ProbeResult::new(90.0, 0.8, 3600, 0.9, false)
        .with_timestamp(now - Duration::hours(hours_ago))
        .with_outdoor_temp(outdoor)
}

/// In-memory entity store.
#[derive(Default)]
pub struct FakeStateProvider {
    states: RwLock<HashMap<String, EntityState>>,
}

impl FakeStateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn set(&self, entity_id: &str, state: EntityState) {
        self.states
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(entity_id.to_string(), state);
    }

    pub fn set_state(&self, entity_id: &str, state: &str) {
        self.set(entity_id, EntityState::new(state));
    }

    pub fn set_weather(&self, entity_id: &str, temperature: f64) {
        self.set(entity_id, EntityState::new("cloudy").with_attribute("temperature", temperature));
    }

    pub fn remove(&self, entity_id: &str) {
        self.states.write().unwrap_or_else(|e| e.into_inner()).remove(entity_id);
    }
}

impl StateProvider for FakeStateProvider {
    fn get_state(&self, entity_id: &str) -> Option<EntityState> {
        self.states
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(entity_id)
            .cloned()
    }
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct SentNotification {
    pub title: String,
    pub message: String,
    pub persistent: bool,
    pub action_count: usize,
}

/// Notification sender that records every call, optionally failing each one.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentNotification>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl NotificationSender for RecordingNotifier {
    fn send(
        &self,
        title: &str,
        message: &str,
        persistent: bool,
        actions: Option<&[NotificationAction]>,
    ) -> ThermalResult<()> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).push(SentNotification {
            title: title.to_string(),
            message: message.to_string(),
            persistent,
            action_count: actions.map_or(0, <[NotificationAction]>::len),
        });
        if self.fail {
            return Err(ThermalError::NotificationFailed {
                reason: "notify service offline".to_string(),
            });
        }
        Ok(())
    }
}

/// A persistence callback plus the counter it bumps.
pub fn counting_persist_callback() -> (PersistCallback, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let callback: PersistCallback = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (callback, count)
}

/// Read the count recorded by [`counting_persist_callback`].
pub fn persist_count(count: &AtomicUsize) -> usize {
    count.load(Ordering::SeqCst)
}
