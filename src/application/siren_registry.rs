//! Siren registry - owns active sirens and their expiry timers.
//!
//! # Lifecycle
//!
//! ```text
//! activate(id) ──▶ Active ──timer──▶ Expired   (siren-stopped broadcast)
//!                    │
//!                    └──cancel──▶ Cancelling ──▶ removed   (siren-stopped broadcast)
//! ```
//!
//! Every mutation (activate, cancel, expiry) runs under one registry lock
//! and broadcasts before releasing it, so for a given incident id the
//! operator room sees `emergency-siren` and `siren-stopped` in the same
//! order the registry applied them. An entry stays in the map in its
//! transitional state until its broadcast has gone out.
//!
//! Mutations run on their own task. A caller that drops the returned
//! future does not stop a half-applied mutation; the task finishes the
//! commit and its broadcast regardless.
//!
//! Each activation gets a fresh generation number. The expiry task carries
//! its generation and only acts if the entry still has it and is `Active`.
//! Cancel and replace also abort the old timer task, so no stale timer is
//! left running.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use serde_json::Value as JsonValue;
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinHandle};

use crate::domain::foundation::{IncidentId, StateMachine};
use crate::domain::relay::{Delivery, OutboundEvent, Room};
use crate::domain::siren::{ActiveSiren, SirenReason, SirenState};
use crate::ports::RoomBroadcaster;

/// Default cap on simultaneously active sirens.
pub const DEFAULT_MAX_ACTIVE: usize = 256;

/// Receipt for one activation.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertHandle {
    pub incident_id: IncidentId,
    pub generation: u64,
    /// True when an earlier activation for the same incident was superseded.
    pub replaced: bool,
    pub duration: Duration,
}

struct SirenEntry {
    siren: ActiveSiren,
    state: SirenState,
    generation: u64,
    timer: JoinHandle<()>,
}

struct RegistryInner {
    entries: Mutex<HashMap<IncidentId, SirenEntry>>,
    broadcaster: Arc<dyn RoomBroadcaster>,
    max_active: usize,
    generations: AtomicU64,
}

/// Shared registry of active sirens.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct SirenRegistry {
    inner: Arc<RegistryInner>,
}

impl SirenRegistry {
    /// Create a registry that announces siren changes through `broadcaster`.
    ///
    /// `max_active` below 1 is treated as 1.
    pub fn new(broadcaster: Arc<dyn RoomBroadcaster>, max_active: usize) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                entries: Mutex::new(HashMap::new()),
                broadcaster,
                max_active: max_active.max(1),
                generations: AtomicU64::new(0),
            }),
        }
    }

    /// Insert or replace the siren for `incident_id` and schedule its expiry.
    ///
    /// A pre-existing siren for the same id has its timer aborted and is
    /// superseded silently; only the newest activation will expire. When the
    /// registry is full, the oldest siren is stopped to make room.
    pub async fn activate(
        &self,
        incident_id: IncidentId,
        payload: JsonValue,
        reason: SirenReason,
        duration: Duration,
    ) -> AlertHandle {
        let inner = Arc::clone(&self.inner);
        let id = incident_id.clone();

        let committed =
            detached(async move { inner.activate(id, payload, reason, duration).await }).await;

        // Generation 0 is never issued, so the fallback handle expires nothing.
        committed.unwrap_or_else(|e| {
            tracing::error!(incident_id = %incident_id, error = %e, "Siren activation aborted");
            AlertHandle {
                incident_id,
                generation: 0,
                replaced: false,
                duration,
            }
        })
    }

    /// Stop the siren for `incident_id` before its timer fires.
    ///
    /// Returns false if there is no active siren for the id; that is an
    /// ordinary race with expiry, not an error.
    pub async fn cancel(&self, incident_id: &IncidentId) -> bool {
        let inner = Arc::clone(&self.inner);
        let id = incident_id.clone();

        detached(async move { inner.cancel(&id).await })
            .await
            .unwrap_or_else(|e| {
                tracing::error!(incident_id = %incident_id, error = %e, "Siren cancel aborted");
                false
            })
    }

    /// Expire the siren for `incident_id` if `generation` is still current.
    ///
    /// Called by the expiry timer. A stale generation or an already
    /// cancelled siren makes this a no-op.
    pub async fn expire(&self, incident_id: &IncidentId, generation: u64) -> bool {
        let inner = Arc::clone(&self.inner);
        let id = incident_id.clone();

        detached(async move { inner.expire(&id, generation).await })
            .await
            .unwrap_or(false)
    }

    /// Snapshot of all active sirens, oldest activation first.
    pub async fn list(&self) -> Vec<ActiveSiren> {
        let entries = self.inner.entries.lock().await;
        let mut active: Vec<(u64, ActiveSiren)> = entries
            .values()
            .filter(|e| e.state.is_active())
            .map(|e| (e.generation, e.siren.clone()))
            .collect();
        active.sort_by_key(|(generation, _)| *generation);
        active.into_iter().map(|(_, siren)| siren).collect()
    }

    /// True if a siren is currently active for the id.
    pub async fn is_active(&self, incident_id: &IncidentId) -> bool {
        self.inner
            .entries
            .lock()
            .await
            .get(incident_id)
            .map(|e| e.state.is_active())
            .unwrap_or(false)
    }

    /// Number of active sirens.
    pub async fn len(&self) -> usize {
        self.inner.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Abort every pending timer and forget all sirens without broadcasting.
    ///
    /// Used at process shutdown.
    pub async fn shutdown(&self) {
        let mut entries = self.inner.entries.lock().await;
        let count = entries.len();
        for (_, entry) in entries.drain() {
            entry.timer.abort();
        }
        tracing::info!(count, "Siren registry shut down");
    }
}

impl RegistryInner {
    async fn activate(
        self: Arc<Self>,
        incident_id: IncidentId,
        payload: JsonValue,
        reason: SirenReason,
        duration: Duration,
    ) -> AlertHandle {
        let mut entries = self.entries.lock().await;

        let replaced = match entries.get(&incident_id) {
            Some(previous) => {
                previous.timer.abort();
                tracing::debug!(
                    incident_id = %incident_id,
                    superseded_generation = previous.generation,
                    "Superseding active siren"
                );
                true
            }
            None => false,
        };

        if !replaced && entries.len() >= self.max_active {
            self.evict_oldest(&mut entries).await;
        }

        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let siren = ActiveSiren::new(incident_id.clone(), payload, reason, duration);
        let timer = spawn_expiry(
            Arc::downgrade(&self),
            incident_id.clone(),
            generation,
            duration,
        );

        entries.insert(
            incident_id.clone(),
            SirenEntry {
                siren: siren.clone(),
                state: SirenState::Active,
                generation,
                timer,
            },
        );

        tracing::info!(
            incident_id = %incident_id,
            generation,
            reason = ?reason,
            duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            replaced,
            "Siren activated"
        );

        let delivered = self
            .broadcaster
            .broadcast(Delivery::new(Room::Operators, OutboundEvent::EmergencySiren(siren)))
            .await;
        tracing::debug!(incident_id = %incident_id, delivered, "Siren activation broadcast");

        AlertHandle {
            incident_id,
            generation,
            replaced,
            duration,
        }
    }

    async fn cancel(&self, incident_id: &IncidentId) -> bool {
        let mut entries = self.entries.lock().await;

        let Some(entry) = entries.get_mut(incident_id) else {
            tracing::debug!(incident_id = %incident_id, "Cancel for inactive siren ignored");
            return false;
        };

        entry.state = match entry.state.transition_to(SirenState::Cancelling) {
            Ok(state) => state,
            Err(e) => {
                tracing::debug!(incident_id = %incident_id, "Cancel refused: {}", e);
                return false;
            }
        };
        entry.timer.abort();
        let generation = entry.generation;

        self.broadcaster
            .broadcast(Delivery::new(
                Room::Operators,
                OutboundEvent::siren_stopped(incident_id),
            ))
            .await;
        entries.remove(incident_id);

        tracing::info!(incident_id = %incident_id, generation, "Siren cancelled");
        true
    }

    async fn expire(&self, incident_id: &IncidentId, generation: u64) -> bool {
        let mut entries = self.entries.lock().await;

        let entry = match entries.get_mut(incident_id) {
            Some(entry) if entry.generation == generation && entry.state.is_active() => entry,
            _ => {
                tracing::debug!(
                    incident_id = %incident_id,
                    generation,
                    "Stale siren expiry ignored"
                );
                return false;
            }
        };

        entry.state = match entry.state.transition_to(SirenState::Expired) {
            Ok(state) => state,
            Err(e) => {
                tracing::debug!(incident_id = %incident_id, generation, "Expiry refused: {}", e);
                return false;
            }
        };

        self.broadcaster
            .broadcast(Delivery::new(
                Room::Operators,
                OutboundEvent::siren_stopped(incident_id),
            ))
            .await;
        entries.remove(incident_id);

        tracing::info!(incident_id = %incident_id, generation, "Siren expired");
        true
    }

    async fn evict_oldest(&self, entries: &mut HashMap<IncidentId, SirenEntry>) {
        let Some((oldest, entry)) = entries.iter_mut().min_by_key(|(_, e)| e.generation) else {
            return;
        };
        let oldest = oldest.clone();

        if let Ok(state) = entry.state.transition_to(SirenState::Cancelling) {
            entry.state = state;
        }
        entry.timer.abort();

        tracing::warn!(
            incident_id = %oldest,
            max_active = self.max_active,
            "Siren registry full, stopping oldest siren"
        );

        self.broadcaster
            .broadcast(Delivery::new(Room::Operators, OutboundEvent::siren_stopped(&oldest)))
            .await;
        entries.remove(&oldest);
    }
}

/// Run a registry mutation on its own task and wait for it.
///
/// Dropping the returned future leaves the task running to completion.
/// A panic inside the mutation is propagated to the caller.
async fn detached<F>(mutation: F) -> Result<F::Output, JoinError>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    match tokio::spawn(mutation).await {
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        other => other,
    }
}

fn spawn_expiry(
    registry: Weak<RegistryInner>,
    incident_id: IncidentId,
    generation: u64,
    duration: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(duration).await;
        if let Some(inner) = registry.upgrade() {
            inner.expire(&incident_id, generation).await;
        }
    })
}
