//! Event router - the single place that decides which rooms hear what.
//!
//! # Routing table
//!
//! | Event                | Operators | Incident room | Reporter room | Siren |
//! |----------------------|-----------|---------------|---------------|-------|
//! | Incident created     | full      |               | acknowledgment| if classified critical |
//! | Status changed       | update    | update        | message (if reporter known) | |
//! | Reporter location    | location  |               |               |       |
//! | Unit location        | location  | location      |               |       |
//! | Manual trigger/stop  |           |               |               | activate / cancel |
//!
//! Signals relayed for a client (locations, status changes) skip the
//! originating connection. Delivery is best-effort; empty rooms are no-ops.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value as JsonValue;

use crate::domain::foundation::{ConnectionId, IncidentId};
use crate::domain::relay::{Delivery, OutboundEvent, RelayEvent, ReporterUpdate, Room};
use crate::domain::siren::{ActiveSiren, SirenReason};
use crate::ports::RoomBroadcaster;

use super::siren_registry::{AlertHandle, SirenRegistry};

/// Siren side effect implied by an event.
#[derive(Debug, Clone, PartialEq)]
pub enum SirenAction {
    Activate {
        incident_id: IncidentId,
        payload: JsonValue,
        reason: SirenReason,
    },
    Cancel {
        incident_id: IncidentId,
    },
}

/// Everything an event should cause, computed without side effects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutePlan {
    pub deliveries: Vec<Delivery>,
    pub siren: Option<SirenAction>,
}

/// What routing one event actually did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteOutcome {
    /// Number of (room, payload) instructions executed.
    pub deliveries: usize,
    /// Number of connections reached across all instructions.
    pub delivered: usize,
    pub activated: Option<AlertHandle>,
    /// `Some(found)` when the event asked for a cancel.
    pub cancelled: Option<bool>,
}

/// Fan-out engine for relay events.
pub struct EventRouter {
    broadcaster: Arc<dyn RoomBroadcaster>,
    sirens: SirenRegistry,
    siren_duration: Duration,
}

impl EventRouter {
    pub fn new(
        broadcaster: Arc<dyn RoomBroadcaster>,
        sirens: SirenRegistry,
        siren_duration: Duration,
    ) -> Self {
        Self {
            broadcaster,
            sirens,
            siren_duration,
        }
    }

    /// The siren registry this router escalates into.
    pub fn sirens(&self) -> &SirenRegistry {
        &self.sirens
    }

    /// Compute deliveries and siren action for an event.
    ///
    /// Pure: nothing is sent and no siren is touched.
    pub fn plan(event: &RelayEvent, origin: Option<ConnectionId>) -> RoutePlan {
        match event {
            RelayEvent::IncidentCreated(incident) => {
                let mut deliveries = vec![Delivery::new(
                    Room::Operators,
                    OutboundEvent::NewIncident(incident.clone()),
                )];
                if let Some(reporter) = &incident.reporter {
                    deliveries.push(Delivery::new(
                        Room::reporter(reporter),
                        OutboundEvent::UserEmergencyUpdate(ReporterUpdate::acknowledgment(incident)),
                    ));
                }

                let siren = incident.escalation().map(|_| SirenAction::Activate {
                    incident_id: incident.incident_id.clone(),
                    payload: incident.to_payload(),
                    reason: SirenReason::CriticalEmergencyDetected,
                });

                RoutePlan { deliveries, siren }
            }

            RelayEvent::StatusChanged(change) => {
                let mut deliveries = vec![
                    Delivery::new(
                        Room::Operators,
                        OutboundEvent::EmergencyStatusChanged(change.clone()),
                    )
                    .except(origin),
                    Delivery::new(
                        Room::incident(&change.incident_id),
                        OutboundEvent::EmergencyStatusChanged(change.clone()),
                    )
                    .except(origin),
                ];
                if let Some(reporter) = &change.reporter {
                    deliveries.push(
                        Delivery::new(
                            Room::reporter(reporter),
                            OutboundEvent::UserEmergencyUpdate(ReporterUpdate::status_changed(change)),
                        )
                        .except(origin),
                    );
                }
                RoutePlan {
                    deliveries,
                    siren: None,
                }
            }

            RelayEvent::ReporterLocation(location) => RoutePlan {
                deliveries: vec![Delivery::new(
                    Room::Operators,
                    OutboundEvent::UserLocationUpdate(location.payload.clone()),
                )
                .except(origin)],
                siren: None,
            },

            RelayEvent::UnitLocation(location) => RoutePlan {
                deliveries: vec![
                    Delivery::new(
                        Room::Operators,
                        OutboundEvent::ResponseUnitLocation(location.payload.clone()),
                    )
                    .except(origin),
                    Delivery::new(
                        Room::incident(&location.incident_id),
                        OutboundEvent::UnitLocationUpdate(location.payload.clone()),
                    )
                    .except(origin),
                ],
                siren: None,
            },

            RelayEvent::SirenTriggered {
                incident_id,
                payload,
            } => RoutePlan {
                deliveries: Vec::new(),
                siren: Some(SirenAction::Activate {
                    incident_id: incident_id.clone(),
                    payload: payload.clone(),
                    reason: SirenReason::ManualTrigger,
                }),
            },

            RelayEvent::SirenStopRequested { incident_id } => RoutePlan {
                deliveries: Vec::new(),
                siren: Some(SirenAction::Cancel {
                    incident_id: incident_id.clone(),
                }),
            },
        }
    }

    /// Route an event: deliver to every implied room and apply its siren action.
    ///
    /// Operator-room deliveries go out first, then the siren action, then
    /// the remaining rooms, so consoles see a new incident before its siren.
    pub async fn route(&self, event: RelayEvent, origin: Option<ConnectionId>) -> RouteOutcome {
        if let RelayEvent::IncidentCreated(incident) = &event {
            if let Some(trigger) = incident.escalation() {
                tracing::info!(
                    incident_id = %incident.incident_id,
                    trigger = %trigger,
                    "Incident escalated to siren"
                );
            }
        }

        let plan = Self::plan(&event, origin);
        let (operators, others): (Vec<_>, Vec<_>) = plan
            .deliveries
            .into_iter()
            .partition(|d| d.room == Room::Operators);

        let mut outcome = RouteOutcome::default();

        for delivery in operators {
            self.deliver(delivery, &mut outcome).await;
        }

        match plan.siren {
            Some(SirenAction::Activate {
                incident_id,
                payload,
                reason,
            }) => {
                let handle = self
                    .sirens
                    .activate(incident_id, payload, reason, self.siren_duration)
                    .await;
                outcome.activated = Some(handle);
            }
            Some(SirenAction::Cancel { incident_id }) => {
                outcome.cancelled = Some(self.sirens.cancel(&incident_id).await);
            }
            None => {}
        }

        for delivery in others {
            self.deliver(delivery, &mut outcome).await;
        }

        tracing::debug!(
            kind = event.kind(),
            deliveries = outcome.deliveries,
            delivered = outcome.delivered,
            "Relay event routed"
        );

        outcome
    }

    /// Snapshot of active sirens for a late-joining console.
    pub async fn active_sirens(&self) -> Vec<ActiveSiren> {
        self.sirens.list().await
    }

    async fn deliver(&self, delivery: Delivery, outcome: &mut RouteOutcome) {
        let room = delivery.room.clone();
        let delivered = self.broadcaster.broadcast(delivery).await;
        if delivered == 0 {
            tracing::trace!(room = %room, "No live members, delivery skipped");
        }
        outcome.deliveries += 1;
        outcome.delivered += delivered;
    }
}
