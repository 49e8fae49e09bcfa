//! Single-flight submission of finished trails
//!
//! A submission is a ticket: the editor issues it synchronously, the caller
//! awaits [`SubmissionTicket::dispatch`] wherever its runtime lives, and the
//! reply goes back through [`SubmissionController::complete`]. Only one
//! ticket may be outstanding per editor.

use std::collections::HashSet;

use serde_json::Value;
use shared::LogResponse;

use crate::state::trails::{TrailGroup, TrailId};
use crate::transport::{SubmitError, Submitter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicketId(u64);

/// Why a submission was not issued
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitRejection {
    #[error("a submission is already in progress")]
    InFlight,
    #[error("no trail selected for submission")]
    NoTarget,
    #[error("trail not found")]
    TrailNotFound,
    #[error("a trail needs at least 2 points, this one has {count}")]
    TooFewVertices { count: usize },
    #[error("this trail was already submitted without changes")]
    Unchanged,
    #[error("submission cancelled")]
    Cancelled,
    #[error("could not build payload: {0}")]
    Payload(String),
}

/// One issued submission, not yet sent
#[derive(Debug)]
pub struct SubmissionTicket {
    pub id: TicketId,
    pub trail: TrailId,
    /// Fingerprint of the trail at the moment the payload was built
    pub fingerprint: String,
    pub table: String,
    pub payload: Value,
}

impl SubmissionTicket {
    /// Send the payload; cannot be cancelled once started
    pub async fn dispatch<S: Submitter>(self, submitter: &S) -> SubmissionReply {
        let result = submitter.log(&self.table, self.payload.clone()).await;
        SubmissionReply {
            ticket: self,
            result,
        }
    }
}

#[derive(Debug)]
pub struct SubmissionReply {
    pub ticket: SubmissionTicket,
    pub result: Result<LogResponse, SubmitError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Accepted { trail: TrailId, response: LogResponse },
    Failed { trail: TrailId, error: SubmitError },
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted { .. })
    }
}

#[derive(Debug, Default)]
pub struct SubmissionController {
    in_flight: Option<TicketId>,
    next_ticket: u64,
    /// Fingerprints accepted by the backend
    submitted: HashSet<String>,
    version: u64,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Validation that needs no user interaction
    pub fn check(&self, group: &TrailGroup) -> Result<(), SubmitRejection> {
        if self.in_flight.is_some() {
            return Err(SubmitRejection::InFlight);
        }
        if group.len() < 2 {
            return Err(SubmitRejection::TooFewVertices { count: group.len() });
        }
        if self.submitted.contains(&group.fingerprint()) {
            return Err(SubmitRejection::Unchanged);
        }
        Ok(())
    }

    /// Mark a new ticket as in flight
    pub fn issue(&mut self, trail: TrailId, fingerprint: String, table: &str, payload: Value) -> SubmissionTicket {
        let id = TicketId(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(id);
        SubmissionTicket {
            id,
            trail,
            fingerprint,
            table: table.to_string(),
            payload,
        }
    }

    /// Settle a reply, clearing the in-flight ticket it belongs to
    pub fn complete(&mut self, reply: SubmissionReply) -> SubmissionOutcome {
        let SubmissionReply { ticket, result } = reply;
        if self.in_flight == Some(ticket.id) {
            self.in_flight = None;
        }
        match result {
            Ok(response) => {
                self.submitted.insert(ticket.fingerprint);
                self.version += 1;
                SubmissionOutcome::Accepted {
                    trail: ticket.trail,
                    response,
                }
            }
            Err(error) => SubmissionOutcome::Failed {
                trail: ticket.trail,
                error,
            },
        }
    }

    pub fn is_submitted(&self, fingerprint: &str) -> bool {
        self.submitted.contains(fingerprint)
    }

    /// Drop a fingerprint, returning whether it was recorded
    pub fn forget(&mut self, fingerprint: &str) -> bool {
        let removed = self.submitted.remove(fingerprint);
        if removed {
            self.version += 1;
        }
        removed
    }

    /// Recorded fingerprints, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.submitted.iter().cloned().collect();
        keys.sort();
        keys
    }

    pub fn restore_keys(&mut self, keys: impl IntoIterator<Item = String>) {
        self.submitted = keys.into_iter().collect();
        self.in_flight = None;
        self.version += 1;
    }
}
