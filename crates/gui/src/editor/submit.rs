//! Submitting the target trail and draining removal notices

use shared::{LogResponse, RemovalNotice, TrailPayload};

use super::TrailEditor;
use crate::notify::Notifier;
use crate::scene::Renderer;
use crate::state::submission::{SubmissionOutcome, SubmissionReply, SubmissionTicket, SubmitRejection};
use crate::transport::{SubmitError, Submitter};

impl<R: Renderer, N: Notifier> TrailEditor<R, N> {
    /// Validate the submit target, ask for confirmation and issue a ticket.
    ///
    /// Every rejection is also shown through the notifier.
    pub fn begin_submission(&mut self) -> Result<SubmissionTicket, SubmitRejection> {
        let result = self.prepare_submission();
        if let Err(rejection) = &result {
            tracing::warn!("submission rejected: {rejection}");
            if *rejection != SubmitRejection::Cancelled {
                self.notifier.notify(&rejection.to_string());
            }
        }
        result
    }

    fn prepare_submission(&mut self) -> Result<SubmissionTicket, SubmitRejection> {
        if self.submissions.in_flight() {
            return Err(SubmitRejection::InFlight);
        }
        let trail = self.submit_target.ok_or(SubmitRejection::NoTarget)?;
        let group = self.store.get(trail).ok_or(SubmitRejection::TrailNotFound)?;
        self.submissions.check(group)?;
        let fingerprint = group.fingerprint();
        let positions = group.positions();

        if self.settings.submission.confirm && !self.notifier.confirm("Submit this trail?") {
            return Err(SubmitRejection::Cancelled);
        }

        let georeference = self.settings.georeference;
        let points: Vec<shared::GeoPoint> = positions
            .iter()
            .map(|p| georeference.to_geographic(p.to_array()))
            .collect();
        let length = self.trail_length(trail).unwrap_or_default();
        let payload = TrailPayload::new(
            trail.to_string(),
            &points,
            length,
            self.settings.submission.submitter_id.clone(),
        )
        .and_then(|p| serde_json::to_value(&p))
        .map_err(|e| SubmitRejection::Payload(e.to_string()))?;

        let table = self.settings.submission.table.clone();
        let ticket = self.submissions.issue(trail, fingerprint, &table, payload);
        tracing::info!("submitting trail {trail} ({} points, {length:.2} m)", points.len());
        Ok(ticket)
    }

    /// Settle a dispatched ticket and update styling
    pub fn finish_submission(&mut self, reply: SubmissionReply) -> SubmissionOutcome {
        let outcome = self.submissions.complete(reply);
        match &outcome {
            SubmissionOutcome::Accepted { trail, response } => {
                tracing::info!("trail {trail} stored as {} in {}", response.id, response.table);
                self.restyle_trail(*trail);
                self.notifier.notify("Trail submitted");
            }
            SubmissionOutcome::Failed { trail, error } => {
                tracing::error!("submission of trail {trail} failed: {error}");
                self.notifier.notify(&format!("Submission failed: {error}"));
            }
        }
        outcome
    }

    /// Begin, dispatch and finish in one go
    pub async fn submit<S: Submitter>(&mut self, submitter: &S) -> Result<SubmissionOutcome, SubmitRejection> {
        let ticket = self.begin_submission()?;
        let reply = ticket.dispatch(submitter).await;
        Ok(self.finish_submission(reply))
    }

    pub fn take_removal_notices(&mut self) -> Vec<RemovalNotice> {
        std::mem::take(&mut self.removal_notices)
    }

    /// Send queued removal notices to the removal table
    pub async fn flush_removal_notices<S: Submitter>(
        &mut self,
        submitter: &S,
    ) -> Vec<Result<LogResponse, SubmitError>> {
        let table = self.settings.submission.removal_table.clone();
        let mut results = Vec::new();
        for notice in self.take_removal_notices() {
            let result = match serde_json::to_value(&notice) {
                Ok(payload) => submitter.log(&table, payload).await,
                Err(e) => Err(SubmitError::InvalidResponse(e.to_string())),
            };
            if let Err(e) = &result {
                tracing::error!("removal notice for {} failed: {e}", notice.track_id);
            }
            results.push(result);
        }
        results
    }
}
