//! Background submission dispatch
//!
//! Tickets issued by the editor are sent on a small tokio runtime; replies
//! come back over a channel and are drained once per frame.

use std::sync::Arc;

use eframe::egui;
use shared::{LogResponse, RemovalNotice};
use tokio::sync::mpsc;

use trailmark_lib::state::{SubmissionReply, SubmissionTicket};
use trailmark_lib::transport::{HttpSubmitter, SubmitError, Submitter};

pub enum WorkerEvent {
    Reply(SubmissionReply),
    NoticeSent {
        track_id: String,
        result: Result<LogResponse, SubmitError>,
    },
}

pub struct SubmissionWorker {
    runtime: tokio::runtime::Runtime,
    submitter: Arc<HttpSubmitter>,
    tx: mpsc::UnboundedSender<WorkerEvent>,
    rx: mpsc::UnboundedReceiver<WorkerEvent>,
}

impl SubmissionWorker {
    pub fn new(endpoint: &str) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("trailmark-submit")
            .enable_all()
            .build()?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            runtime,
            submitter: Arc::new(HttpSubmitter::new(endpoint)),
            tx,
            rx,
        })
    }

    pub fn set_endpoint(&mut self, endpoint: &str) {
        self.submitter = Arc::new(HttpSubmitter::new(endpoint));
    }

    pub fn dispatch(&self, ticket: SubmissionTicket, ctx: &egui::Context) {
        let submitter = Arc::clone(&self.submitter);
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let reply = ticket.dispatch(submitter.as_ref()).await;
            let _ = tx.send(WorkerEvent::Reply(reply));
            ctx.request_repaint();
        });
    }

    pub fn send_notices(&self, notices: Vec<RemovalNotice>, table: &str, ctx: &egui::Context) {
        for notice in notices {
            let submitter = Arc::clone(&self.submitter);
            let tx = self.tx.clone();
            let ctx = ctx.clone();
            let table = table.to_string();
            self.runtime.spawn(async move {
                let result = match serde_json::to_value(&notice) {
                    Ok(payload) => submitter.log(&table, payload).await,
                    Err(e) => Err(SubmitError::InvalidResponse(e.to_string())),
                };
                let _ = tx.send(WorkerEvent::NoticeSent {
                    track_id: notice.track_id,
                    result,
                });
                ctx.request_repaint();
            });
        }
    }

    /// Everything that arrived since the last frame
    pub fn poll(&mut self) -> Vec<WorkerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
