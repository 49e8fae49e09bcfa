//! Main application module

mod keyboard;
mod menus;
mod styles;
mod toasts;
mod worker;

use eframe::egui;

use trailmark_lib::notify::Notifier;
use trailmark_lib::scene::{MemoryScene, PlanView};
use trailmark_lib::state::{EditorSettings, TrailSnapshot};
use trailmark_lib::TrailEditor;

use crate::ui::{status_bar, toolbar, trail_list};
use crate::viewport::PlanViewport;
pub use styles::{GRID_STROKE, GROUND_FILL};
pub use toasts::ToastNotifier;
use worker::{SubmissionWorker, WorkerEvent};

/// The editor as the viewer drives it
pub type Editor = TrailEditor<MemoryScene, ToastNotifier>;

/// Main application
pub struct TrailmarkApp {
    editor: Editor,
    viewport: PlanViewport,
    worker: Option<SubmissionWorker>,
    /// Revision of the last autosave
    last_saved_revision: u64,
    show_settings: bool,
}

impl TrailmarkApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial: Option<TrailSnapshot>) -> Self {
        styles::configure_styles(&cc.egui_ctx);

        let settings = EditorSettings::load();
        let view = PlanView {
            y_up: true,
            ..PlanView::identity()
        };
        let scene = MemoryScene::new(view, settings.drawing.pick_radius_px);
        let worker = match SubmissionWorker::new(&settings.submission.endpoint) {
            Ok(worker) => Some(worker),
            Err(e) => {
                tracing::error!("Submission runtime unavailable: {e}");
                None
            }
        };
        let mut editor = TrailEditor::new(scene, ToastNotifier::default(), settings);

        // CLI argument takes priority, then autosave
        if let Some(snapshot) = initial.or_else(TrailSnapshot::load_autosave) {
            editor.restore(snapshot);
        }

        let last_saved_revision = editor.revision();
        Self {
            editor,
            viewport: PlanViewport::new(),
            worker,
            last_saved_revision,
            show_settings: false,
        }
    }

    /// Issue a ticket for the submit target and hand it to the worker
    fn submit(&mut self, ctx: &egui::Context) {
        let Some(worker) = &self.worker else {
            self.editor.notifier.notify("Submission unavailable: no network runtime");
            return;
        };
        if let Ok(ticket) = self.editor.begin_submission() {
            worker.dispatch(ticket, ctx);
        }
    }

    fn poll_worker(&mut self, ctx: &egui::Context) {
        let Some(worker) = &mut self.worker else {
            return;
        };
        for event in worker.poll() {
            match event {
                WorkerEvent::Reply(reply) => {
                    self.editor.finish_submission(reply);
                }
                WorkerEvent::NoticeSent { track_id, result } => match result {
                    Ok(response) => {
                        tracing::info!("removal of {track_id} logged as {}", response.id)
                    }
                    Err(e) => tracing::error!("removal notice for {track_id} failed: {e}"),
                },
            }
        }

        let notices = self.editor.take_removal_notices();
        if !notices.is_empty() {
            worker.send_notices(notices, &self.editor.settings.submission.removal_table, ctx);
        }
    }

    fn autosave_if_changed(&mut self) {
        let revision = self.editor.revision();
        if revision != self.last_saved_revision {
            if let Err(e) = self.editor.snapshot().autosave() {
                tracing::warn!("Autosave failed: {e}");
            }
            self.last_saved_revision = revision;
        }
    }
}

impl eframe::App for TrailmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker(ctx);
        self.autosave_if_changed();

        if keyboard::handle_keyboard(ctx, &mut self.editor) {
            self.submit(ctx);
        }

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.editor);
                menus::view_menu(ui, &mut self.editor, &mut self.viewport);
                if ui.button("Settings").clicked() {
                    self.show_settings = true;
                }
            });
        });

        // ── Settings window ──────────────────────────────────
        if let Some(endpoint) = menus::settings_window(ctx, &mut self.show_settings, &mut self.editor)
        {
            if let Some(worker) = &mut self.worker {
                worker.set_endpoint(&endpoint);
            }
        }

        // ── Toolbar ───────────────────────────────────────────
        let mut submit_clicked = false;
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                submit_clicked = toolbar::show(ui, &mut self.editor);
            });
        if submit_clicked {
            self.submit(ctx);
        }

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.editor);
            });

        // ── Left panel: trail list ───────────────────────────
        egui::SidePanel::left("trail_list")
            .default_width(230.0)
            .width_range(160.0..=400.0)
            .resizable(true)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)))
            .show(ctx, |ui| {
                trail_list::show(ui, &mut self.editor);
            });

        // ── Central panel: plan view ─────────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.editor);
            });

        self.editor.notifier.show(ctx);
    }
}
