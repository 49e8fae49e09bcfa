//! Toast notifications and native confirmation dialogs

use std::time::{Duration, Instant};

use eframe::egui;
use trailmark_lib::notify::Notifier;

const TOAST_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Default)]
pub struct ToastNotifier {
    toasts: Vec<(String, Instant)>,
}

impl ToastNotifier {
    pub fn show(&mut self, ctx: &egui::Context) {
        self.toasts.retain(|(_, at)| at.elapsed() < TOAST_LIFETIME);
        if self.toasts.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -32.0))
            .show(ctx, |ui| {
                for (text, _) in &self.toasts {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(text);
                    });
                }
            });
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

impl Notifier for ToastNotifier {
    fn notify(&mut self, message: &str) {
        self.toasts.push((message.to_string(), Instant::now()));
    }

    fn confirm(&mut self, message: &str) -> bool {
        matches!(
            rfd::MessageDialog::new()
                .set_title("Trailmark")
                .set_description(message)
                .set_buttons(rfd::MessageButtons::YesNo)
                .show(),
            rfd::MessageDialogResult::Yes
        )
    }
}
