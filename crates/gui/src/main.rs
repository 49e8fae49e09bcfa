mod app;
mod ui;
mod viewport;

pub use trailmark_lib::state;

use app::TrailmarkApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trailmark=info,trailmark_lib=info".into()),
        )
        .init();

    // Parse --trails <path> argument
    let initial = parse_trails_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Trailmark")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "trailmark",
        native_options,
        Box::new(move |cc| Ok(Box::new(TrailmarkApp::new(cc, initial)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_trails_arg() -> Option<state::TrailSnapshot> {
    let args: Vec<String> = std::env::args().collect();
    let pos = args.iter().position(|a| a == "--trails")?;
    let path = std::path::Path::new(args.get(pos + 1)?);
    match state::TrailSnapshot::load_from(path) {
        Ok(snapshot) => {
            tracing::info!(
                "Loaded {} trails from {}",
                snapshot.store.len(),
                path.display()
            );
            Some(snapshot)
        }
        Err(e) => {
            tracing::error!("Failed to load trails from {}: {e}", path.display());
            None
        }
    }
}
