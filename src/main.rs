mod app;
mod state;
mod ui;

use anyhow::Result;
use app::BechdelApp;
use bechdel_dashboard::config::DashboardArgs;
use bechdel_dashboard::report::run_headless;
use clap::Parser;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let args = DashboardArgs::parse();

    if args.is_headless() {
        run_headless(&args, std::io::stdout().lock())?;
        return Ok(());
    }

    let mut state = AppState::default();
    if args.data.exists() {
        state.open(&args.data);
    } else {
        log::warn!("{} not found; waiting for File → Open", args.data.display());
        state.status_message = Some(format!(
            "{} not found. Run `ingest` first or open a file.",
            args.data.display()
        ));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bechdel Test Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(BechdelApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("UI failed: {e}"))
}
