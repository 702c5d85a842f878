use std::process::ExitCode;

use bechdel_dashboard::config::IngestArgs;
use bechdel_dashboard::ingest;
use clap::Parser;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = IngestArgs::parse();

    match ingest::run(&args) {
        Ok(report) => {
            println!(
                "Wrote {} movies to {}",
                report.rows_written,
                args.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Ingestion failed: {e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
