mod bootstrap;

use anyhow::Result;
use insights_core::settings::Settings;
use insights_data::pipeline::{load_cleaned, run_all, run_analysis, run_clean, run_pareto};
use insights_ui::app::{restore_terminal, App};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    let app_dir = bootstrap::ensure_directories()?;
    let log_file = settings
        .log_file
        .clone()
        .or_else(|| (settings.step == "dashboard").then(|| bootstrap::default_log_file(&app_dir)));
    bootstrap::setup_logging(&settings.log_level, log_file.as_ref())?;

    tracing::info!("CX Insights v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Step: {}, Data dir: {}, Theme: {}",
        settings.step,
        settings.data_dir.display(),
        settings.theme
    );

    let files = settings.files();

    match settings.step.as_str() {
        "all" => {
            run_all(&files)?;
        }
        "clean" => {
            run_clean(&files)?;
        }
        "analyze" => {
            run_analysis(&files)?;
        }
        "pareto" => {
            run_pareto(&files)?;
        }
        "dashboard" => {
            let data = load_cleaned(&files)?;
            let app = App::new(
                &settings.theme,
                settings.data_dir.display().to_string(),
                files,
                data,
            );

            // The loop exits on 'q' / Esc / Ctrl+C inside the TUI. An OS-level
            // Ctrl+C also ends it when the terminal is not in raw mode yet.
            tokio::select! {
                result = app.run() => {
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; closing dashboard");
                    restore_terminal()?;
                }
            }
        }
        unknown => anyhow::bail!("Unknown step: {}", unknown),
    }

    Ok(())
}
