use std::process::ExitCode;

use doctrine_desktop::app::DoctrineApp;
use doctrine_desktop::{cli, log_err, logger, settings::Settings};
use eframe::egui;

fn main() -> ExitCode {
    // -- CLI / headless mode ---------------------------------------------
    if cli::CliArgs::is_cli_mode() {
        use clap::Parser;
        let args = cli::CliArgs::parse();
        return cli::run(args);
    }

    // -- GUI mode --------------------------------------------------------

    // Initialize session log (overwrites previous session log)
    logger::init();

    let settings = Settings::load();
    doctrine_desktop::log_info!("using server {}", settings.server_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1080.0, 720.0])
            .with_title("Doctrine"),
        ..Default::default()
    };

    match eframe::run_native(
        "Doctrine",
        options,
        Box::new(|cc| Box::new(DoctrineApp::new(cc))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_err!("eframe failed to start: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
