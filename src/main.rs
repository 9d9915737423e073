use log::info;
use spf_player::app::AppController;
use spf_player::cli::{CliApp, StatusDisplay};
use spf_player::logging;

fn main() {
    if let Err(e) = logging::init("warn") {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let cli = CliApp::parse();

    let mut app = match AppController::new(cli.config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to initialize application");
            StatusDisplay::display_error(&e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(command) => {
            // Single command mode
            if let Err(e) = app.execute_command(command) {
                app.handle_error(&e);
                std::process::exit(1);
            }
        }
        None => {
            let stdin = std::io::stdin();
            if let Err(e) = app.run_interactive_mode(stdin.lock()) {
                app.handle_error(&e);
                std::process::exit(1);
            }
        }
    }

    info!("Application shutdown complete");
}
