use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use log::{error, info, log};

use crate::cli::{CliApp, Commands, ParseError, ShellCommand, StatusDisplay};
use crate::config::ConfigManager;
use crate::controller::PlayerController;
use crate::engine::{HeadlessEngine, MediaEngine};
use crate::error::PlayerError;
use crate::playlist::Playlist;

/// Main application controller that coordinates all components
pub struct AppController {
    controller: PlayerController<HeadlessEngine>,
    config_manager: ConfigManager,
}

impl AppController {
    /// Create the application from the default or an explicit configuration file
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, PlayerError> {
        let config_manager = match config_path {
            Some(path) => ConfigManager::with_path(path)?,
            None => ConfigManager::new()?,
        };
        Ok(Self::with_config(config_manager))
    }

    pub fn with_config(config_manager: ConfigManager) -> Self {
        let config = config_manager.get_config();

        let mut playlist = Playlist::new();
        playlist.set_playback_mode(config.playback_mode);
        playlist.set_expand_m3u(config.expand_m3u);
        let engine = HeadlessEngine::new(config.default_volume);

        info!(
            "Application initialized (volume {}, mode {})",
            config.default_volume,
            config.playback_mode.as_str()
        );

        Self {
            controller: PlayerController::new(playlist, engine),
            config_manager,
        }
    }

    pub fn controller(&self) -> &PlayerController<HeadlessEngine> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlayerController<HeadlessEngine> {
        &mut self.controller
    }

    /// Resolve a playlist name against the configured playlist directory
    pub fn playlist_path(&self, name: &str) -> PathBuf {
        CliApp::resolve_playlist_path(name, &self.config_manager.get_config().playlist_directory)
    }

    /// Run a one-shot command line subcommand
    pub fn execute_command(&mut self, command: Commands) -> Result<(), PlayerError> {
        match command {
            Commands::Show { file } => {
                let path = self.playlist_path(&file);
                self.controller.load_playlist(&path)?;
                println!("{}", path.display());
                StatusDisplay::display_playlist(self.controller.playlist());
            }
            Commands::Add { file, locators } => {
                let path = self.playlist_path(&file);
                if path.exists() {
                    self.controller.load_playlist(&path)?;
                } else {
                    info!("Creating new playlist {}", path.display());
                }
                let added = self.controller.add_tracks(&locators);
                self.controller.save_playlist(&path)?;
                println!("Added {} of {} tracks to {}", added, locators.len(), path.display());
            }
            Commands::Remove { file, index } => {
                let path = self.playlist_path(&file);
                let row = CliApp::parse_row(&index.to_string())?;
                self.controller.load_playlist(&path)?;
                let removed = self.controller.remove_track(row)?;
                self.controller.save_playlist(&path)?;
                println!("Removed {} from {}", removed, path.display());
            }
        }
        Ok(())
    }

    /// Run one interactive command. Returns `false` once the user asked to exit.
    pub fn execute_shell_command(&mut self, command: ShellCommand) -> Result<bool, PlayerError> {
        match command {
            ShellCommand::Play => self.controller.play_clicked()?,
            ShellCommand::Stop => self.controller.stop_clicked()?,
            ShellCommand::Next => self.controller.next_clicked()?,
            ShellCommand::Prev => self.controller.previous_clicked()?,
            ShellCommand::Mute => self.controller.mute_clicked(),
            ShellCommand::Volume(level) => self.controller.volume_changed(level),
            ShellCommand::Seek(secs) => {
                self.controller.seek_pressed();
                let result = self.controller.seek_moved(secs);
                self.controller.seek_released();
                result?;
            }
            ShellCommand::Select(row) => self.controller.track_activated(row)?,
            ShellCommand::Add(locator) => {
                let added = self.controller.add_tracks([CliApp::expand_path(&locator).to_string_lossy()]);
                if added == 0 {
                    println!("Nothing added: '{}' is neither a file nor a URL", locator);
                } else {
                    println!("Added {} track(s)", added);
                }
            }
            ShellCommand::Remove(row) => {
                let removed = self.controller.remove_track(row)?;
                println!("Removed {}", removed);
            }
            ShellCommand::Move { from, to } => self.controller.move_track(from, to)?,
            ShellCommand::Reset => self.controller.reset_playlist()?,
            ShellCommand::Mode(mode) => {
                self.controller.set_playback_mode(mode);
                println!("Playback mode: {}", mode.as_str());
            }
            ShellCommand::Load(name) => {
                let path = self.playlist_path(&name);
                let count = self.controller.load_playlist(&path)?;
                println!("Loaded {} track(s) from {}", count, path.display());
            }
            ShellCommand::Save(name) => {
                let path = self.playlist_path(&name);
                self.controller.save_playlist(&path)?;
                println!("Saved {} track(s) to {}", self.controller.playlist().len(), path.display());
            }
            ShellCommand::List => StatusDisplay::display_playlist(self.controller.playlist()),
            ShellCommand::Status => StatusDisplay::display_status(
                self.controller.view(),
                self.controller.engine().state(),
                self.controller.playlist(),
            ),
            ShellCommand::Exit => return Ok(false),
        }
        Ok(true)
    }

    /// Read commands line by line until `exit` or end of input
    pub fn run_interactive_mode<R: BufRead>(&mut self, mut input: R) -> Result<(), PlayerError> {
        println!("SPF Player v0.1.0");
        println!("Type 'help' for available commands, 'exit' or 'quit' to quit.");
        println!();

        let mut line = String::new();
        loop {
            print!("> ");
            let _ = io::stdout().flush();

            line.clear();
            if input.read_line(&mut line)? == 0 {
                println!();
                break;
            }

            match CliApp::parse_command(&line) {
                Ok(command) => match self.execute_shell_command(command) {
                    Ok(true) => {}
                    Ok(false) => {
                        println!("Goodbye!");
                        break;
                    }
                    Err(e) => self.handle_error(&e),
                },
                Err(ParseError::EmptyCommand) => {}
                Err(ParseError::HelpRequested) => CliApp::display_help(),
                Err(e) => self.handle_error(&e.into()),
            }
        }

        self.shutdown();
        Ok(())
    }

    /// Log the error at its severity and show it to the user
    pub fn handle_error(&self, error: &PlayerError) {
        log!(error.severity().log_level(), "{}", error);
        StatusDisplay::display_error(error);
    }

    /// Remember volume and playback mode for the next session
    pub fn shutdown(&mut self) {
        let volume = self.controller.engine().volume();
        let mode = self.controller.playlist().playback_mode();
        if let Err(e) = self.config_manager.update_config(|config| {
            config.default_volume = volume;
            config.playback_mode = mode;
        }) {
            error!("Cannot save configuration: {}", e);
            eprintln!("Warning: Error saving configuration: {}", e);
        }
    }

    pub fn config_path(&self) -> &Path {
        self.config_manager.config_path()
    }
}
