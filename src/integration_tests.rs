#[cfg(test)]
mod integration_tests {
    use crate::app::AppController;
    use crate::cli::{Commands, ShellCommand};
    use crate::config::ConfigManager;
    use crate::engine::MediaEngine;
    use crate::error::{CodecError, PlayerError, PlaylistError};
    use crate::models::{PlaybackMode, PlaybackState, TrackRef};
    use crate::playlist::codec::{self, SPF_HEADER};
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Create a test audio file (dummy content for testing)
    fn create_test_audio_file(dir: &Path, name: &str) -> PathBuf {
        let file_path = dir.join(name);
        std::fs::write(&file_path, b"dummy audio data").unwrap();
        file_path
    }

    /// App whose config file and playlist directory live in a temp dir
    fn create_test_app(temp_dir: &TempDir) -> AppController {
        let mut config_manager = ConfigManager::with_path(temp_dir.path().join("config.toml")).unwrap();
        config_manager
            .update_config(|config| config.playlist_directory = temp_dir.path().join("playlists"))
            .unwrap();
        std::fs::create_dir_all(temp_dir.path().join("playlists")).unwrap();
        AppController::with_config(config_manager)
    }

    #[test]
    fn test_app_starts_with_configured_settings() {
        let temp_dir = TempDir::new().unwrap();
        let mut config_manager = ConfigManager::with_path(temp_dir.path().join("config.toml")).unwrap();
        config_manager
            .update_config(|config| {
                config.default_volume = 35;
                config.playback_mode = PlaybackMode::Loop;
            })
            .unwrap();

        let app = AppController::with_config(config_manager);
        assert_eq!(app.controller().engine().volume(), 35);
        assert_eq!(app.controller().view().volume_slider, 35);
        assert_eq!(app.controller().playlist().playback_mode(), PlaybackMode::Loop);
        assert!(app.controller().playlist().is_empty());
    }

    #[test]
    fn test_playlist_path_resolution() {
        let temp_dir = TempDir::new().unwrap();
        let app = create_test_app(&temp_dir);

        assert_eq!(
            app.playlist_path("party"),
            temp_dir.path().join("playlists").join("party.spf")
        );
        assert_eq!(app.playlist_path("/tmp/x.spf"), PathBuf::from("/tmp/x.spf"));
    }

    #[test]
    fn test_one_shot_add_show_remove() {
        let temp_dir = TempDir::new().unwrap();
        let song = create_test_audio_file(temp_dir.path(), "song1.flac");
        let playlist_file = temp_dir.path().join("playlists").join("mix.spf");

        let mut app = create_test_app(&temp_dir);
        app.execute_command(Commands::Add {
            file: "mix".to_string(),
            locators: vec![
                song.to_string_lossy().to_string(),
                "http://example.com/stream.mp3".to_string(),
                "/does/not/exist.mp3".to_string(),
            ],
        })
        .unwrap();

        let text = std::fs::read_to_string(&playlist_file).unwrap();
        assert!(text.starts_with(SPF_HEADER));
        assert_eq!(codec::read_file(&playlist_file).unwrap().len(), 2);

        let mut app = create_test_app(&temp_dir);
        app.execute_command(Commands::Show { file: "mix".to_string() }).unwrap();
        assert_eq!(app.controller().playlist().len(), 2);

        let mut app = create_test_app(&temp_dir);
        app.execute_command(Commands::Remove {
            file: "mix".to_string(),
            index: 1,
        })
        .unwrap();

        let remaining = codec::read_file(&playlist_file).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].locator(), "http://example.com/stream.mp3");
    }

    #[test]
    fn test_one_shot_add_appends_to_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let first = create_test_audio_file(temp_dir.path(), "a.mp3");
        let second = create_test_audio_file(temp_dir.path(), "b.mp3");

        for song in [&first, &second] {
            let mut app = create_test_app(&temp_dir);
            app.execute_command(Commands::Add {
                file: "mix".to_string(),
                locators: vec![song.to_string_lossy().to_string()],
            })
            .unwrap();
        }

        let tracks = codec::read_file(&temp_dir.path().join("playlists").join("mix.spf")).unwrap();
        assert_eq!(tracks, vec![TrackRef::local(&first), TrackRef::local(&second)]);
    }

    #[test]
    fn test_one_shot_remove_errors() {
        let temp_dir = TempDir::new().unwrap();
        let song = create_test_audio_file(temp_dir.path(), "a.mp3");

        let mut app = create_test_app(&temp_dir);
        app.execute_command(Commands::Add {
            file: "mix".to_string(),
            locators: vec![song.to_string_lossy().to_string()],
        })
        .unwrap();

        let mut app = create_test_app(&temp_dir);
        assert!(matches!(
            app.execute_command(Commands::Remove { file: "mix".to_string(), index: 5 }),
            Err(PlayerError::Playlist(PlaylistError::IndexOutOfRange { index: 4, len: 1 }))
        ));

        let mut app = create_test_app(&temp_dir);
        assert!(matches!(
            app.execute_command(Commands::Remove { file: "mix".to_string(), index: 0 }),
            Err(PlayerError::Parse(_))
        ));

        let mut app = create_test_app(&temp_dir);
        assert!(matches!(
            app.execute_command(Commands::Show { file: "missing".to_string() }),
            Err(PlayerError::Codec(CodecError::Io(_)))
        ));
    }

    #[test]
    fn test_shell_commands_drive_playback() {
        let temp_dir = TempDir::new().unwrap();
        let first = create_test_audio_file(temp_dir.path(), "a.mp3");
        let second = create_test_audio_file(temp_dir.path(), "b.mp3");

        let mut app = create_test_app(&temp_dir);
        for song in [&first, &second] {
            app.execute_shell_command(ShellCommand::Add(song.to_string_lossy().to_string()))
                .unwrap();
        }

        assert!(app.execute_shell_command(ShellCommand::Play).unwrap());
        assert_eq!(app.controller().engine().state(), PlaybackState::Playing);
        assert_eq!(app.controller().playlist().current_index(), Some(0));

        app.execute_shell_command(ShellCommand::Next).unwrap();
        assert_eq!(app.controller().engine().media(), Some(&TrackRef::local(&second)));

        app.execute_shell_command(ShellCommand::Volume(0)).unwrap();
        assert!(app.controller().engine().is_muted());
        app.execute_shell_command(ShellCommand::Mute).unwrap();
        assert!(!app.controller().engine().is_muted());

        app.execute_shell_command(ShellCommand::Select(0)).unwrap();
        assert_eq!(app.controller().engine().media(), Some(&TrackRef::local(&first)));

        app.execute_shell_command(ShellCommand::Move { from: 0, to: 1 }).unwrap();
        assert_eq!(app.controller().playlist().current_index(), Some(1));

        app.execute_shell_command(ShellCommand::Stop).unwrap();
        assert_eq!(app.controller().engine().state(), PlaybackState::Stopped);

        assert!(!app.execute_shell_command(ShellCommand::Exit).unwrap());
    }

    #[test]
    fn test_shell_seek_needs_media() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = create_test_app(&temp_dir);

        assert!(matches!(
            app.execute_shell_command(ShellCommand::Seek(10)),
            Err(PlayerError::Engine(_))
        ));
        assert!(!app.controller().view().seek_dragging);
    }

    #[test]
    fn test_shell_add_expands_m3u() {
        let temp_dir = TempDir::new().unwrap();
        create_test_audio_file(temp_dir.path(), "one.mp3");
        create_test_audio_file(temp_dir.path(), "two.mp3");
        let list = temp_dir.path().join("list.m3u");
        std::fs::write(&list, "#EXTM3U\none.mp3\n#EXTINF:1,Two\ntwo.mp3\nmissing.mp3\n").unwrap();

        let mut app = create_test_app(&temp_dir);
        app.execute_shell_command(ShellCommand::Add(list.to_string_lossy().to_string()))
            .unwrap();

        let items = app.controller().playlist().items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], TrackRef::local(temp_dir.path().join("one.mp3")));
        assert_eq!(items[1], TrackRef::local(temp_dir.path().join("two.mp3")));
    }

    #[test]
    fn test_shell_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let song = create_test_audio_file(temp_dir.path(), "a.mp3");

        let mut app = create_test_app(&temp_dir);
        app.execute_shell_command(ShellCommand::Add(song.to_string_lossy().to_string()))
            .unwrap();
        app.execute_shell_command(ShellCommand::Add("https://radio.example.org/live".to_string()))
            .unwrap();
        app.execute_shell_command(ShellCommand::Save("evening".to_string())).unwrap();
        assert!(temp_dir.path().join("playlists").join("evening.spf").exists());

        let mut other = create_test_app(&temp_dir);
        other.execute_shell_command(ShellCommand::Load("evening".to_string())).unwrap();
        assert_eq!(other.controller().playlist().items(), app.controller().playlist().items());

        // Loading appends
        other.execute_shell_command(ShellCommand::Load("evening.spf".to_string())).unwrap();
        assert_eq!(other.controller().playlist().len(), 4);

        other.execute_shell_command(ShellCommand::Reset).unwrap();
        assert!(other.controller().playlist().is_empty());
    }

    #[test]
    fn test_interactive_session() {
        let temp_dir = TempDir::new().unwrap();
        let first = create_test_audio_file(temp_dir.path(), "a.mp3");
        let second = create_test_audio_file(temp_dir.path(), "b.mp3");

        let script = format!(
            "add {}\nadd {}\n\nbogus\nhelp\nplay\nnext\nvolume 40\nmode random\nremove 9\nsave session\nexit\nlist\n",
            first.display(),
            second.display()
        );

        let mut app = create_test_app(&temp_dir);
        app.run_interactive_mode(Cursor::new(script.into_bytes())).unwrap();

        // Commands after `exit` are not run
        assert_eq!(app.controller().playlist().len(), 2);
        assert_eq!(app.controller().playlist().current_index(), Some(1));

        let saved = codec::read_file(&temp_dir.path().join("playlists").join("session.spf")).unwrap();
        assert_eq!(saved, vec![TrackRef::local(&first), TrackRef::local(&second)]);

        // Volume and mode are remembered
        let config = ConfigManager::with_path(app.config_path().to_path_buf()).unwrap();
        assert_eq!(config.get_config().default_volume, 40);
        assert_eq!(config.get_config().playback_mode, PlaybackMode::Random);
    }

    #[test]
    fn test_interactive_session_ends_at_eof() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = create_test_app(&temp_dir);

        app.run_interactive_mode(Cursor::new(b"status\nlist\n".to_vec())).unwrap();
        assert!(app.config_path().exists());
    }

    #[test]
    fn test_end_of_playlist_through_app() {
        let temp_dir = TempDir::new().unwrap();
        let song = create_test_audio_file(temp_dir.path(), "a.mp3");

        let mut app = create_test_app(&temp_dir);
        app.execute_shell_command(ShellCommand::Add(song.to_string_lossy().to_string()))
            .unwrap();
        app.execute_shell_command(ShellCommand::Play).unwrap();

        let controller = app.controller_mut();
        controller.engine_mut().simulate_duration(1_000);
        controller.engine_mut().simulate_progress(1_000);
        controller.process_events();

        assert_eq!(app.controller().engine().state(), PlaybackState::Stopped);
        assert_eq!(app.controller().playlist().current_index(), None);
    }
}
