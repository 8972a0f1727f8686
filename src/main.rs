//! Folio: book search and recommendation client
//!
//! Usage:
//!   folio                        - Open the window
//!   folio search <query>         - Print search results
//!   folio recommend [--uid U] [q] - Print recommendations
//!   folio feedback [--uid U] <id> [action] - Send a feedback event
//!   folio theme [mode] [color]   - Show or set the theme
//!   folio config [init]          - Show or create the config file
//!   folio docs                   - Open the backend API docs
//!   folio help                   - Show help

use std::env;
use std::process::ExitCode;

use folio::app::Folio;
use folio::backend::{BackendClient, FeedbackEvent};
use folio::commands::CliCommand;
use folio::config::{self, Config};
use folio::controller::{RECOMMEND_FAILED, SEARCH_EMPTY, SEARCH_FAILED};
use folio::theme::{appearance, ColorPreset, FileThemeStore, MemoryThemeStore, ThemeMode, ThemeService, ThemeStore};
use iced::{window, Size};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    // Initialize logging (use try_init to avoid panic if already initialized)
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args: Vec<String> = env::args().skip(1).collect();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match CliCommand::parse(&args) {
        CliCommand::Gui => match start_gui(config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("GUI error: {}", e);
                ExitCode::FAILURE
            }
        },
        CliCommand::Help => {
            println!("{}", CliCommand::help_text());
            ExitCode::SUCCESS
        }
        CliCommand::Invalid { message } => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
        CliCommand::Theme { mode, color } => handle_theme(mode, color),
        CliCommand::Config { init } => match handle_config(init, &config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        CliCommand::Docs => {
            let backend = BackendClient::new(&config.api_url);
            match folio::native::open::open_url(&backend.docs_url()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        command => handle_backend_command(command, &config),
    }
}

fn handle_backend_command(command: CliCommand, config: &Config) -> ExitCode {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let backend = BackendClient::new(&config.api_url);
    tracing::debug!("Backend at {}", backend.base_url());

    rt.block_on(async {
        match command {
            CliCommand::Search { query } => match backend.search(&query, config.search_limit).await {
                Ok(items) if items.is_empty() => {
                    println!("{}", SEARCH_EMPTY);
                    ExitCode::SUCCESS
                }
                Ok(items) => {
                    for item in &items {
                        let year = item.display_year().map(|y| format!(" ({})", y)).unwrap_or_default();
                        println!("[{}] {} - {}{}", item.id, item.title, item.display_author(), year);
                        let tags = item.display_tags();
                        if !tags.is_empty() {
                            println!("      {}", tags.join(" · "));
                        }
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e.user_message(SEARCH_FAILED));
                    ExitCode::FAILURE
                }
            },
            CliCommand::Recommend { uid, query } => {
                let uid = uid.unwrap_or_else(|| config.default_uid.clone());
                match backend.recommend(&uid, &query, config.recommend_k).await {
                    Ok(recs) if recs.is_empty() => {
                        println!("No recommendations yet.");
                        ExitCode::SUCCESS
                    }
                    Ok(recs) => {
                        for rec in &recs {
                            println!("[{}] {} - {}  {}", rec.item_id, rec.title, rec.display_author(), rec.display_score());
                            if !rec.reason_tags().is_empty() {
                                println!("      {}", rec.reason_tags().join(" · "));
                            }
                        }
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        eprintln!("Error: {}", e.user_message(RECOMMEND_FAILED));
                        ExitCode::FAILURE
                    }
                }
            }
            CliCommand::Feedback { uid, item_id, action } => {
                let event = FeedbackEvent {
                    uid: uid.unwrap_or_else(|| config.default_uid.clone()),
                    item_id,
                    action,
                };
                match backend.send_feedback(&event).await {
                    Ok(()) => {
                        println!("Feedback recorded");
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        eprintln!("Feedback failed: {}", e);
                        ExitCode::FAILURE
                    }
                }
            }
            other => {
                eprintln!("Unexpected command: {:?}", other);
                ExitCode::FAILURE
            }
        }
    })
}

fn handle_config(init: bool, config: &Config) -> folio::Result<()> {
    let path = Config::default_path()?;
    if init {
        Config::init_at(&path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn handle_theme(mode: Option<ThemeMode>, color: Option<ColorPreset>) -> ExitCode {
    let store = match config::config_dir() {
        Ok(dir) => FileThemeStore::in_dir(&dir),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let path = store.path().to_path_buf();

    let mut themes = ThemeService::new(Box::new(store), appearance::prefers_dark());
    if mode.is_some() || color.is_some() {
        let current = themes.get().settings;
        themes.set(mode.unwrap_or(current.mode), color.unwrap_or(current.color));
    }

    let applied = themes.get();
    println!(
        "mode: {}  color: {}  active: {}",
        applied.settings.mode,
        applied.settings.color,
        applied.resolved.label()
    );
    println!("stored in {}", path.display());
    ExitCode::SUCCESS
}

fn start_gui(config: Config) -> iced::Result {
    tracing::info!("Starting Folio against {}", config.api_url);

    let store: Box<dyn ThemeStore> = match config::config_dir() {
        Ok(dir) => Box::new(FileThemeStore::in_dir(&dir)),
        Err(e) => {
            tracing::warn!("{}; theme settings will not persist", e);
            Box::new(MemoryThemeStore::default())
        }
    };
    let os_dark = appearance::prefers_dark();

    iced::application(Folio::title, Folio::update, Folio::view)
        .subscription(Folio::subscription)
        .theme(Folio::theme)
        .window(window::Settings {
            size: Size::new(1100.0, 800.0),
            position: window::Position::Centered,
            min_size: Some(Size::new(640.0, 480.0)),
            ..Default::default()
        })
        .antialiasing(true)
        .run_with(move || Folio::new(&config, store, os_dark))
}
