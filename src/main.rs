use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use shared_connect_four::config::AppConfig;
use shared_connect_four::logging;
use shared_connect_four::sync::{DirStore, Invocation, SyncChannel};
use shared_connect_four::ui::App;

/// Play Connect Four in the terminal, mirrored across every instance that
/// opens the same game.
#[derive(Parser)]
#[command(name = "shared-connect-four", about = "Two-player Connect Four shared between terminals")]
struct Cli {
    /// Game to join: a bare id, `?game=<id>`, or a URL carrying it.
    /// A new game id is generated when omitted.
    game: Option<String>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "connect4.toml")]
    config: PathBuf,

    /// Override the shared store directory
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml().context("serializing default config")?);
        return Ok(());
    }

    let loaded = AppConfig::load_optional(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let from_file = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    if let Some(dir) = cli.store_dir {
        config.store.dir = dir;
    }

    logging::init(&config.logging)
        .with_context(|| format!("opening log file {}", config.logging.file.display()))?;
    if !from_file {
        warn!(path = %cli.config.display(), "config file not found, using defaults");
    }

    let invocation = Invocation::resolve(cli.game.as_deref(), &mut rand::rng())
        .context("reading game id")?;
    let game_id = invocation.game_id.clone();
    info!(game = %game_id, generated = invocation.generated, "starting");

    let store = DirStore::open(&config.store.dir)
        .with_context(|| format!("opening store {}", config.store.dir.display()))?;
    let channel = SyncChannel::new(store, game_id.clone(), config.players.names());
    let mut app = App::new(channel, config.players.names(), &config.ui);

    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res.context("running game")?;

    println!(
        "Game {game_id}. Rejoin or share with: shared-connect-four '{}'",
        game_id.share_query()
    );
    Ok(())
}
