use anyhow::{bail, Context, Result};
use crossterm::{
    execute,
    event::{EnableMouseCapture, DisableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notekeep_tui::{config::{default_config_path, load_config}, App, EventHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config: Option<PathBuf>,
    data: Option<PathBuf>,
    server: Option<String>,
    log: Option<PathBuf>,
    help: bool,
    version: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .with_context(|| format!("{} requires a value", name))
        };
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "-V" | "--version" => parsed.version = true,
            "-c" | "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
            "-d" | "--data" => parsed.data = Some(PathBuf::from(value("--data")?)),
            "-s" | "--server" => parsed.server = Some(value("--server")?),
            "--log" => parsed.log = Some(PathBuf::from(value("--log")?)),
            other => bail!("Unknown argument: {}", other),
        }
    }

    Ok(parsed)
}

fn print_help() {
    println!("notekeep {}", VERSION);
    println!("Browse, filter, like and delete notes from a notes server.");
    println!();
    println!("USAGE:");
    println!("    notekeep [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>   Config file (default: {})", default_config_path().display());
    println!("    -d, --data <DIR>      Read notes-data.json and categories-data.json from DIR");
    println!("    -s, --server <URL>    Notes server base URL");
    println!("        --log <PATH>      Log file (level from RUST_LOG, default info)");
    println!("    -h, --help            Print help");
    println!("    -V, --version         Print version");
}

fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notekeep")
        .join("notekeep.log")
}

/// Log to a file; the terminal belongs to the UI while it runs.
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        print_help();
        return Ok(());
    }
    if args.version {
        println!("notekeep {}", VERSION);
        return Ok(());
    }

    init_logging(&args.log.clone().unwrap_or_else(default_log_path))?;

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut config = load_config(&config_path)?;
    if let Some(server) = args.server {
        config.server.base_url = server;
    }
    if let Some(dir) = args.data {
        config.data.dir = Some(dir);
    }
    log::info!("Starting notekeep {} against {}", VERSION, config.server.base_url);

    // Create app before touching the terminal so load errors print normally
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create event handler
    let event_handler = EventHandler::new(250); // 250ms tick rate

    // Main loop
    let result = run_app(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Print result
    if let Err(err) = result {
        log::error!("Exited with error: {:?}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| notekeep_tui::ui::render(f, app))?;

        // Handle events
        let event = event_handler.next()?;
        match event {
            notekeep_tui::Event::Key(key) => {
                notekeep_tui::event::handle_key_event(key, app);
            }
            notekeep_tui::Event::Mouse(mouse) => {
                notekeep_tui::event::handle_mouse_event(mouse, app);
            }
            notekeep_tui::Event::Tick => {}
        }
        // Completions and toast expiry are applied after every event
        app.tick();

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
