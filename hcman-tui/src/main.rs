/*!
 * HCMAN Bluetooth Manager TUI
 * Scan and connect through hccontrol from the terminal
 * Onyx Digital Intelligence Development LLC
 */

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    Terminal,
};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::time::{interval, Duration};

use hcman_core::{ActivityLog, ManagerConfig, SystemOrchestrator};

mod app;
mod ui;

use app::App;
use ui::render_ui;

#[derive(Parser)]
#[command(name = "hcman-tui")]
#[command(about = "HCMAN Bluetooth Manager TUI")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "/usr/local/etc/hcman.toml")]
    config: String,

    /// Write debug tracing to this file
    #[arg(short, long)]
    debug: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Tracing must not share the terminal with the UI
    if let Some(path) = &cli.debug {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter("hcman_core=debug,hcman_tui=debug")
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    let config = ManagerConfig::load(&cli.config)?;
    let orchestrator = Arc::new(SystemOrchestrator::from_config(&config)?);
    orchestrator.log().action("Bluetooth Manager started");

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(orchestrator);
    let result = run(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run<B, R, L>(terminal: &mut Terminal<B>, app: &mut App<R, L>) -> Result<()>
where
    B: ratatui::backend::Backend,
    R: hcman_core::CommandRunner + 'static,
    L: ActivityLog + 'static,
{
    let mut ticker = interval(Duration::from_millis(100));

    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if app.notice.is_some() {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                        app.dismiss_notice();
                    }
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') if !app.is_busy() => return Ok(()),
                    KeyCode::Up => app.previous_device(),
                    KeyCode::Down => app.next_device(),
                    KeyCode::Char('s') => app.start_scan(),
                    KeyCode::Enter | KeyCode::Char('c') => app.start_connect(),
                    _ => {}
                }
            }
        }

        ticker.tick().await;
        app.poll().await;
    }
}
