use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

mod api;
mod app;
mod ui;

use api::ApiClient;
use app::{App, AppEvent};

/// Discussion poll period for the displayed post.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // The terminal belongs to the TUI, so logs go to a file instead.
    if std::env::var_os("RUST_LOG").is_some() {
        let path =
            std::env::var("ROOST_LOG_FILE").unwrap_or_else(|_| "roost.log".to_string());
        let file = std::fs::File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let server_url =
        std::env::var("ROOST_SERVER_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let mut api = ApiClient::new(&server_url);
    let _ = api.load_tokens();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(api);
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(100);

    // Spawn input handler
    let tx_input = tx.clone();
    tokio::spawn(async move {
        loop {
            if event::poll(Duration::from_millis(100)).unwrap_or(false) {
                if let Ok(Event::Key(key)) = event::read() {
                    if key.kind == KeyEventKind::Press {
                        let _ = tx_input.send(AppEvent::Key(key)).await;
                    }
                }
            }
            // Send tick events for UI refresh
            let _ = tx_input.send(AppEvent::Tick).await;
        }
    });

    // Spawn the fixed-interval discussion poller
    let tx_poll = tx.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        ticker.tick().await; // the first tick completes immediately
        loop {
            ticker.tick().await;
            if tx_poll.send(AppEvent::Poll).await.is_err() {
                break;
            }
        }
    });

    // Resolve the stored session (or fall through to anonymous browsing)
    let tx_verify = tx.clone();
    tokio::spawn(async move {
        let _ = tx_verify.send(AppEvent::VerifyAuth).await;
    });

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if let Some(event) = rx.recv().await {
            match event {
                AppEvent::Key(key) => {
                    if app.handle_key(key, tx.clone()).await? {
                        return Ok(());
                    }
                }
                AppEvent::Tick => {
                    // Just refresh UI
                }
                AppEvent::Poll => {
                    app.on_poll().await;
                }
                AppEvent::VerifyAuth => {
                    app.verify_auth().await;
                }
                AppEvent::AuthSuccess => {
                    app.on_auth_success().await;
                }
                AppEvent::AuthFailed(msg) => {
                    app.on_auth_failed(msg);
                }
            }
        }
    }
}
