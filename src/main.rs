//! livefeed: a live-updating news reader for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────────┐ PageLoaded ┌──────────┐  draw()  ┌──────────┐
//! │  effects.rs  │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (tokio task) │            │  feed/   │          │ (render) │
//! └──────────────┘            │ (state)  │          └──────────┘
//! ┌──────────────┐  LiveItem  │          │
//! │   live/      │ ─────────► │          │ ◄─── input.rs
//! │ (websocket)  │ Connection └──────────┘
//! └──────────────┘
//! ```
//!
//! * **`news/`**: the `NewsItem` wire type and the listing client.
//! * **`feed/`**: per-feed state (page, pending buffer, dedup) and the
//!   store that is its only writer.
//! * **`live/`**: the push channel with its reconnect loop.
//! * **`effects`**: runs page fetches on the tokio runtime.
//! * **`app`**: UI-side state on top of the store.
//! * **`ui`** / **`input`**: rendering and key bindings.
//! * **`main`**: parse args, set up logging and the terminal, run the loop.

mod app;
mod config;
mod effects;
mod feed;
mod input;
mod live;
mod logging;
mod news;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::info;

use app::App;
use config::Args;
use effects::EffectRunner;
use feed::FeedStore;
use live::{LiveHandle, Router};
use news::{HttpNewsApi, NewsApi};

// ---------------------------------------------------------------------------
// RAII terminal guard: restores the terminal even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before printing a panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(&args.log_file)?;
    install_panic_hook();

    let categories = args.categories();
    let push_url = args.push_url()?;
    info!(api = %args.api_base, push = %push_url, feeds = categories.len(), "starting");

    // -- background work runs on tokio; the UI loop stays on this thread -----
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let api: Arc<dyn NewsApi> = Arc::new(HttpNewsApi::new(
        reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?,
        args.api_base.clone(),
    ));
    let runner = EffectRunner::new(runtime.handle().clone(), api, tx.clone());
    let live = LiveHandle::spawn(
        runtime.handle(),
        push_url,
        args.backoff(),
        args.connect_timeout(),
        Router::new(&categories),
        tx,
    );

    let mut app = App::new(FeedStore::new(categories));
    runner.run(app.start());

    // -- terminal setup (RAII: Drop restores on exit or panic) ---------------
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Apply everything the background tasks reported.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = rx.try_recv() {
            runner.run(app.apply(msg));
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                runner.run(input::handle_key_event(&mut app, key));
            }
        }

        if app.quit {
            break;
        }
    }

    // Session teardown: no reconnection after this point.
    drop(guard);
    runtime.block_on(async {
        let _ = tokio::time::timeout(Duration::from_secs(1), live.close()).await;
    });
    runtime.shutdown_timeout(Duration::from_secs(1));
    info!("stopped");
    Ok(())
}
