//! datapick: pick tables and text blocks out of page snapshots.
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand, ValueEnum};
use datapick::app_state::{AppState, View};
use datapick::config::Config;
use datapick::content::{Emission, PageContext, PointerEvent};
use datapick::messages::Message;
use datapick::node::{NodeId, Page};
use datapick::selection::{Modifiers, Qualifier};
use datapick::table::parse_table_text_with;
use datapick::ui::{self, TuiPresenter};
use datapick::{formats, scan, Error, Result};
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "datapick.log";

#[derive(Parser)]
#[command(name = "datapick")]
#[command(about = "Pick tables and text blocks out of page snapshots", long_about = None)]
struct Args {
    /// Config file to read instead of ./datapick.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Minimum rendered characters for a block to count as dense text
    #[arg(long, global = true)]
    threshold: Option<usize>,

    /// Modifier that turns arrows into wheel gestures (shift, ctrl, alt)
    #[arg(long, global = true)]
    qualifier: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse a page and pick from it interactively
    Browse {
        /// HTML file or JSON snapshot
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// JSON message files to deliver to the page before the session starts
        #[arg(long = "message", value_name = "FILE")]
        messages: Vec<PathBuf>,
    },
    /// Print heading/content pairs found on a page as JSON
    Scan {
        /// HTML file or JSON snapshot
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Parse delimited text into a table and print it as JSON (reads stdin without FILE)
    Parse {
        /// Text file to parse
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Run a scripted pick and print the payload
    Pick {
        /// HTML file or JSON snapshot
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Node to right-click: an element id, or `#N` for an arena index
        #[arg(long, value_name = "ID|#INDEX")]
        at: String,

        /// Wheel steps to apply before committing
        #[arg(long, value_delimiter = ',')]
        steps: Vec<Step>,

        /// Print the launch URL instead of the payload JSON
        #[arg(long)]
        launch_url: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Step {
    /// Narrow or cycle the selection
    In,
    /// Widen the selection
    Out,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = match args.command {
        Command::Browse { .. } => Some(init_file_tracing()),
        _ => {
            init_stderr_tracing();
            None
        }
    };

    let mut cfg = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    // Override config with command line args
    if let Some(threshold) = args.threshold {
        cfg.text_threshold = threshold;
    }
    if let Some(qualifier) = args.qualifier {
        cfg.qualifier = qualifier;
    }

    match args.command {
        Command::Browse { path, messages } => browse(&path, &messages, &cfg),
        Command::Scan { path } => {
            let page = formats::load_path(&path)?;
            let pairs = scan::scan_with(&page, page.body(), cfg.text_threshold);
            println!("{}", serde_json::to_string_pretty(&pairs)?);
            Ok(())
        }
        Command::Parse { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut text = String::new();
                    io::stdin().read_to_string(&mut text)?;
                    text
                }
            };
            let table = parse_table_text_with(&text, cfg.delimiter());
            println!("{}", serde_json::to_string_pretty(&table)?);
            Ok(())
        }
        Command::Pick {
            path,
            at,
            steps,
            launch_url,
        } => pick(&path, &at, &steps, launch_url, &cfg),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

/// The terminal belongs to the TUI, so its logs go to a file in the working directory.
fn init_file_tracing() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();
    guard
}

fn resolve_target(page: &Page, at: &str) -> Result<NodeId> {
    let by_index = at
        .strip_prefix('#')
        .and_then(|index| index.parse().ok())
        .map(NodeId)
        .filter(|&id| page.element(id).is_some());
    by_index
        .or_else(|| page.find_by_element_id(at))
        .ok_or_else(|| Error::Target(at.to_string()))
}

fn qualified(qualifier: Qualifier) -> Modifiers {
    match qualifier {
        Qualifier::Shift => Modifiers::SHIFT,
        Qualifier::Control => Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        },
        Qualifier::Alt => Modifiers {
            alt: true,
            ..Modifiers::NONE
        },
    }
}

fn pick(path: &Path, at: &str, steps: &[Step], launch_url: bool, cfg: &Config) -> Result<()> {
    let page = formats::load_path(path)?;
    let target = resolve_target(&page, at)?;
    let mut ctx = PageContext::new(page, TuiPresenter::new(cfg.use_system_clipboard), cfg);
    let modifiers = qualified(cfg.qualifier());

    ctx.handle_pointer(PointerEvent::ContextMenu(target));
    ctx.handle_message(&Message::Activate);
    for step in steps {
        let Some(live) = ctx.controller().live() else {
            break;
        };
        let delta_y = match step {
            Step::In => 1.0,
            Step::Out => -1.0,
        };
        ctx.handle_pointer(PointerEvent::Wheel {
            target: live,
            delta_y,
            modifiers,
        });
    }

    let live = ctx
        .controller()
        .live()
        .ok_or_else(|| Error::Target(at.to_string()))?;
    let Some(Emission::Clip(commit)) = ctx.handle_pointer(PointerEvent::Click(live)) else {
        return Err(Error::Target(at.to_string()));
    };
    info!(copied = commit.copied, "pick finished");

    if launch_url {
        println!("{}", commit.payload.launch_url(&cfg.launch_scheme)?);
    } else {
        println!("{}", commit.payload.to_json()?);
    }
    Ok(())
}

fn browse(path: &Path, messages: &[PathBuf], cfg: &Config) -> Result<()> {
    let page = formats::load_path(path)?;
    let source = path
        .file_name()
        .map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
    let presenter = TuiPresenter::new(cfg.use_system_clipboard);
    let mut app = AppState::new(page, presenter, cfg, source);
    for message in messages {
        app.receive(&std::fs::read_to_string(message)?)?;
    }
    run_tui(app, cfg)
}

fn run_tui(mut app: AppState, cfg: &Config) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, cfg.qualifier());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    if let Some(commit) = app.clips.last() {
        println!("{}", commit.payload.to_json()?);
    }
    Ok(())
}

fn modifiers_of(keys: KeyModifiers) -> Modifiers {
    Modifiers {
        shift: keys.contains(KeyModifiers::SHIFT),
        ctrl: keys.contains(KeyModifiers::CONTROL),
        alt: keys.contains(KeyModifiers::ALT),
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    qualifier: Qualifier,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if app.view == View::Pairs {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                app.close_modal();
            }
            continue;
        }

        app.message = None;
        let modifiers = modifiers_of(key.modifiers);
        match key.code {
            KeyCode::Char('q') => return Ok(()),
            KeyCode::Up if qualifier.held(modifiers) => app.wheel(-1.0, modifiers),
            KeyCode::Down if qualifier.held(modifiers) => app.wheel(1.0, modifiers),
            KeyCode::Up | KeyCode::Char('k') => app.move_pointer(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_pointer(1),
            KeyCode::PageUp => app.move_pointer(-10),
            KeyCode::PageDown => app.move_pointer(10),
            KeyCode::Home => app.pointer_to_first(),
            KeyCode::End => app.pointer_to_last(),
            KeyCode::Char('g') => app.start_selection(),
            KeyCode::Enter => app.click(),
            KeyCode::Char('s') => app.scan(),
            _ => {}
        }
    }
}
