use {
  action::Action,
  anyhow::{Context, anyhow, bail, ensure},
  app::App,
  arguments::Arguments,
  article_record::ArticleRecord,
  author_index::AuthorIndex,
  cache::{Cache, FileCache},
  chrono::NaiveDateTime,
  clap::Parser,
  client::Client,
  comment_entry::CommentEntry,
  comment_record::CommentRecord,
  comment_view::CommentView,
  crossterm::{
    event as crossterm_event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Stylize,
    terminal::{
      EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
      enable_raw_mode,
    },
  },
  extract::extract_all,
  futures::stream::{self, Stream, StreamExt},
  help_view::HelpView,
  markup::{Document, Element, Selector},
  normalize::normalize,
  page::{ArticleFragment, Page},
  ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
  },
  regex::Regex,
  reply_tree::build_tree,
  serde::{Deserialize, Serialize, Serializer, ser::SerializeMap},
  sha2::{Digest, Sha256},
  source::Source,
  std::{
    backtrace::BacktraceStatus,
    collections::HashMap,
    env, fs,
    io::{self, IsTerminal, Stdout},
    mem,
    path::{Path, PathBuf},
    pin::pin,
    process,
    sync::{Arc, LazyLock},
    time::{Duration, Instant},
  },
  subcommand::Subcommand,
  timestamp::Timestamp,
  tracing::{debug, info, trace, warn},
  tracing_subscriber::EnvFilter,
  utils::{truncate, wrap_text},
  uuid::Uuid,
};

mod action;
mod app;
mod arguments;
mod article_record;
mod author_index;
mod cache;
mod client;
mod comment_entry;
mod comment_record;
mod comment_view;
mod extract;
mod help_view;
mod markup;
mod normalize;
mod page;
mod reply_tree;
mod source;
mod subcommand;
mod timestamp;
mod utils;

const BASE_INDENT: &str = " ";

const BROWSE_STATUS: &str = "↑/k up • ↓/j down • ←/h collapse • →/l expand • enter toggle • o open thread • q/esc quit • ? help";

const HELP_STATUS: &str = "Press ? or esc to close help";
const HELP_TITLE: &str = "Help";

const HELP_TEXT: &str = "\
Navigation:
  ↑ / k   move selection up
  ↓ / j   move selection down
  pg↓     page down
  pg↑     page up
  ctrl+d  page down
  ctrl+u  page up
  home    jump to first comment
  end     jump to last comment

Replies:
  ← / h   collapse or go to parent
  → / l   expand or go to first reply
  enter   toggle collapse or expand

Actions:
  o       open the thread in your browser
  q       quit
  esc     close help or quit
  ?       toggle this help
";

type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;

fn initialize_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
  enable_raw_mode()?;

  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen)?;

  Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn initialize_tracing() {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
    )
    .with_writer(io::stderr)
    .init();
}

fn restore_terminal(
  terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result {
  disable_raw_mode()?;

  execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

  terminal.show_cursor()?;

  Ok(())
}

#[tokio::main]
async fn main() {
  initialize_tracing();

  if let Err(error) = Arguments::parse().run().await {
    let use_color = io::stderr().is_terminal();

    if use_color {
      eprintln!("{} {error}", "error:".bold().red());
    } else {
      eprintln!("error: {error}");
    }

    for (i, error) in error.chain().skip(1).enumerate() {
      if i == 0 {
        eprintln!();

        if use_color {
          eprintln!("{}", "because:".bold().red());
        } else {
          eprintln!("because:");
        }
      }

      if use_color {
        eprintln!("{} {error}", "-".bold().red());
      } else {
        eprintln!("- {error}");
      }
    }

    let backtrace = error.backtrace();

    if backtrace.status() == BacktraceStatus::Captured {
      if use_color {
        eprintln!("{}", "backtrace:".bold().red());
      } else {
        eprintln!("backtrace:");
      }

      eprintln!("{backtrace}");
    }

    process::exit(1);
  }
}
