use super::*;

#[derive(Debug, clap::Subcommand)]
pub(crate) enum Subcommand {
  /// Group every contribution in a thread by author, as JSON
  Authors {
    /// Thread URL or snapshot path
    source: Source,
    /// Write the index here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
  /// Browse the reply tree in the terminal
  Browse {
    /// Thread URL or snapshot path
    source: Source,
  },
  /// Fetch threads, rebuild their reply trees, and write snapshots
  Fetch {
    /// Thread URLs
    #[arg(required = true)]
    urls: Vec<String>,
    /// Ignore cached pages
    #[arg(short, long)]
    force: bool,
    /// Directory snapshots are written to, one `<id>.json` per thread
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
  },
  /// Print the reply tree
  Show {
    /// Thread URL or snapshot path
    source: Source,
    /// Wrap bodies at this many columns
    #[arg(short, long, default_value_t = 80)]
    width: usize,
  },
}

impl Subcommand {
  const MIN_BODY_WIDTH: usize = 20;

  async fn authors(
    source: &Source,
    output: Option<&Path>,
    client: &Client,
  ) -> Result {
    let article = source.load(client).await?;

    let index = AuthorIndex::build(&article);

    let json = serde_json::to_string_pretty(&index)?;

    match output {
      Some(path) => fs::write(path, format!("{json}\n"))
        .with_context(|| format!("could not write {}", path.display()))?,
      None => println!("{json}"),
    }

    info!(
      top_level = article.comments.len(),
      authors = index.len(),
      "indexed contributions"
    );

    Ok(())
  }

  async fn browse(source: &Source, client: &Client) -> Result {
    let article = source.load(client).await?;

    let mut terminal = initialize_terminal()?;

    let result =
      App::new(article, source.url().map(str::to_string)).run(&mut terminal);

    restore_terminal(&mut terminal)?;

    result
  }

  /// Writes each snapshot as soon as its thread loads. A thread that fails
  /// is reported and skipped; the command fails once all are done.
  async fn fetch(
    urls: &[String],
    force: bool,
    output_dir: &Path,
    client: &Client,
  ) -> Result {
    let mut threads = pin!(client.fetch_threads(urls, force));

    let mut failed = 0usize;

    while let Some((url, result)) = threads.next().await {
      let article = match result {
        Ok(article) => article,
        Err(error) => {
          warn!(%url, "{error:#}");
          failed += 1;
          continue;
        }
      };

      let path = output_dir.join(format!("{}.json", article.id));

      article.save(&path)?;

      info!(
        id = %article.id,
        comments = article.comment_count(),
        path = %path.display(),
        "wrote snapshot"
      );

      println!("{}", path.display());
    }

    ensure!(
      failed == 0,
      "{failed} of {} threads could not be fetched",
      urls.len()
    );

    Ok(())
  }

  /// Renders a thread as indented text, article first.
  fn render(article: &ArticleRecord, width: usize) -> Result<String> {
    let mut rendered = String::new();

    rendered.push_str(&article.title);
    rendered.push('\n');

    if !article.published_at.is_empty() {
      rendered.push_str(&format!("{} · {}\n", article.author, article.published_at));
    }

    rendered.push('\n');

    for line in Self::render_markup(&article.body_markup, width)?.lines() {
      rendered.push_str(line);
      rendered.push('\n');
    }

    for (depth, record) in CommentRecord::walk(&article.comments) {
      let indent = "  ".repeat(depth);

      rendered.push('\n');
      rendered.push_str(&format!("{indent}- {}\n", record.header()));

      let body_width = width
        .saturating_sub(indent.len() + 2)
        .max(Self::MIN_BODY_WIDTH);

      let body = Self::render_markup(&record.body_markup, body_width)
        .with_context(|| format!("could not render comment {}", record.id))?;

      for line in body.lines().filter(|line| !line.trim().is_empty()) {
        rendered.push_str(&format!("{indent}  {line}\n"));
      }
    }

    Ok(rendered)
  }

  fn render_markup(markup: &str, width: usize) -> Result<String> {
    html2text::from_read(markup.as_bytes(), width.max(Self::MIN_BODY_WIDTH))
      .map_err(|error| anyhow!("could not render markup: {error}"))
  }

  pub(crate) async fn run(self, client: &Client) -> Result {
    match self {
      Self::Authors { source, output } => {
        Self::authors(&source, output.as_deref(), client).await
      }
      Self::Browse { source } => Self::browse(&source, client).await,
      Self::Fetch {
        urls,
        force,
        output_dir,
      } => Self::fetch(&urls, force, &output_dir, client).await,
      Self::Show { source, width } => {
        let article = source.load(client).await?;
        print!("{}", Self::render(&article, width)?);
        Ok(())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    crate::{cache::MemoryCache, comment_record::comment},
    std::sync::atomic::{AtomicUsize, Ordering},
  };

  static COUNTER: AtomicUsize = AtomicUsize::new(0);

  #[test]
  fn render_indents_replies_under_parents() {
    let mut root = comment("1", "alice", "hello");
    root.published_at = "2026-01-08 10:00".into();
    root.children.push(comment("2", "bob", "reply"));

    let article = ArticleRecord {
      author: "楼主".into(),
      body_markup: "<p>intro</p>".into(),
      comments: vec![root, comment("3", "carol", "later")],
      id: "1".into(),
      published_at: "2026-01-08 09:30".into(),
      title: "Rates".into(),
    };

    let rendered = Subcommand::render(&article, 80).unwrap();

    assert!(rendered.starts_with("Rates\n楼主 · 2026-01-08 09:30\n\nintro\n"));
    assert!(rendered.contains("\n- alice · 2026-01-08 10:00\n  hello\n"));
    assert!(rendered.contains("\n  - bob\n    reply\n"));
    assert!(rendered.contains("\n- carol\n  later\n"));
  }

  #[tokio::test]
  async fn fetch_writes_loaded_threads_despite_failures() {
    let url = "https://www.jisilu.cn/question/517247";

    let cache = MemoryCache::default();

    cache
      .put(
        &cache::key(url),
        r#"<div class="aw-mod-head"><h1>Rates</h1></div>"#,
      )
      .unwrap();

    let client = Client::new(Arc::new(cache)).unwrap();

    let output_dir = env::temp_dir().join(format!(
      "replytree_fetch_test_{}",
      COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    let error = Subcommand::fetch(
      &["https://example.com/question/1".to_string(), url.to_string()],
      false,
      &output_dir,
      &client,
    )
    .await
    .unwrap_err();

    assert_eq!(error.to_string(), "1 of 2 threads could not be fetched");

    let article = ArticleRecord::load(&output_dir.join("517247.json")).unwrap();

    assert_eq!(article.title, "Rates");

    let _ = fs::remove_dir_all(output_dir);
  }

  #[test]
  fn fetch_requires_a_url() {
    assert!(Arguments::try_parse_from(["replytree", "fetch"]).is_err());
  }
}
