use super::*;

/// Where a thread comes from: a forum URL or a snapshot on disk.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Source {
  Snapshot(PathBuf),
  Url(String),
}

impl Source {
  pub(crate) async fn load(&self, client: &Client) -> Result<ArticleRecord> {
    match self {
      Self::Snapshot(path) => ArticleRecord::load(path),
      Self::Url(url) => client.fetch_thread(url, false).await,
    }
  }

  /// The page a reader can open for this thread, if there is one.
  pub(crate) fn url(&self) -> Option<&str> {
    match self {
      Self::Snapshot(_) => None,
      Self::Url(url) => Some(url),
    }
  }
}

impl std::str::FromStr for Source {
  type Err = anyhow::Error;

  fn from_str(value: &str) -> Result<Self> {
    let value = value.trim();

    if value.is_empty() {
      bail!("source must be a URL or a snapshot path");
    }

    if value.starts_with("http://") || value.starts_with("https://") {
      Ok(Self::Url(value.to_string()))
    } else {
      Ok(Self::Snapshot(PathBuf::from(value)))
    }
  }
}
