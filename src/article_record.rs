use super::*;

/// A thread: the root article and the reply forest under it.
///
/// Serialized as the thread snapshot written by `fetch` and read back by the
/// other commands.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct ArticleRecord {
  #[serde(default)]
  pub(crate) author: String,
  #[serde(rename = "content")]
  pub(crate) body_markup: String,
  #[serde(default)]
  pub(crate) comments: Vec<CommentRecord>,
  #[serde(default)]
  pub(crate) id: String,
  #[serde(default, rename = "publish_time")]
  pub(crate) published_at: String,
  pub(crate) title: String,
}

impl ArticleRecord {
  pub(crate) fn comment_count(&self) -> usize {
    CommentRecord::walk(&self.comments).len()
  }

  fn ensure_parent_dir(path: &Path) -> Result {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }

    Ok(())
  }

  pub(crate) fn load(path: &Path) -> Result<Self> {
    let data = fs::read(path)
      .with_context(|| format!("could not read snapshot {}", path.display()))?;

    serde_json::from_slice(&data)
      .with_context(|| format!("invalid snapshot {}", path.display()))
  }

  /// Runs the whole reconstruction over one split page: extract every
  /// comment, order them by time, and build the reply tree.
  pub(crate) fn reconstruct(id: String, page: Page) -> Self {
    let Page { article, comments } = page;

    let fragments = comments.len();

    let records = normalize(extract_all(comments));

    let extracted = records.len();

    let comments = build_tree(records);

    info!(
      %id,
      fragments,
      extracted,
      top_level = comments.len(),
      "reconstructed thread"
    );

    let ArticleFragment {
      author,
      body_markup,
      published_at,
      title,
    } = article;

    Self {
      author,
      body_markup,
      comments,
      id,
      published_at,
      title,
    }
  }

  pub(crate) fn save(&self, path: &Path) -> Result {
    Self::ensure_parent_dir(path)?;

    let serialized = serde_json::to_vec_pretty(self)?;

    fs::write(path, serialized)
      .with_context(|| format!("could not write snapshot {}", path.display()))?;

    Ok(())
  }
}
