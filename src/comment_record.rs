use super::*;

/// One reader comment, as extracted from the page and placed in the reply
/// tree.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct CommentRecord {
  pub(crate) author: String,
  #[serde(default, rename = "author_avatar")]
  pub(crate) avatar_url: Option<String>,
  /// Body markup with any quotation removed.
  #[serde(rename = "content")]
  pub(crate) body_markup: String,
  /// Plain text of the full body, quotation included. Reply matching runs
  /// against this.
  #[serde(default, rename = "content_text")]
  pub(crate) body_text: String,
  #[serde(default)]
  pub(crate) children: Vec<CommentRecord>,
  pub(crate) id: String,
  #[serde(default)]
  pub(crate) location: Option<String>,
  #[serde(default, rename = "reply_to_user")]
  pub(crate) mention_target: Option<String>,
  #[serde(rename = "time")]
  pub(crate) published_at: String,
  #[serde(skip)]
  pub(crate) quoted_excerpt: Option<String>,
  #[serde(skip)]
  pub(crate) sort_key: i64,
}

impl CommentRecord {
  pub(crate) fn header(&self) -> String {
    let mut header = self.author.clone();

    if !self.published_at.is_empty() {
      header.push_str(" · ");
      header.push_str(&self.published_at);
    }

    if let Some(location) = &self.location {
      header.push_str(" · ");
      header.push_str(location);
    }

    if let Some(target) = &self.mention_target {
      header.push_str(" → @");
      header.push_str(target);
    }

    header
  }

  /// Pre-order walk of a forest, paired with each record's depth.
  pub(crate) fn walk(forest: &[CommentRecord]) -> Vec<(usize, &CommentRecord)> {
    let mut ordered = Vec::new();

    let mut stack = forest
      .iter()
      .rev()
      .map(|record| (0usize, record))
      .collect::<Vec<_>>();

    while let Some((depth, record)) = stack.pop() {
      ordered.push((depth, record));

      stack.extend(
        record
          .children
          .iter()
          .rev()
          .map(|child| (depth.saturating_add(1), child)),
      );
    }

    ordered
  }
}

#[cfg(test)]
pub(crate) fn comment(id: &str, author: &str, text: &str) -> CommentRecord {
  CommentRecord {
    author: author.to_string(),
    avatar_url: None,
    body_markup: format!("<div class=\"markitup-box\">{text}</div>"),
    body_text: text.to_string(),
    children: Vec::new(),
    id: id.to_string(),
    location: None,
    mention_target: None,
    published_at: String::new(),
    quoted_excerpt: None,
    sort_key: 0,
  }
}
