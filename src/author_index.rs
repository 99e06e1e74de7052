use super::*;

/// Everything each author wrote in a thread, in document order.
///
/// Authors keep the order they were first seen in, and the index serializes
/// as a JSON object in that same order.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct AuthorIndex {
  entries: Vec<(String, Vec<String>)>,
  positions: HashMap<String, usize>,
}

impl AuthorIndex {
  /// Indexes the article's own body first, then every comment in pre-order.
  pub(crate) fn build(article: &ArticleRecord) -> Self {
    let mut index = Self::default();

    index.push(&article.author, markup::text(&article.body_markup));

    for (_, record) in CommentRecord::walk(&article.comments) {
      index.push(&record.author, record.body_text.clone());
    }

    index
  }

  #[cfg(test)]
  pub(crate) fn contributions(&self, author: &str) -> Option<&[String]> {
    self
      .positions
      .get(author)
      .map(|&position| self.entries[position].1.as_slice())
  }

  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }

  fn push(&mut self, author: &str, text: String) {
    if author.is_empty() || text.is_empty() {
      return;
    }

    let position = *self
      .positions
      .entry(author.to_string())
      .or_insert(self.entries.len());

    if position == self.entries.len() {
      self.entries.push((author.to_string(), Vec::new()));
    }

    self.entries[position].1.push(text);
  }
}

impl Serialize for AuthorIndex {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;

    for (author, texts) in &self.entries {
      map.serialize_entry(author, texts)?;
    }

    map.end()
  }
}

#[cfg(test)]
mod tests {
  use {super::*, crate::comment_record::comment};

  fn article(comments: Vec<CommentRecord>) -> ArticleRecord {
    ArticleRecord {
      author: "root_user".into(),
      body_markup: "<p>intro</p>".into(),
      comments,
      id: "1".into(),
      published_at: String::new(),
      title: "title".into(),
    }
  }

  #[test]
  fn article_body_comes_first_as_plain_text() {
    let index = AuthorIndex::build(&article(vec![comment(
      "1",
      "root_user",
      "thanks",
    )]));

    assert_eq!(
      index.contributions("root_user"),
      Some(["intro".to_string(), "thanks".to_string()].as_slice())
    );
    assert_eq!(index.len(), 1);
  }

  #[test]
  fn comments_are_grouped_in_document_order() {
    let mut first = comment("1", "alice", "a1");
    let mut reply = comment("2", "bob", "b1");
    reply.children.push(comment("3", "alice", "a2"));
    first.children.push(reply);

    let index =
      AuthorIndex::build(&article(vec![first, comment("4", "bob", "b2")]));

    assert_eq!(
      serde_json::to_string(&index).unwrap(),
      r#"{"root_user":["intro"],"alice":["a1","a2"],"bob":["b1","b2"]}"#
    );
  }

  #[test]
  fn empty_authors_and_texts_are_skipped() {
    let mut thread = article(vec![comment("1", "", "orphan"), comment("2", "bob", "")]);
    thread.body_markup = "<p> </p>".into();

    let index = AuthorIndex::build(&thread);

    assert_eq!(index, AuthorIndex::default());
    assert_eq!(serde_json::to_string(&index).unwrap(), "{}");
  }

  #[test]
  fn deep_chains_are_indexed_without_recursion() {
    let mut node = comment("0", "user0", "text 0");

    for i in 1..500 {
      let mut parent = comment(&i.to_string(), "user", &format!("text {i}"));
      parent.children.push(node);
      node = parent;
    }

    let index = AuthorIndex::build(&article(vec![node]));

    assert_eq!(index.contributions("user").unwrap().len(), 499);
    assert_eq!(
      index.contributions("user0"),
      Some(["text 0".to_string()].as_slice())
    );
  }
}
