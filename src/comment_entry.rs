use super::*;

/// One row of the tree browser: a comment flattened out of the forest.
pub(crate) struct CommentEntry {
  pub(crate) body: String,
  pub(crate) children: Vec<usize>,
  pub(crate) depth: usize,
  /// Size of the subtree below this entry, counted by `CommentView::new`.
  pub(crate) descendants: usize,
  pub(crate) expanded: bool,
  pub(crate) header: String,
  pub(crate) parent: Option<usize>,
}

impl CommentEntry {
  pub(crate) fn has_children(&self) -> bool {
    !self.children.is_empty()
  }

  pub(crate) fn new(
    record: &CommentRecord,
    depth: usize,
    parent: Option<usize>,
  ) -> Self {
    Self {
      body: markup::text(&record.body_markup),
      children: Vec::new(),
      depth,
      descendants: 0,
      expanded: true,
      header: record.header(),
      parent,
    }
  }

  /// The toggle marker shown before the header, if the entry has replies.
  pub(crate) fn toggle(&self) -> Option<String> {
    if !self.has_children() {
      return None;
    }

    Some(if self.expanded {
      "[-]".to_string()
    } else {
      match self.descendants {
        1 => "[+] 1 reply".to_string(),
        count => format!("[+] {count} replies"),
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use {super::*, crate::comment_record::comment};

  #[test]
  fn new_renders_body_without_markup() {
    let mut record = comment("1", "alice", "ignored");
    record.body_markup = "<div><p>a &amp; b</p><p>c</p></div>".into();

    let entry = CommentEntry::new(&record, 2, Some(0));

    assert_eq!(entry.body, "a & b c");
    assert_eq!(entry.header, "alice");
    assert_eq!(entry.depth, 2);
    assert_eq!(entry.parent, Some(0));
  }

  #[test]
  fn toggle_counts_hidden_replies() {
    let mut entry = CommentEntry::new(&comment("1", "alice", ""), 0, None);

    assert_eq!(entry.toggle(), None);

    entry.children.push(1);
    entry.descendants = 2;

    assert_eq!(entry.toggle().as_deref(), Some("[-]"));

    entry.expanded = false;

    assert_eq!(entry.toggle().as_deref(), Some("[+] 2 replies"));
  }
}
