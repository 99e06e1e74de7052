//! Reconstruction of the reply tree from a flat, time-ordered comment list.
//!
//! The forum records no parent ids. A comment may open with `@name` and may
//! embed a quotation of an earlier comment, and those two signals are all
//! there is to go on. Each comment is placed in one pass, looking only at
//! comments placed before it, so the result is acyclic by construction.

use super::*;

/// The signal that attached a comment to its parent, strongest first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Rule {
  MentionAndQuote,
  MentionOnly,
  QuoteOnly,
}

impl Rule {
  const PRIORITY: [Rule; 3] =
    [Rule::MentionAndQuote, Rule::MentionOnly, Rule::QuoteOnly];

  fn applies(self, record: &CommentRecord) -> bool {
    let mention = record.mention_target.is_some();

    let quote = record
      .quoted_excerpt
      .as_deref()
      .is_some_and(|excerpt| !excerpt.is_empty());

    match self {
      Rule::MentionAndQuote => mention && quote,
      Rule::MentionOnly => mention,
      Rule::QuoteOnly => quote,
    }
  }

  fn matches(self, record: &CommentRecord, candidate: &CommentRecord) -> bool {
    let mentions = || {
      record
        .mention_target
        .as_deref()
        .is_some_and(|target| candidate.author == target)
    };

    let quotes = || {
      record
        .quoted_excerpt
        .as_deref()
        .is_some_and(|excerpt| candidate.body_text.contains(excerpt))
    };

    match self {
      Rule::MentionAndQuote => mentions() && quotes(),
      Rule::MentionOnly => mentions(),
      Rule::QuoteOnly => quotes(),
    }
  }
}

/// Arranges time-ordered records into a forest of replies.
///
/// Rules are tried in priority order and the first one that matches any
/// earlier comment wins; within a rule the most recent match wins. A comment
/// nothing matches becomes a top-level node.
pub(crate) fn build_tree(records: Vec<CommentRecord>) -> Vec<CommentRecord> {
  let parents = records
    .iter()
    .enumerate()
    .map(|(idx, record)| {
      let placement = resolve_parent(record, &records[..idx]);

      if let Some((parent, rule)) = placement {
        trace!(
          id = %record.id,
          parent = %records[parent].id,
          ?rule,
          "attached reply"
        );
      }

      placement.map(|(parent, _)| parent)
    })
    .collect::<Vec<_>>();

  let forest = assemble(records, &parents);

  debug!(
    roots = forest.len(),
    replies = parents.iter().flatten().count(),
    "built reply tree"
  );

  forest
}

/// Moves every record under its parent. Parents always precede their
/// children, so walking backwards finishes each subtree before its parent
/// is moved.
fn assemble(
  records: Vec<CommentRecord>,
  parents: &[Option<usize>],
) -> Vec<CommentRecord> {
  let mut adopted = (0..records.len())
    .map(|_| Vec::new())
    .collect::<Vec<Vec<CommentRecord>>>();

  let mut roots = Vec::new();

  for (idx, mut record) in records.into_iter().enumerate().rev() {
    record.children.extend(adopted[idx].drain(..).rev());

    match parents[idx] {
      Some(parent) => adopted[parent].push(record),
      None => roots.push(record),
    }
  }

  roots.reverse();

  roots
}

/// Finds the parent of `record` among the already placed `pool`, newest
/// first.
fn resolve_parent(
  record: &CommentRecord,
  pool: &[CommentRecord],
) -> Option<(usize, Rule)> {
  Rule::PRIORITY
    .into_iter()
    .filter(|rule| rule.applies(record))
    .find_map(|rule| {
      pool
        .iter()
        .rposition(|candidate| rule.matches(record, candidate))
        .map(|parent| (parent, rule))
    })
}
