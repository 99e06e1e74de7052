use super::*;

/// Orders records oldest first.
///
/// The sort is stable: records sharing a key, including every record whose
/// time could not be parsed, keep the order they were found in.
pub(crate) fn normalize(mut records: Vec<CommentRecord>) -> Vec<CommentRecord> {
  records.sort_by_key(|record| record.sort_key);
  records
}

#[cfg(test)]
mod tests {
  use {super::*, crate::comment_record::comment};

  fn record(id: &str, sort_key: i64) -> CommentRecord {
    CommentRecord {
      sort_key,
      ..comment(id, "a", "")
    }
  }

  fn ids(records: &[CommentRecord]) -> Vec<&str> {
    records.iter().map(|record| record.id.as_str()).collect()
  }

  #[test]
  fn sorts_by_time_ascending() {
    let sorted = normalize(vec![record("c", 30), record("a", 10), record("b", 20)]);

    assert_eq!(ids(&sorted), vec!["a", "b", "c"]);
  }

  #[test]
  fn unparsable_times_sort_first_in_discovery_order() {
    let sorted = normalize(vec![
      record("late", 20),
      record("x", 0),
      record("early", 10),
      record("y", 0),
      record("z", 0),
    ]);

    assert_eq!(ids(&sorted), vec!["x", "y", "z", "early", "late"]);
  }

  #[test]
  fn ties_keep_discovery_order() {
    let sorted = normalize(vec![record("b", 5), record("a", 5), record("c", 1)]);

    assert_eq!(ids(&sorted), vec!["c", "b", "a"]);
  }

  #[test]
  fn empty_input_is_empty() {
    assert!(normalize(Vec::new()).is_empty());
  }
}
