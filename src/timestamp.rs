use super::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Timestamp {
  pub(crate) display: String,
  pub(crate) location: Option<String>,
  pub(crate) sort_key: i64,
}

impl Timestamp {
  const EDIT_MARKERS: &[&str] = &["修改", "edited"];

  const FORMAT: &str = "%Y-%m-%d %H:%M";

  const LOCATION_MARKER: &str = "来自";

  /// Parses a comment meta line such as `2026-02-21 16:51 来自河北`.
  ///
  /// Never fails: an unparsable time keeps its original text and sorts
  /// first with a key of zero.
  pub(crate) fn parse(meta: &str) -> Self {
    let meta = meta.trim();

    let (time, location) = match meta.split_once(Self::LOCATION_MARKER) {
      Some((time, location)) => {
        let location = location.trim();

        (
          time.trim().to_string(),
          (!location.is_empty()).then(|| location.to_string()),
        )
      }
      None => (meta.to_string(), None),
    };

    let sort_key = Self::sort_key(&time).unwrap_or_else(|| {
      debug!(%time, "failed to parse comment time");
      0
    });

    Self {
      display: time,
      location,
      sort_key,
    }
  }

  fn sort_key(display: &str) -> Option<i64> {
    let cleaned = Self::EDIT_MARKERS
      .iter()
      .fold(display.to_string(), |text, marker| text.replace(marker, ""));

    NaiveDateTime::parse_from_str(cleaned.trim(), Self::FORMAT)
      .ok()
      .map(|time| time.and_utc().timestamp())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_splits_time_and_location() {
    let timestamp = Timestamp::parse("2026-02-21 16:51 来自河北");

    assert_eq!(timestamp.display, "2026-02-21 16:51");
    assert_eq!(timestamp.location.as_deref(), Some("河北"));
    assert_eq!(timestamp.sort_key, 1_771_692_660);
  }

  #[test]
  fn parse_ignores_edit_markers() {
    let edited = Timestamp::parse("2026-02-21 16:51 修改");

    assert_eq!(edited.display, "2026-02-21 16:51 修改");
    assert_eq!(edited.location, None);
    assert_eq!(edited.sort_key, Timestamp::parse("2026-02-21 16:51").sort_key);
  }

  #[test]
  fn unparsable_time_sorts_first() {
    let timestamp = Timestamp::parse("yesterday 来自");

    assert_eq!(timestamp.display, "yesterday");
    assert_eq!(timestamp.location, None);
    assert_eq!(timestamp.sort_key, 0);
  }

  #[test]
  fn empty_meta_is_unparsable() {
    assert_eq!(
      Timestamp::parse(""),
      Timestamp {
        display: String::new(),
        location: None,
        sort_key: 0,
      }
    );
  }
}
