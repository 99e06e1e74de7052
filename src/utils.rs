use {
  super::*,
  unicode_width::{UnicodeWidthChar, UnicodeWidthStr},
};

/// Cuts `text` to `max_chars` characters, marking the cut with `...`.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
  match text.char_indices().nth(max_chars) {
    Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
    None => text.to_string(),
  }
}

/// Wraps text to a display width. Words wider than a line, such as runs of
/// CJK text with no spaces, are broken between characters.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let width = width.max(1);

  let mut lines = Vec::new();
  let mut current = String::new();
  let mut current_width = 0;

  for word in text.split_whitespace() {
    let word_width = word.width();

    if !current.is_empty() && current_width + 1 + word_width <= width {
      current.push(' ');
      current.push_str(word);
      current_width += 1 + word_width;
      continue;
    }

    if !current.is_empty() {
      lines.push(mem::take(&mut current));
      current_width = 0;
    }

    for ch in word.chars() {
      let ch_width = ch.width().unwrap_or(0);

      if !current.is_empty() && current_width + ch_width > width {
        lines.push(mem::take(&mut current));
        current_width = 0;
      }

      current.push(ch);
      current_width += ch_width;
    }
  }

  if !current.is_empty() {
    lines.push(current);
  }

  lines
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncate_returns_original_when_within_limit() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exact", 5), "exact");
  }

  #[test]
  fn truncate_appends_ellipsis_when_exceeding_limit() {
    assert_eq!(truncate("This is a longer line", 4), "This...");
    assert_eq!(truncate("This is", 5), "This...");
    assert_eq!(truncate("长长长长", 2), "长长...");
  }

  #[test]
  fn wrap_text_returns_nothing_for_blank_input() {
    assert!(wrap_text("", 10).is_empty());
    assert!(wrap_text("   ", 5).is_empty());
  }

  #[test]
  fn wrap_text_wraps_at_word_boundaries() {
    assert_eq!(
      wrap_text("hello brave new world", 11),
      vec!["hello brave".to_string(), "new world".to_string()]
    );
    assert_eq!(wrap_text("short text", 20), vec!["short text".to_string()]);
  }

  #[test]
  fn wrap_text_breaks_wide_runs_by_display_width() {
    assert_eq!(
      wrap_text("长长长长长", 6),
      vec!["长长长".to_string(), "长长".to_string()]
    );
    assert_eq!(
      wrap_text("ok 长长长", 5),
      vec!["ok".to_string(), "长长".to_string(), "长".to_string()]
    );
  }
}
