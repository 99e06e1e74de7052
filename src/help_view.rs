use super::*;

#[derive(Default)]
pub(crate) struct HelpView {
  visible: bool,
}

impl HelpView {
  pub(crate) fn draw(&self, frame: &mut Frame) {
    if !self.visible {
      return;
    }

    let area = Self::help_area(frame.area());

    frame.render_widget(Clear, area);

    frame.render_widget(
      Paragraph::new(HELP_TEXT)
        .block(Block::default().title(HELP_TITLE).borders(Borders::ALL))
        .wrap(Wrap { trim: false }),
      area,
    );
  }

  pub(crate) fn handle_key(key: KeyEvent) -> Action {
    match key.code {
      KeyCode::Char('?') | KeyCode::Esc => Action::HideHelp,
      KeyCode::Char('q' | 'Q') => Action::Quit,
      _ => Action::None,
    }
  }

  /// A box sized to the help text plus borders, centered and clamped to
  /// `area`.
  fn help_area(area: Rect) -> Rect {
    let lines = HELP_TEXT.lines().count();

    let widest = HELP_TEXT
      .lines()
      .map(|line| line.chars().count())
      .max()
      .unwrap_or(0);

    let width = u16::try_from(widest.saturating_add(2))
      .unwrap_or(u16::MAX)
      .min(area.width);

    let height = u16::try_from(lines.saturating_add(2))
      .unwrap_or(u16::MAX)
      .min(area.height);

    Rect::new(
      area.x + (area.width - width) / 2,
      area.y + (area.height - height) / 2,
      width,
      height,
    )
  }

  pub(crate) fn hide(&mut self) -> &'static str {
    self.visible = false;
    BROWSE_STATUS
  }

  pub(crate) fn is_visible(&self) -> bool {
    self.visible
  }

  pub(crate) fn show(&mut self) -> &'static str {
    self.visible = true;
    HELP_STATUS
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn help_area_is_centered_and_clamped() {
    let large = HelpView::help_area(Rect::new(0, 0, 200, 100));

    assert!(large.width < 200 && large.height < 100);
    assert_eq!(large.x, (200 - large.width) / 2);
    assert_eq!(large.y, (100 - large.height) / 2);

    let small = HelpView::help_area(Rect::new(2, 3, 10, 5));

    assert_eq!(small, Rect::new(2, 3, 10, 5));
  }

  #[test]
  fn handle_key_closes_or_quits() {
    let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

    assert_eq!(HelpView::handle_key(key(KeyCode::Esc)), Action::HideHelp);
    assert_eq!(HelpView::handle_key(key(KeyCode::Char('?'))), Action::HideHelp);
    assert_eq!(HelpView::handle_key(key(KeyCode::Char('q'))), Action::Quit);
    assert_eq!(HelpView::handle_key(key(KeyCode::Char('j'))), Action::None);
  }
}
