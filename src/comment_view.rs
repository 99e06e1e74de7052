use super::*;

/// The browsable, collapsible rendition of a reply forest.
pub(crate) struct CommentView {
  pub(crate) entries: Vec<CommentEntry>,
  pub(crate) offset: usize,
  pub(crate) selected: Option<usize>,
}

impl CommentView {
  pub(crate) fn collapse_selected(&mut self) {
    if let Some(selected) = self.selected
      && let Some(entry) = self.entries.get_mut(selected)
    {
      if entry.expanded && entry.has_children() {
        entry.expanded = false;
      } else if let Some(parent) = entry.parent {
        self.selected = Some(parent);
      }
    }

    self.ensure_selection_visible();
  }

  pub(crate) fn ensure_selection_visible(&mut self) {
    let mut current = self.selected;

    while let Some(idx) = current {
      if self.is_visible(idx) {
        self.selected = Some(idx);
        return;
      }

      current = self.entries.get(idx).and_then(|entry| entry.parent);
    }

    self.selected = self.visible_indexes().first().copied();
  }

  pub(crate) fn expand_selected(&mut self) {
    if let Some(selected) = self.selected
      && let Some(entry) = self.entries.get_mut(selected)
      && entry.has_children()
    {
      if !entry.expanded {
        entry.expanded = true;
      } else if let Some(&child) = entry.children.first() {
        self.selected = Some(child);
      }
    }

    self.ensure_selection_visible();
  }

  pub(crate) fn handle_key(&mut self, key: KeyEvent, page: usize) -> Action {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
      KeyCode::Char('q' | 'Q') | KeyCode::Esc => return Action::Quit,
      KeyCode::Char('?') => return Action::ShowHelp,
      KeyCode::Char('o' | 'O') => return Action::OpenThread,
      KeyCode::Down | KeyCode::Char('j') => self.move_by(1),
      KeyCode::Up | KeyCode::Char('k') => self.move_by(-1),
      KeyCode::PageDown => self.page_down(page),
      KeyCode::PageUp => self.page_up(page),
      KeyCode::Char('d') if control => self.page_down(page),
      KeyCode::Char('u') if control => self.page_up(page),
      KeyCode::Left | KeyCode::Char('h') => self.collapse_selected(),
      KeyCode::Right | KeyCode::Char('l') => self.expand_selected(),
      KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
      KeyCode::Home => self.select_index_at(0),
      KeyCode::End => self.select_index_at(usize::MAX),
      _ => {}
    }

    Action::None
  }

  /// An entry is visible when none of its ancestors is collapsed.
  pub(crate) fn is_visible(&self, idx: usize) -> bool {
    let mut current = self.entries.get(idx).and_then(|entry| entry.parent);

    while let Some(parent) = current {
      let Some(entry) = self.entries.get(parent) else {
        break;
      };

      if !entry.expanded {
        return false;
      }

      current = entry.parent;
    }

    true
  }

  pub(crate) fn move_by(&mut self, delta: isize) {
    let (visible, selected_pos) = self.visible_with_selection();

    if visible.is_empty() {
      self.selected = None;
      return;
    }

    let current = selected_pos.unwrap_or(0);

    let target = current
      .saturating_add_signed(delta)
      .min(visible.len().saturating_sub(1));

    self.selected = Some(visible[target]);
  }

  pub(crate) fn new(forest: &[CommentRecord]) -> Self {
    let mut entries: Vec<CommentEntry> = Vec::new();
    let mut ancestors: Vec<usize> = Vec::new();

    for (depth, record) in CommentRecord::walk(forest) {
      ancestors.truncate(depth);

      let idx = entries.len();
      let parent = ancestors.last().copied();

      if let Some(parent) = parent {
        entries[parent].children.push(idx);
      }

      entries.push(CommentEntry::new(record, depth, parent));
      ancestors.push(idx);
    }

    // Replies follow their parent, so a reverse pass sees every subtree
    // complete before adding it to the parent.
    for idx in (0..entries.len()).rev() {
      if let Some(parent) = entries[idx].parent {
        entries[parent].descendants += entries[idx].descendants + 1;
      }
    }

    let selected = (!entries.is_empty()).then_some(0);

    Self {
      entries,
      offset: 0,
      selected,
    }
  }

  pub(crate) fn page_down(&mut self, amount: usize) {
    let step = amount.saturating_sub(1).max(1);
    self.move_by(isize::try_from(step).unwrap_or(isize::MAX));
  }

  pub(crate) fn page_up(&mut self, amount: usize) {
    let step = amount.saturating_sub(1).max(1);
    self.move_by(-isize::try_from(step).unwrap_or(isize::MAX));
  }

  pub(crate) fn select_index_at(&mut self, pos: usize) {
    let visible = self.visible_indexes();

    self.selected = visible
      .get(pos.min(visible.len().saturating_sub(1)))
      .copied();
  }

  pub(crate) fn toggle_selected(&mut self) {
    if let Some(selected) = self.selected
      && let Some(entry) = self.entries.get_mut(selected)
      && entry.has_children()
    {
      entry.expanded = !entry.expanded;
    }

    self.ensure_selection_visible();
  }

  pub(crate) fn visible_indexes(&self) -> Vec<usize> {
    (0..self.entries.len())
      .filter(|&idx| self.is_visible(idx))
      .collect()
  }

  pub(crate) fn visible_with_selection(&self) -> (Vec<usize>, Option<usize>) {
    let visible = self.visible_indexes();

    let selected_pos = self
      .selected
      .and_then(|selected| visible.iter().position(|&idx| idx == selected));

    (visible, selected_pos)
  }
}
