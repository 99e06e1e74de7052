use super::*;

pub(crate) struct App {
  help: HelpView,
  link: Option<String>,
  list_height: usize,
  message: String,
  meta: String,
  notice: Option<(String, Instant)>,
  title: String,
  view: CommentView,
}

impl App {
  const NOTICE_DURATION: Duration = Duration::from_secs(3);

  const POLL_INTERVAL: Duration = Duration::from_millis(200);

  fn comment_list_item(entry: &CommentEntry, available_width: u16) -> ListItem {
    let indent = format!("{BASE_INDENT}{}", "  ".repeat(entry.depth));

    let mut header = vec![Span::raw(indent.clone())];

    if let Some(toggle) = entry.toggle() {
      header.push(Span::styled(toggle, Style::default().fg(Color::Yellow)));
      header.push(Span::raw(" "));
    }

    header.push(Span::styled(
      entry.header.clone(),
      Style::default().fg(Color::White),
    ));

    let mut lines = vec![Line::from(header)];

    let wrap_width = usize::from(available_width)
      .saturating_sub(indent.chars().count())
      .max(1);

    for line in wrap_text(&entry.body, wrap_width) {
      lines.push(Line::from(vec![
        Span::raw(indent.clone()),
        Span::styled(line, Style::default().fg(Color::DarkGray)),
      ]));
    }

    lines.push(Line::from(Span::raw(indent)));

    ListItem::new(lines)
  }

  fn draw(&mut self, frame: &mut Frame) {
    let layout = Layout::default()
      .direction(Direction::Vertical)
      .margin(1)
      .constraints([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
      ])
      .split(frame.area());

    self.list_height = usize::from(layout[1].height);

    frame.render_widget(
      Paragraph::new(vec![
        Line::from(vec![
          Span::raw(BASE_INDENT),
          Span::styled(
            self.title.clone(),
            Style::default()
              .fg(Color::Cyan)
              .add_modifier(Modifier::BOLD),
          ),
        ]),
        Line::from(vec![
          Span::raw(BASE_INDENT),
          Span::styled(self.meta.clone(), Style::default().fg(Color::DarkGray)),
        ]),
      ]),
      layout[0],
    );

    let (visible, selected_pos) = self.view.visible_with_selection();

    let items: Vec<ListItem> = if visible.is_empty() {
      vec![ListItem::new(Line::from(vec![
        Span::raw(BASE_INDENT),
        Span::raw("No comments yet."),
      ]))]
    } else {
      visible
        .iter()
        .map(|&idx| {
          Self::comment_list_item(&self.view.entries[idx], layout[1].width)
        })
        .collect()
    };

    let mut list_state = ListState::default()
      .with_selected(selected_pos)
      .with_offset(self.view.offset.min(selected_pos.unwrap_or(0)));

    let list = List::new(items).highlight_style(
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    );

    frame.render_stateful_widget(list, layout[1], &mut list_state);

    self.view.offset = list_state.offset();

    let status = self
      .notice
      .as_ref()
      .map_or(self.message.as_str(), |(notice, _)| notice.as_str());

    frame.render_widget(
      Paragraph::new(status.to_string())
        .style(Style::default().fg(Color::DarkGray)),
      layout[2],
    );

    self.help.draw(frame);
  }

  fn expire_notice(&mut self) {
    if let Some((_, shown_at)) = &self.notice
      && shown_at.elapsed() >= Self::NOTICE_DURATION
    {
      self.notice = None;
    }
  }

  pub(crate) fn new(article: ArticleRecord, link: Option<String>) -> Self {
    let meta = match article.comment_count() {
      1 => "1 comment".to_string(),
      count => format!("{count} comments"),
    };

    let meta = if article.published_at.is_empty() {
      format!("{} · {meta}", article.author)
    } else {
      format!("{} · {} · {meta}", article.author, article.published_at)
    };

    Self {
      help: HelpView::default(),
      link,
      list_height: 0,
      message: BROWSE_STATUS.to_string(),
      meta,
      notice: None,
      title: article.title,
      view: CommentView::new(&article.comments),
    }
  }

  fn notify(&mut self, notice: String) {
    self.notice = Some((notice, Instant::now()));
  }

  fn open_thread(&mut self) {
    let Some(link) = self.link.clone() else {
      self.notify("No link: this thread was loaded from a snapshot".into());
      return;
    };

    match webbrowser::open(&link) {
      Ok(()) => self.notify(format!("Opened {}", truncate(&link, 60))),
      Err(error) => {
        warn!(%error, %link, "could not open browser");
        self.notify(format!("Could not open link: {error}"));
      }
    }
  }

  pub(crate) fn run(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
  ) -> Result {
    loop {
      self.expire_notice();

      terminal.draw(|frame| self.draw(frame))?;

      if !crossterm_event::poll(Self::POLL_INTERVAL)? {
        continue;
      }

      let CrosstermEvent::Key(key) = crossterm_event::read()? else {
        continue;
      };

      if key.kind != KeyEventKind::Press {
        continue;
      }

      let action = if self.help.is_visible() {
        HelpView::handle_key(key)
      } else {
        self.view.handle_key(key, self.list_height.max(1))
      };

      match action {
        Action::HideHelp => self.message = self.help.hide().to_string(),
        Action::None => {}
        Action::OpenThread => self.open_thread(),
        Action::Quit => break,
        Action::ShowHelp => self.message = self.help.show().to_string(),
      }
    }

    Ok(())
  }
}
