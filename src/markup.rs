//! A tolerant scanner over forum markup.
//!
//! This is not an HTML parser. It tokenizes tags and text runs, pairs an
//! opening tag with its closing tag by counting same-named tags, and renders
//! plain text. Malformed markup never fails: an unclosed element extends to
//! the end of the scope it was found in.

use super::*;

const BLOCK_TAGS: &[&str] = &[
  "address",
  "article",
  "aside",
  "blockquote",
  "br",
  "dd",
  "div",
  "dl",
  "dt",
  "figcaption",
  "figure",
  "footer",
  "h1",
  "h2",
  "h3",
  "h4",
  "h5",
  "h6",
  "header",
  "hr",
  "li",
  "main",
  "nav",
  "ol",
  "p",
  "pre",
  "section",
  "table",
  "td",
  "th",
  "tr",
  "ul",
];

const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

const VOID_TAGS: &[&str] = &[
  "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
  "source", "track", "wbr",
];

#[derive(Clone, Copy, Debug)]
pub(crate) struct Document<'a> {
  source: &'a str,
}

impl<'a> Document<'a> {
  pub(crate) fn find(&self, selector: Selector) -> Option<Element<'a>> {
    find_all(self.source, 0, self.source.len(), selector)
      .into_iter()
      .next()
  }

  pub(crate) fn find_all(&self, selector: Selector) -> Vec<Element<'a>> {
    find_all(self.source, 0, self.source.len(), selector)
  }

  pub(crate) fn new(source: &'a str) -> Self {
    Self { source }
  }

  /// The first element in the document, whatever its name.
  pub(crate) fn root(&self) -> Option<Element<'a>> {
    Tokens::new(self.source, 0, self.source.len()).find_map(|token| {
      match token {
        Token::Open(tag) => {
          Some(Element::close(self.source, tag, self.source.len()))
        }
        _ => None,
      }
    })
  }

  pub(crate) fn text(&self) -> String {
    text(self.source)
  }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Element<'a> {
  end: usize,
  inner_end: usize,
  inner_start: usize,
  source: &'a str,
  tag: Tag<'a>,
}

impl<'a> Element<'a> {
  pub(crate) fn attribute(&self, name: &str) -> Option<String> {
    self.tag.attribute(name)
  }

  fn close(source: &'a str, tag: Tag<'a>, limit: usize) -> Self {
    if tag.self_closing || is_one_of(tag.name, VOID_TAGS) {
      return Self {
        end: tag.end,
        inner_end: tag.end,
        inner_start: tag.end,
        source,
        tag,
      };
    }

    let mut depth = 1usize;

    for token in Tokens::new(source, tag.end, limit) {
      match token {
        Token::Open(open)
          if open.name.eq_ignore_ascii_case(tag.name)
            && !open.self_closing
            && !is_one_of(open.name, VOID_TAGS) =>
        {
          depth += 1;
        }
        Token::Close { end, name, start }
          if name.eq_ignore_ascii_case(tag.name) =>
        {
          depth -= 1;

          if depth == 0 {
            return Self {
              end,
              inner_end: start,
              inner_start: tag.end,
              source,
              tag,
            };
          }
        }
        _ => {}
      }
    }

    Self {
      end: limit,
      inner_end: limit,
      inner_start: tag.end,
      source,
      tag,
    }
  }

  pub(crate) fn contains(&self, other: &Element) -> bool {
    other.tag.start >= self.tag.start && other.end <= self.end
  }

  pub(crate) fn find(&self, selector: Selector) -> Option<Element<'a>> {
    self.find_all(selector).into_iter().next()
  }

  pub(crate) fn find_all(&self, selector: Selector) -> Vec<Element<'a>> {
    find_all(self.source, self.inner_start, self.inner_end, selector)
  }

  pub(crate) fn inner_html(&self) -> &'a str {
    &self.source[self.inner_start..self.inner_end]
  }

  pub(crate) fn outer_html(&self) -> &'a str {
    &self.source[self.tag.start..self.end]
  }

  pub(crate) fn text(&self) -> String {
    text(self.inner_html())
  }

  /// Outer markup of this element with `other` cut out of it.
  pub(crate) fn without(&self, other: &Element) -> String {
    if !self.contains(other) {
      return self.outer_html().to_string();
    }

    format!(
      "{}{}",
      &self.source[self.tag.start..other.tag.start],
      &self.source[other.end..self.end],
    )
  }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Selector {
  classes: &'static [&'static str],
  tag: &'static str,
}

impl Selector {
  fn matches(self, tag: &Tag) -> bool {
    tag.name.eq_ignore_ascii_case(self.tag)
      && self.classes.iter().all(|class| tag.has_class(class))
  }

  pub(crate) const fn new(
    tag: &'static str,
    classes: &'static [&'static str],
  ) -> Self {
    Self { classes, tag }
  }
}

#[derive(Clone, Copy, Debug)]
struct Tag<'a> {
  attributes: &'a str,
  end: usize,
  name: &'a str,
  self_closing: bool,
  start: usize,
}

impl Tag<'_> {
  fn attribute(&self, wanted: &str) -> Option<String> {
    let mut rest = self.attributes;

    loop {
      rest = rest.trim_start_matches(|ch: char| ch.is_whitespace() || ch == '/');

      if rest.is_empty() {
        return None;
      }

      let name_len = rest
        .find(|ch: char| ch.is_whitespace() || ch == '=' || ch == '/')
        .unwrap_or(rest.len());

      let name = &rest[..name_len];

      rest = rest[name_len..].trim_start();

      let value = if let Some(after) = rest.strip_prefix('=') {
        let after = after.trim_start();

        let (value, remaining) = match after.chars().next() {
          Some(quote @ ('"' | '\'')) => {
            let inner = &after[1..];
            let close = inner.find(quote).unwrap_or(inner.len());
            (&inner[..close], inner.get(close + 1..).unwrap_or(""))
          }
          _ => {
            let close = after.find(char::is_whitespace).unwrap_or(after.len());
            (&after[..close], &after[close..])
          }
        };

        rest = remaining;

        value
      } else {
        ""
      };

      if name.eq_ignore_ascii_case(wanted) {
        return Some(html_escape::decode_html_entities(value).into_owned());
      }
    }
  }

  fn has_class(&self, class: &str) -> bool {
    self
      .attribute("class")
      .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
  }
}

enum Token<'a> {
  Close {
    end: usize,
    name: &'a str,
    start: usize,
  },
  Open(Tag<'a>),
  Text(&'a str),
}

struct Tokens<'a> {
  limit: usize,
  position: usize,
  raw_text: Option<&'a str>,
  source: &'a str,
}

impl<'a> Tokens<'a> {
  fn new(source: &'a str, position: usize, limit: usize) -> Self {
    Self {
      limit,
      position,
      raw_text: None,
      source,
    }
  }

  /// Index of the `>` closing a tag, ignoring any inside quoted values.
  fn tag_end(text: &str) -> Option<usize> {
    let mut quote = None;

    for (idx, ch) in text.char_indices() {
      match (quote, ch) {
        (Some(open), _) if ch == open => quote = None,
        (Some(_), _) => {}
        (None, '"' | '\'') => quote = Some(ch),
        (None, '>') => return Some(idx),
        _ => {}
      }
    }

    None
  }
}

impl<'a> Iterator for Tokens<'a> {
  type Item = Token<'a>;

  fn next(&mut self) -> Option<Token<'a>> {
    while self.position < self.limit {
      let start = self.position;
      let rest = &self.source[start..self.limit];

      if let Some(name) = self.raw_text.take() {
        let needle = format!("</{}", name.to_ascii_lowercase());

        let length = rest
          .to_ascii_lowercase()
          .find(&needle)
          .unwrap_or(rest.len());

        self.position += length;

        if length > 0 {
          return Some(Token::Text(&rest[..length]));
        }

        continue;
      }

      let Some(offset) = rest.find('<') else {
        self.position = self.limit;
        return Some(Token::Text(rest));
      };

      if offset > 0 {
        self.position += offset;
        return Some(Token::Text(&rest[..offset]));
      }

      if rest.starts_with("<!--") {
        self.position = rest.find("-->").map_or(self.limit, |i| start + i + 3);
        continue;
      }

      if rest.starts_with("<!") || rest.starts_with("<?") {
        self.position = rest.find('>').map_or(self.limit, |i| start + i + 1);
        continue;
      }

      let closing = rest.starts_with("</");
      let name_start = if closing { 2 } else { 1 };

      // A tag name starts with a letter; anything else is a literal `<`.
      if !rest[name_start..]
        .chars()
        .next()
        .is_some_and(|ch| ch.is_ascii_alphabetic())
      {
        self.position += 1;
        return Some(Token::Text(&rest[..1]));
      }

      let name_len = rest[name_start..]
        .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '-' || ch == ':'))
        .unwrap_or(rest.len() - name_start);

      let name = &rest[name_start..name_start + name_len];
      let attributes_start = name_start + name_len;

      let Some(gt) = Self::tag_end(&rest[attributes_start..])
        .map(|idx| attributes_start + idx)
      else {
        self.position = self.limit;
        return Some(Token::Text(rest));
      };

      let end = start + gt + 1;

      self.position = end;

      if closing {
        return Some(Token::Close { end, name, start });
      }

      let attributes = rest[attributes_start..gt].trim_end();

      let (attributes, self_closing) = match attributes.strip_suffix('/') {
        Some(attributes) => (attributes, true),
        None => (attributes, false),
      };

      if !self_closing && is_one_of(name, RAW_TEXT_TAGS) {
        self.raw_text = Some(name);
      }

      return Some(Token::Open(Tag {
        attributes,
        end,
        name,
        self_closing,
        start,
      }));
    }

    None
  }
}

fn find_all<'a>(
  source: &'a str,
  start: usize,
  limit: usize,
  selector: Selector,
) -> Vec<Element<'a>> {
  Tokens::new(source, start, limit)
    .filter_map(|token| match token {
      Token::Open(tag) if selector.matches(&tag) => {
        Some(Element::close(source, tag, limit))
      }
      _ => None,
    })
    .collect()
}

fn is_one_of(name: &str, names: &[&str]) -> bool {
  names.iter().any(|candidate| name.eq_ignore_ascii_case(candidate))
}

/// Plain text of a markup fragment.
///
/// Block-level tags separate words, inline tags do not. Entities are decoded
/// and whitespace is collapsed, so the same content always renders to the
/// same string no matter how it was laid out.
pub(crate) fn text(markup: &str) -> String {
  let mut cleaned = String::with_capacity(markup.len());
  let mut raw_depth = 0usize;

  for token in Tokens::new(markup, 0, markup.len()) {
    match token {
      Token::Open(tag) => {
        if is_one_of(tag.name, RAW_TEXT_TAGS) && !tag.self_closing {
          raw_depth += 1;
        }

        if is_one_of(tag.name, BLOCK_TAGS) {
          cleaned.push(' ');
        }
      }
      Token::Close { name, .. } => {
        if is_one_of(name, RAW_TEXT_TAGS) {
          raw_depth = raw_depth.saturating_sub(1);
        }

        if is_one_of(name, BLOCK_TAGS) {
          cleaned.push(' ');
        }
      }
      Token::Text(run) if raw_depth == 0 => {
        cleaned.push_str(&html_escape::decode_html_entities(run));
      }
      Token::Text(_) => {}
    }
  }

  cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;

  const ITEM: Selector = Selector::new("div", &["aw-item"]);

  const LINK: Selector = Selector::new("a", &[]);

  #[test]
  fn attribute_values_may_contain_angle_brackets() {
    let document = Document::new(r#"<a title="1 > 0" href='/x'>one</a>"#);

    let link = document.find(LINK).unwrap();

    assert_eq!(link.attribute("title").as_deref(), Some("1 > 0"));
    assert_eq!(link.attribute("href").as_deref(), Some("/x"));
    assert_eq!(link.text(), "one");
  }

  #[test]
  fn attributes_decode_entities_and_accept_unquoted_values() {
    let document = Document::new("<img src=/a.png?x=1&amp;y=2 alt>");

    let image = document.find(Selector::new("img", &[])).unwrap();

    assert_eq!(image.attribute("src").as_deref(), Some("/a.png?x=1&y=2"));
    assert_eq!(image.attribute("alt").as_deref(), Some(""));
    assert_eq!(image.attribute("missing"), None);
  }

  #[test]
  fn find_requires_every_class() {
    let document = Document::new(
      r#"<div class="aw-mod-body">a</div><div class="aw-mod-body aw-dynamic-topic">b</div>"#,
    );

    let both = Selector::new("div", &["aw-mod-body", "aw-dynamic-topic"]);

    assert_eq!(document.find(both).unwrap().text(), "b");
    assert_eq!(document.find_all(Selector::new("div", &["aw-mod-body"])).len(), 2);
  }

  #[test]
  fn nested_elements_of_the_same_name_are_balanced() {
    let document = Document::new(
      r#"<div class="aw-item"><div>inner</div><p>tail</p></div><p>after</p>"#,
    );

    let item = document.find(ITEM).unwrap();

    assert_eq!(item.inner_html(), "<div>inner</div><p>tail</p>");
    assert_eq!(item.text(), "inner tail");
  }

  #[test]
  fn root_returns_first_element() {
    let document = Document::new(r#"  <div id="answer_list_7"><br/>x</div>"#);

    let root = document.root().unwrap();

    assert_eq!(root.attribute("id").as_deref(), Some("answer_list_7"));
    assert_eq!(root.text(), "x");
  }

  #[test]
  fn scoped_find_stays_inside_element() {
    let document =
      Document::new(r#"<div class="a"><a>in</a></div><a>out</a>"#);

    let scope = document.find(Selector::new("div", &["a"])).unwrap();

    assert_eq!(scope.find_all(LINK).len(), 1);
    assert_eq!(document.find_all(LINK).len(), 2);
  }

  #[test]
  fn stray_angle_brackets_are_text() {
    assert_eq!(
      text("<p>price<5 yuan, cheap</p><p>next para</p>"),
      "price<5 yuan, cheap next para"
    );
    assert_eq!(text("a < b </ c"), "a < b </ c");
    assert_eq!(text("<p>1<2</p>"), "1<2");
  }

  #[test]
  fn text_decodes_entities_and_collapses_whitespace() {
    assert_eq!(
      text("<p>Hello &amp; <i>good</i>bye</p>\n<ul><li>First</li><li>Second</li></ul>"),
      "Hello & goodbye First Second"
    );
  }

  #[test]
  fn text_skips_comments_and_scripts() {
    assert_eq!(
      text("a<!-- <p>hidden</p> --><script>if (1 < 2) {}</script><br>b"),
      "a b"
    );
  }

  #[test]
  fn unclosed_elements_extend_to_scope_end() {
    let document = Document::new(r#"<div class="aw-item"><p>open"#);

    assert_eq!(document.find(ITEM).unwrap().text(), "open");
  }

  #[test]
  fn unterminated_tag_is_kept_as_text() {
    assert_eq!(text("<p>see <b and more"), "see <b and more");
  }

  #[test]
  fn without_cuts_out_a_descendant() {
    let document =
      Document::new("<div><blockquote>quoted</blockquote>reply</div>");

    let body = document.root().unwrap();
    let quote = body.find(Selector::new("blockquote", &[])).unwrap();

    assert_eq!(body.without(&quote), "<div>reply</div>");
    assert_eq!(body.text(), "quoted reply");
  }
}
