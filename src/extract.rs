use super::*;

const ANONYMOUS: &str = "Anonymous";

const AUTHOR_LINK: Selector = Selector::new("a", &["aw-user-name"]);
const AVATAR_LINK: Selector = Selector::new("a", &["aw-user-img"]);
const BODY: Selector = Selector::new("div", &["markitup-box"]);
const IMAGE: Selector = Selector::new("img", &[]);
const META: Selector = Selector::new("div", &["aw-dynamic-topic-meta"]);
const META_TEXT: Selector = Selector::new("span", &["aw-text-color-999"]);
const QUOTE: Selector = Selector::new("blockquote", &[]);

const ID_PREFIX: &str = "answer_list_";

/// Quoted excerpts are cut to this many characters before matching.
pub(crate) const QUOTE_PREFIX_CHARS: usize = 50;

#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq)]
pub(crate) enum SkipReason {
  #[error("fragment has no comment body")]
  MissingBody,
  #[error("fragment contains no element")]
  NoElement,
}

/// Turns one comment fragment into a record.
pub(crate) fn extract(fragment: &str) -> Result<CommentRecord, SkipReason> {
  let item = Document::new(fragment)
    .root()
    .ok_or(SkipReason::NoElement)?;

  let body = item.find(BODY).ok_or(SkipReason::MissingBody)?;

  let id = item
    .attribute("id")
    .map(|id| id.strip_prefix(ID_PREFIX).unwrap_or(&id).trim().to_string())
    .filter(|id| !id.is_empty())
    .unwrap_or_else(|| Uuid::new_v4().to_string());

  let author = item
    .find_all(AUTHOR_LINK)
    .into_iter()
    .find(|link| !body.contains(link))
    .map(|link| link.text())
    .filter(|name| !name.is_empty())
    .unwrap_or_else(|| ANONYMOUS.into());

  let avatar_url = item
    .find(AVATAR_LINK)
    .and_then(|link| link.find(IMAGE))
    .and_then(|image| image.attribute("src"))
    .filter(|src| !src.is_empty());

  // Matching needs the quotation in the text, display needs it gone from
  // the markup.
  let body_text = body.text();

  let quote = body.find(QUOTE);

  let quoted_excerpt = quote
    .map(|quote| excerpt(&quote))
    .filter(|excerpt| !excerpt.is_empty());

  let body_markup = match quote {
    Some(quote) => body.without(&quote),
    None => body.outer_html().to_string(),
  };

  let mention_target = mention_target(&body_markup);

  let meta = item
    .find(META)
    .and_then(|meta| meta.find(META_TEXT))
    .map(|span| span.text())
    .unwrap_or_default();

  let Timestamp {
    display,
    location,
    sort_key,
  } = Timestamp::parse(&meta);

  Ok(CommentRecord {
    author,
    avatar_url,
    body_markup,
    body_text,
    children: Vec::new(),
    id,
    location,
    mention_target,
    published_at: display,
    quoted_excerpt,
    sort_key,
  })
}

/// Extracts every fragment, logging and dropping the ones that cannot be
/// read.
pub(crate) fn extract_all<'a, I>(fragments: I) -> Vec<CommentRecord>
where
  I: IntoIterator<Item = &'a str>,
{
  fragments
    .into_iter()
    .enumerate()
    .filter_map(|(position, fragment)| match extract(fragment) {
      Ok(record) => Some(record),
      Err(reason) => {
        warn!(position, %reason, "skipping comment fragment");
        None
      }
    })
    .collect()
}

fn excerpt(quote: &Element) -> String {
  quote.text().chars().take(QUOTE_PREFIX_CHARS).collect()
}

/// The user a body addresses, if its visible text opens with `@` followed
/// by the whole name in its first author link.
fn mention_target(body_markup: &str) -> Option<String> {
  let document = Document::new(body_markup);

  let visible = document.text();

  let rest = visible.strip_prefix('@')?;

  let link = document.find(AUTHOR_LINK)?.text();

  let name = link.trim_start_matches('@').trim();

  if name.is_empty() {
    return None;
  }

  let after = rest.trim_start().strip_prefix(name)?;

  // `@bobby` does not address `bob`.
  let ends_name = after
    .chars()
    .next()
    .is_none_or(|ch| !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'));

  ends_name.then(|| name.to_string())
}
