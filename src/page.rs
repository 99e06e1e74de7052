//! Splits one forum question page into the article and its comment
//! fragments. Everything that knows the site template lives here.

use super::*;

const ARTICLE_BODY: Selector = Selector::new("div", &["aw-question-detail-txt"]);
const ARTICLE_META: Selector = Selector::new("div", &["aw-question-detail-meta"]);
const COMMENT_ITEM: Selector = Selector::new("div", &["aw-item"]);
const COMMENT_LIST: Selector =
  Selector::new("div", &["aw-mod-body", "aw-dynamic-topic"]);
const HEADING: Selector = Selector::new("h1", &[]);
const TITLE_BLOCK: Selector = Selector::new("div", &["aw-mod-head"]);

/// The forum shows no author for the opening post, only its role.
const ARTICLE_AUTHOR: &str = "楼主";

const COMMENT_ID_PREFIX: &str = "answer_list_";

const UNKNOWN_TITLE: &str = "Unknown Title";

static PUBLISH_TIME: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}").expect("valid time pattern")
});

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ArticleFragment {
  pub(crate) author: String,
  pub(crate) body_markup: String,
  pub(crate) published_at: String,
  pub(crate) title: String,
}

#[derive(Debug)]
pub(crate) struct Page<'a> {
  pub(crate) article: ArticleFragment,
  pub(crate) comments: Vec<&'a str>,
}

impl<'a> Page<'a> {
  fn article(document: &Document) -> ArticleFragment {
    let title = document
      .find(TITLE_BLOCK)
      .and_then(|block| block.find(HEADING))
      .map(|heading| heading.text())
      .filter(|title| !title.is_empty())
      .unwrap_or_else(|| UNKNOWN_TITLE.into());

    let body_markup = document
      .find(ARTICLE_BODY)
      .map(|body| body.outer_html().to_string())
      .unwrap_or_default();

    let published_at = document
      .find(ARTICLE_META)
      .and_then(|meta| {
        PUBLISH_TIME
          .find(&meta.text())
          .map(|time| time.as_str().to_string())
      })
      .unwrap_or_default();

    ArticleFragment {
      author: ARTICLE_AUTHOR.into(),
      body_markup,
      published_at,
      title,
    }
  }

  fn comments(document: &Document<'a>) -> Vec<&'a str> {
    let Some(list) = document.find(COMMENT_LIST) else {
      warn!("page has no comment list");
      return Vec::new();
    };

    list
      .find_all(COMMENT_ITEM)
      .into_iter()
      .filter(|item| {
        item
          .attribute("id")
          .is_some_and(|id| id.starts_with(COMMENT_ID_PREFIX))
      })
      .map(|item| item.outer_html())
      .collect()
  }

  pub(crate) fn parse(html: &'a str) -> Self {
    let document = Document::new(html);

    let page = Self {
      article: Self::article(&document),
      comments: Self::comments(&document),
    };

    debug!(
      title = %page.article.title,
      comments = page.comments.len(),
      "split page"
    );

    page
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_finds_article_and_comment_items() {
    let page = Page::parse(
      r#"<html><body>
<div class="aw-mod-head"><h1> Bond <b>ladders</b> </h1></div>
<div class="aw-question-detail-meta">发表于 2026-01-08 09:30 · 阅读 100</div>
<div class="aw-question-detail-txt"><p>intro</p></div>
<div class="aw-mod-body aw-dynamic-topic">
  <div class="aw-item" id="answer_list_1"><div class="markitup-box">a</div></div>
  <div class="aw-item"><div class="markitup-box">not a comment</div></div>
  <div class="aw-item" id="answer_list_2"><div class="markitup-box">b</div></div>
</div>
<div class="aw-item" id="answer_list_3">outside the list</div>
</body></html>"#,
    );

    assert_eq!(
      page.article,
      ArticleFragment {
        author: "楼主".into(),
        body_markup: r#"<div class="aw-question-detail-txt"><p>intro</p></div>"#
          .into(),
        published_at: "2026-01-08 09:30".into(),
        title: "Bond ladders".into(),
      }
    );

    assert_eq!(page.comments.len(), 2);
    assert!(page.comments[0].contains("answer_list_1"));
    assert!(page.comments[1].contains("answer_list_2"));
  }

  #[test]
  fn parse_tolerates_missing_sections() {
    let page = Page::parse("<html><body><p>maintenance</p></body></html>");

    assert_eq!(page.article.title, "Unknown Title");
    assert_eq!(page.article.body_markup, "");
    assert_eq!(page.article.published_at, "");
    assert!(page.comments.is_empty());
  }
}
