use {
  super::*,
  reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT},
};

#[derive(Clone)]
pub(crate) struct Client {
  cache: Arc<dyn Cache>,
  client: reqwest::Client,
}

impl Client {
  const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

  const ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";

  const CONCURRENCY: usize = 4;

  const QUESTION_PATH: &str = "jisilu.cn/question/";

  const TIMEOUT: Duration = Duration::from_secs(30);

  const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";

  /// Returns the page behind `url`, from the cache unless `force` is set.
  pub(crate) async fn fetch_page(&self, url: &str, force: bool) -> Result<String> {
    ensure!(
      url.contains(Self::QUESTION_PATH),
      "not a forum question URL: {url}"
    );

    let key = cache::key(url);

    if !force && let Some(content) = self.cache.get(&key)? {
      info!(%url, "loading page from cache");
      return Ok(content);
    }

    info!(%url, "fetching page");

    let content = self
      .client
      .get(url)
      .send()
      .await?
      .error_for_status()?
      .text()
      .await?;

    self.cache.put(&key, &content)?;

    Ok(content)
  }

  pub(crate) async fn fetch_thread(
    &self,
    url: &str,
    force: bool,
  ) -> Result<ArticleRecord> {
    let html = self.fetch_page(url, force).await?;

    let id = Self::question_id(url).unwrap_or_else(|| cache::key(url));

    Ok(ArticleRecord::reconstruct(id, Page::parse(&html)))
  }

  /// Fetches threads concurrently, yielding each result in argument order
  /// as soon as it and every earlier one are done.
  pub(crate) fn fetch_threads<'a>(
    &'a self,
    urls: &'a [String],
    force: bool,
  ) -> impl Stream<Item = (&'a str, Result<ArticleRecord>)> + 'a {
    stream::iter(urls)
      .map(move |url| async move {
        let result = self
          .fetch_thread(url, force)
          .await
          .with_context(|| format!("failed to load {url}"));

        (url.as_str(), result)
      })
      .buffered(Self::CONCURRENCY)
  }

  pub(crate) fn new(cache: Arc<dyn Cache>) -> Result<Self> {
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, HeaderValue::from_static(Self::USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(Self::ACCEPT));
    headers.insert(
      ACCEPT_LANGUAGE,
      HeaderValue::from_static(Self::ACCEPT_LANGUAGE),
    );

    let client = reqwest::Client::builder()
      .default_headers(headers)
      .timeout(Self::TIMEOUT)
      .build()
      .context("could not build HTTP client")?;

    Ok(Self { cache, client })
  }

  /// The numeric question id in a thread URL.
  fn question_id(url: &str) -> Option<String> {
    let (_, rest) = url.split_once(Self::QUESTION_PATH)?;

    let id = rest
      .split(|ch: char| !ch.is_ascii_digit())
      .next()
      .unwrap_or_default();

    (!id.is_empty()).then(|| id.to_string())
  }
}
