use super::*;

/// Storage for fetched pages, keyed by [`key`].
pub(crate) trait Cache: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>>;

  fn put(&self, key: &str, content: &str) -> Result;
}

#[derive(Debug)]
pub(crate) struct FileCache {
  dir: PathBuf,
}

impl FileCache {
  /// Resolves the cache directory from the environment.
  pub(crate) fn default_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var("REPLYTREE_CACHE_DIR") {
      return Ok(PathBuf::from(dir));
    }

    let base_dir = if let Ok(dir) = env::var("XDG_CACHE_HOME") {
      PathBuf::from(dir)
    } else if let Ok(home) = env::var("HOME") {
      PathBuf::from(home).join(".cache")
    } else {
      env::current_dir()?.join(".cache")
    };

    Ok(base_dir.join("replytree"))
  }

  pub(crate) fn new(dir: PathBuf) -> Self {
    Self { dir }
  }

  fn path(&self, key: &str) -> PathBuf {
    self.dir.join(format!("cache_{key}.html"))
  }
}

impl Cache for FileCache {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let path = self.path(key);

    if !path.exists() {
      return Ok(None);
    }

    let content = fs::read_to_string(&path)
      .with_context(|| format!("could not read cached page {}", path.display()))?;

    Ok(Some(content))
  }

  fn put(&self, key: &str, content: &str) -> Result {
    fs::create_dir_all(&self.dir).with_context(|| {
      format!("could not create cache directory {}", self.dir.display())
    })?;

    let path = self.path(key);

    fs::write(&path, content)
      .with_context(|| format!("could not write cached page {}", path.display()))?;

    Ok(())
  }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryCache {
  entries: std::sync::Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl Cache for MemoryCache {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let entries = self
      .entries
      .lock()
      .map_err(|_| anyhow!("cache lock poisoned"))?;

    Ok(entries.get(key).cloned())
  }

  fn put(&self, key: &str, content: &str) -> Result {
    self
      .entries
      .lock()
      .map_err(|_| anyhow!("cache lock poisoned"))?
      .insert(key.to_string(), content.to_string());

    Ok(())
  }
}

/// Cache key for a source URL: lowercase hex SHA-256.
pub(crate) fn key(url: &str) -> String {
  format!("{:x}", Sha256::digest(url.as_bytes()))
}
