use super::*;

#[derive(Debug, Parser)]
#[command(
  name = "replytree",
  version,
  about = "Rebuild the reply tree of a forum thread"
)]
pub(crate) struct Arguments {
  /// Directory for cached pages
  #[arg(long, global = true)]
  cache_dir: Option<PathBuf>,
  #[command(subcommand)]
  subcommand: Subcommand,
}

impl Arguments {
  fn client(&self) -> Result<Client> {
    let dir = match &self.cache_dir {
      Some(dir) => dir.clone(),
      None => FileCache::default_dir()?,
    };

    debug!(dir = %dir.display(), "using page cache");

    Client::new(Arc::new(FileCache::new(dir)))
  }

  pub(crate) async fn run(self) -> Result {
    let client = self.client()?;

    self.subcommand.run(&client).await
  }
}

#[cfg(test)]
mod tests {
  use {super::*, clap::CommandFactory};

  #[test]
  fn arguments_are_consistent() {
    Arguments::command().debug_assert();
  }

  #[test]
  fn cache_dir_is_accepted_after_subcommand() {
    let arguments = Arguments::try_parse_from([
      "replytree",
      "show",
      "thread.json",
      "--cache-dir",
      "/tmp/pages",
    ])
    .unwrap();

    assert_eq!(arguments.cache_dir, Some(PathBuf::from("/tmp/pages")));
  }
}
