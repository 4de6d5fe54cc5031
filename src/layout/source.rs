use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::path::PathBuf;

use crate::fetch::{HttpClient, fetch_text};

/// Somewhere fragment files can be loaded from by name.
#[async_trait]
pub trait FragmentSource: Send + Sync {
    async fn load(&self, name: &str) -> Result<String>;
}

/// Fragment names are plain file names, never paths.
fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        anyhow::bail!("invalid fragment name '{name}'");
    }
    Ok(())
}

/// Fetches fragments over HTTP, resolving each name against `base_url` the
/// way a browser resolves a relative link on the page at that URL.
pub struct HttpFragmentSource<C> {
    client: C,
    base_url: Url,
}

impl<C: HttpClient> HttpFragmentSource<C> {
    pub fn new(client: C, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("invalid base URL '{base_url}'"))?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl<C: HttpClient> FragmentSource for HttpFragmentSource<C> {
    async fn load(&self, name: &str) -> Result<String> {
        check_name(name)?;
        let url = self.base_url.join(name)?;
        fetch_text(&self.client, url.as_str()).await
    }
}

/// Reads fragments from a directory.
pub struct FsFragmentSource {
    root: PathBuf,
}

impl FsFragmentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FragmentSource for FsFragmentSource {
    async fn load(&self, name: &str) -> Result<String> {
        check_name(name)?;
        let path = self.root.join(name);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to load {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_check_name() {
        assert!(check_name("header.html").is_ok());
        assert!(check_name("../secret").is_err());
        assert!(check_name("a/b.html").is_err());
        assert!(check_name("").is_err());
    }

    #[tokio::test]
    async fn test_fs_source_reads_file() {
        let dir = env::temp_dir().join("carbon_footprint_test_fs_source");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("header.html"), "<h1>Header</h1>").unwrap();

        let source = FsFragmentSource::new(&dir);
        assert_eq!(source.load("header.html").await.unwrap(), "<h1>Header</h1>");
        assert!(source.load("missing.html").await.is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
