use crate::utils::catalogue::{Catalogue, CatalogueError, parse_catalogue};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("parse error: {0}")]
    Parse(#[from] CatalogueError),
}

/// Where the builder-chain text lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetSource {
    File(PathBuf),
    Url(String),
}

impl PetSource {
    pub fn from_location(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            PetSource::Url(location.to_string())
        } else {
            PetSource::File(PathBuf::from(location))
        }
    }

    pub async fn fetch(&self) -> Result<String, SourceError> {
        match self {
            PetSource::File(path) => Ok(tokio::fs::read_to_string(path).await?),
            PetSource::Url(url) => {
                let client = reqwest::Client::builder()
                    .timeout(Duration::from_secs(30))
                    .build()?;
                let text = client
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                Ok(text)
            }
        }
    }
}

impl std::fmt::Display for PetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PetSource::File(path) => write!(f, "{}", path.display()),
            PetSource::Url(url) => write!(f, "{}", url),
        }
    }
}

pub async fn try_load_catalogue(source: &PetSource) -> Result<Catalogue, SourceError> {
    let text = source.fetch().await?;
    Ok(parse_catalogue(&text)?)
}

/// Fetch and parse; any failure yields an empty catalogue.
pub async fn load_catalogue(source: &PetSource) -> Catalogue {
    match try_load_catalogue(source).await {
        Ok(catalogue) => {
            log::info!("Loaded {} pets from {}", catalogue.len(), source);
            catalogue
        }
        Err(e) => {
            log::error!("Error loading pet data from {}: {}", source, e);
            Catalogue::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_source_from_location() {
        assert_eq!(
            PetSource::from_location("https://example.com/pets.txt"),
            PetSource::Url("https://example.com/pets.txt".to_string())
        );
        assert_eq!(
            PetSource::from_location(" data/pets.txt "),
            PetSource::File(PathBuf::from("data/pets.txt"))
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"return {{ ["Bun"] = new():Stat("Coins", 5) }}"#).unwrap();

        let source = PetSource::File(file.path().to_path_buf());
        let catalogue = load_catalogue(&source).await;
        assert_eq!(catalogue.len(), 1);
        assert!(catalogue.get("Bun").is_some());
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_catalogue() {
        let dir = tempfile::tempdir().unwrap();
        let source = PetSource::File(dir.path().join("absent.txt"));
        assert!(load_catalogue(&source).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_yields_empty_catalogue() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "just some prose, no table").unwrap();
        let source = PetSource::File(file.path().to_path_buf());
        assert!(matches!(
            try_load_catalogue(&source).await,
            Err(SourceError::Parse(CatalogueError::NoTable))
        ));
        assert!(load_catalogue(&source).await.is_empty());
    }
}
