//! Pipeline configuration.
//!
//! Built once at startup and passed into each stage, either from the
//! environment or from a TOML file.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default |
//! |---|---|---|
//! | `DOCUMENTDB_USERNAME` | Yes | |
//! | `DOCUMENTDB_PASSWORD` | Yes | |
//! | `DOCUMENTDB_CLUSTER_ENDPOINT` | Yes | |
//! | `DOCUMENTDB_PORT` | No | `27017` |
//! | `DOCUMENTDB_DATABASE` | No | `booksdb` |
//! | `DOCUMENTDB_COLLECTION` | No | `books` |
//! | `DOCUMENTDB_CA_FILE` | No | `./global-bundle.pem` |
//! | `DYNAMODB_TABLE_NAME` | No | `dynamo2025` |
//! | `AWS_REGION` | No | `us-east-2` |
//! | `CATALOG_BASE_URL` | No | `http://books.toscrape.com/` |
//! | `CATALOG_PAGE_URL` | No | `<base>catalogue/page-1.html` |

use std::path::{Path, PathBuf};

use book_pipeline_store::docdb::{
    DEFAULT_CA_FILE, DEFAULT_COLLECTION, DEFAULT_DATABASE, DEFAULT_PORT, DocumentDbConfig,
};
use book_pipeline_store::dynamodb::{DEFAULT_REGION, DEFAULT_TABLE, DynamoConfig};
use serde::{Deserialize, Serialize};

/// Default site root of the catalog.
pub const DEFAULT_BASE_URL: &str = "http://books.toscrape.com/";

/// Catalog page path, relative to the site root.
pub const DEFAULT_PAGE_PATH: &str = "catalogue/page-1.html";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Missing required environment variable.
    #[error("Missing environment variable: {name}")]
    MissingEnv {
        /// Name of the missing environment variable.
        name: String,
    },

    /// An environment variable holds an unusable value.
    #[error("Invalid value {value:?} for {name}: {message}")]
    InvalidEnv {
        /// Name of the environment variable.
        name: String,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        message: String,
    },

    /// Reading the config file failed.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`PipelineConfig`].
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Where the catalog page lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Site root that image paths are resolved against.
    pub base_url: String,
    /// The single page to scrape.
    pub page_url: String,
}

impl CatalogConfig {
    /// Catalog rooted at `base_url`, scraping its first catalogue page.
    #[must_use]
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
            page_url: format!("{base_url}{DEFAULT_PAGE_PATH}"),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::for_base_url(DEFAULT_BASE_URL)
    }
}

/// Full configuration for every stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub document_db: DocumentDbConfig,
    #[serde(default)]
    pub dynamo: DynamoConfig,
}

impl PipelineConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnv`] if a required variable is unset
    /// and [`ConfigError::InvalidEnv`] if `DOCUMENTDB_PORT` is not a port
    /// number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which returns the value of a
    /// variable or `None` when unset.
    ///
    /// # Errors
    ///
    /// See [`PipelineConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let require = |name: &str| {
            lookup(name).ok_or_else(|| ConfigError::MissingEnv {
                name: name.to_owned(),
            })
        };
        let or_default =
            |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_owned());

        let port = match lookup("DOCUMENTDB_PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| ConfigError::InvalidEnv {
                name: "DOCUMENTDB_PORT".to_owned(),
                value: value.clone(),
                message: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let base_url = or_default("CATALOG_BASE_URL", DEFAULT_BASE_URL);
        let mut catalog = CatalogConfig::for_base_url(&base_url);
        if let Some(page_url) = lookup("CATALOG_PAGE_URL") {
            catalog.page_url = page_url;
        }

        Ok(Self {
            catalog,
            document_db: DocumentDbConfig {
                username: require("DOCUMENTDB_USERNAME")?,
                password: require("DOCUMENTDB_PASSWORD")?,
                endpoint: require("DOCUMENTDB_CLUSTER_ENDPOINT")?,
                port,
                database: or_default("DOCUMENTDB_DATABASE", DEFAULT_DATABASE),
                collection: or_default("DOCUMENTDB_COLLECTION", DEFAULT_COLLECTION),
                ca_file: PathBuf::from(or_default("DOCUMENTDB_CA_FILE", DEFAULT_CA_FILE)),
            },
            dynamo: DynamoConfig {
                table: or_default("DYNAMODB_TABLE_NAME", DEFAULT_TABLE),
                region: or_default("AWS_REGION", DEFAULT_REGION),
            },
        })
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is not valid.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Toml`] if it is not valid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DOCUMENTDB_USERNAME", "user"),
        ("DOCUMENTDB_PASSWORD", "pass"),
        ("DOCUMENTDB_CLUSTER_ENDPOINT", "cluster.example.com"),
    ];

    #[test]
    fn env_defaults_fill_optional_values() {
        let config = PipelineConfig::from_lookup(lookup_from(REQUIRED)).unwrap();

        assert_eq!(config.document_db.port, 27017);
        assert_eq!(config.document_db.database, "booksdb");
        assert_eq!(config.document_db.collection, "books");
        assert_eq!(config.document_db.ca_file, PathBuf::from("./global-bundle.pem"));
        assert_eq!(config.dynamo.table, "dynamo2025");
        assert_eq!(config.dynamo.region, "us-east-2");
        assert_eq!(
            config.catalog.page_url,
            "http://books.toscrape.com/catalogue/page-1.html"
        );
    }

    #[test]
    fn env_overrides_are_applied() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("DOCUMENTDB_PORT", "27018"),
            ("DYNAMODB_TABLE_NAME", "books_clean"),
            ("AWS_REGION", "eu-west-1"),
            ("CATALOG_BASE_URL", "http://localhost:8080/"),
        ]);

        let config = PipelineConfig::from_lookup(lookup_from(&vars)).unwrap();

        assert_eq!(config.document_db.port, 27018);
        assert_eq!(config.dynamo.table, "books_clean");
        assert_eq!(config.dynamo.region, "eu-west-1");
        assert_eq!(
            config.catalog.page_url,
            "http://localhost:8080/catalogue/page-1.html"
        );
    }

    #[test]
    fn missing_required_variable_is_named() {
        let err = PipelineConfig::from_lookup(lookup_from(&REQUIRED[..2])).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingEnv { ref name } if name == "DOCUMENTDB_CLUSTER_ENDPOINT")
        );
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("DOCUMENTDB_PORT", "mongo"));
        let err = PipelineConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref value, .. } if value == "mongo"));
    }

    #[test]
    fn toml_config_uses_section_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
[document_db]
username = "user"
password = "pass"
endpoint = "cluster.example.com"

[dynamo]
table = "books_clean"
"#,
        )
        .unwrap();

        assert_eq!(config.document_db.port, 27017);
        assert_eq!(config.dynamo.table, "books_clean");
        assert_eq!(config.dynamo.region, "us-east-2");
        assert_eq!(config.catalog, CatalogConfig::default());
    }

    #[test]
    fn toml_without_document_db_fails() {
        assert!(matches!(
            PipelineConfig::from_toml_str("[dynamo]\ntable = \"t\"\n"),
            Err(ConfigError::Toml(_))
        ));
    }
}
