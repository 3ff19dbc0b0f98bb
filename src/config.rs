use crate::{
    catalog::{LoadOptions, DEFAULT_THUMBNAIL},
    recommender::{RecommenderOptions, DEFAULT_SIMILAR_COUNT, DEFAULT_TOP_N},
    similarity::DEFAULT_MAX_FEATURES,
    storage::{self, StorageManager},
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.yaml";
const CATALOG_FILE: &str = "books.csv";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be greater than 0")]
    Zero { field: &'static str },

    #[error("placeholder_thumbnail must not be empty")]
    EmptyPlaceholder,

    #[error("config is malformed: {0}")]
    Malformed(#[from] serde_yml::Error),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Catalog CSV. Relative paths resolve against the base path;
    /// defaults to `books.csv` there.
    #[serde(default)]
    pub catalog_path: Option<String>,

    /// Vocabulary size cap for the bag-of-words vectorizer
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Number of books returned by a title query
    #[serde(default = "default_similar_count")]
    pub similar_count: usize,

    /// Default number of books returned by a category query
    #[serde(default = "default_category_top_n")]
    pub category_top_n: usize,

    #[serde(default = "default_placeholder_thumbnail")]
    pub placeholder_thumbnail: String,

    #[serde(skip_serializing, skip_deserializing)]
    pub(crate) base_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            max_features: DEFAULT_MAX_FEATURES,
            similar_count: DEFAULT_SIMILAR_COUNT,
            category_top_n: DEFAULT_TOP_N,
            placeholder_thumbnail: DEFAULT_THUMBNAIL.to_string(),
            base_path: PathBuf::new(),
        }
    }
}

fn default_max_features() -> usize {
    DEFAULT_MAX_FEATURES
}

fn default_similar_count() -> usize {
    DEFAULT_SIMILAR_COUNT
}

fn default_category_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_placeholder_thumbnail() -> String {
    DEFAULT_THUMBNAIL.to_string()
}

/// `$BOOKREC_BASE_PATH`, or `~/.local/share/bookrec`.
pub fn default_base_path() -> anyhow::Result<PathBuf> {
    if let Ok(path) = std::env::var("BOOKREC_BASE_PATH") {
        return Ok(PathBuf::from(path));
    }
    let home = homedir::my_home()
        .map_err(|err| anyhow::anyhow!("couldnt resolve home dir: {err:?}"))?
        .context("couldnt find home dir")?;
    Ok(home.join(".local/share/bookrec"))
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_features == 0 {
            return Err(ConfigError::Zero {
                field: "max_features",
            });
        }
        if self.similar_count == 0 {
            return Err(ConfigError::Zero {
                field: "similar_count",
            });
        }
        if self.category_top_n == 0 {
            return Err(ConfigError::Zero {
                field: "category_top_n",
            });
        }
        if self.placeholder_thumbnail.trim().is_empty() {
            return Err(ConfigError::EmptyPlaceholder);
        }
        Ok(())
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(default_base_path()?)
    }

    pub fn load_with(base_path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let base_path = base_path.into();
        let store = storage::BackendLocal::new(&base_path)
            .with_context(|| format!("couldnt create {}", base_path.display()))?;

        // create new if does not exist
        if !store.exists(CONFIG_FILE) {
            log::info!("writing default config to {}", base_path.join(CONFIG_FILE).display());
            store.write(CONFIG_FILE, serde_yml::to_string(&Self::default())?.as_bytes())?;
        }

        let config_str =
            String::from_utf8(store.read(CONFIG_FILE)?).context("config file is not valid utf8")?;
        let mut config: Self = serde_yml::from_str(&config_str).map_err(ConfigError::from)?;

        config.base_path = base_path;
        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let store = storage::BackendLocal::new(&self.base_path)?;

        let config_str = serde_yml::to_string(&self)?;
        store.write(CONFIG_FILE, config_str.as_bytes())?;
        Ok(())
    }

    #[allow(dead_code)]
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    pub fn catalog_path(&self) -> PathBuf {
        match &self.catalog_path {
            Some(path) => self.base_path.join(path),
            None => self.base_path.join(CATALOG_FILE),
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            placeholder_thumbnail: self.placeholder_thumbnail.clone(),
        }
    }

    pub fn recommender_options(&self) -> RecommenderOptions {
        RecommenderOptions {
            max_features: self.max_features,
            similar_count: self.similar_count,
        }
    }
}
