use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{CollectionArgs, SyncArgs};
use crate::download::paths::{Extension, FileStem, KindLayout, NamingRule};
use crate::download::DownloadConfig;
use crate::retry::RetryConfig;
use crate::types::{CollectionPreset, KindSelection};

const MEMES_ENDPOINT: &str =
    "https://api.6529.io/api/nfts/0x33FD426905F149f8376e227d0C9D3340AaD17aF1/media";
const PEBS_ENDPOINT: &str = "https://api.6529.io/api/nfts/nextgen/media";

/// Everything that differs between collections: where the manifest comes
/// from, where files go, and how they are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
    pub endpoint: String,
    pub failure_log: PathBuf,
    pub naming: NamingRule,
}

impl Collection {
    /// Built-in layout for `preset`, rooted at `base`.
    pub fn preset(preset: CollectionPreset, base: &Path) -> Self {
        match preset {
            CollectionPreset::Memes => Self {
                name: preset.as_str().to_string(),
                endpoint: MEMES_ENDPOINT.to_string(),
                failure_log: base.join("failed_downloads_memes.txt"),
                naming: NamingRule {
                    stem: FileStem::PaddedId { width: 4 },
                    image: KindLayout {
                        directory: base.join("meme_images"),
                        extension: Extension::FromUrl,
                    },
                    animation: KindLayout {
                        directory: base.join("meme_animations"),
                        extension: Extension::FromUrl,
                    },
                },
            },
            CollectionPreset::Pebs => Self {
                name: preset.as_str().to_string(),
                endpoint: PEBS_ENDPOINT.to_string(),
                failure_log: base.join("failed_downloads_pebs.txt"),
                naming: NamingRule {
                    stem: FileStem::UrlTail { digits: 3 },
                    image: KindLayout {
                        directory: base.join("peb_images"),
                        extension: Extension::Fixed(".png".to_string()),
                    },
                    animation: KindLayout {
                        directory: base.join("peb_animations"),
                        extension: Extension::Fixed(".html".to_string()),
                    },
                },
            },
        }
    }

    pub fn from_args(args: &CollectionArgs) -> Self {
        let base = expand_tilde(&args.directory);
        let mut collection = Self::preset(args.collection, &base);
        if let Some(endpoint) = &args.endpoint {
            collection.endpoint = endpoint.clone();
        }
        collection
    }
}

/// Application configuration for a sync run.
#[derive(Debug, Clone)]
pub struct Config {
    pub collection: Collection,
    pub download: DownloadConfig,
}

impl Config {
    pub fn from_cli(args: SyncArgs) -> anyhow::Result<Self> {
        let collection = Collection::from_args(&args.target);

        if let Err(e) = reqwest::Url::parse(&collection.endpoint) {
            anyhow::bail!("Invalid manifest endpoint '{}': {}", collection.endpoint, e);
        }

        Ok(Self {
            collection,
            download: DownloadConfig {
                selection: KindSelection::from_flags(args.images, args.animations),
                concurrency: usize::from(args.concurrency),
                retry: RetryConfig {
                    max_attempts: args.max_attempts,
                    delay: Duration::from_secs(args.retry_delay),
                },
                timeout: Duration::from_secs(args.timeout),
                no_progress_bar: args.no_progress_bar,
            },
        })
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
