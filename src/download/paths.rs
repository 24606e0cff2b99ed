use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::manifest::ManifestRecord;
use crate::types::AssetKind;

/// How the file stem (name without extension) is derived for a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStem {
    /// The record id, zero-padded to `width` digits: id 7, width 4 -> `0007`.
    PaddedId { width: usize },
    /// The last path segment of the asset URL, left-padded with zeros to
    /// `digits` characters and truncated to its final `digits` characters.
    UrlTail { digits: usize },
}

/// Where a file's extension comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extension {
    /// The extension of the URL path, including the dot, or none.
    FromUrl,
    /// A fixed extension such as `.png`.
    Fixed(String),
}

/// Output directory and extension policy for one asset kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindLayout {
    pub directory: PathBuf,
    pub extension: Extension,
}

/// Maps a manifest record to the local path of each of its assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingRule {
    pub stem: FileStem,
    pub image: KindLayout,
    pub animation: KindLayout,
}

impl NamingRule {
    pub fn layout(&self, kind: AssetKind) -> &KindLayout {
        match kind {
            AssetKind::Image => &self.image,
            AssetKind::Animation => &self.animation,
        }
    }

    /// Destination for `record`'s asset of the given kind at `url`.
    ///
    /// Returns `None` when the stem cannot be derived, e.g. a padded-id rule
    /// applied to a record without a numeric id.
    pub fn destination(&self, record: &ManifestRecord, kind: AssetKind, url: &str) -> Option<PathBuf> {
        let stem = match self.stem {
            FileStem::PaddedId { width } => padded_id(record.numeric_id()?, width),
            FileStem::UrlTail { digits } => url_tail(url, digits),
        };
        let layout = self.layout(kind);
        let extension = match &layout.extension {
            Extension::FromUrl => url_extension(url),
            Extension::Fixed(ext) => ext.clone(),
        };

        let mut filename = String::with_capacity(stem.len() + extension.len());
        filename.push_str(&stem);
        filename.push_str(&extension);
        Some(layout.directory.join(clean_filename(&filename)))
    }
}

/// Zero-pad `id` to at least `width` digits.
pub fn padded_id(id: u64, width: usize) -> String {
    format!("{id:0width$}")
}

/// Path component of a URL. Falls back to stripping the query and fragment
/// when the string does not parse as an absolute URL.
fn url_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

/// Extension of the URL's path (`".png"`), or an empty string.
pub fn url_extension(url: &str) -> String {
    let path = url_path(url);
    Path::new(&path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

/// Final path segment of the URL, zero-filled to `digits` characters and
/// cut down to its last `digits` characters: `.../10000000123` -> `123`,
/// `.../5` -> `005`.
pub fn url_tail(url: &str, digits: usize) -> String {
    let path = url_path(url);
    let segment = path.rsplit('/').next().unwrap_or_default();
    let len = segment.chars().count();

    if len < digits {
        let mut out = "0".repeat(digits - len);
        out.push_str(segment);
        out
    } else {
        segment.chars().skip(len - digits).collect()
    }
}

/// Clean a filename by removing characters that are invalid on common
/// filesystems: `/`, `\`, `:`, `*`, `?`, `"`, `<`, `>`, `|`.
pub fn clean_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn memes_rule() -> NamingRule {
        NamingRule {
            stem: FileStem::PaddedId { width: 4 },
            image: KindLayout {
                directory: PathBuf::from("meme_images"),
                extension: Extension::FromUrl,
            },
            animation: KindLayout {
                directory: PathBuf::from("meme_animations"),
                extension: Extension::FromUrl,
            },
        }
    }

    fn pebs_rule() -> NamingRule {
        NamingRule {
            stem: FileStem::UrlTail { digits: 3 },
            image: KindLayout {
                directory: PathBuf::from("peb_images"),
                extension: Extension::Fixed(".png".into()),
            },
            animation: KindLayout {
                directory: PathBuf::from("peb_animations"),
                extension: Extension::Fixed(".html".into()),
            },
        }
    }

    fn record(value: serde_json::Value) -> ManifestRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_padded_id() {
        assert_eq!(padded_id(7, 4), "0007");
        assert_eq!(padded_id(1234, 4), "1234");
        assert_eq!(padded_id(98765, 4), "98765");
    }

    #[test]
    fn test_url_extension() {
        assert_eq!(url_extension("http://x/7.png"), ".png");
        assert_eq!(url_extension("https://cdn.example/a/b/anim.mp4?v=2#t"), ".mp4");
        assert_eq!(url_extension("https://cdn.example/a.dir/noext"), "");
        assert_eq!(url_extension("https://cdn.example/archive.tar.gz"), ".gz");
        assert_eq!(url_extension("not a url/file.GLB?x=1"), ".GLB");
    }

    #[test]
    fn test_url_tail() {
        assert_eq!(url_tail("https://gen.example/png/10000000123", 3), "123");
        assert_eq!(url_tail("https://gen.example/html/5", 3), "005");
        assert_eq!(url_tail("https://gen.example/html/42?cache=1", 3), "042");
        assert_eq!(url_tail("https://gen.example/", 3), "000");
    }

    #[test]
    fn test_memes_destination() {
        let rule = memes_rule();
        let r = record(json!({"id": 7, "image": "http://x/7.png", "animation": null}));
        assert_eq!(
            rule.destination(&r, AssetKind::Image, "http://x/7.png"),
            Some(PathBuf::from("meme_images").join("0007.png"))
        );
        assert_eq!(
            rule.destination(&r, AssetKind::Animation, "http://x/anim/7.mp4"),
            Some(PathBuf::from("meme_animations").join("0007.mp4"))
        );
    }

    #[test]
    fn test_memes_destination_requires_numeric_id() {
        let rule = memes_rule();
        let r = record(json!({"image": "http://x/7.png"}));
        assert_eq!(rule.destination(&r, AssetKind::Image, "http://x/7.png"), None);
    }

    #[test]
    fn test_pebs_destination_uses_fixed_extensions() {
        let rule = pebs_rule();
        let r = record(json!({"id": 10000000123u64}));
        assert_eq!(
            rule.destination(&r, AssetKind::Image, "https://gen.example/png/10000000123"),
            Some(PathBuf::from("peb_images").join("123.png"))
        );
        assert_eq!(
            rule.destination(&r, AssetKind::Animation, "https://gen.example/html/10000000123"),
            Some(PathBuf::from("peb_animations").join("123.html"))
        );
    }

    #[test]
    fn test_clean_filename() {
        assert_eq!(clean_filename("a/b\\c:d*e?f\"g<h>i|j.png"), "abcdefghij.png");
        assert_eq!(clean_filename("0007.png"), "0007.png");
    }
}
