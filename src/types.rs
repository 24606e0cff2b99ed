#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Built-in collections the downloader knows how to lay out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum CollectionPreset {
    /// The Memes collection: files named by zero-padded token id.
    Memes,
    /// The NextGen (Pebbles) collection: files named by the URL's trailing digits.
    Pebs,
}

impl CollectionPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionPreset::Memes => "memes",
            CollectionPreset::Pebs => "pebs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Image,
    Animation,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Animation => "animation",
        }
    }
}

/// Which asset kinds a run should download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSelection {
    pub images: bool,
    pub animations: bool,
}

impl KindSelection {
    /// Build from the `--images` / `--animations` flags. Passing neither
    /// selects both; passing either restricts the run to what was named.
    pub fn from_flags(images: bool, animations: bool) -> Self {
        if !images && !animations {
            Self::both()
        } else {
            Self { images, animations }
        }
    }

    pub fn both() -> Self {
        Self {
            images: true,
            animations: true,
        }
    }

    pub fn includes(&self, kind: AssetKind) -> bool {
        match kind {
            AssetKind::Image => self.images,
            AssetKind::Animation => self.animations,
        }
    }
}

impl Default for KindSelection {
    fn default() -> Self {
        Self::both()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_selects_both() {
        let sel = KindSelection::from_flags(false, false);
        assert!(sel.includes(AssetKind::Image));
        assert!(sel.includes(AssetKind::Animation));
    }

    #[test]
    fn test_images_only() {
        let sel = KindSelection::from_flags(true, false);
        assert!(sel.includes(AssetKind::Image));
        assert!(!sel.includes(AssetKind::Animation));
    }

    #[test]
    fn test_animations_only() {
        let sel = KindSelection::from_flags(false, true);
        assert!(!sel.includes(AssetKind::Image));
        assert!(sel.includes(AssetKind::Animation));
    }

    #[test]
    fn test_both_flags() {
        assert_eq!(KindSelection::from_flags(true, true), KindSelection::both());
    }
}
