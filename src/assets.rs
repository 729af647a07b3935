//! Logical asset names, where to fetch them from, and the loaded images.
use crate::browser;
use crate::config::assets::*;
use crate::engine::{self, LoadProgress};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use web_sys::HtmlImageElement;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetName {
    ShortBoyIdle,
    BigBoy,
    Box,
    BoyDrink,
    Cup,
}

/// Name -> URL table. A page can ship its own `assets.json` with the same
/// shape to point at different files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub images: HashMap<AssetName, String>,
}

static DEFAULT_MANIFEST: Lazy<AssetManifest> = Lazy::new(|| AssetManifest {
    images: HashMap::from([
        (AssetName::ShortBoyIdle, SHORT_BOY_IDLE.to_string()),
        (AssetName::BigBoy, BIG_BOY.to_string()),
        (AssetName::Box, BOX.to_string()),
        (AssetName::BoyDrink, BOY_DRINK.to_string()),
        (AssetName::Cup, CUP.to_string()),
    ]),
});

impl Default for AssetManifest {
    fn default() -> Self {
        DEFAULT_MANIFEST.clone()
    }
}

impl AssetManifest {
    /// Entries missing from `self` fall back to the built-in URLs
    pub fn with_defaults(mut self) -> Self {
        for (name, url) in &DEFAULT_MANIFEST.images {
            self.images.entry(*name).or_insert_with(|| url.clone());
        }
        self
    }
}

/// Whatever finished loading. A missing entry means "don't draw it".
#[derive(Default)]
pub struct Assets {
    images: HashMap<AssetName, HtmlImageElement>,
}

impl Assets {
    pub fn get(&self, name: AssetName) -> Option<&HtmlImageElement> {
        self.images.get(&name)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Failures are skipped; the game starts with whatever arrived.
    /// `progress` counts settled images for the loading screen.
    pub async fn load(manifest: &AssetManifest, progress: &LoadProgress) -> Self {
        let sources = manifest
            .images
            .iter()
            .map(|(name, url)| (*name, url.clone()));
        Assets {
            images: engine::load_images(sources, IMAGE_LOAD_TIMEOUT_MS, progress).await,
        }
    }
}

/// The page's `assets.json` when it exists and parses, built-in table otherwise
pub async fn load_manifest() -> AssetManifest {
    match browser::fetch_json::<AssetManifest>(MANIFEST_PATH).await {
        Ok(manifest) => {
            log!("Using asset manifest from {}", MANIFEST_PATH);
            manifest.with_defaults()
        }
        Err(err) => {
            log!(
                "No usable {} ({:#}), falling back to built-in assets",
                MANIFEST_PATH,
                err
            );
            AssetManifest::default()
        }
    }
}
