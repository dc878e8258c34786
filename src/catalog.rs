//! Channel image catalog: the fixed set of images players can land on and the
//! hidden cat markers on each of them. Loaded once, read-only afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CatalogError;

/// One hidden cat, in image-normalized coordinates (0..=1 on both axes).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatMarker {
    pub x: f64,
    pub y: f64,
}

impl CatMarker {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn in_unit_square(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageEntry {
    pub id: String,
    pub cat_markers: Vec<CatMarker>,
}

impl ImageEntry {
    pub fn new(id: impl Into<String>, cat_markers: Vec<CatMarker>) -> Self {
        Self { id: id.into(), cat_markers }
    }

    pub fn total_cats(&self) -> usize {
        self.cat_markers.len()
    }
}

// Shape of one value in pointInfo.json
#[derive(Deserialize)]
struct PointInfo {
    #[serde(default)]
    cats: Vec<CatMarker>,
}

#[derive(Clone, Debug, Default)]
pub struct ImageCatalog {
    entries: BTreeMap<String, ImageEntry>,
}

impl ImageCatalog {
    pub fn new(entries: Vec<ImageEntry>) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for entry in entries {
            if let Some(index) = entry.cat_markers.iter().position(|m| !m.in_unit_square()) {
                return Err(CatalogError::MarkerOutOfRange { image: entry.id, index });
            }
            if map.contains_key(&entry.id) {
                return Err(CatalogError::DuplicateImage(entry.id));
            }
            map.insert(entry.id.clone(), entry);
        }
        Ok(Self { entries: map })
    }

    /// Parse the `{ "<image id>": { "cats": [{ "x": .., "y": .. }] } }` layout.
    /// When `limit` is set only the first `limit` ids (sorted) are kept.
    pub fn from_point_info_json(json: &str, limit: Option<usize>) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, PointInfo> = serde_json::from_str(json)?;
        let total = raw.len();
        let entries: Vec<ImageEntry> = raw
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(id, info)| ImageEntry::new(id, info.cats))
            .collect();
        if entries.len() < total {
            debug!(kept = entries.len(), total, "catalog truncated to configured image limit");
        }
        let catalog = Self::new(entries)?;
        if catalog.is_empty() {
            warn!("cat position data contains no images");
        }
        Ok(catalog)
    }

    pub fn get(&self, image_id: &str) -> Result<&ImageEntry, CatalogError> {
        self.entries
            .get(image_id)
            .ok_or_else(|| CatalogError::NotFound(image_id.to_string()))
    }

    /// All image ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
