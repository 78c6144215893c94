use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::items::{Item, ItemSet};
use crate::layout::{Container, LayoutConfig};

/// Outer container size as written in a scene file.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ContainerSpec {
    pub width: u32,
    pub height: u32,
}

/// A container, its configuration and the items to lay out, as loaded from JSON.
///
/// ```json
/// {
///   "container": { "width": 960, "height": 640 },
///   "config": { "size_candidates": [120, 180], "style_tags": ["s", "m"], "margin": 8 },
///   "items": [ { "name": "hero", "width": 1600, "height": 900 } ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    pub container: ContainerSpec,
    #[serde(default)]
    pub config: LayoutConfig,
    pub items: Vec<Item>,
}

impl Scene {
    pub fn from_json(text: &str) -> Result<Self> {
        let scene: Scene = serde_json::from_str(text).context("Failed to parse scene JSON")?;
        scene
            .config
            .validate()
            .context("Scene has an invalid layout configuration")?;
        Ok(scene)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file '{}'", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid scene '{}'", path.display()))
    }

    /// Built-in gallery of photo-like boxes used when no scene file is given.
    pub fn demo() -> Self {
        let boxes = [
            ("sunrise", 1600, 900),
            ("portrait", 800, 1200),
            ("square", 1000, 1000),
            ("panorama", 3000, 800),
            ("poster", 600, 900),
            ("polaroid", 880, 1070),
            ("film-still", 1920, 800),
            ("sketch", 1200, 1600),
            ("postcard", 1480, 1050),
            ("thumbnail", 320, 240),
        ];
        Scene {
            container: ContainerSpec {
                width: 960,
                height: 640,
            },
            config: LayoutConfig {
                style_tags: vec!["small".into(), "medium".into(), "large".into()],
                margin: 8,
                ..LayoutConfig::with_candidates([120, 180, 240])
            },
            items: boxes
                .iter()
                .map(|&(name, width, height)| Item::new(name, width, height))
                .collect(),
        }
    }

    pub fn into_parts(self) -> (ItemSet, Container, LayoutConfig) {
        let container = Container::with_padding(
            self.container.width,
            self.container.height,
            self.config.container_padding,
        );
        (self.items.into_iter().collect(), container, self.config)
    }
}
