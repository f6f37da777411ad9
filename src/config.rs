// src/config.rs
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "indigram.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub animation: AnimationConfig,
}

/// Shape of the generated network. Positions live on a logical canvas of
/// `width` x `height` units; the UI scales that canvas to the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub node_count: usize,
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// Fraction of a grid cell a node may drift from the cell center.
    pub jitter: f32,
    /// Fixed seed for reproducible networks (None = random).
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            node_count: 300,
            width: 1400.0,
            height: 900.0,
            margin: 100.0,
            jitter: 0.3,
            seed: None,
        }
    }
}

impl NetworkConfig {
    pub fn with_node_count(mut self, node_count: usize) -> Self {
        self.node_count = node_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rejects canvases the UI could not map to the screen.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.width.is_finite() && self.width > 0.0,
            "network width must be positive, got {}",
            self.width
        );
        anyhow::ensure!(
            self.height.is_finite() && self.height > 0.0,
            "network height must be positive, got {}",
            self.height
        );
        Ok(())
    }

    pub fn canvas(&self) -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(self.width, self.height))
    }
}

/// Timing of the BFS reveal and of the fade-out, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub step_interval: f64,
    pub vanish_delay: f64,
    pub vanish_duration: f64,
    pub max_stagger: f64,
    /// Distance from the start node at which the stagger reaches `max_stagger`.
    pub stagger_distance: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            step_interval: 0.3,
            vanish_delay: 1.0,
            vanish_duration: 2.0,
            max_stagger: 0.5,
            stagger_distance: 1000.0,
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(text).context("invalid configuration JSON")?;
        config.network.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Loads `path` when given, else `indigram.json` if it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
