// ============================================================================
// PANEL CONFIGURATION
// ============================================================================

use std::collections::BTreeMap;
use std::path::PathBuf;

use bon::Builder;
use rusttype::Font;

use crate::appliance::{AnimationFamily, Appliance};
use crate::color::Color;

/// Fonts tried in order when no explicit font path is configured.
pub const DEFAULT_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Clone, Builder)]
pub struct PanelConfig {
    #[builder(default = "Home Appliance Control System".to_string())]
    pub title: String,
    #[builder(default = "Home Appliance Control Panel".to_string())]
    pub heading: String,

    // Window configuration
    #[builder(default = 800)]
    pub window_width: usize,
    #[builder(default = 600)]
    pub window_height: usize,
    /// Integer upscaling applied when drawing surfaces are blitted.
    #[builder(default = 2)]
    pub canvas_scale: usize,

    // Persistence
    #[builder(default = PathBuf::from("appliance_states.json"))]
    pub state_file: PathBuf,

    // Colors
    #[builder(default = Color::new(0xf0, 0xf0, 0xf0))]
    pub background_color: Color,
    #[builder(default = Color::new(0x4c, 0xaf, 0x50))]
    pub on_color: Color,
    #[builder(default = Color::new(0xf0, 0xf0, 0xf0))]
    pub off_color: Color,
    #[builder(default = Color::new(0x33, 0x33, 0x33))]
    pub text_color: Color,
    #[builder(default = Color::new(0xaa, 0xaa, 0xaa))]
    pub frame_color: Color,

    // Font configuration
    #[builder(default = DEFAULT_FONT_PATHS.iter().map(PathBuf::from).collect())]
    pub font_paths: Vec<PathBuf>,
    #[builder(default = 30.0)]
    pub heading_font_size: f32,
    #[builder(default = 16.0)]
    pub label_font_size: f32,
    #[builder(default = 14.0)]
    pub status_font_size: f32,

    #[builder(default = tracing::Level::INFO)]
    pub log_level: tracing::Level,

    /// Replaces the animation family of individual appliances.
    #[builder(default)]
    pub family_overrides: BTreeMap<Appliance, AnimationFamily>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PanelConfig {
    /// Loads the first readable font among `font_paths`.
    pub fn load_font(&self) -> Option<Font<'static>> {
        for path in &self.font_paths {
            let Ok(bytes) = std::fs::read(path) else {
                continue;
            };
            match Font::try_from_vec(bytes) {
                Some(font) => {
                    tracing::debug!(path = %path.display(), "loaded font");
                    return Some(font);
                }
                None => tracing::warn!(path = %path.display(), "not a usable font file"),
            }
        }
        tracing::warn!("no font found, text will not be rendered");
        None
    }
}
