//! Editor configuration
//!
//! Loaded from an optional TOML file. Every field has a default, so an empty
//! file (or no file) yields the stock editor: 2/5 unit merge tolerances,
//! 72 DPI rendering, 1.2x zoom steps and red 0.5-unit export strokes written
//! to `edited_output.pdf`.

use crate::error::CoreError;
use crate::merge::MergeThresholds;
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditorConfig {
    #[serde(default)]
    pub merge: MergeThresholds,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Rasterization resolution of the background page image
    #[serde(default = "default_dpi")]
    pub dpi: f32,
}

fn default_dpi() -> f32 {
    72.0
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { dpi: default_dpi() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeometryConfig {
    /// A resize must leave both width and height strictly above this
    #[serde(default = "default_min_size")]
    pub min_size: f64,
    /// Side of the square drawn and hit-tested around each handle
    #[serde(default = "default_handle_size")]
    pub handle_size: f64,
}

fn default_min_size() -> f64 {
    5.0
}

fn default_handle_size() -> f64 {
    8.0
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            min_size: default_min_size(),
            handle_size: default_handle_size(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
}

fn default_zoom_step() -> f64 {
    1.2
}

fn default_min_zoom() -> f64 {
    0.1
}

fn default_max_zoom() -> f64 {
    20.0
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            zoom_step: default_zoom_step(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
        }
    }
}

impl ViewConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.zoom_step, self.min_zoom, self.max_zoom)
    }
}

/// How rectangles are written back onto the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Stroke the rectangles into the page content
    #[default]
    Content,
    /// Attach a Square annotation per rectangle
    Annotation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Stroke colour as RGB components in 0..=1
    #[serde(default = "default_color")]
    pub color: [f32; 3],
    #[serde(default = "default_line_width")]
    pub line_width: f32,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub mode: ExportMode,
}

fn default_color() -> [f32; 3] {
    [1.0, 0.0, 0.0]
}

fn default_line_width() -> f32 {
    0.5
}

fn default_output() -> PathBuf {
    PathBuf::from("edited_output.pdf")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            line_width: default_line_width(),
            output: default_output(),
            mode: ExportMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_width() -> f32 {
    1000.0
}

fn default_height() -> f32 {
    700.0
}

fn default_title() -> String {
    "PDF Editor".to_string()
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
        }
    }
}

impl EditorConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(s: &str) -> Result<Self, CoreError> {
        let config: EditorConfig =
            toml::from_str(s).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        fn check(ok: bool, msg: &str) -> Result<(), CoreError> {
            if ok {
                Ok(())
            } else {
                Err(CoreError::Config(msg.to_string()))
            }
        }

        check(
            self.merge.vertical_tolerance >= 0.0,
            "merge.vertical_tolerance must be >= 0",
        )?;
        check(
            self.merge.horizontal_gap >= 0.0,
            "merge.horizontal_gap must be >= 0",
        )?;
        check(self.render.dpi > 0.0, "render.dpi must be > 0")?;
        check(
            self.geometry.min_size >= 0.0,
            "geometry.min_size must be >= 0",
        )?;
        check(
            self.geometry.handle_size > 0.0,
            "geometry.handle_size must be > 0",
        )?;
        check(self.view.zoom_step > 1.0, "view.zoom_step must be > 1")?;
        check(
            self.view.min_zoom > 0.0 && self.view.min_zoom <= 1.0,
            "view.min_zoom must be in (0, 1]",
        )?;
        check(self.view.max_zoom >= 1.0, "view.max_zoom must be >= 1")?;
        check(
            self.export.line_width > 0.0,
            "export.line_width must be > 0",
        )?;
        check(
            self.export.color.iter().all(|c| (0.0..=1.0).contains(c)),
            "export.color components must be in [0, 1]",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = EditorConfig::from_toml_str("").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.merge.vertical_tolerance, 2.0);
        assert_eq!(config.merge.horizontal_gap, 5.0);
        assert_eq!(config.render.dpi, 72.0);
        assert_eq!(config.export.output, PathBuf::from("edited_output.pdf"));
        assert_eq!(config.export.mode, ExportMode::Content);
    }

    #[test]
    fn test_partial_sections() {
        let toml = r#"
            [merge]
            horizontal_gap = 8.0

            [export]
            color = [0.0, 0.0, 1.0]
            mode = "annotation"
        "#;
        let config = EditorConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.merge.vertical_tolerance, 2.0);
        assert_eq!(config.merge.horizontal_gap, 8.0);
        assert_eq!(config.export.color, [0.0, 0.0, 1.0]);
        assert_eq!(config.export.mode, ExportMode::Annotation);
        assert_eq!(config.export.line_width, 0.5);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = EditorConfig::from_toml_str("[render]\nscale = 2.0\n");
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        for toml in [
            "[render]\ndpi = 0.0\n",
            "[view]\nzoom_step = 1.0\n",
            "[export]\nline_width = -1.0\n",
            "[export]\ncolor = [2.0, 0.0, 0.0]\n",
            "[merge]\nvertical_tolerance = -0.5\n",
        ] {
            assert!(
                matches!(EditorConfig::from_toml_str(toml), Err(CoreError::Config(_))),
                "expected rejection for {toml:?}"
            );
        }
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = EditorConfig::from_file("/nonexistent/linebox.toml");
        assert!(matches!(result, Err(CoreError::Config(_))));
    }
}
