//! Viewer configuration
//!
//! Every layout constant, colour and timing used by the viewer lives here.
//! Defaults reproduce the stock viewer. A JSON file may override any subset:
//!
//! ```json
//! { "times": { "matched_time_threshold": 300 }, "logo": { "zoom": { "radius": 3 } } }
//! ```
use crate::colormap::Colormap;
use crate::error::{Error, Result};
use bon::Builder;
use geo::{coord, Rect};
use serde::{Deserialize, Serialize};
use std::path::Path;

macro_rules! default_from_builder {
    ($($name:ident),* $(,)?) => {
        $(
            impl Default for $name {
                fn default() -> Self {
                    Self::builder().build()
                }
            }
        )*
    };
}

#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    #[builder(default)]
    pub canvas: CanvasConfig,
    #[builder(default)]
    pub axis: AxisConfig,
    #[builder(default)]
    pub grid: GridConfig,
    #[builder(default)]
    pub shadow: ShadowConfig,
    #[builder(default)]
    pub logo: LogoConfig,
    #[builder(default)]
    pub zoom: ZoomConfig,
    #[builder(default)]
    pub couplings: CouplingConfig,
    #[builder(default)]
    pub times: Timing,
    #[builder(default)]
    pub matrix: MatrixConfig,
    #[builder(default)]
    pub legend: LegendConfig,
}

#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    #[builder(default = 650.0)]
    pub width: f64,
    #[builder(default = 650.0)]
    pub height: f64,
}

/// The plotting rectangle of the contact map, in pixels.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    #[builder(default = 70.0)]
    pub left: f64,
    #[builder(default = 520.0)]
    pub right: f64,
    #[builder(default = 100.0)]
    pub top: f64,
    #[builder(default = 550.0)]
    pub bottom: f64,
    #[builder(default = "white".to_string(), into)]
    pub color: String,
}

impl AxisConfig {
    pub fn rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.left, y: self.top },
            coord! { x: self.right, y: self.bottom },
        )
    }
}

#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Gridlines are drawn at external indices divisible by this.
    #[builder(default = 10)]
    pub spacing: i64,
    #[builder(default = 0.5)]
    pub line_width: f64,
    #[builder(default = "#D0D0D0".to_string(), into)]
    pub color: String,
    #[builder(default = 0.06)]
    pub crosshair_opacity: f64,
    #[builder(default = "gray".to_string(), into)]
    pub crosshair_color: String,
    #[builder(default = "sans-serif".to_string(), into)]
    pub label_font: String,
    #[builder(default = "10px".to_string(), into)]
    pub label_font_size: String,
    #[builder(default = 4.0)]
    pub label_pad_x: f64,
    #[builder(default = 11.0)]
    pub label_pad_y: f64,
    #[builder(default = 200)]
    pub label_duration: u32,
}

/// Drop shadow behind the matrix widget.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    #[builder(default = 5.0)]
    pub dx: f64,
    #[builder(default = 5.0)]
    pub dy: f64,
    #[builder(default = 8.0)]
    pub std: f64,
    #[builder(default = 0.2)]
    pub scale: f64,
}

#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoConfig {
    /// Pixel height of `bit_scale` bits in the resting logo.
    #[builder(default = 25.0)]
    pub height: f64,
    #[builder(default = 0.2)]
    pub font_scale: f64,
    #[builder(default = 4.0)]
    pub bit_scale: f64,
    #[builder(default = 1.0)]
    pub opacity: f64,
    #[builder(default = 2.0)]
    pub pad: f64,
    #[builder(default = "Inconsolata, sans-serif".to_string(), into)]
    pub font: String,
    #[builder(default = 2.0)]
    pub axis_pad: f64,
    #[builder(default = 20f64.log2())]
    pub axis_max: f64,
    #[builder(default = vec![0.0, 1.0, 2.0, 3.0, 4.0])]
    pub major_ticks: Vec<f64>,
    #[builder(default = 2.5)]
    pub major_length: f64,
    #[builder(default = -6.0)]
    pub axis_text_x: f64,
    #[builder(default = "black".to_string(), into)]
    pub axis_stroke: String,
    #[builder(default = 0.5)]
    pub axis_stroke_width: f64,
}

impl LogoConfig {
    pub fn bits_to_height(&self, bits: f64) -> f64 {
        self.height * bits / self.bit_scale
    }
}

/// Expanded logo window around the hovered cell.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    #[builder(default = 60.0)]
    pub height: f64,
    #[builder(default = 40.0)]
    pub lift: f64,
    /// Total pixel width of the expanded window.
    #[builder(default = 150.0)]
    pub width: f64,
    /// Half-width of the window in positions; also the focus-distance limit.
    #[builder(default = 5)]
    pub radius: i64,
    #[builder(default = 1.5)]
    pub font_scale: f64,
    /// Vertical letter scale per `bit_scale` bits.
    #[builder(default = 4.0)]
    pub letter_stretch: f64,
    #[builder(default = 100)]
    pub duration: u32,
    #[builder(default = 150)]
    pub destroy_duration: u32,
    #[builder(default = 0)]
    pub delay: u32,
    #[builder(default = 0.0)]
    pub opacity: f64,
    #[builder(default = "gray".to_string(), into)]
    pub underline_color: String,
    #[builder(default = 0.5)]
    pub underline_width: f64,
    #[builder(default = 2.5)]
    pub underline_pad: f64,
    #[builder(default = 2.5)]
    pub notch_radius: f64,
    #[builder(default = 3.0)]
    pub notch_height: f64,
    #[builder(default = 300)]
    pub underline_duration: u32,
    #[builder(default = 75)]
    pub underline_delay: u32,
}

impl ZoomConfig {
    pub fn letter_width(&self) -> f64 {
        self.width / (1 + 2 * self.radius) as f64
    }
}

#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouplingConfig {
    #[builder(default = "#B8B8B8".to_string(), into)]
    pub fill: String,
    #[builder(default = "gray".to_string(), into)]
    pub highlight: String,
    #[builder(default = "white".to_string(), into)]
    pub stroke: String,
    #[builder(default = 0.5)]
    pub stroke_width: f64,
    /// Glyph radius is `radius_scale * sqrt(bar width)` at full score.
    #[builder(default = 3.0)]
    pub radius_scale: f64,
    /// Fixed full-score radius, overriding `radius_scale`.
    pub max_radius: Option<f64>,
    #[builder(default = 600)]
    pub intro_duration: u32,
    #[builder(default = 400)]
    pub intro_delay: u32,
    /// Extra intro delay per position of separation between `i` and `j`.
    #[builder(default = 5)]
    pub intro_stagger: u32,
}

/// Clock constants, in milliseconds.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    #[builder(default = 10)]
    pub global_tick: u32,
    #[builder(default = 0)]
    pub destroy_duration: u32,
    #[builder(default = 300)]
    pub build_duration: u32,
    #[builder(default = 150)]
    pub matched_time_threshold: u32,
    #[builder(default = 700)]
    pub load_base: u32,
    #[builder(default = 5)]
    pub load_per_position: u32,
}

impl Timing {
    /// Grace period before the viewer reacts to the pointer.
    pub fn load_time(&self, length: usize) -> u64 {
        self.load_base as u64 + self.load_per_position as u64 * length as u64
    }
}

#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Largest matrix the widget has slots for.
    #[builder(default = 20)]
    pub slots: usize,
    #[builder(default = 15.0)]
    pub cell_size: f64,
    #[builder(default = 0.8)]
    pub opacity: f64,
    #[builder(default = "#D0D0D0".to_string(), into)]
    pub grid_color: String,
    #[builder(default = 0.5)]
    pub grid_width: f64,
    #[builder(default = 2.0)]
    pub text_up: f64,
    #[builder(default = 2.5)]
    pub text_over: f64,
    #[builder(default = "Inconsolata".to_string(), into)]
    pub font: String,
    #[builder(default = "20px".to_string(), into)]
    pub font_size: String,
    #[builder(default = "white".to_string(), into)]
    pub background_fill: String,
    #[builder(default = "#D0D0D0".to_string(), into)]
    pub background_stroke: String,
    #[builder(default = 0.5)]
    pub background_stroke_width: f64,
    #[builder(default = 19.0)]
    pub pad_right: f64,
    #[builder(default = 19.0)]
    pub pad_top: f64,
    #[builder(default = 5.0)]
    pub pad_left: f64,
    #[builder(default = 5.0)]
    pub pad_bottom: f64,
    #[builder(default = 0.8)]
    pub background_opacity: f64,
    #[builder(default)]
    pub colormap: Colormap,
}

#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    #[builder(default = 70.0)]
    pub left: f64,
    #[builder(default = 520.0)]
    pub right: f64,
    #[builder(default = 565.0)]
    pub top: f64,
    #[builder(default = 590.0)]
    pub bottom: f64,
    #[builder(default = 15.0)]
    pub pad_x: f64,
    #[builder(default = 5.0)]
    pub pad_y: f64,
    #[builder(default = "sans-serif".to_string(), into)]
    pub font: String,
    #[builder(default = "10px".to_string(), into)]
    pub font_size: String,
    #[builder(default = 2)]
    pub rows: usize,
    #[builder(default = 7)]
    pub columns: usize,
    #[builder(default = 6.0)]
    pub glyph_size: f64,
    #[builder(default = 5.0)]
    pub text_x: f64,
    #[builder(default = 3.5)]
    pub text_y: f64,
    /// Grid slot of the coupling-magnitude legend.
    #[builder(default = 4)]
    pub magnitude_slot: usize,
    #[builder(default = vec![6.0, 5.0, 4.0, 3.0, 2.0])]
    pub magnitude_radii: Vec<f64>,
    #[builder(default = vec![-27.0, -16.0, -7.0, 0.0, 5.0])]
    pub magnitude_offsets: Vec<f64>,
    #[builder(default = 43.0)]
    pub magnitude_shift_x: f64,
    #[builder(default = 13.0)]
    pub magnitude_text_x: f64,
    /// Grid slot of the colormap legend.
    #[builder(default = 11)]
    pub cmap_slot: usize,
    #[builder(default = 7)]
    pub cmap_blocks: usize,
    #[builder(default = 42.0)]
    pub cmap_width: f64,
    #[builder(default = 6.0)]
    pub cmap_height: f64,
    #[builder(default = 30.0)]
    pub cmap_shift_x: f64,
    #[builder(default = 26.0)]
    pub cmap_text_x: f64,
}

impl LegendConfig {
    pub fn slot_x(&self, slot: usize) -> f64 {
        let span = self.right - self.left - 2.0 * self.pad_x;
        self.left + self.pad_x + span * (slot % self.columns) as f64 / (self.columns - 1).max(1) as f64
    }
    pub fn slot_y(&self, slot: usize) -> f64 {
        let span = self.bottom - self.top - 2.0 * self.pad_y;
        self.top + self.pad_y + span * (slot / self.columns) as f64 / (self.rows - 1).max(1) as f64
    }
}

default_from_builder!(
    ViewerConfig,
    CanvasConfig,
    AxisConfig,
    GridConfig,
    ShadowConfig,
    LogoConfig,
    ZoomConfig,
    CouplingConfig,
    Timing,
    MatrixConfig,
    LegendConfig,
);

impl ViewerConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let axis = &self.axis;
        if !(axis.right > axis.left && axis.bottom > axis.top) {
            return Err(Error::Config(format!(
                "plot rectangle ({}, {}) - ({}, {}) is empty",
                axis.left, axis.top, axis.right, axis.bottom
            )));
        }
        if self.times.global_tick == 0 {
            return Err(Error::Config("global_tick must be positive".into()));
        }
        if self.zoom.radius < 0 {
            return Err(Error::Config("zoom radius must not be negative".into()));
        }
        if self.logo.bit_scale <= 0.0 {
            return Err(Error::Config("bit_scale must be positive".into()));
        }
        if self.legend.columns == 0 || self.legend.rows == 0 {
            return Err(Error::Config("legend needs at least one row and column".into()));
        }
        self.matrix.colormap.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.axis.rect().width(), 450.0);
        assert_eq!(config.times.global_tick, 10);
        assert_eq!(config.times.matched_time_threshold, 150);
        assert_eq!(config.times.load_time(30), 850);
        assert_eq!(config.zoom.radius, 5);
        assert!((config.zoom.letter_width() - 150.0 / 11.0).abs() < 1e-12);
        assert_eq!(config.logo.bits_to_height(4.0), 25.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let config = ViewerConfig::from_json_str(
            r#"{"times": {"matched_time_threshold": 300}, "zoom": {"radius": 3}}"#,
        )
        .unwrap();
        assert_eq!(config.times.matched_time_threshold, 300);
        assert_eq!(config.times.global_tick, 10);
        assert_eq!(config.zoom.radius, 3);
        assert_eq!(config.zoom.width, 150.0);
        assert_eq!(config.axis, AxisConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        let bad = ViewerConfig::from_json_str(r#"{"axis": {"left": 600}}"#);
        assert!(matches!(bad, Err(Error::Config(_))));
        let bad = ViewerConfig::from_json_str(r#"{"times": {"global_tick": 0}}"#);
        assert!(matches!(bad, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder() {
        let config = ViewerConfig::builder()
            .times(Timing::builder().matched_time_threshold(50).build())
            .build();
        assert_eq!(config.times.matched_time_threshold, 50);
        assert_eq!(config.times.build_duration, 300);
    }

    #[test]
    fn test_legend_slots() {
        let legend = LegendConfig::default();
        assert_eq!(legend.slot_x(0), 85.0);
        assert_eq!(legend.slot_x(6), 505.0);
        assert_eq!(legend.slot_y(0), 570.0);
        assert_eq!(legend.slot_y(7), 585.0);
    }
}
