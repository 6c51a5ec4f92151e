//! Diverging colormap for substitution-matrix cells.
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Linear RGB interpolation over `[-1, 0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colormap {
    pub low: String,
    pub mid: String,
    pub high: String,
}

impl Default for Colormap {
    fn default() -> Self {
        Self {
            low: "#3A2CB1".to_string(),
            mid: "#FFFFFF".to_string(),
            high: "#FFCF22".to_string(),
        }
    }
}

fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |k: usize| u8::from_str_radix(&hex[k..k + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn lerp(a: [u8; 3], b: [u8; 3], t: f64) -> [u8; 3] {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

impl Colormap {
    pub fn validate(&self) -> Result<()> {
        for color in [&self.low, &self.mid, &self.high] {
            if parse_hex(color).is_none() {
                return Err(Error::Config(format!("colormap entry {color} is not #rrggbb")));
            }
        }
        Ok(())
    }

    /// Colour for a normalized value; inputs outside `[-1, 1]` are clamped and
    /// NaN maps to the midpoint.
    pub fn color(&self, value: f64) -> String {
        let (Some(low), Some(mid), Some(high)) =
            (parse_hex(&self.low), parse_hex(&self.mid), parse_hex(&self.high))
        else {
            return self.mid.clone();
        };
        let v = if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) };
        let [r, g, b] = if v < 0.0 {
            lerp(low, mid, v + 1.0)
        } else {
            lerp(mid, high, v)
        };
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let cmap = Colormap::default();
        assert_eq!(cmap.color(-1.0), "#3A2CB1");
        assert_eq!(cmap.color(0.0), "#FFFFFF");
        assert_eq!(cmap.color(1.0), "#FFCF22");
        assert_eq!(cmap.color(7.0), "#FFCF22");
        assert_eq!(cmap.color(f64::NAN), "#FFFFFF");
    }

    #[test]
    fn test_midway() {
        let cmap = Colormap {
            low: "#000000".into(),
            mid: "#808080".into(),
            high: "#FFFFFF".into(),
        };
        assert_eq!(cmap.color(-0.5), "#404040");
        assert!(cmap.validate().is_ok());
        let broken = Colormap {
            low: "purple".into(),
            ..Colormap::default()
        };
        assert!(broken.validate().is_err());
        assert_eq!(broken.color(0.3), broken.mid);
    }
}
