//! Colors and stroke styles for chart layers.

use serde::{Deserialize, Serialize};

use crate::domain::Series;

/// 24-bit color. Serialized as `"#rrggbb"`; a few CSS names are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return None;
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            return Some(Self::new(channel(0)?, channel(2)?, channel(4)?));
        }
        let named = match s.to_ascii_lowercase().as_str() {
            "red" => Self::new(255, 0, 0),
            "gray" | "grey" => Self::new(128, 128, 128),
            "black" => Self::new(0, 0, 0),
            "white" => Self::new(255, 255, 255),
            "blue" => Self::new(0, 0, 255),
            "green" => Self::new(0, 128, 0),
            "orange" => Self::new(255, 165, 0),
            _ => return None,
        };
        Some(named)
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Composite this color over `background` at the given opacity.
    pub fn blend(self, background: Rgb, opacity: f64) -> Rgb {
        let a = opacity.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f64 * a + bg as f64 * (1.0 - a)).round() as u8;
        Rgb::new(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse(&value).ok_or_else(|| format!("invalid color {value:?}"))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.hex()
    }
}

/// Line stroke pattern, measured in braille dots when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeDash {
    Solid,
    Dashed { on: u16, off: u16 },
}

impl StrokeDash {
    /// Vega-style `[on, off]` pattern; solid is `[1, 0]`.
    pub fn pattern(self) -> [u16; 2] {
        match self {
            StrokeDash::Solid => [1, 0],
            StrokeDash::Dashed { on, off } => [on, off],
        }
    }
}

/// Visual settings for every layer. Loaded from the `[chart]` config table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub band_color: Rgb,
    pub band_opacity: f64,
    pub rule_color: Rgb,
    pub rule_opacity: f64,
    pub rule_width: u16,
    /// `[on, off]` dash pattern for forecast series.
    pub dash: [u16; 2],
    /// Colors for Actual, Prophet_Train_Fitted, Prophet_Forecast, Auto_arima_forcasted.
    pub palette: [Rgb; 4],
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            band_color: Rgb::new(128, 128, 128),
            band_opacity: 0.2,
            rule_color: Rgb::new(255, 0, 0),
            rule_opacity: 0.7,
            rule_width: 2,
            dash: [5, 5],
            // Category palette handed out by alphabetical series name, stored here
            // in column order.
            palette: [
                Rgb::new(0x4c, 0x78, 0xa8),
                Rgb::new(0x72, 0xb7, 0xb2),
                Rgb::new(0xe4, 0x57, 0x56),
                Rgb::new(0xf5, 0x85, 0x18),
            ],
        }
    }
}

impl ChartStyle {
    pub fn series_color(&self, series: Series) -> Rgb {
        self.palette[series.index()]
    }

    pub fn series_stroke(&self, series: Series) -> StrokeDash {
        if series.is_forecast() {
            StrokeDash::Dashed {
                on: self.dash[0],
                off: self.dash[1],
            }
        } else {
            StrokeDash::Solid
        }
    }
}
