use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ScrollyError, ScrollyResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(input: &str) -> ScrollyResult<Self> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ScrollyError::InvalidData(format!(
                "color `{input}` is not #rrggbb or #rrggbbaa"
            )));
        }
        let channel = |at: usize| -> ScrollyResult<f64> {
            u8::from_str_radix(&digits[at..at + 2], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|e| ScrollyError::InvalidData(format!("color `{input}`: {e}")))
        };
        let alpha = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    pub fn validate(self) -> ScrollyResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ScrollyError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// Lowercase `#rrggbb`, with an alpha pair only when not fully opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        let byte = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        let mut hex = format!(
            "#{:02x}{:02x}{:02x}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        );
        if byte(self.alpha) != u8::MAX {
            hex.push_str(&format!("{:02x}", byte(self.alpha)));
        }
        hex
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn hex_round_trip_keeps_opaque_form_short() {
        let color = Color::from_hex("#1F77B4").expect("hex");
        assert_eq!(color.to_hex(), "#1f77b4");
        assert_eq!(Color::from_rgb8(255, 127, 14).to_hex(), "#ff7f0e");
    }

    #[test]
    fn translucent_colors_carry_alpha() {
        let color = Color::from_hex("#00000080").expect("hex");
        assert_eq!(color.to_hex(), "#00000080");
    }

    #[test]
    fn rejects_short_or_non_hex_input() {
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::rgb(1.5, 0.0, 0.0).validate().is_err());
    }
}
