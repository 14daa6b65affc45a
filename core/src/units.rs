use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TokenError};

/// Width of the design grid rpx values are expressed against.
pub const DESIGN_GRID_WIDTH: f64 = 750.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Px,
    Rem,
    Rpx,
}
impl Unit {
    pub const ALL: [Unit; 3] = [Unit::Px, Unit::Rem, Unit::Rpx];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Rem => "rem",
            Unit::Rpx => "rpx",
        }
    }
}
impl FromStr for Unit {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "px" => Ok(Unit::Px),
            "rem" => Ok(Unit::Rem),
            "rpx" => Ok(Unit::Rpx),
            _ => Err(TokenError::UnsupportedUnit(s.to_string())),
        }
    }
}
impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

peg::parser! {
  grammar dimension_parser() for str {
    rule magnitude() -> &'input str = $("-"? ['0'..='9' | '.']+)
    rule unit() -> &'input str = $(['a'..='z']+)

    pub(crate) rule dimension() -> (&'input str, &'input str) = m:magnitude() u:unit() { (m, u) }
  }
}

/// A parsed `<float><unit>` literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: Unit,
}
impl FromStr for Dimension {
    type Err = TokenError;

    fn from_str(literal: &str) -> Result<Self> {
        let malformed = || TokenError::MalformedDimension(literal.to_string());
        let (magnitude, unit) = dimension_parser::dimension(literal).map_err(|_| malformed())?;
        let unit = unit.parse()?;
        let magnitude = magnitude.parse().map_err(|_| malformed())?;
        Ok(Dimension { magnitude, unit })
    }
}

/// True when `value` is a string shaped like a px, rem or rpx literal.
///
/// Shape only: `1.2.3px` passes here and is rejected later by
/// [`UnitConverter::convert`].
pub fn is_dimension(value: &Value) -> bool {
    match value {
        Value::String(s) => dimension_parser::dimension(s)
            .map(|(_, unit)| unit.parse::<Unit>().is_ok())
            .unwrap_or(false),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    /// Root font size in px; one rem.
    pub base_font_size: f64,
    /// Screen width in px that the 750 rpx design grid spans.
    pub base_screen_width: f64,
}
impl Default for UnitConfig {
    fn default() -> Self {
        UnitConfig {
            base_font_size: 16.0,
            base_screen_width: 375.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UnitConverter {
    config: UnitConfig,
}
impl UnitConverter {
    pub fn new(config: UnitConfig) -> Self {
        UnitConverter { config }
    }
    pub fn config(&self) -> &UnitConfig {
        &self.config
    }
    pub fn to_pixels(&self, magnitude: f64, unit: Unit) -> f64 {
        match unit {
            Unit::Px => magnitude,
            Unit::Rem => magnitude * self.config.base_font_size,
            Unit::Rpx => magnitude * self.config.base_screen_width / DESIGN_GRID_WIDTH,
        }
    }
    pub fn from_pixels(&self, pixels: f64, unit: Unit) -> f64 {
        match unit {
            Unit::Px => pixels,
            Unit::Rem => pixels / self.config.base_font_size,
            Unit::Rpx => pixels * DESIGN_GRID_WIDTH / self.config.base_screen_width,
        }
    }
    /// Re-expresses `literal` in `target`, preserving its pixel value.
    pub fn convert(&self, literal: &str, target: Unit) -> Result<String> {
        let Dimension { magnitude, unit } = literal.parse()?;
        if magnitude == 0.0 {
            return Ok(format!("0{target}"));
        }
        let pixels = self.to_pixels(magnitude, unit);
        Ok(format!("{}{target}", self.from_pixels(pixels, target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn known_fixture() {
        let converter = UnitConverter::default();
        assert_eq!(converter.convert("16px", Unit::Rem).unwrap(), "1rem");
        assert_eq!(converter.convert("32px", Unit::Rpx).unwrap(), "64rpx");
        assert_eq!(converter.convert("1.5rem", Unit::Px).unwrap(), "24px");
        assert_eq!(converter.convert("0.5rem", Unit::Rpx).unwrap(), "16rpx");
        assert_eq!(converter.convert("64rpx", Unit::Px).unwrap(), "32px");
        assert_eq!(converter.convert("3px", Unit::Rem).unwrap(), "0.1875rem");
        assert_eq!(converter.convert("-8px", Unit::Rem).unwrap(), "-0.5rem");
    }

    #[test]
    fn zero_is_canonical() {
        let converter = UnitConverter::default();
        assert_eq!(converter.convert("0px", Unit::Rem).unwrap(), "0rem");
        assert_eq!(converter.convert("0rem", Unit::Rpx).unwrap(), "0rpx");
        assert_eq!(converter.convert("0.000rpx", Unit::Px).unwrap(), "0px");
        assert_eq!(converter.convert("-0px", Unit::Rem).unwrap(), "0rem");
    }

    #[test]
    fn other_unit_systems() {
        let converter = UnitConverter::new(UnitConfig {
            base_font_size: 10.0,
            base_screen_width: 750.0,
        });
        assert_eq!(converter.convert("15px", Unit::Rem).unwrap(), "1.5rem");
        assert_eq!(converter.convert("15px", Unit::Rpx).unwrap(), "15rpx");
    }

    #[test]
    fn rejects_bad_literals() {
        let converter = UnitConverter::default();
        assert!(matches!(
            converter.convert("12em", Unit::Px),
            Err(TokenError::UnsupportedUnit(unit)) if unit == "em"
        ));
        assert!(matches!(
            converter.convert("1.2.3px", Unit::Rem),
            Err(TokenError::MalformedDimension(_))
        ));
        assert!(matches!(
            converter.convert("px", Unit::Rem),
            Err(TokenError::MalformedDimension(_))
        ));
        assert!(matches!(
            converter.convert("12px solid", Unit::Rem),
            Err(TokenError::MalformedDimension(_))
        ));
        assert!(matches!("vw".parse::<Unit>(), Err(TokenError::UnsupportedUnit(_))));
    }

    #[test]
    fn dimension_shapes() {
        assert!(is_dimension(&json!("16px")));
        assert!(is_dimension(&json!("1.25rem")));
        assert!(is_dimension(&json!("40rpx")));
        assert!(is_dimension(&json!("1.2.3px")));
        assert!(!is_dimension(&json!("#ff0000")));
        assert!(!is_dimension(&json!("12em")));
        assert!(!is_dimension(&json!("1px 2px")));
        assert!(!is_dimension(&json!("{size.base}")));
        assert!(!is_dimension(&json!(16)));
    }

    fn unit() -> impl Strategy<Value = Unit> {
        prop_oneof![Just(Unit::Px), Just(Unit::Rem), Just(Unit::Rpx)]
    }

    proptest! {
        #[test]
        fn conversion_round_trips(magnitude in 0.001f64..10_000.0, from in unit(), to in unit()) {
            let converter = UnitConverter::default();
            let literal = format!("{magnitude}{from}");
            let there = converter.convert(&literal, to).unwrap();
            let back = converter.convert(&there, from).unwrap();
            let back: Dimension = back.parse().unwrap();
            prop_assert_eq!(back.unit, from);
            let expected = converter.to_pixels(magnitude, from);
            let actual = converter.to_pixels(back.magnitude, from);
            prop_assert!((expected - actual).abs() <= expected.abs() * 1e-9);
        }
    }
}
