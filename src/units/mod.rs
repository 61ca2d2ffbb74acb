//! Measurement units.
//!
//! Values are stored in one base unit per kind (cm, kg, ml, °C). The enums
//! below are the only display units that exist, so an unknown unit can only
//! show up when parsing a string.

pub mod convert;

use crate::error::UnitError;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

pub use convert::{format_height, format_temperature, format_water, format_weight};

macro_rules! unit_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, default $default:ident {
            $( $variant:ident => $canonical:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            pub const KIND: &'static str = $kind;

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $canonical, )+
                }
            }

            pub fn all() -> &'static [$name] {
                &[$( $name::$variant ),+]
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnitError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_ascii_lowercase();
                $(
                    if needle == $canonical.to_ascii_lowercase() $(|| needle == $alias)* {
                        return Ok($name::$variant);
                    }
                )+
                Err(UnitError::Unknown {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(de::Error::custom)
            }
        }
    };
}

unit_enum! {
    HeightUnit, "height", default Cm {
        Cm => "cm",
        Ft => "ft" | "feet",
    }
}

unit_enum! {
    WeightUnit, "weight", default Kg {
        Kg => "kg",
        G => "g",
    }
}

unit_enum! {
    WaterUnit, "water", default Ml {
        Ml => "ml",
        FlOz => "fl oz" | "fl_oz" | "floz" | "fl-oz",
    }
}

unit_enum! {
    TemperatureUnit, "temperature", default C {
        C => "C" | "celsius",
        F => "F" | "fahrenheit",
    }
}

unit_enum! {
    /// Interface language. Has no conversion; kept with the units because it
    /// is stored and synced the same way.
    Language, "language", default En {
        En => "en",
        Es => "es",
        Fr => "fr",
        De => "de",
    }
}

/// Which measurement a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Kind {
    Height,
    Weight,
    Water,
    Temperature,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_and_aliases() {
        assert_eq!("ft".parse::<HeightUnit>().unwrap(), HeightUnit::Ft);
        assert_eq!(" CM ".parse::<HeightUnit>().unwrap(), HeightUnit::Cm);
        assert_eq!("fl oz".parse::<WaterUnit>().unwrap(), WaterUnit::FlOz);
        assert_eq!("FL_OZ".parse::<WaterUnit>().unwrap(), WaterUnit::FlOz);
        assert_eq!("f".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::F);
        assert_eq!("Celsius".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::C);
        assert_eq!("es".parse::<Language>().unwrap(), Language::Es);
    }

    #[test]
    fn test_parse_unknown_names_kind() {
        let err = "stone".parse::<WeightUnit>().unwrap_err();
        assert_eq!(
            err,
            UnitError::Unknown {
                kind: "weight",
                value: "stone".to_string()
            }
        );
        assert_eq!(err.to_string(), "unknown weight unit 'stone'");
    }

    #[test]
    fn test_defaults_are_base_units() {
        assert_eq!(HeightUnit::default(), HeightUnit::Cm);
        assert_eq!(WeightUnit::default(), WeightUnit::Kg);
        assert_eq!(WaterUnit::default(), WaterUnit::Ml);
        assert_eq!(TemperatureUnit::default(), TemperatureUnit::C);
        assert_eq!(Language::default(), Language::En);
    }

    #[test]
    fn test_display_matches_serde() {
        for unit in WaterUnit::all() {
            let json = serde_json::to_value(unit).unwrap();
            assert_eq!(json, unit.to_string());
        }
    }
}
