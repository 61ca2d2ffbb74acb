//! Base ↔ display conversions.
//!
//! Height and weight keep full precision and only round when formatted.
//! Water rounds to whole units inside the converter, so a round trip through
//! fl oz is lossy. Temperature rounds only when formatted.

use super::{HeightUnit, TemperatureUnit, WaterUnit, WeightUnit};

const CM_PER_FT: f64 = 30.48;
const G_PER_KG: f64 = 1000.0;
const FL_OZ_PER_ML: f64 = 0.033814;
const ML_PER_FL_OZ: f64 = 29.5735;

// `round` keeps the sign of a negative value that rounds to zero; adding
// positive zero clears it so nothing displays as "-0".
fn whole(v: f64) -> f64 {
    v.round() + 0.0
}

fn tenths(v: f64) -> f64 {
    (v * 10.0).round() / 10.0 + 0.0
}

pub mod height {
    use super::*;

    pub fn to_display(cm: f64, unit: HeightUnit) -> f64 {
        match unit {
            HeightUnit::Cm => cm,
            HeightUnit::Ft => cm / CM_PER_FT,
        }
    }

    pub fn to_base(value: f64, unit: HeightUnit) -> f64 {
        match unit {
            HeightUnit::Cm => value,
            HeightUnit::Ft => value * CM_PER_FT,
        }
    }
}

pub mod weight {
    use super::*;

    pub fn to_display(kg: f64, unit: WeightUnit) -> f64 {
        match unit {
            WeightUnit::Kg => kg,
            WeightUnit::G => kg * G_PER_KG,
        }
    }

    pub fn to_base(value: f64, unit: WeightUnit) -> f64 {
        match unit {
            WeightUnit::Kg => value,
            WeightUnit::G => value / G_PER_KG,
        }
    }
}

pub mod water {
    use super::*;

    pub fn to_display(ml: f64, unit: WaterUnit) -> f64 {
        match unit {
            WaterUnit::Ml => whole(ml),
            WaterUnit::FlOz => whole(ml * FL_OZ_PER_ML),
        }
    }

    pub fn to_base(value: f64, unit: WaterUnit) -> f64 {
        match unit {
            WaterUnit::Ml => whole(value),
            WaterUnit::FlOz => whole(value * ML_PER_FL_OZ),
        }
    }
}

pub mod temperature {
    use super::*;

    pub fn to_display(celsius: f64, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::C => celsius,
            TemperatureUnit::F => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn to_base(value: f64, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::C => value,
            TemperatureUnit::F => (value - 32.0) * 5.0 / 9.0,
        }
    }
}

pub fn format_height(cm: f64, unit: HeightUnit) -> String {
    format!("{:.1} {}", tenths(height::to_display(cm, unit)), unit)
}

pub fn format_weight(kg: f64, unit: WeightUnit) -> String {
    format!("{:.1} {}", tenths(weight::to_display(kg, unit)), unit)
}

pub fn format_water(ml: f64, unit: WaterUnit) -> String {
    format!("{} {}", water::to_display(ml, unit), unit)
}

pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{} °{}", whole(temperature::to_display(celsius, unit)), unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_round_trip_full_precision() {
        let ft = height::to_display(100.0, HeightUnit::Ft);
        assert!((height::to_base(ft, HeightUnit::Ft) - 100.0).abs() < 1e-9);
        assert_eq!(height::to_display(172.5, HeightUnit::Cm), 172.5);
    }

    #[test]
    fn test_height_rounds_only_for_display() {
        assert_eq!(format_height(100.0, HeightUnit::Ft), "3.3 ft");
        // re-entering the displayed value lands within half a display step
        let reentered = height::to_base(3.3, HeightUnit::Ft);
        assert!((reentered - 100.0).abs() < 0.05 * 30.48);
    }

    #[test]
    fn test_weight_conversions() {
        assert_eq!(weight::to_display(70.0, WeightUnit::G), 70_000.0);
        assert_eq!(weight::to_base(70_000.0, WeightUnit::G), 70.0);
        assert_eq!(format_weight(70.0, WeightUnit::Kg), "70.0 kg");
        assert_eq!(format_weight(0.0725, WeightUnit::G), "72.5 g");
    }

    #[test]
    fn test_water_rounds_in_converter() {
        assert_eq!(water::to_display(1000.0, WaterUnit::Ml), 1000.0);
        assert_eq!(water::to_display(1000.4, WaterUnit::Ml), 1000.0);
        assert_eq!(water::to_display(1000.0, WaterUnit::FlOz), 34.0);
        assert_eq!(water::to_base(34.0, WaterUnit::FlOz), 1005.0);
        assert_eq!(water::to_base(250.6, WaterUnit::Ml), 251.0);
        assert_eq!(format_water(1000.0, WaterUnit::FlOz), "34 fl oz");
    }

    #[test]
    fn test_temperature_conversions() {
        assert_eq!(temperature::to_display(0.0, TemperatureUnit::F), 32.0);
        assert_eq!(temperature::to_display(100.0, TemperatureUnit::F), 212.0);
        assert_eq!(temperature::to_base(32.0, TemperatureUnit::F), 0.0);
        assert_eq!(temperature::to_base(21.5, TemperatureUnit::C), 21.5);
    }

    #[test]
    fn test_temperature_display_rounds_to_integer() {
        assert_eq!(format_temperature(36.6, TemperatureUnit::C), "37 °C");
        assert_eq!(format_temperature(37.0, TemperatureUnit::F), "99 °F");
    }

    #[test]
    fn test_values_rounding_to_zero_display_unsigned() {
        assert_eq!(format_temperature(-0.3, TemperatureUnit::C), "0 °C");
        assert_eq!(format_temperature(-17.9, TemperatureUnit::F), "0 °F");
        assert_eq!(format_water(-0.3, WaterUnit::Ml), "0 ml");
        assert_eq!(format_water(-0.4, WaterUnit::FlOz), "0 fl oz");
        assert_eq!(format_height(-0.02, HeightUnit::Cm), "0.0 cm");
        assert_eq!(format_weight(-0.00004, WeightUnit::G), "0.0 g");
        assert!(water::to_display(-0.3, WaterUnit::Ml).is_sign_positive());
    }
}
