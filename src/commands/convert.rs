use crate::units::convert::{height, temperature, water, weight};
use crate::units::{
    HeightUnit, Kind, TemperatureUnit, WaterUnit, WeightUnit, format_height, format_temperature,
    format_water, format_weight,
};
use anyhow::Result;

/// Render the conversion as text. `to` converts a base value into that unit,
/// `from` converts a value given in that unit back to base.
pub fn render(kind: Kind, value: f64, to: Option<&str>, from: Option<&str>) -> Result<String> {
    let out = match (to, from) {
        (Some(unit), None) => match kind {
            Kind::Height => format_height(value, unit.parse()?),
            Kind::Weight => format_weight(value, unit.parse()?),
            Kind::Water => format_water(value, unit.parse()?),
            Kind::Temperature => format_temperature(value, unit.parse()?),
        },
        (None, Some(unit)) => match kind {
            Kind::Height => format_height(height::to_base(value, unit.parse()?), HeightUnit::Cm),
            Kind::Weight => format_weight(weight::to_base(value, unit.parse()?), WeightUnit::Kg),
            Kind::Water => format_water(water::to_base(value, unit.parse()?), WaterUnit::Ml),
            Kind::Temperature => format_temperature(
                temperature::to_base(value, unit.parse()?),
                TemperatureUnit::C,
            ),
        },
        _ => anyhow::bail!("Give exactly one of --to <unit> or --from <unit>"),
    };
    Ok(out)
}

pub fn convert(kind: Kind, value: f64, to: Option<&str>, from: Option<&str>) -> Result<()> {
    if !value.is_finite() {
        anyhow::bail!("Value must be a finite number");
    }
    println!("{}", render(kind, value, to, from)?);
    Ok(())
}
