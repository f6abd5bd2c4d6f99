//! Thermodynamic formulas for moist air.
//!
//! These are pure functions of a single sample. Profiles of derived values are built from them in
//! the [`profile`](crate::profile) module.
use crate::{
    keys::{DensityComponent, Phase, SatVapMethod},
    units::PressureUnit,
};
use metfor::{Celsius, HectoPascal, Kelvin, Quantity};
use tracing::warn;

/// Molecular weight of water over that of dry air, also the ratio of the gas constants.
pub const EPSILON: f64 = 18.015 / 28.9647;

/// Specific gas constant for dry air, J kg^-1 K^-1
pub const RS_DRY_AIR: f64 = 287.05;

/// Specific gas constant for water vapor, J kg^-1 K^-1
pub const RS_WATER_VAPOR: f64 = 461.52;

/// Relative humidity above which the input is suspected to be in the wrong units.
pub const RH_SANITY_LIMIT: f64 = 120.0;

/// Saturation vapor pressure.
///
/// The result is in hPa, or Pa if `units` is [`PressureUnit::Pascal`]. With [`Phase::Ice`] the
/// ice surface formula is used where the temperature is below 0&deg;C and the liquid water
/// formula elsewhere.
///
/// # Examples
///
/// ```rust
/// use column_moisture::{saturation_vapor_pressure, Phase, PressureUnit, SatVapMethod};
/// use metfor::Celsius;
///
/// let es = saturation_vapor_pressure(
///     Celsius(0.0),
///     SatVapMethod::Buck,
///     Phase::Liquid,
///     PressureUnit::HectoPascal,
/// );
/// assert!((es - 6.1121).abs() < 1.0e-10);
/// ```
pub fn saturation_vapor_pressure(
    temperature: Celsius,
    method: SatVapMethod,
    phase: Phase,
    units: PressureUnit,
) -> f64 {
    let Celsius(t) = temperature;

    let (over_liquid, over_ice) = match method {
        SatVapMethod::Magnus => (
            6.112 * (17.67 * t / (t + 243.12)).exp(),
            6.112 * (22.46 * t / (t + 272.62)).exp(),
        ),
        SatVapMethod::Buck => (
            6.1121 * ((18.678 - t / 234.5) * (t / (257.4 + t))).exp(),
            6.1125 * ((23.036 - t / 333.7) * (t / (279.82 + t))).exp(),
        ),
    };

    let es = match phase {
        Phase::Liquid => over_liquid,
        Phase::Ice if t < 0.0 => over_ice,
        Phase::Ice => over_liquid,
    };

    es * units.scale_from_hpa()
}

/// Dew point from the vapor pressure (hPa) using the Bolton (1980) inversion.
///
/// Returns `None` for a non-positive vapor pressure, the caller should treat that as missing data.
pub fn dewpoint_from_vapor_pressure(vapor_pressure: HectoPascal) -> Option<Celsius> {
    let HectoPascal(e) = vapor_pressure;
    if e <= 0.0 {
        return None;
    }

    let val = (e / 6.112).ln();
    finite_celsius(243.5 * val / (17.67 - val))
}

/// Dew point from the vapor pressure (hPa) by exactly inverting the liquid water formula of
/// `method`.
pub fn dewpoint_from_vapor_pressure_with(
    vapor_pressure: HectoPascal,
    method: SatVapMethod,
) -> Option<Celsius> {
    let HectoPascal(e) = vapor_pressure;
    if e <= 0.0 {
        return None;
    }

    match method {
        SatVapMethod::Magnus => {
            let val = (e / 6.112).ln();
            finite_celsius(243.12 * val / (17.67 - val))
        }
        SatVapMethod::Buck => {
            // t^2 / 234.5 - (18.678 - val) t + 257.4 val = 0, take the small root.
            let val = (e / 6.1121).ln();
            let b = 18.678 - val;
            let disc = b * b - 4.0 * 257.4 * val / 234.5;
            if disc < 0.0 {
                return None;
            }
            finite_celsius(2.0 * 257.4 * val / (b + disc.sqrt()))
        }
    }
}

/// Vapor pressure (hPa) from temperature and relative humidity (%), Buck formula over liquid
/// water.
///
/// Relative humidity above 120% usually means the humidity was delivered as a fraction times a
/// wrong scale factor. That is logged as a warning and the value is used as given.
pub fn vapor_pressure_from_rh(temperature: Celsius, rh: f64) -> HectoPascal {
    if rh > RH_SANITY_LIMIT {
        warn!(
            rh,
            limit = RH_SANITY_LIMIT,
            "relative humidity above limit, ensure proper units"
        );
    }

    let es = saturation_vapor_pressure(
        temperature,
        SatVapMethod::Buck,
        Phase::Liquid,
        PressureUnit::HectoPascal,
    );

    HectoPascal(rh / 100.0 * es)
}

/// Dew point from temperature and relative humidity (%).
///
/// The vapor pressure from [`vapor_pressure_from_rh`] is inverted with the exact inverse of the
/// Buck formula, not the Bolton approximation used by [`dewpoint_from_vapor_pressure`], so
/// saturated air has a dew point equal to its temperature. The two differ by less than 0.1&deg;C
/// between -40&deg;C and 40&deg;C.
pub fn dewpoint_from_rh(temperature: Celsius, rh: f64) -> Option<Celsius> {
    dewpoint_from_vapor_pressure_with(vapor_pressure_from_rh(temperature, rh), SatVapMethod::Buck)
}

/// Vapor pressure (hPa) in equilibrium with liquid water at the dew point, Buck formula.
#[inline]
pub fn vapor_pressure(dew_point: Celsius) -> HectoPascal {
    HectoPascal(saturation_vapor_pressure(
        dew_point,
        SatVapMethod::Buck,
        Phase::Liquid,
        PressureUnit::HectoPascal,
    ))
}

/// Mixing ratio of water vapor in g/kg.
///
/// Returns `None` when the vapor pressure reaches the total pressure.
pub fn mixing_ratio(vapor_pressure: HectoPascal, pressure: HectoPascal) -> Option<f64> {
    let HectoPascal(e) = vapor_pressure;
    let HectoPascal(p) = pressure;

    let dry = p - e;
    if dry <= 0.0 || !dry.is_finite() {
        return None;
    }

    Some(1000.0 * EPSILON * e / dry)
}

/// Specific humidity (kg/kg) from a mixing ratio in g/kg.
#[inline]
pub fn specific_humidity(mixing_ratio: f64) -> f64 {
    let w = mixing_ratio / 1000.0;
    w / (1.0 + w)
}

/// Vapor pressure from specific humidity (kg/kg) and pressure, in the units of `pressure`.
#[inline]
pub fn vapor_pressure_from_specific_humidity(specific_humidity: f64, pressure: f64) -> f64 {
    let q = specific_humidity;
    q * pressure / (EPSILON + (1.0 - EPSILON) * q)
}

/// Density of humid air in kg/m^3.
///
/// The total pressure is split into dry air and water vapor partial pressures and the ideal gas
/// law is applied to each with its own gas constant.
pub fn humid_density(
    temperature: Celsius,
    pressure: HectoPascal,
    vapor_pressure: HectoPascal,
    component: DensityComponent,
) -> f64 {
    let t_k = Kelvin::from(temperature).unpack();
    let p_pa = pressure.unpack() * 100.0;
    let e_pa = vapor_pressure.unpack() * 100.0;

    let rho_dry = (p_pa - e_pa) / (RS_DRY_AIR * t_k);
    let rho_vapor = e_pa / (RS_WATER_VAPOR * t_k);

    match component {
        DensityComponent::DryAir => rho_dry,
        DensityComponent::WaterVapor => rho_vapor,
        DensityComponent::Both => rho_dry + rho_vapor,
    }
}

/// Normal gravity (m/s^2) at the surface for a latitude in degrees, 1980 international formula.
pub fn gravity_at_latitude(latitude: f64) -> f64 {
    let phi = latitude.to_radians();
    let sin_phi = phi.sin();
    let sin_2phi = (2.0 * phi).sin();

    9.780327 * (1.0 + 0.0053024 * sin_phi * sin_phi - 0.0000058 * sin_2phi * sin_2phi)
}

#[inline]
fn finite_celsius(val: f64) -> Option<Celsius> {
    if val.is_finite() {
        Some(Celsius(val))
    } else {
        None
    }
}
