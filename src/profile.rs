//! Create profiles of derived moisture variables.
//!
//! The output is at the same levels as the sounding. If one of the profiles required for a
//! variable is missing from the sounding, the result cannot be calculated and an empty vector is
//! returned. Individual samples that cannot be calculated are missing values.
use crate::{
    keys::{DensityComponent, Phase, SatVapMethod},
    met_formulas,
    sounding::Sounding,
    units::PressureUnit,
};
use itertools::izip;
use metfor::{Celsius, HectoPascal};
use optional::{none, some, Optioned};

/// Given a sounding, get the dew point profile.
///
/// A stored dew point profile is returned as is, otherwise it is derived from temperature and
/// relative humidity.
pub fn dew_point(snd: &Sounding) -> Vec<Optioned<Celsius>> {
    if !snd.dew_point_profile().is_empty() {
        return snd.dew_point_profile().to_vec();
    }

    let t_profile = snd.temperature_profile();
    let rh_profile = snd.relative_humidity_profile();

    if t_profile.len().min(rh_profile.len()) == 0 {
        return vec![];
    }

    izip!(t_profile, rh_profile)
        .map(|(t_opt, rh_opt)| {
            t_opt
                .into_option()
                .and_then(|t| rh_opt.into_option().map(|rh| (t, rh)))
                .and_then(|(t, rh)| met_formulas::dewpoint_from_rh(t, rh))
        })
        .map(Optioned::from)
        .collect()
}

/// Given a sounding, calculate a profile of vapor pressure in hPa.
///
/// This is the saturation vapor pressure over liquid water at the dew point using the Buck
/// formula. A sounding with no dew point or humidity, but with specific humidity and pressure,
/// gets its vapor pressure from the specific humidity.
pub fn vapor_pressure(snd: &Sounding) -> Vec<Optioned<HectoPascal>> {
    let dp_profile = dew_point(snd);

    if !dp_profile.is_empty() {
        return dp_profile
            .into_iter()
            .map(|dp_opt| dp_opt.map_t(met_formulas::vapor_pressure))
            .collect();
    }

    let p_profile = snd.pressure_profile();
    let q_profile = snd.specific_humidity_profile();

    if p_profile.len().min(q_profile.len()) == 0 {
        return vec![];
    }

    izip!(p_profile, q_profile)
        .map(|(p_opt, q_opt)| {
            if let (Some(HectoPascal(p)), Some(q)) = (p_opt.into_option(), q_opt.into_option()) {
                some(HectoPascal(
                    met_formulas::vapor_pressure_from_specific_humidity(q, p),
                ))
            } else {
                none()
            }
        })
        .collect()
}

/// Given a sounding, calculate a profile of the saturation vapor pressure at the temperature.
pub fn saturation_vapor_pressure(
    snd: &Sounding,
    method: SatVapMethod,
    phase: Phase,
    units: PressureUnit,
) -> Vec<Optioned<f64>> {
    snd.temperature_profile()
        .iter()
        .map(|t_opt| {
            t_opt.map_t(|t| met_formulas::saturation_vapor_pressure(t, method, phase, units))
        })
        .collect()
}

/// Given a sounding, calculate a profile of the mixing ratio in g/kg.
pub fn mixing_ratio(snd: &Sounding) -> Vec<Optioned<f64>> {
    let p_profile = snd.pressure_profile();
    let e_profile = vapor_pressure(snd);

    if p_profile.len().min(e_profile.len()) == 0 {
        return vec![];
    }

    izip!(p_profile, e_profile)
        .map(|(p_opt, e_opt)| {
            p_opt
                .into_option()
                .and_then(|p| e_opt.into_option().map(|e| (p, e)))
                .and_then(|(p, e)| met_formulas::mixing_ratio(e, p))
        })
        .map(Optioned::from)
        .collect()
}

/// Given a sounding, get the specific humidity profile in kg/kg.
///
/// A stored specific humidity profile is returned as is, otherwise it is derived from the mixing
/// ratio.
pub fn specific_humidity(snd: &Sounding) -> Vec<Optioned<f64>> {
    if !snd.specific_humidity_profile().is_empty() {
        return snd.specific_humidity_profile().to_vec();
    }

    mixing_ratio(snd)
        .into_iter()
        .map(|w_opt| w_opt.map_t(met_formulas::specific_humidity))
        .collect()
}

/// Given a sounding, calculate a profile of humid air density in kg/m^3.
pub fn density(snd: &Sounding, component: DensityComponent) -> Vec<Optioned<f64>> {
    let p_profile = snd.pressure_profile();
    let t_profile = snd.temperature_profile();
    let e_profile = vapor_pressure(snd);

    if p_profile.len().min(t_profile.len()).min(e_profile.len()) == 0 {
        return vec![];
    }

    izip!(p_profile, t_profile, e_profile)
        .map(|(p_opt, t_opt, e_opt)| {
            if let (Some(p), Some(t), Some(e)) =
                (p_opt.into_option(), t_opt.into_option(), e_opt.into_option())
            {
                some(met_formulas::humid_density(t, p, e, component))
            } else {
                none()
            }
        })
        .collect()
}
