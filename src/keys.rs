//! Enums used as keys for setting options in functions.
//!
//! Every option is a closed set. Names coming in from configuration or another program are
//! parsed with `from_name`, which rejects anything unrecognized with
//! [`AnalysisError::UnsupportedFormula`](crate::AnalysisError::UnsupportedFormula) before any
//! formula is evaluated.
use crate::error::{AnalysisError, Result};
use serde::Deserialize;
use std::{convert::TryFrom, str::FromStr};
use strum_macros::{EnumIter, EnumString};

/// Empirical formula for the saturation vapor pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter)]
pub enum SatVapMethod {
    /// Magnus type formula from the WMO CIMO guide, the default choice.
    #[strum(serialize = "default", serialize = "Default", serialize = "Magnus")]
    Magnus,
    /// Buck (1996) formula.
    #[strum(serialize = "Buck", serialize = "buck")]
    Buck,
}

/// The surface the vapor is in equilibrium with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter)]
pub enum Phase {
    /// Always over liquid water.
    #[strum(serialize = "liquid")]
    Liquid,
    /// Over ice below freezing, over liquid water otherwise.
    #[strum(serialize = "ice")]
    Ice,
}

/// Which part of humid air a density refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter)]
pub enum DensityComponent {
    /// Density of the dry air alone.
    #[strum(serialize = "dry_air")]
    DryAir,
    /// Density of the water vapor alone.
    #[strum(serialize = "wv_density")]
    WaterVapor,
    /// Sum of the dry air and water vapor densities.
    #[strum(serialize = "both")]
    Both,
}

/// Numerical rule used to reduce a column to a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Deserialize)]
#[serde(try_from = "String")]
pub enum IntegrationMethod {
    /// Trapezoid rule over the vertical coordinate.
    #[strum(serialize = "trapz")]
    Trapz,
    /// Sum of layer averages times layer thickness.
    #[strum(serialize = "sum")]
    Sum,
}

macro_rules! impl_from_name {
    ($key:ident, $formula:expr) => {
        impl $key {
            /// Parse an option name, failing with `UnsupportedFormula` if it is not recognized.
            pub fn from_name(name: &str) -> Result<Self> {
                $key::from_str(name).map_err(|_| AnalysisError::UnsupportedFormula {
                    formula: $formula,
                    option: name.to_owned(),
                })
            }
        }
    };
}

impl_from_name!(SatVapMethod, "saturation_vapor_pressure");
impl_from_name!(Phase, "saturation_vapor_pressure");
impl_from_name!(DensityComponent, "humid_density");
impl_from_name!(IntegrationMethod, "vertical_integration");

impl TryFrom<String> for IntegrationMethod {
    type Error = AnalysisError;

    fn try_from(name: String) -> Result<Self> {
        IntegrationMethod::from_name(&name)
    }
}
