#![warn(missing_docs)]
//! Functions and data types for the moisture content of atmospheric columns.
//!
//! Radiosonde profiles ([`Sounding`]) and reanalysis columns on hybrid model levels
//! ([`ModelColumn`]) are reduced to precipitable water and the water vapor weighted mean
//! temperature of the column, and the saturated levels of a sounding are labeled as low, middle,
//! or high cloud. A [`BatchProcessor`] applies one [`BatchConfig`] to many profiles.
//!
//! Missing values are carried as `optional::Optioned` and all quantities use the
//! [metfor](https://crates.io/crates/metfor) unit types.

//
// API
//
pub use crate::{
    batch::{BatchMetadata, BatchProcessor, BatchResult},
    cloud::{classify_cloud_layers, cloud_layers, CloudLayer, SATURATION_DEPRESSION},
    config::BatchConfig,
    error::{AnalysisError, IntegrationFault, Result},
    hybrid::{
        FullLevels, GridColumn, HybridLevel, HybridLevelTable, ModelColumn,
        REFERENCE_SURFACE_PRESSURE,
    },
    integration::{
        strategy_for, surface_temperature, Column, ContinuousIntegral, Cutoffs, IntegrationParams,
        LayerDifference, VerticalCoordinate, VerticalIntegrationStrategy,
    },
    interpolation::interpolate_to_pressure,
    keys::{DensityComponent, IntegrationMethod, Phase, SatVapMethod},
    met_formulas::{
        dewpoint_from_rh, dewpoint_from_vapor_pressure, dewpoint_from_vapor_pressure_with,
        gravity_at_latitude, humid_density, mixing_ratio, saturation_vapor_pressure,
        specific_humidity, vapor_pressure, vapor_pressure_from_rh,
        vapor_pressure_from_specific_humidity,
    },
    sounding::{nominal_sounding_time, Sounding, StationInfo},
    stats::{iqr_bounds, quantile, screen_outliers},
    summary::{ScalarSummary, SummaryVariable},
    units::{Field, HumidityKind, PressureUnit, Unit},
};

#[doc(hidden)]
pub use crate::sounding::doctest;

pub mod profile;

//
// Internal use only
//
mod batch;
mod cloud;
mod config;
mod error;
mod hybrid;
mod integration;
mod interpolation;
mod keys;
mod met_formulas;
mod sounding;
mod stats;
mod summary;
mod units;
