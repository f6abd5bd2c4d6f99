//! Data type and methods for the scalar results of one profile.
use chrono::NaiveDateTime;
use metfor::{Kelvin, Mm};
use optional::Optioned;
use strum_macros::{EnumIter, EnumString};

/// The scalar variables computed for every profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter)]
pub enum SummaryVariable {
    /// Surface temperature, the lowest valid report.
    #[strum(serialize = "Ts")]
    SurfaceTemperature,
    /// Water vapor weighted mean temperature.
    #[strum(serialize = "Tm")]
    MeanTemperature,
    /// Precipitable water with the configured integration method.
    #[strum(serialize = "Tpw")]
    PrecipitableWater,
    /// Precipitable water with the alternate integration method.
    #[strum(serialize = "Tpw1")]
    PrecipitableWaterAlt,
}

impl SummaryVariable {
    /// Units of the variable, as written to output metadata.
    pub fn units(self) -> &'static str {
        use crate::summary::SummaryVariable::*;

        match self {
            SurfaceTemperature | MeanTemperature => "K",
            PrecipitableWater | PrecipitableWaterAlt => "mm",
        }
    }

    /// Descriptive name of the variable.
    pub fn long_name(self) -> &'static str {
        use crate::summary::SummaryVariable::*;

        match self {
            SurfaceTemperature => "Surface temperature",
            MeanTemperature => "Water vapor mean atmospheric temperature",
            PrecipitableWater => "precipitable_water",
            PrecipitableWaterAlt => "precipitable_water from the alternate integration method",
        }
    }

    /// Short name of the variable, used as a key in output files.
    pub fn short_name(self) -> &'static str {
        use crate::summary::SummaryVariable::*;

        match self {
            SurfaceTemperature => "Ts",
            MeanTemperature => "Tm",
            PrecipitableWater => "Tpw",
            PrecipitableWaterAlt => "Tpw1",
        }
    }
}

/// The scalar results for one profile.
///
/// Every value is missing when the profile could not be processed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScalarSummary {
    // Position of the profile in the batch.
    index: usize,
    // Valid time of the profile, if known.
    time: Option<NaiveDateTime>,

    surface_temperature: Optioned<f64>,
    mean_temperature: Optioned<f64>,
    precipitable_water: Optioned<f64>,
    precipitable_water_alt: Optioned<f64>,
}

impl ScalarSummary {
    /// Create a new summary with all values missing.
    pub fn new(index: usize, time: Option<NaiveDateTime>) -> Self {
        ScalarSummary {
            index,
            time,
            ..Self::default()
        }
    }

    /// Set a value in the summary, in the units of [`SummaryVariable::units`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use column_moisture::{ScalarSummary, SummaryVariable};
    ///
    /// let summary = ScalarSummary::new(0, None)
    ///     .with_value(SummaryVariable::MeanTemperature, 275.3)
    ///     .with_value(SummaryVariable::PrecipitableWater, None);
    ///
    /// assert_eq!(summary.value(SummaryVariable::MeanTemperature).unwrap(), 275.3);
    /// assert!(summary.value(SummaryVariable::PrecipitableWater).is_none());
    /// ```
    pub fn with_value<T>(self, var: SummaryVariable, value: T) -> Self
    where
        Optioned<f64>: From<T>,
    {
        use crate::summary::SummaryVariable::*;

        let opt = Optioned::from(value);

        match var {
            SurfaceTemperature => ScalarSummary {
                surface_temperature: opt,
                ..self
            },
            MeanTemperature => ScalarSummary {
                mean_temperature: opt,
                ..self
            },
            PrecipitableWater => ScalarSummary {
                precipitable_water: opt,
                ..self
            },
            PrecipitableWaterAlt => ScalarSummary {
                precipitable_water_alt: opt,
                ..self
            },
        }
    }

    /// Method to retrieve a value from the summary.
    pub fn value(&self, var: SummaryVariable) -> Optioned<f64> {
        use crate::summary::SummaryVariable::*;

        match var {
            SurfaceTemperature => self.surface_temperature,
            MeanTemperature => self.mean_temperature,
            PrecipitableWater => self.precipitable_water,
            PrecipitableWaterAlt => self.precipitable_water_alt,
        }
    }

    /// Position of the profile in the batch it came from.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Valid time of the profile.
    #[inline]
    pub fn time(&self) -> Option<NaiveDateTime> {
        self.time
    }

    /// Surface temperature.
    #[inline]
    pub fn surface_temperature(&self) -> Optioned<Kelvin> {
        self.surface_temperature.map_t(Kelvin)
    }

    /// Water vapor weighted mean temperature.
    #[inline]
    pub fn mean_temperature(&self) -> Optioned<Kelvin> {
        self.mean_temperature.map_t(Kelvin)
    }

    /// Precipitable water with the configured method.
    #[inline]
    pub fn precipitable_water(&self) -> Optioned<Mm> {
        self.precipitable_water.map_t(Mm)
    }

    /// Precipitable water with the alternate method.
    #[inline]
    pub fn precipitable_water_alt(&self) -> Optioned<Mm> {
        self.precipitable_water_alt.map_t(Mm)
    }

    /// True if every value is missing.
    pub fn is_missing(&self) -> bool {
        self.surface_temperature.is_none()
            && self.mean_temperature.is_none()
            && self.precipitable_water.is_none()
            && self.precipitable_water_alt.is_none()
    }
}
