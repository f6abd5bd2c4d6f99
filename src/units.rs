//! Physical units declared on the fields exchanged with file readers and writers.
//!
//! Readers hand over plain arrays with a units attribute, the same way a NetCDF variable carries
//! a `units` attribute. Before any formula sees the numbers, the declared unit is checked against
//! the unit the formula was written for. A mismatch is fatal to that call.
use crate::error::{AnalysisError, Result};
use optional::{none, some, Optioned};
use std::{fmt::Display, str::FromStr};
use strum_macros::{EnumIter, EnumString};

/// Units recognized on exchanged fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter)]
pub enum Unit {
    #[strum(serialize = "K")]
    #[allow(missing_docs)]
    Kelvin,
    #[strum(serialize = "degC", serialize = "deg_C", serialize = "C", serialize = "deg C")]
    #[allow(missing_docs)]
    Celsius,
    #[strum(serialize = "hPa", serialize = "mb", serialize = "mbar")]
    #[allow(missing_docs)]
    HectoPascal,
    #[strum(serialize = "Pa")]
    #[allow(missing_docs)]
    Pascal,
    /// Relative humidity in percent.
    #[strum(serialize = "%")]
    Percent,
    /// Specific humidity, mass of vapor per mass of moist air.
    #[strum(serialize = "kg kg**-1", serialize = "kg/kg")]
    KgPerKg,
    /// Mixing ratio.
    #[strum(serialize = "g/kg", serialize = "gr/kg")]
    GramsPerKg,
    #[strum(serialize = "m")]
    #[allow(missing_docs)]
    Meters,
    /// Precipitable water, equivalently kg m^-2.
    #[strum(serialize = "mm", serialize = "kg/m^2")]
    Millimeters,
    #[strum(serialize = "kg/m^3")]
    #[allow(missing_docs)]
    KgPerCubicMeter,
}

impl Unit {
    /// The canonical spelling of the unit, as written to output metadata.
    pub fn symbol(self) -> &'static str {
        use crate::units::Unit::*;

        match self {
            Kelvin => "K",
            Celsius => "degC",
            HectoPascal => "hPa",
            Pascal => "Pa",
            Percent => "%",
            KgPerKg => "kg kg**-1",
            GramsPerKg => "g/kg",
            Meters => "m",
            Millimeters => "mm",
            KgPerCubicMeter => "kg/m^3",
        }
    }
}

impl Display for Unit {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "{}", self.symbol())
    }
}

/// The two pressure units used in reanalysis and sounding data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressureUnit {
    #[allow(missing_docs)]
    HectoPascal,
    #[allow(missing_docs)]
    Pascal,
}

impl PressureUnit {
    /// Multiply a value in hPa by this to get a value in these units.
    #[inline]
    pub fn scale_from_hpa(self) -> f64 {
        match self {
            PressureUnit::HectoPascal => 1.0,
            PressureUnit::Pascal => 100.0,
        }
    }

    /// Multiply a value in Pa by this to get a value in these units.
    #[inline]
    pub fn scale_from_pa(self) -> f64 {
        match self {
            PressureUnit::HectoPascal => 0.01,
            PressureUnit::Pascal => 1.0,
        }
    }

    /// Multiply a value in these units by this to get a value in Pa.
    #[inline]
    pub fn scale_to_pa(self) -> f64 {
        match self {
            PressureUnit::HectoPascal => 100.0,
            PressureUnit::Pascal => 1.0,
        }
    }

    /// Interpret a declared unit as a pressure unit.
    pub fn from_unit(unit: Unit, field: &'static str) -> Result<Self> {
        match unit {
            Unit::HectoPascal => Ok(PressureUnit::HectoPascal),
            Unit::Pascal => Ok(PressureUnit::Pascal),
            other => Err(AnalysisError::UnitMismatch {
                field,
                expected: "hPa or Pa",
                found: other.symbol().to_owned(),
            }),
        }
    }
}

impl From<PressureUnit> for Unit {
    fn from(unit: PressureUnit) -> Self {
        match unit {
            PressureUnit::HectoPascal => Unit::HectoPascal,
            PressureUnit::Pascal => Unit::Pascal,
        }
    }
}

/// How the moisture of a profile was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HumidityKind {
    /// Relative humidity in percent.
    Relative,
    /// Specific humidity in kg/kg.
    Specific,
}

/// A one dimensional array with its declared units. `NaN` marks a missing value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Field {
    /// The data values.
    pub values: Vec<f64>,
    /// The units attribute as written by the producer, if there was one.
    pub units: Option<String>,
}

impl Field {
    /// Create a field with declared units.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use column_moisture::{Field, Unit};
    ///
    /// let t = Field::new(vec![288.0, 280.0], "K");
    /// assert_eq!(t.declared_unit(), Some(Unit::Kelvin));
    /// assert!(t.expect_units("temperature", Unit::Kelvin).is_ok());
    /// assert!(t.expect_units("temperature", Unit::Celsius).is_err());
    /// ```
    pub fn new<S: Into<String>>(values: Vec<f64>, units: S) -> Self {
        Field {
            values,
            units: Some(units.into()),
        }
    }

    /// Create a field that carries no units attribute.
    pub fn without_units(values: Vec<f64>) -> Self {
        Field {
            values,
            units: None,
        }
    }

    /// The declared unit, if it was declared and is recognized.
    pub fn declared_unit(&self) -> Option<Unit> {
        self.units
            .as_ref()
            .and_then(|u| Unit::from_str(u.trim()).ok())
    }

    /// Check the declared unit and hand back the values if it is the expected one.
    pub fn expect_units(&self, field: &'static str, expected: Unit) -> Result<&[f64]> {
        match self.declared_unit() {
            Some(unit) if unit == expected => Ok(&self.values),
            _ => Err(self.mismatch(field, expected.symbol())),
        }
    }

    /// Check that a humidity field is relative humidity (%) or specific humidity (kg kg**-1) and
    /// hand back which one it is along with the values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use column_moisture::{Field, HumidityKind};
    ///
    /// let q = Field::new(vec![0.01, 0.008], "kg/kg");
    /// assert_eq!(q.expect_humidity("humidity").unwrap().0, HumidityKind::Specific);
    ///
    /// let rh = Field::new(vec![80.0, 60.0], "%");
    /// assert_eq!(rh.expect_humidity("humidity").unwrap().0, HumidityKind::Relative);
    ///
    /// assert!(Field::new(vec![12.0], "g/kg").expect_humidity("humidity").is_err());
    /// ```
    pub fn expect_humidity(&self, field: &'static str) -> Result<(HumidityKind, &[f64])> {
        match self.declared_unit() {
            Some(Unit::Percent) => Ok((HumidityKind::Relative, &self.values)),
            Some(Unit::KgPerKg) => Ok((HumidityKind::Specific, &self.values)),
            _ => Err(self.mismatch(field, "% or kg kg**-1")),
        }
    }

    fn mismatch(&self, field: &'static str, expected: &'static str) -> AnalysisError {
        AnalysisError::UnitMismatch {
            field,
            expected,
            found: self
                .units
                .clone()
                .unwrap_or_else(|| "<undeclared>".to_owned()),
        }
    }

    /// The values with `NaN` (and other non-finite values) mapped to missing.
    pub fn to_optioned(&self) -> Vec<Optioned<f64>> {
        self.values
            .iter()
            .map(|&v| {
                if v.is_finite() {
                    some(v)
                } else {
                    none()
                }
            })
            .collect()
    }
}
