//! Data type and methods to store an atmospheric sounding.

use crate::{
    error::{AnalysisError, Result},
    units::{Field, HumidityKind, Unit},
};
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use metfor::{Celsius, HectoPascal, Meters};
use optional::{none, some, Noned, Optioned};

pub use self::station_info::StationInfo;

/// All the variables stored in the sounding.
///
/// The upper air profile variables are stored in parallel vectors, starting with the lowest
/// report. If a profile lacks a certain variable, e.g. specific humidity, that whole vector has
/// length 0 instead of being full of missing values.
///
#[derive(Clone, Debug, Default)]
pub struct Sounding {
    // Description of the source of the sounding.
    source: Option<String>,

    // Station info
    station: StationInfo,

    // Nominal synoptic time of the sounding.
    valid_time: Option<NaiveDateTime>,
    // Time the balloon was released.
    launch_time: Option<NaiveDateTime>,

    // Profiles
    pressure: Vec<Optioned<HectoPascal>>,
    height: Vec<Optioned<Meters>>,
    temperature: Vec<Optioned<Celsius>>,
    dew_point: Vec<Optioned<Celsius>>,
    relative_humidity: Vec<Optioned<f64>>,
    specific_humidity: Vec<Optioned<f64>>,
}

macro_rules! make_profile_setter {
    ($(#[$attr:meta])* => $name:tt, $inner_type:tt, $p_var:ident) => {
        $(#[$attr])*
        pub fn $name(self, profile: Vec<Optioned<$inner_type>>) -> Self {
            Self {$p_var: profile, ..self}
        }
    };
}

impl Sounding {
    /// Create a new sounding with default values. This is a proxy for default with a clearer name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use column_moisture::Sounding;
    ///
    /// let snd = Sounding::new();
    /// assert!(snd.temperature_profile().is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Sounding::default()
    }

    /// Build a sounding from the fields of a radiosonde report.
    ///
    /// The declared units must be &deg;C for temperature, hPa for pressure, and m for height,
    /// otherwise this fails with `UnitMismatch`. The humidity is relative humidity if it is
    /// declared in % and specific humidity if it is declared in kg kg**-1. All four fields must
    /// have the same length. `NaN` values become missing values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use column_moisture::{Field, Sounding};
    ///
    /// let snd = Sounding::from_fields(
    ///     &Field::new(vec![20.0, 10.0, 0.0], "degC"),
    ///     &Field::new(vec![60.0, 50.0, 40.0], "%"),
    ///     &Field::new(vec![1000.0, 850.0, 700.0], "hPa"),
    ///     &Field::new(vec![0.0, 1500.0, 3000.0], "m"),
    /// )
    /// .unwrap();
    /// assert_eq!(snd.height_profile().len(), 3);
    ///
    /// // Temperature in Kelvin is rejected.
    /// assert!(Sounding::from_fields(
    ///     &Field::new(vec![293.15, 283.15, 273.15], "K"),
    ///     &Field::new(vec![60.0, 50.0, 40.0], "%"),
    ///     &Field::new(vec![1000.0, 850.0, 700.0], "hPa"),
    ///     &Field::new(vec![0.0, 1500.0, 3000.0], "m"),
    /// )
    /// .is_err());
    /// ```
    pub fn from_fields(
        temperature: &Field,
        humidity: &Field,
        pressure: &Field,
        height: &Field,
    ) -> Result<Self> {
        let t = temperature.expect_units("temperature", Unit::Celsius)?;
        let (kind, hum) = humidity.expect_humidity("humidity")?;
        let p = pressure.expect_units("pressure", Unit::HectoPascal)?;
        let h = height.expect_units("height", Unit::Meters)?;

        if [hum.len(), p.len(), h.len()].iter().any(|&len| len != t.len()) {
            return Err(AnalysisError::InvalidInput);
        }

        let snd = Sounding::new()
            .with_temperature_profile(to_profile(t, Celsius))
            .with_pressure_profile(to_profile(p, HectoPascal))
            .with_height_profile(to_profile(h, Meters));

        Ok(match kind {
            HumidityKind::Relative => snd.with_relative_humidity_profile(to_profile(hum, |v| v)),
            HumidityKind::Specific => snd.with_specific_humidity_profile(to_profile(hum, |v| v)),
        })
    }

    /// Add a source description to this sounding, e.g. the radiosonde type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use column_moisture::Sounding;
    ///
    /// let snd = Sounding::new().with_source_description("RS41".to_owned());
    /// assert_eq!(snd.source_description().unwrap(), "RS41");
    ///
    /// let snd = snd.with_source_description(None);
    /// assert!(snd.source_description().is_none());
    /// ```
    #[inline]
    pub fn with_source_description<S>(mut self, desc: S) -> Self
    where
        Option<String>: From<S>,
    {
        self.source = Option::from(desc);
        self
    }

    /// Retrieve a source description for this sounding.
    #[inline]
    pub fn source_description(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Builder function for setting the station info.
    #[inline]
    pub fn with_station_info(mut self, new_value: StationInfo) -> Self {
        self.station = new_value;
        self
    }

    /// Get the station info
    #[inline]
    pub fn station_info(&self) -> &StationInfo {
        &self.station
    }

    make_profile_setter!(
        /// Builder method for the pressure profile.
        ///
        /// # Examples
        /// ```rust
        /// use column_moisture::Sounding;
        /// use metfor::HectoPascal;
        /// use optional::{some, Optioned};
        ///
        /// let data = vec![1000.0, 925.0, 850.0, 700.0, 500.0, 300.0, 250.0, 200.0];
        /// let pressure_data: Vec<Optioned<HectoPascal>> = data.into_iter()
        ///     .map(HectoPascal)
        ///     .map(some)
        ///     .collect();
        ///
        /// let snd = Sounding::new().with_pressure_profile(pressure_data);
        /// assert_eq!(snd.pressure_profile().len(), 8);
        /// ```
        #[inline]
        => with_pressure_profile, HectoPascal, pressure
    );

    /// Get the pressure profile
    ///
    /// # Examples
    ///
    /// ```rust
    /// use column_moisture::Sounding;
    /// # use column_moisture::doctest::make_test_sounding;
    ///
    /// let snd = make_test_sounding();
    /// let data = snd.pressure_profile();
    ///
    /// for p in data {
    ///     if let Some(p) = p.into_option() {
    ///         println!("{:?}", p);
    ///     } else {
    ///         println!("missing value!");
    ///     }
    /// }
    ///
    /// // Uninitialized profiles just return an empty vector.
    /// let snd = Sounding::new();
    /// let data = snd.pressure_profile();
    /// assert!(data.is_empty());
    ///
    /// ```
    #[inline]
    pub fn pressure_profile(&self) -> &[Optioned<HectoPascal>] {
        &self.pressure
    }

    make_profile_setter!(
        /// Builder method for the geopotential height profile, meters above mean sea level.
        ///
        /// See `with_pressure_profile` for an example of usage, keeping in mind the units type may
        /// be different.
        #[inline]
        => with_height_profile, Meters, height
    );

    /// Get the geopotential height profile.
    #[inline]
    pub fn height_profile(&self) -> &[Optioned<Meters>] {
        &self.height
    }

    make_profile_setter!(
        /// Builder method for the temperature profile.
        ///
        /// See `with_pressure_profile` for an example of usage, keeping in mind the units type may
        /// be different.
        #[inline]
        => with_temperature_profile, Celsius, temperature
    );

    /// Get the temperature profile.
    #[inline]
    pub fn temperature_profile(&self) -> &[Optioned<Celsius>] {
        &self.temperature
    }

    make_profile_setter!(
        /// Builder method for the dew point profile.
        ///
        /// Radiosonde reports usually carry relative humidity instead, in which case the dew
        /// point is derived when needed.
        #[inline]
        => with_dew_point_profile, Celsius, dew_point
    );

    /// Get the dew point profile as stored, this is empty if it was never set.
    #[inline]
    pub fn dew_point_profile(&self) -> &[Optioned<Celsius>] {
        &self.dew_point
    }

    make_profile_setter!(
        /// Builder method for the relative humidity profile in percent.
        #[inline]
        => with_relative_humidity_profile, f64, relative_humidity
    );

    /// Get the relative humidity profile in percent.
    #[inline]
    pub fn relative_humidity_profile(&self) -> &[Optioned<f64>] {
        &self.relative_humidity
    }

    make_profile_setter!(
        /// Builder method for the specific humidity profile in kg/kg.
        #[inline]
        => with_specific_humidity_profile, f64, specific_humidity
    );

    /// Get the specific humidity profile in kg/kg.
    #[inline]
    pub fn specific_humidity_profile(&self) -> &[Optioned<f64>] {
        &self.specific_humidity
    }

    /// Nominal synoptic time of the sounding, if it was set.
    #[inline]
    pub fn valid_time(&self) -> Option<NaiveDateTime> {
        self.valid_time
    }

    /// Builder method to set the nominal synoptic time of the sounding.
    ///
    /// # Examples
    /// ```rust
    /// use column_moisture::Sounding;
    /// use chrono::NaiveDate;
    ///
    /// let vtime = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
    /// let _snd = Sounding::new().with_valid_time(vtime);
    /// let _snd = Sounding::new().with_valid_time(Some(vtime));
    /// ```
    #[inline]
    pub fn with_valid_time<T>(mut self, valid_time: T) -> Self
    where
        Option<NaiveDateTime>: From<T>,
    {
        self.valid_time = Option::from(valid_time);
        self
    }

    /// Time the balloon was released, if known.
    #[inline]
    pub fn launch_time(&self) -> Option<NaiveDateTime> {
        self.launch_time
    }

    /// Builder method to set the release time of the balloon.
    #[inline]
    pub fn with_launch_time<T>(mut self, launch_time: T) -> Self
    where
        Option<NaiveDateTime>: From<T>,
    {
        self.launch_time = Option::from(launch_time);
        self
    }

    /// The synoptic time this sounding represents.
    ///
    /// This is the valid time if it was set, otherwise it is derived from the launch time with
    /// [`nominal_sounding_time`].
    pub fn nominal_time(&self) -> Result<NaiveDateTime> {
        match (self.valid_time, self.launch_time) {
            (Some(vt), _) => Ok(vt),
            (None, Some(launch)) => nominal_sounding_time(launch),
            (None, None) => Err(AnalysisError::InvalidInput),
        }
    }

    /// The number of rows, which is the length of the longest profile.
    pub fn num_rows(&self) -> usize {
        [
            self.pressure.len(),
            self.height.len(),
            self.temperature.len(),
            self.dew_point.len(),
            self.relative_humidity.len(),
            self.specific_humidity.len(),
        ]
        .iter()
        .copied()
        .max()
        .unwrap_or(0)
    }
}

/// Map a radiosonde release time to the synoptic hour it reports for.
///
/// Releases from 22:00 through 02:00 belong to 00 UTC, those after 22:00 being assigned to the
/// following day. Releases from 10:00 through 14:00 belong to 12 UTC. Anything else is not a
/// routine sounding and fails with `InvalidInput`.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use column_moisture::nominal_sounding_time;
///
/// let day = NaiveDate::from_ymd_opt(2014, 3, 2).unwrap();
///
/// let launch = day.and_hms_opt(23, 15, 0).unwrap();
/// assert_eq!(
///     nominal_sounding_time(launch).unwrap(),
///     day.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap()
/// );
///
/// let launch = day.and_hms_opt(11, 5, 0).unwrap();
/// assert_eq!(nominal_sounding_time(launch).unwrap(), day.and_hms_opt(12, 0, 0).unwrap());
///
/// assert!(nominal_sounding_time(day.and_hms_opt(6, 0, 0).unwrap()).is_err());
/// ```
pub fn nominal_sounding_time(launch: NaiveDateTime) -> Result<NaiveDateTime> {
    let time = launch.time();
    let date = launch.date();

    let at = |hour| NaiveTime::from_hms_opt(hour, 0, 0).ok_or(AnalysisError::InvalidInput);

    let synoptic_date = if time >= at(22)? {
        date.succ_opt().ok_or(AnalysisError::InvalidInput)?
    } else if time <= at(2)? || (time >= at(10)? && time <= at(14)?) {
        date
    } else {
        return Err(AnalysisError::InvalidInput);
    };

    let hour = if launch.hour() >= 10 && launch.hour() < 22 {
        12
    } else {
        0
    };

    synoptic_date
        .and_hms_opt(hour, 0, 0)
        .ok_or(AnalysisError::InvalidInput)
}

fn to_profile<T, F>(vals: &[f64], f: F) -> Vec<Optioned<T>>
where
    T: Noned + Copy,
    F: Fn(f64) -> T,
{
    vals.iter()
        .map(|&v| if v.is_finite() { some(f(v)) } else { none() })
        .collect()
}

// FIXME: only configure for test and doc tests, not possible as of 1.41
#[doc(hidden)]
pub mod doctest {
    use super::*;

    pub fn make_test_sounding() -> super::Sounding {
        let p = vec![
            some(HectoPascal(1000.0)),
            some(HectoPascal(925.0)),
            some(HectoPascal(850.0)),
            some(HectoPascal(700.0)),
        ];
        let h = vec![
            some(Meters(100.0)),
            some(Meters(760.0)),
            some(Meters(1480.0)),
            some(Meters(3000.0)),
        ];
        let t = vec![
            some(Celsius(20.0)),
            some(Celsius(18.0)),
            some(Celsius(10.0)),
            some(Celsius(2.0)),
        ];
        let rh = vec![some(70.0), some(65.0), some(80.0), some(40.0)];

        Sounding::new()
            .with_pressure_profile(p)
            .with_height_profile(h)
            .with_temperature_profile(t)
            .with_relative_humidity_profile(rh)
    }
}


mod station_info;
