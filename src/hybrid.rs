//! Pressure on the hybrid sigma-pressure levels of a reanalysis model.
//!
//! Each half level `k` has coefficients `a(k)` (Pa) and `b(k)` so that the half level pressure over
//! a surface pressure `ps` is `ph(k) = a(k) + b(k) ps`. Full levels sit halfway between adjacent
//! half levels, `pf(k) = (ph(k-1) + ph(k)) / 2`.
use crate::{
    error::{AnalysisError, Result},
    met_formulas,
    units::{Field, HumidityKind, PressureUnit, Unit},
};
use chrono::NaiveDateTime;
use itertools::{izip, Itertools};
use metfor::{Celsius, HectoPascal, Kelvin};
use optional::{none, some, Optioned};
use std::str::FromStr;

/// Surface pressure of the 1976 standard atmosphere that documented level pressures refer to.
pub const REFERENCE_SURFACE_PRESSURE: HectoPascal = HectoPascal(1013.25);

/// One row of a hybrid level table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridLevel {
    /// Model level number.
    pub n: u32,
    /// Pressure coefficient in Pa.
    pub a: f64,
    /// Dimensionless sigma coefficient.
    pub b: f64,
    /// Documented half level pressure (hPa) over the reference surface pressure.
    pub ph: Optioned<f64>,
    /// Documented full level pressure (hPa) over the reference surface pressure.
    pub pf: Optioned<f64>,
}

impl HybridLevel {
    /// Create a level without documented pressures.
    pub fn new(n: u32, a: f64, b: f64) -> Self {
        HybridLevel {
            n,
            a,
            b,
            ph: none(),
            pf: none(),
        }
    }
}

/// An ordered, immutable table of hybrid level coefficients, such as the ECMWF L137 table.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridLevelTable {
    levels: Vec<HybridLevel>,
}

/// Full level pressures reconstructed for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct FullLevels {
    /// Model level number of each full level.
    pub levels: Vec<u32>,
    /// Full level pressure, top of the model first.
    pub pressure: Vec<f64>,
    /// Units of `pressure`, the same as the surface pressure it was built from.
    pub unit: PressureUnit,
}

impl HybridLevelTable {
    /// Create a table, the level numbers must be strictly increasing.
    pub fn new(levels: Vec<HybridLevel>) -> Result<Self> {
        let increasing = levels.iter().tuple_windows().all(|(l0, l1)| l0.n < l1.n);
        let finite = levels.iter().all(|l| l.a.is_finite() && l.b.is_finite());

        if levels.is_empty() || !increasing || !finite {
            return Err(AnalysisError::InvalidInput);
        }

        Ok(HybridLevelTable { levels })
    }

    /// Parse a whitespace delimited table in the ECMWF layout.
    ///
    /// Each row is `n a b [ph pf ...]`, where `-` marks a missing value and columns past `pf`
    /// are ignored. Blank lines and lines starting with `#` are skipped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use column_moisture::HybridLevelTable;
    ///
    /// let text = "
    /// 0 0.000000 0.000000 0.0000 -
    /// 1 2.000365 0.000000 0.0200 0.0100
    /// 2 3.102241 0.000000 0.0310 0.0255
    /// ";
    ///
    /// let table = HybridLevelTable::parse(text).unwrap();
    /// assert_eq!(table.len(), 3);
    /// assert!(table.levels()[0].pf.is_none());
    /// assert_eq!(table.levels()[2].ph.unwrap(), 0.0310);
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let parse_val = |token: Option<&str>| -> Result<Optioned<f64>> {
            match token {
                None | Some("-") => Ok(none()),
                Some(tok) => f64::from_str(tok)
                    .map(some)
                    .map_err(|_| AnalysisError::InvalidInput),
            }
        };

        let levels = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| {
                let mut tokens = line.split_whitespace();

                let n = tokens
                    .next()
                    .and_then(|tok| u32::from_str(tok).ok())
                    .ok_or(AnalysisError::InvalidInput)?;
                let a = parse_val(tokens.next())?
                    .into_option()
                    .ok_or(AnalysisError::InvalidInput)?;
                let b = parse_val(tokens.next())?
                    .into_option()
                    .ok_or(AnalysisError::InvalidInput)?;
                let ph = parse_val(tokens.next())?;
                let pf = parse_val(tokens.next())?;

                Ok(HybridLevel { n, a, b, ph, pf })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(levels)
    }

    /// The rows of the table.
    #[inline]
    pub fn levels(&self) -> &[HybridLevel] {
        &self.levels
    }

    /// Number of half levels in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// A table is never empty, this exists for API completeness.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of full levels, one fewer than the number of half levels.
    #[inline]
    pub fn num_full_levels(&self) -> usize {
        self.levels.len() - 1
    }

    /// Half level pressures over a surface pressure, in the units of the surface pressure.
    ///
    /// A surface pressure without declared units is taken to be in Pa.
    pub fn half_level_pressures(&self, surface_pressure: f64, unit: Option<PressureUnit>) -> Vec<f64> {
        let unit = unit.unwrap_or(PressureUnit::Pascal);
        let a_scale = unit.scale_from_pa();

        self.levels
            .iter()
            .map(|lvl| lvl.a * a_scale + lvl.b * surface_pressure)
            .collect()
    }

    /// Full level pressures over a surface pressure, in the units of the surface pressure.
    ///
    /// The first half level only bounds the top full level, so there is one fewer full level than
    /// half levels.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use column_moisture::{HybridLevel, HybridLevelTable, PressureUnit};
    ///
    /// let table = HybridLevelTable::new(vec![
    ///     HybridLevel::new(135, 0.0, 0.995003),
    ///     HybridLevel::new(136, 0.0, 0.997630),
    ///     HybridLevel::new(137, 0.0, 1.0),
    /// ])
    /// .unwrap();
    ///
    /// let full = table.full_level_pressures(1013.25, Some(PressureUnit::HectoPascal));
    /// assert_eq!(full.levels, vec![136, 137]);
    /// assert!((full.pressure[1] - 1012.0494).abs() < 1.0e-3);
    /// ```
    pub fn full_level_pressures(&self, surface_pressure: f64, unit: Option<PressureUnit>) -> FullLevels {
        let ph = self.half_level_pressures(surface_pressure, unit);

        let pressure = ph
            .iter()
            .tuple_windows()
            .map(|(ph_above, ph_below)| 0.5 * (ph_above + ph_below))
            .collect();

        let levels = self.levels.iter().skip(1).map(|lvl| lvl.n).collect();

        FullLevels {
            levels,
            pressure,
            unit: unit.unwrap_or(PressureUnit::Pascal),
        }
    }

    /// Largest difference (hPa) between the documented level pressures and those reconstructed
    /// over the reference surface pressure. `None` if nothing is documented.
    pub fn max_documented_deviation(&self) -> Option<f64> {
        let HectoPascal(ps) = REFERENCE_SURFACE_PRESSURE;
        let unit = Some(PressureUnit::HectoPascal);

        let ph = self.half_level_pressures(ps, unit);
        let pf = self.full_level_pressures(ps, unit).pressure;

        let ph_diffs = self
            .levels
            .iter()
            .zip(&ph)
            .filter_map(|(lvl, &calc)| lvl.ph.map(|doc| (doc - calc).abs()));

        let pf_diffs = self
            .levels
            .iter()
            .skip(1)
            .zip(&pf)
            .filter_map(|(lvl, &calc)| lvl.pf.map(|doc| (doc - calc).abs()));

        ph_diffs.chain(pf_diffs).fold(None, |max, diff| match max {
            Some(max) if max >= diff => Some(max),
            _ => Some(diff),
        })
    }
}

/// A reanalysis column on model levels.
///
/// Temperature is in Kelvin, specific humidity in kg/kg, and full level pressure in Pa, all
/// ordered from the model top down to the surface.
#[derive(Debug, Clone, Default)]
pub struct ModelColumn {
    valid_time: Option<NaiveDateTime>,
    latitude: Option<f64>,
    surface_pressure: Optioned<f64>,
    temperature: Vec<Optioned<Kelvin>>,
    specific_humidity: Vec<Optioned<f64>>,
    pressure: Vec<Optioned<f64>>,
}

impl ModelColumn {
    /// Build a column from fields that already carry full level pressure, such as a reanalysis
    /// on pressure levels.
    ///
    /// The declared units must be K and Pa, and the humidity either kg kg**-1 or %. Relative
    /// humidity is converted to specific humidity over liquid water. The fields must have equal
    /// lengths.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use column_moisture::{Field, ModelColumn};
    ///
    /// let col = ModelColumn::from_fields(
    ///     &Field::new(vec![250.0, 280.0], "K"),
    ///     &Field::new(vec![40.0, 80.0], "%"),
    ///     &Field::new(vec![50_000.0, 100_000.0], "Pa"),
    /// )
    /// .unwrap();
    ///
    /// let q = col.specific_humidity()[1].unwrap();
    /// assert!(q > 0.004 && q < 0.006);
    /// ```
    pub fn from_fields(temperature: &Field, humidity: &Field, pressure: &Field) -> Result<Self> {
        let t = temperature.expect_units("temperature", Unit::Kelvin)?;
        let (kind, hum) = humidity.expect_humidity("humidity")?;
        let p = pressure.expect_units("pressure", Unit::Pascal)?;

        if hum.len() != t.len() || p.len() != t.len() {
            return Err(AnalysisError::InvalidInput);
        }

        let temperature: Vec<_> = temperature
            .to_optioned()
            .into_iter()
            .map(|v| v.map_t(Kelvin))
            .collect();
        let pressure = pressure.to_optioned();
        let specific_humidity = to_specific_humidity(kind, humidity, &temperature, &pressure);

        Ok(ModelColumn {
            valid_time: None,
            latitude: None,
            surface_pressure: none(),
            temperature,
            specific_humidity,
            pressure,
        })
    }

    /// Build a column by reconstructing full level pressure from a hybrid level table.
    ///
    /// The temperature and humidity must have one value per full level of the table. The humidity
    /// may be specific humidity (kg kg**-1) or relative humidity (%).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use column_moisture::{Field, HybridLevel, HybridLevelTable, ModelColumn, PressureUnit};
    ///
    /// let table = HybridLevelTable::new(vec![
    ///     HybridLevel::new(135, 0.0, 0.995003),
    ///     HybridLevel::new(136, 0.0, 0.997630),
    ///     HybridLevel::new(137, 0.0, 1.0),
    /// ])
    /// .unwrap();
    ///
    /// let col = ModelColumn::from_hybrid(
    ///     &table,
    ///     1013.25,
    ///     Some(PressureUnit::HectoPascal),
    ///     &Field::new(vec![288.0, 288.2], "K"),
    ///     &Field::new(vec![0.0100, 0.0102], "kg kg**-1"),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(col.pressure().len(), 2);
    /// assert!((col.pressure()[1].unwrap() - 101_204.94).abs() < 0.1);
    /// assert_eq!(col.surface_pressure().unwrap(), 101_325.0);
    /// ```
    pub fn from_hybrid(
        table: &HybridLevelTable,
        surface_pressure: f64,
        unit: Option<PressureUnit>,
        temperature: &Field,
        humidity: &Field,
    ) -> Result<Self> {
        let t = temperature.expect_units("temperature", Unit::Kelvin)?;
        let (kind, hum) = humidity.expect_humidity("humidity")?;

        let n_full = table.num_full_levels();
        if t.len() != n_full || hum.len() != n_full {
            return Err(AnalysisError::InvalidInput);
        }

        let full = table.full_level_pressures(surface_pressure, unit);
        let to_pa = full.unit.scale_to_pa();
        let pressure: Vec<_> = full
            .pressure
            .iter()
            .map(|&pf| pf * to_pa)
            .map(|pf| if pf.is_finite() { some(pf) } else { none() })
            .collect();

        let ps = surface_pressure * to_pa;
        let surface_pressure = if ps.is_finite() { some(ps) } else { none() };

        let temperature: Vec<_> = temperature
            .to_optioned()
            .into_iter()
            .map(|v| v.map_t(Kelvin))
            .collect();
        let specific_humidity = to_specific_humidity(kind, humidity, &temperature, &pressure);

        Ok(ModelColumn {
            valid_time: None,
            latitude: None,
            surface_pressure,
            temperature,
            specific_humidity,
            pressure,
        })
    }

    /// Builder method to set the valid time.
    #[inline]
    pub fn with_valid_time<T>(mut self, valid_time: T) -> Self
    where
        Option<NaiveDateTime>: From<T>,
    {
        self.valid_time = Option::from(valid_time);
        self
    }

    /// Builder method to set the latitude of the grid point in degrees.
    #[inline]
    pub fn with_latitude<T>(mut self, latitude: T) -> Self
    where
        Option<f64>: From<T>,
    {
        self.latitude = Option::from(latitude);
        self
    }

    /// Valid time of the column.
    #[inline]
    pub fn valid_time(&self) -> Option<NaiveDateTime> {
        self.valid_time
    }

    /// Latitude of the grid point in degrees.
    #[inline]
    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    /// Surface pressure in Pa, if the column was reconstructed from a hybrid table.
    #[inline]
    pub fn surface_pressure(&self) -> Optioned<f64> {
        self.surface_pressure
    }

    /// Temperature profile.
    #[inline]
    pub fn temperature(&self) -> &[Optioned<Kelvin>] {
        &self.temperature
    }

    /// Specific humidity profile in kg/kg.
    #[inline]
    pub fn specific_humidity(&self) -> &[Optioned<f64>] {
        &self.specific_humidity
    }

    /// Full level pressure profile in Pa.
    #[inline]
    pub fn pressure(&self) -> &[Optioned<f64>] {
        &self.pressure
    }

    /// Temperature of the level nearest the surface, the one with the highest pressure among the
    /// levels where both are present. Works for either level order.
    pub fn surface_temperature(&self) -> Optioned<Kelvin> {
        izip!(&self.pressure, &self.temperature)
            .filter_map(|(p, t)| Some((p.into_option()?, t.into_option()?)))
            .fold(None, |lowest: Option<(f64, Kelvin)>, (p, t)| match lowest {
                Some((p_low, _)) if p_low >= p => lowest,
                _ => Some((p, t)),
            })
            .map(|(_, t)| t)
            .into()
    }
}

/// The raw fields of one grid point and time of a reanalysis on hybrid levels.
#[derive(Debug, Clone, Default)]
pub struct GridColumn {
    /// Surface pressure.
    pub surface_pressure: f64,
    /// Units of the surface pressure, `None` if undeclared.
    pub surface_pressure_unit: Option<PressureUnit>,
    /// Temperature on full levels, K.
    pub temperature: Field,
    /// Specific humidity (kg kg**-1) or relative humidity (%) on full levels.
    pub humidity: Field,
    /// Valid time.
    pub valid_time: Option<NaiveDateTime>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
}

impl GridColumn {
    /// Reconstruct the model column with the pressure of its full levels.
    pub fn to_model_column(&self, table: &HybridLevelTable) -> Result<ModelColumn> {
        Ok(ModelColumn::from_hybrid(
            table,
            self.surface_pressure,
            self.surface_pressure_unit,
            &self.temperature,
            &self.humidity,
        )?
        .with_valid_time(self.valid_time)
        .with_latitude(self.latitude))
    }
}

fn to_specific_humidity(
    kind: HumidityKind,
    humidity: &Field,
    temperature: &[Optioned<Kelvin>],
    pressure: &[Optioned<f64>],
) -> Vec<Optioned<f64>> {
    match kind {
        HumidityKind::Specific => humidity.to_optioned(),
        HumidityKind::Relative => izip!(humidity.to_optioned(), temperature, pressure)
            .map(|(rh, t, p)| {
                let t = Celsius::from(t.into_option()?);
                let e = met_formulas::vapor_pressure_from_rh(t, rh.into_option()?);
                let p = HectoPascal(p.into_option()? / 100.0);
                met_formulas::mixing_ratio(e, p).map(met_formulas::specific_humidity)
            })
            .map(Optioned::from)
            .collect(),
    }
}
