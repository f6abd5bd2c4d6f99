//! Vertical integration of a moisture profile to precipitable water and mean temperature.
//!
//! A [`Column`] holds only the valid samples of a profile, after cutoffs, in a monotonic vertical
//! coordinate. How a column is reduced to a scalar depends on that coordinate. Model level columns
//! are in pressure and integrate layer by layer ([`LayerDifference`]), soundings are in height and
//! integrate continuously over it ([`ContinuousIntegral`]). [`strategy_for`] picks the one that
//! matches a column.
use crate::{
    error::{AnalysisError, IntegrationFault, Result},
    hybrid::ModelColumn,
    keys::{DensityComponent, IntegrationMethod},
    met_formulas, profile,
    sounding::Sounding,
};
use itertools::{izip, Itertools};
use metfor::{Celsius, HectoPascal, Kelvin, Mm, Quantity};
use serde::Deserialize;
use tracing::debug;

pub use self::{continuous::ContinuousIntegral, layer_difference::LayerDifference};

/// The vertical coordinate of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalCoordinate {
    /// Pressure in Pa, model level columns.
    Pressure,
    /// Height in meters, radiosonde profiles.
    Height,
}

/// Bounds that exclude samples before integrating, all inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Cutoffs {
    /// Lowest height kept, meters.
    pub lower: Option<f64>,
    /// Highest height kept, meters.
    pub upper: Option<f64>,
    /// Highest pressure kept, hPa.
    pub bottom: Option<f64>,
    /// Lowest pressure kept, hPa.
    pub top: Option<f64>,
}

impl Cutoffs {
    /// No cutoffs, keep every sample.
    pub fn none() -> Self {
        Self::default()
    }

    /// Cutoffs on height only.
    pub fn height(lower: Option<f64>, upper: Option<f64>) -> Self {
        Cutoffs {
            lower,
            upper,
            ..Self::default()
        }
    }

    /// Cutoffs on pressure only.
    pub fn pressure(bottom: Option<f64>, top: Option<f64>) -> Self {
        Cutoffs {
            bottom,
            top,
            ..Self::default()
        }
    }

    fn keeps_height(&self, height: f64) -> bool {
        self.lower.map_or(true, |lower| height >= lower)
            && self.upper.map_or(true, |upper| height <= upper)
    }

    fn keeps_pressure(&self, pressure: HectoPascal) -> bool {
        let HectoPascal(p) = pressure;
        self.bottom.map_or(true, |bottom| p <= bottom) && self.top.map_or(true, |top| p >= top)
    }

    fn has_height_bounds(&self) -> bool {
        self.lower.is_some() || self.upper.is_some()
    }
}

/// Physical constants used by the layer difference integration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntegrationParams {
    /// Gravitational acceleration, m/s^2
    pub gravity: f64,
    /// Density of liquid water, kg/m^3
    pub water_density: f64,
}

impl Default for IntegrationParams {
    fn default() -> Self {
        IntegrationParams {
            gravity: 9.79,
            water_density: 1000.0,
        }
    }
}

/// The valid samples of a profile, ready to integrate.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    coordinate: VerticalCoordinate,
    coord: Vec<f64>,
    temperature: Vec<f64>,
    vapor_pressure: Vec<f64>,
    specific_humidity: Vec<f64>,
    density: Vec<f64>,
    vapor_density: Vec<f64>,
}

impl Column {
    /// Build a height coordinate column from a sounding.
    ///
    /// Rows missing any of height, pressure, temperature, or humidity are dropped. The remaining
    /// heights must not decrease with index.
    pub fn from_sounding(snd: &Sounding, cutoffs: &Cutoffs) -> Result<Self> {
        let vapor_pressure = profile::vapor_pressure(snd);
        let specific_humidity = profile::specific_humidity(snd);
        let density = profile::density(snd, DensityComponent::Both);
        let vapor_density = profile::density(snd, DensityComponent::WaterVapor);

        let mut col = Column::empty(VerticalCoordinate::Height);

        for (h, p, t, e, q, rho, rho_v) in izip!(
            snd.height_profile(),
            snd.pressure_profile(),
            snd.temperature_profile(),
            &vapor_pressure,
            &specific_humidity,
            &density,
            &vapor_density
        ) {
            let row = (|| {
                Some((
                    h.into_option()?.unpack(),
                    p.into_option()?,
                    t.into_option()?,
                    e.into_option()?.unpack(),
                    q.into_option()?,
                    rho.into_option()?,
                    rho_v.into_option()?,
                ))
            })();

            if let Some((h, p, t, e, q, rho, rho_v)) = row {
                if cutoffs.keeps_height(h) && cutoffs.keeps_pressure(p) {
                    col.push(h, Kelvin::from(t), e, q, rho, rho_v);
                }
            }
        }

        debug!(
            rows = snd.num_rows(),
            kept = col.len(),
            "built height column from sounding"
        );

        col.validate()
    }

    /// Build a pressure coordinate column from a model level column.
    ///
    /// Vapor pressure comes from the specific humidity. Height cutoffs do not apply to a model
    /// column and are ignored.
    pub fn from_model_column(model: &ModelColumn, cutoffs: &Cutoffs) -> Result<Self> {
        if cutoffs.has_height_bounds() {
            debug!("height cutoffs ignored for a model level column");
        }

        let mut col = Column::empty(VerticalCoordinate::Pressure);

        for (p, t, q) in izip!(
            model.pressure(),
            model.temperature(),
            model.specific_humidity()
        ) {
            if let (Some(p), Some(t), Some(q)) = (p.into_option(), t.into_option(), q.into_option()) {
                let p_hpa = HectoPascal(p / 100.0);
                if !cutoffs.keeps_pressure(p_hpa) {
                    continue;
                }

                let e_hpa = HectoPascal(met_formulas::vapor_pressure_from_specific_humidity(
                    q,
                    p_hpa.unpack(),
                ));
                let t_c = Celsius::from(t);
                let rho = met_formulas::humid_density(t_c, p_hpa, e_hpa, DensityComponent::Both);
                let rho_v =
                    met_formulas::humid_density(t_c, p_hpa, e_hpa, DensityComponent::WaterVapor);

                col.push(p, t, e_hpa.unpack(), q, rho, rho_v);
            }
        }

        col.validate()
    }

    fn empty(coordinate: VerticalCoordinate) -> Self {
        Column {
            coordinate,
            coord: vec![],
            temperature: vec![],
            vapor_pressure: vec![],
            specific_humidity: vec![],
            density: vec![],
            vapor_density: vec![],
        }
    }

    fn push(&mut self, coord: f64, t: Kelvin, e: f64, q: f64, rho: f64, rho_v: f64) {
        self.coord.push(coord);
        self.temperature.push(t.unpack());
        self.vapor_pressure.push(e);
        self.specific_humidity.push(q);
        self.density.push(rho);
        self.vapor_density.push(rho_v);
    }

    fn validate(self) -> Result<Self> {
        if self.len() < 2 {
            return Err(IntegrationFault::TooFewSamples.into());
        }

        let monotonic = match self.coordinate {
            VerticalCoordinate::Height => self.coord.iter().tuple_windows().all(|(h0, h1)| h1 >= h0),
            VerticalCoordinate::Pressure => {
                self.coord.iter().tuple_windows().all(|(p0, p1)| p1 >= p0)
                    || self.coord.iter().tuple_windows().all(|(p0, p1)| p1 <= p0)
            }
        };

        if monotonic {
            Ok(self)
        } else {
            Err(IntegrationFault::NonMonotonic.into())
        }
    }

    /// The vertical coordinate type.
    #[inline]
    pub fn coordinate(&self) -> VerticalCoordinate {
        self.coordinate
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.coord.len()
    }

    /// Always false for a column that passed validation.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coord.is_empty()
    }

    /// Vertical coordinate values, meters for height and Pa for pressure.
    #[inline]
    pub fn coordinate_values(&self) -> &[f64] {
        &self.coord
    }

    /// Temperature in Kelvin.
    #[inline]
    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    /// Vapor pressure in hPa.
    #[inline]
    pub fn vapor_pressure(&self) -> &[f64] {
        &self.vapor_pressure
    }

    /// Specific humidity in kg/kg.
    #[inline]
    pub fn specific_humidity(&self) -> &[f64] {
        &self.specific_humidity
    }

    /// Total humid air density in kg/m^3.
    #[inline]
    pub fn density(&self) -> &[f64] {
        &self.density
    }

    /// Water vapor density in kg/m^3.
    #[inline]
    pub fn vapor_density(&self) -> &[f64] {
        &self.vapor_density
    }
}

/// A rule for reducing a column to precipitable water and mean temperature.
pub trait VerticalIntegrationStrategy: Send + Sync {
    /// The coordinate this strategy integrates over.
    fn coordinate(&self) -> VerticalCoordinate;

    /// Total precipitable water of the column.
    fn precipitable_water(&self, column: &Column, method: IntegrationMethod) -> Result<Mm>;

    /// Water vapor weighted mean temperature of the column.
    fn mean_temperature(&self, column: &Column, method: IntegrationMethod) -> Result<Kelvin>;
}

/// Select the strategy that integrates over `coordinate`.
pub fn strategy_for(
    coordinate: VerticalCoordinate,
    params: IntegrationParams,
) -> Box<dyn VerticalIntegrationStrategy> {
    match coordinate {
        VerticalCoordinate::Pressure => Box::new(LayerDifference::new(params)),
        VerticalCoordinate::Height => Box::new(ContinuousIntegral),
    }
}

/// The temperature of the lowest valid report of the sounding, before any cutoffs.
pub fn surface_temperature(snd: &Sounding) -> Option<Kelvin> {
    snd.temperature_profile()
        .iter()
        .find_map(|t| t.into_option())
        .map(Kelvin::from)
}

fn check_coordinate(
    strategy: &dyn VerticalIntegrationStrategy,
    column: &Column,
) -> Result<()> {
    if strategy.coordinate() == column.coordinate() {
        Ok(())
    } else {
        Err(AnalysisError::InvalidInput)
    }
}

/// Trapezoid rule of `ys` over `xs` with signed steps.
fn trapz<I>(ys: I, xs: &[f64]) -> f64
where
    I: IntoIterator<Item = f64>,
{
    izip!(
        ys.into_iter().tuple_windows::<(_, _)>(),
        xs.iter().tuple_windows::<(_, _)>()
    )
    .map(|((y0, y1), (&x0, &x1))| 0.5 * (y0 + y1) * (x1 - x0))
    .sum()
}

/// Sum of `layer(i, i + 1)` times the absolute thickness of each layer.
fn layer_sum<F>(xs: &[f64], layer: F) -> f64
where
    F: Fn(usize, usize) -> f64,
{
    xs.iter()
        .tuple_windows::<(_, _)>()
        .enumerate()
        .map(|(i, (&x0, &x1))| layer(i, i + 1) * (x1 - x0).abs())
        .sum()
}

fn checked_ratio(numerator: f64, denominator: f64) -> Result<f64> {
    let ratio = numerator / denominator;
    if denominator == 0.0 || !ratio.is_finite() {
        Err(IntegrationFault::DegenerateDenominator.into())
    } else {
        Ok(ratio)
    }
}

fn checked_value(val: f64) -> Result<f64> {
    if val.is_finite() {
        Ok(val)
    } else {
        Err(IntegrationFault::DegenerateDenominator.into())
    }
}


mod continuous;
mod layer_difference;
