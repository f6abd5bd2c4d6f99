//! Layer by layer integration over pressure, for model level columns.
use super::{
    check_coordinate, checked_ratio, checked_value, layer_sum, trapz, Column, IntegrationParams,
    VerticalCoordinate, VerticalIntegrationStrategy,
};
use crate::{error::Result, keys::IntegrationMethod};
use itertools::izip;
use metfor::{Kelvin, Mm};

/// Integrates over pressure using the hydrostatic relation `dz = -dp / (rho g)`.
///
/// Precipitable water is the same for both methods, the sum of layer mean specific humidity times
/// the pressure thickness divided by `rho_w g`. The mean temperature `Sum` method weights each
/// layer by its mean density. The factor `2 g` common to numerator and denominator cancels and is
/// not applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerDifference {
    params: IntegrationParams,
}

impl LayerDifference {
    /// Create a strategy with the given physical constants.
    pub fn new(params: IntegrationParams) -> Self {
        LayerDifference { params }
    }
}

impl VerticalIntegrationStrategy for LayerDifference {
    fn coordinate(&self) -> VerticalCoordinate {
        VerticalCoordinate::Pressure
    }

    fn precipitable_water(&self, column: &Column, _method: IntegrationMethod) -> Result<Mm> {
        check_coordinate(self, column)?;

        let q = column.specific_humidity();
        let p = column.coordinate_values();
        let IntegrationParams {
            gravity,
            water_density,
        } = self.params;

        let total = layer_sum(p, |i, j| q[i] + q[j]);
        let meters = checked_ratio(total, 2.0 * water_density * gravity)?;

        Ok(Mm(checked_value(meters * 1000.0)?))
    }

    fn mean_temperature(&self, column: &Column, method: IntegrationMethod) -> Result<Kelvin> {
        check_coordinate(self, column)?;

        let e = column.vapor_pressure();
        let t = column.temperature();
        let rho = column.density();
        let p = column.coordinate_values();

        let tm = match method {
            IntegrationMethod::Sum => {
                let numerator = layer_sum(p, |i, j| (e[i] + e[j]) / ((t[i] + t[j]) * (rho[i] + rho[j])));
                let denominator = layer_sum(p, |i, j| {
                    (e[i] + e[j]) / ((t[i] * t[i] + t[j] * t[j]) * (rho[i] + rho[j]))
                });
                checked_ratio(numerator, denominator)?
            }
            IntegrationMethod::Trapz => {
                let numerator = trapz(izip!(e, t).map(|(e, t)| e / t), p);
                let denominator = trapz(izip!(e, t).map(|(e, t)| e / (t * t)), p);
                checked_ratio(numerator, denominator)?
            }
        };

        Ok(Kelvin(tm))
    }
}
