//! Integration over height, for radiosonde profiles.
use super::{
    check_coordinate, checked_ratio, checked_value, layer_sum, trapz, Column, VerticalCoordinate,
    VerticalIntegrationStrategy,
};
use crate::{error::Result, keys::IntegrationMethod};
use itertools::izip;
use metfor::{Kelvin, Mm};

/// Integrates directly over geometric height.
///
/// With `Trapz` precipitable water is the trapezoid integral of `q rho dh` and with `Sum` it is
/// the sum of layer mean vapor density times layer thickness. Both are in kg/m^2, which is mm of
/// liquid water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContinuousIntegral;

impl VerticalIntegrationStrategy for ContinuousIntegral {
    fn coordinate(&self) -> VerticalCoordinate {
        VerticalCoordinate::Height
    }

    fn precipitable_water(&self, column: &Column, method: IntegrationMethod) -> Result<Mm> {
        check_coordinate(self, column)?;

        let h = column.coordinate_values();

        let pw = match method {
            IntegrationMethod::Trapz => {
                let q_rho = izip!(column.specific_humidity(), column.density()).map(|(q, rho)| q * rho);
                trapz(q_rho, h)
            }
            IntegrationMethod::Sum => {
                let rho_v = column.vapor_density();
                0.5 * layer_sum(h, |i, j| rho_v[i] + rho_v[j])
            }
        };

        Ok(Mm(checked_value(pw)?))
    }

    fn mean_temperature(&self, column: &Column, method: IntegrationMethod) -> Result<Kelvin> {
        check_coordinate(self, column)?;

        let e = column.vapor_pressure();
        let t = column.temperature();
        let h = column.coordinate_values();

        let tm = match method {
            IntegrationMethod::Trapz => {
                let numerator = trapz(izip!(e, t).map(|(e, t)| e / t), h);
                let denominator = trapz(izip!(e, t).map(|(e, t)| e / (t * t)), h);
                checked_ratio(numerator, denominator)?
            }
            IntegrationMethod::Sum => {
                let numerator = layer_sum(h, |i, j| (e[i] + e[j]) / (t[i] + t[j]));
                let denominator = layer_sum(h, |i, j| (e[i] + e[j]) / (t[i] * t[i] + t[j] * t[j]));
                checked_ratio(numerator, denominator)?
            }
        };

        Ok(Kelvin(tm))
    }
}
