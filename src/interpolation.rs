//! Linear interpolation along a vertical profile.
use itertools::{izip, Itertools};
use optional::Optioned;

/// Interpolate a model level field to a pressure level.
///
/// `pressure` and `values` are parallel, `NaN` marks a missing value. The pressure may be in any
/// unit as long as `target` is in the same one. Targets outside the column, above the model top
/// or below the lowest level, give a missing value rather than an extrapolation.
///
/// # Examples
///
/// ```rust
/// use column_moisture::interpolate_to_pressure;
///
/// let pf = [700.0, 850.0, 925.0, 1000.0];
/// let t = [275.0, 283.0, 288.0, 293.0];
///
/// assert_eq!(interpolate_to_pressure(&pf, &t, 850.0).unwrap(), 283.0);
/// assert!((interpolate_to_pressure(&pf, &t, 887.5).unwrap() - 285.5).abs() < 1.0e-9);
/// assert!(interpolate_to_pressure(&pf, &t, 1013.0).is_none());
/// ```
pub fn interpolate_to_pressure(pressure: &[f64], values: &[f64], target: f64) -> Optioned<f64> {
    debug_assert_eq!(pressure.len(), values.len());

    let pairs = izip!(pressure, values)
        .filter(|(p, v)| p.is_finite() && v.is_finite())
        .map(|(&p, &v)| (p, v));

    Optioned::from(bracket_and_interpolate(pairs, target))
}

fn bracket_and_interpolate<I>(pairs: I, target_x: f64) -> Option<f64>
where
    I: Iterator<Item = (f64, f64)>,
{
    enum BracketType {
        Bracket((f64, f64), (f64, f64)),
        EndEqual((f64, f64)),
    }

    let make_bracket = |pnt_0: (f64, f64), pnt_1: (f64, f64)| -> Option<BracketType> {
        let (x0, _) = pnt_0;
        let (x1, _) = pnt_1;

        if (x0 < target_x && x1 > target_x) || (x0 > target_x && x1 < target_x) {
            Some(BracketType::Bracket(pnt_0, pnt_1))
        } else if (x0 - target_x).abs() < std::f64::EPSILON {
            Some(BracketType::EndEqual(pnt_0))
        } else if (x1 - target_x).abs() < std::f64::EPSILON {
            Some(BracketType::EndEqual(pnt_1))
        } else {
            None
        }
    };

    pairs
        .tuple_windows::<(_, _)>()
        .filter_map(|(pnt_0, pnt_1)| make_bracket(pnt_0, pnt_1))
        .next()
        .map(|val| match val {
            BracketType::Bracket((x0, y0), (x1, y1)) => linear_interp(target_x, x0, x1, y0, y1),
            BracketType::EndEqual((_, y)) => y,
        })
}

#[inline]
fn linear_interp(x_val: f64, x1: f64, x2: f64, y1: f64, y2: f64) -> f64 {
    debug_assert_ne!(x1, x2);

    let run = x2 - x1;
    let rise = y2 - y1;
    let dx = x_val - x1;

    y1 + dx * (rise / run)
}
