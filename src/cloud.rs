//! Classify saturated levels of a sounding into low, middle, and high cloud.
use crate::{
    error::{AnalysisError, Result},
    profile,
    sounding::Sounding,
};
use itertools::izip;
use metfor::{Celsius, Meters, Quantity};
use optional::Optioned;
use strum_macros::EnumIter;

/// Dew point depression (&deg;C) below which a level is considered saturated.
pub const SATURATION_DEPRESSION: f64 = 0.5;

/// Cloud layer of a saturated level, by height above mean sea level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum CloudLayer {
    /// Below 2000 m.
    Low,
    /// From 2000 m up to 7000 m.
    Middle,
    /// From 7000 m up to 13000 m.
    High,
}

impl CloudLayer {
    /// The layer for a saturated level at `height`, `None` at or above 13000 m.
    pub fn from_height(height: Meters) -> Option<Self> {
        let Meters(h) = height;

        if h < 2000.0 {
            Some(CloudLayer::Low)
        } else if h < 7000.0 {
            Some(CloudLayer::Middle)
        } else if h < 13000.0 {
            Some(CloudLayer::High)
        } else {
            None
        }
    }

    /// Numeric code used in output files, 1 low, 2 middle, and 3 high.
    pub fn code(self) -> u8 {
        match self {
            CloudLayer::Low => 1,
            CloudLayer::Middle => 2,
            CloudLayer::High => 3,
        }
    }

    /// Inverse of [`code`](CloudLayer::code).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(CloudLayer::Low),
            2 => Some(CloudLayer::Middle),
            3 => Some(CloudLayer::High),
            _ => None,
        }
    }
}

/// Label each level of a profile with its cloud layer.
///
/// Only the first `min(temperature.len(), dew_point.len())` levels are compared. If there are
/// fewer heights than that the profile is inconsistent and this fails with
/// `ClassificationDegraded`. The result has one entry per height, a level is labeled when height,
/// temperature, and dew point are all present and the dew point depression is below
/// [`SATURATION_DEPRESSION`].
///
/// # Examples
///
/// ```rust
/// use column_moisture::{classify_cloud_layers, CloudLayer};
/// use metfor::{Celsius, Meters};
/// use optional::some;
///
/// let height = vec![some(Meters(1500.0)), some(Meters(5000.0)), some(Meters(10000.0))];
/// let t = vec![some(Celsius(10.0)), some(Celsius(-10.0)), some(Celsius(-40.0))];
/// let td = vec![some(Celsius(9.8)), some(Celsius(-20.0)), some(Celsius(-40.2))];
///
/// let layers = classify_cloud_layers(&height, &t, &td).unwrap();
/// assert_eq!(layers, vec![Some(CloudLayer::Low), None, Some(CloudLayer::High)]);
/// ```
pub fn classify_cloud_layers(
    height: &[Optioned<Meters>],
    temperature: &[Optioned<Celsius>],
    dew_point: &[Optioned<Celsius>],
) -> Result<Vec<Option<CloudLayer>>> {
    let n = temperature.len().min(dew_point.len());
    if height.len() < n {
        return Err(AnalysisError::ClassificationDegraded);
    }

    let mut layers = vec![None; height.len()];

    for (layer, h, t, td) in izip!(&mut layers, height, temperature, dew_point) {
        if let (Some(h), Some(t), Some(td)) = (h.into_option(), t.into_option(), td.into_option()) {
            if (t.unpack() - td.unpack()).abs() < SATURATION_DEPRESSION {
                *layer = CloudLayer::from_height(h);
            }
        }
    }

    Ok(layers)
}

/// Label each level of a sounding with its cloud layer.
///
/// The dew point is derived from temperature and relative humidity if the sounding has no dew
/// point profile.
pub fn cloud_layers(snd: &Sounding) -> Result<Vec<Option<CloudLayer>>> {
    let dew_point = profile::dew_point(snd);
    classify_cloud_layers(snd.height_profile(), snd.temperature_profile(), &dew_point)
}

#[cfg(test)]
mod test {
    use super::*;
    use optional::{none, some};
    use strum::IntoEnumIterator;

    fn heights(vals: &[f64]) -> Vec<Optioned<Meters>> {
        vals.iter().map(|&h| some(Meters(h))).collect()
    }

    fn temps(vals: &[f64]) -> Vec<Optioned<Celsius>> {
        vals.iter().map(|&t| some(Celsius(t))).collect()
    }

    #[test]
    fn test_saturated_levels() {
        let h = heights(&[1500.0, 5000.0, 10000.0, 14000.0]);
        let t = temps(&[10.0, -10.0, -40.0, -60.0]);
        let td = temps(&[9.8, -10.2, -40.3, -60.1]);

        let layers = classify_cloud_layers(&h, &t, &td).unwrap();
        assert_eq!(
            layers,
            vec![
                Some(CloudLayer::Low),
                Some(CloudLayer::Middle),
                Some(CloudLayer::High),
                None
            ]
        );
    }

    #[test]
    fn test_layer_boundaries() {
        assert_eq!(CloudLayer::from_height(Meters(1999.9)), Some(CloudLayer::Low));
        assert_eq!(CloudLayer::from_height(Meters(2000.0)), Some(CloudLayer::Middle));
        assert_eq!(CloudLayer::from_height(Meters(7000.0)), Some(CloudLayer::High));
        assert_eq!(CloudLayer::from_height(Meters(13000.0)), None);
    }

    #[test]
    fn test_depression_threshold() {
        let h = heights(&[500.0, 500.0]);
        let t = temps(&[10.0, 10.0]);
        let td = temps(&[9.5, 9.51]);

        let layers = classify_cloud_layers(&h, &t, &td).unwrap();
        assert_eq!(layers, vec![None, Some(CloudLayer::Low)]);
    }

    #[test]
    fn test_missing_values_unlabeled() {
        let h = vec![some(Meters(500.0)), none(), some(Meters(3000.0))];
        let t = vec![none(), some(Celsius(0.0)), some(Celsius(-5.0))];
        let td = temps(&[10.0, 0.0, -5.0]);

        let layers = classify_cloud_layers(&h, &t, &td).unwrap();
        assert_eq!(layers, vec![None, None, Some(CloudLayer::Middle)]);
    }

    #[test]
    fn test_short_dew_point_profile() {
        // Levels without a dew point are left unlabeled.
        let h = heights(&[500.0, 1000.0, 1500.0]);
        let t = temps(&[5.0, 5.0, 5.0]);
        let td = temps(&[5.0]);

        let layers = classify_cloud_layers(&h, &t, &td).unwrap();
        assert_eq!(layers, vec![Some(CloudLayer::Low), None, None]);
    }

    #[test]
    fn test_short_height_profile() {
        let h = heights(&[500.0]);
        let t = temps(&[5.0, 5.0]);
        let td = temps(&[5.0, 5.0]);

        assert_eq!(
            classify_cloud_layers(&h, &t, &td).unwrap_err(),
            AnalysisError::ClassificationDegraded
        );
    }

    #[test]
    fn test_codes() {
        for layer in CloudLayer::iter() {
            assert_eq!(CloudLayer::from_code(layer.code()), Some(layer));
        }
        assert!(CloudLayer::from_code(0).is_none());
    }

    #[test]
    fn test_cloud_layers_from_rh() {
        let snd = crate::sounding::doctest::make_test_sounding()
            .with_relative_humidity_profile(vec![some(50.0), some(100.0), some(99.9), some(40.0)]);

        let layers = cloud_layers(&snd).unwrap();
        assert_eq!(layers, vec![None, Some(CloudLayer::Low), Some(CloudLayer::Low), None]);
    }
}
