use super::*;
use column_moisture::{
    surface_temperature, Column, ContinuousIntegral, Cutoffs, IntegrationMethod,
    VerticalIntegrationStrategy,
};
use metfor::Quantity;

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_precipitable_water(
    snd: &Sounding,
    tgt_float_vals: &HashMap<String, Vec<f64>>,
    method: IntegrationMethod,
) {
    let bounds = &tgt_float_vals["precipitable_water"];
    assert_eq!(bounds.len(), 2);

    let col = Column::from_sounding(snd, &Cutoffs::none()).unwrap();
    let pw = ContinuousIntegral
        .precipitable_water(&col, method)
        .unwrap()
        .unpack();
    println!("{:?} precipitable water = {}", method, pw);

    assert!(pw >= bounds[0] && pw <= bounds[1]);
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_mean_temperature(
    snd: &Sounding,
    tgt_float_vals: &HashMap<String, Vec<f64>>,
    method: IntegrationMethod,
) {
    let bounds = &tgt_float_vals["mean_temperature"];
    assert_eq!(bounds.len(), 2);

    let col = Column::from_sounding(snd, &Cutoffs::none()).unwrap();
    let tm = ContinuousIntegral
        .mean_temperature(&col, method)
        .unwrap()
        .unpack();
    println!("{:?} mean temperature = {}", method, tm);

    assert!(tm >= bounds[0] && tm <= bounds[1]);

    // Never warmer than the warmest level.
    let t_max = col.temperature().iter().cloned().fold(std::f64::MIN, f64::max);
    assert!(tm <= t_max);
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_surface_temperature(snd: &Sounding, tgt_float_vals: &HashMap<String, Vec<f64>>) {
    let target = tgt_float_vals["surface_temperature"][0];
    let ts = surface_temperature(snd).unwrap().unpack();
    assert!(approx_equal(target, ts, 1.0e-9));
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_cutoff_monotonicity(snd: &Sounding) {
    let full = Column::from_sounding(snd, &Cutoffs::none()).unwrap();

    for method in &[IntegrationMethod::Trapz, IntegrationMethod::Sum] {
        let pw_full = ContinuousIntegral.precipitable_water(&full, *method).unwrap();

        for upper in &[3000.0, 6000.0, 9000.0] {
            let cut = Column::from_sounding(snd, &Cutoffs::height(None, Some(*upper))).unwrap();
            let pw_cut = ContinuousIntegral.precipitable_water(&cut, *method).unwrap();
            assert!(pw_cut <= pw_full);
        }

        let cut = Column::from_sounding(snd, &Cutoffs::pressure(None, Some(500.0))).unwrap();
        let pw_cut = ContinuousIntegral.precipitable_water(&cut, *method).unwrap();
        assert!(pw_cut <= pw_full);
    }
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_idempotent(snd: &Sounding) {
    let col = Column::from_sounding(snd, &Cutoffs::none()).unwrap();

    for method in &[IntegrationMethod::Trapz, IntegrationMethod::Sum] {
        let first = (
            ContinuousIntegral.precipitable_water(&col, *method),
            ContinuousIntegral.mean_temperature(&col, *method),
        );
        let second = (
            ContinuousIntegral.precipitable_water(&col, *method),
            ContinuousIntegral.mean_temperature(&col, *method),
        );
        assert_eq!(first, second);
    }
}
