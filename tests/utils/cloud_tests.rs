use super::*;
use column_moisture::{cloud_layers, CloudLayer};

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_cloud_codes(snd: &Sounding, tgt_float_vals: &HashMap<String, Vec<f64>>) {
    let targets = &tgt_float_vals["cloud codes"];

    let layers = cloud_layers(snd).unwrap();
    println!("\nlayers = {:#?}", layers);

    assert_eq!(layers.len(), snd.height_profile().len());
    assert_eq!(layers.len(), targets.len());

    for (layer, &target) in layers.iter().zip(targets) {
        let code = layer.map(CloudLayer::code).unwrap_or(0);
        assert_eq!(f64::from(code), target);
    }
}
