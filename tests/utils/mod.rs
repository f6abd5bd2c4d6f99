use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDateTime;
use column_moisture::{HybridLevelTable, Sounding, StationInfo};
use metfor::{Celsius, HectoPascal, Meters};
use optional::Optioned;

pub mod cloud_tests;
pub mod integration_tests;

#[allow(unused_macros)] // False alarm
macro_rules! check_file_complete {
    ($test_name:ident, $fname:expr) => {
        #[test]
        fn $test_name() {
            let (snd, fvals) = utils::load_test_file($fname);

            assert!(snd.num_rows() > 0, "Empty sounding.");
            assert_eq!(snd.height_profile().len(), snd.num_rows());
            assert_eq!(snd.temperature_profile().len(), snd.num_rows());
            assert_eq!(snd.pressure_profile().len(), snd.num_rows());
            assert!(snd.launch_time().is_some());
            assert!(snd.station_info().location().is_some());

            let fval_keys = [
                "precipitable_water",
                "mean_temperature",
                "surface_temperature",
                "nominal_hour",
                "cloud codes",
            ];

            // Make sure all of these keys are in the hashmap
            for key in fval_keys.iter() {
                assert!(fvals.contains_key(*key), "{}", key);
            }

            // Make sure there are no extra keys in there being ignored.
            for key in fvals.keys() {
                assert!(fval_keys.contains(&key.as_str()), "extra fval key found");
            }

            // One cloud code per level.
            assert_eq!(fvals["cloud codes"].len(), snd.num_rows());
        }
    };
}

#[allow(unused_macros)] // False alarm
macro_rules! test_file {
    ($test_mod_name:ident, $fname:expr) => {
        mod $test_mod_name {

            use std::collections::HashMap;

            use column_moisture::Sounding;
            use crate::utils;

            fn load_data() -> (Sounding, HashMap<String, Vec<f64>>) {
                utils::load_test_file($fname)
            }

            mod integration {
                use super::load_data;
                use crate::utils::integration_tests;
                use column_moisture::IntegrationMethod;

                #[test]
                fn precipitable_water_trapz() {
                    let (snd, fvals) = load_data();
                    integration_tests::test_precipitable_water(&snd, &fvals, IntegrationMethod::Trapz);
                }

                #[test]
                fn precipitable_water_sum() {
                    let (snd, fvals) = load_data();
                    integration_tests::test_precipitable_water(&snd, &fvals, IntegrationMethod::Sum);
                }

                #[test]
                fn mean_temperature_trapz() {
                    let (snd, fvals) = load_data();
                    integration_tests::test_mean_temperature(&snd, &fvals, IntegrationMethod::Trapz);
                }

                #[test]
                fn mean_temperature_sum() {
                    let (snd, fvals) = load_data();
                    integration_tests::test_mean_temperature(&snd, &fvals, IntegrationMethod::Sum);
                }

                #[test]
                fn surface_temperature() {
                    let (snd, fvals) = load_data();
                    integration_tests::test_surface_temperature(&snd, &fvals);
                }

                #[test]
                fn cutoffs_never_add_water() {
                    let (snd, _) = load_data();
                    integration_tests::test_cutoff_monotonicity(&snd);
                }

                #[test]
                fn repeatable() {
                    let (snd, _) = load_data();
                    integration_tests::test_idempotent(&snd);
                }
            }

            mod clouds {
                use super::load_data;
                use crate::utils::cloud_tests;

                #[test]
                fn cloud_codes() {
                    let (snd, fvals) = load_data();
                    cloud_tests::test_cloud_codes(&snd, &fvals);
                }
            }

            mod times {
                use super::load_data;
                use chrono::Timelike;

                #[test]
                fn nominal_hour() {
                    let (snd, fvals) = load_data();
                    let hour = snd.nominal_time().unwrap().hour();
                    assert_eq!(f64::from(hour), fvals["nominal_hour"][0]);
                }
            }
        }
    };
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn load_test_file(fname: &str) -> (Sounding, HashMap<String, Vec<f64>>) {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);
    load_test_csv_sounding(&test_path)
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn load_all_test_files() -> Vec<Sounding> {
    ["standard.csv", "missing_values.csv", "winter_rh.csv"]
        .iter()
        .map(|fname| load_test_file(fname).0)
        .collect()
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn load_hybrid_table(fname: &str) -> HybridLevelTable {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);

    let contents = read_file(&test_path);
    HybridLevelTable::parse(&contents).unwrap()
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn approx_equal(tgt: f64, guess: f64, tol: f64) -> bool {
    use std::f64;

    assert!(tol > 0.0);

    f64::abs(tgt - guess) <= tol
}

#[allow(dead_code)]
fn read_file(location: &PathBuf) -> String {
    let mut f = File::open(location).expect(&format!("Error opening file: {:#?}", location));

    let mut contents = String::new();
    f.read_to_string(&mut contents)
        .expect(&format!("Error reading file: {:#?}", location));

    contents
}

// Keep a profile only if at least one value is present, an absent variable is an empty vector.
#[allow(dead_code)]
fn non_empty<T: optional::Noned + Copy>(profile: Vec<Optioned<T>>) -> Vec<Optioned<T>> {
    if profile.iter().any(|val| val.is_some()) {
        profile
    } else {
        vec![]
    }
}

#[allow(dead_code)]
fn load_test_csv_sounding(location: &PathBuf) -> (Sounding, HashMap<String, Vec<f64>>) {
    let contents = read_file(location);

    let lines: Vec<&str> = contents.split('\n').collect();
    let mut line_iter = lines.iter();

    //
    // Parse profile data
    //
    let mut height: Vec<Optioned<Meters>> = Vec::with_capacity(lines.len());
    let mut temp: Vec<Optioned<Celsius>> = Vec::with_capacity(lines.len());
    let mut dp: Vec<Optioned<Celsius>> = Vec::with_capacity(lines.len());
    let mut press: Vec<Optioned<HectoPascal>> = Vec::with_capacity(lines.len());
    let mut rh: Vec<Optioned<f64>> = Vec::with_capacity(lines.len());

    // Skip the header
    line_iter.next();

    for line in line_iter.by_ref() {
        if line.starts_with("### Station Section ###")
            || line.starts_with("### Analysis Float Section ###")
        {
            break;
        }

        let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
        if tokens.len() < 5 {
            continue;
        }

        height.push(f64::from_str(tokens[0]).ok().map(Meters).into());
        temp.push(f64::from_str(tokens[1]).ok().map(Celsius).into());
        dp.push(f64::from_str(tokens[2]).ok().map(Celsius).into());
        press.push(f64::from_str(tokens[3]).ok().map(HectoPascal).into());
        rh.push(f64::from_str(tokens[4]).ok().into());
    }

    let mut snd = Sounding::new()
        .with_height_profile(non_empty(height))
        .with_temperature_profile(non_empty(temp))
        .with_dew_point_profile(non_empty(dp))
        .with_pressure_profile(non_empty(press))
        .with_relative_humidity_profile(non_empty(rh));

    //
    // Station data
    //
    // Skip the header
    line_iter.next();

    for line in line_iter.by_ref() {
        if line.starts_with("### Analysis Float Section ###") {
            break;
        }

        let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
        if tokens.len() < 5 {
            continue;
        }

        let station = i32::from_str(tokens[0]).ok();
        let lat = f64::from_str(tokens[1]).ok();
        let lon = f64::from_str(tokens[2]).ok();
        let elevation = f64::from_str(tokens[3]).ok().map(Meters);
        let launch = NaiveDateTime::parse_from_str(tokens[4], "%Y-%m-%d %H:%M:%S").ok();

        let location = lat.and_then(|lat| lon.map(|lon| (lat, lon)));

        snd = snd
            .with_station_info(StationInfo::new_with_values(station, location, elevation))
            .with_launch_time(launch);
    }

    // Float values.
    let mut target_float_vals = HashMap::new();
    for line in line_iter.by_ref() {
        let tokens: Vec<String> = line
            .split(',')
            .filter_map(|val| {
                let v = val.trim();
                if v != "" {
                    Some(v.to_owned())
                } else {
                    None
                }
            })
            .collect();

        if tokens.len() < 2 {
            continue;
        }

        let key = tokens[0].to_owned();
        let values: Vec<f64> = tokens
            .iter()
            .skip(1)
            .map(|val| f64::from_str(val).unwrap())
            .collect();

        target_float_vals.insert(key, values);
    }

    (snd, target_float_vals)
}
