use chrono::NaiveDateTime;
use column_moisture::{Sounding, StationInfo};
use metfor::{Celsius, HectoPascal, Meters};
use optional::Optioned;
use std::{fs::File, io::Read, path::PathBuf, str::FromStr};

#[allow(dead_code)]
pub fn load_all_test_files() -> [Sounding; 3] {
    let snd1 = load_test_file("standard.csv");
    let snd2 = load_test_file("missing_values.csv");
    let snd3 = load_test_file("winter_rh.csv");

    [snd1, snd2, snd3]
}

fn load_test_file(fname: &str) -> Sounding {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);
    load_test_csv_sounding(&test_path)
}

fn load_test_csv_sounding(location: &PathBuf) -> Sounding {
    let mut f = File::open(location).expect(&format!("Error opening file: {:#?}", location));

    let mut contents = String::new();
    f.read_to_string(&mut contents)
        .expect(&format!("Error reading file: {:#?}", location));

    let lines: Vec<&str> = contents.split('\n').collect();
    let mut line_iter = lines.iter().skip(1);

    //
    // Parse profile data
    //
    let mut height: Vec<Optioned<Meters>> = Vec::with_capacity(lines.len());
    let mut temp: Vec<Optioned<Celsius>> = Vec::with_capacity(lines.len());
    let mut dp: Vec<Optioned<Celsius>> = Vec::with_capacity(lines.len());
    let mut press: Vec<Optioned<HectoPascal>> = Vec::with_capacity(lines.len());
    let mut rh: Vec<Optioned<f64>> = Vec::with_capacity(lines.len());

    for line in line_iter.by_ref() {
        if line.starts_with("### Station Section ###") {
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

    // Sections without any values are absent, not full of missing values.
    if dp.iter().all(|val| val.is_none()) {
        dp.clear();
    }
    if rh.iter().all(|val| val.is_none()) {
        rh.clear();
    }

    let mut snd = Sounding::new()
        .with_height_profile(height)
        .with_temperature_profile(temp)
        .with_dew_point_profile(dp)
        .with_pressure_profile(press)
        .with_relative_humidity_profile(rh);

    //
    // Station data
    //
    for line in line_iter.skip(1) {
        if line.starts_with("### Analysis Float Section ###") {
            break;
        }

        let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
        if tokens.len() < 5 {
            continue;
        }

        let lat = f64::from_str(tokens[1]).ok();
        let lon = f64::from_str(tokens[2]).ok();
        let location = lat.and_then(|lat| lon.map(|lon| (lat, lon)));

        snd = snd
            .with_station_info(StationInfo::new_with_values(
                i32::from_str(tokens[0]).ok(),
                location,
                f64::from_str(tokens[3]).ok().map(Meters),
            ))
            .with_launch_time(NaiveDateTime::parse_from_str(tokens[4], "%Y-%m-%d %H:%M:%S").ok());
    }

    snd
}
