//! Common test utilities

use std::path::Path;

use oncotrend::models::{SeriesTable, TimeSeries};

/// Build a series from parallel year and value slices
pub fn series(name: &str, years: &[i32], values: &[f64]) -> TimeSeries {
    TimeSeries::new(name, years.iter().copied().zip(values.iter().copied()))
        .expect("fixture years must be increasing")
}

/// Build a table with a shared year axis
#[allow(dead_code)]
pub fn table(years: &[i32], columns: &[(&str, &[f64])]) -> SeriesTable {
    let columns = columns
        .iter()
        .map(|(name, values)| series(name, years, values))
        .collect();
    SeriesTable::new(years.to_vec(), columns)
}

/// Cancer table export: `;`-separated, decimal commas, unnamed year column
/// and a trailing empty column
#[allow(dead_code)]
pub fn cancer_csv(columns: &[&str], rows: &[(i32, &[&str])]) -> String {
    let mut out = format!(";{};\n", columns.join(";"));
    for (year, values) in rows {
        out.push_str(&format!("{year};{};\n", values.join(";")));
    }
    out
}

/// Write the six source tables of a small but complete dataset
///
/// Women: total incidence rises, men: it falls. Years are written in
/// descending order to exercise sorting.
#[allow(dead_code)]
pub fn write_data_dir(dir: &Path) {
    let total = "Krebs gesamt (C00-C97 ohne C44)";

    let incidence_w = cancer_csv(
        &[total, "Brustdrüse (C50)", "Lunge (C33-C34)"],
        &[
            (2004, &["420,0", "118,0", "24,0"]),
            (2003, &["415,5", "116,5", "23,1"]),
            (2002, &["410,0", "114,0", "22,4"]),
            (2001, &["405,5", "113,0", "21,2"]),
            (2000, &["400,0", "111,0", "20,5"]),
        ],
    );
    let incidence_m = cancer_csv(
        &[total, "Prostata (C61)", "Lunge (C33-C34)"],
        &[
            (2000, &["560,0", "110,0", "70,0"]),
            (2001, &["552,0", "112,5", "68,2"]),
            (2002, &["545,5", "111,0", "66,9"]),
            (2003, &["540,0", "114,0", "64,0"]),
            (2004, &["531,0", "115,5", "62,5"]),
        ],
    );
    let mortality_w = cancer_csv(
        &[total, "Lunge (C33-C34)"],
        &[
            (2000, &["160,0", "12,0"]),
            (2001, &["158,0", "12,4"]),
            (2002, &["155,0", "12,9"]),
            (2003, &["153,5", "13,1"]),
            (2004, &["151,0", "13,6"]),
        ],
    );
    let mortality_m = cancer_csv(
        &[total, "Lunge (C33-C34)"],
        &[
            (2000, &["240,0", "55,0"]),
            (2001, &["236,0", "53,5"]),
            (2002, &["231,0", "52,5"]),
            (2003, &["228,0", "50,0"]),
            (2004, &["223,0", "49,0"]),
        ],
    );
    let risk_w = "Jahr,Rauchen,Alkoholkonsum_avg_täglich(g)\n\
                  2000,24.0,8.0\n2001,23.5,7.6\n2002,22.1,7.9\n2003,21.8,7.1\n2004,20.0,6.8\n2005,19.4,6.5\n";
    let risk_m = "Jahr,Rauchen,Alkoholkonsum_avg_täglich(g)\n\
                  2000,33.0,17.0\n2001,32.1,16.2\n2002,31.5,16.5\n2003,30.2,15.1\n2004,29.9,14.8\n2005,28.0,14.0\n";

    let files = [
        ("Krebsdaten_w.csv", incidence_w.as_str()),
        ("Krebsdaten_m.csv", incidence_m.as_str()),
        ("Krebsdaten_Mortalität_w.csv", mortality_w.as_str()),
        ("Krebsdaten_Mortalität_m.csv", mortality_m.as_str()),
        ("risk_factors_w.csv", risk_w),
        ("risk_factors_m.csv", risk_m),
    ];
    for (name, content) in files {
        std::fs::write(dir.join(name), content).expect("failed to write fixture");
    }
}
