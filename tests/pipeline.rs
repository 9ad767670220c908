//! End-to-end run over a temporary dataset directory: load the raw
//! workbook, anonymize it, reload the encoded workbook and check the
//! derived tables line up.

use std::fs;
use std::path::{Path, PathBuf};

use hut_stats::data::schema::{indicators, name_codes, sheet, summary, top_beer, workbook};
use hut_stats::data::{encode_dataset, HutDataset, Workbook};
use hut_stats::stats::{train_predict, LinearRegression};

fn write_dataset(root: &Path) -> PathBuf {
    let dataset = root.join("dataset");
    fs::create_dir_all(dataset.join(workbook::RAW)).unwrap();
    fs::create_dir_all(dataset.join(workbook::INDICES)).unwrap();

    fs::write(
        dataset.join(workbook::RAW).join("drinks.csv"),
        "year,category,boxes\n\
         2018,Pils,20.0\n\
         2018,\"Spezi, Fanta usw.\",5.0\n\
         2019,Pils,22.0\n\
         2019,Weizen,2.0\n\
         2019,\"Spezi, Fanta usw.\",6.0\n",
    )
    .unwrap();
    fs::write(
        dataset.join(workbook::RAW).join("top_beer.csv"),
        "year,name,beer,non_alcoholic\n\
         2018,Anna,120.0,10.0\n\
         2018,Bob,90.0,0.0\n\
         2019,Bob,100.0,4.0\n\
         2019,Carl,80.0,2.0\n",
    )
    .unwrap();
    fs::write(
        dataset.join(workbook::RAW).join("top_schnapps.csv"),
        "year,name,schnapps\n\
         2018,Bob,25.0\n\
         2019,Dora,30.0\n",
    )
    .unwrap();
    fs::write(
        dataset.join(workbook::INDICES).join("indicators.csv"),
        format!(
            "year,\"{}\",\"{}\"\n2018,3365.45,104.1\n2019,3473.26,105.8\n",
            indicators::GDP_SOURCE,
            indicators::CPI_SOURCE
        ),
    )
    .unwrap();

    dataset
}

#[test]
fn encode_then_reload_preserves_aggregates() {
    let tmp = tempfile::tempdir().unwrap();
    let dataset = write_dataset(tmp.path());

    let raw = HutDataset::load(&dataset, false).unwrap();

    let raw_drinks_before = fs::read(dataset.join(workbook::RAW).join("drinks.csv")).unwrap();
    let raw_beer_before = fs::read(dataset.join(workbook::RAW).join("top_beer.csv")).unwrap();

    let codes = encode_dataset(&dataset).unwrap();

    // Source workbook is untouched.
    assert_eq!(
        fs::read(dataset.join(workbook::RAW).join("drinks.csv")).unwrap(),
        raw_drinks_before
    );
    assert_eq!(
        fs::read(dataset.join(workbook::RAW).join("top_beer.csv")).unwrap(),
        raw_beer_before
    );

    // First-appearance codes across both leaderboards.
    assert_eq!(codes.len(), 4);
    assert_eq!(codes.code("Anna"), Some(0));
    assert_eq!(codes.code("Bob"), Some(1));
    assert_eq!(codes.code("Carl"), Some(2));
    assert_eq!(codes.code("Dora"), Some(3));

    // Persisted mapping decodes back to the original names.
    let mapping = Workbook::open(dataset.join(workbook::NAME_CODES))
        .unwrap()
        .read_sheet(sheet::NAMES)
        .unwrap();
    let persisted: Vec<String> = mapping
        .column(name_codes::NAME)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    assert_eq!(persisted, vec!["Anna", "Bob", "Carl", "Dora"]);
    for (code, name) in persisted.iter().enumerate() {
        assert_eq!(codes.name(code as i64), Some(name.as_str()));
    }

    // Reloading the encoded workbook yields identical derived tables; the
    // name column now holds integer codes.
    let encoded = HutDataset::load(&dataset, true).unwrap();
    assert!(encoded.summary.equals_missing(&raw.summary));
    assert!(encoded
        .summary_indicators
        .equals_missing(&raw.summary_indicators));
    let beer_codes: Vec<i64> = encoded
        .top_beer
        .column(top_beer::NAME)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(beer_codes, vec![0, 1, 1, 2]);
}

#[test]
fn summary_feeds_the_extrapolator() {
    let tmp = tempfile::tempdir().unwrap();
    let dataset = write_dataset(tmp.path());

    let ds = HutDataset::load(&dataset, false).unwrap();

    // 2018: 20 boxes, 2019: 24 boxes -> 200 l and 240 l.
    let beer_total = ds
        .summary
        .column(summary::BEER_TOTAL)
        .unwrap()
        .f64()
        .unwrap();
    assert_eq!(beer_total.get(0), Some(200.0));
    assert_eq!(beer_total.get(1), Some(240.0));

    let mut model = LinearRegression::new();
    let forecast = train_predict(&mut model, &ds.summary, summary::BEER_TOTAL, 2020).unwrap();

    assert!((forecast.prediction - 280.0).abs() < 1e-9);
    let years: Vec<i64> = forecast.line.iter().map(|(year, _)| *year).collect();
    assert_eq!(years, vec![2018, 2019, 2020]);
}
