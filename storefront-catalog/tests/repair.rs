use std::fs;

use storefront_catalog::links::normalize_table;
use storefront_catalog::repair::{PersistOptions, fixed_copy_path, persist};
use storefront_catalog::{
    ColumnDefaults, apply_column_repair, load_catalog, plan_column_repair, read_table,
};
use tempfile::TempDir;

const SOURCE: &str = "product_id,product_name,price,description,image_url\n\
101,Kilishi,₦2500,Spicy,https://drive.google.com/file/d/FILE101/view?usp=sharing\n\
102,Chin Chin,₦1500,Crunchy,https://img.example/2.jpg\n";

#[test]
fn repaired_copy_is_written_beside_the_source() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("products.csv");
    fs::write(&source, SOURCE).unwrap();

    let mut table = read_table(&source).unwrap();
    let report = plan_column_repair(&table, &ColumnDefaults::default());
    apply_column_repair(&mut table, &report);
    let outcome = persist(&table, &source, &PersistOptions::default()).unwrap();

    assert_eq!(outcome.written, fixed_copy_path(&source));
    assert_eq!(outcome.backup, None);
    assert_eq!(fs::read_to_string(&source).unwrap(), SOURCE);

    let fixed = load_catalog(&outcome.written).unwrap();
    assert_eq!(fixed.len(), 2);
    assert_eq!(fixed.records[0].id.as_str(), "101");
    assert_eq!(fixed.records[1].social_handle.as_deref(), Some("@sisters_business"));
}

#[test]
fn in_place_repair_keeps_a_backup() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("products.csv");
    fs::write(&source, SOURCE).unwrap();

    let mut table = read_table(&source).unwrap();
    let report = normalize_table(&mut table);
    assert_eq!(report.rewritten(), 1);

    let options = PersistOptions {
        in_place: true,
        create_backup: true,
        output: None,
    };
    let outcome = persist(&table, &source, &options).unwrap();
    assert_eq!(outcome.written, source);

    let backup = outcome.backup.expect("backup created");
    assert_eq!(fs::read_to_string(backup).unwrap(), SOURCE);

    let catalog = load_catalog(&source).unwrap();
    assert_eq!(
        catalog.records[0].image_url,
        "https://drive.google.com/uc?export=view&id=FILE101"
    );
    assert_eq!(catalog.records[1].image_url, "https://img.example/2.jpg");
}

#[test]
fn normalizing_a_persisted_table_again_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("products.csv");
    fs::write(&source, SOURCE).unwrap();

    let mut table = read_table(&source).unwrap();
    normalize_table(&mut table);
    let out = tmp.path().join("out.csv");
    let options = PersistOptions {
        output: Some(out.clone()),
        ..Default::default()
    };
    persist(&table, &source, &options).unwrap();
    let first = fs::read(&out).unwrap();

    let mut again = read_table(&out).unwrap();
    let report = normalize_table(&mut again);
    assert!(!report.has_rewrites());
    persist(&again, &out, &PersistOptions { in_place: true, ..Default::default() }).unwrap();
    assert_eq!(fs::read(&out).unwrap(), first);
}
