use rstest::rstest;
use serde_json::{Value, json};
use stac::{Version, migrate_value};
use stac_validate::Validator;
use std::{fs::File, path::PathBuf};

const EXTENSION_SCHEMAS: [&str; 2] = [
    "https://stac-extensions.github.io/eo/v1.1.0/schema.json",
    "https://stac-extensions.github.io/raster/v1.1.0/schema.json",
];

fn validator() -> Validator {
    EXTENSION_SCHEMAS
        .iter()
        .fold(Validator::new().unwrap(), |validator, uri| {
            validator.with_schema(uri, json!({"type": "object"})).unwrap()
        })
}

#[rstest]
fn migrated_objects_validate(
    #[files("../core/data/*.json")]
    #[exclude("invalid")]
    path: PathBuf,
) {
    let value: Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
    let migrated = migrate_value(value, Some(&Version::v1_1_0)).unwrap();
    validator().validate_value(&migrated).unwrap();
}

#[test]
fn invalid_item_reports_paths() {
    let value: Value =
        serde_json::from_reader(File::open("../core/data/invalid-item.json").unwrap()).unwrap();
    let Err(stac_validate::Error::Validation(violations)) = validator().validate_value(&value)
    else {
        panic!("the item should not validate");
    };
    assert!(violations.iter().any(|v| v.path == "/geometry"));
}
