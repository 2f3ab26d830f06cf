use raw_uploader::load_config::{load_config, Overrides, BUCKET_ENV, REGION_ENV};
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn set_env(bucket: Option<&str>, region: Option<&str>) {
    match bucket {
        Some(b) => env::set_var(BUCKET_ENV, b),
        None => env::remove_var(BUCKET_ENV),
    }
    match region {
        Some(r) => env::set_var(REGION_ENV, r),
        None => env::remove_var(REGION_ENV),
    }
}

fn yaml_file(content: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), content).unwrap();
    file
}

#[test]
#[serial]
fn missing_bucket_name_fails_fast() {
    set_env(None, Some("eu-west-1"));

    let err = load_config(None, &Overrides::default()).unwrap_err();
    assert!(
        err.to_string().contains("AWS_S3_BUCKET_NAME"),
        "error should name the missing variable, got: {err}"
    );
}

#[test]
#[serial]
fn blank_bucket_name_counts_as_missing() {
    set_env(Some("   "), None);

    assert!(load_config(None, &Overrides::default()).is_err());
}

#[test]
#[serial]
fn region_defaults_to_us_east_2() {
    set_env(Some("lake"), None);

    let config = load_config(None, &Overrides::default()).expect("config should load");

    assert_eq!(config.upload.bucket_name, "lake");
    assert_eq!(config.verify.bucket_name, "lake");
    assert_eq!(config.upload.region, "us-east-2");
    assert_eq!(
        config.upload.data_dirs,
        vec![PathBuf::from("../../data/raw"), PathBuf::from("data/raw")]
    );
    assert_eq!(config.upload.extension, "csv");
    assert_eq!(config.upload.key_prefix, "raw-data/");
    assert_eq!(config.verify.prefix, "raw_data/");
}

#[test]
#[serial]
fn region_is_taken_from_environment() {
    set_env(Some("lake"), Some("ap-southeast-1"));

    let config = load_config(None, &Overrides::default()).unwrap();
    assert_eq!(config.upload.region, "ap-southeast-1");
}

#[test]
#[serial]
fn yaml_file_overrides_defaults_and_flags_override_yaml() {
    set_env(Some("lake"), None);
    let file = yaml_file(
        r#"
data_dir: ./exports/raw
extension: .tsv
key_prefix: landing/
verify_prefix: landing/
"#,
    );
    let overrides = Overrides {
        key_prefix: Some("raw-data/".to_string()),
        ..Overrides::default()
    };

    let config = load_config(Some(file.path()), &overrides).unwrap();

    assert_eq!(config.upload.data_dirs, vec![PathBuf::from("./exports/raw")]);
    assert_eq!(config.upload.extension, "tsv");
    assert_eq!(config.upload.key_prefix, "raw-data/");
    assert_eq!(config.verify.prefix, "landing/");
}

#[test]
#[serial]
fn empty_yaml_file_keeps_defaults() {
    set_env(Some("lake"), None);
    let file = yaml_file("");

    let config = load_config(Some(file.path()), &Overrides::default()).unwrap();
    assert_eq!(config.upload.key_prefix, "raw-data/");
}

#[test]
#[serial]
fn invalid_yaml_is_reported_as_parse_error() {
    set_env(Some("lake"), None);
    let file = yaml_file("not-yaml: [:::");

    let err = load_config(Some(file.path()), &Overrides::default()).unwrap_err();
    let msg = format!("{err:#}");
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
#[serial]
fn unknown_yaml_keys_are_rejected() {
    set_env(Some("lake"), None);
    let file = yaml_file("bucket: sneaky\n");

    assert!(load_config(Some(file.path()), &Overrides::default()).is_err());
}
