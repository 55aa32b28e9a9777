use std::fs;
use std::path::PathBuf;

use sarf::settings::Settings;

#[test]
fn reads_a_toml_file_over_defaults() {
    let path = std::env::temp_dir().join(format!("sarf-settings-{}.toml", std::process::id()));
    fs::write(&path, "log_filter = \"sarf=debug\"\nroots_file = \"data/roots.txt\"\n").expect("write config");
    let settings = Settings::load(Some(path.as_path())).expect("settings load");
    fs::remove_file(&path).expect("cleanup");
    assert_eq!(settings.log_filter, "sarf=debug");
    assert_eq!(settings.roots_file, Some(PathBuf::from("data/roots.txt")));
    assert_eq!(settings.schemes_file, None);
    assert_eq!(settings.page_size, 50);
}

#[test]
fn a_named_file_must_exist() {
    let path = std::env::temp_dir().join("sarf-settings-does-not-exist.toml");
    assert!(Settings::load(Some(path.as_path())).is_err());
}

#[test]
fn defaults() {
    let settings = Settings::default();
    assert_eq!(settings.log_filter, "info");
    assert_eq!(settings.page_size, 50);
    assert!(settings.roots_file.is_none());
}
