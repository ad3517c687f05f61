mod support;

use aelens::config::{self, AppSettings, StoreBackend};
use support::aelens_env::AelensEnvGuard;
use tempfile::tempdir;

#[test]
fn settings_round_trip_through_app_dir() {
    let dir = tempdir().unwrap();
    let _guard = AelensEnvGuard::set_config_home(dir.path().to_path_buf());

    let path = config::config_path().unwrap();
    assert!(path.starts_with(dir.path().join(".aelens")));
    assert_eq!(
        config::load_or_default().unwrap().estimator.trees,
        AppSettings::default().estimator.trees
    );

    let mut settings = AppSettings::default();
    settings.store.backend = StoreBackend::JsonDir;
    settings.store.data_dir = Some(dir.path().join("exports"));
    settings.estimator.seed = 42;
    settings.query.sold = "250".to_string();
    config::save(&settings).unwrap();

    let loaded = config::load_or_default().unwrap();
    assert_eq!(loaded.store.backend, StoreBackend::JsonDir);
    assert_eq!(loaded.store.data_dir, settings.store.data_dir);
    assert_eq!(loaded.estimator.seed, 42);
    assert_eq!(loaded.query.sold, "250");
}

#[test]
fn partial_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let _guard = AelensEnvGuard::set_config_home(dir.path().to_path_buf());
    let path = config::config_path().unwrap();
    std::fs::write(&path, "[estimator]\ntrees = 0\n").unwrap();

    let loaded = config::load_or_default().unwrap();
    assert_eq!(loaded.estimator.trees, 1);
    assert_eq!(loaded.estimator.min_rows, 5);
    assert_eq!(loaded.store.database, "AE_Items");
    assert_eq!(loaded.query.max_price, "50");
}
