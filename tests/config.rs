use std::io::Write;

use livegrid::{ConfigError, DashboardConfig, GridSize};

fn write_temp(suffix: &str, body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[test]
fn defaults_describe_the_compact_grid() {
    let cfg = DashboardConfig::default();
    assert_eq!((cfg.rows, cfg.columns), (3, 3));
    assert_eq!(cfg.channel_count(), 9);
    assert_eq!(cfg.history_duration_ms, 60_000);
    assert_eq!(cfg.dataset_pool_size, 10);
    assert_eq!(cfg.initial_visible_count, 30_000);
    assert_eq!(cfg.analytics_interval_ms, 2_000);
    assert!(cfg.analytics);
    assert!(cfg.is_compact());
    assert_eq!(cfg.headline(), "9 live channels (1 ms resolution) 1 minute history");
    cfg.validate().unwrap();
}

#[test]
fn full_grid_has_one_hundred_channels() {
    let cfg = DashboardConfig::default().with_grid(GridSize::Full);
    assert_eq!(cfg.channel_count(), 100);
    assert!(!cfg.is_compact());
    assert!(cfg.headline().starts_with("100 live channels"));
}

#[test]
fn only_grids_smaller_than_full_are_compact() {
    let grid = |rows, columns| DashboardConfig {
        rows,
        columns,
        ..Default::default()
    };
    assert!(grid(9, 10).is_compact());
    assert!(grid(1, 50).is_compact());
    assert!(!grid(5, 20).is_compact());
    assert!(!grid(12, 12).is_compact());
}

#[test]
fn loads_partial_json() {
    let file = write_temp(".json", r#"{ "rows": 2, "columns": 4, "seed": 7 }"#);
    let cfg = DashboardConfig::load_from_path(file.path()).unwrap();
    assert_eq!(cfg.channel_count(), 8);
    assert_eq!(cfg.seed, Some(7));
    assert_eq!(cfg.history_duration_ms, 60_000);
}

#[test]
fn loads_yaml() {
    let file = write_temp(
        ".yaml",
        "rows: 10\ncolumns: 10\nanalytics: false\nhistory_duration_ms: 10000\n",
    );
    let cfg = DashboardConfig::load_from_path(file.path()).unwrap();
    assert_eq!(cfg.channel_count(), 100);
    assert!(!cfg.analytics);
    assert_eq!(cfg.headline(), "100 live channels (1 ms resolution) 10.0 s history");
}

#[test]
fn rejects_unknown_extension() {
    let file = write_temp(".toml", "rows = 3\n");
    assert!(matches!(
        DashboardConfig::load_from_path(file.path()),
        Err(ConfigError::UnknownFormat(_))
    ));
}

#[test]
fn reports_parse_errors_with_path() {
    let file = write_temp(".json", "{ rows: ");
    match DashboardConfig::load_from_path(file.path()) {
        Err(ConfigError::Json { path, .. }) => assert_eq!(path, file.path()),
        other => panic!("expected JSON error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    assert!(matches!(
        DashboardConfig::load_from_path(&path),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn invalid_values_are_rejected_after_loading() {
    let file = write_temp(".yml", "dataset_pool_size: 0\n");
    assert!(matches!(
        DashboardConfig::load_from_path(file.path()),
        Err(ConfigError::Invalid(_))
    ));

    let cfg = DashboardConfig {
        rows: 0,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = DashboardConfig {
        analytics_interval_ms: 0,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = DashboardConfig {
        analytics: false,
        analytics_interval_ms: 0,
        ..Default::default()
    };
    cfg.validate().unwrap();
}
