// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: JSON 加载、缺省值、环境变量覆写、校验失败
// ==========================================

use flood_mpc::config::{config_keys, ConfigError, ConfigManager};
use flood_mpc::domain::OptimizationMode;
use flood_mpc::optimizer::DecisionPolicy;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_load_full_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "control": {{"horizon_steps": 60, "resample_ratio": 10, "control_step_minutes": 20, "device_count": 3}},
            "segment_minutes": 10,
            "mode": "SINGLE_OBJECTIVE",
            "policy": {{"kind": "WEIGHTED_SUM", "weights": [0.5, 0.3, 0.2]}},
            "optimizer": {{"population_size": 200, "tournament_size": 10, "seed": 99}}
        }}"#
    )
    .unwrap();

    let manager = ConfigManager::load(file.path()).unwrap();
    let config = manager.config();

    assert_eq!(config.control.segments(), 6);
    assert_eq!(config.control.variable_count(), 18);
    assert_eq!(config.control.commit_segments(config.segment_minutes), 2);
    assert_eq!(config.mode, OptimizationMode::SingleObjective);
    assert_eq!(
        config.policy,
        DecisionPolicy::WeightedSum {
            weights: [0.5, 0.3, 0.2]
        }
    );
    assert_eq!(config.optimizer.population_size, 200);
    assert_eq!(config.optimizer.seed, Some(99));
    // 未给出的字段取默认值
    assert_eq!(config.device_scale, 4.5);
    assert_eq!(config.optimizer.steady_generations, 200);
}

#[test]
fn test_environment_overrides_applied_before_validation() {
    let manager = ConfigManager::from_json_with_env(
        "{}",
        env(&[
            (config_keys::SEED, "1234"),
            (config_keys::POPULATION, "32"),
            (config_keys::MAX_GENERATIONS, "50"),
            (config_keys::MODE, "single"),
        ]),
    )
    .unwrap();

    let config = manager.into_config();
    assert_eq!(config.optimizer.seed, Some(1234));
    assert_eq!(config.optimizer.population_size, 32);
    assert_eq!(config.optimizer.max_generations, 50);
    assert_eq!(config.mode, OptimizationMode::SingleObjective);
}

#[test]
fn test_invalid_override_and_values_rejected() {
    let err = ConfigManager::from_json_with_env("{}", env(&[(config_keys::POPULATION, "many")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidOverride { .. }));

    let err = ConfigManager::from_json_with_env("{}", env(&[(config_keys::POPULATION, "1")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));

    let err = ConfigManager::from_json(r#"{"policy": {"kind": "WEIGHTED_SUM", "weights": [0, 0, 0]}}"#)
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "policy"));

    let err = ConfigManager::from_json(r#"{"control": {"horizon_steps": 25}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parameter(_)));

    assert!(matches!(
        ConfigManager::from_json("{not json"),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_missing_file_is_read_error() {
    let err = ConfigManager::load("/nonexistent/flood-mpc/config.json").unwrap_err();
    assert!(matches!(err, ConfigError::ReadError { .. }));
}

#[test]
fn test_snapshot_reloads_with_same_layout() {
    let manager = ConfigManager::with_defaults();
    let snapshot = manager.snapshot().unwrap();
    assert!(snapshot.contains("\"population_size\":1000"));
    assert!(snapshot.contains("\"kind\":\"NEAREST_IDEAL\""));

    let reloaded = ConfigManager::from_json(&snapshot).unwrap();
    assert_eq!(reloaded.config().control, manager.config().control);
    assert_eq!(reloaded.config().mode, manager.config().mode);
    assert_eq!(reloaded.config().policy, manager.config().policy);
}
