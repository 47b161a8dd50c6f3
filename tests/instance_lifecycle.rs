//! Instance creation, teardown and engine metadata

use vlc_bridge::{
    Instance, InstanceBuilder, InstanceConfig, LogLevel, LogMode, StubEngine, StubHook, VersionId,
    VlcError,
};
use tempfile::TempDir;

#[test]
fn test_create_with_accepted_arguments() {
    for args in [
        vec![],
        vec!["--no-video"],
        vec!["--quiet", "--intf=dummy", "--network-caching=1500"],
        vec!["-vv"],
    ] {
        let instance = Instance::<StubEngine>::create(&args).unwrap();
        assert!(!instance.as_raw().is_null());
        assert_eq!(instance.log_mode(), LogMode::Disabled);
        assert_eq!(StubEngine::emitter(&instance).args(), args);
    }
}

#[test]
fn test_create_with_unknown_flag_fails() {
    let result = Instance::<StubEngine>::create(&["--no-video", "--this-flag-does-not-exist"]);
    match result {
        Err(VlcError::Initialization { args, .. }) => {
            assert_eq!(args, vec!["--no-video", "--this-flag-does-not-exist"]);
        }
        other => panic!("expected initialization failure, got {:?}", other),
    }
}

#[test]
fn test_many_instances_are_independent() {
    let instances: Vec<_> = (0..8)
        .map(|_| Instance::<StubEngine>::new().unwrap())
        .collect();
    let emitters: Vec<_> = instances.iter().map(StubEngine::emitter).collect();

    let mut instances = instances;
    instances[3].on_log(|_| {});
    for (idx, emitter) in emitters.iter().enumerate() {
        let expected = if idx == 3 { StubHook::Callback } else { StubHook::None };
        assert_eq!(emitter.hook(), expected);
    }

    drop(instances);
    assert!(emitters.iter().all(|e| e.is_released()));
}

#[test]
fn test_version_metadata() {
    let version = Instance::<StubEngine>::version();
    assert!(!version.is_empty());
    assert!(version.starts_with("4."));

    assert!(!Instance::<StubEngine>::compiler().is_empty());
    assert!(!Instance::<StubEngine>::changeset().is_empty());

    let runtime = Instance::<StubEngine>::runtime_version().unwrap();
    assert_eq!(runtime.major, Instance::<StubEngine>::header_version().major);
    assert_eq!(VersionId::current::<StubEngine>(), VersionId::new(4, 0, 0, 0));
}

#[test]
fn test_builder_applies_options() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("built.log");

    let instance = InstanceBuilder::new()
        .arg("--no-video")
        .args(["--quiet"])
        .user_agent("Player", "Player/2.1")
        .app_id("com.example.player", "2.1", "player")
        .log_file(&log_path)
        .build::<StubEngine>()
        .unwrap();

    let emitter = StubEngine::emitter(&instance);
    assert_eq!(emitter.args(), vec!["--no-video", "--quiet"]);
    assert_eq!(emitter.user_agent().unwrap().1, "Player/2.1");
    assert_eq!(emitter.app_id().unwrap().0, "com.example.player");
    assert_eq!(instance.log_mode(), LogMode::File);

    assert!(emitter.emit(LogLevel::Notice, "main", "from builder"));
    drop(instance);
    assert!(std::fs::read_to_string(&log_path).unwrap().contains("from builder"));
}

#[test]
fn test_builder_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("instance.toml");
    std::fs::write(
        &config_path,
        r#"
        args = ["--no-audio"]
        minimum_version = "3.0.18"

        [user_agent]
        name = "Player"
        http = "Player/1.0"
        "#,
    )
    .unwrap();

    let config = InstanceConfig::from_file(&config_path).unwrap();
    let instance = InstanceBuilder::from_config(config)
        .unwrap()
        .build::<StubEngine>()
        .unwrap();
    assert_eq!(StubEngine::emitter(&instance).args(), vec!["--no-audio"]);
}

#[test]
fn test_builder_rejects_old_engine() {
    let result = InstanceBuilder::new()
        .minimum_version(VersionId::new(5, 0, 0, 0))
        .build::<StubEngine>();
    match result {
        Err(VlcError::UnsupportedEngine { required, found }) => {
            assert_eq!(required, "5.0.0.0");
            assert_eq!(found, "4.0.0.0");
        }
        other => panic!("expected unsupported engine, got {:?}", other),
    }
}

#[test]
fn test_builder_with_bad_log_path_releases_instance() {
    let temp_dir = TempDir::new().unwrap();
    let result = InstanceBuilder::new()
        .log_file(temp_dir.path().join("missing").join("vlc.log"))
        .build::<StubEngine>();
    assert!(matches!(result, Err(VlcError::LogTarget { .. })));
}
