use serial_test::serial;
use soapgen_core::config::{ConfigError, ConfigValue, GeneratorConfig, SynthConfig};

#[test]
fn test_empty_config_uses_defaults() {
    let synth = SynthConfig::from_config(&GeneratorConfig::empty()).unwrap();
    assert_eq!(synth, SynthConfig::default());
    assert_eq!(synth.package_suffix, "jaxws_asm");
    assert_eq!(synth.response_suffix, "Response");
    assert_eq!(synth.request_suffix, "");
    assert!(!synth.strict_classification);
}

#[test]
fn test_yaml_overrides() {
    let yaml = r#"
soapgen:
  package:
    suffix: generated
  request:
    suffix: Request
  classification:
    strict: true
"#;
    let config = GeneratorConfig::from_yaml_str(yaml, "test").unwrap();
    let synth = SynthConfig::from_config(&config).unwrap();
    assert_eq!(synth.package_suffix, "generated");
    assert_eq!(synth.request_suffix, "Request");
    assert!(synth.strict_classification);
    assert_eq!(synth.generated_package("org.acme"), "org.acme.generated");
}

#[test]
fn test_type_mismatch_is_reported() {
    let mut config = GeneratorConfig::empty();
    config.set("soapgen.classification.strict", ConfigValue::String("maybe".into()));
    assert_eq!(
        SynthConfig::from_config(&config).unwrap_err(),
        ConfigError::TypeMismatch {
            key: "soapgen.classification.strict".into(),
            expected: "bool"
        }
    );
}

#[test]
fn test_get_or_default() {
    let config = GeneratorConfig::empty();
    assert_eq!(config.get_or("missing", 7i64), 7);
    assert!(matches!(
        config.get::<String>("missing"),
        Err(ConfigError::NotFound(_))
    ));
}

#[test]
fn test_generated_package_edge_cases() {
    let mut synth = SynthConfig::default();
    assert_eq!(synth.generated_package(""), "jaxws_asm");
    synth.package_suffix.clear();
    assert_eq!(synth.generated_package("org.acme"), "org.acme");
    assert_eq!(synth.companion_for("org.acme"), "org.acme.ObjectFactory");
}

#[test]
#[serial]
fn test_load_profile_files_and_env_overlay() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("soapgen.yaml"),
        "soapgen:\n  package:\n    suffix: base\n  factory:\n    suffix: Maker\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("soapgen-ci.yaml"),
        "soapgen:\n  package:\n    suffix: ci\n",
    )
    .unwrap();

    std::env::remove_var("SOAPGEN_PROFILE");
    std::env::set_var("SOAPGEN_FAULT_SUFFIX", "Fault");

    let config = GeneratorConfig::load_from(dir.path(), Some("ci")).unwrap();
    std::env::remove_var("SOAPGEN_FAULT_SUFFIX");

    assert_eq!(config.profile(), "ci");
    let synth = SynthConfig::from_config(&config).unwrap();
    assert_eq!(synth.package_suffix, "ci");
    assert_eq!(synth.factory_suffix, "Maker");
    assert_eq!(synth.fault_suffix, "Fault");
}

#[test]
#[serial]
fn test_profile_env_var_wins() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("soapgen-prod.yaml"),
        "soapgen:\n  adapter:\n    suffix: _Helper\n",
    )
    .unwrap();

    std::env::set_var("SOAPGEN_PROFILE", "prod");
    let config = GeneratorConfig::load_from(dir.path(), Some("dev")).unwrap();
    std::env::remove_var("SOAPGEN_PROFILE");

    assert_eq!(config.profile(), "prod");
    assert_eq!(
        config.get::<String>("soapgen.adapter.suffix").unwrap(),
        "_Helper"
    );
}

#[test]
#[serial]
fn test_dotenv_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "SOAPGEN_COMPANION_NAME=Registry\n").unwrap();
    std::env::remove_var("SOAPGEN_PROFILE");
    std::env::remove_var("SOAPGEN_COMPANION_NAME");

    let config = GeneratorConfig::load_from(dir.path(), None).unwrap();
    std::env::remove_var("SOAPGEN_COMPANION_NAME");

    assert_eq!(config.profile(), "dev");
    let synth = SynthConfig::from_config(&config).unwrap();
    assert_eq!(synth.companion_name, "Registry");
}
