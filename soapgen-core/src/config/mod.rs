mod loader;
pub mod value;

use std::collections::HashMap;
use std::path::Path;

pub use value::{ConfigValue, FromConfigValue};

/// Error type for configuration operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The requested key was not found in the configuration.
    NotFound(String),
    /// The value could not be converted to the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// An I/O or YAML parsing error occurred while loading config files.
    Load(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "Config key not found: {key}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "Config type mismatch for '{key}': expected {expected}")
            }
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub const PROFILE_ENV: &str = "SOAPGEN_PROFILE";
const ENV_PREFIX: &str = "SOAPGEN_";

/// Generator configuration loaded from YAML files, `.env` files and
/// environment variables.
///
/// Resolution order (lowest to highest priority):
/// 1. `soapgen.yaml`
/// 2. `soapgen-{profile}.yaml`
/// 3. `.env`, then `.env.{profile}` (loaded into the process environment)
/// 4. `SOAPGEN_*` environment variables (`SOAPGEN_PACKAGE_SUFFIX` overrides
///    `soapgen.package.suffix`)
///
/// `.env` files never overwrite already-set environment variables.
///
/// Profile is determined by: `SOAPGEN_PROFILE` env var > argument > `"dev"`.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    values: HashMap<String, ConfigValue>,
    profile: String,
}

impl GeneratorConfig {
    /// Load configuration from the current working directory.
    pub fn load(profile: Option<&str>) -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."), profile)
    }

    /// Load configuration from `dir`.
    pub fn load_from(dir: &Path, profile: Option<&str>) -> Result<Self, ConfigError> {
        let active_profile = std::env::var(PROFILE_ENV)
            .ok()
            .or_else(|| profile.map(str::to_string))
            .unwrap_or_else(|| "dev".to_string());

        let mut values = HashMap::new();

        let base = loader::load_yaml_file(&dir.join("soapgen.yaml"), &mut values)?;
        let overlay = loader::load_yaml_file(
            &dir.join(format!("soapgen-{active_profile}.yaml")),
            &mut values,
        )?;

        let _ = dotenvy::from_path(dir.join(".env"));
        let _ = dotenvy::from_path(dir.join(format!(".env.{active_profile}")));

        let mut overridden = 0usize;
        for (env_key, env_val) in std::env::vars() {
            if env_key.starts_with(ENV_PREFIX) && env_key != PROFILE_ENV {
                values.insert(
                    loader::env_key_to_config_key(&env_key),
                    ConfigValue::String(env_val),
                );
                overridden += 1;
            }
        }

        tracing::debug!(
            profile = %active_profile,
            base_file = base,
            profile_file = overlay,
            env_overrides = overridden,
            "Loaded generator configuration"
        );

        Ok(GeneratorConfig {
            values,
            profile: active_profile,
        })
    }

    /// Create a config from a YAML string (useful for testing).
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        loader::load_yaml_str(yaml, &mut values)?;
        Ok(GeneratorConfig {
            values,
            profile: profile.to_string(),
        })
    }

    pub fn empty() -> Self {
        GeneratorConfig {
            values: HashMap::new(),
            profile: "test".to_string(),
        }
    }

    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.values.insert(key.to_string(), value);
    }

    /// Get a typed value for the given dot-separated key.
    pub fn get<V: FromConfigValue>(&self, key: &str) -> Result<V, ConfigError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        V::from_config_value(value, key)
    }

    /// Get a typed value, returning a default if the key is missing or
    /// cannot be converted.
    pub fn get_or<V: FromConfigValue>(&self, key: &str, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    /// Like [`get`](Self::get) but a missing key is `Ok(None)`; a present key
    /// of the wrong type is still an error.
    pub fn get_opt<V: FromConfigValue>(&self, key: &str) -> Result<Option<V>, ConfigError> {
        match self.get(key) {
            Ok(v) => Ok(Some(v)),
            Err(ConfigError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }
}

// ── Typed synthesizer settings ──────────────────────────────────────────

/// Naming and strictness knobs of a build pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthConfig {
    /// Sub-package (relative to the interface package) for generated types.
    pub package_suffix: String,
    pub request_suffix: String,
    pub response_suffix: String,
    /// Infix between the wrapper name and the adapter counter.
    pub adapter_suffix: String,
    pub factory_suffix: String,
    /// Appended to a declared exception's simple name when no fault name is given.
    pub fault_suffix: String,
    /// Simple name of the per-package companion factory type.
    pub companion_name: String,
    /// Fail instead of degrading when a type cannot be classified.
    pub strict_classification: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            package_suffix: "jaxws_asm".to_string(),
            request_suffix: String::new(),
            response_suffix: "Response".to_string(),
            adapter_suffix: "_Adapter".to_string(),
            factory_suffix: "Factory".to_string(),
            fault_suffix: "_Exception".to_string(),
            companion_name: "ObjectFactory".to_string(),
            strict_classification: false,
        }
    }
}

impl SynthConfig {
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, ConfigError> {
        let defaults = SynthConfig::default();
        let string = |key: &str, default: String| -> Result<String, ConfigError> {
            Ok(config.get_opt(key)?.unwrap_or(default))
        };
        Ok(SynthConfig {
            package_suffix: string("soapgen.package.suffix", defaults.package_suffix)?,
            request_suffix: string("soapgen.request.suffix", defaults.request_suffix)?,
            response_suffix: string("soapgen.response.suffix", defaults.response_suffix)?,
            adapter_suffix: string("soapgen.adapter.suffix", defaults.adapter_suffix)?,
            factory_suffix: string("soapgen.factory.suffix", defaults.factory_suffix)?,
            fault_suffix: string("soapgen.fault.suffix", defaults.fault_suffix)?,
            companion_name: string("soapgen.companion.name", defaults.companion_name)?,
            strict_classification: config
                .get_opt("soapgen.classification.strict")?
                .unwrap_or(defaults.strict_classification),
        })
    }

    /// Package holding the types generated for an interface package.
    pub fn generated_package(&self, interface_package: &str) -> String {
        match (interface_package.is_empty(), self.package_suffix.is_empty()) {
            (_, true) => interface_package.to_string(),
            (true, false) => self.package_suffix.clone(),
            (false, false) => format!("{interface_package}.{}", self.package_suffix),
        }
    }

    /// Qualified name of the companion factory type for a package.
    pub fn companion_for(&self, package: &str) -> String {
        if package.is_empty() {
            self.companion_name.clone()
        } else {
            format!("{package}.{}", self.companion_name)
        }
    }
}
