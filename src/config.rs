// src/config.rs
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::errors::{Result, PlaygroundError};

const DEFAULT_JAVA_PATH: &str = "java";
const DEFAULT_STACK_SIZE: &str = "128m";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8090;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_PLAYGROUND_URL: &str = "https://play.golang.org";

/// High-level application configuration, loaded once at startup and
/// shared read-only between workers.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the Gobra jar handed to the JVM.
    pub gobra_jar: PathBuf,
    /// Path to the `java` executable.
    pub java_path: PathBuf,
    /// Value of the JVM `-Xss` flag. Gobra recurses deeply on larger inputs.
    pub java_stack_size: String,
    pub host: String,
    pub port: u16,
    /// Wall-clock budget for one verifier run.
    pub timeout: Duration,
    /// Base URL of the Go playground used by the compile proxy.
    pub playground_url: String,
}

/// Optional TOML config file. Every key may be omitted; environment
/// variables take precedence over the file.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub gobra_jar: Option<PathBuf>,
    #[serde(default)]
    pub java_path: Option<PathBuf>,
    #[serde(default)]
    pub java_stack_size: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub playground_url: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

impl AppConfig {
    /// Configuration with defaults for everything but the jar path.
    pub fn new(gobra_jar: impl Into<PathBuf>) -> Self {
        Self {
            gobra_jar: gobra_jar.into(),
            java_path: PathBuf::from(DEFAULT_JAVA_PATH),
            java_stack_size: DEFAULT_STACK_SIZE.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            playground_url: DEFAULT_PLAYGROUND_URL.to_string(),
        }
    }

    /// Load configuration from `PLAYGROUND_CONFIG` (if set) and the environment.
    pub fn from_env() -> Result<Self> {
        let file = match std::env::var("PLAYGROUND_CONFIG") {
            Ok(path) => Some(FileConfig::load(Path::new(&path))?),
            Err(_) => None,
        };
        Self::from_sources(file.unwrap_or_default(), |key| std::env::var(key).ok())
    }

    /// Merge a file config with variables from `lookup`. Fails if no jar
    /// path is configured anywhere.
    pub fn from_sources<F>(file: FileConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gobra_jar = lookup("GOBRA_JAR")
            .map(PathBuf::from)
            .or(file.gobra_jar)
            .ok_or_else(|| PlaygroundError::Config(
                "GOBRA_JAR is not set. Point it at the Gobra jar before starting the server.".to_string()
            ))?;

        let mut config = AppConfig::new(gobra_jar);

        if let Some(java_path) = lookup("JAVA_PATH").map(PathBuf::from).or(file.java_path) {
            config.java_path = java_path;
        }
        if let Some(stack_size) = lookup("JAVA_STACK_SIZE").or(file.java_stack_size) {
            config.java_stack_size = stack_size;
        }
        if let Some(host) = lookup("HOST").or(file.host) {
            config.host = host;
        }
        if let Some(port) = parse_var(&lookup, "PORT")?.or(file.port) {
            config.port = port;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "VERIFY_TIMEOUT_SECS")?.or(file.timeout_secs) {
            if secs == 0 {
                return Err(PlaygroundError::Config("VERIFY_TIMEOUT_SECS must be positive".to_string()));
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(url) = lookup("GO_PLAYGROUND_URL").or(file.playground_url) {
            config.playground_url = url;
        }

        if !config.gobra_jar.exists() {
            log::warn!("Gobra jar {} does not exist (yet)", config.gobra_jar.display());
        }

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PlaygroundError::Config(format!("{} has an invalid value: {:?}", key, raw))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_jar_fails_fast() {
        let result = AppConfig::from_sources(FileConfig::default(), lookup_from(&[]));
        assert!(matches!(result, Err(PlaygroundError::Config(_))));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_sources(
            FileConfig::default(),
            lookup_from(&[("GOBRA_JAR", "/gobra/gobra.jar")]),
        )
        .unwrap();

        assert_eq!(config.gobra_jar, PathBuf::from("/gobra/gobra.jar"));
        assert_eq!(config.java_path, PathBuf::from("java"));
        assert_eq!(config.port, 8090);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.java_stack_size, "128m");
    }

    #[test]
    fn test_env_overrides_file() {
        let file: FileConfig = toml::from_str(
            r#"
            gobra_jar = "/opt/gobra.jar"
            port = 9000
            timeout_secs = 10
            "#,
        )
        .unwrap();

        let config = AppConfig::from_sources(file, lookup_from(&[("PORT", "9100")])).unwrap();

        assert_eq!(config.gobra_jar, PathBuf::from("/opt/gobra.jar"));
        assert_eq!(config.port, 9100);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let result = AppConfig::from_sources(
            FileConfig::default(),
            lookup_from(&[("GOBRA_JAR", "/gobra.jar"), ("PORT", "eighty")]),
        );
        assert!(matches!(result, Err(PlaygroundError::Config(_))));

        let result = AppConfig::from_sources(
            FileConfig::default(),
            lookup_from(&[("GOBRA_JAR", "/gobra.jar"), ("VERIFY_TIMEOUT_SECS", "0")]),
        );
        assert!(matches!(result, Err(PlaygroundError::Config(_))));
    }
}
