//! Parser configuration
//!
//! Settings can come from a YAML file and be overridden from the environment:
//!
//! ```yaml
//! format: ttl
//! base_uri: http://example.org/
//! temp_dir: /var/tmp/rapper
//! backend: auto
//! rapper_bin: /usr/bin/rapper
//! ```

use crate::error::{ParseError, ParseResult};
use crate::format::Format;
use crate::parser::{Backend, DEFAULT_RAPPER_BIN};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the rapper executable
pub const ENV_RAPPER_BIN: &str = "RAPPER_RDF_BIN";
/// Environment variable overriding the temporary file directory
pub const ENV_TMP_DIR: &str = "RAPPER_RDF_TMP_DIR";
/// Environment variable overriding the input format
pub const ENV_FORMAT: &str = "RAPPER_RDF_FORMAT";
/// Environment variable overriding the backend
pub const ENV_BACKEND: &str = "RAPPER_RDF_BACKEND";

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Input format
    pub format: Format,
    /// Base URI for relative IRIs
    pub base_uri: Option<String>,
    /// Directory for temporary input files (None = system temp dir)
    pub temp_dir: Option<PathBuf>,
    /// Parsing backend
    pub backend: Backend,
    /// rapper executable
    pub rapper_bin: PathBuf,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            format: Format::default(),
            base_uri: None,
            temp_dir: None,
            backend: Backend::default(),
            rapper_bin: PathBuf::from(DEFAULT_RAPPER_BIN),
        }
    }
}

impl ParserConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> ParseResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ParseResult<Self> {
        let path = path.as_ref();
        debug!("Loading parser config from: {}", path.display());
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            ParseError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Apply overrides from `RAPPER_RDF_*` environment variables
    pub fn apply_env(self) -> ParseResult<Self> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(mut self, var: impl Fn(&str) -> Option<String>) -> ParseResult<Self> {
        if let Some(bin) = var(ENV_RAPPER_BIN) {
            self.rapper_bin = PathBuf::from(bin);
        }
        if let Some(dir) = var(ENV_TMP_DIR) {
            self.temp_dir = Some(PathBuf::from(dir));
        }
        if let Some(format) = var(ENV_FORMAT) {
            self.format = format.parse()?;
        }
        if let Some(backend) = var(ENV_BACKEND) {
            self.backend = backend.parse()?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ParserConfig::default());
        assert_eq!(config.format, Format::Turtle);
        assert_eq!(config.backend, Backend::Rapper);
        assert_eq!(config.rapper_bin, PathBuf::from("rapper"));
    }

    #[test]
    fn test_full_yaml() {
        let yaml = "format: n-quads\n\
                    base_uri: http://example.org/\n\
                    temp_dir: /var/tmp/rapper\n\
                    backend: native\n\
                    rapper_bin: /opt/raptor/bin/rapper\n";
        let config = ParserConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.format, Format::NQuadsDashed);
        assert_eq!(config.base_uri.as_deref(), Some("http://example.org/"));
        assert_eq!(config.temp_dir, Some(PathBuf::from("/var/tmp/rapper")));
        assert_eq!(config.backend, Backend::Native);
        assert_eq!(config.rapper_bin, PathBuf::from("/opt/raptor/bin/rapper"));
    }

    #[test]
    fn test_invalid_format_fails_at_load() {
        let err = ParserConfig::from_yaml_str("format: invalid").unwrap_err();
        assert!(matches!(err, ParseError::Config(_)));
        assert!(err.to_string().contains("Given format is invalid"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ParserConfig::from_yaml_str("formats: turtle").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_RAPPER_BIN, "/usr/local/bin/rapper"),
            (ENV_FORMAT, "trig"),
            (ENV_BACKEND, "auto"),
        ]
        .into_iter()
        .collect();

        let config = ParserConfig::default()
            .apply_vars(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.rapper_bin, PathBuf::from("/usr/local/bin/rapper"));
        assert_eq!(config.format, Format::TriG);
        assert_eq!(config.backend, Backend::Auto);
        assert_eq!(config.temp_dir, None);
    }

    #[test]
    fn test_env_invalid_format() {
        let result = ParserConfig::default().apply_vars(|key| {
            (key == ENV_FORMAT).then(|| "yaml".to_string())
        });
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }
}
