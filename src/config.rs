use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Image shown before the first successful generation.
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://picsum.photos/640";

pub const DEFAULT_ENDPOINT_URL: &str = "http://127.0.0.1:8000/generate-image";

#[derive(Debug, Default, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub endpoint: Endpoint,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub export: Export,
}

#[derive(Debug, Deserialize)]
pub struct Endpoint {
    #[serde(default = "default_endpoint_url")]
    pub url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Ui {
    #[serde(default = "default_placeholder_url")]
    pub placeholder_url: String,
    /// Render the last failure in the status bar instead of failing silently.
    #[serde(default)]
    pub show_errors: bool,
    pub theme: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Export {
    pub output_dir: Option<PathBuf>,
}

fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.into()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_placeholder_url() -> String {
    DEFAULT_PLACEHOLDER_URL.into()
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            url: default_endpoint_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            placeholder_url: default_placeholder_url(),
            show_errors: false,
            theme: None,
        }
    }
}

impl Endpoint {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl GeneratorConfig {
    /// Resolve where exported images go.
    /// Search order: config file field (with `~/` expanded) > pictures dir > ~/.imagegen/images
    pub fn output_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.export.output_dir {
            return expand_home(dir);
        }
        if let Some(pictures) = dirs::picture_dir() {
            return pictures.join("imagegen");
        }
        dirs::home_dir()
            .map(|h| h.join(".imagegen/images"))
            .unwrap_or_else(|| "/tmp/imagegen".into())
    }
}

fn expand_home(path: &std::path::Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Load the generator config file.
/// Search order:
///   1. IMAGEGEN_CONFIG env var
///   2. ~/.imagegen/config.toml
///   3. Default values
pub fn load() -> GeneratorConfig {
    let candidates = [
        std::env::var("IMAGEGEN_CONFIG").ok().map(PathBuf::from),
        dirs::home_dir().map(|h| h.join(".imagegen/config.toml")),
    ];
    load_first(candidates.into_iter().flatten())
}

/// First candidate that exists and parses wins; the rest are logged and skipped.
fn load_first(candidates: impl IntoIterator<Item = PathBuf>) -> GeneratorConfig {
    for candidate in candidates {
        if candidate.exists() {
            match fs::read_to_string(&candidate) {
                Ok(content) => match toml::from_str::<GeneratorConfig>(&content) {
                    Ok(config) => {
                        info!(
                            path = %candidate.display(),
                            endpoint = %config.endpoint.url,
                            "loaded generator config"
                        );
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %candidate.display(), error = %e, "failed to parse config");
                    }
                },
                Err(e) => {
                    warn!(path = %candidate.display(), error = %e, "failed to read config");
                }
            }
        }
    }

    info!("no config file found, using defaults");
    GeneratorConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: GeneratorConfig = toml::from_str("").unwrap();
        assert_eq!(config.endpoint.url, DEFAULT_ENDPOINT_URL);
        assert_eq!(config.endpoint.request_timeout(), Duration::from_secs(120));
        assert_eq!(config.ui.placeholder_url, DEFAULT_PLACEHOLDER_URL);
        assert!(!config.ui.show_errors);
        assert!(config.ui.theme.is_none());
    }

    #[test]
    fn test_partial_sections_keep_field_defaults() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            [endpoint]
            request_timeout_secs = 5

            [ui]
            show_errors = true
            theme = "nord"
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoint.url, DEFAULT_ENDPOINT_URL);
        assert_eq!(config.endpoint.request_timeout_secs, 5);
        assert_eq!(config.ui.placeholder_url, DEFAULT_PLACEHOLDER_URL);
        assert!(config.ui.show_errors);
        assert_eq!(config.ui.theme.as_deref(), Some("nord"));
    }

    #[test]
    fn test_load_first_skips_missing_and_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        fs::write(&broken, "[endpoint\nurl = ").unwrap();
        fs::write(&good, "[ui]\nshow_errors = true\n").unwrap();

        let config = load_first([missing, broken, good]);
        assert!(config.ui.show_errors);
        assert_eq!(config.endpoint.url, DEFAULT_ENDPOINT_URL);
    }

    #[test]
    fn test_load_first_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "not = [valid").unwrap();

        let config = load_first([dir.path().join("missing.toml"), broken]);
        assert!(!config.ui.show_errors);
        assert_eq!(config.ui.placeholder_url, DEFAULT_PLACEHOLDER_URL);
    }

    /// Only this test touches IMAGEGEN_CONFIG.
    #[test]
    fn test_load_reads_env_override_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[endpoint]\nurl = \"http://10.0.0.5:9000/generate-image\"\nrequest_timeout_secs = 7\n",
        )
        .unwrap();

        std::env::set_var("IMAGEGEN_CONFIG", &path);
        let config = load();
        std::env::remove_var("IMAGEGEN_CONFIG");

        assert_eq!(config.endpoint.url, "http://10.0.0.5:9000/generate-image");
        assert_eq!(config.endpoint.request_timeout_secs, 7);
    }

    #[test]
    fn test_explicit_output_dir_wins() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            [export]
            output_dir = "/srv/images"
            "#,
        )
        .unwrap();
        assert_eq!(config.output_dir(), PathBuf::from("/srv/images"));
    }

    #[test]
    fn test_output_dir_expands_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let config: GeneratorConfig = toml::from_str(
            r#"
            [export]
            output_dir = "~/gen"
            "#,
        )
        .unwrap();
        assert_eq!(config.output_dir(), home.join("gen"));
    }
}
