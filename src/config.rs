use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the current directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".pr-comments-analyzer.toml";

pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_REPO: &str = "facebook/react";
pub const DEFAULT_PR_LIMIT: u32 = 50;
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// GraphQL `first:` arguments are capped at 100 by GitHub.
const MAX_PR_LIMIT: u32 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration loaded from .pr-comments-analyzer.toml.
///
/// All fields are optional — the tool works with zero config as long as
/// a GitHub token is available from the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub keywords: KeywordConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, `Config::load` fills it from GITHUB_TOKEN.
    pub token: Option<String>,

    /// GraphQL endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_api_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// `owner/name` or a github.com repository URL. If None, falls back to
    /// TARGET_REPO env var, then to facebook/react.
    pub repo: Option<String>,

    /// How many of the most recently created PRs to fetch.
    #[serde(default = "default_pr_limit")]
    pub pr_limit: u32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            repo: None,
            pr_limit: default_pr_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving results.csv, report.md and summary.json
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Keywords that mark a comment as a "thanks" comment.
///
/// `patterns` are raw regex fragments used as-is: `\btks\b` only matches
/// the whole word and `(wip` fails to compile. `phrases` are literal text
/// and are escaped before use.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordConfig {
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    #[serde(default)]
    pub phrases: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            phrases: Vec::new(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_pr_limit() -> u32 {
    DEFAULT_PR_LIMIT
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_patterns() -> Vec<String> {
    [
        "thank you",
        "thanks",
        r"\btks\b",
        "obrigad[oa]",
        "valeu",
        r"\bobg\b",
        r"\bvlw\b",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Config {
    /// Load configuration from `path`, or from .pr-comments-analyzer.toml in
    /// the current directory when no path is given.
    ///
    /// An explicit path must exist; the default file is optional and its
    /// absence yields the default config. Environment fallbacks are applied
    /// afterwards.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from(default_path)?
                } else {
                    Config::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from a specific path without consulting the environment.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Fill values the config file left unset from the environment.
    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.github.token.is_none() {
            self.github.token = lookup("GITHUB_TOKEN").filter(|t| !t.is_empty());
        }
        if self.target.repo.is_none() {
            self.target.repo = lookup("TARGET_REPO").filter(|r| !r.is_empty());
        }
    }

    /// Reject values that would only fail later against the API.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.pr_limit == 0 || self.target.pr_limit > MAX_PR_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "target.pr_limit must be between 1 and {}, got {}",
                MAX_PR_LIMIT, self.target.pr_limit
            )));
        }
        if self.github.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("github.api_url is empty".to_string()));
        }
        Ok(())
    }

    /// The GitHub token after layering; `load` has already folded in
    /// GITHUB_TOKEN when the file left it unset.
    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone().filter(|t| !t.is_empty())
    }

    /// Repository to analyze as written by the user, before parsing.
    pub fn target_repo(&self) -> &str {
        self.target.repo.as_deref().unwrap_or(DEFAULT_REPO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github.token.is_none());
        assert_eq!(config.github.api_url, DEFAULT_API_URL);
        assert_eq!(config.target.pr_limit, 50);
        assert_eq!(config.target_repo(), "facebook/react");
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert_eq!(config.keywords.patterns.len(), 7);
        assert!(config.keywords.phrases.is_empty());
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[target]
repo = "rust-lang/rust"
pr_limit = 20

[output]
dir = "reports"

[keywords]
patterns = ["thanks", "\\bty\\b"]
phrases = ["c++ rocks"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.target_repo(), "rust-lang/rust");
        assert_eq!(config.target.pr_limit, 20);
        assert_eq!(config.output.dir, PathBuf::from("reports"));
        assert_eq!(config.keywords.patterns, vec!["thanks", r"\bty\b"]);
        assert_eq!(config.keywords.phrases, vec!["c++ rocks"]);
        assert_eq!(config.github.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: Config = toml::from_str("[target]\nrepo = \"a/b\"\n").unwrap();
        assert_eq!(config.target.pr_limit, DEFAULT_PR_LIMIT);
        assert_eq!(config.keywords.patterns.len(), 7);
    }

    #[test]
    fn test_env_fills_missing_values() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            "GITHUB_TOKEN" => Some("env-token".to_string()),
            "TARGET_REPO" => Some("tokio-rs/tokio".to_string()),
            _ => None,
        });
        assert_eq!(config.github.token.as_deref(), Some("env-token"));
        assert_eq!(config.target_repo(), "tokio-rs/tokio");
    }

    #[test]
    fn test_file_values_win_over_env() {
        let mut config: Config =
            toml::from_str("[github]\ntoken = \"file-token\"\n[target]\nrepo = \"a/b\"\n").unwrap();
        config.apply_env(|_| Some("env".to_string()));
        assert_eq!(config.github.token.as_deref(), Some("file-token"));
        assert_eq!(config.target_repo(), "a/b");
    }

    #[test]
    fn test_github_token_reads_only_layered_value() {
        let config = Config::default();
        assert!(config.github_token().is_none());

        let mut config = Config::default();
        config.apply_env(|key| (key == "GITHUB_TOKEN").then(|| "env-token".to_string()));
        assert_eq!(config.github_token().as_deref(), Some("env-token"));

        config.github.token = Some(String::new());
        assert!(config.github_token().is_none());
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let mut config = Config::default();
        config.apply_env(|_| Some(String::new()));
        assert!(config.github.token.is_none());
        assert_eq!(config.target_repo(), DEFAULT_REPO);
    }

    #[test]
    fn test_validate_pr_limit() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.target.pr_limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.target.pr_limit = 101;
        assert!(config.validate().is_err());
        config.target.pr_limit = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = std::env::temp_dir().join("pr-comments-analyzer-missing.toml");
        assert!(matches!(Config::load_from(&path), Err(ConfigError::FileRead(_))));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("pr-comments-analyzer-config-test.toml");
        std::fs::write(&path, "[output]\ndir = \"tmp-out\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("tmp-out"));
        std::fs::remove_file(&path).ok();
    }
}
