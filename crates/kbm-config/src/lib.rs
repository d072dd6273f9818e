//! Configuration management for kbm.
//!
//! Parses `config.json` with serde and layers environment variables and CLI
//! settings on top of it. Precedence, highest first:
//!
//! 1. CLI settings ([`CliSettings`])
//! 2. Environment variables (`ZENDESK_SOURCE_*`, `ZENDESK_TARGET_*`, legacy `ZENDESK_*`)
//! 3. Config file values
//! 4. Built-in defaults
//!
//! After all layers are applied, any target credential that is still empty
//! falls back to the resolved source value, so a single set of credentials
//! is enough to mirror an instance onto itself.
//!
//! ## Environment Variable Expansion
//!
//! String values in the config file support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! ## Legacy Format
//!
//! Older config files carry a single flat credential triple
//! (`zendesk_api_token`, `zendesk_user_email`, `zendesk_subdomain`) at the top
//! level. Those values become the source instance, and the target instance
//! too when the file has no `target` object.

mod expand;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration filename looked up in the working directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Default backup folder, relative to the config file directory.
const DEFAULT_BACKUP_FOLDER: &str = "backup";

/// Default Help Center locale.
const DEFAULT_LANGUAGE: &str = "en-us";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override backup folder.
    pub backup_folder: Option<PathBuf>,
}

/// Credentials and address of one Zendesk instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InstanceConfig {
    /// API token.
    pub zendesk_api_token: String,
    /// Agent email the token belongs to.
    pub zendesk_user_email: String,
    /// Subdomain (`acme`), host (`acme.zendesk.com`) or full URL.
    pub zendesk_subdomain: String,
}

impl InstanceConfig {
    /// Base URL of the instance, without trailing slash.
    ///
    /// Bare subdomains are expanded to `https://{subdomain}.zendesk.com`.
    #[must_use]
    pub fn base_url(&self) -> String {
        let raw = self.zendesk_subdomain.trim().trim_end_matches('/');
        if raw.starts_with("http://") || raw.starts_with("https://") {
            raw.to_owned()
        } else if raw.contains('.') {
            format!("https://{raw}")
        } else {
            format!("https://{raw}.zendesk.com")
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::ApiToken => &mut self.zendesk_api_token,
            Field::UserEmail => &mut self.zendesk_user_email,
            Field::Subdomain => &mut self.zendesk_subdomain,
        }
    }

    fn field(&self, field: Field) -> &str {
        match field {
            Field::ApiToken => &self.zendesk_api_token,
            Field::UserEmail => &self.zendesk_user_email,
            Field::Subdomain => &self.zendesk_subdomain,
        }
    }

    /// Validate that every credential is set.
    ///
    /// `role` is `"source"` or `"target"` and selects the names reported in
    /// the error message.
    fn validate(&self, role: Role) -> Result<(), ConfigError> {
        let missing: Vec<String> = Field::ALL
            .iter()
            .filter(|f| self.field(**f).trim().is_empty())
            .map(|f| {
                format!(
                    "{}.{} is empty (set it in {CONFIG_FILENAME} or via {})",
                    role.key(),
                    f.key(),
                    role.env_var(*f)
                )
            })
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::Validation(missing.join("; ")));
        }

        let base_url = self.base_url();
        require_http_url(&base_url, &format!("{}.zendesk_subdomain", role.key()))
    }
}

/// One credential field of an instance.
#[derive(Debug, Clone, Copy)]
enum Field {
    ApiToken,
    UserEmail,
    Subdomain,
}

impl Field {
    const ALL: [Self; 3] = [Self::ApiToken, Self::UserEmail, Self::Subdomain];

    fn key(self) -> &'static str {
        match self {
            Self::ApiToken => "zendesk_api_token",
            Self::UserEmail => "zendesk_user_email",
            Self::Subdomain => "zendesk_subdomain",
        }
    }

    fn env_suffix(self) -> &'static str {
        match self {
            Self::ApiToken => "API_TOKEN",
            Self::UserEmail => "USER_EMAIL",
            Self::Subdomain => "SUBDOMAIN",
        }
    }

    /// Legacy variable shared by both instances (e.g. `ZENDESK_API_TOKEN`).
    fn legacy_env_var(self) -> String {
        format!("ZENDESK_{}", self.env_suffix())
    }
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Source,
    Target,
}

impl Role {
    fn key(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }

    fn env_var(self, field: Field) -> String {
        let role = match self {
            Self::Source => "SOURCE",
            Self::Target => "TARGET",
        };
        format!("ZENDESK_{role}_{}", field.env_suffix())
    }
}

/// HTTP transport tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries after a rate-limited or transient failure.
    pub max_retries: u32,
    /// Base delay between retries when the server gives no `Retry-After`.
    pub retry_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

/// Raw config file as parsed from JSON.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<InstanceConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<InstanceConfig>,
    // Legacy flat credentials
    #[serde(skip_serializing_if = "Option::is_none")]
    zendesk_api_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    zendesk_user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    zendesk_subdomain: Option<String>,
    backup_folder: Option<String>,
    language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locales: Option<Vec<String>>,
    permission_group_id: Option<u64>,
    user_segment_id: Option<u64>,
    include_drafts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    http: Option<HttpConfig>,
}

impl ConfigFile {
    /// Template written by `kbm init`.
    fn template() -> Self {
        Self {
            source: Some(InstanceConfig::default()),
            target: Some(InstanceConfig::default()),
            backup_folder: Some(DEFAULT_BACKUP_FOLDER.to_owned()),
            language: Some(DEFAULT_LANGUAGE.to_owned()),
            include_drafts: Some(false),
            http: Some(HttpConfig::default()),
            ..Self::default()
        }
    }

    fn has_legacy_credentials(&self) -> bool {
        self.zendesk_api_token.is_some()
            || self.zendesk_user_email.is_some()
            || self.zendesk_subdomain.is_some()
    }

    /// Expand environment variable references in string values.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for (role, instance) in [("source", &mut self.source), ("target", &mut self.target)] {
            if let Some(instance) = instance {
                for field in Field::ALL {
                    let value = instance.field_mut(field);
                    *value = expand::expand_env(value, &format!("{role}.{}", field.key()))?;
                }
            }
        }

        for (key, value) in [
            ("zendesk_api_token", &mut self.zendesk_api_token),
            ("zendesk_user_email", &mut self.zendesk_user_email),
            ("zendesk_subdomain", &mut self.zendesk_subdomain),
            ("backup_folder", &mut self.backup_folder),
            ("language", &mut self.language),
        ] {
            if let Some(v) = value {
                *v = expand::expand_env(v, key)?;
            }
        }

        Ok(())
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Instance backed up from.
    pub source: InstanceConfig,
    /// Instance restored to.
    pub target: InstanceConfig,
    /// Root of the on-disk snapshot.
    pub backup_folder: PathBuf,
    /// Help Center locales to mirror, in order.
    pub locales: Vec<String>,
    /// Target permission group for created articles (auto-detected when unset).
    pub permission_group_id: Option<u64>,
    /// Target user segment for created articles (auto-detected when unset).
    pub user_segment_id: Option<u64>,
    /// Whether draft articles are backed up.
    pub include_drafts: bool,
    /// HTTP transport settings.
    pub http: HttpConfig,
    /// Path to the config file (set after loading).
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Refused to overwrite an existing file.
    #[error("Configuration file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`source.zendesk_api_token`").
        field: String,
        /// Error message (e.g., "${`ZD_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file, process environment and CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise uses
    /// `config.json` in the current directory when present, and built-in
    /// defaults when not.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resolved values are invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, cli_settings, |name| std::env::var(name).ok())
    }

    /// Same as [`Config::load`], reading environment variables through `env`.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_with_env(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else {
            let cwd = std::env::current_dir()?;
            let candidate = cwd.join(CONFIG_FILENAME);
            if candidate.exists() {
                Self::load_from_file(&candidate)?
            } else {
                Self::default_with_base(&cwd)
            }
        };

        config.apply_env(env);
        config.fill_target_from_source();

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Write the default config template to `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AlreadyExists` if the file exists and `force`
    /// is false, or an I/O error if writing fails.
    pub fn write_default(path: &Path, force: bool) -> Result<(), ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        let mut content = serde_json::to_string_pretty(&ConfigFile::template())?;
        content.push('\n');
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get validated source instance configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming every missing credential.
    pub fn require_source(&self) -> Result<&InstanceConfig, ConfigError> {
        self.source.validate(Role::Source)?;
        Ok(&self.source)
    }

    /// Get validated target instance configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming every missing credential.
    pub fn require_target(&self) -> Result<&InstanceConfig, ConfigError> {
        self.target.validate(Role::Target)?;
        Ok(&self.target)
    }

    /// Validate settings that every mode depends on.
    ///
    /// Credentials are checked lazily by [`Config::require_source`] and
    /// [`Config::require_target`], since each mode needs only one side.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const MAX_RETRIES: u32 = 10;

        if self.locales.is_empty() {
            return Err(ConfigError::Validation(
                "at least one locale is required".to_owned(),
            ));
        }
        for locale in &self.locales {
            require_non_empty(locale, "locales")?;
        }
        if self.backup_folder.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "backup_folder cannot be empty".to_owned(),
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "http.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if self.http.max_retries > MAX_RETRIES {
            return Err(ConfigError::Validation(format!(
                "http.max_retries cannot exceed {MAX_RETRIES}"
            )));
        }
        Ok(())
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(backup_folder) = &settings.backup_folder {
            self.backup_folder.clone_from(backup_folder);
        }
    }

    /// Overlay credentials from environment variables.
    ///
    /// Role-specific variables always win. The legacy shared variables fill
    /// the source when no source-specific variable is set, and the target only
    /// when the file left that target value empty. Empty variables are
    /// treated as unset.
    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| env(name).filter(|v| !v.is_empty());

        for field in Field::ALL {
            let legacy = lookup(&field.legacy_env_var());

            if let Some(value) = lookup(&Role::Source.env_var(field)).or_else(|| legacy.clone()) {
                *self.source.field_mut(field) = value;
            }

            let target = self.target.field_mut(field);
            if let Some(value) = lookup(&Role::Target.env_var(field)) {
                *target = value;
            } else if let Some(value) = legacy
                && target.is_empty()
            {
                *target = value;
            }
        }
    }

    /// Use source credentials for any target value that is still empty.
    fn fill_target_from_source(&mut self) {
        for field in Field::ALL {
            if self.target.field(field).is_empty() {
                let value = self.source.field(field).to_owned();
                *self.target.field_mut(field) = value;
            }
        }
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            source: InstanceConfig::default(),
            target: InstanceConfig::default(),
            backup_folder: base.join(DEFAULT_BACKUP_FOLDER),
            locales: vec![DEFAULT_LANGUAGE.to_owned()],
            permission_group_id: None,
            user_segment_id: None,
            include_drafts: false,
            http: HttpConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut file: ConfigFile = serde_json::from_str(&content)?;
        file.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_file(file, config_dir);
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Resolve a parsed config file against defaults.
    ///
    /// Relative `backup_folder` paths resolve against `config_dir`.
    fn from_file(file: ConfigFile, config_dir: &Path) -> Self {
        let mut config = Self::default_with_base(config_dir);

        if file.has_legacy_credentials() && file.source.is_none() {
            let legacy = InstanceConfig {
                zendesk_api_token: file.zendesk_api_token.clone().unwrap_or_default(),
                zendesk_user_email: file.zendesk_user_email.clone().unwrap_or_default(),
                zendesk_subdomain: file.zendesk_subdomain.clone().unwrap_or_default(),
            };
            if file.target.is_none() {
                config.target = legacy.clone();
            }
            config.source = legacy;
        }
        if let Some(source) = file.source {
            config.source = source;
        }
        if let Some(target) = file.target {
            config.target = target;
        }

        if let Some(folder) = file.backup_folder.filter(|f| !f.is_empty()) {
            config.backup_folder = config_dir.join(folder);
        }

        config.locales = match (file.locales, file.language) {
            (Some(locales), _) => locales,
            (None, Some(language)) => vec![language],
            (None, None) => config.locales,
        };

        config.permission_group_id = file.permission_group_id;
        config.user_segment_id = file.user_segment_id;
        config.include_drafts = file.include_drafts.unwrap_or(false);
        config.http = file.http.unwrap_or_default();
        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(json: &str) -> Config {
        let file: ConfigFile = serde_json::from_str(json).unwrap();
        Config::from_file(file, Path::new("/project"))
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn instance(token: &str, email: &str, subdomain: &str) -> InstanceConfig {
        InstanceConfig {
            zendesk_api_token: token.to_owned(),
            zendesk_user_email: email.to_owned(),
            zendesk_subdomain: subdomain.to_owned(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.backup_folder, PathBuf::from("/test/backup"));
        assert_eq!(config.locales, vec!["en-us".to_owned()]);
        assert_eq!(config.http, HttpConfig::default());
        assert!(!config.include_drafts);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse("{}");
        assert_eq!(config.backup_folder, PathBuf::from("/project/backup"));
        assert_eq!(config.source, InstanceConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            r#"{
  "source": {"zendesk_api_token": "s-tok", "zendesk_user_email": "s@example.com", "zendesk_subdomain": "src"},
  "target": {"zendesk_api_token": "t-tok", "zendesk_user_email": "t@example.com", "zendesk_subdomain": "dst"},
  "backup_folder": "snapshots",
  "language": "de",
  "permission_group_id": 42,
  "user_segment_id": null,
  "include_drafts": true,
  "http": {"timeout_secs": 10, "max_retries": 5, "retry_delay_ms": 250}
}"#,
        );
        assert_eq!(config.source, instance("s-tok", "s@example.com", "src"));
        assert_eq!(config.target, instance("t-tok", "t@example.com", "dst"));
        assert_eq!(config.backup_folder, PathBuf::from("/project/snapshots"));
        assert_eq!(config.locales, vec!["de".to_owned()]);
        assert_eq!(config.permission_group_id, Some(42));
        assert_eq!(config.user_segment_id, None);
        assert!(config.include_drafts);
        assert_eq!(config.http.max_retries, 5);
    }

    #[test]
    fn test_locales_override_language() {
        let config = parse(r#"{"language": "de", "locales": ["en-us", "fr"]}"#);
        assert_eq!(config.locales, vec!["en-us".to_owned(), "fr".to_owned()]);
    }

    #[test]
    fn test_legacy_flat_credentials_migrate_to_both_instances() {
        let config = parse(
            r#"{"zendesk_api_token": "tok", "zendesk_user_email": "me@example.com", "zendesk_subdomain": "acme"}"#,
        );
        let expected = instance("tok", "me@example.com", "acme");
        assert_eq!(config.source, expected);
        assert_eq!(config.target, expected);
    }

    #[test]
    fn test_legacy_flat_credentials_keep_explicit_target() {
        let config = parse(
            r#"{"zendesk_api_token": "tok", "zendesk_user_email": "me@example.com", "zendesk_subdomain": "acme",
                "target": {"zendesk_subdomain": "other"}}"#,
        );
        assert_eq!(config.source.zendesk_subdomain, "acme");
        assert_eq!(config.target, instance("", "", "other"));
    }

    #[test]
    fn test_source_env_overrides_file_for_source_only() {
        let mut config = parse(
            r#"{"source": {"zendesk_api_token": "file-src"}, "target": {"zendesk_api_token": "file-dst"}}"#,
        );
        config.apply_env(env_from(&[("ZENDESK_SOURCE_API_TOKEN", "env-src")]));
        config.fill_target_from_source();

        assert_eq!(config.source.zendesk_api_token, "env-src");
        assert_eq!(config.target.zendesk_api_token, "file-dst");
    }

    #[test]
    fn test_target_env_overrides_file() {
        let mut config = parse(r#"{"target": {"zendesk_subdomain": "file"}}"#);
        config.apply_env(env_from(&[("ZENDESK_TARGET_SUBDOMAIN", "env")]));
        assert_eq!(config.target.zendesk_subdomain, "env");
    }

    #[test]
    fn test_legacy_env_fills_source_and_empty_target() {
        let mut config = parse(r#"{"target": {"zendesk_user_email": "keep@example.com"}}"#);
        config.apply_env(env_from(&[
            ("ZENDESK_API_TOKEN", "legacy-tok"),
            ("ZENDESK_USER_EMAIL", "legacy@example.com"),
        ]));

        assert_eq!(config.source.zendesk_api_token, "legacy-tok");
        assert_eq!(config.source.zendesk_user_email, "legacy@example.com");
        assert_eq!(config.target.zendesk_api_token, "legacy-tok");
        // Target value from the file wins over the legacy variable
        assert_eq!(config.target.zendesk_user_email, "keep@example.com");
    }

    #[test]
    fn test_specific_env_beats_legacy_env() {
        let mut config = parse("{}");
        config.apply_env(env_from(&[
            ("ZENDESK_SUBDOMAIN", "legacy"),
            ("ZENDESK_SOURCE_SUBDOMAIN", "specific"),
        ]));
        assert_eq!(config.source.zendesk_subdomain, "specific");
        assert_eq!(config.target.zendesk_subdomain, "legacy");
    }

    #[test]
    fn test_empty_env_var_is_ignored() {
        let mut config = parse(r#"{"source": {"zendesk_api_token": "file"}}"#);
        config.apply_env(env_from(&[("ZENDESK_SOURCE_API_TOKEN", "")]));
        assert_eq!(config.source.zendesk_api_token, "file");
    }

    #[test]
    fn test_target_falls_back_to_source() {
        let mut config = parse(
            r#"{"source": {"zendesk_api_token": "t", "zendesk_user_email": "e@x.com", "zendesk_subdomain": "s"},
                "target": {"zendesk_subdomain": "other"}}"#,
        );
        config.fill_target_from_source();
        assert_eq!(config.target, instance("t", "e@x.com", "other"));
    }

    #[test]
    fn test_load_with_env_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"{"source": {"zendesk_api_token": "file", "zendesk_user_email": "a@b.c", "zendesk_subdomain": "src"},
                "target": {"zendesk_api_token": "dst-file"}}"#,
        )
        .unwrap();

        let settings = CliSettings {
            backup_folder: Some(PathBuf::from("/elsewhere")),
        };
        let config = Config::load_with_env(
            Some(&path),
            Some(&settings),
            env_from(&[("ZENDESK_SOURCE_API_TOKEN", "env")]),
        )
        .unwrap();

        assert_eq!(config.source.zendesk_api_token, "env");
        assert_eq!(config.target.zendesk_api_token, "dst-file");
        assert_eq!(config.target.zendesk_subdomain, "src");
        assert_eq!(config.backup_folder, PathBuf::from("/elsewhere"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load_with_env(Some(Path::new("/nonexistent/config.json")), None, |_| None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "{ not json").unwrap();
        let err = Config::load_with_env(Some(&path), None, |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_expand_env_vars_in_file() {
        let mut file: ConfigFile = serde_json::from_str(
            r#"{"source": {"zendesk_subdomain": "${KBM_CONFIG_TEST_SUBDOMAIN:-fallback}"}}"#,
        )
        .unwrap();
        file.expand_env_vars().unwrap();
        assert_eq!(file.source.unwrap().zendesk_subdomain, "fallback");
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        let mut file: ConfigFile = serde_json::from_str(
            r#"{"target": {"zendesk_api_token": "${KBM_CONFIG_TEST_MISSING}"}}"#,
        )
        .unwrap();
        let err = file.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("target.zendesk_api_token"));
    }

    #[test]
    fn test_base_url_forms() {
        assert_eq!(instance("", "", "acme").base_url(), "https://acme.zendesk.com");
        assert_eq!(
            instance("", "", "help.acme.com").base_url(),
            "https://help.acme.com"
        );
        assert_eq!(
            instance("", "", "https://acme.zendesk.com/").base_url(),
            "https://acme.zendesk.com"
        );
        assert_eq!(
            instance("", "", "http://localhost:8080").base_url(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_require_source_reports_all_missing_fields() {
        let config = Config::default_with_base(Path::new("/test"));
        let err = config.require_source().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("source.zendesk_api_token"), "got: {msg}");
        assert!(msg.contains("ZENDESK_SOURCE_USER_EMAIL"), "got: {msg}");
        assert!(msg.contains("source.zendesk_subdomain"), "got: {msg}");
    }

    #[test]
    fn test_require_target_valid() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.target = instance("tok", "me@example.com", "acme");
        assert!(config.require_target().is_ok());
        assert!(config.require_source().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_locales() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.locales.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.http.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_validate_rejects_excessive_retries() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.http.max_retries = 50;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    fn test_write_default_round_trips_and_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);

        Config::write_default(&path, false).unwrap();
        let config = Config::load_with_env(Some(&path), None, |_| None).unwrap();
        assert_eq!(config.locales, vec!["en-us".to_owned()]);
        assert_eq!(config.backup_folder, dir.path().join("backup"));

        let err = Config::write_default(&path, false).unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyExists(_)));
        assert!(Config::write_default(&path, true).is_ok());
    }
}
