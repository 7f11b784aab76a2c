//! Shared configuration for the cloudcontrol CLI.
//!
//! TOML profiles, the credential chain (env + keyring + `~/.nttcis` +
//! plaintext), and translation to `cloudcontrol_core::SessionConfig`.
//! Core never reads files; everything disk-bound lives here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use cloudcontrol_core::{DEFAULT_REGION, DuplicateNamePolicy, Region, SessionConfig, TlsVerification};

/// Environment variables read before anything else.
pub const USER_ENV: &str = "NTTCIS_USER";
pub const PASSWORD_ENV: &str = "NTTCIS_PASSWORD";

/// Section of the `~/.nttcis` dotfile holding the credentials.
const DOTFILE_SECTION: &str = "nttcis";
const KEYRING_SERVICE: &str = "cloudcontrol";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// HTTP request timeout, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Longest a `--wait` lasts, seconds.
    #[serde(default = "default_wait_time")]
    pub wait_time: u64,

    /// Seconds between state polls while waiting.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// `first-match` or `reject`.
    #[serde(default = "default_duplicate_names")]
    pub duplicate_names: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            region: default_region(),
            timeout: default_timeout(),
            wait_time: default_wait_time(),
            poll_interval: default_poll_interval(),
            duplicate_names: default_duplicate_names(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_region() -> String {
    DEFAULT_REGION.into()
}
fn default_timeout() -> u64 {
    60
}
fn default_wait_time() -> u64 {
    600
}
fn default_poll_interval() -> u64 {
    10
}
fn default_duplicate_names() -> String {
    "first-match".into()
}

/// A named CloudControl account.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Region key (`na`, `eu`, `is-au`, ...).
    pub region: Option<String>,

    /// CloudControl user name.
    pub user_id: Option<String>,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Send every request to this base URL instead of the region hosts.
    pub base_url: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "cloudcontrol", "cloudcontrol").map_or_else(
        || {
            let mut p = home_dir();
            p.push(".config");
            p.push("cloudcontrol");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// `~/.nttcis`
pub fn dotfile_path() -> PathBuf {
    home_dir().join(".nttcis")
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()))
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. Environment variables prefixed
/// `CLOUDCONTROL_` override file values (`__` separates nested keys).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CLOUDCONTROL_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// A user id and its password.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: String,
    pub password: SecretString,
}

/// Walk the credential chain for `profile_name`; first hit wins.
pub fn resolve_credentials(
    profile: Option<&Profile>,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    resolve_credentials_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        keyring_password,
        Some(&dotfile_path()),
    )
}

/// The credential chain with its sources injected:
///
/// 1. `NTTCIS_USER` + `NTTCIS_PASSWORD`
/// 2. the profile's `password_env` variable, with the profile `user_id`
/// 3. the keyring entry `cloudcontrol` / `{profile}/password`
/// 4. the `[nttcis]` section of the dotfile
/// 5. the profile's plaintext `password`
pub fn resolve_credentials_with(
    profile: Option<&Profile>,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
    dotfile: Option<&Path>,
) -> Result<Credentials, ConfigError> {
    if let (Some(user_id), Some(password)) = (env(USER_ENV), env(PASSWORD_ENV)) {
        debug!("credentials from environment");
        return Ok(Credentials {
            user_id,
            password: SecretString::from(password),
        });
    }

    let profile_user = profile.and_then(|p| p.user_id.clone());

    if let (Some(user_id), Some(var)) = (
        profile_user.clone(),
        profile.and_then(|p| p.password_env.as_deref()),
    ) {
        if let Some(password) = env(var) {
            debug!(var, "credentials from profile password_env");
            return Ok(Credentials {
                user_id,
                password: SecretString::from(password),
            });
        }
    }

    if let Some(user_id) = profile_user.clone() {
        if let Some(password) = keyring(profile_name) {
            debug!(profile = profile_name, "credentials from keyring");
            return Ok(Credentials {
                user_id,
                password: SecretString::from(password),
            });
        }
    }

    if let Some(path) = dotfile {
        if let Some(creds) = read_dotfile(path)? {
            debug!(path = %path.display(), "credentials from dotfile");
            return Ok(creds);
        }
    }

    if let (Some(user_id), Some(password)) = (
        profile_user,
        profile.and_then(|p| p.password.clone()),
    ) {
        return Ok(Credentials {
            user_id,
            password: SecretString::from(password),
        });
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

fn keyring_password(profile_name: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .ok()?
        .get_password()
        .ok()
}

/// Store a profile password in the system keyring.
pub fn store_keyring_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })?;
    entry
        .set_password(password)
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

#[derive(Debug, Deserialize)]
struct Dotfile {
    #[serde(default)]
    nttcis: Option<DotfileSection>,
}

#[derive(Debug, Deserialize)]
struct DotfileSection {
    #[serde(rename = "NTTCIS_USER")]
    user: Option<String>,
    #[serde(rename = "NTTCIS_PASSWORD")]
    password: Option<String>,
}

/// Read the `[nttcis]` credentials from a dotfile.
///
/// A missing file, a missing section or a missing key all yield `None`.
/// Files written as bare `KEY=value` lines (no quoting) are accepted too.
pub fn read_dotfile(path: &Path) -> Result<Option<Credentials>, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let (user, password) = match toml::from_str::<Dotfile>(&raw) {
        Ok(parsed) => parsed
            .nttcis
            .map(|s| (s.user, s.password))
            .unwrap_or_default(),
        Err(_) => unquoted_section(&raw),
    };

    Ok(match (user, password) {
        (Some(user_id), Some(password)) if !user_id.is_empty() => Some(Credentials {
            user_id,
            password: SecretString::from(password),
        }),
        _ => None,
    })
}

fn unquoted_section(raw: &str) -> (Option<String>, Option<String>) {
    let mut in_section = false;
    let mut user = None;
    let mut password = None;
    for line in raw.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_section = name.trim() == DOTFILE_SECTION;
            continue;
        }
        if !in_section {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().to_owned();
        match key.trim() {
            USER_ENV => user = Some(value),
            PASSWORD_ENV => password = Some(value),
            _ => {}
        }
    }
    (user, password)
}

// ── Session config ──────────────────────────────────────────────────

/// Parse the `duplicate_names` setting.
pub fn parse_name_policy(raw: &str) -> Result<DuplicateNamePolicy, ConfigError> {
    match raw {
        "first-match" | "first" => Ok(DuplicateNamePolicy::FirstMatch),
        "reject" => Ok(DuplicateNamePolicy::Reject),
        other => Err(ConfigError::Validation {
            field: "duplicate_names".into(),
            reason: format!("expected 'first-match' or 'reject', got '{other}'"),
        }),
    }
}

/// Build a `SessionConfig` from a profile (or none) and global defaults.
pub fn profile_to_session_config(
    profile: Option<&Profile>,
    profile_name: &str,
    defaults: &Defaults,
    credentials: Credentials,
) -> Result<SessionConfig, ConfigError> {
    let region = profile
        .and_then(|p| p.region.clone())
        .unwrap_or_else(|| defaults.region.clone());
    if Region::find(&region).is_none() {
        return Err(ConfigError::Validation {
            field: "region".into(),
            reason: format!("unknown region '{region}' in profile '{profile_name}'"),
        });
    }

    let base_url = profile
        .and_then(|p| p.base_url.as_deref())
        .map(|raw| {
            raw.parse::<url::Url>().map_err(|_| ConfigError::Validation {
                field: "base_url".into(),
                reason: format!("invalid URL: {raw}"),
            })
        })
        .transpose()?;

    let tls = if profile.and_then(|p| p.insecure).unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ca_path) = profile.and_then(|p| p.ca_cert.clone()) {
        TlsVerification::CustomCa(ca_path)
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = profile.and_then(|p| p.timeout).unwrap_or(defaults.timeout);

    let mut config = SessionConfig::new(region, credentials.user_id, credentials.password);
    config.base_url = base_url;
    config.tls = tls;
    config.timeout = Duration::from_secs(timeout);
    config.name_policy = parse_name_policy(&defaults.duplicate_names)?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn no_keyring(_: &str) -> Option<String> {
        None
    }

    fn dotfile(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn profile() -> Profile {
        Profile {
            user_id: Some("profile-user".into()),
            password: Some("plain".into()),
            password_env: Some("CC_TEST_PASSWORD".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn dotfile_reads_toml_section() {
        let file = dotfile("[nttcis]\nNTTCIS_USER = \"alice\"\nNTTCIS_PASSWORD = \"s3cret\"\n");
        let creds = read_dotfile(file.path()).unwrap().unwrap();
        assert_eq!(creds.user_id, "alice");
        assert_eq!(creds.password.expose_secret(), "s3cret");
    }

    #[test]
    fn dotfile_reads_unquoted_values() {
        let file = dotfile("[other]\nNTTCIS_USER=bob\n\n[nttcis]\nNTTCIS_USER=alice\nNTTCIS_PASSWORD=p@ss=word\n");
        let creds = read_dotfile(file.path()).unwrap().unwrap();
        assert_eq!(creds.user_id, "alice");
        assert_eq!(creds.password.expose_secret(), "p@ss=word");
    }

    #[test]
    fn dotfile_without_section_or_file_is_none() {
        let file = dotfile("[elsewhere]\nkey = \"v\"\n");
        assert!(read_dotfile(file.path()).unwrap().is_none());

        let dir = tempfile::tempdir().unwrap();
        assert!(read_dotfile(&dir.path().join("missing")).unwrap().is_none());
    }

    #[test]
    fn environment_wins_over_everything() {
        let env = |name: &str| match name {
            USER_ENV => Some("env-user".into()),
            PASSWORD_ENV | "CC_TEST_PASSWORD" => Some("env-pass".into()),
            _ => None,
        };
        let creds =
            resolve_credentials_with(Some(&profile()), "default", env, no_keyring, None).unwrap();
        assert_eq!(creds.user_id, "env-user");
    }

    #[test]
    fn password_env_uses_profile_user() {
        let env = |name: &str| (name == "CC_TEST_PASSWORD").then(|| "from-var".to_owned());
        let creds =
            resolve_credentials_with(Some(&profile()), "default", env, no_keyring, None).unwrap();
        assert_eq!(creds.user_id, "profile-user");
        assert_eq!(creds.password.expose_secret(), "from-var");
    }

    #[test]
    fn keyring_then_dotfile_then_plaintext() {
        let keyring = |name: &str| (name == "work").then(|| "from-keyring".to_owned());
        let creds =
            resolve_credentials_with(Some(&profile()), "work", no_env, keyring, None).unwrap();
        assert_eq!(creds.password.expose_secret(), "from-keyring");

        let file = dotfile("[nttcis]\nNTTCIS_USER = \"dot\"\nNTTCIS_PASSWORD = \"dot-pass\"\n");
        let creds = resolve_credentials_with(
            Some(&profile()),
            "default",
            no_env,
            no_keyring,
            Some(file.path()),
        )
        .unwrap();
        assert_eq!(creds.user_id, "dot");

        let creds =
            resolve_credentials_with(Some(&profile()), "default", no_env, no_keyring, None)
                .unwrap();
        assert_eq!(creds.password.expose_secret(), "plain");
    }

    #[test]
    fn nothing_configured_is_no_credentials() {
        let err = resolve_credentials_with(None, "ghost", no_env, no_keyring, None).unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { profile } if profile == "ghost"));
    }

    #[test]
    fn config_file_round_trips_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "eu".into(),
            Profile {
                region: Some("eu".into()),
                user_id: Some("alice".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.defaults.wait_time, 600);
        assert_eq!(loaded.profiles["eu"].region.as_deref(), Some("eu"));
    }

    #[test]
    fn session_config_from_profile() {
        let profile = Profile {
            region: Some("is-eu".into()),
            insecure: Some(true),
            timeout: Some(15),
            ..Profile::default()
        };
        let creds = Credentials {
            user_id: "alice".into(),
            password: SecretString::from("pw".to_owned()),
        };
        let cfg =
            profile_to_session_config(Some(&profile), "default", &Defaults::default(), creds)
                .unwrap();
        assert_eq!(cfg.region, "is-eu");
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(15));
        assert_eq!(cfg.name_policy, DuplicateNamePolicy::FirstMatch);
    }

    #[test]
    fn unknown_region_is_rejected() {
        let profile = Profile {
            region: Some("mars".into()),
            ..Profile::default()
        };
        let creds = Credentials {
            user_id: "alice".into(),
            password: SecretString::from("pw".to_owned()),
        };
        let err =
            profile_to_session_config(Some(&profile), "default", &Defaults::default(), creds)
                .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { field, .. } if field == "region"));
    }
}
