use std::env;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use tracing::{debug, warn};

use crate::domain::query::{CURRENT_USER, DEFAULT_STATUS};
use crate::error::{AppError, AppResult};

/// Looked up next to the executable before the command-line path.
pub const DEFAULT_CONFIG_FILE: &str = "branch-sweep.ini";
pub const DEFAULT_WEEKS: u32 = 12;

const USAGE: &str = "no configuration given; usage: branch-sweep <config.ini> \
     (or place branch-sweep.ini next to the executable)";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub token: String,
    pub host: String,
    pub project: String,
    pub statuses: Vec<String>,
    pub users: Vec<String>,
    pub weeks: u32,
    pub git_folder: Option<PathBuf>,
    pub strict_match: bool,
}

impl AppConfig {
    pub fn load(path: &Path) -> AppResult<Self> {
        debug!(path = %path.display(), "loading configuration");
        let ini = Ini::load_from_file_opt(path, ini_options()).map_err(|err| {
            AppError::Configuration(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_ini(&ini)
    }

    pub fn from_ini(ini: &Ini) -> AppResult<Self> {
        let token = required(ini, "token")?;
        let project = required(ini, "project")?;
        let host = required(ini, "host")?.trim_end_matches('/').to_string();

        let mut statuses = list(ini, "statuses");
        if statuses.is_empty() {
            statuses.push(DEFAULT_STATUS.to_string());
        }
        let mut users = list(ini, "users");
        if users.is_empty() {
            users.push(CURRENT_USER.to_string());
        }

        let weeks = match value(ini, "weeks") {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                AppError::Configuration(format!(
                    "`weeks` must be a non-negative integer, got '{raw}'"
                ))
            })?,
            None => DEFAULT_WEEKS,
        };

        let strict_match = match value(ini, "strict_match") {
            Some(raw) => parse_flag(raw).ok_or_else(|| {
                AppError::Configuration(format!("`strict_match` must be a boolean, got '{raw}'"))
            })?,
            None => false,
        };

        Ok(Self {
            token,
            host,
            project,
            statuses,
            users,
            weeks,
            git_folder: value(ini, "git_folder").map(PathBuf::from),
            strict_match,
        })
    }
}

/// `branch-sweep.ini` in the executable's directory.
pub fn colocated_config_path() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    exe.parent().map(|dir| dir.join(DEFAULT_CONFIG_FILE))
}

/// Picks the configuration file: an existing colocated file wins, otherwise the
/// explicit path is required and must exist.
pub fn locate_config_file(
    explicit: Option<&Path>,
    colocated: Option<&Path>,
) -> AppResult<PathBuf> {
    if let Some(default) = colocated.filter(|path| path.is_file()) {
        if let Some(ignored) = explicit {
            warn!(
                ignored = %ignored.display(),
                using = %default.display(),
                "colocated configuration takes precedence"
            );
        }
        return Ok(default.to_path_buf());
    }

    let path = explicit.ok_or_else(|| AppError::Configuration(USAGE.to_string()))?;
    if !path.is_file() {
        return Err(AppError::Configuration(format!(
            "no config file found at {}",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// Backslashes are kept literally so Windows paths and tokens survive.
pub fn ini_options() -> ParseOption {
    ParseOption {
        enabled_escape: false,
        ..Default::default()
    }
}

// Keys are read from every section, last occurrence wins.
fn values<'a>(ini: &'a Ini, key: &str) -> Vec<&'a str> {
    ini.iter()
        .flat_map(|(_, properties)| properties.get_all(key))
        .map(strip_inline_comment)
        .collect()
}

/// Drops a trailing `; comment`. A `;` only starts a comment after whitespace.
fn strip_inline_comment(raw: &str) -> &str {
    let end = raw
        .char_indices()
        .find(|&(at, ch)| ch == ';' && (at == 0 || raw[..at].ends_with(char::is_whitespace)))
        .map_or(raw.len(), |(at, _)| at);
    raw[..end].trim()
}

fn value<'a>(ini: &'a Ini, key: &str) -> Option<&'a str> {
    values(ini, key)
        .into_iter()
        .rev()
        .find(|value| !value.is_empty())
}

fn required(ini: &Ini, key: &str) -> AppResult<String> {
    value(ini, key)
        .map(str::to_string)
        .ok_or_else(|| AppError::Configuration(format!("missing required key `{key}`")))
}

/// Accepts `key[] = a` lines as well as `key = a, b`.
fn list(ini: &Ini, key: &str) -> Vec<String> {
    let array_key = format!("{key}[]");
    values(ini, &array_key)
        .into_iter()
        .chain(values(ini, key).into_iter().flat_map(|raw| raw.split(',')))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
