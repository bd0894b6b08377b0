use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use {
    anyhow::Context,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::SkilldashConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "skilldash.toml",
    "skilldash.yaml",
    "skilldash.yml",
    "skilldash.json",
];

static CONFIG_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);
static DATA_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Use `dir` instead of the platform config directory.
pub fn set_config_dir(dir: PathBuf) {
    if let Ok(mut guard) = CONFIG_DIR_OVERRIDE.lock() {
        *guard = Some(dir);
    }
}

/// Use `dir` instead of the platform data directory.
pub fn set_data_dir(dir: PathBuf) {
    if let Ok(mut guard) = DATA_DIR_OVERRIDE.lock() {
        *guard = Some(dir);
    }
}

fn override_of(slot: &Mutex<Option<PathBuf>>) -> Option<PathBuf> {
    slot.lock().ok().and_then(|guard| guard.clone())
}

/// Returns the user-global config directory (`~/.config/skilldash/`).
pub fn config_dir() -> Option<PathBuf> {
    override_of(&CONFIG_DIR_OVERRIDE).or_else(|| {
        directories::ProjectDirs::from("", "", "skilldash").map(|d| d.config_dir().to_path_buf())
    })
}

/// Returns the data directory used for state the tool writes itself.
///
/// Falls back to `./.skilldash` when no home directory can be determined.
pub fn data_dir() -> PathBuf {
    override_of(&DATA_DIR_OVERRIDE)
        .or_else(|| {
            directories::ProjectDirs::from("", "", "skilldash")
                .map(|d| d.data_dir().to_path_buf())
        })
        .unwrap_or_else(|| PathBuf::from(".skilldash"))
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<SkilldashConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Load config from `path` for rewriting it.
///
/// Unlike [`load_config`], `${VAR}` placeholders are kept as written so a
/// later save does not bake in their values, and a missing file yields the
/// defaults. Any other read or parse failure is returned: saving over a file
/// that could not be understood would discard the user's settings.
pub fn load_config_for_edit(path: &Path) -> anyhow::Result<SkilldashConfig> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file yet, editing defaults");
            return Ok(SkilldashConfig::default());
        },
        Err(e) => anyhow::bail!("failed to read {}: {e}", path.display()),
    };
    parse_config(&raw, path).with_context(|| format!("failed to parse {}", path.display()))
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./skilldash.{toml,yaml,yml,json}` (project-local)
/// 2. `<config_dir>/skilldash.{toml,yaml,yml,json}` (user-global)
///
/// Returns `SkilldashConfig::default()` if no config file is found or the
/// file cannot be read; a broken settings file never stops a scan.
pub fn discover_and_load() -> SkilldashConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    SkilldashConfig::default()
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES.iter().map(PathBuf::from);
    let global = config_dir()
        .into_iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)));
    local.chain(global).find(|p| p.exists())
}

/// Returns the path of an existing config file, or the default TOML path.
pub fn find_or_default_config_path() -> PathBuf {
    if let Some(path) = find_config_file() {
        return path;
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skilldash.toml")
}

/// Write `config` to `path` in the format implied by its extension.
///
/// Written through a temp file + rename so a crash never leaves a torn file.
pub fn save_config_to(config: &SkilldashConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    let data = match ext {
        "toml" => {
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("serialize config: {e}"))?
        },
        "yaml" | "yml" => serde_yaml::to_string(config)?,
        "json" => serde_json::to_string_pretty(config)?,
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    };
    let tmp = path.with_extension(format!("{ext}.tmp"));
    std::fs::write(&tmp, data)?;
    std::fs::rename(&tmp, path)?;
    debug!(path = %path.display(), "saved config");
    Ok(())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<SkilldashConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
