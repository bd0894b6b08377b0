//! Configuration loading, env substitution, and the persisted settings store.
//!
//! Config files: `skilldash.toml`, `skilldash.yaml`, or `skilldash.json`
//! Searched in `./` then `~/.config/skilldash/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{
        config_dir, data_dir, discover_and_load, find_or_default_config_path, load_config,
        load_config_for_edit, save_config_to, set_config_dir, set_data_dir,
    },
    schema::{ScanConfig, SkilldashConfig, ToolConfig, WatchConfig},
};
