use std::path::Path;

use {anyhow::Result, clap::Subcommand};

#[derive(Subcommand)]
pub enum RootsAction {
    /// Show the configured project roots.
    List,
    /// Search DIR (and projects nested in it) for project skills.
    Add { dir: String },
    /// Stop searching DIR.
    Remove { dir: String },
}

pub fn handle_roots(action: RootsAction) -> Result<()> {
    if let RootsAction::List = action {
        let config = skilldash_config::discover_and_load();
        if config.scan.roots.is_empty() {
            println!("No project roots configured.");
        }
        for root in &config.scan.roots {
            println!("{root}");
        }
        return Ok(());
    }
    edit_roots(action, &skilldash_config::find_or_default_config_path())
}

/// Apply an add or remove to the config file at `path`.
///
/// The file is read without env substitution and a file that fails to parse
/// aborts the edit, so nothing the user wrote is lost on save.
fn edit_roots(action: RootsAction, path: &Path) -> Result<()> {
    let mut config = skilldash_config::load_config_for_edit(path)?;
    match action {
        RootsAction::List => {},
        RootsAction::Add { dir } => {
            let dir = normalize(&dir)?;
            if config.scan.add_root(&dir) {
                skilldash_config::save_config_to(&config, path)?;
                println!("Added {dir} ({})", path.display());
            } else {
                println!("{dir} is already configured.");
            }
        },
        RootsAction::Remove { dir } => {
            if config.scan.remove_root(&dir) || config.scan.remove_root(&normalize(&dir)?) {
                skilldash_config::save_config_to(&config, path)?;
                println!("Removed {dir} ({})", path.display());
            } else {
                println!("{dir} is not configured.");
            }
        },
    }
    Ok(())
}

/// Make relative paths absolute; `~` and `${VAR}` forms are stored as typed.
fn normalize(dir: &str) -> Result<String> {
    if dir.starts_with('~') || dir.starts_with("${") || Path::new(dir).is_absolute() {
        return Ok(dir.to_string());
    }
    let abs = std::env::current_dir()?.join(dir);
    Ok(abs.to_string_lossy().into_owned())
}
