use serde::{Deserialize, Serialize};
use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::OnceLock,
};
use tracing::warn;

pub mod config;
pub mod http;
pub mod render;
pub mod spotify;
pub mod tab;

fn save_dir<'a>() -> io::Result<&'a Path> {
    static DIR: OnceLock<PathBuf> = OnceLock::new();

    if let Some(dir) = DIR.get() {
        return Ok(dir.as_path());
    }

    let config_dir = if let Ok(config) = env::var("XDG_CONFIG_HOME") {
        Path::new(&config).to_path_buf()
    } else if let Ok(home) = env::var("HOME") {
        Path::new(&home).join(".config")
    } else if let Ok(userprofile) = env::var("USERPROFILE") {
        Path::new(&userprofile).join(".config")
    } else {
        warn!("could not find home directory, using cwd");
        Path::new("./").to_path_buf()
    };

    let config_dir = config_dir.join("sptfybrowse");

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(DIR.get_or_init(|| config_dir).as_path())
}

/// # Errors
///
/// - See [`fs::write`].
/// - [`serde_yaml`] serialization failed.
pub fn save<T: Serialize>(obj: &T, name: &str) -> anyhow::Result<()> {
    fs::write(save_dir()?.join(name), serde_yaml::to_string(obj)?)?;
    Ok(())
}

/// # Errors
///
/// - See [`fs::read_to_string`].
/// - [`serde_yaml`] deserialization failed.
pub fn load<T: for<'a> Deserialize<'a>>(name: &str) -> anyhow::Result<T> {
    let file = fs::read_to_string(save_dir()?.join(name))?;
    Ok(serde_yaml::from_str(&file)?)
}
