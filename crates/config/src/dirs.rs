use std::path::PathBuf;

/// Returns `~/.config/convene` on all platforms.
pub fn config_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".config").join("convene")
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("convene.toml")
}

pub fn default_session_path() -> PathBuf {
    config_dir().join("session.json")
}
