use std::path::PathBuf;

pub fn default_save_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_history_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("ytcap"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("download_history.json")
}
