use dirs::home_dir;
use std::path::PathBuf;

/// Environment variable overriding the pour home directory.
pub const HOME_ENV: &str = "POUR_HOME";

/// Returns the primary state directory, or None if the user's home cannot be resolved.
///
/// `POUR_HOME` wins; otherwise `~/.pour`.
pub fn try_pour_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var(HOME_ENV) {
        if !val.is_empty() {
            return Some(PathBuf::from(val));
        }
    }
    home_dir().map(|h| h.join(".pour"))
}

/// Extract the filename from a URL.
pub fn filename_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.split('/').next_back().unwrap_or("")
}
