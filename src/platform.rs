use std::path::PathBuf;
use std::process::Command;

/// Name of the az executable. On Windows az ships as a batch wrapper.
pub fn az_program() -> &'static str {
    if cfg!(windows) {
        "az.cmd"
    } else {
        "az"
    }
}

pub fn az_available() -> bool {
    Command::new(az_program())
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Private az profile directory used for non-interactive logins, so the
/// operator's own `az login` session is left untouched.
pub fn az_profile_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "snapsweep")
        .map(|dirs| dirs.data_dir().join("azure"))
}
