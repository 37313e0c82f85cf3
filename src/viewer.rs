use crate::canvas::Canvas;
use crate::error::RenderError;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Default program that opens a file in the desktop's image viewer
fn default_viewer() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// Where a preview image goes: one file per process in the temp dir
pub fn preview_path(seed: u64) -> PathBuf {
    std::env::temp_dir().join(format!("treegen-{}-{seed}.png", std::process::id()))
}

/// Save `canvas` to a temporary PNG and hand it to the viewer. The viewer is
/// not waited for; the file is left behind for it to read.
pub fn show(canvas: &Canvas, seed: u64, viewer: Option<&str>) -> Result<PathBuf, RenderError> {
    let path = preview_path(seed);
    canvas.save(&path)?;

    let program = viewer.unwrap_or(default_viewer());
    debug!(program, path = %path.display(), "launching viewer");
    Command::new(program)
        .arg(&path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    info!(path = %path.display(), "opened preview");
    Ok(path)
}
