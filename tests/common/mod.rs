//! Shared setup for the integration tests.

use std::path::Path;
use tempfile::TempDir;

/// Copy `fixtures/site/` into a temp directory.
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Reading order of `fixtures/site/sidebar.toml`.
pub const READING_ORDER: &[&str] = &[
    "/docs/intro",
    "/docs/gameplay/overview",
    "/docs/gameplay/combat",
    "/docs/block/basics",
    "/docs/item/basics",
    "/docs/plugins",
    "/docs/plugins/getting-started",
    "/docs/plugins/events",
    "/docs/plugins/events/player-chat-event",
    "/docs/plugins/events/player-mouse-button-event",
    "/docs/plugins/events/boot-event",
    "/docs/servers/setup",
];
