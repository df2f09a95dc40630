pub mod timer;

use std::{fs::{self, OpenOptions}, io::Write, path::Path};

use tracing::warn;

use crate::error::{HuffmanError, IoOp, Result};

/// Writes `bytes` to `path`, refusing an existing file unless `overwrite`
/// is set. A failed write removes whatever was written.
pub fn write_output(path: &Path, bytes: &[u8], overwrite: bool) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options.open(path).map_err(|e| HuffmanError::io(IoOp::Write, path, e))?;

    if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
        drop(file);
        discard(path);
        return Err(HuffmanError::io(IoOp::Write, path, e));
    }

    Ok(())
}

/// Best-effort removal of an output that must not outlive a failed pass.
pub fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "could not remove partial output");
    }
}
