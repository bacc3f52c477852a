use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::error::{MinemError, MinemResult};

const JAVA_BINARY: &str = "java";

/// Resolve the Java binary used to run the server.
///
/// An explicit path (from `javaPath`) wins and must exist; otherwise `java`
/// is looked up on PATH.
pub fn resolve_java_binary(explicit: Option<&Path>) -> MinemResult<PathBuf> {
    if let Some(path) = explicit {
        if is_usable_java_binary(path) {
            debug!("Using configured Java binary {:?}", path);
            return Ok(path.to_path_buf());
        }
        return Err(MinemError::RuntimeNotFound(format!(
            "configured javaPath {:?} is not a file",
            path
        )));
    }

    which::which(JAVA_BINARY)
        .map(|found| {
            debug!("Found Java on PATH at {:?}", found);
            found
        })
        .map_err(|e| {
            MinemError::RuntimeNotFound(format!(
                "'{}' is not on PATH ({e}); install a Java runtime or set javaPath in minem.json",
                JAVA_BINARY
            ))
        })
}

pub fn is_usable_java_binary(path: &Path) -> bool {
    path.is_file()
}
