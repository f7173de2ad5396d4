//! Persistence of the winning keypair.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::crypto::Keypair;

/// Errors that can occur while writing key files.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Refusing to overwrite existing file {0}")]
    Exists(PathBuf),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Paths of the files written for one keypair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedKeys {
    /// File holding the private key
    pub private_key: PathBuf,
    /// File holding the public key
    pub public_key: PathBuf,
}

/// Returns the file stem used for a search string.
///
/// `/` is a base64 character but not a valid file name character, so it is
/// replaced with `_`.
pub fn file_stem(name: &str) -> String {
    name.replace('/', "_")
}

/// Writes `<name>` (private key) and `<name>.pub` (public key) into `dir`.
///
/// Existing files are never overwritten. Each file holds the encoded key and
/// a trailing newline.
pub fn save_keypair(keypair: &Keypair, dir: &Path, name: &str) -> Result<SavedKeys, OutputError> {
    let stem = file_stem(name);
    let private_path = dir.join(&stem);
    let public_path = dir.join(format!("{}.pub", stem));

    for path in [&private_path, &public_path] {
        if path.exists() {
            return Err(OutputError::Exists(path.clone()));
        }
    }

    write_new(&private_path, keypair.private_key(), 0o600)?;
    write_new(&public_path, keypair.public_key(), 0o644)?;

    info!(
        "Wrote {} and {}",
        private_path.display(),
        public_path.display()
    );

    Ok(SavedKeys {
        private_key: private_path,
        public_key: public_path,
    })
}

fn write_new(path: &Path, contents: &str, mode: u32) -> Result<(), OutputError> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let io_err = |source: io::Error| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            OutputError::Exists(path.to_path_buf())
        } else {
            OutputError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    };

    let mut file = options.open(path).map_err(io_err)?;
    writeln!(file, "{}", contents).map_err(io_err)?;
    file.sync_all().map_err(io_err)
}
