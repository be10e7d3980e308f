//! File encryption/decryption operations
//!
//! This module provides high-level file operations on top of the container
//! codec: reading the input, embedding/recovering the original filename,
//! and writing outputs with restrictive permissions.

use crate::container;
use crate::error::{ErrorCategory, ErrorKind, Result, SealboxError};
use crate::passphrase::PassphraseReader;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Encrypt a file with a passphrase
///
/// Reads plaintext from `input_path`, encrypts it using a passphrase from
/// `passphrase_reader`, and writes the container to `output_path`. The final
/// component of `input_path` is embedded in the container as the original
/// filename.
///
/// The output file is created with mode 0o600 (read/write for owner only) on Unix systems.
pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<()> {
    let filename = input_filename(input_path)?;
    let plaintext = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let passphrase = passphrase_reader.read_passphrase()?;
    let container = container::encrypt(&plaintext, filename, &passphrase)?;
    write_file_secure(output_path, &container)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;

    Ok(())
}

/// Decrypt a container file with a passphrase
///
/// Reads a container from `input_path`, decrypts it using a passphrase from
/// `passphrase_reader`, and writes the plaintext. When `output_path` is
/// given the plaintext goes there; otherwise the filename embedded in the
/// container is used, placed next to the input. Only the final path
/// component of the embedded name is ever used.
///
/// Returns the path the plaintext was written to.
///
/// The output file is created with mode 0o600 (read/write for owner only) on Unix systems.
pub fn decrypt_file(
    input_path: &Path,
    output_path: Option<&Path>,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<PathBuf> {
    let container_bytes = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let passphrase = passphrase_reader.read_passphrase()?;
    let recovered = container::decrypt(&container_bytes, &passphrase)?;

    let target = match output_path {
        Some(path) => path.to_path_buf(),
        None => {
            let name = Path::new(&recovered.filename).file_name().ok_or_else(|| {
                SealboxError::with_kind(
                    ErrorCategory::User,
                    ErrorKind::MalformedContainer,
                    "container does not embed a usable filename; specify an output path",
                )
            })?;
            input_path.parent().unwrap_or_else(|| Path::new("")).join(name)
        }
    };

    write_file_secure(&target, &recovered.plaintext)
        .map_err(|e| e.with_context(format!("failed to write to {}", target.display())))?;
    Ok(target)
}

/// The final component of the input path, as UTF-8, for embedding.
fn input_filename(input_path: &Path) -> Result<&str> {
    let name = input_path.file_name().ok_or_else(|| {
        SealboxError::new(
            ErrorCategory::User,
            format!(
                "input path {} has no filename component",
                input_path.display()
            ),
        )
    })?;
    name.to_str().ok_or_else(|| {
        SealboxError::new(
            ErrorCategory::User,
            format!(
                "input filename {} is not valid UTF-8 and cannot be embedded",
                input_path.display()
            ),
        )
    })
}

/// Write file with secure permissions (0o600 on Unix)
fn write_file_secure(path: &Path, contents: &[u8]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .map_err(|e| {
                SealboxError::with_kind_and_source(
                    ErrorCategory::User,
                    ErrorKind::Io,
                    format!("failed to open {}", path.display()),
                    e,
                )
            })?;

        file.write_all(contents).map_err(|e| {
            SealboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents).map_err(|e| {
            SealboxError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }
}

fn read_error(path: &Path, err: io::Error) -> SealboxError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    SealboxError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
