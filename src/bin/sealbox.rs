//! Sealbox CLI - Passphrase-based file encryption
//!
//! Command-line interface for encrypting and decrypting files using
//! AES-256-GCM with PBKDF2 key derivation. Containers embed the original
//! filename, so decryption can restore it when no output path is given.

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process;

use sealbox::file_ops;
use sealbox::passphrase::{PassphraseReader, ReaderPassphraseReader, TerminalPassphraseReader};

#[derive(Parser)]
#[command(name = "sealbox")]
#[command(version)]
#[command(about = "Passphrase-based file encryption.", long_about = None)]
struct Cli {
    /// Read passphrase from stdin instead of from terminal
    #[arg(long, global = true)]
    passphrase_stdin: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file
    #[command(alias = "e")]
    Encrypt {
        /// Path to the file whose contents is to be encrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the file to write the container to [default: INPUT.sealed]
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Decrypt a file
    #[command(alias = "d")]
    Decrypt {
        /// Path to the container to decrypt
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to write the plaintext to [default: the embedded filename, next to INPUT]
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encrypt { input, output } => {
            let mut reader = get_passphrase_reader(cli.passphrase_stdin);
            let output = output.unwrap_or_else(|| default_container_path(&input));
            file_ops::encrypt_file(&input, &output, &mut *reader)
        }
        Commands::Decrypt { input, output } => {
            let mut reader = get_passphrase_reader(cli.passphrase_stdin);
            file_ops::decrypt_file(&input, output.as_deref(), &mut *reader).map(|written| {
                eprintln!("Decrypted to {}", written.display());
            })
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// INPUT with ".sealed" appended to the full filename (not replacing the
/// existing extension).
fn default_container_path(input: &Path) -> PathBuf {
    let mut path = OsString::from(input.as_os_str());
    path.push(".sealed");
    PathBuf::from(path)
}

fn get_passphrase_reader(use_stdin: bool) -> Box<dyn PassphraseReader> {
    if use_stdin {
        Box::new(ReaderPassphraseReader::new(Box::new(std::io::stdin())))
    } else {
        Box::new(TerminalPassphraseReader)
    }
}
