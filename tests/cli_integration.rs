//! CLI integration tests
//!
//! Tests the command-line interface end-to-end.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Get path to the sealbox binary
fn sealbox_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps/
    path.push("sealbox");
    path
}

/// Run sealbox with passphrase from stdin
fn run_sealbox_with_passphrase(
    args: &[&str],
    passphrase: &str,
) -> Result<std::process::Output, std::io::Error> {
    let mut child = Command::new(sealbox_bin())
        .arg("--passphrase-stdin")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    {
        let stdin = child.stdin.as_mut().expect("failed to open stdin");
        // Ignore BrokenPipe errors - the command may exit before reading stdin
        // if it encounters an error (e.g., file not found)
        let _ = stdin.write_all(passphrase.as_bytes());
    }

    child.wait_with_output()
}

#[test]
fn test_encrypt_decrypt_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext_path = temp_dir.path().join("hello.txt");
    let encrypted_path = temp_dir.path().join("hello.txt.sealed");
    let decrypted_path = temp_dir.path().join("hello-decrypted.txt");

    fs::write(&plaintext_path, "Hello, sealbox!\n").unwrap();

    let result = run_sealbox_with_passphrase(
        &[
            "encrypt",
            "-i",
            plaintext_path.to_str().unwrap(),
            "-o",
            encrypted_path.to_str().unwrap(),
        ],
        "test passphrase",
    )
    .unwrap();

    assert!(
        result.status.success(),
        "encrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let result = run_sealbox_with_passphrase(
        &[
            "decrypt",
            "-i",
            encrypted_path.to_str().unwrap(),
            "-o",
            decrypted_path.to_str().unwrap(),
        ],
        "test passphrase",
    )
    .unwrap();

    assert!(
        result.status.success(),
        "decrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let original = fs::read_to_string(&plaintext_path).unwrap();
    let decrypted = fs::read_to_string(&decrypted_path).unwrap();
    assert_eq!(original, decrypted);
}

#[test]
fn test_encrypt_default_output_path() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext_path = temp_dir.path().join("report.pdf");
    let expected_output = temp_dir.path().join("report.pdf.sealed");

    fs::write(&plaintext_path, "not really a pdf").unwrap();

    let result = run_sealbox_with_passphrase(
        &["encrypt", "-i", plaintext_path.to_str().unwrap()],
        "test passphrase",
    )
    .unwrap();

    assert!(
        result.status.success(),
        "encrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert!(expected_output.exists());
}

#[test]
fn test_decrypt_restores_embedded_filename() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext_path = temp_dir.path().join("note.txt");
    let encrypted_path = temp_dir.path().join("note.txt.sealed");

    fs::write(&plaintext_path, "hello world!").unwrap();

    let result = run_sealbox_with_passphrase(
        &["encrypt", "-i", plaintext_path.to_str().unwrap()],
        "correcthorse",
    )
    .unwrap();
    assert!(result.status.success());

    // Remove the original; decrypting without -o must bring it back.
    fs::remove_file(&plaintext_path).unwrap();

    let result = run_sealbox_with_passphrase(
        &["decrypt", "-i", encrypted_path.to_str().unwrap()],
        "correcthorse",
    )
    .unwrap();

    assert!(
        result.status.success(),
        "decrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert_eq!(fs::read_to_string(&plaintext_path).unwrap(), "hello world!");
}

#[test]
fn test_decrypt_with_wrong_passphrase_fails() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext_path = temp_dir.path().join("secret.txt");
    let encrypted_path = temp_dir.path().join("secret.txt.sealed");
    let decrypted_path = temp_dir.path().join("decrypted.txt");

    fs::write(&plaintext_path, "classified").unwrap();

    let result = run_sealbox_with_passphrase(
        &["encrypt", "-i", plaintext_path.to_str().unwrap()],
        "correcthorse",
    )
    .unwrap();
    assert!(result.status.success());

    let result = run_sealbox_with_passphrase(
        &[
            "decrypt",
            "-i",
            encrypted_path.to_str().unwrap(),
            "-o",
            decrypted_path.to_str().unwrap(),
        ],
        "wrongpassword",
    )
    .unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("wrong passphrase"),
        "Expected generic decryption error, got: {}",
        stderr
    );
    assert!(!decrypted_path.exists());
}

#[test]
fn test_encrypt_with_weak_passphrase_fails() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext_path = temp_dir.path().join("plain.txt");
    let encrypted_path = temp_dir.path().join("plain.txt.sealed");

    fs::write(&plaintext_path, "data").unwrap();

    let result = run_sealbox_with_passphrase(
        &["encrypt", "-i", plaintext_path.to_str().unwrap()],
        "short",
    )
    .unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("at least 8 characters"),
        "Expected weak passphrase message, got: {}",
        stderr
    );
    assert!(!encrypted_path.exists());
}

#[test]
fn test_decrypt_nonexistent_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let nonexistent = temp_dir.path().join("nonexistent.sealed");
    let output = temp_dir.path().join("output.txt");

    let result = run_sealbox_with_passphrase(
        &[
            "decrypt",
            "-i",
            nonexistent.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ],
        "test passphrase",
    )
    .unwrap();

    assert!(!result.status.success());
    assert!(!output.exists());
}

#[test]
fn test_decrypt_garbage_input_fails() {
    let temp_dir = TempDir::new().unwrap();
    let garbage_path = temp_dir.path().join("garbage.sealed");
    let output = temp_dir.path().join("output.txt");

    fs::write(&garbage_path, [0x00u8, 0x01, 0x02]).unwrap();

    let result = run_sealbox_with_passphrase(
        &[
            "decrypt",
            "-i",
            garbage_path.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ],
        "test passphrase",
    )
    .unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("truncated"),
        "Expected malformed container message, got: {}",
        stderr
    );
    assert!(!output.exists());
}

#[test]
fn test_empty_file_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext = temp_dir.path().join("empty.txt");
    let encrypted = temp_dir.path().join("empty.txt.sealed");
    let decrypted = temp_dir.path().join("empty-decrypted.txt");

    fs::write(&plaintext, b"").unwrap();

    let result = run_sealbox_with_passphrase(
        &[
            "encrypt",
            "-i",
            plaintext.to_str().unwrap(),
            "-o",
            encrypted.to_str().unwrap(),
        ],
        "test passphrase",
    )
    .unwrap();
    assert!(result.status.success());

    let result = run_sealbox_with_passphrase(
        &[
            "decrypt",
            "-i",
            encrypted.to_str().unwrap(),
            "-o",
            decrypted.to_str().unwrap(),
        ],
        "test passphrase",
    )
    .unwrap();

    assert!(result.status.success());
    let content = fs::read(&decrypted).unwrap();
    assert_eq!(content, b"");
}

#[test]
fn test_large_file_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext = temp_dir.path().join("large.bin");
    let encrypted = temp_dir.path().join("large.bin.sealed");
    let decrypted = temp_dir.path().join("large-decrypted.bin");

    let large_content = vec![0x42u8; 1024 * 1024];
    fs::write(&plaintext, &large_content).unwrap();

    let result = run_sealbox_with_passphrase(
        &[
            "encrypt",
            "-i",
            plaintext.to_str().unwrap(),
            "-o",
            encrypted.to_str().unwrap(),
        ],
        "test passphrase",
    )
    .unwrap();
    assert!(result.status.success());

    let result = run_sealbox_with_passphrase(
        &[
            "decrypt",
            "-i",
            encrypted.to_str().unwrap(),
            "-o",
            decrypted.to_str().unwrap(),
        ],
        "test passphrase",
    )
    .unwrap();

    assert!(result.status.success());
    let decrypted_content = fs::read(&decrypted).unwrap();
    assert_eq!(decrypted_content, large_content);
}
