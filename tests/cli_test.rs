//! Command tests run through the library entry points

use nerscrub::cli::commands::clean::CleanArgs;
use nerscrub::cli::commands::detect::DetectArgs;
use nerscrub::cli::commands::init::InitArgs;
use nerscrub::cli::commands::validate::ValidateArgs;
use nerscrub::cli::{EXIT_CONFIG, EXIT_DETECTION, EXIT_OK};
use nerscrub::config::BackendKind;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// Config selecting a stanza-protocol command that always reports "Jane"
#[cfg(unix)]
const FAKE_STANZA_CONFIG: &str = r#"
[detector]
backend = "stanza"

[stanza]
command = ["sh", "-c", '''cat > /dev/null; echo '[{"text":"Jane","type":"PERSON","start_char":0,"end_char":4}]' ''']
timeout_seconds = 10
"#;

#[cfg(unix)]
const FAILING_STANZA_CONFIG: &str = r#"
[detector]
backend = "stanza"

[stanza]
command = ["sh", "-c", "echo 'model missing' >&2; exit 1"]
"#;

fn setup(config: &str) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("nerscrub.toml");
    std::fs::write(&config_path, config).unwrap();
    let input = dir.path().join("note.txt");
    std::fs::write(&input, "Jane went home").unwrap();
    (dir, config_path, input)
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn detect_args(inputs: Vec<String>) -> DetectArgs {
    DetectArgs {
        inputs,
        document_name: None,
        backend: None,
        expand_occurrences: false,
        pretty: false,
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_detect_single_document() {
    let (_dir, config, input) = setup(FAKE_STANZA_CONFIG);
    let args = detect_args(vec![path_str(&input).to_string()]);
    assert_eq!(args.execute(path_str(&config)).await.unwrap(), EXIT_OK);
}

#[cfg(unix)]
#[tokio::test]
async fn test_detect_batch_reports_failures() {
    let (dir, config, input) = setup(FAILING_STANZA_CONFIG);
    let other = dir.path().join("other.txt");
    std::fs::write(&other, "Acme").unwrap();

    let args = detect_args(vec![
        path_str(&input).to_string(),
        path_str(&other).to_string(),
    ]);
    assert_eq!(args.execute(path_str(&config)).await.unwrap(), EXIT_DETECTION);
}

#[cfg(unix)]
#[tokio::test]
async fn test_clean_document() {
    let (_dir, config, input) = setup(FAKE_STANZA_CONFIG);
    let args = CleanArgs {
        input: path_str(&input).to_string(),
        document_name: Some("note".to_string()),
        backend: None,
        strategy: None,
    };
    assert_eq!(args.execute(path_str(&config)).await.unwrap(), EXIT_OK);
}

#[cfg(unix)]
#[tokio::test]
async fn test_clean_failure_exit_code() {
    let (_dir, config, input) = setup(FAILING_STANZA_CONFIG);
    let args = CleanArgs {
        input: path_str(&input).to_string(),
        document_name: None,
        backend: None,
        strategy: None,
    };
    assert_eq!(args.execute(path_str(&config)).await.unwrap(), EXIT_DETECTION);
}

#[tokio::test]
async fn test_invalid_config_exit_code() {
    let (_dir, config, input) = setup("[detector]\nlocale = \"\"\n");
    let args = detect_args(vec![path_str(&input).to_string()]);
    assert_eq!(args.execute(path_str(&config)).await.unwrap(), EXIT_CONFIG);
}

#[tokio::test]
async fn test_unsupported_locale_exit_code() {
    let (_dir, config, input) = setup("[detector]\nbackend = \"stanza\"\nlocale = \"fr_FR\"\n");
    let args = detect_args(vec![path_str(&input).to_string()]);
    assert_eq!(args.execute(path_str(&config)).await.unwrap(), EXIT_CONFIG);
}

#[tokio::test]
async fn test_missing_input_is_an_error() {
    let (dir, config, _input) = setup("[detector]\nbackend = \"stanza\"\n");
    let missing = dir.path().join("missing.txt");
    let args = detect_args(vec![path_str(&missing).to_string()]);
    assert!(args.execute(path_str(&config)).await.is_err());
}

#[cfg(unix)]
#[tokio::test]
async fn test_validate_with_backend_check() {
    let (_dir, config, _input) = setup(FAKE_STANZA_CONFIG);
    let args = ValidateArgs {
        check_backend: true,
    };
    assert_eq!(args.execute(path_str(&config)).await.unwrap(), EXIT_OK);
}

#[tokio::test]
async fn test_validate_reports_missing_stanford_install() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("nerscrub.toml");
    std::fs::write(
        &config,
        format!(
            "[detector]\nbackend = \"stanford\"\n\n[stanford]\ninstall_dir = \"{}\"\n",
            dir.path().join("stanford").display()
        ),
    )
    .unwrap();

    let args = ValidateArgs {
        check_backend: true,
    };
    assert_eq!(args.execute(path_str(&config)).await.unwrap(), EXIT_DETECTION);
}

#[tokio::test]
async fn test_init_then_validate() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("nerscrub.toml");

    let init = InitArgs {
        output: path_str(&config).to_string(),
        force: false,
    };
    assert_eq!(init.execute().await.unwrap(), EXIT_OK);

    let validate = ValidateArgs {
        check_backend: false,
    };
    assert_eq!(validate.execute(path_str(&config)).await.unwrap(), EXIT_OK);
}

#[test]
fn test_backend_override_parses() {
    assert_eq!("stanford".parse::<BackendKind>(), Ok(BackendKind::Stanford));
    assert!("spacy".parse::<BackendKind>().is_err());
}
