//! CLI command implementations
//!
//! Each command builds its JSON payload separately from printing it so the
//! payloads can be tested directly.

use std::io::Write;
use std::path::Path;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::{json, Value};

use crate::config::GuardConfig;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Dispatch a parsed command and print its result to `out`
pub fn run_command<W: Write>(command: Command, out: &mut W) -> CliResult<()> {
    let result = match command {
        Command::Keygen => Ok(keygen()),
        Command::Render { config, marker } => render(&config, marker.as_deref()),
        Command::Verify { config, token } => verify(&config, &token),
    };

    match result {
        Ok(data) => write_response(out, data),
        Err(e) => {
            write_error(out, e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Fresh 256-bit secret from the OS RNG
pub fn keygen() -> Value {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    json!({ "secret_key": URL_SAFE_NO_PAD.encode(bytes) })
}

/// Hidden and display values for `marker`, or for a new record
pub fn render(config_path: &Path, marker: Option<&str>) -> CliResult<Value> {
    let config = GuardConfig::load(config_path)?;
    let codec = config.build_codec();

    let marker = marker
        .map(|raw| {
            codec.kind().parse_display(raw).ok_or_else(|| {
                CliError::invalid_argument(format!(
                    "'{}' is not a valid {} marker",
                    raw,
                    codec.kind()
                ))
            })
        })
        .transpose()?;

    let token = codec
        .encode(marker.as_ref())
        .map_err(|e| CliError::invalid_argument(e.to_string()))?;
    Ok(serde_json::to_value(&token)?)
}

/// Marker carried by a submitted token
pub fn verify(config_path: &Path, token: &str) -> CliResult<Value> {
    let config = GuardConfig::load(config_path)?;
    let codec = config.build_codec();

    let marker = codec
        .decode(token)
        .map_err(|e| CliError::token_rejected(format!("{} ({})", e, e.code())))?;

    Ok(json!({
        "kind": marker.kind().as_str(),
        "marker": marker.to_string(),
        "sentinel": marker.is_sentinel(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn config_file(kind: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"secret_key":"cli-test-secret-cli-test-secret-0001","marker_kind":"{}"}}"#,
            kind
        )
        .unwrap();
        file
    }

    #[test]
    fn test_keygen_is_random() {
        let a = keygen();
        let b = keygen();
        assert_ne!(a["secret_key"], b["secret_key"]);
        assert_eq!(a["secret_key"].as_str().unwrap().len(), 43);
    }

    #[test]
    fn test_render_then_verify() {
        let file = config_file("counter");
        let rendered = render(file.path(), Some("5")).unwrap();
        assert_eq!(rendered["display"], "5");

        let hidden = rendered["hidden"].as_str().unwrap();
        let verified = verify(file.path(), hidden).unwrap();
        assert_eq!(verified["marker"], "5");
        assert_eq!(verified["sentinel"], false);
    }

    #[test]
    fn test_render_new_record() {
        let file = config_file("counter");
        let rendered = render(file.path(), None).unwrap();
        assert_eq!(rendered["display"], "");
        let verified = verify(file.path(), rendered["hidden"].as_str().unwrap()).unwrap();
        assert_eq!(verified["sentinel"], true);
    }

    #[test]
    fn test_render_rejects_bad_marker() {
        let file = config_file("counter");
        let err = render(file.path(), Some("five")).unwrap_err();
        assert_eq!(err.code_str(), "VG_CLI_INVALID_ARGUMENT");
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let file = config_file("timestamp");
        let err = verify(file.path(), "garbage-not-signed").unwrap_err();
        assert_eq!(err.code_str(), "VG_CLI_TOKEN_REJECTED");
    }

    fn single_json_line(buffer: Vec<u8>) -> Value {
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1, "expected one line, got: {:?}", output);
        serde_json::from_str(lines[0]).unwrap()
    }

    #[test]
    fn test_run_command_render_prints_only_the_response() {
        let file = config_file("counter");
        let mut out = Vec::new();
        run_command(
            Command::Render {
                config: file.path().to_path_buf(),
                marker: Some("5".to_string()),
            },
            &mut out,
        )
        .unwrap();

        let response = single_json_line(out);
        assert_eq!(response["status"], "ok");
        assert_eq!(response["data"]["display"], "5");
    }

    #[test]
    fn test_run_command_verify_prints_only_the_response() {
        let file = config_file("counter");
        let hidden = render(file.path(), None).unwrap()["hidden"]
            .as_str()
            .unwrap()
            .to_string();

        let mut out = Vec::new();
        run_command(
            Command::Verify {
                config: file.path().to_path_buf(),
                token: hidden,
            },
            &mut out,
        )
        .unwrap();

        let response = single_json_line(out);
        assert_eq!(response["data"]["sentinel"], true);
    }

    #[test]
    fn test_run_command_error_prints_only_the_error() {
        let file = config_file("counter");
        let mut out = Vec::new();
        let err = run_command(
            Command::Verify {
                config: file.path().to_path_buf(),
                token: "garbage-not-signed".to_string(),
            },
            &mut out,
        )
        .unwrap_err();

        let response = single_json_line(out);
        assert_eq!(response["status"], "error");
        assert_eq!(response["code"], err.code_str());
    }
}
