//! Replaying adapters that serve recorded interactions from cassettes.

pub mod image_generator;

use std::sync::{Arc, Mutex};

use crate::cassette::replayer::CassetteReplayer;
use crate::error::TransferError;

/// Retrieve the next recorded output for a given port and method.
///
/// # Panics
///
/// Panics if the replayer is `None` or the cassette has no more interactions.
pub(crate) fn next_output(
    replayer: Option<&Arc<Mutex<CassetteReplayer>>>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let replayer = replayer.unwrap_or_else(|| {
        panic!(
            "Replaying adapter: no cassette configured for port '{port}'. \
             Configure a cassette or use live mode."
        );
    });
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_interaction(port, method).output
}

/// Deserialize a replayed output as `Result<T, TransferError>`.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, TransferError> {
    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        return Err(replay_error(err_val));
    }
    let ok_val = output.get("Ok").or_else(|| output.get("ok")).unwrap_or(&output);
    serde_json::from_value(ok_val.clone()).map_err(|e| TransferError::Api {
        status: 0,
        message: format!("Malformed cassette output: {e}"),
    })
}

/// Rebuild an error from its cassette form. Bare strings replay as API errors.
fn replay_error(value: &serde_json::Value) -> TransferError {
    let message = |v: &serde_json::Value| {
        v.get("message").and_then(|m| m.as_str()).unwrap_or("replayed error").to_string()
    };
    match value.get("kind").and_then(|k| k.as_str()) {
        Some("no_image") => TransferError::NoImageProduced {
            detail: value.get("detail").and_then(|d| d.as_str()).map(str::to_string),
        },
        Some("api") => TransferError::Api {
            status: value
                .get("status")
                .and_then(serde_json::Value::as_u64)
                .and_then(|s| u16::try_from(s).ok())
                .unwrap_or(0),
            message: message(value),
        },
        Some(_) => TransferError::Api { status: 0, message: message(value) },
        None => TransferError::Api {
            status: 0,
            message: value.as_str().unwrap_or("replayed error").to_string(),
        },
    }
}
