//! Recording adapters that capture interactions to cassettes.

pub mod image_generator;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;
use crate::error::TransferError;

/// Record a `Result<T, TransferError>` interaction using the Ok/Err JSON convention.
///
/// Errors are stored as `{kind, message}` so replay can rebuild the same
/// variant; see [`error_record`].
pub(crate) fn record_result<T, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, TransferError>,
) where
    T: Serialize,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");

    let output_json = match result {
        Ok(v) => {
            let inner = serde_json::to_value(v).expect("failed to serialize Ok value");
            serde_json::json!({ "Ok": inner })
        }
        Err(e) => serde_json::json!({ "Err": error_record(e) }),
    };

    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, input_json, output_json);
}

/// Cassette form of an error.
pub(crate) fn error_record(error: &TransferError) -> serde_json::Value {
    match error {
        TransferError::NoImageProduced { detail } => {
            serde_json::json!({ "kind": "no_image", "detail": detail })
        }
        TransferError::Api { status, message } => {
            serde_json::json!({ "kind": "api", "status": status, "message": message })
        }
        other => serde_json::json!({ "kind": "other", "message": other.to_string() }),
    }
}
