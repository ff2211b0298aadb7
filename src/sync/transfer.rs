//! Copy-paste transfer of a layout as a base64 blob

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use super::protocol::LayoutPayload;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded blob is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("not a layout: {0}")]
    Json(#[from] serde_json::Error),
}

/// Standard base64 of the compact JSON payload
pub fn encode(payload: &LayoutPayload) -> Result<String, TransferError> {
    let json = serde_json::to_string(payload)?;
    Ok(STANDARD.encode(json))
}

pub fn decode(blob: &str) -> Result<LayoutPayload, TransferError> {
    let bytes = STANDARD.decode(blob.trim())?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

/// Read a layout given either as JSON or as a base64 blob
pub fn read_design(input: &str) -> Result<LayoutPayload, TransferError> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') {
        Ok(serde_json::from_str(trimmed)?)
    } else {
        decode(trimmed)
    }
}
