//! Messages exchanged with the simulation server.

use crate::error::ProtocolError;
use crate::plotter::data::Sample;
use serde::{Deserialize, Serialize};

/// Text messages pushed by the server, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "editor.code")]
    EditorCode { code: String },
    #[serde(rename = "editor.stdout")]
    EditorStdout { stdout: String },
    #[serde(rename = "editor.filename")]
    EditorFilename {
        filename: String,
        #[serde(default)]
        error: Option<String>,
    },
    #[serde(rename = "editor.error")]
    EditorError {
        error: ExecutionError,
        #[serde(rename = "shortMsg")]
        short_msg: String,
        #[serde(default)]
        stdout: String,
    },
}

impl ServerMessage {
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Where and why the user's script failed on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionError {
    /// 1-based line number in the script.
    pub line: u32,
    #[serde(default)]
    pub trace: String,
}

/// Editor contents pushed to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSync {
    pub code: String,
    pub save: bool,
}

impl EditorSync {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decodes a binary data message: little-endian `f32`s, the first being the
/// simulation time and the rest one value per dimension.
pub fn decode_sample(bytes: &[u8], dimensions: usize) -> Result<Sample, ProtocolError> {
    if bytes.len() % 4 != 0 {
        return Err(ProtocolError::Misaligned(bytes.len()));
    }
    let floats: Vec<f64> = bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as f64)
        .collect();
    let Some((time, values)) = floats.split_first() else {
        return Err(ProtocolError::WrongLength {
            expected: dimensions,
            actual: 0,
        });
    };
    if values.len() != dimensions {
        return Err(ProtocolError::WrongLength {
            expected: dimensions,
            actual: values.len(),
        });
    }
    Ok(Sample::new(*time, values.to_vec()))
}

/// Inverse of [`decode_sample`]; used by tools replaying recorded data.
pub fn encode_sample(sample: &Sample) -> Vec<u8> {
    std::iter::once(sample.time())
        .chain(sample.values().iter().copied())
        .flat_map(|value| (value as f32).to_le_bytes())
        .collect()
}
