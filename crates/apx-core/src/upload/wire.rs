//! Wire shapes of the chunk transfer and finalize endpoints.

use serde::{Deserialize, Serialize};

use super::plan::Chunk;
use super::session::SessionInfo;
use crate::transport::MultipartForm;

/// Chunk transfer response: `{ "success": true, "chunkIndex": 0 }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub chunk_index: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Backend's description of the assembled file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizationResult {
    /// Backend-assigned identifier used for extraction.
    pub file_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Any other fields the backend sent.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Transfer unit for one chunk. `fileId` carries the session identifier.
pub fn chunk_form(info: &SessionInfo, chunk: &Chunk, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new()
        .file("chunk", &info.file_name, data)
        .text("index", chunk.index.to_string())
        .text("totalChunks", info.total_chunks.to_string())
        .text("fileId", info.session_id.as_str())
        .text("filename", info.file_name.as_str())
}

/// Finalize request body: only the session identifier and file name.
pub fn finalize_body(info: &SessionInfo) -> serde_json::Value {
    serde_json::json!({
        "fileId": info.session_id,
        "filename": info.file_name,
    })
}
