//! Per-upload session state, owned by a single upload call.

use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

use super::acks::AckSet;
use super::plan::{plan_chunks, Chunk};
use crate::validation::ValidationError;

const SUFFIX_LEN: usize = 13;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// New session identifier: `upload_<unix-millis>_<13 base-36 chars>`.
pub fn new_session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("upload_{millis}_{suffix}")
}

/// Fields fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub session_id: String,
    pub file_name: String,
    pub total_size: u64,
    pub chunk_size: usize,
    pub total_chunks: usize,
}

/// State of one upload attempt. Created at upload start, mutated only by
/// chunk acknowledgements, dropped after finalize or on abandon.
#[derive(Debug, Clone)]
pub struct UploadSession {
    info: SessionInfo,
    chunks: Vec<Chunk>,
    acknowledged: AckSet,
}

impl UploadSession {
    /// Starts a session with a fresh identifier. Rejects empty files, empty
    /// names and a zero chunk size.
    pub fn start(file_name: &str, total_size: u64, chunk_size: usize) -> Result<Self, ValidationError> {
        Self::with_id(new_session_id(), file_name, total_size, chunk_size)
    }

    pub(crate) fn with_id(
        session_id: String,
        file_name: &str,
        total_size: u64,
        chunk_size: usize,
    ) -> Result<Self, ValidationError> {
        if file_name.trim().is_empty() {
            return Err(ValidationError::MissingFileName);
        }
        if chunk_size == 0 {
            return Err(ValidationError::ZeroChunkSize);
        }
        if total_size == 0 {
            return Err(ValidationError::EmptyFile {
                name: file_name.to_string(),
            });
        }
        let chunks = plan_chunks(total_size, chunk_size);
        let acknowledged = AckSet::new(chunks.len());
        Ok(Self {
            info: SessionInfo {
                session_id,
                file_name: file_name.to_string(),
                total_size,
                chunk_size,
                total_chunks: chunks.len(),
            },
            chunks,
            acknowledged,
        })
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    pub fn session_id(&self) -> &str {
        &self.info.session_id
    }

    pub fn file_name(&self) -> &str {
        &self.info.file_name
    }

    pub fn total_size(&self) -> u64 {
        self.info.total_size
    }

    pub fn chunk_size(&self) -> usize {
        self.info.chunk_size
    }

    pub fn total_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Records a backend acknowledgement. Out-of-range indices are ignored.
    pub fn acknowledge(&mut self, index: usize) -> bool {
        self.acknowledged.insert(index)
    }

    pub fn is_acknowledged(&self, index: usize) -> bool {
        self.acknowledged.contains(index)
    }

    pub fn acknowledged_count(&self) -> usize {
        self.acknowledged.len()
    }

    /// True iff every chunk index has been acknowledged at least once.
    pub fn is_complete(&self) -> bool {
        self.acknowledged.is_full()
    }

    pub fn missing_chunks(&self) -> Vec<usize> {
        self.acknowledged.missing()
    }

    /// Bytes covered by acknowledged chunks.
    pub fn acknowledged_bytes(&self) -> u64 {
        self.chunks
            .iter()
            .filter(|c| self.acknowledged.contains(c.index))
            .map(Chunk::len)
            .sum()
    }
}
