//! Readable blob with a known name and length.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::plan::Chunk;

#[derive(Debug, Clone)]
enum Blob {
    Path(PathBuf),
    Memory(Vec<u8>),
}

/// File to upload. Chunks are read on demand, so large captures are never
/// held in memory as a whole.
#[derive(Debug, Clone)]
pub struct UploadFile {
    name: String,
    len: u64,
    blob: Blob,
}

impl UploadFile {
    /// Uses the path's file name as the upload name.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            len: meta.len(),
            blob: Blob::Path(path.to_path_buf()),
        })
    }

    pub fn from_bytes(name: &str, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            len: data.len() as u64,
            blob: Blob::Memory(data),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads exactly the bytes of `chunk`.
    pub fn read_chunk(&self, chunk: &Chunk) -> io::Result<Vec<u8>> {
        match &self.blob {
            Blob::Memory(data) => data
                .get(chunk.start as usize..chunk.end as usize)
                .map(<[u8]>::to_vec)
                .ok_or_else(|| {
                    io::Error::new(io::ErrorKind::UnexpectedEof, "chunk past end of buffer")
                }),
            Blob::Path(path) => {
                let mut f = File::open(path)?;
                f.seek(SeekFrom::Start(chunk.start))?;
                let mut buf = vec![0u8; chunk.len() as usize];
                f.read_exact(&mut buf)?;
                Ok(buf)
            }
        }
    }
}
