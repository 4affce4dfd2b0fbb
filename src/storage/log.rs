//! Record Log
//!
//! Append-only file of length-prefixed entity records.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bytes::{Buf, BufMut, BytesMut};
use tracing::debug;

use crate::error::{GraphError, Result};

/// Size of the length prefix in front of every record
pub const RECORD_HEADER_SIZE: u64 = 4;

/// Maximum payload size of one record (16 MB)
pub const MAX_RECORD_SIZE: usize = 16 * 1024 * 1024;

/// Append-only log of `[len: u32 LE][payload]` records
///
/// Offsets handed out by [`LogFile::append`] stay valid forever: records are
/// never rewritten or moved.
pub struct LogFile {
    path: PathBuf,
    file: File,
    /// Current end of file, where the next record starts
    len: u64,
}

impl LogFile {
    /// Open or create a log file
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)?;
        let len = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            file,
            len,
        })
    }

    /// Append one record and return the offset it starts at
    pub fn append(&mut self, payload: &[u8]) -> Result<u64> {
        if payload.len() > MAX_RECORD_SIZE {
            return Err(GraphError::InvalidArgument(format!(
                "record of {} bytes exceeds the {} byte limit",
                payload.len(),
                MAX_RECORD_SIZE
            )));
        }

        let offset = self.len;
        let mut record = BytesMut::with_capacity(RECORD_HEADER_SIZE as usize + payload.len());
        record.put_u32_le(payload.len() as u32);
        record.put_slice(payload);

        // Append mode: the write lands at end of file regardless of the read position
        if let Err(e) = self.file.write_all(&record) {
            // A torn write may have extended the file; later offsets must start past it
            self.len = self.file.metadata().map_or(self.len, |m| m.len());
            return Err(e.into());
        }
        self.len += record.len() as u64;

        debug!(path = %self.path.display(), offset, bytes = payload.len(), "Appended record");
        Ok(offset)
    }

    /// Read the payload of the record starting at `offset`
    ///
    /// Fails with `NotFound` if no record can start there, and with
    /// `InvalidFormat` if the record runs past the end of the file.
    pub fn read_at(&mut self, offset: u64) -> Result<Vec<u8>> {
        if offset.saturating_add(RECORD_HEADER_SIZE) > self.len {
            return Err(GraphError::NotFound(format!(
                "no record at offset {} in {} ({} bytes)",
                offset,
                self.path.display(),
                self.len
            )));
        }

        self.file.seek(SeekFrom::Start(offset))?;
        let mut header = [0u8; RECORD_HEADER_SIZE as usize];
        self.file.read_exact(&mut header)?;
        let payload_len = (&header[..]).get_u32_le() as usize;

        let end = offset + RECORD_HEADER_SIZE + payload_len as u64;
        if payload_len > MAX_RECORD_SIZE || end > self.len {
            return Err(GraphError::InvalidFormat(format!(
                "record at offset {} declares {} bytes but {} ends at {}",
                offset,
                payload_len,
                self.path.display(),
                self.len
            )));
        }

        let mut payload = vec![0u8; payload_len];
        self.file.read_exact(&mut payload)?;
        Ok(payload)
    }

    /// Flush file contents to stable storage
    pub fn sync(&mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_data()?;
        Ok(())
    }

    /// Size of the log in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
