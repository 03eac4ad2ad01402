// ABOUTME: Streaming zip decoder - emits entries while the input is read.
// ABOUTME: Blocking zip parsing runs on a worker, bridged by a bounded channel.

use std::io::Read;

use bytes::Bytes;
use thiserror::Error;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio_util::io::SyncIoBridge;
use zip::read::read_zipfile_from_stream;
use zip::result::ZipError;

/// How many decoded entries may wait for the uploader before decompression
/// pauses.
const ENTRY_CHANNEL_DEPTH: usize = 4;

/// One file record from the archive, fully buffered.
///
/// Directory records are emitted as the format declares them (path ending
/// in `/`, empty body); consumers skip them.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub path: String,
    pub body: Bytes,
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("malformed archive: {0}")]
    Malformed(String),

    #[error("unsupported archive feature: {0}")]
    Unsupported(String),

    #[error("archive input ended unexpectedly: {0}")]
    Truncated(String),
}

impl From<ZipError> for ArchiveError {
    fn from(error: ZipError) -> Self {
        match error {
            // An I/O error mid-decode means the byte stream broke before a
            // clean end-of-archive marker.
            ZipError::Io(e) => ArchiveError::Truncated(e.to_string()),
            ZipError::InvalidArchive(detail) => ArchiveError::Malformed(detail.to_string()),
            ZipError::UnsupportedArchive(detail) => ArchiveError::Unsupported(detail.to_string()),
            ZipError::FileNotFound => ArchiveError::Malformed("missing file record".to_string()),
        }
    }
}

/// Lazy, finite, non-restartable sequence of archive entries.
///
/// Ends after the first error; a `None` without a prior error means the
/// archive terminated cleanly.
pub struct EntryStream {
    rx: mpsc::Receiver<Result<ArchiveEntry, ArchiveError>>,
}

impl EntryStream {
    pub async fn next(&mut self) -> Option<Result<ArchiveEntry, ArchiveError>> {
        self.rx.recv().await
    }
}

impl std::fmt::Debug for EntryStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStream").finish_non_exhaustive()
    }
}

/// Start decoding `reader` as a zip stream.
///
/// Decompression happens on a blocking worker as bytes arrive, so entries
/// become available before the whole archive has been read. Must be called
/// from within a tokio runtime.
pub fn decode_entries<R>(reader: R) -> EntryStream
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let (tx, rx) = mpsc::channel(ENTRY_CHANNEL_DEPTH);
    let bridge = SyncIoBridge::new(reader);

    tokio::task::spawn_blocking(move || decode_loop(bridge, tx));

    EntryStream { rx }
}

fn decode_loop<R: Read>(mut reader: R, tx: mpsc::Sender<Result<ArchiveEntry, ArchiveError>>) {
    loop {
        match read_zipfile_from_stream(&mut reader) {
            Ok(Some(mut entry)) => {
                let path = entry.name().to_string();
                let mut body = Vec::with_capacity(entry.size() as usize);

                if let Err(error) = entry.read_to_end(&mut body) {
                    let _ = tx.blocking_send(Err(ArchiveError::Truncated(error.to_string())));
                    return;
                }

                let entry = ArchiveEntry {
                    path,
                    body: Bytes::from(body),
                };

                // Receiver dropped: the run is already over, stop decoding.
                if tx.blocking_send(Ok(entry)).is_err() {
                    return;
                }
            }
            Ok(None) => return,
            Err(error) => {
                let _ = tx.blocking_send(Err(error.into()));
                return;
            }
        }
    }
}
