use crate::Result;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

/// How many bytes [`ChunkedReader`] pulls per part.
pub const CHUNK_SIZE: usize = 10 * 1024 * 1024;

/// One payload produced for a multipart upload.
#[derive(Debug, Clone)]
pub struct Part {
    /// The part's bytes.
    pub body: Bytes,
    /// Whether this is the last part of the upload.
    pub is_final: bool,
}

/// A pull-based producer of upload parts.
///
/// A source is consumed exactly once, strictly in order: the orchestrator
/// calls [`next_part`](PartSource::next_part) for part 1, 2, 3, ... until a
/// part comes back with `is_final` set. There is no rewinding; a failed
/// upload cannot re-request an earlier part.
#[async_trait]
pub trait PartSource: Send {
    /// Produce the next part.
    async fn next_part(&mut self) -> Result<Part>;
}

/// A [`PartSource`] that cuts fixed 10 MiB parts from any byte stream.
///
/// Short reads are buffered until a full chunk is available; end-of-stream
/// marks the final part, which may be smaller. When the stream length is an
/// exact multiple of the chunk size the final part is empty, since the end
/// of the stream only becomes visible one read after the last full chunk.
pub struct ChunkedReader<R> {
    reader: R,
    done: bool,
}

impl<R> ChunkedReader<R> {
    /// Wrap a byte stream.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> PartSource for ChunkedReader<R> {
    async fn next_part(&mut self) -> Result<Part> {
        let mut buf = BytesMut::with_capacity(CHUNK_SIZE);

        while buf.len() < CHUNK_SIZE && !self.done {
            let n = self.reader.read_buf(&mut buf).await?;
            if n == 0 {
                self.done = true;
            }
        }

        Ok(Part {
            body: buf.freeze(),
            is_final: self.done,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Hands out at most `max_read` bytes per read call, so filling one
    /// chunk takes many reads.
    struct DribbleReader<'a> {
        data: &'a [u8],
        max_read: usize,
    }

    impl AsyncRead for DribbleReader<'_> {
        fn poll_read(
            self: Pin<&mut Self>,
            _: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let this = self.get_mut();
            let n = this.data.len().min(this.max_read).min(buf.remaining());
            let (head, tail) = this.data.split_at(n);
            buf.put_slice(head);
            this.data = tail;
            Poll::Ready(Ok(()))
        }
    }

    async fn collect(mut source: impl PartSource) -> Vec<Part> {
        let mut parts = Vec::new();
        loop {
            let part = source.next_part().await.expect("reading must succeed");
            let is_final = part.is_final;
            parts.push(part);
            if is_final {
                break;
            }
        }
        parts
    }

    #[tokio::test]
    async fn test_chunks_with_smaller_tail() {
        let data = vec![7u8; 2 * CHUNK_SIZE + CHUNK_SIZE / 2];
        let parts = collect(ChunkedReader::new(data.as_slice())).await;

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].body.len(), CHUNK_SIZE);
        assert!(!parts[0].is_final);
        assert_eq!(parts[1].body.len(), CHUNK_SIZE);
        assert!(!parts[1].is_final);
        assert_eq!(parts[2].body.len(), CHUNK_SIZE / 2);
        assert!(parts[2].is_final);
    }

    #[tokio::test]
    async fn test_partial_reads_are_buffered_into_full_chunks() {
        // 12 MiB delivered 700 KiB at a time: cutting the first part takes
        // fifteen reads, and no part boundary may land mid-read.
        let data: Vec<u8> = (0..12 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
        let reader = DribbleReader {
            data: &data,
            max_read: 700 * 1024,
        };

        let parts = collect(ChunkedReader::new(reader)).await;

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].body.len(), CHUNK_SIZE);
        assert!(!parts[0].is_final);
        assert_eq!(parts[1].body.len(), data.len() - CHUNK_SIZE);
        assert!(parts[1].is_final);

        // Reassembling the parts must give back the original stream.
        let mut rejoined = Vec::with_capacity(data.len());
        rejoined.extend_from_slice(&parts[0].body);
        rejoined.extend_from_slice(&parts[1].body);
        assert_eq!(rejoined, data);
    }

    #[tokio::test]
    async fn test_exact_multiple_yields_empty_final_part() {
        let data = vec![7u8; CHUNK_SIZE];
        let parts = collect(ChunkedReader::new(data.as_slice())).await;

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].body.len(), CHUNK_SIZE);
        assert!(!parts[0].is_final);
        assert!(parts[1].body.is_empty());
        assert!(parts[1].is_final);
    }

    #[tokio::test]
    async fn test_empty_stream_yields_single_empty_final_part() {
        let parts = collect(ChunkedReader::new(&[][..])).await;

        assert_eq!(parts.len(), 1);
        assert!(parts[0].body.is_empty());
        assert!(parts[0].is_final);
    }
}
