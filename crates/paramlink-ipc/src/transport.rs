//! IPC transport layer
//!
//! Length-prefixed bincode frames over any async byte stream. Unix sockets
//! connect separate processes; `tokio::io::duplex` works for in-process use.

use crate::error::{IpcError, Result};
use crate::protocol::MAX_FRAME_LEN;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};

#[cfg(unix)]
use tokio::net::{UnixListener, UnixStream};

/// Reading half: decodes one message per frame.
pub struct FrameReader<R> {
    inner: R,
}

/// Writing half: encodes one message per frame.
pub struct FrameWriter<W> {
    inner: W,
}

/// Split a stream into framed halves.
pub fn split<S>(stream: S) -> (FrameReader<ReadHalf<S>>, FrameWriter<WriteHalf<S>>)
where
    S: AsyncRead + AsyncWrite,
{
    let (read, write) = tokio::io::split(stream);
    (FrameReader::new(read), FrameWriter::new(write))
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Receive the next message. `None` when the peer closed between frames.
    pub async fn recv<M: DeserializeOwned>(&mut self) -> Result<Option<M>> {
        let len = match self.inner.read_u32().await {
            Ok(len) => len as usize,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if len > MAX_FRAME_LEN {
            return Err(IpcError::FrameTooLarge {
                len,
                max: MAX_FRAME_LEN,
            });
        }

        let mut data = vec![0u8; len];
        self.inner.read_exact(&mut data).await?;
        let msg = bincode::deserialize(&data)?;
        Ok(Some(msg))
    }
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub async fn send<M: Serialize>(&mut self, msg: &M) -> Result<()> {
        let data = bincode::serialize(msg)?;
        if data.len() > MAX_FRAME_LEN {
            return Err(IpcError::FrameTooLarge {
                len: data.len(),
                max: MAX_FRAME_LEN,
            });
        }

        self.inner.write_u32(data.len() as u32).await?;
        self.inner.write_all(&data).await?;
        self.inner.flush().await?;
        Ok(())
    }
}

/// Connect to a parameter host listening on `socket_path`.
#[cfg(unix)]
pub async fn connect(socket_path: &std::path::Path) -> Result<UnixStream> {
    Ok(UnixStream::connect(socket_path).await?)
}

/// Server-side transport listener
#[cfg(unix)]
pub struct TransportListener {
    listener: UnixListener,
}

#[cfg(unix)]
impl TransportListener {
    /// Bind to socket path, replacing a stale socket file.
    pub async fn bind(socket_path: &std::path::Path) -> Result<Self> {
        let _ = std::fs::remove_file(socket_path);
        let listener = UnixListener::bind(socket_path)?;
        Ok(Self { listener })
    }

    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _) = self.listener.accept().await?;
        Ok(stream)
    }
}
