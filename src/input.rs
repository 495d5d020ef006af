use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{HookError, Result};

/// Default wait for the first byte on stdin.
pub const DEFAULT_STDIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Drain stdin to a buffer. Fails with `timeout reading stdin` if nothing
/// arrives within `wait`.
pub async fn read_stdin(wait: Duration) -> Result<Vec<u8>> {
    read_with_timeout(tokio::io::stdin(), wait).await
}

/// Read `reader` to end-of-stream. The timeout only bounds the wait for the
/// first chunk; once data is flowing the read runs until EOF.
pub async fn read_with_timeout<R>(mut reader: R, wait: Duration) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    let first = tokio::time::timeout(wait, reader.read(&mut chunk))
        .await
        .map_err(|_| HookError::InputTimeout)?
        .map_err(HookError::Input)?;

    if first == 0 {
        return Ok(buf);
    }
    buf.extend_from_slice(&chunk[..first]);

    reader
        .read_to_end(&mut buf)
        .await
        .map_err(HookError::Input)?;

    tracing::debug!(bytes = buf.len(), "read hook payload");
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn reads_until_eof() {
        let reader = tokio_test::io::Builder::new()
            .read(b"{\"hook_event_name\":")
            .read(b"\"Stop\"}")
            .build();
        let buf = read_with_timeout(reader, Duration::from_millis(200))
            .await
            .unwrap();
        assert_eq!(buf, b"{\"hook_event_name\":\"Stop\"}");
    }

    #[tokio::test]
    async fn empty_stream_is_not_a_timeout() {
        let buf = read_with_timeout(&b""[..], Duration::from_millis(50))
            .await
            .unwrap();
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn times_out_when_nothing_arrives() {
        // Writer half stays open and silent, like a terminal with nothing piped.
        let (_writer, reader) = tokio::io::duplex(64);
        let err = read_with_timeout(reader, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "timeout reading stdin");
        assert_eq!(err.kind(), ErrorKind::Input);
    }
}
