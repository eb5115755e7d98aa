use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, TransportError};
use crate::serial::{SerialConfig, SerialPort};

/// A serial link that acquires the device for exactly one write.
///
/// Holds only the device path and line configuration, never an open
/// descriptor. Each [`write_frame`](Self::write_frame) opens the device,
/// pushes one frame, and releases the device before returning, on success
/// and failure alike.
#[derive(Debug, Clone)]
pub struct SerialLink {
    path: PathBuf,
    config: SerialConfig,
}

impl SerialLink {
    pub fn new(path: impl Into<PathBuf>, config: SerialConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// The device path this link writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Send one frame: open, write once, close.
    ///
    /// Returns the count of bytes the device accepted. An unacquirable
    /// device reports [`TransportError::Unavailable`] without attempting
    /// any write; a failed write reports [`TransportError::WriteFailed`].
    /// The frame is dropped either way — no queueing, no retry.
    pub fn write_frame(&self, frame: &[u8]) -> Result<usize> {
        let port = SerialPort::open(&self.path, &self.config)?;
        push_frame(port, frame)
    }
}

/// Write one frame to a sink that is consumed, and therefore released,
/// on every exit path, error included.
fn push_frame<S: Write>(mut sink: S, frame: &[u8]) -> Result<usize> {
    let written = sink
        .write(frame)
        .map_err(|source| TransportError::WriteFailed { source })?;
    if written < frame.len() {
        warn!(written, frame_len = frame.len(), "short write on serial device");
    }
    debug!(written, "frame written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Fails every write and records when it gets dropped.
    struct FailingSink {
        released: Arc<AtomicBool>,
    }

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for FailingSink {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct ShortSink;

    impl Write for ShortSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len().min(2))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_released_when_write_fails() {
        let released = Arc::new(AtomicBool::new(false));
        let sink = FailingSink {
            released: Arc::clone(&released),
        };

        let err = push_frame(sink, &[1, 2, 3]).unwrap_err();

        assert!(matches!(err, TransportError::WriteFailed { .. }));
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn push_frame_reports_full_count() {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = SharedSink(Arc::clone(&captured));

        let written = push_frame(sink, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();

        assert_eq!(written, 4);
        assert_eq!(captured.lock().unwrap().as_slice(), &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn short_write_count_is_passed_through() {
        let written = push_frame(ShortSink, &[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(written, 2);
    }

    #[test]
    fn missing_device_reports_unavailable() {
        let link = SerialLink::new("/dev/sensorlink-missing-device", SerialConfig::default());
        let err = link.write_frame(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, TransportError::Unavailable { .. }));
    }

    #[test]
    fn write_frame_to_byte_sink() {
        let link = SerialLink::new("/dev/null", SerialConfig::default());
        let written = link.write_frame(&[0x05, 0xD6, 0x03]).unwrap();
        assert_eq!(written, 3);
    }

    #[test]
    fn link_is_reusable_across_writes() {
        // The link holds no descriptor, so consecutive cycles each get a
        // fresh acquisition.
        let link = SerialLink::new("/dev/null", SerialConfig::default());
        assert_eq!(link.write_frame(&[0x01]).unwrap(), 1);
        assert_eq!(link.write_frame(&[0x02, 0x03]).unwrap(), 2);
        assert_eq!(link.path(), Path::new("/dev/null"));
    }
}
