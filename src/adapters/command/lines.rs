//! Line-reader command source.
//!
//! Reads on a dedicated OS thread and hands lines over a channel. A read
//! that never completes (an idle terminal) then holds up nothing but that
//! thread: the runtime can shut down and the process can exit while the
//! read is still pending.

use std::io::{self, BufRead};
use std::thread;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::ports::{CommandSource, CommandSourceError};

const LINE_BUFFER: usize = 64;

/// Reads one operator command per line.
pub struct LineCommandSource {
    lines: mpsc::Receiver<io::Result<String>>,
}

impl LineCommandSource {
    /// Starts the reader thread. Lines are buffered until `next_line` takes
    /// them; the thread stops at end of input or on the first read error.
    pub fn spawn<R>(reader: R) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(LINE_BUFFER);
        thread::Builder::new()
            .name("command-input".to_owned())
            .spawn(move || {
                for line in reader.lines() {
                    let failed = line.is_err();
                    if tx.blocking_send(line).is_err() || failed {
                        break;
                    }
                }
                tracing::debug!("command input finished");
            })?;
        Ok(Self { lines: rx })
    }

    pub fn stdin() -> io::Result<Self> {
        Self::spawn(io::BufReader::new(io::stdin()))
    }
}

#[async_trait]
impl CommandSource for LineCommandSource {
    async fn next_line(&mut self) -> Result<Option<String>, CommandSourceError> {
        match self.lines.recv().await {
            Some(line) => Ok(Some(line?.trim_end_matches('\r').to_owned())),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    /// Blocks every read until the paired sender is dropped.
    struct Stalled(std_mpsc::Receiver<()>);

    impl Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    #[tokio::test]
    async fn yields_lines_without_terminators_then_none() {
        let mut source = LineCommandSource::spawn(&b"hello\r\n\n  \nbye"[..]).unwrap();

        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("hello"));
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some(""));
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("  "));
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("bye"));
        assert!(source.next_line().await.unwrap().is_none());
        assert!(source.next_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn read_errors_surface_once_then_input_ends() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "device gone"))
            }
        }

        let mut source = LineCommandSource::spawn(io::BufReader::new(Broken)).unwrap();

        assert!(matches!(source.next_line().await, Err(CommandSourceError::Io(_))));
        assert!(source.next_line().await.unwrap().is_none());
    }

    #[test]
    fn runtime_shuts_down_while_a_read_is_pending() {
        let (hold, rx) = std_mpsc::channel::<()>();
        let (done_tx, done_rx) = std_mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async {
                let mut source =
                    LineCommandSource::spawn(io::BufReader::new(Stalled(rx))).unwrap();
                let read = tokio::time::timeout(Duration::from_millis(50), source.next_line()).await;
                assert!(read.is_err());
            });
            drop(runtime);
            done_tx.send(()).unwrap();
        });

        assert!(done_rx.recv_timeout(Duration::from_secs(5)).is_ok());
        drop(hold);
    }
}
