use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf},
    sync::mpsc,
    task::JoinHandle,
    time::timeout,
};

use crate::framing::{FramingError, Record, RecordIo, RecordReassembler};

const READ_CHUNK: usize = 4096;

// Default upper bound for one socket read before the reader loops again.
pub const DEFAULT_READ_POLL: Duration = Duration::from_millis(100);

/// Record transport over a byte stream.
///
/// A background task owns the read half: it polls the stream with a short
/// timeout, feeds every chunk into a [`RecordReassembler`] and forwards each
/// complete record, in arrival order, over a channel. Writes go straight to
/// the write half. Dropping the stream aborts the reader task.
pub struct ReassemblingRecordStream<S> {
    writer: WriteHalf<S>,
    inbound: mpsc::Receiver<Result<Record, FramingError>>,
    reader: JoinHandle<()>,
}

impl<S> ReassemblingRecordStream<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    pub fn new(io: S, read_poll: Duration) -> Self {
        let (rd, writer) = tokio::io::split(io);
        let (tx, inbound) = mpsc::channel(16);
        let reader = tokio::spawn(read_loop(rd, read_poll, Arc::new(RecordReassembler::new()), tx));
        Self { writer, inbound, reader }
    }
}

impl<S> Drop for ReassemblingRecordStream<S> {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

fn map_io_err(e: std::io::Error) -> FramingError {
    FramingError::Io(e.to_string())
}

async fn read_loop<S>(
    mut rd: ReadHalf<S>,
    read_poll: Duration,
    fifo: Arc<RecordReassembler>,
    tx: mpsc::Sender<Result<Record, FramingError>>,
) where
    S: AsyncRead + Send,
{
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = match timeout(read_poll, rd.read(&mut chunk)).await {
            // Poll expired with nothing to read; not an error.
            Err(_) => continue,
            Ok(Ok(0)) => {
                let err = match fifo.buffered() {
                    0 => FramingError::Closed,
                    n => FramingError::UnexpectedEof(n),
                };
                let _ = tx.send(Err(err)).await;
                return;
            }
            Ok(Ok(n)) => n,
            Ok(Err(e)) => {
                let _ = tx.send(Err(map_io_err(e))).await;
                return;
            }
        };

        fifo.push(&chunk[..n]);
        while let Some(frame) = fifo.try_extract_record() {
            let parsed = Record::parse(&frame);
            let fatal = parsed.is_err();
            if tx.send(parsed).await.is_err() || fatal {
                return;
            }
        }
    }
}

#[async_trait]
impl<S> RecordIo for ReassemblingRecordStream<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    async fn read_record(&mut self) -> Result<Record, FramingError> {
        match self.inbound.recv().await {
            Some(result) => result,
            None => Err(FramingError::Closed),
        }
    }

    async fn write_record(&mut self, record: &Record) -> Result<(), FramingError> {
        let bytes = record.serialize()?;
        self.writer.write_all(&bytes).await.map_err(map_io_err)?;
        self.writer.flush().await.map_err(map_io_err)?;
        Ok(())
    }
}
