use std::{io::ErrorKind, net::SocketAddr, ops::RangeInclusive, sync::Arc, time::Duration};

use tokio::{
    net::{TcpListener, TcpStream},
    time::timeout,
};

use toyssl_core::{
    framing::{FramingError, ProtocolVersion, RecordIo, ReassemblingRecordStream, DEFAULT_READ_POLL},
    handshake::{ClientHandshake, EstablishedSession, HandshakeAction, HandshakeMachine, ServerHandshake},
    protocol::Message,
    trace::{Direction, TraceSink},
};

use crate::error::NetError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT_RANGE: RangeInclusive<u16> = 9000..=9999;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    // Bound on the TCP connect only; the handshake itself has no deadline.
    pub connect_timeout: Duration,
    // How long one socket read may block before the reader task polls again.
    pub read_poll: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self { connect_timeout: DEFAULT_CONNECT_TIMEOUT, read_poll: DEFAULT_READ_POLL }
    }
}

// A TCP peer that completed the handshake.
// Owns the socket and its reader task; dropping it tears both down.
pub struct Connection {
    records: ReassemblingRecordStream<TcpStream>,
    session: EstablishedSession,
    peer_addr: SocketAddr,
}

impl Connection {
    pub fn session(&self) -> &EstablishedSession {
        &self.session
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn records(&mut self) -> &mut ReassemblingRecordStream<TcpStream> {
        &mut self.records
    }
}

// Binds the first port in `ports` that is not already taken.
pub async fn bind_first_free(host: &str, ports: RangeInclusive<u16>) -> Result<TcpListener, NetError> {
    let (first, last) = (*ports.start(), *ports.end());
    for port in ports {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => {
                tracing::debug!(host, port, "listening");
                return Ok(listener);
            }
            Err(e) if e.kind() == ErrorKind::AddrInUse => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(NetError::NoFreePort { host: host.to_string(), first, last })
}

// Client-side connect + handshake over TCP.
pub async fn connect_tcp(
    addr: &str,
    mut handshake: ClientHandshake,
    trace: Arc<dyn TraceSink>,
    opts: ConnectOptions,
) -> Result<Connection, NetError> {
    let stream = match timeout(opts.connect_timeout, TcpStream::connect(addr)).await {
        Ok(stream) => stream?,
        Err(_) => return Err(NetError::ConnectTimeout { addr: addr.to_string(), after: opts.connect_timeout }),
    };
    let peer_addr = stream.peer_addr()?;
    tracing::info!(%peer_addr, "connected");

    let mut records = ReassemblingRecordStream::new(stream, opts.read_poll);
    let session = run_handshake(&mut records, &mut handshake, trace.as_ref()).await?;
    Ok(Connection { records, session, peer_addr })
}

// Server-side accept + handshake over TCP.
pub async fn accept_tcp(
    listener: &TcpListener,
    handshake: ServerHandshake,
    trace: Arc<dyn TraceSink>,
    opts: ConnectOptions,
) -> Result<Connection, NetError> {
    let (stream, peer_addr) = listener.accept().await?;
    tracing::info!(%peer_addr, "accepted");
    serve_stream(stream, handshake, trace, opts).await
}

// Server handshake on an already accepted socket.
pub async fn serve_stream(
    stream: TcpStream,
    mut handshake: ServerHandshake,
    trace: Arc<dyn TraceSink>,
    opts: ConnectOptions,
) -> Result<Connection, NetError> {
    let peer_addr = stream.peer_addr()?;
    let mut records = ReassemblingRecordStream::new(stream, opts.read_poll);
    let session = run_handshake(&mut records, &mut handshake, trace.as_ref()).await?;
    Ok(Connection { records, session, peer_addr })
}

/// Runs `machine` to completion over `records`.
///
/// Inbound records are split into messages and fed to the machine in
/// arrival order; every flight it asks for is packed into records and
/// written before the next read. Each message crossing the wire is
/// reported to `trace`.
pub async fn run_handshake<R, M>(
    records: &mut R,
    machine: &mut M,
    trace: &dyn TraceSink,
) -> Result<EstablishedSession, NetError>
where
    R: RecordIo,
    M: HandshakeMachine,
{
    let first = machine.start().await?;
    send_flight(records, machine.record_version(), &first, trace).await?;

    loop {
        let record = match records.read_record().await {
            Ok(record) => record,
            Err(FramingError::Closed) => return Err(NetError::PeerClosed),
            Err(e) => return Err(e.into()),
        };
        tracing::trace!(content_type = %record.content_type, version = %record.version, len = record.payload.len(), "record in");

        for msg in Message::from_record(&record)? {
            tracing::debug!(kind = %msg.kind(), "received");
            trace.on_message(Direction::Rx, &msg.kind().to_string(), &msg.payload()?);

            let action = match machine.on_message(msg).await {
                Ok(action) => action,
                Err(e) => {
                    tracing::warn!(error = %e, "handshake aborted");
                    return Err(e.into());
                }
            };
            match action {
                HandshakeAction::Wait => {}
                HandshakeAction::Send(msgs) => {
                    send_flight(records, machine.record_version(), &msgs, trace).await?;
                }
                HandshakeAction::Established(session) => return Ok(session),
                HandshakeAction::SendAndEstablished { msgs, session } => {
                    send_flight(records, machine.record_version(), &msgs, trace).await?;
                    return Ok(session);
                }
            }
        }
    }
}

async fn send_flight<R: RecordIo>(
    records: &mut R,
    version: ProtocolVersion,
    msgs: &[Message],
    trace: &dyn TraceSink,
) -> Result<(), NetError> {
    for msg in msgs {
        tracing::debug!(kind = %msg.kind(), "sending");
        trace.on_message(Direction::Tx, &msg.kind().to_string(), &msg.payload()?);
    }
    for record in Message::pack(msgs, version)? {
        tracing::trace!(content_type = %record.content_type, len = record.payload.len(), "record out");
        records.write_record(&record).await?;
    }
    Ok(())
}
