use std::time::Duration;

use tokio::io::{self, AsyncReadExt, AsyncWriteExt};

use crate::framing::{ContentType, FramingError, ProtocolVersion, ReassemblingRecordStream, Record, RecordIo};

const POLL: Duration = Duration::from_millis(20);

#[tokio::test]
async fn delivers_records_written_byte_by_byte() {
    let (mut peer, local) = io::duplex(4096);
    let mut stream = ReassemblingRecordStream::new(local, POLL);

    let first = Record::new(ContentType::Handshake, ProtocolVersion::Tls1_0, b"hello".to_vec());
    let second = Record::new(ContentType::ChangeCipherSpec, ProtocolVersion::Tls1_0, vec![1]);
    let wire = [first.serialize().unwrap(), second.serialize().unwrap()].concat();

    for b in wire {
        peer.write_all(&[b]).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    assert_eq!(stream.read_record().await.unwrap(), first);
    assert_eq!(stream.read_record().await.unwrap(), second);
}

#[tokio::test]
async fn idle_polls_are_not_errors() {
    let (mut peer, local) = io::duplex(4096);
    let mut stream = ReassemblingRecordStream::new(local, POLL);

    tokio::time::sleep(POLL * 5).await;

    let rec = Record::new(ContentType::Handshake, ProtocolVersion::Ssl3_0, vec![0x0e, 0, 0, 0]);
    peer.write_all(&rec.serialize().unwrap()).await.unwrap();
    assert_eq!(stream.read_record().await.unwrap(), rec);
}

#[tokio::test]
async fn writes_serialized_records() {
    let (mut peer, local) = io::duplex(4096);
    let mut stream = ReassemblingRecordStream::new(local, POLL);

    let rec = Record::new(ContentType::ChangeCipherSpec, ProtocolVersion::Tls1_0, vec![1]);
    stream.write_record(&rec).await.unwrap();

    let mut got = [0u8; 6];
    peer.read_exact(&mut got).await.unwrap();
    assert_eq!(got.to_vec(), hex::decode("140301000101").unwrap());
}

#[tokio::test]
async fn clean_close_and_truncated_close_differ() {
    let (peer, local) = io::duplex(64);
    let mut stream = ReassemblingRecordStream::new(local, POLL);
    drop(peer);
    assert_eq!(stream.read_record().await.unwrap_err(), FramingError::Closed);

    let (mut peer, local) = io::duplex(64);
    let mut stream = ReassemblingRecordStream::new(local, POLL);
    peer.write_all(&[0x16, 0x03, 0x01, 0x00, 0x09, 0xaa]).await.unwrap();
    drop(peer);
    assert_eq!(stream.read_record().await.unwrap_err(), FramingError::UnexpectedEof(6));
}

#[tokio::test]
async fn malformed_record_is_reported() {
    let (mut peer, local) = io::duplex(64);
    let mut stream = ReassemblingRecordStream::new(local, POLL);
    peer.write_all(&[0x17, 0x03, 0x01, 0x00, 0x00]).await.unwrap();
    assert_eq!(stream.read_record().await.unwrap_err(), FramingError::UnknownContentType(0x17));
}
