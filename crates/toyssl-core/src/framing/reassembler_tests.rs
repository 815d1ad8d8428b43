use proptest::prelude::*;

use crate::framing::RecordReassembler;

fn frame(content_type: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![content_type, 0x03, 0x01];
    out.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

#[test]
fn incomplete_header_yields_nothing() {
    let fifo = RecordReassembler::new();
    fifo.push(&[0x16, 0x03, 0x01, 0x00]);
    assert_eq!(fifo.try_extract_record(), None);
    assert_eq!(fifo.buffered(), 4);
}

#[test]
fn waits_for_declared_length() {
    let fifo = RecordReassembler::new();
    let rec = frame(22, b"hello");
    fifo.push(&rec[..7]);
    assert_eq!(fifo.try_extract_record(), None);
    fifo.push(&rec[7..]);
    assert_eq!(fifo.try_extract_record(), Some(rec));
    assert_eq!(fifo.buffered(), 0);
}

#[test]
fn drains_several_records_from_one_chunk() {
    let fifo = RecordReassembler::new();
    let a = frame(22, b"first");
    let b = frame(20, &[1]);
    let c = frame(22, b"");
    let mut chunk = [a.clone(), b.clone(), c.clone()].concat();
    chunk.extend_from_slice(&[0x16, 0x03]);
    fifo.push(&chunk);

    assert_eq!(fifo.try_extract_record(), Some(a));
    assert_eq!(fifo.try_extract_record(), Some(b));
    assert_eq!(fifo.try_extract_record(), Some(c));
    assert_eq!(fifo.try_extract_record(), None);
    assert_eq!(fifo.buffered(), 2);
}

fn drain(fifo: &RecordReassembler) -> Vec<Vec<u8>> {
    std::iter::from_fn(|| fifo.try_extract_record()).collect()
}

proptest! {
    #[test]
    fn arbitrary_split_points_yield_same_records(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..300), 1..6),
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..12),
    ) {
        let stream: Vec<u8> = payloads.iter().flat_map(|p| frame(22, p)).collect();

        let whole = RecordReassembler::new();
        whole.push(&stream);
        let expected = drain(&whole);

        let mut points: Vec<usize> = cuts.iter().map(|i| i.index(stream.len() + 1)).collect();
        points.push(0);
        points.push(stream.len());
        points.sort_unstable();
        points.dedup();

        let split = RecordReassembler::new();
        let mut got = Vec::new();
        for w in points.windows(2) {
            split.push(&stream[w[0]..w[1]]);
            got.extend(drain(&split));
        }

        prop_assert_eq!(expected.len(), payloads.len());
        prop_assert_eq!(got, expected);
    }
}
