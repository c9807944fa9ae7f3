use pbj_runtime::io::BufferedData;
use pbj_runtime::io::RandomAccessData;
use pbj_runtime::io::ReadableSequentialData;
use pbj_runtime::io::ReadableStreamingData;
use pbj_runtime::io::SequentialData;
use pbj_runtime::io::WritableSequentialData;
use pbj_runtime::io::WritableStreamingData;
use pbj_runtime::io::MessageDigestSink;
use pbj_runtime::ProtobufError;
use sha2::Sha256;

#[test]
fn buffered_data_supports_random_access_without_moving_position() {
    let mut buf = BufferedData::wrap(vec![10, 20, 30, 40]);
    assert_eq!(buf.get_byte_at(2).unwrap(), 30);
    assert_eq!(buf.position(), 0);
    assert_eq!(buf.read_byte().unwrap(), 10);
    assert_eq!(buf.position(), 1);
}

#[test]
fn buffered_data_write_beyond_capacity_fails() {
    let mut buf = BufferedData::with_capacity(2);
    buf.write_byte(1).unwrap();
    buf.write_byte(2).unwrap();
    assert!(buf.write_byte(3).is_err());
}

#[test]
fn buffered_data_read_beyond_limit_fails() {
    let mut buf = BufferedData::wrap(vec![1, 2]);
    buf.read_byte().unwrap();
    buf.read_byte().unwrap();
    assert!(matches!(buf.read_byte(), Err(ProtobufError::EndOfStream)));
}

#[test]
fn readable_streaming_data_reports_end_of_stream() {
    let source: &[u8] = &[1, 2, 3];
    let mut reader = ReadableStreamingData::new(source);
    assert_eq!(reader.read_byte().unwrap(), 1);
    assert_eq!(reader.read_byte().unwrap(), 2);
    assert_eq!(reader.read_byte().unwrap(), 3);
    assert!(matches!(reader.read_byte(), Err(ProtobufError::EndOfStream)));
}

#[test]
fn writable_streaming_data_flushes_to_underlying_sink() {
    let mut sink = Vec::new();
    {
        let mut writer = WritableStreamingData::new(&mut sink);
        writer.write_bytes(&[1, 2, 3, 4]).unwrap();
        writer.flush().unwrap();
    }
    assert_eq!(sink, vec![1, 2, 3, 4]);
}

#[test]
fn skip_n_bytes_consumes_exactly_n_on_a_streaming_source() {
    let source: &[u8] = &[1, 2, 3, 4, 5];
    let mut reader = ReadableStreamingData::new(source);
    reader.skip_n_bytes(3).unwrap();
    assert_eq!(reader.read_byte().unwrap(), 4);
}

#[test]
fn message_digest_sink_matches_direct_digest_of_same_bytes() {
    use digest::Digest;
    let payload = b"protobuf wire bytes";

    let mut sink: MessageDigestSink<Sha256> = MessageDigestSink::new();
    sink.write_bytes(payload).unwrap();
    let via_sink = sink.finalize();

    let mut direct = Sha256::new();
    direct.update(payload);
    let direct_digest = direct.finalize();

    assert_eq!(via_sink, direct_digest);
}

#[test]
fn push_pop_limit_brackets_a_nested_read() {
    let mut buf = BufferedData::wrap(vec![1, 2, 3, 4, 5]);
    let old_limit = buf.push_limit(2).unwrap();
    assert_eq!(buf.remaining(), 2);
    assert_eq!(buf.read_byte().unwrap(), 1);
    assert_eq!(buf.read_byte().unwrap(), 2);
    assert!(!buf.has_remaining());
    buf.pop_limit(old_limit);
    assert_eq!(buf.remaining(), 3);
    assert_eq!(buf.read_byte().unwrap(), 3);
}
