use std::io;
use std::io::Read;

use bytes::Bytes;
use resp_decoder::Decoder;
use resp_decoder::DecoderConfig;
use resp_decoder::RespValue;
use rstest::rstest;

/// Simulates a socket that delivers at most `step` bytes per read.
struct ChunkedReader {
	data: Vec<u8>,
	pos: usize,
	step: usize,
}

impl ChunkedReader {
	fn new(data: &[u8], step: usize) -> Self {
		Self {
			data: data.to_vec(),
			pos: 0,
			step,
		}
	}
}

impl Read for ChunkedReader {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let remaining = &self.data[self.pos..];
		let n = remaining.len().min(buf.len()).min(self.step);
		buf[..n].copy_from_slice(&remaining[..n]);
		self.pos += n;
		Ok(n)
	}
}

/// Wire encoding used to check that decoding consumes exactly one value.
fn encode(value: &RespValue, out: &mut Vec<u8>) {
	match value {
		RespValue::SimpleString(s) => {
			out.push(b'+');
			out.extend_from_slice(s);
			out.extend_from_slice(b"\r\n");
		}
		RespValue::Error(e) => {
			out.push(b'-');
			out.extend_from_slice(e);
			out.extend_from_slice(b"\r\n");
		}
		RespValue::Integer(i) => out.extend_from_slice(format!(":{}\r\n", i).as_bytes()),
		RespValue::BulkString(b) => {
			out.extend_from_slice(format!("${}\r\n", b.len()).as_bytes());
			out.extend_from_slice(b);
			out.extend_from_slice(b"\r\n");
		}
		RespValue::NullBulkString => out.extend_from_slice(b"$-1\r\n"),
		RespValue::Array(items) => {
			out.extend_from_slice(format!("*{}\r\n", items.len()).as_bytes());
			for item in items {
				encode(item, out);
			}
		}
		RespValue::NullArray => out.extend_from_slice(b"*-1\r\n"),
	}
}

fn sample_values() -> Vec<RespValue> {
	vec![
		RespValue::simple_string("OK"),
		RespValue::simple_string(""),
		RespValue::error("ERR wrong number of arguments"),
		RespValue::integer(0),
		RespValue::integer(i64::MIN),
		RespValue::bulk_string("hello"),
		RespValue::bulk_string(""),
		RespValue::bulk_string(&b"\r\n\r\n$3\r\n*1\r\n"[..]),
		RespValue::NullBulkString,
		RespValue::array(vec![]),
		RespValue::NullArray,
		RespValue::array(vec![
			RespValue::bulk_string("SET"),
			RespValue::bulk_string("key"),
			RespValue::array(vec![RespValue::integer(-1), RespValue::NullArray]),
			RespValue::NullBulkString,
		]),
	]
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(7)]
#[case(4096)]
fn test_round_trip_with_exact_consumption(#[case] step: usize) {
	for value in sample_values() {
		let mut wire = Vec::new();
		encode(&value, &mut wire);
		wire.extend_from_slice(b"+next\r\n");

		let mut decoder = Decoder::new(ChunkedReader::new(&wire, step));
		assert_eq!(decoder.decode_next().unwrap(), value);
		assert_eq!(
			decoder.decode_next().unwrap(),
			RespValue::simple_string("next"),
			"decoding {:?} did not stop at its last byte",
			value
		);
		assert_eq!(decoder.try_decode_next().unwrap(), None);
	}
}

#[rstest]
#[case(1)]
#[case(5)]
#[case(64)]
fn test_pipelined_values(#[case] step: usize) {
	let values = sample_values();
	let mut wire = Vec::new();
	for value in &values {
		encode(value, &mut wire);
	}

	let mut decoder = Decoder::new(ChunkedReader::new(&wire, step));
	let decoded: Vec<RespValue> = decoder.values().collect::<Result<_, _>>().unwrap();
	assert_eq!(decoded, values);
}

#[test]
fn test_two_concatenated_values() {
	let mut decoder = Decoder::new(&b"*2\r\n:1\r\n:2\r\n$3\r\nfoo\r\n"[..]);

	assert_eq!(
		decoder.decode_next().unwrap(),
		RespValue::array(vec![RespValue::integer(1), RespValue::integer(2)])
	);
	assert_eq!(
		decoder.decode_next().unwrap(),
		RespValue::BulkString(Bytes::from("foo"))
	);
	assert!(decoder.decode_next().unwrap_err().is_eof());
}

#[test]
fn test_values_stop_after_error() {
	let mut decoder = Decoder::new(&b"+OK\r\n!oops\r\n+never\r\n"[..]);
	let mut values = decoder.values();

	assert_eq!(values.next().unwrap().unwrap(), RespValue::simple_string("OK"));
	assert!(values.next().unwrap().is_err());
	assert!(values.next().is_none());
}

#[test]
fn test_values_report_truncated_tail() {
	let mut decoder = Decoder::new(&b":1\r\n:2"[..]);
	let results: Vec<_> = decoder.values().collect();

	assert_eq!(results.len(), 2);
	assert_eq!(results[0].as_ref().unwrap(), &RespValue::integer(1));
	assert!(results[1].as_ref().unwrap_err().is_eof());
}

#[test]
fn test_large_bulk_across_many_reads() {
	let payload = vec![b'\n'; 100_000];
	let mut wire = format!("${}\r\n", payload.len()).into_bytes();
	wire.extend_from_slice(&payload);
	wire.extend_from_slice(b"\r\n");

	let config = DecoderConfig::default().with_read_chunk_size(1000);
	let mut decoder = Decoder::with_config(ChunkedReader::new(&wire, 777), config);
	assert_eq!(decoder.decode_next().unwrap(), RespValue::bulk_string(payload));
	assert!(decoder.buffered().is_empty());
}
