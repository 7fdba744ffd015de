use std::collections::VecDeque;
use std::io;
use std::io::Read;

use log::error;
use log::info;
use resp_decoder::Decoder;
use resp_decoder::DecoderConfig;

/// Hands out one pre-cut chunk per read, like a socket delivering segments.
/// A chunk larger than the caller's buffer is delivered over several reads.
struct Fragmented {
	chunks: VecDeque<&'static [u8]>,
}

impl Read for Fragmented {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let Some(chunk) = self.chunks.pop_front() else {
			return Ok(0);
		};
		let n = chunk.len().min(buf.len());
		buf[..n].copy_from_slice(&chunk[..n]);
		if n < chunk.len() {
			self.chunks.push_front(&chunk[n..]);
		}
		Ok(n)
	}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	telemetry::logger::init_from_env("resp_decoder=trace,info")?;

	info!("--- RESP Streaming Decode Example ---");

	// We are sending:
	// - A Simple String: "+OK\r\n"
	// - An Integer: ":1000\r\n"
	// - An Array: "*2\r\n$3\r\nSET\r\n$3\r\nkey\r\n"
	// - A Null Bulk String: "$-1\r\n"
	// But split into arbitrary chunks.
	let data_chunks = VecDeque::from([
		b"+O".as_slice(),
		b"K\r\n:1".as_slice(),
		b"00".as_slice(),
		b"0\r\n*2\r\n$3\r\nSE".as_slice(),
		b"T\r\n$3\r\nk".as_slice(),
		b"ey\r\n$-".as_slice(),
		b"1\r\n".as_slice(),
	]);

	let source = Fragmented {
		chunks: data_chunks,
	};
	let mut decoder = Decoder::with_config(source, DecoderConfig::default().with_max_depth(8));

	for result in decoder.values() {
		match result {
			Ok(value) => info!("[Decoder] Complete: {:?}", value),
			Err(e) => {
				error!("[Decoder] Error: {}", e);
				return Err(e.into());
			}
		}
	}

	info!("[Decoder] Stream ended cleanly");
	Ok(())
}
