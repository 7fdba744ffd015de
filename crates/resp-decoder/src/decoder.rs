//! Blocking RESP decoder over any [`std::io::Read`] source.

use std::io;
use std::io::Read;

use bytes::Buf;
use bytes::Bytes;
use bytes::BytesMut;
use log::debug;
use log::trace;
use memchr::memchr;

use crate::config::DecoderConfig;
use crate::error::ParseError;
use crate::error::ReadStage;
use crate::error::RespError;
use crate::types::RespType;
use crate::types::RespValue;
use crate::utils::*;

/// Upper bound on array elements reserved ahead of decoding them.
const MAX_PREALLOC_ELEMENTS: usize = 1024;

/// Decodes successive RESP values from a byte source.
///
/// The decoder keeps its own read buffer. Bytes pulled from the source beyond
/// the end of a value stay buffered for the next call, so one decoder can be
/// driven over a pipelined stream.
pub struct Decoder<R> {
	reader: R,
	buffer: BytesMut,
	config: DecoderConfig,
}

impl<R: Read> Decoder<R> {
	pub fn new(reader: R) -> Self {
		Self::with_config(reader, DecoderConfig::default())
	}

	pub fn with_config(reader: R, config: DecoderConfig) -> Self {
		Self {
			reader,
			buffer: BytesMut::new(),
			config,
		}
	}

	pub fn config(&self) -> &DecoderConfig {
		&self.config
	}

	/// Bytes read from the source but not consumed by a decoded value yet.
	pub fn buffered(&self) -> &[u8] {
		&self.buffer
	}

	pub fn get_ref(&self) -> &R {
		&self.reader
	}

	pub fn get_mut(&mut self) -> &mut R {
		&mut self.reader
	}

	/// Returns the source. Buffered bytes are dropped.
	pub fn into_inner(self) -> R {
		self.reader
	}

	/// Decode exactly one value.
	///
	/// On success the decoder is positioned at the first byte of the next
	/// value. On failure nothing is returned and the stream position is
	/// unspecified.
	pub fn decode_next(&mut self) -> Result<RespValue, RespError> {
		let value = self.decode_value(0)?;
		trace!(
			"Decoded '{}' value, {} bytes still buffered",
			value.value_type().marker() as char,
			self.buffer.len()
		);
		Ok(value)
	}

	/// Like [`Decoder::decode_next`], but returns `Ok(None)` when the source
	/// ends cleanly between two values.
	pub fn try_decode_next(&mut self) -> Result<Option<RespValue>, RespError> {
		if self.buffer.is_empty() && self.fill(ReadStage::Marker)? == 0 {
			return Ok(None);
		}
		self.decode_next().map(Some)
	}

	/// Iterate over the values left in the stream.
	///
	/// Iteration ends at a clean end of input, or after yielding the first
	/// error.
	pub fn values(&mut self) -> Values<'_, R> {
		Values {
			decoder: self,
			done: false,
		}
	}

	/// `depth` is the number of arrays enclosing this value.
	fn decode_value(&mut self, depth: usize) -> Result<RespValue, RespError> {
		let marker = self.read_marker()?;
		let Some(resp_type) = RespType::from_marker(marker) else {
			debug!("Invalid RESP type marker 0x{:02X}", marker);
			return Err(ParseError::InvalidTypeMarker(marker).into());
		};

		match resp_type {
			RespType::SimpleString => Ok(RespValue::SimpleString(self.read_line()?)),
			RespType::Error => Ok(RespValue::Error(self.read_line()?)),
			RespType::Integer => Ok(RespValue::Integer(self.read_integer()?)),
			RespType::BulkString => self.decode_bulk_string(),
			RespType::Array => self.decode_array(depth + 1),
		}
	}

	fn decode_bulk_string(&mut self) -> Result<RespValue, RespError> {
		let length = self.read_integer()?;
		if length < 0 {
			return self.negative_length(
				length,
				RespValue::NullBulkString,
				ParseError::InvalidBulkStringLength,
			);
		}

		let max = self.config.max_bulk_len;
		let too_large = || {
			debug!("Rejecting bulk string of {} bytes (max {})", length, max);
			RespError::from(ParseError::BulkStringTooLarge { len: length, max })
		};
		let length = usize::try_from(length)
			.ok()
			.filter(|len| *len <= max)
			.ok_or_else(too_large)?;
		let total = length.checked_add(CRLF.len()).ok_or_else(too_large)?;

		self.fill_to(total, ReadStage::Bulk(total))?;

		if &self.buffer[length..total] != CRLF {
			debug!("Bulk string of {} bytes is not followed by CRLF", length);
			return Err(ParseError::MissingTerminator.into());
		}

		let data = self.buffer.split_to(length).freeze();
		self.buffer.advance(CRLF.len());
		Ok(RespValue::BulkString(data))
	}

	fn decode_array(&mut self, depth: usize) -> Result<RespValue, RespError> {
		if depth > self.config.max_depth {
			debug!("Array nesting exceeds {} levels", self.config.max_depth);
			return Err(ParseError::NestingTooDeep {
				max: self.config.max_depth,
			}
			.into());
		}

		let length = self.read_integer()?;
		if length < 0 {
			return self.negative_length(length, RespValue::NullArray, ParseError::InvalidArrayLength);
		}
		let length =
			usize::try_from(length).map_err(|_| ParseError::InvalidArrayLength(length))?;

		let mut elements = Vec::with_capacity(length.min(MAX_PREALLOC_ELEMENTS));
		for index in 0..length {
			let element = self
				.decode_value(depth)
				.map_err(|e| RespError::ArrayElement {
					index,
					source: Box::new(e),
				})?;
			elements.push(element);
		}

		Ok(RespValue::Array(elements))
	}

	/// Lengths below zero mean null. In strict mode only -1 does.
	fn negative_length(
		&self,
		length: i64,
		null: RespValue,
		invalid: fn(i64) -> ParseError,
	) -> Result<RespValue, RespError> {
		if self.config.strict_lengths && length != NULL_LENGTH {
			debug!("Rejecting negative length {}", length);
			return Err(invalid(length).into());
		}
		Ok(null)
	}

	fn read_marker(&mut self) -> Result<u8, RespError> {
		if self.buffer.is_empty() && self.fill(ReadStage::Marker)? == 0 {
			return Err(RespError::eof(ReadStage::Marker));
		}
		Ok(self.buffer.get_u8())
	}

	fn read_integer(&mut self) -> Result<i64, RespError> {
		let line = self.read_line()?;
		Ok(parse_integer(&line)?)
	}

	/// Read up to the next CRLF and return the bytes before it.
	///
	/// A `\n` not preceded by `\r` belongs to the line. Bytes already scanned
	/// are not scanned again after a refill.
	fn read_line(&mut self) -> Result<Bytes, RespError> {
		let max = self.config.max_line_len;
		let mut scanned = 0;

		loop {
			while let Some(pos) = memchr(b'\n', &self.buffer[scanned..]) {
				let newline = scanned + pos;
				if newline > 0 && self.buffer[newline - 1] == b'\r' {
					let line_len = newline - 1;
					if line_len > max {
						debug!("Line of {} bytes exceeds maximum of {}", line_len, max);
						return Err(ParseError::LineTooLong { max }.into());
					}
					let line = self.buffer.split_to(line_len).freeze();
					self.buffer.advance(CRLF.len());
					return Ok(line);
				}
				scanned = newline + 1;
			}
			scanned = self.buffer.len();

			// A terminator can no longer start within the limit
			if scanned > max.saturating_add(1) {
				debug!("No CRLF within {} bytes", max);
				return Err(ParseError::LineTooLong { max }.into());
			}

			if self.fill(ReadStage::Line)? == 0 {
				return Err(RespError::eof(ReadStage::Line));
			}
		}
	}

	/// Keep reading until at least `len` bytes are buffered.
	fn fill_to(&mut self, len: usize, stage: ReadStage) -> Result<(), RespError> {
		while self.buffer.len() < len {
			if self.fill(stage)? == 0 {
				return Err(RespError::eof(stage));
			}
		}
		Ok(())
	}

	/// One read from the source into the tail of the buffer. Returns the
	/// number of bytes read, zero at end of input.
	fn fill(&mut self, stage: ReadStage) -> Result<usize, RespError> {
		let start = self.buffer.len();
		let chunk = self.config.read_chunk_size.max(1);
		self.buffer.resize(start + chunk, 0);

		loop {
			match self.reader.read(&mut self.buffer[start..]) {
				Ok(n) => {
					self.buffer.truncate(start + n);
					trace!("Read {} bytes from source", n);
					return Ok(n);
				}
				Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
				Err(e) => {
					self.buffer.truncate(start);
					debug!("Source read failed while {}: {}", stage, e);
					return Err(RespError::io(stage, e));
				}
			}
		}
	}
}

/// Iterator returned by [`Decoder::values`].
pub struct Values<'a, R> {
	decoder: &'a mut Decoder<R>,
	done: bool,
}

impl<R: Read> Iterator for Values<'_, R> {
	type Item = Result<RespValue, RespError>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}
		match self.decoder.try_decode_next() {
			Ok(Some(value)) => Some(Ok(value)),
			Ok(None) => {
				self.done = true;
				None
			}
			Err(e) => {
				self.done = true;
				Some(Err(e))
			}
		}
	}
}

/// Convenience function for one-off decoding.
/// Decodes the first value in `input`; trailing bytes are ignored.
pub fn decode(input: &[u8]) -> Result<RespValue, RespError> {
	Decoder::new(input).decode_next()
}
