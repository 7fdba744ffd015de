//! Error types for RESP decoding.

use std::fmt;
use std::io;

use thiserror::Error;

/// Main error type for RESP decoding.
///
/// Read failures and malformed input are kept apart so that a caller can tell
/// a truncated stream from a misbehaving peer.
#[derive(Error, Debug)]
pub enum RespError {
	/// The byte source ended or failed before the value was complete
	#[error("I/O error while {stage}: {source}")]
	Io {
		stage: ReadStage,
		#[source]
		source: io::Error,
	},

	/// The input does not follow the wire format
	#[error("Parse error: {0}")]
	Parse(#[from] ParseError),

	/// An element of an array failed to decode
	#[error("Error while reading array element {index}: {source}")]
	ArrayElement {
		index: usize,
		#[source]
		source: Box<RespError>,
	},
}

impl RespError {
	pub(crate) fn io(stage: ReadStage, source: io::Error) -> Self {
		RespError::Io { stage, source }
	}

	pub(crate) fn eof(stage: ReadStage) -> Self {
		RespError::Io {
			stage,
			source: io::Error::new(io::ErrorKind::UnexpectedEof, "unexpected end of input"),
		}
	}

	/// Innermost error, looking through array element wrappers.
	pub fn root_cause(&self) -> &RespError {
		let mut err = self;
		while let RespError::ArrayElement { source, .. } = err {
			err = source;
		}
		err
	}

	/// True when the source ran out of bytes before the value was complete.
	pub fn is_eof(&self) -> bool {
		matches!(
			self.root_cause(),
			RespError::Io { source, .. } if source.kind() == io::ErrorKind::UnexpectedEof
		)
	}

	/// The parse error at the root of this error, if any.
	pub fn parse_error(&self) -> Option<&ParseError> {
		match self.root_cause() {
			RespError::Parse(e) => Some(e),
			_ => None,
		}
	}
}

/// What the decoder was reading when the source failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStage {
	/// The leading type marker byte
	Marker,
	/// A CRLF terminated line
	Line,
	/// A bulk payload plus its trailing CRLF, in bytes
	Bulk(usize),
}

impl fmt::Display for ReadStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ReadStage::Marker => write!(f, "reading a type marker"),
			ReadStage::Line => write!(f, "reading a line"),
			ReadStage::Bulk(n) => write!(f, "reading {} bulk bytes", n),
		}
	}
}

/// Errors caused by malformed input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
	/// Leading byte is not one of `+ - : $ *`
	#[error("Invalid type marker: 0x{0:02X}")]
	InvalidTypeMarker(u8),

	/// Invalid integer value
	#[error("Invalid integer: {0}")]
	InvalidInteger(String),

	/// Negative bulk string length other than -1 (strict mode)
	#[error("Invalid bulk string length: {0}")]
	InvalidBulkStringLength(i64),

	/// Negative array length other than -1 (strict mode)
	#[error("Invalid array length: {0}")]
	InvalidArrayLength(i64),

	/// Bulk payload not followed by CRLF
	#[error("Missing CRLF after bulk string")]
	MissingTerminator,

	/// Declared bulk length exceeds the configured maximum
	#[error("Bulk string length {len} exceeds maximum of {max} bytes")]
	BulkStringTooLarge { len: i64, max: usize },

	/// No CRLF found within the configured maximum line length
	#[error("Line exceeds maximum length of {max} bytes")]
	LineTooLong { max: usize },

	/// Arrays nested deeper than the configured maximum
	#[error("Array nesting exceeds maximum depth of {max}")]
	NestingTooDeep { max: usize },
}
