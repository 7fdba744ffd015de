//! Wire constants and small parsing helpers shared by the decoder.

use crate::error::ParseError;

/// CRLF line ending
pub const CRLF: &[u8] = b"\r\n";

/// Type markers
pub const SIMPLE_STRING: u8 = b'+';
pub const ERROR: u8 = b'-';
pub const INTEGER: u8 = b':';
pub const BULK_STRING: u8 = b'$';
pub const ARRAY: u8 = b'*';

/// Length value denoting a null bulk string or null array
pub const NULL_LENGTH: i64 = -1;

/// Parse a base-10 signed integer from a byte slice
#[inline]
pub fn parse_integer(buf: &[u8]) -> Result<i64, ParseError> {
	let s = std::str::from_utf8(buf)
		.map_err(|_| ParseError::InvalidInteger(String::from_utf8_lossy(buf).into_owned()))?;
	s.parse::<i64>()
		.map_err(|e| ParseError::InvalidInteger(format!("{:?}: {}", s, e)))
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case(b"123", 123)]
	#[case(b"-456", -456)]
	#[case(b"0", 0)]
	#[case(b"-1", -1)]
	#[case(b"9223372036854775807", i64::MAX)]
	#[case(b"-9223372036854775808", i64::MIN)]
	fn test_parse_integer(#[case] input: &[u8], #[case] expected: i64) {
		assert_eq!(parse_integer(input).unwrap(), expected);
	}

	#[rstest]
	#[case(b"abc")]
	#[case(b"")]
	#[case(b"12a")]
	#[case(b"1.5")]
	#[case(b" 1")]
	#[case(b"9223372036854775808")]
	#[case(b"\xff\xfe")]
	fn test_parse_integer_invalid(#[case] input: &[u8]) {
		assert!(matches!(
			parse_integer(input),
			Err(ParseError::InvalidInteger(_))
		));
	}
}
