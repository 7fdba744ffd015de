//! RESP data types and value representation.

use bytes::Bytes;

use crate::utils::ARRAY;
use crate::utils::BULK_STRING;
use crate::utils::ERROR;
use crate::utils::INTEGER;
use crate::utils::SIMPLE_STRING;

/// Type tag of a [`RespValue`], one per wire marker byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RespType {
	SimpleString,
	Error,
	Integer,
	BulkString,
	Array,
}

impl RespType {
	/// The marker byte that introduces this type on the wire
	pub fn marker(self) -> u8 {
		match self {
			RespType::SimpleString => SIMPLE_STRING,
			RespType::Error => ERROR,
			RespType::Integer => INTEGER,
			RespType::BulkString => BULK_STRING,
			RespType::Array => ARRAY,
		}
	}

	/// Look up the type introduced by a marker byte
	pub fn from_marker(marker: u8) -> Option<RespType> {
		match marker {
			SIMPLE_STRING => Some(RespType::SimpleString),
			ERROR => Some(RespType::Error),
			INTEGER => Some(RespType::Integer),
			BULK_STRING => Some(RespType::BulkString),
			ARRAY => Some(RespType::Array),
			_ => None,
		}
	}
}

/// Represents a decoded RESP value.
///
/// Null bulk strings and null arrays have their own variants so they never
/// compare equal to an empty payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RespValue {
	/// Simple string: `+OK\r\n`
	SimpleString(Bytes),

	/// Error: `-ERR message\r\n`
	Error(Bytes),

	/// Integer: `:1000\r\n`
	Integer(i64),

	/// Bulk string: `$6\r\nfoobar\r\n`
	BulkString(Bytes),

	/// Null bulk string: `$-1\r\n`
	NullBulkString,

	/// Array: `*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n`
	Array(Vec<RespValue>),

	/// Null array: `*-1\r\n`
	NullArray,
}

impl RespValue {
	/// The type tag. Null variants report their non-null counterpart.
	pub fn value_type(&self) -> RespType {
		match self {
			RespValue::SimpleString(_) => RespType::SimpleString,
			RespValue::Error(_) => RespType::Error,
			RespValue::Integer(_) => RespType::Integer,
			RespValue::BulkString(_) | RespValue::NullBulkString => RespType::BulkString,
			RespValue::Array(_) | RespValue::NullArray => RespType::Array,
		}
	}

	/// Check if the value is an error
	pub fn is_error(&self) -> bool {
		matches!(self, RespValue::Error(_))
	}

	/// Check if the value is a null bulk string or a null array
	pub fn is_null(&self) -> bool {
		matches!(self, RespValue::NullBulkString | RespValue::NullArray)
	}

	/// Try to convert to a string slice
	pub fn as_str(&self) -> Option<&str> {
		match self {
			RespValue::SimpleString(s) | RespValue::BulkString(s) => std::str::from_utf8(s).ok(),
			_ => None,
		}
	}

	/// Try to convert to bytes
	pub fn as_bytes(&self) -> Option<&Bytes> {
		match self {
			RespValue::SimpleString(b) | RespValue::BulkString(b) => Some(b),
			_ => None,
		}
	}

	/// Error message carried by an `Error` value
	pub fn as_error(&self) -> Option<&Bytes> {
		match self {
			RespValue::Error(e) => Some(e),
			_ => None,
		}
	}

	/// Try to convert to integer
	pub fn as_integer(&self) -> Option<i64> {
		match self {
			RespValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	/// Try to convert to array
	pub fn as_array(&self) -> Option<&[RespValue]> {
		match self {
			RespValue::Array(a) => Some(a),
			_ => None,
		}
	}

	/// Convert to String with lossy UTF-8 conversion
	pub fn to_string_lossy(&self) -> Option<String> {
		match self {
			RespValue::SimpleString(s) | RespValue::BulkString(s) | RespValue::Error(s) => {
				Some(String::from_utf8_lossy(s).into_owned())
			}
			_ => None,
		}
	}

	/// Try to consume and convert to Vec<RespValue>
	pub fn into_vec(self) -> Option<Vec<RespValue>> {
		match self {
			RespValue::Array(a) => Some(a),
			_ => None,
		}
	}

	/// Create a simple string value
	pub fn simple_string(s: impl Into<Bytes>) -> Self {
		RespValue::SimpleString(s.into())
	}

	/// Create a bulk string value
	pub fn bulk_string(s: impl Into<Bytes>) -> Self {
		RespValue::BulkString(s.into())
	}

	/// Create an error value
	pub fn error(e: impl Into<Bytes>) -> Self {
		RespValue::Error(e.into())
	}

	/// Create an integer value
	pub fn integer(i: i64) -> Self {
		RespValue::Integer(i)
	}

	/// Create an array value from an iterator
	pub fn array(items: impl IntoIterator<Item = RespValue>) -> Self {
		RespValue::Array(items.into_iter().collect())
	}

	pub fn null_bulk_string() -> Self {
		RespValue::NullBulkString
	}

	pub fn null_array() -> Self {
		RespValue::NullArray
	}
}

impl From<&str> for RespValue {
	fn from(s: &str) -> Self {
		RespValue::BulkString(Bytes::copy_from_slice(s.as_bytes()))
	}
}

impl From<String> for RespValue {
	fn from(s: String) -> Self {
		RespValue::BulkString(Bytes::from(s))
	}
}

impl From<&[u8]> for RespValue {
	fn from(b: &[u8]) -> Self {
		RespValue::BulkString(Bytes::copy_from_slice(b))
	}
}

impl From<Vec<u8>> for RespValue {
	fn from(v: Vec<u8>) -> Self {
		RespValue::BulkString(Bytes::from(v))
	}
}

impl From<Bytes> for RespValue {
	fn from(b: Bytes) -> Self {
		RespValue::BulkString(b)
	}
}

impl From<i64> for RespValue {
	fn from(i: i64) -> Self {
		RespValue::Integer(i)
	}
}

impl<T: Into<RespValue>> From<Vec<T>> for RespValue {
	fn from(v: Vec<T>) -> Self {
		RespValue::Array(v.into_iter().map(|x| x.into()).collect())
	}
}
