//! Decoder limits and policies.
//!
//! [`DecoderConfig`] can be embedded in an application's own configuration
//! file. Missing fields fall back to their defaults:
//!
//! ```toml
//! max_depth = 32
//! strict_lengths = true
//! ```

use serde::Deserialize;
use serde::Serialize;

/// Default maximum array nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Default maximum bulk string payload (512 MiB)
pub const DEFAULT_MAX_BULK_LEN: usize = 512 * 1024 * 1024;
/// Default maximum line length (64 KiB)
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;
/// Default number of bytes requested from the source per read
pub const DEFAULT_READ_CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
	/// Deepest array nesting accepted. The outermost array has depth 1.
	pub max_depth: usize,
	/// Largest bulk string payload accepted, in bytes
	pub max_bulk_len: usize,
	/// Longest line accepted, excluding the CRLF
	pub max_line_len: usize,
	/// Reject negative lengths other than -1 instead of treating them as null
	pub strict_lengths: bool,
	/// Bytes requested from the source per read
	pub read_chunk_size: usize,
}

impl Default for DecoderConfig {
	fn default() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
			max_bulk_len: DEFAULT_MAX_BULK_LEN,
			max_line_len: DEFAULT_MAX_LINE_LEN,
			strict_lengths: false,
			read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
		}
	}
}

impl DecoderConfig {
	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn with_max_bulk_len(mut self, max_bulk_len: usize) -> Self {
		self.max_bulk_len = max_bulk_len;
		self
	}

	pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
		self.max_line_len = max_line_len;
		self
	}

	pub fn with_strict_lengths(mut self, strict: bool) -> Self {
		self.strict_lengths = strict;
		self
	}

	/// A chunk size of zero is raised to one byte.
	pub fn with_read_chunk_size(mut self, read_chunk_size: usize) -> Self {
		self.read_chunk_size = read_chunk_size.max(1);
		self
	}
}
