//! # RESP Decoder - Redis Serialization Protocol stream decoder
//!
//! A blocking decoder that turns a byte stream into RESP values.
//!
//! The five RESP2 types are supported: simple strings, errors, integers, bulk
//! strings and arrays. Null bulk strings (`$-1`) and null arrays (`*-1`) are
//! distinct from their empty counterparts.
//!
//! ## Features
//!
//! - **Any byte source**: decodes from anything implementing `std::io::Read`
//! - **Pipelining**: one decoder yields successive values from one stream
//! - **Binary safe**: bulk payloads may contain any byte, CRLF included
//! - **Bounded**: nesting depth, bulk size and line length limits
//!
//! ## Example
//!
//! ```rust
//! use resp_decoder::Decoder;
//! use resp_decoder::RespValue;
//!
//! let mut decoder = Decoder::new(&b"+OK\r\n:42\r\n"[..]);
//! assert_eq!(decoder.decode_next().unwrap().as_str(), Some("OK"));
//! assert_eq!(decoder.decode_next().unwrap(), RespValue::Integer(42));
//! ```

mod config;
mod decoder;
mod error;
mod types;
mod utils;

pub use config::DecoderConfig;
pub use decoder::Decoder;
pub use decoder::Values;
pub use decoder::decode;
pub use error::ParseError;
pub use error::ReadStage;
pub use error::RespError;
pub use types::RespType;
pub use types::RespValue;
