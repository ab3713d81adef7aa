//! Binary wire codec for message bodies.
//!
//! Scalars travel as `[tag:1][payload]` with tag ordinals fixed by
//! [`ObjectType`]; byte arrays as `[tag:1][length:4][bytes]`; maps as an
//! `i32` entry count followed by `(modified UTF-8 key, value)` pairs. All
//! numbers are big-endian.
//!
//! Running out of input is reported as [`JmsError::Eof`](crate::JmsError::Eof)
//! so callers can tell a short buffer from a corrupt one
//! ([`JmsError::Format`](crate::JmsError::Format)).

pub mod codec;
pub mod io;
pub mod value;

pub use codec::{
    decode_map, decode_value, encode_map, encode_value, read_map, read_value, write_byte_array,
    write_map, write_value,
};
pub use io::{WireReader, WireWriter};
pub use value::{ObjectType, Value};

#[cfg(test)]
mod tests;
