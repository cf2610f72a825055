//! Codec Module
//!
//! Decodes the tagged binary values stored inside records.
//!
//! ## Value Grammar
//! ```text
//! value   := [pad] tag payload          pad := 00 | 01
//! "  len:varint bytes[len]              single-byte string
//! c  len:varint bytes[len]              UTF-16LE string
//! N  u64 (8 bytes, LE)                  I  varint (low 32 bits, signed)
//! _  0                                  unit
//! F  T                                  booleans
//! o  (string value)* {                  object, `{` + 1 byte
//! A  n:varint value*n $                 array,  `$` + 2 bytes
//! a  n:varint (value value)*n @         pairs,  `@` + 2 bytes
//! ```

mod cursor;
mod decoder;
mod envelope;
pub mod text;
mod value;
pub mod varint;

pub use cursor::Cursor;
pub use decoder::{decode_record_body, decode_value, decode_value_with, DecodeOptions};
pub use envelope::{strip_envelope, Envelope, MESSAGE_SUBTYPES};
pub use value::{Closer, Value};
