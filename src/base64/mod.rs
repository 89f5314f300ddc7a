pub mod alphabet;
pub mod core;
pub mod group;
pub mod stream;


pub use self::core::{decode, decode_to_writer, encode, encode_to_writer};
pub use self::group::{decode_quartet, encode_group, DecodeError};
pub use self::stream::{DecodeReader, DecodeWriter, EncodeReader, EncodeWriter};
