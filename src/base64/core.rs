use std::io::{self, Write};

use super::alphabet::{classify, INVALID, MAX_LINE_LENGTH, NEW_LINE, PAD_BYTE, WHITESPACE};
use super::group::{decode_quartet, encode_group, DecodeError};

/// Encode a byte slice into Base64 text with 76-column line wrapping.
///
/// A line feed is inserted after every 76 emitted symbols, never inside a
/// 4-symbol group and never after the final partial group. `encode(&[])`
/// is the empty string.
pub fn encode(data: &[u8]) -> String {
    let symbols = (data.len() + 2) / 3 * 4;
    let mut out = Vec::with_capacity(symbols + symbols / MAX_LINE_LENGTH);

    let mut line = 0usize;
    for chunk in data.chunks(3) {
        out.extend_from_slice(&encode_group(chunk, chunk.len()));
        if chunk.len() == 3 {
            line += 4;
            if line == MAX_LINE_LENGTH {
                out.push(NEW_LINE);
                line = 0;
            }
        }
    }

    // The alphabet and separators are pure ASCII.
    String::from_utf8(out).expect("base64 output is ASCII")
}

/// Decode Base64 text, skipping interleaved ASCII whitespace.
///
/// All-or-nothing: any byte outside the alphabet fails the whole call and
/// no partial output is returned. Decoding stops at the first quartet that
/// ends in padding; trailing input after it is ignored. Input ending with
/// a partial quartet is an error.
pub fn decode(text: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(text.len() * 3 / 4);
    let mut quartet = [0u8; 4];
    // Input positions of the buffered symbols, for error reporting.
    let mut positions = [0usize; 4];
    let mut held = 0usize;

    for (i, &raw) in text.iter().enumerate() {
        let symbol = raw & 0x7f;
        let class = classify(symbol);
        if class == WHITESPACE {
            continue;
        }
        if class == INVALID {
            return Err(DecodeError::InvalidByte {
                position: i,
                byte: raw,
            });
        }

        quartet[held] = symbol;
        positions[held] = i;
        held += 1;
        if held == 4 {
            let (bytes, sig) =
                decode_quartet(&quartet).map_err(|e| e.at_positions(&positions))?;
            out.extend_from_slice(&bytes[..sig]);
            held = 0;
            if quartet[3] == PAD_BYTE {
                break;
            }
        }
    }

    if held != 0 {
        return Err(DecodeError::TruncatedInput { remaining: held });
    }
    Ok(out)
}

/// Encode data and write the wrapped text to output.
pub fn encode_to_writer(data: &[u8], out: &mut impl Write) -> io::Result<()> {
    if data.is_empty() {
        return Ok(());
    }
    out.write_all(encode(data).as_bytes())
}

/// Decode base64 data and write to output.
/// When `ignore_garbage` is true, strip all non-base64 characters first.
/// When false, only whitespace is tolerated (standard behavior).
pub fn decode_to_writer(
    data: &[u8],
    ignore_garbage: bool,
    out: &mut impl Write,
) -> io::Result<()> {
    if data.is_empty() {
        return Ok(());
    }
    let decoded = if ignore_garbage {
        decode(&strip_non_base64(data))?
    } else {
        decode(data)?
    };
    out.write_all(&decoded)
}

/// Strip non-base64 characters (for -i / --ignore-garbage).
fn strip_non_base64(data: &[u8]) -> Vec<u8> {
    data.iter().copied().filter(|&b| is_base64_char(b)).collect()
}

/// Check if a byte is a valid base64 alphabet character or padding.
#[inline]
fn is_base64_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'='
}
