/// Maximum line length (76) of Base64 output.
pub const MAX_LINE_LENGTH: usize = 76;

/// The padding character (=) as a byte.
pub const PAD_BYTE: u8 = b'=';

/// The line separator (\n) as a byte.
pub const NEW_LINE: u8 = b'\n';

/// The 64 symbols of the standard Base64 alphabet, indexed by 6-bit value.
pub const ALPHABET: [u8; 64] =
    *b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Sentinel: byte is outside the alphabet and is neither whitespace nor padding.
pub const INVALID: i8 = -9;

/// Sentinel: ASCII whitespace (space, tab, LF, CR), skipped on decode.
pub const WHITESPACE: i8 = -5;

/// Sentinel: the padding character.
pub const PAD: i8 = -1;

/// Inverse of `ALPHABET` over the low 7 bits of an input byte: a 6-bit
/// value (0-63) or one of the sentinels above. Built from `ALPHABET` at
/// compile time so the two tables cannot drift.
pub const DECODE_TABLE: [i8; 128] = build_decode_table();

const fn build_decode_table() -> [i8; 128] {
    let mut table = [INVALID; 128];
    table[b'\t' as usize] = WHITESPACE;
    table[b'\n' as usize] = WHITESPACE;
    table[b'\r' as usize] = WHITESPACE;
    table[b' ' as usize] = WHITESPACE;
    table[PAD_BYTE as usize] = PAD;
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as i8;
        i += 1;
    }
    table
}

/// Classify one input byte against the inverse table.
/// Only the low 7 bits are consulted; the 8th bit is masked off.
#[inline]
pub fn classify(byte: u8) -> i8 {
    DECODE_TABLE[(byte & 0x7f) as usize]
}
