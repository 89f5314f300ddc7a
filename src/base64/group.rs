use thiserror::Error;

use super::alphabet::{classify, ALPHABET, PAD, PAD_BYTE};

/// Decode failure. Decoding is all-or-nothing: any error means no partial
/// output was produced for the failing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A byte outside the alphabet that is neither whitespace nor padding.
    #[error("invalid character {byte:#04x} at position {position}")]
    InvalidByte { position: usize, byte: u8 },

    /// A padding character in a position that must hold data.
    #[error("malformed padding at position {position}")]
    MalformedPadding { position: usize },

    /// Input ended with a partial quartet still buffered.
    #[error("truncated input: {remaining} symbol(s) left over")]
    TruncatedInput { remaining: usize },
}

impl DecodeError {
    /// Rewrite a quartet-relative position (0-3) from [`decode_quartet`]
    /// as a whole-input position, given where each buffered symbol came
    /// from.
    pub(crate) fn at_positions(self, positions: &[usize; 4]) -> DecodeError {
        match self {
            DecodeError::InvalidByte { position, byte } => DecodeError::InvalidByte {
                position: positions[position],
                byte,
            },
            DecodeError::MalformedPadding { position } => DecodeError::MalformedPadding {
                position: positions[position],
            },
            other => other,
        }
    }
}

impl From<DecodeError> for std::io::Error {
    fn from(e: DecodeError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    }
}

/// Encode up to three bytes as four Base64 symbols.
///
/// `sig` is the number of significant bytes (1-3); absent input bytes are
/// zero-filled and the last `3 - sig` output symbols become padding.
///
/// ```text
///           1         2
/// 012345678901234567890123  bit position in the packed word
/// 000000001111111122222222  source byte
/// |    ||    ||    ||    |  six-bit groups indexing ALPHABET
///  >>18  >>12  >> 6  >> 0   shift per output symbol
/// ```
#[inline]
pub fn encode_group(input: &[u8], sig: usize) -> [u8; 4] {
    debug_assert!(sig >= 1 && sig <= 3 && input.len() >= sig);

    let mut word: u32 = 0;
    for i in 0..sig {
        word |= (input[i] as u32) << (16 - 8 * i);
    }

    let mut out = [
        ALPHABET[(word >> 18) as usize & 0x3f],
        ALPHABET[(word >> 12) as usize & 0x3f],
        ALPHABET[(word >> 6) as usize & 0x3f],
        ALPHABET[word as usize & 0x3f],
    ];
    for slot in out.iter_mut().skip(sig + 1) {
        *slot = PAD_BYTE;
    }
    out
}

/// Decode four symbols into up to three bytes, honoring trailing padding.
/// Returns the reassembled bytes together with the significant-byte count.
///
/// Padding may appear only in the last two positions, and padding at
/// position 2 requires padding at position 3 as well; anything else is
/// malformed. Error positions are quartet-relative (0-3).
pub fn decode_quartet(quartet: &[u8; 4]) -> Result<([u8; 3], usize), DecodeError> {
    let sig = if quartet[2] == PAD_BYTE {
        if quartet[3] != PAD_BYTE {
            return Err(DecodeError::MalformedPadding { position: 2 });
        }
        1
    } else if quartet[3] == PAD_BYTE {
        2
    } else {
        3
    };

    let mut word: u32 = 0;
    for i in 0..=sig {
        let symbol = quartet[i];
        let value = classify(symbol);
        if value < 0 {
            return if value == PAD {
                Err(DecodeError::MalformedPadding { position: i })
            } else {
                Err(DecodeError::InvalidByte {
                    position: i,
                    byte: symbol,
                })
            };
        }
        word |= (value as u32) << (18 - 6 * i);
    }

    let bytes = [(word >> 16) as u8, (word >> 8) as u8, word as u8];
    Ok((bytes, sig))
}
