//! Decoder error types.

use thiserror::Error;

/// Errors produced while decoding a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The buffer ended in the middle of an instruction.
    #[error("unexpected end of buffer at offset {offset:#x}")]
    EndOfBuffer {
        /// Offset of the byte that could not be read.
        offset: usize,
    },

    /// The opcode table has no entry for the bytes seen.
    #[error("unsupported opcode at offset {offset:#x}: {}", hex_bytes(.bytes))]
    UnsupportedOpcode {
        /// Offset of the first opcode byte.
        offset: usize,
        /// The opcode bytes consumed before giving up.
        bytes: Vec<u8>,
    },

    /// The requested architecture has no decoder.
    #[error("unsupported architecture: {0}")]
    UnsupportedArch(String),
}

impl DecodeError {
    pub(crate) fn end_of_buffer(offset: usize) -> Self {
        Self::EndOfBuffer { offset }
    }

    pub(crate) fn unsupported_opcode(offset: usize, bytes: Vec<u8>) -> Self {
        Self::UnsupportedOpcode { offset, bytes }
    }

    /// Returns true if this error can be swallowed at an instruction
    /// boundary: only a truncated trailing instruction qualifies.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::EndOfBuffer { .. })
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = DecodeError::end_of_buffer(3);
        assert_eq!(err.to_string(), "unexpected end of buffer at offset 0x3");

        let err = DecodeError::unsupported_opcode(0, vec![0x0f, 0x04]);
        assert_eq!(err.to_string(), "unsupported opcode at offset 0x0: 0f 04");
    }
}
