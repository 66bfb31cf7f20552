//! Tokenizer collaborator interface and a byte-level implementation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("Invalid token ID: {0}")]
    InvalidToken(u32),
}

/// Text to token-id mapping used by the harness.
///
/// The harness only relies on token counts and on the decode step costing
/// real work, so any tokenizer satisfying this contract can be plugged in.
pub trait Tokenizer {
    /// Encode text to token IDs.
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError>;

    /// Decode a batch of token-id sequences, skipping special tokens.
    fn batch_decode(&self, sequences: &[Vec<u32>]) -> Result<Vec<String>, TokenizerError>;

    /// Token used to pad prompts to a common length.
    fn pad_token(&self) -> u32;
}

/// Byte-level tokenizer: a BOS token followed by one id per UTF-8 byte.
///
/// Ids `0..256` are bytes; special tokens live above them.
#[derive(Debug, Clone)]
pub struct CharTokenizer {
    bos_token: u32,
    eos_token: u32,
    pad_token: u32,
    add_bos: bool,
}

impl CharTokenizer {
    const BYTE_VOCAB: u32 = 256;

    pub fn new(add_bos: bool) -> Self {
        Self {
            bos_token: Self::BYTE_VOCAB,
            eos_token: Self::BYTE_VOCAB + 1,
            // Pad reuses EOS, so padded rows decode cleanly.
            pad_token: Self::BYTE_VOCAB + 1,
            add_bos,
        }
    }

    pub fn bos_token(&self) -> u32 {
        self.bos_token
    }

    pub fn eos_token(&self) -> u32 {
        self.eos_token
    }

    pub fn vocab_size(&self) -> u32 {
        Self::BYTE_VOCAB + 2
    }

    /// Check if token is a special (non-byte) token.
    pub fn is_special(&self, token: u32) -> bool {
        token == self.bos_token || token == self.eos_token || token == self.pad_token
    }

    fn decode(&self, tokens: &[u32]) -> Result<String, TokenizerError> {
        let mut bytes = Vec::with_capacity(tokens.len());
        for &token in tokens {
            if token >= self.vocab_size() {
                return Err(TokenizerError::InvalidToken(token));
            }
            if self.is_special(token) {
                continue;
            }
            bytes.push(token as u8);
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Default for CharTokenizer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Tokenizer for CharTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
        let mut ids = Vec::with_capacity(text.len() + 1);
        if self.add_bos {
            ids.push(self.bos_token);
        }
        ids.extend(text.bytes().map(u32::from));
        Ok(ids)
    }

    fn batch_decode(&self, sequences: &[Vec<u32>]) -> Result<Vec<String>, TokenizerError> {
        sequences.iter().map(|seq| self.decode(seq)).collect()
    }

    fn pad_token(&self) -> u32 {
        self.pad_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_prepends_bos() {
        let tokenizer = CharTokenizer::default();
        let ids = tokenizer.encode("!!").unwrap();
        assert_eq!(ids, vec![tokenizer.bos_token(), 33, 33]);
    }

    #[test]
    fn encode_without_bos_counts_bytes() {
        let tokenizer = CharTokenizer::new(false);
        assert_eq!(tokenizer.encode("abc").unwrap().len(), 3);
        assert!(tokenizer.encode("").unwrap().is_empty());
    }

    #[test]
    fn batch_decode_skips_special_tokens() {
        let tokenizer = CharTokenizer::default();
        let pad = tokenizer.pad_token();
        let mut row = vec![pad, pad];
        row.extend(tokenizer.encode("hi").unwrap());

        let texts = tokenizer.batch_decode(&[row]).unwrap();
        assert_eq!(texts, vec!["hi".to_string()]);
    }

    #[test]
    fn decode_rejects_out_of_vocab() {
        let tokenizer = CharTokenizer::default();
        let err = tokenizer.batch_decode(&[vec![9999]]).unwrap_err();
        assert!(matches!(err, TokenizerError::InvalidToken(9999)));
    }
}
