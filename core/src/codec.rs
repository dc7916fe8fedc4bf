use std::collections::HashMap;
use thiserror::Error;

/// Number of symbols in the hint alphabet.
pub const RADIX: u8 = 62;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("symbol '{0}' is not part of the base-62 alphabet")]
    InvalidSymbol(char),
    #[error("value {0} is outside 0..62")]
    InvalidValue(u8),
}

/// Bidirectional mapping between the 62 hint symbols and `0..62`.
///
/// Symbol ordering is `0-9`, then `a-z`, then `A-Z`.
#[derive(Debug, Clone)]
pub struct Base62Codec {
    forward: [char; RADIX as usize],
    reverse: HashMap<char, u8>,
}

impl Base62Codec {
    pub fn new() -> Self {
        let mut forward = ['0'; RADIX as usize];
        let symbols = ('0'..='9').chain('a'..='z').chain('A'..='Z');
        for (slot, symbol) in forward.iter_mut().zip(symbols) {
            *slot = symbol;
        }
        let reverse = forward
            .iter()
            .enumerate()
            .map(|(value, &symbol)| (symbol, value as u8))
            .collect();
        Self { forward, reverse }
    }

    pub fn encode(&self, value: u8) -> Result<char, CodecError> {
        self.forward
            .get(value as usize)
            .copied()
            .ok_or(CodecError::InvalidValue(value))
    }

    pub fn decode(&self, symbol: char) -> Result<u8, CodecError> {
        self.reverse
            .get(&symbol)
            .copied()
            .ok_or(CodecError::InvalidSymbol(symbol))
    }

    pub fn is_symbol(&self, symbol: char) -> bool {
        self.reverse.contains_key(&symbol)
    }
}

impl Default for Base62Codec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_value() {
        let codec = Base62Codec::new();
        for value in 0..RADIX {
            let symbol = codec.encode(value).unwrap();
            assert_eq!(codec.decode(symbol).unwrap(), value);
        }
    }

    #[test]
    fn round_trips_every_symbol() {
        let codec = Base62Codec::new();
        for symbol in ('0'..='9').chain('a'..='z').chain('A'..='Z') {
            let value = codec.decode(symbol).unwrap();
            assert_eq!(codec.encode(value).unwrap(), symbol);
        }
    }

    #[test]
    fn alphabet_ordering() {
        let codec = Base62Codec::new();
        assert_eq!(codec.encode(0).unwrap(), '0');
        assert_eq!(codec.encode(9).unwrap(), '9');
        assert_eq!(codec.encode(10).unwrap(), 'a');
        assert_eq!(codec.encode(35).unwrap(), 'z');
        assert_eq!(codec.encode(36).unwrap(), 'A');
        assert_eq!(codec.encode(61).unwrap(), 'Z');
    }

    #[test]
    fn rejects_foreign_input() {
        let codec = Base62Codec::new();
        assert_eq!(codec.decode('='), Err(CodecError::InvalidSymbol('=')));
        assert_eq!(codec.decode('é'), Err(CodecError::InvalidSymbol('é')));
        assert_eq!(codec.encode(RADIX), Err(CodecError::InvalidValue(RADIX)));
    }
}
