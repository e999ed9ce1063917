use crate::types::Token;

/// Non-space projection of a token sequence plus the map back to original
/// positions. Built once per input; read-only thereafter.
#[derive(Debug, Clone)]
pub struct SpaceStripped {
    /// Positions of the non-space tokens in the original sequence
    /// (position-in-projection -> position-in-original).
    pub index_map: Vec<usize>,
    /// Texts of the non-space tokens, in order.
    pub symbols: Vec<String>,
}

impl SpaceStripped {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Split a phoneme string into tokens, preserving whitespace: every maximal
/// run of non-whitespace characters is one token and every individual
/// whitespace character is its own token (two consecutive spaces yield two
/// space tokens). Concatenating all token texts reproduces the input exactly.
///
/// Phoneme symbols may be multi-byte IPA; they are kept as opaque atomic
/// units, never decomposed.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run_start: Option<usize> = None;

    for (byte_idx, ch) in input.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = run_start.take() {
                push_token(&mut tokens, &input[start..byte_idx], false);
            }
            push_token(&mut tokens, &input[byte_idx..byte_idx + ch.len_utf8()], true);
        } else if run_start.is_none() {
            run_start = Some(byte_idx);
        }
    }
    if let Some(start) = run_start {
        push_token(&mut tokens, &input[start..], false);
    }

    tokens
}

fn push_token(tokens: &mut Vec<Token>, text: &str, is_space: bool) {
    let index = tokens.len();
    tokens.push(Token {
        text: text.to_string(),
        index,
        is_space,
    });
}

/// Derive the space-stripped projection of a token sequence. Pure, O(n).
pub fn strip_spaces(tokens: &[Token]) -> SpaceStripped {
    let mut index_map = Vec::with_capacity(tokens.len());
    let mut symbols = Vec::with_capacity(tokens.len());
    for token in tokens.iter().filter(|token| !token.is_space) {
        index_map.push(token.index);
        symbols.push(token.text.clone());
    }
    SpaceStripped { index_map, symbols }
}
