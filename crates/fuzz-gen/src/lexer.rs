//! Lexer-targeted strategies.
//!
//! Inputs here stress tokenization: raw soups, oversized tokens, NUL
//! bytes, unterminated literals and comments, and code points a lexer
//! may not expect (including lone surrogates encoded as raw bytes).

use crate::synth::{
    Synthesizer, MAX_IDENTIFIER_LEN, MAX_KEYWORD_LEN, MAX_NUMBER_LEN, MAX_OPERATOR_LEN,
    MAX_STRING_BODY_LEN,
};

/// Longest character or byte soup.
pub const MAX_SOUP_LEN: usize = 10_000;

/// Code points in a unicode chaos input.
pub const CHAOS_CODE_POINTS: usize = 100;

const EMOJI: &[&str] = &["\u{1F680}", "\u{1F480}", "\u{1F525}", "\u{1F980}", "\u{1F47E}"];

/// Lexer strategy catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexerStrategy {
    /// 1..=10 000 printable ASCII characters.
    CharSoup,
    /// 1..=10 000 arbitrary bytes.
    ByteSoup,
    /// `let` binding with a 1 000..=10 000 character identifier.
    LongIdentifier,
    /// `let` binding with a 100..=1 000 digit number.
    LongNumber,
    /// `let` binding with a 1 000..=10 000 character string.
    LongString,
    /// 10..=100 random identifiers, operators, numbers, and keywords.
    TokenMix,
    /// NUL bytes between `=` and an otherwise valid literal.
    NullBytes,
    /// String literal with no closing quote.
    UnterminatedString,
    /// 10..=100 nested comment openers and a single closer.
    NestedComments,
    /// 100 code points from U+0000..=U+FFFF, surrogates included.
    UnicodeChaos,
    /// Emoji used as identifiers.
    EmojiIdentifiers,
}

impl LexerStrategy {
    /// Every lexer strategy, in selection order.
    pub const ALL: &'static [LexerStrategy] = &[
        Self::CharSoup,
        Self::ByteSoup,
        Self::LongIdentifier,
        Self::LongNumber,
        Self::LongString,
        Self::TokenMix,
        Self::NullBytes,
        Self::UnterminatedString,
        Self::NestedComments,
        Self::UnicodeChaos,
        Self::EmojiIdentifiers,
    ];

    /// Stable kebab-case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CharSoup => "char-soup",
            Self::ByteSoup => "byte-soup",
            Self::LongIdentifier => "long-identifier",
            Self::LongNumber => "long-number",
            Self::LongString => "long-string",
            Self::TokenMix => "token-mix",
            Self::NullBytes => "null-bytes",
            Self::UnterminatedString => "unterminated-string",
            Self::NestedComments => "nested-comments",
            Self::UnicodeChaos => "unicode-chaos",
            Self::EmojiIdentifiers => "emoji-identifiers",
        }
    }

    /// Maximum output size in bytes.
    #[must_use]
    pub fn max_len(self) -> usize {
        let token = MAX_NUMBER_LEN
            .max(MAX_IDENTIFIER_LEN)
            .max(MAX_KEYWORD_LEN)
            .max(MAX_OPERATOR_LEN);
        match self {
            Self::CharSoup | Self::ByteSoup => MAX_SOUP_LEN,
            // "let " + ident + " = 1"
            Self::LongIdentifier => 4 + 10_000 + 4,
            // "let x = " + digits
            Self::LongNumber => 8 + 1_000,
            // "let s = \"" + body + "\""
            Self::LongString => 9 + 10_000 + 1,
            // tokens separated by single spaces
            Self::TokenMix => 100 * (token + 1),
            // "let " + ident + " = " + NULs + number
            Self::NullBytes => 4 + MAX_IDENTIFIER_LEN + 3 + 10 + MAX_NUMBER_LEN,
            // "let " + ident + " = \"" + body
            Self::UnterminatedString => 4 + MAX_IDENTIFIER_LEN + 4 + MAX_STRING_BODY_LEN,
            // "/* " * n + " */"
            Self::NestedComments => 3 * 100 + 3,
            Self::UnicodeChaos => 3 * CHAOS_CODE_POINTS,
            // "let " + emoji + " = " + number + " + " + emoji
            Self::EmojiIdentifiers => 4 + 4 + 3 + MAX_NUMBER_LEN + 3 + 4,
        }
    }

    /// Produce one input.
    pub fn generate(self, syn: &mut Synthesizer) -> Vec<u8> {
        match self {
            Self::CharSoup => {
                let len = syn.range(1, MAX_SOUP_LEN);
                (0..len).map(|_| syn.printable_char()).collect::<String>().into_bytes()
            }
            Self::ByteSoup => {
                let len = syn.range(1, MAX_SOUP_LEN);
                (0..len).map(|_| syn.byte()).collect()
            }
            Self::LongIdentifier => {
                let len = syn.range(1_000, 10_000);
                format!("let {} = 1", "a".repeat(len)).into_bytes()
            }
            Self::LongNumber => {
                let len = syn.range(100, 1_000);
                format!("let x = {}", "9".repeat(len)).into_bytes()
            }
            Self::LongString => {
                let len = syn.range(1_000, 10_000);
                format!("let s = \"{}\"", "x".repeat(len)).into_bytes()
            }
            Self::TokenMix => {
                let count = syn.range(10, 100);
                let tokens: Vec<String> = (0..count)
                    .map(|_| match syn.range(0, 3) {
                        0 => syn.identifier(MAX_IDENTIFIER_LEN),
                        1 => syn.operator().to_string(),
                        2 => syn.number(),
                        _ => syn.keyword().to_string(),
                    })
                    .collect();
                tokens.join(" ").into_bytes()
            }
            Self::NullBytes => {
                let name = syn.identifier(MAX_IDENTIFIER_LEN);
                let nuls = "\0".repeat(syn.range(1, 10));
                let value = syn.number();
                format!("let {name} = {nuls}{value}").into_bytes()
            }
            Self::UnterminatedString => {
                let name = syn.identifier(MAX_IDENTIFIER_LEN);
                let body = syn.string_body();
                format!("let {name} = \"{body}").into_bytes()
            }
            Self::NestedComments => {
                let depth = syn.range(10, 100);
                format!("{} */", "/* ".repeat(depth)).into_bytes()
            }
            Self::UnicodeChaos => {
                let mut out = Vec::with_capacity(3 * CHAOS_CODE_POINTS);
                for _ in 0..CHAOS_CODE_POINTS {
                    encode_bmp(syn.bmp_code_point(), &mut out);
                }
                out
            }
            Self::EmojiIdentifiers => {
                let lhs = syn.pick(EMOJI);
                let value = syn.number();
                let rhs = syn.pick(EMOJI);
                format!("let {lhs} = {value} + {rhs}").into_bytes()
            }
        }
    }
}

/// Encode a BMP code point with the UTF-8 bit layout, without rejecting
/// surrogates. Lone surrogates come out as the 3-byte `ED A0..BF xx` form.
// Each shifted value is masked to fit its byte, so the casts are lossless.
#[allow(clippy::cast_possible_truncation)]
fn encode_bmp(cp: u32, out: &mut Vec<u8>) {
    if cp < 0x80 {
        out.push(cp as u8);
    } else if cp < 0x800 {
        out.push(0xC0 | (cp >> 6) as u8);
        out.push(0x80 | (cp & 0x3F) as u8);
    } else {
        out.push(0xE0 | ((cp >> 12) & 0x0F) as u8);
        out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
        out.push(0x80 | (cp & 0x3F) as u8);
    }
}
