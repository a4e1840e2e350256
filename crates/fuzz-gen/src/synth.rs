//! Token and literal synthesizers.
//!
//! [`Synthesizer`] owns the campaign's only random source. Every strategy
//! draws from it, so a fixed seed reproduces the full input sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default identifier length bound.
pub const MAX_IDENTIFIER_LEN: usize = 20;

/// Upper bound on any [`Synthesizer::number`] output, in bytes.
///
/// The longest form is a small float printed without exponent
/// (`0.00000000000000011102230246251565`, 34 bytes).
pub const MAX_NUMBER_LEN: usize = 40;

/// Maximum characters between the quotes of a string literal.
pub const MAX_STRING_BODY_LEN: usize = 100;

/// Upper bound on any [`Synthesizer::string_literal`] output, quotes included.
pub const MAX_STRING_LITERAL_LEN: usize = MAX_STRING_BODY_LEN + 2;

/// Upper bound on any [`Synthesizer::keyword`] output.
pub const MAX_KEYWORD_LEN: usize = 6;

/// Upper bound on any [`Synthesizer::operator`] output.
pub const MAX_OPERATOR_LEN: usize = 2;

/// Upper bound on any [`Synthesizer::type_name`] output.
pub const MAX_TYPE_NAME_LEN: usize = MAX_IDENTIFIER_LEN;

/// Operator vocabulary.
pub const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "==", "!=", "<", ">", "<=", ">=", "&&", "||", "&", "|", "^", "<<",
    ">>", "=", "+=", "-=",
];

/// Reserved words of the target language.
pub const KEYWORDS: &[&str] = &[
    "func", "let", "const", "if", "else", "while", "for", "return", "struct", "import", "spawn",
    "match", "in", "mut", "pub",
];

/// Built-in type names.
pub const BUILTIN_TYPES: &[&str] = &["Int", "Float", "Bool", "Char", "String"];

/// Printable ASCII: digits, letters, punctuation, then whitespace.
pub const PRINTABLE: &[u8] = b"0123456789\
abcdefghijklmnopqrstuvwxyz\
ABCDEFGHIJKLMNOPQRSTUVWXYZ\
!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~ \t\n\r\x0b\x0c";

const IDENT_START: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
const IDENT_CONTINUE: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// Seeded producer of random tokens and literals.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    rng: StdRng,
    seed: u64,
}

impl Synthesizer {
    /// Create a synthesizer from an explicit seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a synthesizer with a seed drawn from OS entropy.
    ///
    /// The drawn seed is available through [`Synthesizer::seed`] so the run
    /// can be replayed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this synthesizer was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in `lo..=hi`.
    pub fn range(&mut self, lo: usize, hi: usize) -> usize {
        self.rng.gen_range(lo..=hi)
    }

    /// Fair coin.
    pub fn coin(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    /// Uniformly pick one element.
    ///
    /// # Panics
    ///
    /// Panics if `items` is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.gen_range(0..items.len())]
    }

    /// Random byte over the full `0..=255` range.
    pub fn byte(&mut self) -> u8 {
        self.rng.gen()
    }

    /// Random code point in `0..=0xFFFF`, surrogates included.
    pub fn bmp_code_point(&mut self) -> u32 {
        self.rng.gen_range(0..=0xFFFF)
    }

    /// Random printable ASCII character.
    pub fn printable_char(&mut self) -> char {
        char::from(*self.pick(PRINTABLE))
    }

    /// Identifier of length `1..=max_len`: letter or underscore, then
    /// letters, digits, or underscores.
    pub fn identifier(&mut self, max_len: usize) -> String {
        let len = self.range(1, max_len.max(1));
        let mut ident = String::with_capacity(len);
        ident.push(char::from(*self.pick(IDENT_START)));
        for _ in 1..len {
            ident.push(char::from(*self.pick(IDENT_CONTINUE)));
        }
        ident
    }

    /// Numeric literal: signed 64-bit decimal, float, hexadecimal, or binary.
    pub fn number(&mut self) -> String {
        match self.range(0, 3) {
            0 => self.rng.gen::<i64>().to_string(),
            1 => self.rng.gen::<f64>().to_string(),
            2 => format!("0x{:x}", self.rng.gen::<u64>()),
            _ => format!("0b{:b}", self.rng.gen::<u8>()),
        }
    }

    /// Body of a string literal: printable characters without `"` or `\`.
    pub fn string_body(&mut self) -> String {
        let len = self.range(0, MAX_STRING_BODY_LEN);
        let mut body = String::with_capacity(len);
        while body.len() < len {
            let c = self.printable_char();
            if c != '"' && c != '\\' {
                body.push(c);
            }
        }
        body
    }

    /// Double-quoted string literal.
    pub fn string_literal(&mut self) -> String {
        format!("\"{}\"", self.string_body())
    }

    /// Operator from [`OPERATORS`].
    pub fn operator(&mut self) -> &'static str {
        *self.pick(OPERATORS)
    }

    /// Keyword from [`KEYWORDS`].
    pub fn keyword(&mut self) -> &'static str {
        *self.pick(KEYWORDS)
    }

    /// Built-in type name or a random identifier.
    pub fn type_name(&mut self) -> String {
        // One slot per built-in plus one for a fresh identifier
        let slot = self.range(0, BUILTIN_TYPES.len());
        match BUILTIN_TYPES.get(slot) {
            Some(builtin) => (*builtin).to_string(),
            None => self.identifier(MAX_IDENTIFIER_LEN),
        }
    }
}
