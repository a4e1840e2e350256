//! Adversarial input generation for compiler fuzzing.
//!
//! This crate provides:
//! - [`synth`] - Seeded token and literal synthesizers
//! - [`lexer`], [`parser`], [`types`], [`codegen`] - Stage strategy catalogs
//! - [`strategy`] - The closed [`Strategy`] enumeration over all catalogs
//!
//! # Example
//!
//! ```
//! use fuzz_gen::{Generator, TargetSelection};
//!
//! let mut generator = Generator::new(42);
//! let input = generator.next_input(TargetSelection::All);
//! assert!(input.len() <= input.strategy().max_len());
//! ```

pub mod codegen;
pub mod lexer;
pub mod parser;
pub mod strategy;
pub mod synth;
pub mod types;

pub use strategy::Strategy;
pub use synth::Synthesizer;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Hard ceiling on any generated input, in bytes.
pub const MAX_INPUT_BYTES: usize = 16 * 1024;

/// Compilation stage a strategy stresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Tokenization.
    Lexer,
    /// Syntax analysis.
    Parser,
    /// Type checking.
    Types,
    /// Code generation.
    Codegen,
}

impl Stage {
    /// All stages, in dispatch order.
    pub const ALL: &'static [Stage] = &[Self::Lexer, Self::Parser, Self::Types, Self::Codegen];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexer => write!(f, "lexer"),
            Self::Parser => write!(f, "parser"),
            Self::Types => write!(f, "types"),
            Self::Codegen => write!(f, "codegen"),
        }
    }
}

/// Which stages a campaign draws strategies from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetSelection {
    /// Pick a stage uniformly per input.
    #[default]
    All,
    /// Only this stage.
    Stage(Stage),
}

impl fmt::Display for TargetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Stage(stage) => write!(f, "{stage}"),
        }
    }
}

/// Error for an unrecognized `--target` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target {0:?} (expected lexer, parser, types, codegen, or all)")]
pub struct ParseTargetError(String);

impl FromStr for TargetSelection {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "lexer" => Ok(Self::Stage(Stage::Lexer)),
            "parser" => Ok(Self::Stage(Stage::Parser)),
            "types" => Ok(Self::Stage(Stage::Types)),
            "codegen" => Ok(Self::Stage(Stage::Codegen)),
            _ => Err(ParseTargetError(s.to_string())),
        }
    }
}

/// One generated input and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedInput {
    strategy: Strategy,
    bytes: Vec<u8>,
}

impl GeneratedInput {
    /// Wrap bytes produced outside a [`Generator`].
    #[must_use]
    pub fn new(strategy: Strategy, bytes: Vec<u8>) -> Self {
        Self { strategy, bytes }
    }

    /// Strategy that produced this input.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Raw input bytes, possibly not valid UTF-8.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Input as text, with invalid sequences replaced.
    #[must_use]
    pub fn to_text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the input has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Stage dispatcher that owns the campaign's random source.
#[derive(Debug, Clone)]
pub struct Generator {
    syn: Synthesizer,
}

impl Generator {
    /// Create a generator from an explicit seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            syn: Synthesizer::new(seed),
        }
    }

    /// Create a generator from an explicit seed, or from entropy if `None`.
    #[must_use]
    pub fn from_seed(seed: Option<u64>) -> Self {
        let syn = match seed {
            Some(seed) => Synthesizer::new(seed),
            None => Synthesizer::from_entropy(),
        };
        Self { syn }
    }

    /// Seed in effect for this generator.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.syn.seed()
    }

    /// Produce the next input for the given selection.
    pub fn next_input(&mut self, selection: TargetSelection) -> GeneratedInput {
        let stage = match selection {
            TargetSelection::All => *self.syn.pick(Stage::ALL),
            TargetSelection::Stage(stage) => stage,
        };
        let strategy = Strategy::choose(stage, &mut self.syn);
        let bytes = strategy.generate(&mut self.syn);
        debug_assert!(bytes.len() <= strategy.max_len());
        GeneratedInput { strategy, bytes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_selection() {
        assert_eq!("all".parse::<TargetSelection>().unwrap(), TargetSelection::All);
        assert_eq!(
            "lexer".parse::<TargetSelection>().unwrap(),
            TargetSelection::Stage(Stage::Lexer)
        );
        assert_eq!(
            "Types".parse::<TargetSelection>().unwrap(),
            TargetSelection::Stage(Stage::Types)
        );
        assert!("backend".parse::<TargetSelection>().is_err());
    }

    #[test]
    fn test_selection_display_roundtrip() {
        for text in ["all", "lexer", "parser", "types", "codegen"] {
            let selection: TargetSelection = text.parse().unwrap();
            assert_eq!(selection.to_string(), text);
        }
    }

    #[test]
    fn test_stage_selection_is_respected() {
        let mut generator = Generator::new(7);
        for _ in 0..200 {
            let input = generator.next_input(TargetSelection::Stage(Stage::Codegen));
            assert_eq!(input.strategy().stage(), Stage::Codegen);
        }
    }

    #[test]
    fn test_all_dispatches_to_every_stage() {
        let mut generator = Generator::new(8);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..400 {
            seen.insert(generator.next_input(TargetSelection::All).strategy().stage());
        }
        assert_eq!(seen.len(), Stage::ALL.len());
    }

    #[test]
    fn test_same_seed_same_sequence() {
        for selection in [TargetSelection::All, TargetSelection::Stage(Stage::Parser)] {
            let mut a = Generator::new(1234);
            let mut b = Generator::new(1234);
            for _ in 0..100 {
                assert_eq!(a.next_input(selection), b.next_input(selection));
            }
        }
    }

    #[test]
    fn test_entropy_seed_is_reported() {
        let generator = Generator::from_seed(None);
        let replay = Generator::from_seed(Some(generator.seed()));
        assert_eq!(generator.seed(), replay.seed());
    }

    #[test]
    fn test_inputs_never_exceed_ceiling() {
        let mut generator = Generator::new(99);
        for _ in 0..500 {
            let input = generator.next_input(TargetSelection::All);
            assert!(input.len() <= MAX_INPUT_BYTES);
            assert!(input.len() <= input.strategy().max_len());
        }
    }
}
