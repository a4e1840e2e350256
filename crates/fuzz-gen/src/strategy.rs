//! Closed catalog of every generation strategy.

use crate::codegen::CodegenStrategy;
use crate::lexer::LexerStrategy;
use crate::parser::ParserStrategy;
use crate::synth::Synthesizer;
use crate::types::TypeStrategy;
use crate::Stage;
use std::fmt;

/// A concrete generation strategy, tagged by the stage it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Tokenization stress.
    Lexer(LexerStrategy),
    /// Syntax stress.
    Parser(ParserStrategy),
    /// Semantic analysis stress.
    Types(TypeStrategy),
    /// Code generation stress.
    Codegen(CodegenStrategy),
}

impl Strategy {
    /// Stage this strategy targets.
    #[must_use]
    pub fn stage(self) -> Stage {
        match self {
            Self::Lexer(_) => Stage::Lexer,
            Self::Parser(_) => Stage::Parser,
            Self::Types(_) => Stage::Types,
            Self::Codegen(_) => Stage::Codegen,
        }
    }

    /// Strategy name without the stage prefix.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Lexer(s) => s.name(),
            Self::Parser(s) => s.name(),
            Self::Types(s) => s.name(),
            Self::Codegen(s) => s.name(),
        }
    }

    /// Documented upper bound on output size in bytes.
    #[must_use]
    pub fn max_len(self) -> usize {
        match self {
            Self::Lexer(s) => s.max_len(),
            Self::Parser(s) => s.max_len(),
            Self::Types(s) => s.max_len(),
            Self::Codegen(s) => s.max_len(),
        }
    }

    /// Produce one input.
    pub fn generate(self, syn: &mut Synthesizer) -> Vec<u8> {
        match self {
            Self::Lexer(s) => s.generate(syn),
            Self::Parser(s) => s.generate(syn),
            Self::Types(s) => s.generate(syn),
            Self::Codegen(s) => s.generate(syn),
        }
    }

    /// Number of strategies in a stage's catalog.
    #[must_use]
    pub fn catalog_len(stage: Stage) -> usize {
        match stage {
            Stage::Lexer => LexerStrategy::ALL.len(),
            Stage::Parser => ParserStrategy::ALL.len(),
            Stage::Types => TypeStrategy::ALL.len(),
            Stage::Codegen => CodegenStrategy::ALL.len(),
        }
    }

    /// Uniformly choose a strategy from one stage's catalog.
    pub fn choose(stage: Stage, syn: &mut Synthesizer) -> Self {
        match stage {
            Stage::Lexer => Self::Lexer(*syn.pick(LexerStrategy::ALL)),
            Stage::Parser => Self::Parser(*syn.pick(ParserStrategy::ALL)),
            Stage::Types => Self::Types(*syn.pick(TypeStrategy::ALL)),
            Stage::Codegen => Self::Codegen(*syn.pick(CodegenStrategy::ALL)),
        }
    }

    /// Every strategy across all stages.
    pub fn all() -> impl Iterator<Item = Strategy> {
        LexerStrategy::ALL
            .iter()
            .copied()
            .map(Self::Lexer)
            .chain(ParserStrategy::ALL.iter().copied().map(Self::Parser))
            .chain(TypeStrategy::ALL.iter().copied().map(Self::Types))
            .chain(CodegenStrategy::ALL.iter().copied().map(Self::Codegen))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.stage(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_INPUT_BYTES;

    #[test]
    fn test_every_strategy_respects_its_bound() {
        for strategy in Strategy::all() {
            assert!(strategy.max_len() <= MAX_INPUT_BYTES, "{strategy}");
            for seed in 0..64 {
                let mut syn = Synthesizer::new(seed);
                let out = strategy.generate(&mut syn);
                assert!(
                    out.len() <= strategy.max_len(),
                    "{strategy} produced {} bytes, bound {}",
                    out.len(),
                    strategy.max_len()
                );
                assert!(!out.is_empty(), "{strategy} produced empty input");
            }
        }
    }

    #[test]
    fn test_choose_stays_in_stage() {
        let mut syn = Synthesizer::new(5);
        for stage in Stage::ALL {
            for _ in 0..50 {
                assert_eq!(Strategy::choose(*stage, &mut syn).stage(), *stage);
            }
        }
    }

    #[test]
    fn test_choose_covers_catalog() {
        let mut syn = Synthesizer::new(6);
        for stage in Stage::ALL {
            let mut seen = std::collections::HashSet::new();
            for _ in 0..2_000 {
                seen.insert(Strategy::choose(*stage, &mut syn));
            }
            assert_eq!(seen.len(), Strategy::catalog_len(*stage), "{stage}");
        }
    }

    #[test]
    fn test_display_includes_stage() {
        let s = Strategy::Lexer(LexerStrategy::ByteSoup);
        assert_eq!(s.to_string(), "lexer/byte-soup");
        let s = Strategy::Codegen(CodegenStrategy::LargeMatch);
        assert_eq!(s.to_string(), "codegen/large-match");
    }

    #[test]
    fn test_all_lists_every_catalog() {
        let total: usize = Stage::ALL.iter().map(|s| Strategy::catalog_len(*s)).sum();
        assert_eq!(Strategy::all().count(), total);
    }
}
