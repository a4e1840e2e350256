//! Type-checker-targeted strategies.
//!
//! These inputs are mostly well-formed syntax that should reach semantic
//! analysis: mismatched or unknown types, recursive type definitions, and
//! pathologically deep type expressions.

use crate::synth::{Synthesizer, MAX_IDENTIFIER_LEN, MAX_NUMBER_LEN, MAX_STRING_LITERAL_LEN};

/// Type strategy catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeStrategy {
    /// Literal whose kind disagrees with the declared type.
    LiteralMismatch,
    /// Binding annotated with a type nobody declared.
    UndeclaredType,
    /// Two structs that contain each other by value.
    MutualRecursion,
    /// Struct that contains itself by value.
    SelfReferential,
    /// Type name of 100..=1 000 characters.
    LongTypeName,
    /// Parameterized type nested 8..=200 deep.
    DeepGenerics,
    /// Function type nested 3..=100 deep in a parameter.
    DeepFunctionType,
}

impl TypeStrategy {
    /// Every type strategy, in selection order.
    pub const ALL: &'static [TypeStrategy] = &[
        Self::LiteralMismatch,
        Self::UndeclaredType,
        Self::MutualRecursion,
        Self::SelfReferential,
        Self::LongTypeName,
        Self::DeepGenerics,
        Self::DeepFunctionType,
    ];

    /// Stable kebab-case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::LiteralMismatch => "literal-mismatch",
            Self::UndeclaredType => "undeclared-type",
            Self::MutualRecursion => "mutual-recursion",
            Self::SelfReferential => "self-referential",
            Self::LongTypeName => "long-type-name",
            Self::DeepGenerics => "deep-generics",
            Self::DeepFunctionType => "deep-function-type",
        }
    }

    /// Maximum output size in bytes.
    #[must_use]
    pub fn max_len(self) -> usize {
        let literal = MAX_STRING_LITERAL_LEN.max(MAX_NUMBER_LEN);
        match self {
            // "func main() { let " + ident + ": " + type + " = " + literal + " }"
            Self::LiteralMismatch => 18 + MAX_IDENTIFIER_LEN + 2 + 6 + 3 + literal + 2,
            // "func main() { let x: " + ident + " = 1 }"
            Self::UndeclaredType => 21 + MAX_IDENTIFIER_LEN + 6,
            // "struct A { b: B } struct B { a: A }"
            Self::MutualRecursion => 2 * (7 + MAX_IDENTIFIER_LEN + 6 + MAX_IDENTIFIER_LEN + 2) + 1,
            // "struct S { s: S }"
            Self::SelfReferential => 7 + MAX_IDENTIFIER_LEN + 6 + MAX_IDENTIFIER_LEN + 2,
            // "let x: " + name + " = 1"
            Self::LongTypeName => 7 + 1_000 + 4,
            // "let x: " + "Vec<" * d + "Int" + ">" * d + " = 1"
            Self::DeepGenerics => 7 + 4 * 200 + 3 + 200 + 4,
            // "func f(g: " + "func(" * d + "Int" + ") -> Int" * d + ") {}"
            Self::DeepFunctionType => 10 + 5 * 100 + 3 + 8 * 100 + 4,
        }
    }

    /// Produce one input.
    pub fn generate(self, syn: &mut Synthesizer) -> Vec<u8> {
        let text = match self {
            Self::LiteralMismatch => {
                let name = syn.identifier(MAX_IDENTIFIER_LEN);
                let (ty, literal) = match syn.range(0, 3) {
                    0 => ("Int", syn.string_literal()),
                    1 => ("Bool", syn.number()),
                    2 => ("String", syn.number()),
                    _ => ("Char", syn.string_literal()),
                };
                format!("func main() {{ let {name}: {ty} = {literal} }}")
            }
            Self::UndeclaredType => {
                let ty = syn.identifier(MAX_IDENTIFIER_LEN);
                format!("func main() {{ let x: {ty} = 1 }}")
            }
            Self::MutualRecursion => {
                let a = syn.identifier(MAX_IDENTIFIER_LEN);
                let b = syn.identifier(MAX_IDENTIFIER_LEN);
                format!("struct {a} {{ b: {b} }} struct {b} {{ a: {a} }}")
            }
            Self::SelfReferential => {
                let s = syn.identifier(MAX_IDENTIFIER_LEN);
                format!("struct {s} {{ s: {s} }}")
            }
            Self::LongTypeName => {
                let len = syn.range(100, 1_000);
                format!("let x: {} = 1", "A".repeat(len))
            }
            Self::DeepGenerics => {
                let depth = syn.range(8, 200);
                format!("let x: {}Int{} = 1", "Vec<".repeat(depth), ">".repeat(depth))
            }
            Self::DeepFunctionType => {
                let depth = syn.range(3, 100);
                format!(
                    "func f(g: {}Int{}) {{}}",
                    "func(".repeat(depth),
                    ") -> Int".repeat(depth)
                )
            }
        };
        text.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(strategy: TypeStrategy, seed: u64) -> String {
        String::from_utf8(strategy.generate(&mut Synthesizer::new(seed))).unwrap()
    }

    #[test]
    fn test_deep_generics_balanced() {
        for seed in 0..20 {
            let out = text(TypeStrategy::DeepGenerics, seed);
            let depth = out.matches("Vec<").count();
            assert!((8..=200).contains(&depth));
            assert_eq!(out.matches('<').count(), out.matches('>').count());
        }
    }

    #[test]
    fn test_deep_function_type_balanced() {
        let out = text(TypeStrategy::DeepFunctionType, 2);
        let depth = out.matches("func(").count();
        assert!((3..=100).contains(&depth));
        assert_eq!(out.matches('(').count(), out.matches(')').count());
    }

    #[test]
    fn test_self_referential_names_itself() {
        let out = text(TypeStrategy::SelfReferential, 3);
        let name = out
            .strip_prefix("struct ")
            .and_then(|rest| rest.split(' ').next())
            .unwrap();
        assert!(out.ends_with(&format!("s: {name} }}")));
    }

    #[test]
    fn test_mutual_recursion_two_structs() {
        let out = text(TypeStrategy::MutualRecursion, 4);
        assert_eq!(out.matches("struct ").count(), 2);
    }

    #[test]
    fn test_literal_mismatch_shape() {
        for seed in 0..20 {
            let out = text(TypeStrategy::LiteralMismatch, seed);
            assert!(out.starts_with("func main() { let "));
            assert!(out.ends_with(" }"));
        }
    }
}
