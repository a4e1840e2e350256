//! Parser-targeted strategies.

use crate::synth::{Synthesizer, MAX_IDENTIFIER_LEN, MAX_KEYWORD_LEN, MAX_NUMBER_LEN, MAX_OPERATOR_LEN};

const MALFORMED_PARAMS: &[&str] = &[",,,", "a:", ": Int", "a b c", "a: Int,, b: Int", "(", ")", "a: Int ->"];

const EMPTY_BODIES: &[&str] = &["func () { }", "struct { }", "if { }", "func { }", "while { }"];

/// Parser strategy catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserStrategy {
    /// `func main() {` repeated 10..=100 times, never closed.
    UnbalancedOpeners,
    /// 10..=100 stray closing braces.
    UnbalancedClosers,
    /// Conditionals nested 50..=200 deep with an independent close count.
    DeepConditionals,
    /// Parentheses nested 100..=500 deep with an independent close count.
    DeepParens,
    /// Function with a broken parameter list.
    MalformedParams,
    /// 5..=20 `let` statements separated only by newlines.
    MissingTerminators,
    /// Expression cut off after an operator or before a closing paren.
    TrailingOperator,
    /// 10..=50 keywords in a row.
    KeywordSoup,
    /// Function, struct, or conditional with nothing inside.
    EmptyBodies,
    /// Member access chain of 100..=500 segments.
    MemberChain,
    /// Function with 100..=500 parameters.
    ManyParams,
}

impl ParserStrategy {
    /// Every parser strategy, in selection order.
    pub const ALL: &'static [ParserStrategy] = &[
        Self::UnbalancedOpeners,
        Self::UnbalancedClosers,
        Self::DeepConditionals,
        Self::DeepParens,
        Self::MalformedParams,
        Self::MissingTerminators,
        Self::TrailingOperator,
        Self::KeywordSoup,
        Self::EmptyBodies,
        Self::MemberChain,
        Self::ManyParams,
    ];

    /// Stable kebab-case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::UnbalancedOpeners => "unbalanced-openers",
            Self::UnbalancedClosers => "unbalanced-closers",
            Self::DeepConditionals => "deep-conditionals",
            Self::DeepParens => "deep-parens",
            Self::MalformedParams => "malformed-params",
            Self::MissingTerminators => "missing-terminators",
            Self::TrailingOperator => "trailing-operator",
            Self::KeywordSoup => "keyword-soup",
            Self::EmptyBodies => "empty-bodies",
            Self::MemberChain => "member-chain",
            Self::ManyParams => "many-params",
        }
    }

    /// Maximum output size in bytes.
    #[must_use]
    pub fn max_len(self) -> usize {
        let longest_malformed = MALFORMED_PARAMS.iter().map(|p| p.len()).max().unwrap_or(0);
        let longest_empty = EMPTY_BODIES.iter().map(|b| b.len()).max().unwrap_or(0);
        match self {
            Self::UnbalancedOpeners => "func main() {".len() * 100,
            Self::UnbalancedClosers => 100,
            // "if 1 { " * a + "let x = 1" + " }" * b
            Self::DeepConditionals => 7 * 200 + 9 + 2 * 200,
            // "let x = " + "(" * a + "1" + ")" * b
            Self::DeepParens => 8 + 500 + 1 + 500,
            // "func " + ident + "(" + params + ") { }"
            Self::MalformedParams => 5 + MAX_IDENTIFIER_LEN + 1 + longest_malformed + 5,
            // lines of "let " + ident + " = " + number, newline separated
            Self::MissingTerminators => 20 * (4 + MAX_IDENTIFIER_LEN + 3 + MAX_NUMBER_LEN + 1),
            // "let x = (" + number + " " + op + " " + number
            Self::TrailingOperator => 9 + MAX_NUMBER_LEN + 1 + MAX_OPERATOR_LEN + 1 + MAX_NUMBER_LEN,
            Self::KeywordSoup => 50 * (MAX_KEYWORD_LEN + 1),
            Self::EmptyBodies => longest_empty.max(7 + MAX_IDENTIFIER_LEN + 3),
            // "let x = obj" + ("." + ident) * n
            Self::MemberChain => 11 + 500 * (1 + MAX_IDENTIFIER_LEN),
            // "func f(" + "a{i}: Int" joined by ", " + ") {}"
            Self::ManyParams => 7 + 500 * ("a499: Int".len() + 2) + 4,
        }
    }

    /// Produce one input.
    pub fn generate(self, syn: &mut Synthesizer) -> Vec<u8> {
        let text = match self {
            Self::UnbalancedOpeners => "func main() {".repeat(syn.range(10, 100)),
            Self::UnbalancedClosers => "}".repeat(syn.range(10, 100)),
            Self::DeepConditionals => {
                let open = syn.range(50, 200);
                let close = syn.range(50, 200);
                format!("{}let x = 1{}", "if 1 { ".repeat(open), " }".repeat(close))
            }
            Self::DeepParens => {
                let open = syn.range(100, 500);
                let close = syn.range(100, 500);
                format!("let x = {}1{}", "(".repeat(open), ")".repeat(close))
            }
            Self::MalformedParams => {
                let name = syn.identifier(MAX_IDENTIFIER_LEN);
                let params = syn.pick(MALFORMED_PARAMS);
                format!("func {name}({params}) {{ }}")
            }
            Self::MissingTerminators => {
                let count = syn.range(5, 20);
                let lines: Vec<String> = (0..count)
                    .map(|_| format!("let {} = {}", syn.identifier(MAX_IDENTIFIER_LEN), syn.number()))
                    .collect();
                lines.join("\n")
            }
            Self::TrailingOperator => {
                let lhs = syn.number();
                let op = syn.operator();
                if syn.coin() {
                    format!("let x = {lhs} {op} ")
                } else {
                    let rhs = syn.number();
                    format!("let x = ({lhs} {op} {rhs}")
                }
            }
            Self::KeywordSoup => {
                let count = syn.range(10, 50);
                let words: Vec<&str> = (0..count).map(|_| syn.keyword()).collect();
                words.join(" ")
            }
            Self::EmptyBodies => {
                if syn.coin() {
                    (*syn.pick(EMPTY_BODIES)).to_string()
                } else {
                    let name = syn.identifier(MAX_IDENTIFIER_LEN);
                    if syn.coin() {
                        format!("func {name}() {{}}")
                    } else {
                        format!("struct {name} {{}}")
                    }
                }
            }
            Self::MemberChain => {
                let segments = syn.range(100, 500);
                let mut chain = String::from("let x = obj");
                for _ in 0..segments {
                    chain.push('.');
                    chain.push_str(&syn.identifier(MAX_IDENTIFIER_LEN));
                }
                chain
            }
            Self::ManyParams => {
                let count = syn.range(100, 500);
                let params: Vec<String> = (0..count).map(|i| format!("a{i}: Int")).collect();
                format!("func f({}) {{}}", params.join(", "))
            }
        };
        text.into_bytes()
    }
}
