//! Codegen-targeted strategies.
//!
//! Syntactically plausible programs whose size stresses register
//! allocation, stack layout, and jump tables.

use crate::synth::{Synthesizer, MAX_NUMBER_LEN};

/// Codegen strategy catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodegenStrategy {
    /// Array literal with 100..=1 000 elements.
    LargeArray,
    /// Sum of 50..=200 numeric literals.
    LongArithmetic,
    /// Function with 100..=500 local bindings.
    ManyLocals,
    /// 50..=200 single-argument functions, each calling the next.
    DeepCallChain,
    /// Match with 100..=500 arms.
    LargeMatch,
}

impl CodegenStrategy {
    /// Every codegen strategy, in selection order.
    pub const ALL: &'static [CodegenStrategy] = &[
        Self::LargeArray,
        Self::LongArithmetic,
        Self::ManyLocals,
        Self::DeepCallChain,
        Self::LargeMatch,
    ];

    /// Stable kebab-case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::LargeArray => "large-array",
            Self::LongArithmetic => "long-arithmetic",
            Self::ManyLocals => "many-locals",
            Self::DeepCallChain => "deep-call-chain",
            Self::LargeMatch => "large-match",
        }
    }

    /// Maximum output size in bytes.
    #[must_use]
    pub fn max_len(self) -> usize {
        match self {
            // "let arr = [" + "1000" joined by ", " + "]"
            Self::LargeArray => 11 + 1_000 * (4 + 2) + 1,
            // "func main() { let x = " + numbers joined by " + " + " }"
            Self::LongArithmetic => 22 + 200 * (MAX_NUMBER_LEN + 3) + 2,
            // "func main() { " + "let v499 = 499" lines + " }"
            Self::ManyLocals => 14 + 500 * ("let v499 = 499".len() + 1) + 2,
            // one "func f199(x: Int) -> Int { f200(x + 1) }" line per link + main
            Self::DeepCallChain => {
                200 * ("func f199(x: Int) -> Int { f200(x + 1) }".len() + 1)
                    + "func main() { f0(0) }".len()
            }
            // "func main() { match x { " + "499 => 499," arms + " } }"
            Self::LargeMatch => 24 + 500 * ("499 => 499,".len() + 1) + 4,
        }
    }

    /// Produce one input.
    pub fn generate(self, syn: &mut Synthesizer) -> Vec<u8> {
        let text = match self {
            Self::LargeArray => {
                let count = syn.range(100, 1_000);
                let items: Vec<String> = (0..count).map(|_| syn.range(0, 1_000).to_string()).collect();
                format!("let arr = [{}]", items.join(", "))
            }
            Self::LongArithmetic => {
                let count = syn.range(50, 200);
                let terms: Vec<String> = (0..count).map(|_| syn.number()).collect();
                format!("func main() {{ let x = {} }}", terms.join(" + "))
            }
            Self::ManyLocals => {
                let count = syn.range(100, 500);
                let locals: Vec<String> = (0..count).map(|i| format!("let v{i} = {i}")).collect();
                format!("func main() {{ {} }}", locals.join("\n"))
            }
            Self::DeepCallChain => deep_call_chain(syn.range(50, 200)),
            Self::LargeMatch => {
                let count = syn.range(100, 500);
                let arms: Vec<String> = (0..count).map(|i| format!("{i} => {i},")).collect();
                format!("func main() {{ match x {{ {} }} }}", arms.join(" "))
            }
        };
        text.into_bytes()
    }
}

/// `depth` functions `f0..f{depth-1}`, each forwarding `x + 1` to the next,
/// with the last returning `x`, followed by a `main` calling `f0`.
fn deep_call_chain(depth: usize) -> String {
    let depth = depth.max(1);
    let mut funcs: Vec<String> = (0..depth - 1)
        .map(|i| format!("func f{i}(x: Int) -> Int {{ f{}(x + 1) }}", i + 1))
        .collect();
    funcs.push(format!("func f{}(x: Int) -> Int {{ x }}", depth - 1));
    funcs.push("func main() { f0(0) }".to_string());
    funcs.join("\n")
}
