//! Variant expansion.
//!
//! One measured instruction form stands for a small family of spellings that
//! share its timing: the opmask-free form of a masked AVX-512 instruction,
//! and the AT&T size-suffixed mnemonics (`MOVL`, `ADDQ`, ...) of
//! width-polymorphic integer instructions.

use crate::param::ParamToken;

/// A mnemonic with its parameter signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub mnemonic: String,
    pub parameters: Vec<ParamToken>,
}

impl Variant {
    fn new(mnemonic: impl Into<String>, parameters: Vec<ParamToken>) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            parameters,
        }
    }
}

/// Size suffixes and the register width each implies, in yield order.
const SUFFIXES: [(char, u16); 4] = [('Q', 64), ('L', 32), ('W', 16), ('B', 8)];

/// Enumerate the forms equivalent to `mnemonic` with `parameters`.
///
/// The input form comes first (mnemonic uppercased). Suffixed forms are
/// derived from the input only, never from the opmask-free form.
pub fn expand_variants(mnemonic: &str, parameters: &[ParamToken]) -> Vec<Variant> {
    let mnemonic = mnemonic.to_uppercase();
    let mut variants = vec![Variant::new(mnemonic.clone(), parameters.to_vec())];

    if parameters.iter().any(|p| p.opmask) {
        let unmasked = parameters.iter().map(|p| p.without_opmask()).collect();
        variants.push(Variant::new(mnemonic.clone(), unmasked));
    }

    let sized: Vec<&ParamToken> = parameters.iter().filter(|p| !p.is_sizeless()).collect();
    if !sized.is_empty() {
        for (suffix, width) in SUFFIXES {
            let register = ParamToken::gpr(width);
            if !mnemonic.ends_with(suffix) && sized.iter().all(|p| **p == register) {
                variants.push(Variant::new(format!("{mnemonic}{suffix}"), parameters.to_vec()));
            }
        }
    }

    variants
}
