//! Parameter normalization.
//!
//! Turns the raw operand records of an instruction into the canonical
//! parameter signature used in model tables (`r64`, `mem`, `imd`, `xmm`,
//! `zmm{opmask}`, `LBL`, ...).

use std::fmt;
use std::str::FromStr;

use portmodel_doc::Operand;

use crate::error::{ModelError, Result};
use crate::registers::{self, RegisterClass, RegisterInfo};

/// Closed set of operand type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Immediate,
    Memory,
    Register,
    Label,
    AddressGeneration,
}

impl FromStr for OperandKind {
    type Err = ModelError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "imm" => Ok(OperandKind::Immediate),
            "mem" => Ok(OperandKind::Memory),
            "reg" => Ok(OperandKind::Register),
            "relbr" => Ok(OperandKind::Label),
            "agen" => Ok(OperandKind::AddressGeneration),
            other => Err(ModelError::operand(format!("unknown operand type '{other}'"))),
        }
    }
}

/// Parameter class without the opmask marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamClass {
    Immediate,
    Memory,
    /// General-purpose register of the given bit width.
    Gpr(u16),
    /// Any other register family.
    Register(RegisterClass),
    Label,
}

/// One entry of a parameter signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamToken {
    pub class: ParamClass,
    pub opmask: bool,
}

impl ParamToken {
    pub const IMMEDIATE: ParamToken = ParamToken::plain(ParamClass::Immediate);
    pub const MEMORY: ParamToken = ParamToken::plain(ParamClass::Memory);
    pub const LABEL: ParamToken = ParamToken::plain(ParamClass::Label);

    pub const fn plain(class: ParamClass) -> Self {
        Self {
            class,
            opmask: false,
        }
    }

    pub const fn gpr(width: u16) -> Self {
        Self::plain(ParamClass::Gpr(width))
    }

    pub const fn register(class: RegisterClass) -> Self {
        Self::plain(ParamClass::Register(class))
    }

    pub fn with_opmask(mut self) -> Self {
        self.opmask = true;
        self
    }

    pub fn without_opmask(mut self) -> Self {
        self.opmask = false;
        self
    }

    /// Memory and immediate tokens do not constrain the operand size.
    pub fn is_sizeless(&self) -> bool {
        matches!(self.class, ParamClass::Memory | ParamClass::Immediate)
    }
}

impl fmt::Display for ParamToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            ParamClass::Immediate => f.write_str("imd")?,
            ParamClass::Memory => f.write_str("mem")?,
            ParamClass::Gpr(width) => write!(f, "r{width}")?,
            ParamClass::Register(class) => f.write_str(class.token())?,
            ParamClass::Label => f.write_str("LBL")?,
        }
        if self.opmask {
            f.write_str("{opmask}")?;
        }
        Ok(())
    }
}

/// Join a signature the way model tables spell it (`r64_mem`).
pub fn format_signature(params: &[ParamToken]) -> String {
    params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("_")
}

/// Strip decoration from one register alternative.
///
/// Mask registers come braced (`{K3}` → `K3`) and x87 stack registers
/// parenthesized (`ST(2)` → `ST2`).
pub fn normalize_register_name(raw: &str) -> String {
    let name = raw.trim();
    if let Some(inner) = name.strip_prefix("{K").and_then(|r| r.strip_suffix('}')) {
        if is_single_octal_digit(inner) {
            return format!("K{inner}");
        }
    }
    if let Some(inner) = name.strip_prefix("ST(").and_then(|r| r.strip_suffix(')')) {
        if is_single_octal_digit(inner) {
            return format!("ST{inner}");
        }
    }
    name.to_string()
}

fn is_single_octal_digit(s: &str) -> bool {
    matches!(s.as_bytes(), [b'0'..=b'7'])
}

/// Resolve the common width and class of a comma-separated register list.
fn resolve_register_list(text: &str) -> Result<RegisterInfo> {
    let mut resolved: Option<Option<RegisterInfo>> = None;
    for alternative in text.split(',') {
        let info = registers::lookup(&normalize_register_name(alternative));
        match resolved {
            None => resolved = Some(info),
            Some(first) if first != info => {
                return Err(ModelError::operand(format!(
                    "register alternatives '{text}' disagree on width or class"
                )));
            }
            Some(_) => {}
        }
    }
    resolved
        .flatten()
        .ok_or_else(|| ModelError::operand(format!("unknown register class for '{text}'")))
}

/// Build the parameter signature of an instruction from its operand records.
///
/// Operands are visited in ascending declared position; suppressed operands
/// contribute nothing. A register operand carrying a mask annotation marks
/// the previous token instead of adding one.
pub fn extract_parameters(operands: &[Operand]) -> Result<Vec<ParamToken>> {
    let mut ordered: Vec<&Operand> = operands.iter().collect();
    ordered.sort_by_key(|o| o.idx);

    let mut params: Vec<ParamToken> = Vec::with_capacity(ordered.len());
    for operand in ordered {
        if operand.suppressed {
            continue;
        }
        match operand.type_tag.parse::<OperandKind>()? {
            OperandKind::Immediate => params.push(ParamToken::IMMEDIATE),
            OperandKind::Memory | OperandKind::AddressGeneration => {
                params.push(ParamToken::MEMORY)
            }
            OperandKind::Label => params.push(ParamToken::LABEL),
            OperandKind::Register => {
                let info = resolve_register_list(&operand.text)?;
                if info.class == RegisterClass::Gpr {
                    params.push(ParamToken::gpr(info.width));
                } else if operand.text.contains('{') {
                    let previous = params.last_mut().ok_or_else(|| {
                        ModelError::operand(format!(
                            "mask '{}' at position {} has no operand to attach to",
                            operand.text, operand.idx
                        ))
                    })?;
                    *previous = previous.with_opmask();
                } else {
                    params.push(ParamToken::register(info.class));
                }
            }
        }
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(idx: u32, type_tag: &str, text: &str) -> Operand {
        Operand {
            idx,
            type_tag: type_tag.into(),
            text: text.into(),
            suppressed: false,
        }
    }

    fn suppressed(idx: u32, type_tag: &str, text: &str) -> Operand {
        Operand {
            suppressed: true,
            ..op(idx, type_tag, text)
        }
    }

    fn signature(operands: &[Operand]) -> String {
        format_signature(&extract_parameters(operands).unwrap())
    }

    #[test]
    fn operand_kinds_from_tags() {
        assert_eq!("imm".parse::<OperandKind>().unwrap(), OperandKind::Immediate);
        assert_eq!("agen".parse::<OperandKind>().unwrap(), OperandKind::AddressGeneration);
        assert_eq!("relbr".parse::<OperandKind>().unwrap(), OperandKind::Label);
        assert!(matches!(
            "flags".parse::<OperandKind>(),
            Err(ModelError::UnrecognizedOperand { .. })
        ));
    }

    #[test]
    fn register_name_normalization() {
        assert_eq!(normalize_register_name(" RAX "), "RAX");
        assert_eq!(normalize_register_name("{K3}"), "K3");
        assert_eq!(normalize_register_name("ST(5)"), "ST5");
        assert_eq!(normalize_register_name("{K9}"), "{K9}");
        assert_eq!(normalize_register_name("{z}"), "{z}");
    }

    #[test]
    fn gpr_operands_carry_width() {
        let ops = [op(1, "reg", "RAX,RBX,R8"), op(2, "reg", "ECX,EDX")];
        assert_eq!(signature(&ops), "r64_r32");
    }

    #[test]
    fn immediate_memory_label_and_agen() {
        let ops = [
            op(1, "mem", ""),
            op(2, "imm", ""),
            op(3, "relbr", ""),
            op(4, "agen", ""),
        ];
        assert_eq!(signature(&ops), "mem_imd_LBL_mem");
    }

    #[test]
    fn declared_order_not_storage_order() {
        let ops = [op(3, "imm", ""), op(1, "reg", "XMM0,XMM1"), op(2, "mem", "")];
        assert_eq!(signature(&ops), "xmm_mem_imd");
    }

    #[test]
    fn suppressed_operands_are_skipped() {
        let ops = [
            op(1, "reg", "RAX"),
            suppressed(2, "reg", "RFLAGS"),
            suppressed(3, "weird", ""),
        ];
        assert_eq!(signature(&ops), "r64");
    }

    #[test]
    fn mask_marks_previous_token() {
        let ops = [
            op(1, "reg", "ZMM0,ZMM1"),
            op(2, "reg", "{K1},{K2},{K3}"),
            op(3, "reg", "ZMM2"),
            op(4, "reg", "ZMM3"),
        ];
        assert_eq!(signature(&ops), "zmm{opmask}_zmm_zmm");
    }

    #[test]
    fn unbraced_mask_register_is_a_parameter() {
        let ops = [op(1, "reg", "K1,K2"), op(2, "reg", "K3")];
        assert_eq!(signature(&ops), "k_k");
    }

    #[test]
    fn x87_stack_registers() {
        let ops = [op(1, "reg", "ST(0)"), op(2, "reg", "ST(1),ST(2)")];
        assert_eq!(signature(&ops), "fpu_fpu");
    }

    #[test]
    fn mixed_widths_are_rejected() {
        let ops = [op(1, "reg", "AL,AX")];
        let err = extract_parameters(&ops).unwrap_err();
        assert!(err.to_string().contains("disagree"));
    }

    #[test]
    fn mixed_classes_are_rejected() {
        let ops = [op(1, "reg", "XMM0,YMM0")];
        assert!(extract_parameters(&ops).is_err());
    }

    #[test]
    fn unknown_register_is_rejected() {
        let ops = [op(1, "reg", "MXCSR")];
        let err = extract_parameters(&ops).unwrap_err();
        assert!(err.to_string().contains("unknown register class"));
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let ops = [op(1, "reg", "RAX"), op(2, "flags", "")];
        assert!(matches!(
            extract_parameters(&ops),
            Err(ModelError::UnrecognizedOperand { .. })
        ));
    }

    #[test]
    fn leading_mask_is_rejected() {
        let ops = [op(1, "reg", "{K1}")];
        assert!(extract_parameters(&ops).is_err());
    }

    #[test]
    fn no_operands_no_parameters() {
        assert!(extract_parameters(&[]).unwrap().is_empty());
    }
}
