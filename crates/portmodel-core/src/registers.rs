//! x86 register catalogue.
//!
//! Maps an architectural register name to its width and class. Only the
//! information the parameter normalizer needs is kept: two alternatives of
//! one operand are interchangeable iff both width and class agree.

use std::fmt;

/// Register family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegisterClass {
    Gpr,
    Fpu,
    Mmx,
    Xmm,
    Ymm,
    Zmm,
    /// AVX-512 opmask registers.
    Mask,
    Bound,
    Segment,
    Control,
    Debug,
    InstructionPointer,
}

impl RegisterClass {
    /// Lowercase token used in parameter signatures.
    pub fn token(self) -> &'static str {
        match self {
            RegisterClass::Gpr => "gpr",
            RegisterClass::Fpu => "fpu",
            RegisterClass::Mmx => "mmx",
            RegisterClass::Xmm => "xmm",
            RegisterClass::Ymm => "ymm",
            RegisterClass::Zmm => "zmm",
            RegisterClass::Mask => "k",
            RegisterClass::Bound => "bnd",
            RegisterClass::Segment => "seg",
            RegisterClass::Control => "ctrl",
            RegisterClass::Debug => "dbg",
            RegisterClass::InstructionPointer => "ip",
        }
    }
}

impl fmt::Display for RegisterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Width and class of one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterInfo {
    pub width: u16,
    pub class: RegisterClass,
}

impl RegisterInfo {
    const fn new(width: u16, class: RegisterClass) -> Self {
        Self { width, class }
    }
}

/// Look up a register by its (uppercase) name.
pub fn lookup(name: &str) -> Option<RegisterInfo> {
    use RegisterClass::*;

    let info = match name {
        "AL" | "BL" | "CL" | "DL" | "AH" | "BH" | "CH" | "DH" | "SPL" | "BPL" | "SIL" | "DIL" => {
            RegisterInfo::new(8, Gpr)
        }
        "AX" | "BX" | "CX" | "DX" | "SP" | "BP" | "SI" | "DI" => RegisterInfo::new(16, Gpr),
        "EAX" | "EBX" | "ECX" | "EDX" | "ESP" | "EBP" | "ESI" | "EDI" => RegisterInfo::new(32, Gpr),
        "RAX" | "RBX" | "RCX" | "RDX" | "RSP" | "RBP" | "RSI" | "RDI" => RegisterInfo::new(64, Gpr),
        "CS" | "DS" | "ES" | "FS" | "GS" | "SS" => RegisterInfo::new(16, Segment),
        "RIP" => RegisterInfo::new(64, InstructionPointer),
        "EIP" => RegisterInfo::new(32, InstructionPointer),
        "IP" => RegisterInfo::new(16, InstructionPointer),
        _ => return numbered(name),
    };
    Some(info)
}

/// Registers named by a prefix and an index (`XMM12`, `R9D`, `ST3`, ...).
fn numbered(name: &str) -> Option<RegisterInfo> {
    use RegisterClass::*;

    // Longest prefixes first so "MMX3" is not read as "MM" + "X3".
    const BANKS: &[(&str, u32, RegisterInfo)] = &[
        ("XMM", 32, RegisterInfo::new(128, Xmm)),
        ("YMM", 32, RegisterInfo::new(256, Ymm)),
        ("ZMM", 32, RegisterInfo::new(512, Zmm)),
        ("MMX", 8, RegisterInfo::new(64, Mmx)),
        ("BND", 4, RegisterInfo::new(128, Bound)),
        ("MM", 8, RegisterInfo::new(64, Mmx)),
        ("ST", 8, RegisterInfo::new(80, Fpu)),
        ("CR", 16, RegisterInfo::new(64, Control)),
        ("DR", 16, RegisterInfo::new(64, Debug)),
        ("K", 8, RegisterInfo::new(64, Mask)),
    ];

    for (prefix, count, info) in BANKS {
        if let Some(index) = name.strip_prefix(prefix).and_then(parse_index) {
            return (index < *count).then_some(*info);
        }
    }

    // R8..R15 with optional width suffix.
    let rest = name.strip_prefix('R')?;
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let index = parse_index(&rest[..digits_end])?;
    if !(8..=15).contains(&index) {
        return None;
    }
    let width = match &rest[digits_end..] {
        "" => 64,
        "D" => 32,
        "W" => 16,
        "B" | "L" => 8,
        _ => return None,
    };
    Some(RegisterInfo::new(width, Gpr))
}

fn parse_index(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
