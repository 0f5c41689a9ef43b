//! Opcodes emitted by the builder.
//!
//! https://webassembly.github.io/spec/core/binary/instructions.html

// control instructions
pub(crate) const BLOCK: u8 = 0x02;
pub(crate) const LOOP: u8 = 0x03;
pub(crate) const IF: u8 = 0x04;
pub(crate) const ELSE: u8 = 0x05;
pub(crate) const END: u8 = 0x0B;
pub(crate) const BR: u8 = 0x0C;
pub(crate) const BR_IF: u8 = 0x0D;
// blocktype of an empty result type, written after block/loop/if
pub(crate) const EMPTY_BLOCK: u8 = 0x40;

// variable instructions
pub(crate) const LOCAL_GET: u8 = 0x20;
pub(crate) const LOCAL_SET: u8 = 0x21;
pub(crate) const GLOBAL_GET: u8 = 0x23;
pub(crate) const GLOBAL_SET: u8 = 0x24;

pub(crate) const F32_LOAD: u8 = 0x2A;
pub(crate) const I32_CONST: u8 = 0x41;
pub(crate) const I64_CONST: u8 = 0x42;
pub(crate) const F32_CONST: u8 = 0x43;

pub(crate) const I32_ADD: u8 = 0x6A;
pub(crate) const I32_MUL: u8 = 0x6C;
pub(crate) const I32_GE_U: u8 = 0x4F;
pub(crate) const I64_SHR_U: u8 = 0x88;

// conversions
pub(crate) const I32_WRAP_I64: u8 = 0xA7;
pub(crate) const I32_TRUNC_F32_U: u8 = 0xA9;
pub(crate) const F32_CONVERT_I64_U: u8 = 0xB5;

// vector instructions are the 0xFD prefix followed by a LEB128 sub-opcode
pub(crate) const SIMD_PREFIX: u8 = 0xFD;
pub(crate) const V128_CONST: u32 = 12;
pub(crate) const F32X4_EXTRACT_LANE: u32 = 31;

/// f32 comparisons, i32-producing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum F32Cmp {
    Eq = 0x5B,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

/// f32 unary operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum F32Unop {
    Abs = 0x8B,
    Neg,
    Ceil,
    Floor,
    Trunc,
    Nearest,
    Sqrt,
}

/// f32 binary operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum F32Binop {
    Add = 0x92,
    Sub,
    Mul,
    Div,
    Min,
    Max,
    Copysign,
}

/// f32x4 unary operations, as SIMD sub-opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub(crate) enum V128Unop {
    Ceil = 103,
    Floor = 104,
    Trunc = 105,
    Nearest = 106,
    Abs = 224,
    Neg = 225,
    Sqrt = 227,
}

/// f32x4 binary operations, as SIMD sub-opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub(crate) enum V128Binop {
    Add = 228,
    Sub,
    Mul,
    Div,
    Min,
    Max,
}
