//! Typed expression nodes and their lowering to postfix bytecode.

use std::rc::Rc;

use crate::code::Ctx;
use crate::module::GlobalSlot;
use crate::opcodes as op;

/// An expression producing an f32 value.
#[derive(Clone, Debug)]
pub struct F32(pub(crate) Expr);

/// An expression producing an i32 value.
#[derive(Clone, Debug)]
pub struct I32(pub(crate) Expr);

/// An expression producing a vector of four f32 lanes.
#[derive(Clone, Debug)]
pub struct Vec4F32(pub(crate) Expr);

impl From<f32> for F32 {
    fn from(v: f32) -> F32 {
        F32(Expr::ConstF32(v))
    }
}

// float literals default to f64; narrow them so they can sit in operand
// position
impl From<f64> for F32 {
    fn from(v: f64) -> F32 {
        F32(Expr::ConstF32(v as f32))
    }
}

/// The node set behind the typed wrappers. Operands are always the wrapped
/// expression of the matching produced type; the wrappers guarantee that at
/// construction, so encoding never re-checks types.
#[derive(Clone, Debug)]
pub(crate) enum Expr {
    ConstF32(f32),
    ConstI32(u32),
    ConstI64(u64),
    ConstV128([f32; 4]),
    LocalF32Get(u32),
    LocalI32Get(u32),
    GlobalGet(Rc<GlobalSlot>),
    F32Unop(op::F32Unop, Box<Expr>),
    F32Binop(op::F32Binop, Box<Expr>, Box<Expr>),
    F32Cmp(op::F32Cmp, Box<Expr>, Box<Expr>),
    V128Unop(op::V128Unop, Box<Expr>),
    V128Binop(op::V128Binop, Box<Expr>, Box<Expr>),
    ExtractLane(Box<Expr>, u8),
    I32Add(Box<Expr>, Box<Expr>),
    I32Mul(Box<Expr>, Box<Expr>),
    I32GeU(Box<Expr>, Box<Expr>),
    I32TruncF32U(Box<Expr>),
    I32WrapI64(Box<Expr>),
    I64ShrU(Box<Expr>, Box<Expr>),
    F32ConvertI64U(Box<Expr>),
    LoadF32(Box<Expr>),
}

impl Expr {
    pub(crate) fn encode(&self, ctx: &mut Ctx) {
        match self {
            Expr::ConstF32(v) => {
                ctx.out.push(op::F32_CONST);
                ctx.out.extend(&v.to_le_bytes());
            }
            Expr::ConstI32(v) => {
                ctx.out.push(op::I32_CONST);
                ctx.out.put_u64(*v as u64);
            }
            Expr::ConstI64(v) => {
                ctx.out.push(op::I64_CONST);
                ctx.out.put_u64(*v);
            }
            Expr::ConstV128(lanes) => {
                ctx.out.push(op::SIMD_PREFIX);
                ctx.out.put_u32(op::V128_CONST);
                for lane in lanes {
                    ctx.out.extend(&lane.to_le_bytes());
                }
            }
            Expr::LocalF32Get(idx) => {
                ctx.out.push(op::LOCAL_GET);
                ctx.out.put_u32(*idx);
            }
            Expr::LocalI32Get(idx) => {
                ctx.out.push(op::LOCAL_GET);
                ctx.out.put_local_i32(*idx);
            }
            Expr::GlobalGet(slot) => {
                ctx.out.push(op::GLOBAL_GET);
                ctx.out.put_u32(slot.index.get());
            }
            Expr::F32Unop(o, a) => {
                a.encode(ctx);
                ctx.out.push(*o as u8);
            }
            Expr::F32Binop(o, a, b) => {
                a.encode(ctx);
                b.encode(ctx);
                ctx.out.push(*o as u8);
            }
            Expr::F32Cmp(o, a, b) => {
                a.encode(ctx);
                b.encode(ctx);
                ctx.out.push(*o as u8);
            }
            Expr::V128Unop(o, a) => {
                a.encode(ctx);
                ctx.out.push(op::SIMD_PREFIX);
                ctx.out.put_u32(*o as u32);
            }
            Expr::V128Binop(o, a, b) => {
                a.encode(ctx);
                b.encode(ctx);
                ctx.out.push(op::SIMD_PREFIX);
                ctx.out.put_u32(*o as u32);
            }
            Expr::ExtractLane(v, lane) => {
                v.encode(ctx);
                ctx.out.push(op::SIMD_PREFIX);
                ctx.out.put_u32(op::F32X4_EXTRACT_LANE);
                ctx.out.push(*lane);
            }
            Expr::I32Add(a, b) => {
                a.encode(ctx);
                b.encode(ctx);
                ctx.out.push(op::I32_ADD);
            }
            Expr::I32Mul(a, b) => {
                a.encode(ctx);
                b.encode(ctx);
                ctx.out.push(op::I32_MUL);
            }
            Expr::I32GeU(a, b) => {
                a.encode(ctx);
                b.encode(ctx);
                ctx.out.push(op::I32_GE_U);
            }
            Expr::I32TruncF32U(a) => {
                a.encode(ctx);
                ctx.out.push(op::I32_TRUNC_F32_U);
            }
            Expr::I32WrapI64(a) => {
                a.encode(ctx);
                ctx.out.push(op::I32_WRAP_I64);
            }
            Expr::I64ShrU(a, b) => {
                a.encode(ctx);
                b.encode(ctx);
                ctx.out.push(op::I64_SHR_U);
            }
            Expr::F32ConvertI64U(a) => {
                a.encode(ctx);
                ctx.out.push(op::F32_CONVERT_I64_U);
            }
            Expr::LoadF32(addr) => {
                addr.encode(ctx);
                ctx.out.push(op::F32_LOAD);
                // static alignment and offset
                ctx.out.put_u32(0);
                ctx.out.put_u32(0);
            }
        }
    }
}
