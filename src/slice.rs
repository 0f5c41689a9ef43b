//! Slices of f32 values in the module's imported linear memory.

use std::rc::Rc;

use crate::code::Ctx;
use crate::controlflow::LoopBody;
use crate::expr::{Expr, F32, I32};
use crate::f32::const_f32;
use crate::i32::{add_i32, const_i32, ge_u_i32, mul_i32, trunc_f32_u};
use crate::instr::{Instruction, Stmt};
use crate::module::GlobalSlot;
use crate::opcodes as op;

/// A contiguous run of f32 values in linear memory, described by an imported
/// i64 global: the element count in the high 32 bits, the byte offset of the
/// first element in the low 32 bits. Created with
/// [`Module::import_slice_f32`](crate::Module::import_slice_f32).
#[derive(Clone, Debug)]
pub struct SliceF32 {
    pub(crate) slot: Rc<GlobalSlot>,
}

impl SliceF32 {
    /// The number of f32 values in the slice.
    pub fn length(&self) -> F32 {
        F32(Expr::F32ConvertI64U(Box::new(Expr::I64ShrU(
            Box::new(Expr::GlobalGet(self.slot.clone())),
            Box::new(Expr::ConstI64(32)),
        ))))
    }

    /// The byte offset of the first element.
    pub fn offset_i32(&self) -> I32 {
        I32(Expr::I32WrapI64(Box::new(Expr::GlobalGet(
            self.slot.clone(),
        ))))
    }

    /// The f32 value at index `i`, truncating the index towards zero.
    pub fn index_f32(&self, i: impl Into<F32>) -> F32 {
        self.index_i32(trunc_f32_u(i))
    }

    /// The f32 value at an i32 index `i`.
    pub fn index_i32(&self, i: impl Into<I32>) -> F32 {
        F32(Expr::LoadF32(Box::new(
            add_i32(self.offset_i32(), mul_i32(i, const_i32(4))).0,
        )))
    }
}

/// Runs `body` for every value of `slice` from index `begin` to index
/// `end - 1`. `begin` defaults to 0 and `end` to the slice length.
pub struct SliceRangeF32 {
    pub slice: SliceF32,
    pub begin: Option<F32>,
    pub end: Option<F32>,
    pub body: LoopBody,
}

impl From<SliceRangeF32> for Instruction {
    fn from(s: SliceRangeF32) -> Instruction {
        Instruction(Stmt::SliceRange(s))
    }
}

impl SliceRangeF32 {
    pub(crate) fn encode(&self, ctx: &mut Ctx) {
        let end_local = ctx.func.local_i32();
        let idx = ctx.func.local_i32();
        let begin = self.begin.clone().unwrap_or_else(|| const_f32(0.0));
        let end = self.end.clone().unwrap_or_else(|| self.slice.length());

        trunc_f32_u(begin).0.encode(ctx);
        idx.set(ctx);
        trunc_f32_u(end).0.encode(ctx);
        end_local.set(ctx);

        ctx.out.push(op::BLOCK);
        ctx.out.push(op::EMPTY_BLOCK);
        ctx.out.push(op::LOOP);
        ctx.out.push(op::EMPTY_BLOCK);

        // if (idx >= end) break
        ge_u_i32(idx, end_local).0.encode(ctx);
        ctx.out.push(op::BR_IF);
        ctx.out.put_u32(1);

        for inst in (self.body)(self.slice.index_i32(idx)) {
            inst.encode(ctx);
        }

        // idx += 1
        add_i32(idx, const_i32(1)).0.encode(ctx);
        idx.set(ctx);

        ctx.out.push(op::BR);
        ctx.out.put_u32(0);
        ctx.out.push(op::END); // loop
        ctx.out.push(op::END); // block
    }
}
