//! Statement nodes: assignments and the control-flow macros.

use std::rc::Rc;

use crate::code::Ctx;
use crate::controlflow::{ForRangeF32, IfF32};
use crate::expr::{Expr, F32, I32};
use crate::i32::LocalI32;
use crate::module::GlobalSlot;
use crate::opcodes as op;
use crate::slice::SliceRangeF32;

/// A statement. Instructions are built with [`assign_f32`], [`assign_i32`]
/// and the control-flow structs, and collected into a function body with
/// [`Function::body`](crate::Function::body).
pub struct Instruction(pub(crate) Stmt);

pub(crate) enum Stmt {
    AssignF32 { dst: MutF32, value: Expr },
    AssignI32 { dst: LocalI32, value: Expr },
    If(IfF32),
    ForRange(ForRangeF32),
    SliceRange(SliceRangeF32),
}

impl Instruction {
    pub(crate) fn encode(&self, ctx: &mut Ctx) {
        match &self.0 {
            Stmt::AssignF32 { dst, value } => {
                value.encode(ctx);
                dst.set(ctx);
            }
            Stmt::AssignI32 { dst, value } => {
                value.encode(ctx);
                dst.set(ctx);
            }
            Stmt::If(i) => i.encode(ctx),
            Stmt::ForRange(f) => f.encode(ctx),
            Stmt::SliceRange(s) => s.encode(ctx),
        }
    }
}

/// A writable f32 destination: a function local or a mutable global, defined
/// or imported. Constants and non-mutable globals have no conversion into
/// `MutF32`, so they cannot be assigned to.
#[derive(Clone, Debug)]
pub struct MutF32(pub(crate) Dst);

#[derive(Clone, Debug)]
pub(crate) enum Dst {
    Local(u32),
    Global(Rc<GlobalSlot>),
}

impl MutF32 {
    fn set(&self, ctx: &mut Ctx) {
        match &self.0 {
            Dst::Local(idx) => {
                ctx.out.push(op::LOCAL_SET);
                ctx.out.put_u32(*idx);
            }
            Dst::Global(slot) => {
                ctx.out.push(op::GLOBAL_SET);
                ctx.out.put_u32(slot.index.get());
            }
        }
    }
}

/// Assign the value of an f32 expression to `dst`.
pub fn assign_f32(dst: impl Into<MutF32>, value: impl Into<F32>) -> Instruction {
    Instruction(Stmt::AssignF32 {
        dst: dst.into(),
        value: value.into().0,
    })
}

/// Assign the value of an i32 expression to a local.
pub fn assign_i32(dst: LocalI32, value: impl Into<I32>) -> Instruction {
    Instruction(Stmt::AssignI32 {
        dst,
        value: value.into().0,
    })
}
