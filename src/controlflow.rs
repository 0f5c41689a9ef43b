//! Structured control flow composed out of block/loop/br skeletons.
//!
//! Inside a macro's frame, branch depth 0 targets the innermost loop, depth 1
//! the enclosing block, and depth 2 escapes both. No macro branches past the
//! frames it installs itself.

use crate::code::Ctx;
use crate::expr::F32;
use crate::f32::{add_f32, const_f32, ge_f32, le_f32};
use crate::instr::{assign_f32, Instruction, Stmt};
use crate::opcodes as op;

/// A loop body, returning the instructions to run each iteration. It is
/// called once the surrounding frame is in place, with the iteration value:
/// the index for [`ForRangeF32`], the element for
/// [`SliceRangeF32`](crate::SliceRangeF32).
pub type LoopBody = Box<dyn Fn(F32) -> Vec<Instruction>>;

/// Runs `then` if `condition` is non-zero, and `otherwise` if it is zero.
///
/// A missing condition produces no code at all.
#[derive(Default)]
pub struct IfF32 {
    pub condition: Option<F32>,
    pub then: Vec<Instruction>,
    pub otherwise: Vec<Instruction>,
}

impl From<IfF32> for Instruction {
    fn from(i: IfF32) -> Instruction {
        Instruction(Stmt::If(i))
    }
}

impl IfF32 {
    pub(crate) fn encode(&self, ctx: &mut Ctx) {
        let condition = match &self.condition {
            Some(condition) => condition,
            None => return,
        };
        condition.0.encode(ctx);
        ctx.out.push(op::I32_TRUNC_F32_U);
        ctx.out.push(op::IF);
        ctx.out.push(op::EMPTY_BLOCK);
        for inst in &self.then {
            inst.encode(ctx);
        }
        ctx.out.push(op::ELSE);
        for inst in &self.otherwise {
            inst.encode(ctx);
        }
        ctx.out.push(op::END);
    }
}

/// Runs `body` for every index value from `begin` to `end`, stepping by
/// `inc`.
///
/// `inc` defaults to 1; `begin` and `end` default to 0. A negative `inc`
/// flips the end condition from `index >= end` to `index <= end`.
pub struct ForRangeF32 {
    pub begin: Option<F32>,
    pub end: Option<F32>,
    pub inc: Option<F32>,
    pub body: LoopBody,
}

impl Default for ForRangeF32 {
    fn default() -> ForRangeF32 {
        ForRangeF32 {
            begin: None,
            end: None,
            inc: None,
            body: Box::new(|_| Vec::new()),
        }
    }
}

impl From<ForRangeF32> for Instruction {
    fn from(f: ForRangeF32) -> Instruction {
        Instruction(Stmt::ForRange(f))
    }
}

impl ForRangeF32 {
    pub(crate) fn encode(&self, ctx: &mut Ctx) {
        let begin = self.begin.clone().unwrap_or_else(|| const_f32(0.0));
        let end = self.end.clone().unwrap_or_else(|| const_f32(0.0));
        let inc = self.inc.clone().unwrap_or_else(|| const_f32(1.0));

        // the loop variables only exist once the function is known
        let idx = ctx.func.local_f32();
        let end_local = ctx.func.local_f32();
        let inc_local = ctx.func.local_f32();

        assign_f32(idx, begin).encode(ctx);
        assign_f32(end_local, end).encode(ctx);
        assign_f32(inc_local, inc).encode(ctx);

        ctx.out.push(op::BLOCK);
        ctx.out.push(op::EMPTY_BLOCK);
        ctx.out.push(op::LOOP);
        ctx.out.push(op::EMPTY_BLOCK);

        // break out of the outer block once the index passes the end; which
        // comparison that is depends on the sign of the increment
        ge_f32(inc_local, 0.0).0.encode(ctx);
        ctx.out.push(op::IF);
        ctx.out.push(op::EMPTY_BLOCK);
        ge_f32(idx, end_local).0.encode(ctx);
        ctx.out.push(op::BR_IF);
        ctx.out.put_u32(2);
        ctx.out.push(op::ELSE);
        le_f32(idx, end_local).0.encode(ctx);
        ctx.out.push(op::BR_IF);
        ctx.out.put_u32(2);
        ctx.out.push(op::END);

        for inst in (self.body)(idx.into()) {
            inst.encode(ctx);
        }

        assign_f32(idx, add_f32(idx, inc_local)).encode(ctx);
        ctx.out.push(op::BR);
        ctx.out.put_u32(0);
        ctx.out.push(op::END); // loop
        ctx.out.push(op::END); // block
    }
}
