//! i32 variables, operators and the f32 cast.

use crate::code::Ctx;
use crate::expr::{Expr, F32, I32};
use crate::opcodes as op;

/// An i32 local variable, created with
/// [`Function::local_i32`](crate::Function::local_i32). Valid only inside the
/// function that created it.
#[derive(Clone, Copy, Debug)]
pub struct LocalI32(pub(crate) u32);

impl LocalI32 {
    pub(crate) fn set(self, ctx: &mut Ctx) {
        ctx.out.push(op::LOCAL_SET);
        ctx.out.put_local_i32(self.0);
    }
}

impl From<LocalI32> for I32 {
    fn from(l: LocalI32) -> I32 {
        I32(Expr::LocalI32Get(l.0))
    }
}

/// The constant value `v`.
pub fn const_i32(v: u32) -> I32 {
    I32(Expr::ConstI32(v))
}

/// The sum of `a` and `b`.
pub fn add_i32(a: impl Into<I32>, b: impl Into<I32>) -> I32 {
    I32(Expr::I32Add(Box::new(a.into().0), Box::new(b.into().0)))
}

/// The product of `a` and `b`.
pub fn mul_i32(a: impl Into<I32>, b: impl Into<I32>) -> I32 {
    I32(Expr::I32Mul(Box::new(a.into().0), Box::new(b.into().0)))
}

/// 1 if `a` is at least `b` as unsigned values, else 0.
pub fn ge_u_i32(a: impl Into<I32>, b: impl Into<I32>) -> I32 {
    I32(Expr::I32GeU(Box::new(a.into().0), Box::new(b.into().0)))
}

/// Cast an f32 to an i32, truncating towards zero. The input is treated as
/// unsigned.
pub fn trunc_f32_u(a: impl Into<F32>) -> I32 {
    I32(Expr::I32TruncF32U(Box::new(a.into().0)))
}
