//! f32 variables and operators.

use std::rc::Rc;

use crate::expr::{Expr, F32, I32};
use crate::instr::{Dst, MutF32};
use crate::module::GlobalSlot;
use crate::opcodes::{F32Binop, F32Cmp, F32Unop};

/// An f32 local variable, created with
/// [`Function::local_f32`](crate::Function::local_f32). Valid only inside the
/// function that created it.
#[derive(Clone, Copy, Debug)]
pub struct LocalF32(pub(crate) u32);

/// A mutable f32 global defined by the module.
#[derive(Clone, Debug)]
pub struct GlobalF32 {
    pub(crate) slot: Rc<GlobalSlot>,
}

/// A mutable f32 global imported from the host.
#[derive(Clone, Debug)]
pub struct ImportedF32 {
    pub(crate) slot: Rc<GlobalSlot>,
}

impl From<LocalF32> for F32 {
    fn from(l: LocalF32) -> F32 {
        F32(Expr::LocalF32Get(l.0))
    }
}

impl From<&GlobalF32> for F32 {
    fn from(g: &GlobalF32) -> F32 {
        F32(Expr::GlobalGet(g.slot.clone()))
    }
}

impl From<GlobalF32> for F32 {
    fn from(g: GlobalF32) -> F32 {
        F32::from(&g)
    }
}

impl From<&ImportedF32> for F32 {
    fn from(g: &ImportedF32) -> F32 {
        F32(Expr::GlobalGet(g.slot.clone()))
    }
}

impl From<ImportedF32> for F32 {
    fn from(g: ImportedF32) -> F32 {
        F32::from(&g)
    }
}

impl From<LocalF32> for MutF32 {
    fn from(l: LocalF32) -> MutF32 {
        MutF32(Dst::Local(l.0))
    }
}

impl From<&GlobalF32> for MutF32 {
    fn from(g: &GlobalF32) -> MutF32 {
        MutF32(Dst::Global(g.slot.clone()))
    }
}

impl From<GlobalF32> for MutF32 {
    fn from(g: GlobalF32) -> MutF32 {
        MutF32::from(&g)
    }
}

impl From<&ImportedF32> for MutF32 {
    fn from(g: &ImportedF32) -> MutF32 {
        MutF32(Dst::Global(g.slot.clone()))
    }
}

impl From<ImportedF32> for MutF32 {
    fn from(g: ImportedF32) -> MutF32 {
        MutF32::from(&g)
    }
}

/// The constant value `v`.
pub fn const_f32(v: f32) -> F32 {
    F32(Expr::ConstF32(v))
}

macro_rules! f32_unops {
    ($($name:ident, $op:ident, $doc:literal;)*) => {$(
        #[doc = $doc]
        pub fn $name(a: impl Into<F32>) -> F32 {
            F32(Expr::F32Unop(F32Unop::$op, Box::new(a.into().0)))
        }
    )*};
}

f32_unops! {
    abs_f32, Abs, "The absolute value of `a`.";
    neg_f32, Neg, "The negation of `a`.";
    ceil_f32, Ceil, "`a` rounded up.";
    floor_f32, Floor, "`a` rounded down.";
    trunc_f32, Trunc, "`a` rounded towards zero.";
    nearest_f32, Nearest, "The nearest integral value to `a`, ties to even.";
    sqrt_f32, Sqrt, "The square root of `a`.";
}

macro_rules! f32_binops {
    ($($name:ident, $op:ident, $doc:literal;)*) => {$(
        #[doc = $doc]
        pub fn $name(a: impl Into<F32>, b: impl Into<F32>) -> F32 {
            F32(Expr::F32Binop(
                F32Binop::$op,
                Box::new(a.into().0),
                Box::new(b.into().0),
            ))
        }
    )*};
}

f32_binops! {
    add_f32, Add, "The sum of `a` and `b`.";
    sub_f32, Sub, "The difference of `a` and `b`.";
    mul_f32, Mul, "The product of `a` and `b`.";
    div_f32, Div, "The quotient of `a` and `b`.";
    min_f32, Min, "The minimum of `a` and `b`.";
    max_f32, Max, "The maximum of `a` and `b`.";
    copysign_f32, Copysign, "`a` with the sign of `b`.";
}

macro_rules! f32_cmps {
    ($($name:ident, $op:ident, $doc:literal;)*) => {$(
        #[doc = $doc]
        pub fn $name(a: impl Into<F32>, b: impl Into<F32>) -> I32 {
            I32(Expr::F32Cmp(
                F32Cmp::$op,
                Box::new(a.into().0),
                Box::new(b.into().0),
            ))
        }
    )*};
}

f32_cmps! {
    eq_f32, Eq, "1 if `a` equals `b`, else 0.";
    ne_f32, Ne, "1 if `a` differs from `b`, else 0.";
    lt_f32, Lt, "1 if `a` is less than `b`, else 0.";
    gt_f32, Gt, "1 if `a` is greater than `b`, else 0.";
    le_f32, Le, "1 if `a` is at most `b`, else 0.";
    ge_f32, Ge, "1 if `a` is at least `b`, else 0.";
}
