//! f32x4 vectors: globals, operators and lane extraction.

use std::rc::Rc;

use crate::expr::{Expr, F32, Vec4F32};
use crate::module::GlobalSlot;
use crate::opcodes::{V128Binop, V128Unop};

/// A v128 global holding four f32 lanes, defined by the module. Vector
/// globals are constant; they are read and combined inside functions and
/// observed one lane at a time with [`extract_lane_vec4_f32`].
#[derive(Clone, Debug)]
pub struct GlobalVec4F32 {
    pub(crate) slot: Rc<GlobalSlot>,
}

impl From<&GlobalVec4F32> for Vec4F32 {
    fn from(g: &GlobalVec4F32) -> Vec4F32 {
        Vec4F32(Expr::GlobalGet(g.slot.clone()))
    }
}

impl From<GlobalVec4F32> for Vec4F32 {
    fn from(g: GlobalVec4F32) -> Vec4F32 {
        Vec4F32::from(&g)
    }
}

/// The constant vector with the given lanes.
pub fn const_vec4_f32(lanes: [f32; 4]) -> Vec4F32 {
    Vec4F32(Expr::ConstV128(lanes))
}

/// The f32 value of lane `lane` of `v`.
///
/// Panics if `lane` is not in `0..4`.
pub fn extract_lane_vec4_f32(v: impl Into<Vec4F32>, lane: u8) -> F32 {
    assert!(lane < 4, "lane index {lane} out of range");
    F32(Expr::ExtractLane(Box::new(v.into().0), lane))
}

macro_rules! vec4_unops {
    ($($name:ident, $op:ident, $doc:literal;)*) => {$(
        #[doc = $doc]
        pub fn $name(a: impl Into<Vec4F32>) -> Vec4F32 {
            Vec4F32(Expr::V128Unop(V128Unop::$op, Box::new(a.into().0)))
        }
    )*};
}

vec4_unops! {
    abs_vec4_f32, Abs, "The lane-wise absolute value of `a`.";
    neg_vec4_f32, Neg, "The lane-wise negation of `a`.";
    ceil_vec4_f32, Ceil, "Every lane of `a` rounded up.";
    floor_vec4_f32, Floor, "Every lane of `a` rounded down.";
    trunc_vec4_f32, Trunc, "Every lane of `a` rounded towards zero.";
    nearest_vec4_f32, Nearest, "Every lane of `a` rounded to the nearest integral value, ties to even.";
    sqrt_vec4_f32, Sqrt, "The lane-wise square root of `a`.";
}

macro_rules! vec4_binops {
    ($($name:ident, $op:ident, $doc:literal;)*) => {$(
        #[doc = $doc]
        pub fn $name(a: impl Into<Vec4F32>, b: impl Into<Vec4F32>) -> Vec4F32 {
            Vec4F32(Expr::V128Binop(
                V128Binop::$op,
                Box::new(a.into().0),
                Box::new(b.into().0),
            ))
        }
    )*};
}

vec4_binops! {
    add_vec4_f32, Add, "The lane-wise sum of `a` and `b`.";
    sub_vec4_f32, Sub, "The lane-wise difference of `a` and `b`.";
    mul_vec4_f32, Mul, "The lane-wise product of `a` and `b`.";
    div_vec4_f32, Div, "The lane-wise quotient of `a` and `b`.";
    min_vec4_f32, Min, "The lane-wise minimum of `a` and `b`.";
    max_vec4_f32, Max, "The lane-wise maximum of `a` and `b`.";
}
