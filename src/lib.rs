//! Build WebAssembly binary modules from typed expression trees.
//!
//! A [`Module`] hands out globals, imports and [`Function`]s. Function bodies
//! are composed from f32, i32 and f32x4 expression nodes plus the
//! control-flow macros [`IfF32`], [`ForRangeF32`] and [`SliceRangeF32`], and
//! [`Module::compile`] lowers the whole thing to a wasm 1.0 binary any
//! conforming engine accepts.
//!
//! Every built function has the signature `() -> ()`; inputs and results
//! travel through globals, imported globals and slices of linear memory.
//!
//! ```
//! use numwasm::{assign_f32, mul_f32, Module};
//!
//! let mut m = Module::new();
//! let out = m.global_f32(0.0);
//! let f = m.function();
//! f.body([assign_f32(&out, mul_f32(6.0, 7.0))]);
//! m.export("out", &out);
//! m.export("run", &f);
//!
//! let binary = m.compile().unwrap();
//! assert_eq!(&binary[0..4], b"\0asm");
//! ```

mod code;
mod controlflow;
mod expr;
mod f32;
mod function;
mod i32;
mod instr;
mod module;
mod opcodes;
mod slice;
mod types;
mod vec;

#[cfg(test)]
mod run_wasm;

pub use controlflow::{ForRangeF32, IfF32, LoopBody};
pub use expr::{F32, I32, Vec4F32};
pub use f32::{
    abs_f32, add_f32, ceil_f32, const_f32, copysign_f32, div_f32, eq_f32, floor_f32, ge_f32,
    gt_f32, le_f32, lt_f32, max_f32, min_f32, mul_f32, ne_f32, nearest_f32, neg_f32, sqrt_f32,
    sub_f32, trunc_f32, GlobalF32, ImportedF32, LocalF32,
};
pub use function::Function;
pub use i32::{add_i32, const_i32, ge_u_i32, mul_i32, trunc_f32_u, LocalI32};
pub use instr::{assign_f32, assign_i32, Instruction, MutF32};
pub use module::{Error, Exportable, Module};
pub use slice::{SliceF32, SliceRangeF32};
pub use vec::{
    abs_vec4_f32, add_vec4_f32, ceil_vec4_f32, const_vec4_f32, div_vec4_f32,
    extract_lane_vec4_f32, floor_vec4_f32, max_vec4_f32, min_vec4_f32, mul_vec4_f32,
    nearest_vec4_f32, neg_vec4_f32, sqrt_vec4_f32, sub_vec4_f32, trunc_vec4_f32, GlobalVec4F32,
};

/// Write a section: its id, the LEB128 length of the payload, the payload.
pub(crate) fn write_section(w: &mut Vec<u8>, section_type: u8, f: impl FnOnce(&mut Vec<u8>)) {
    w.push(section_type);
    let section_start = w.len();

    f(w);

    // the payload length goes before the payload: write it at the end and
    // rotate it into place
    let section_len = w.len() - section_start;
    let len = leb128::write::unsigned(w, section_len as u64).unwrap();
    w[section_start..].rotate_right(len);
}
