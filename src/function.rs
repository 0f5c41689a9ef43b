//! Function bodies and their encoding into the code section.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::code::{CodeBuf, Ctx};
use crate::f32::LocalF32;
use crate::i32::LocalI32;
use crate::instr::Instruction;
use crate::opcodes as op;
use crate::types::{FuncType, ValType};

/// A callable wasm function under construction, created with
/// [`Module::function`](crate::Module::function).
///
/// Every function takes no parameters and returns nothing; results are
/// communicated through globals. The handle is cheap to clone and shares its
/// state with the module that created it.
#[derive(Clone)]
pub struct Function {
    pub(crate) inner: Rc<FuncInner>,
}

pub(crate) struct FuncInner {
    pub(crate) idx: u32,
    body: RefCell<Vec<Instruction>>,
    locals_f32: Cell<u32>,
    locals_i32: Cell<u32>,
}

impl Function {
    pub(crate) fn new(idx: u32) -> Function {
        Function {
            inner: Rc::new(FuncInner {
                idx,
                body: RefCell::new(Vec::new()),
                locals_f32: Cell::new(0),
                locals_i32: Cell::new(0),
            }),
        }
    }

    /// Replace the body of the function with the given instructions.
    pub fn body(&self, instructions: impl IntoIterator<Item = Instruction>) {
        *self.inner.body.borrow_mut() = instructions.into_iter().collect();
    }

    /// A fresh f32 local scoped to this function.
    pub fn local_f32(&self) -> LocalF32 {
        self.inner.local_f32()
    }

    /// A fresh i32 local scoped to this function.
    pub fn local_i32(&self) -> LocalI32 {
        self.inner.local_i32()
    }

    pub(crate) fn functype(&self) -> FuncType {
        FuncType {
            params: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Write the function's code-section entry: a length-framed locals
    /// prelude followed by the body expression.
    pub(crate) fn encode(&self, out: &mut Vec<u8>) {
        // encode the body first; the control-flow macros allocate locals
        // while they lower, so the counts settle only after this pass
        let mut body = CodeBuf::new();
        {
            let instructions = self.inner.body.borrow();
            let mut ctx = Ctx {
                out: &mut body,
                func: &self.inner,
            };
            for inst in instructions.iter() {
                inst.encode(&mut ctx);
            }
        }
        body.push(op::END);

        let f32_count = self.inner.locals_f32.get();
        let i32_count = self.inner.locals_i32.get();

        let mut code = Vec::new();
        // vec(locals): one f32 group, one i32 group
        leb128::write::unsigned(&mut code, 2).unwrap();
        leb128::write::unsigned(&mut code, f32_count as u64).unwrap();
        ValType::F32.encode(&mut code);
        leb128::write::unsigned(&mut code, i32_count as u64).unwrap();
        ValType::I32.encode(&mut code);
        body.assemble(f32_count, &mut code);

        leb128::write::unsigned(out, code.len() as u64).unwrap();
        out.extend_from_slice(&code);
    }
}

impl FuncInner {
    pub(crate) fn local_f32(&self) -> LocalF32 {
        let idx = self.locals_f32.get();
        self.locals_f32.set(idx + 1);
        LocalF32(idx)
    }

    pub(crate) fn local_i32(&self) -> LocalI32 {
        let idx = self.locals_i32.get();
        self.locals_i32.set(idx + 1);
        LocalI32(idx)
    }
}
