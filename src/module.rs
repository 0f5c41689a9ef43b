//! The module builder: globals, imports, exports and section emission.
//!
//! https://webassembly.github.io/spec/core/binary/modules.html

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Context;
use thiserror::Error;

use crate::f32::{GlobalF32, ImportedF32};
use crate::function::Function;
use crate::opcodes as op;
use crate::slice::SliceF32;
use crate::types::{FuncType, GlobalType, ValType};
use crate::vec::GlobalVec4F32;
use crate::write_section;

/// Errors reported while building a module.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("malformed symbol {0:?}, expected \"module.name\"")]
    MalformedSymbol(String),
    #[error("duplicate import {0:?}")]
    DuplicateImport(String),
    #[error("function {0} has no signature")]
    MissingSignature(u32),
}

/// A slot in the module's global index space. Expression nodes keep a
/// reference to the slot and read the index when they encode: imports added
/// after a global was created shift its index, and nodes built earlier must
/// observe the shift.
#[derive(Debug)]
pub(crate) struct GlobalSlot {
    pub(crate) index: Cell<u32>,
}

enum GlobalInit {
    F32(f32),
    Vec4F32([f32; 4]),
}

struct DefinedGlobal {
    slot: Rc<GlobalSlot>,
    init: GlobalInit,
}

enum ImportDesc {
    // a mutable f32 global
    GlobalF32,
    // an immutable i64 slice descriptor
    SliceF32,
    Memory,
}

struct Import {
    module: String,
    name: String,
    desc: ImportDesc,
    slot: Option<Rc<GlobalSlot>>,
}

/// An item that can be exported from a module: a function or an f32 global.
pub struct Exportable(ExportKind);

enum ExportKind {
    Function(Function),
    Global(Rc<GlobalSlot>),
}

impl From<&Function> for Exportable {
    fn from(f: &Function) -> Exportable {
        Exportable(ExportKind::Function(f.clone()))
    }
}

impl From<Function> for Exportable {
    fn from(f: Function) -> Exportable {
        Exportable(ExportKind::Function(f))
    }
}

impl From<&GlobalF32> for Exportable {
    fn from(g: &GlobalF32) -> Exportable {
        Exportable(ExportKind::Global(g.slot.clone()))
    }
}

impl From<GlobalF32> for Exportable {
    fn from(g: GlobalF32) -> Exportable {
        Exportable(ExportKind::Global(g.slot))
    }
}

impl From<&ImportedF32> for Exportable {
    fn from(g: &ImportedF32) -> Exportable {
        Exportable(ExportKind::Global(g.slot.clone()))
    }
}

impl From<ImportedF32> for Exportable {
    fn from(g: ImportedF32) -> Exportable {
        Exportable(ExportKind::Global(g.slot))
    }
}

/// A wasm module under construction. [`Module::compile`] lowers it to the
/// binary format.
#[derive(Default)]
pub struct Module {
    functions: Vec<Function>,
    globals: Vec<DefinedGlobal>,
    imports: Vec<Import>,
    imported_globals: u32,
    exports: HashMap<String, Exportable>,
}

// interned function signatures, keyed back to functions by index
struct TypeTable {
    types: Vec<FuncType>,
    by_function: HashMap<u32, usize>,
}

impl Module {
    pub fn new() -> Module {
        Module::default()
    }

    /// Create a mutable f32 global initialized to `init`.
    pub fn global_f32(&mut self, init: f32) -> GlobalF32 {
        let slot = self.defined_slot();
        self.globals.push(DefinedGlobal {
            slot: slot.clone(),
            init: GlobalInit::F32(init),
        });
        GlobalF32 { slot }
    }

    /// Create a v128 global holding four f32 lanes.
    pub fn global_vec4_f32(&mut self, init: [f32; 4]) -> GlobalVec4F32 {
        let slot = self.defined_slot();
        self.globals.push(DefinedGlobal {
            slot: slot.clone(),
            init: GlobalInit::Vec4F32(init),
        });
        GlobalVec4F32 { slot }
    }

    // defined globals sit above every imported one in the index space
    fn defined_slot(&self) -> Rc<GlobalSlot> {
        Rc::new(GlobalSlot {
            index: Cell::new(self.imported_globals + self.globals.len() as u32),
        })
    }

    /// Create a function. Its body is empty until [`Function::body`] is
    /// called.
    pub fn function(&mut self) -> Function {
        let f = Function::new(self.functions.len() as u32);
        self.functions.push(f.clone());
        f
    }

    /// Import a mutable f32 global. `symbol` must name both the module and
    /// the field, joined by a dot: `"module.name"`.
    pub fn import_f32(&mut self, symbol: &str) -> Result<ImportedF32, Error> {
        let (module, name) = split_symbol(symbol)?;
        let slot = self.add_global_import(&module, &name, ImportDesc::GlobalF32)?;
        Ok(ImportedF32 { slot })
    }

    /// Import a slice of f32 values as `wasm.<name>`. The first slice also
    /// imports the module's linear memory as `wasm.memory`.
    pub fn import_slice_f32(&mut self, name: &str) -> Result<SliceF32, Error> {
        if !self
            .imports
            .iter()
            .any(|imp| matches!(imp.desc, ImportDesc::Memory))
        {
            self.imports.push(Import {
                module: "wasm".to_string(),
                name: "memory".to_string(),
                desc: ImportDesc::Memory,
                slot: None,
            });
        }
        let slot = self.add_global_import("wasm", name, ImportDesc::SliceF32)?;
        Ok(SliceF32 { slot })
    }

    fn add_global_import(
        &mut self,
        module: &str,
        name: &str,
        desc: ImportDesc,
    ) -> Result<Rc<GlobalSlot>, Error> {
        if self
            .imports
            .iter()
            .any(|imp| imp.module == module && imp.name == name)
        {
            return Err(Error::DuplicateImport(format!("{module}.{name}")));
        }
        // defined globals move up to keep the imports at the low end of the
        // index space
        for g in &self.globals {
            g.slot.index.set(g.slot.index.get() + 1);
        }
        let slot = Rc::new(GlobalSlot {
            index: Cell::new(self.imported_globals),
        });
        self.imported_globals += 1;
        self.imports.push(Import {
            module: module.to_string(),
            name: name.to_string(),
            desc,
            slot: Some(slot.clone()),
        });
        Ok(slot)
    }

    /// Export `item` as `name`. A previous export under the same name is
    /// replaced.
    pub fn export(&mut self, name: &str, item: impl Into<Exportable>) {
        self.exports.insert(name.to_string(), item.into());
    }

    /// Compile the module into binary wasm, consuming the builder.
    pub fn compile(self) -> anyhow::Result<Vec<u8>> {
        let types = self.intern_signatures();
        let exports = self.collect_exports();

        let mut out = Vec::new();
        // magic and version
        out.extend_from_slice(b"\0asm");
        out.extend_from_slice(&1u32.to_le_bytes());

        self.write_type_section(&mut out, &types);
        self.write_import_section(&mut out);
        self.write_function_section(&mut out, &types)
            .context("failed to write function section")?;
        self.write_global_section(&mut out);
        self.write_export_section(&mut out, &exports);
        self.write_code_section(&mut out);

        Ok(out)
    }

    fn intern_signatures(&self) -> TypeTable {
        let mut table = TypeTable {
            types: Vec::new(),
            by_function: HashMap::new(),
        };
        for f in &self.functions {
            let ft = f.functype();
            // the earliest equal signature wins
            let idx = match table.types.iter().position(|t| *t == ft) {
                Some(idx) => idx,
                None => {
                    table.types.push(ft);
                    table.types.len() - 1
                }
            };
            table.by_function.insert(f.inner.idx, idx);
        }
        table
    }

    // encode every export record, sorted by name for deterministic output
    fn collect_exports(&self) -> Vec<Vec<u8>> {
        let mut names: Vec<&String> = self.exports.keys().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| {
                let (kind, index) = match &self.exports[name].0 {
                    ExportKind::Function(f) => (0x00, f.inner.idx),
                    ExportKind::Global(slot) => (0x03, slot.index.get()),
                };
                let mut buf = Vec::new();
                leb128::write::unsigned(&mut buf, name.len() as u64).unwrap();
                buf.extend_from_slice(name.as_bytes());
                buf.push(kind);
                leb128::write::unsigned(&mut buf, index as u64).unwrap();
                buf
            })
            .collect()
    }

    fn write_type_section(&self, out: &mut Vec<u8>, types: &TypeTable) {
        if types.types.is_empty() {
            return;
        }
        write_section(out, 1, |w| {
            leb128::write::unsigned(w, types.types.len() as u64).unwrap();
            for ft in &types.types {
                ft.encode(w);
            }
        });
    }

    fn write_import_section(&self, out: &mut Vec<u8>) {
        if self.imports.is_empty() {
            return;
        }
        write_section(out, 2, |w| {
            leb128::write::unsigned(w, self.imports.len() as u64).unwrap();
            for imp in &self.imports {
                leb128::write::unsigned(w, imp.module.len() as u64).unwrap();
                w.extend_from_slice(imp.module.as_bytes());
                leb128::write::unsigned(w, imp.name.len() as u64).unwrap();
                w.extend_from_slice(imp.name.as_bytes());
                match imp.desc {
                    ImportDesc::GlobalF32 => {
                        w.push(0x03);
                        GlobalType {
                            val: ValType::F32,
                            mutable: true,
                        }
                        .encode(w);
                    }
                    ImportDesc::SliceF32 => {
                        w.push(0x03);
                        GlobalType {
                            val: ValType::I64,
                            mutable: false,
                        }
                        .encode(w);
                    }
                    ImportDesc::Memory => {
                        // limits: no maximum, minimum of one page
                        w.push(0x02);
                        w.push(0x00);
                        leb128::write::unsigned(w, 1).unwrap();
                    }
                }
            }
        });
    }

    fn write_function_section(&self, out: &mut Vec<u8>, types: &TypeTable) -> Result<(), Error> {
        if self.functions.is_empty() {
            return Ok(());
        }
        let mut indices = Vec::with_capacity(self.functions.len());
        for f in &self.functions {
            let idx = types
                .by_function
                .get(&f.inner.idx)
                .ok_or(Error::MissingSignature(f.inner.idx))?;
            indices.push(*idx as u64);
        }
        write_section(out, 3, |w| {
            leb128::write::unsigned(w, indices.len() as u64).unwrap();
            for idx in indices {
                leb128::write::unsigned(w, idx).unwrap();
            }
        });
        Ok(())
    }

    fn write_global_section(&self, out: &mut Vec<u8>) {
        if self.globals.is_empty() {
            return;
        }
        write_section(out, 6, |w| {
            leb128::write::unsigned(w, self.globals.len() as u64).unwrap();
            for g in &self.globals {
                match g.init {
                    GlobalInit::F32(v) => {
                        GlobalType {
                            val: ValType::F32,
                            mutable: true,
                        }
                        .encode(w);
                        w.push(op::F32_CONST);
                        w.extend_from_slice(&v.to_le_bytes());
                    }
                    GlobalInit::Vec4F32(lanes) => {
                        GlobalType {
                            val: ValType::V128,
                            mutable: false,
                        }
                        .encode(w);
                        w.push(op::SIMD_PREFIX);
                        leb128::write::unsigned(w, op::V128_CONST as u64).unwrap();
                        for lane in lanes {
                            w.extend_from_slice(&lane.to_le_bytes());
                        }
                    }
                }
                // end of the init expression
                w.push(op::END);
            }
        });
    }

    fn write_export_section(&self, out: &mut Vec<u8>, exports: &[Vec<u8>]) {
        if exports.is_empty() {
            return;
        }
        write_section(out, 7, |w| {
            leb128::write::unsigned(w, exports.len() as u64).unwrap();
            for e in exports {
                w.extend_from_slice(e);
            }
        });
    }

    fn write_code_section(&self, out: &mut Vec<u8>) {
        if self.functions.is_empty() {
            return;
        }
        write_section(out, 10, |w| {
            leb128::write::unsigned(w, self.functions.len() as u64).unwrap();
            for f in &self.functions {
                f.encode(w);
            }
        });
    }
}

fn split_symbol(symbol: &str) -> Result<(String, String), Error> {
    let mut parts = symbol.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(module), Some(name), None) if !module.is_empty() && !name.is_empty() => {
            Ok((module.to_string(), name.to_string()))
        }
        _ => Err(Error::MalformedSymbol(symbol.to_string())),
    }
}
