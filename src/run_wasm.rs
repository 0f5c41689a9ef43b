//! Test harness: instantiate compiled modules in wasmi and poke at their
//! exports.

use wasmi::{
    Config, Engine, Global, Instance, Linker, Memory, MemoryType, Module, Mutability, Store, Val,
};

pub fn dump_hex(data: &[u8]) {
    for (i, chunk) in data.chunks(16).enumerate() {
        print!("{:04x}: ", i * 16);
        for j in 0..16 {
            match chunk.get(j) {
                Some(b) => print!("{:02x} ", b),
                None => print!("   "),
            }
        }
        print!(": ");
        for &b in chunk {
            let c = b as char;
            print!(
                "{}",
                if c.is_ascii_graphic() || c == ' ' {
                    c
                } else {
                    '.'
                }
            );
        }
        println!();
    }
}

/// Host state a module under test is built against.
pub struct BuildCtx {
    pub store: Store<()>,
    pub linker: Linker<()>,
    memory: Option<Memory>,
}

impl BuildCtx {
    fn new(engine: &Engine) -> BuildCtx {
        BuildCtx {
            store: Store::new(engine, ()),
            linker: Linker::new(engine),
            memory: None,
        }
    }

    /// Define a mutable f32 global the module can import.
    pub fn host_global_f32(&mut self, module: &str, name: &str, init: f32) -> Global {
        let global = Global::new(&mut self.store, Val::F32(init.into()), Mutability::Var);
        self.linker.define(module, name, global).unwrap();
        global
    }

    /// Back a slice import: write `values` into linear memory at `offset` and
    /// define the i64 descriptor global.
    pub fn host_slice_f32(&mut self, name: &str, offset: u32, values: &[f32]) {
        let memory = match self.memory {
            Some(memory) => memory,
            None => {
                let memory = Memory::new(&mut self.store, MemoryType::new(1, None)).unwrap();
                self.linker.define("wasm", "memory", memory).unwrap();
                self.memory = Some(memory);
                memory
            }
        };
        let mut bytes = Vec::new();
        for v in values {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        memory
            .write(&mut self.store, offset as usize, &bytes)
            .unwrap();

        let descriptor = ((values.len() as u64) << 32) | offset as u64;
        let global = Global::new(
            &mut self.store,
            Val::I64(descriptor as i64),
            Mutability::Const,
        );
        self.linker.define("wasm", name, global).unwrap();
    }
}

/// An instantiated module.
pub struct TestCtx {
    store: Store<()>,
    instance: Instance,
}

impl TestCtx {
    /// Call the exported `() -> ()` function `name`.
    pub fn call(&mut self, name: &str) {
        let func = self
            .instance
            .get_typed_func::<(), ()>(&self.store, name)
            .unwrap();
        func.call(&mut self.store, ()).unwrap();
    }

    /// Read the exported f32 global `name`.
    pub fn global_f32(&self, name: &str) -> f32 {
        let global = self.instance.get_global(&self.store, name).unwrap();
        match global.get(&self.store) {
            Val::F32(v) => v.into(),
            v => panic!("export {name} is not an f32: {v:?}"),
        }
    }

    /// Read back a host global created with [`BuildCtx::host_global_f32`].
    pub fn host_f32(&self, global: Global) -> f32 {
        match global.get(&self.store) {
            Val::F32(v) => v.into(),
            v => panic!("host global is not an f32: {v:?}"),
        }
    }
}

/// Build a module, compile it, validate and instantiate it in wasmi, then
/// hand it to `test`. The build closure runs twice: identical operation
/// sequences must produce identical bytes.
pub fn check(build: impl Fn(&mut BuildCtx) -> crate::Module, test: impl FnOnce(&mut TestCtx)) {
    let mut config = Config::default();
    config.wasm_simd(true);
    let engine = Engine::new(&config);

    let mut ctx = BuildCtx::new(&engine);
    let binary = build(&mut ctx).compile().unwrap();
    let again = build(&mut BuildCtx::new(&engine)).compile().unwrap();
    assert_eq!(binary, again, "compilation must be deterministic");

    let module = match Module::new(&engine, &binary[..]) {
        Ok(module) => module,
        Err(err) => {
            dump_hex(&binary);
            panic!("module failed to validate: {err}");
        }
    };
    let BuildCtx {
        mut store, linker, ..
    } = ctx;
    let instance = linker
        .instantiate(&mut store, &module)
        .unwrap()
        .start(&mut store)
        .unwrap();
    let mut ctx = TestCtx { store, instance };
    test(&mut ctx);
}
