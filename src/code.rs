//! The buffer a function body is encoded into, and the context threaded
//! through the encoders.

use crate::function::FuncInner;

/// Body bytes under construction.
///
/// Function locals are split into an f32 group followed by an i32 group, so
/// the wire index of i32 local `k` is `f32_count + k`. The f32 count is only
/// final once the whole body has been encoded, because the control-flow
/// macros allocate locals while they encode. References to i32 locals are
/// therefore kept as unresolved slots until [`CodeBuf::assemble`] runs.
pub(crate) struct CodeBuf {
    segments: Vec<Segment>,
}

enum Segment {
    Bytes(Vec<u8>),
    // index of an i32 local, relative to its group
    LocalI32(u32),
}

impl CodeBuf {
    pub(crate) fn new() -> CodeBuf {
        CodeBuf {
            segments: Vec::new(),
        }
    }

    fn bytes(&mut self) -> &mut Vec<u8> {
        if !matches!(self.segments.last(), Some(Segment::Bytes(_))) {
            self.segments.push(Segment::Bytes(Vec::new()));
        }
        match self.segments.last_mut() {
            Some(Segment::Bytes(bytes)) => bytes,
            _ => unreachable!(),
        }
    }

    pub(crate) fn push(&mut self, byte: u8) {
        self.bytes().push(byte);
    }

    pub(crate) fn extend(&mut self, data: &[u8]) {
        self.bytes().extend_from_slice(data);
    }

    pub(crate) fn put_u32(&mut self, v: u32) {
        leb128::write::unsigned(self.bytes(), v as u64).unwrap();
    }

    pub(crate) fn put_u64(&mut self, v: u64) {
        leb128::write::unsigned(self.bytes(), v).unwrap();
    }

    /// The index operand of an i32 local, resolved at assembly.
    pub(crate) fn put_local_i32(&mut self, idx: u32) {
        self.segments.push(Segment::LocalI32(idx));
    }

    /// Write out the body with every i32 local offset past the f32 group.
    pub(crate) fn assemble(&self, f32_count: u32, out: &mut Vec<u8>) {
        for segment in &self.segments {
            match segment {
                Segment::Bytes(bytes) => out.extend_from_slice(bytes),
                Segment::LocalI32(idx) => {
                    leb128::write::unsigned(out, (f32_count + idx) as u64).unwrap();
                }
            }
        }
    }
}

/// Everything an instruction needs while lowering: the output buffer and the
/// function it belongs to, so locals can be allocated on demand.
pub(crate) struct Ctx<'a> {
    pub(crate) out: &'a mut CodeBuf,
    pub(crate) func: &'a FuncInner,
}
