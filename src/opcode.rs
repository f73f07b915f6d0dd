// Copyright (c) 2025 Joshua Seaton
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! The opcode catalogue: every WebAssembly instruction's stable identifier,
//! binary encoding, operand/result signature, and feature gate.
//!
//! [`CATALOG`] is the single source of truth; every other operation in this
//! module (`FromCode`, `FromName`, `Signature`, ...) is a lookup over it.
//! The table is authored sorted by `(prefix, code)` within each prefix
//! group, so [`Opcode::from_code`] can binary-search each group directly.

use bitflags::bitflags;

use crate::error::{IrError, Result};
use crate::types::ValType;

bitflags! {
    /// WebAssembly proposals gating a given opcode's availability.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Features: u32 {
        /// Core WebAssembly 1.0, always available.
        const BASE = 0;
        /// Sign-extension operators (opcodes `0xC0`-`0xC4`).
        const SIGN_EXTENSION = 1 << 0;
        /// Bulk memory operations and reference types (`0xFC` prefix,
        /// table/memory family).
        const BULK_MEMORY = 1 << 1;
        /// Non-trapping float-to-int conversions (`0xFC` prefix, numeric
        /// family).
        const NON_TRAPPING_FLOAT_TO_INT = 1 << 2;
        /// Reference types (`ref.null`, `ref.is_null`, `ref.func`, table
        /// instructions).
        const REFERENCE_TYPES = 1 << 3;
        /// Fixed-width SIMD (`0xFD` prefix).
        const SIMD = 1 << 4;
        /// Threads and atomics (`0xFE` prefix).
        const THREADS = 1 << 5;
        /// Legacy exception-handling proposal (`try`/`catch`/`throw`/
        /// `rethrow`/`br_on_exn`).
        const EXCEPTIONS = 1 << 6;
        /// Tail calls (`return_call`, `return_call_indirect`).
        const TAIL_CALL = 1 << 7;
    }
}

/// Binary prefix byte introducing an extension's opcode space. `0` denotes
/// an unprefixed, single-byte opcode.
pub const PREFIX_NONE: u8 = 0x00;
/// Bulk memory, reference types, and non-trapping conversions.
pub const PREFIX_BULK: u8 = 0xFC;
/// Fixed-width SIMD.
pub const PREFIX_SIMD: u8 = 0xFD;
/// Threads and atomics.
pub const PREFIX_THREADS: u8 = 0xFE;

/// A stable identifier for one WebAssembly instruction.
///
/// Variants are grouped by prefix in source, matching [`CATALOG`]'s layout,
/// but the enum itself carries no encoding information — that lives
/// entirely in the catalogue row, looked up via [`Opcode::entry`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Opcode {
    // -- control / parametric / variable / table / memory / numeric (unprefixed) --
    Unreachable,
    Nop,
    Block,
    Loop,
    If,
    Else,
    Try,
    Catch,
    Throw,
    Rethrow,
    BrOnExn,
    End,
    Br,
    BrIf,
    BrTable,
    Return,
    Call,
    CallIndirect,
    ReturnCall,
    ReturnCallIndirect,
    Drop,
    Select,
    SelectT,
    LocalGet,
    LocalSet,
    LocalTee,
    GlobalGet,
    GlobalSet,
    TableGet,
    TableSet,
    RefNull,
    RefIsNull,
    RefFunc,
    I32Load,
    I64Load,
    F32Load,
    F64Load,
    I32Load8S,
    I32Load8U,
    I32Load16S,
    I32Load16U,
    I64Load8S,
    I64Load8U,
    I64Load16S,
    I64Load16U,
    I64Load32S,
    I64Load32U,
    I32Store,
    I64Store,
    F32Store,
    F64Store,
    I32Store8,
    I32Store16,
    I64Store8,
    I64Store16,
    I64Store32,
    MemorySize,
    MemoryGrow,
    I32Const,
    I64Const,
    F32Const,
    F64Const,
    I32Eqz,
    I32Eq,
    I32Ne,
    I32LtS,
    I32LtU,
    I32GtS,
    I32GtU,
    I32LeS,
    I32LeU,
    I32GeS,
    I32GeU,
    I64Eqz,
    I64Eq,
    I64Ne,
    I64LtS,
    I64LtU,
    I64GtS,
    I64GtU,
    I64LeS,
    I64LeU,
    I64GeS,
    I64GeU,
    F32Eq,
    F32Ne,
    F32Lt,
    F32Gt,
    F32Le,
    F32Ge,
    F64Eq,
    F64Ne,
    F64Lt,
    F64Gt,
    F64Le,
    F64Ge,
    I32Clz,
    I32Ctz,
    I32Popcnt,
    I32Add,
    I32Sub,
    I32Mul,
    I32DivS,
    I32DivU,
    I32RemS,
    I32RemU,
    I32And,
    I32Or,
    I32Xor,
    I32Shl,
    I32ShrS,
    I32ShrU,
    I32Rotl,
    I32Rotr,
    I64Clz,
    I64Ctz,
    I64Popcnt,
    I64Add,
    I64Sub,
    I64Mul,
    I64DivS,
    I64DivU,
    I64RemS,
    I64RemU,
    I64And,
    I64Or,
    I64Xor,
    I64Shl,
    I64ShrS,
    I64ShrU,
    I64Rotl,
    I64Rotr,
    F32Abs,
    F32Neg,
    F32Ceil,
    F32Floor,
    F32Trunc,
    F32Nearest,
    F32Sqrt,
    F32Add,
    F32Sub,
    F32Mul,
    F32Div,
    F32Min,
    F32Max,
    F32Copysign,
    F64Abs,
    F64Neg,
    F64Ceil,
    F64Floor,
    F64Trunc,
    F64Nearest,
    F64Sqrt,
    F64Add,
    F64Sub,
    F64Mul,
    F64Div,
    F64Min,
    F64Max,
    F64Copysign,
    I32WrapI64,
    I32TruncF32S,
    I32TruncF32U,
    I32TruncF64S,
    I32TruncF64U,
    I64ExtendI32S,
    I64ExtendI32U,
    I64TruncF32S,
    I64TruncF32U,
    I64TruncF64S,
    I64TruncF64U,
    F32ConvertI32S,
    F32ConvertI32U,
    F32ConvertI64S,
    F32ConvertI64U,
    F32DemoteF64,
    F64ConvertI32S,
    F64ConvertI32U,
    F64ConvertI64S,
    F64ConvertI64U,
    F64PromoteF32,
    I32ReinterpretF32,
    I64ReinterpretF64,
    F32ReinterpretI32,
    F64ReinterpretI64,
    I32Extend8S,
    I32Extend16S,
    I64Extend8S,
    I64Extend16S,
    I64Extend32S,

    // -- bulk memory / reference types / non-trapping conversions (0xFC) --
    I32TruncSatF32S,
    I32TruncSatF32U,
    I32TruncSatF64S,
    I32TruncSatF64U,
    I64TruncSatF32S,
    I64TruncSatF32U,
    I64TruncSatF64S,
    I64TruncSatF64U,
    MemoryInit,
    DataDrop,
    MemoryCopy,
    MemoryFill,
    TableInit,
    ElemDrop,
    TableCopy,
    TableGrow,
    TableSize,
    TableFill,

    // -- SIMD, representative subset (0xFD) --
    V128Load,
    V128Load8Splat,
    V128Load16Splat,
    V128Load32Splat,
    V128Load64Splat,
    V128Store,
    V128Const,
    I8x16Shuffle,
    I8x16Splat,
    I16x8Splat,
    I32x4Splat,
    I64x2Splat,
    F32x4Splat,
    F64x2Splat,
    I8x16ExtractLaneS,
    I8x16ReplaceLane,
    I32x4ExtractLane,
    I32x4ReplaceLane,
    I8x16Eq,
    I32x4Eq,
    F32x4Eq,
    V128Not,
    V128And,
    V128Or,
    V128Xor,
    V128Bitselect,
    I8x16Add,
    I8x16Sub,
    I16x8Add,
    I16x8Sub,
    I16x8Mul,
    I32x4Add,
    I32x4Sub,
    I32x4Mul,
    I64x2Add,
    I64x2Sub,
    F32x4Add,
    F32x4Sub,
    F32x4Mul,
    F32x4Div,
    F64x2Add,
    F64x2Sub,
    F64x2Mul,
    F64x2Div,

    // -- threads & atomics, representative subset (0xFE) --
    AtomicFence,
    MemoryAtomicNotify,
    MemoryAtomicWait32,
    MemoryAtomicWait64,
    I32AtomicLoad,
    I64AtomicLoad,
    I32AtomicStore,
    I64AtomicStore,
    I32AtomicRmwAdd,
    I64AtomicRmwAdd,
    I32AtomicRmwCmpxchg,
    I64AtomicRmwCmpxchg,
}

/// One catalogue entry: everything needed to translate between an
/// [`Opcode`], its binary encoding, and its operand/result typing.
#[derive(Clone, Copy, Debug)]
pub struct Entry {
    /// The opcode this row describes.
    pub op: Opcode,
    /// Prefix byte (`PREFIX_NONE` for unprefixed).
    pub prefix: u8,
    /// Opcode byte, or (for prefixed families) the ULEB128-encoded subcode.
    pub code: u32,
    /// Canonical textual mnemonic (e.g. `"i32.add"`).
    pub text: &'static str,
    /// Result type, or [`ValType::Void`] if the instruction produces no
    /// value.
    pub result: ValType,
    /// Operand types, in order. Variadic/polymorphic instructions (e.g.
    /// `select`, `call_indirect`) list their catalogue-fixed operands only;
    /// stack-polymorphic operands are resolved by validation, not here.
    pub operands: &'static [ValType],
    /// Size in bytes of the memory access this opcode performs, or `0` for
    /// non-memory opcodes. Used to derive natural alignment.
    pub memory_size: u32,
    /// Proposal(s) gating this opcode's availability.
    pub features: Features,
}

const fn e(
    op: Opcode,
    prefix: u8,
    code: u32,
    text: &'static str,
    result: ValType,
    operands: &'static [ValType],
    memory_size: u32,
    features: Features,
) -> Entry {
    Entry { op, prefix, code, text, result, operands, memory_size, features }
}

use ValType::{AnyRef, F32, F64, FuncRef, I32, I64, V128 as Vec128, Void};

/// The authoritative opcode table, sorted by `(prefix, code)` within each
/// prefix group.
pub static CATALOG: &[Entry] = &[
    e(Opcode::Unreachable, PREFIX_NONE, 0x00, "unreachable", Void, &[], 0, Features::BASE),
    e(Opcode::Nop, PREFIX_NONE, 0x01, "nop", Void, &[], 0, Features::BASE),
    e(Opcode::Block, PREFIX_NONE, 0x02, "block", Void, &[], 0, Features::BASE),
    e(Opcode::Loop, PREFIX_NONE, 0x03, "loop", Void, &[], 0, Features::BASE),
    e(Opcode::If, PREFIX_NONE, 0x04, "if", Void, &[I32], 0, Features::BASE),
    e(Opcode::Else, PREFIX_NONE, 0x05, "else", Void, &[], 0, Features::BASE),
    e(Opcode::Try, PREFIX_NONE, 0x06, "try", Void, &[], 0, Features::EXCEPTIONS),
    e(Opcode::Catch, PREFIX_NONE, 0x07, "catch", Void, &[], 0, Features::EXCEPTIONS),
    e(Opcode::Throw, PREFIX_NONE, 0x08, "throw", Void, &[], 0, Features::EXCEPTIONS),
    e(Opcode::Rethrow, PREFIX_NONE, 0x09, "rethrow", Void, &[], 0, Features::EXCEPTIONS),
    e(Opcode::BrOnExn, PREFIX_NONE, 0x0a, "br_on_exn", Void, &[], 0, Features::EXCEPTIONS),
    e(Opcode::End, PREFIX_NONE, 0x0b, "end", Void, &[], 0, Features::BASE),
    e(Opcode::Br, PREFIX_NONE, 0x0c, "br", Void, &[], 0, Features::BASE),
    e(Opcode::BrIf, PREFIX_NONE, 0x0d, "br_if", Void, &[I32], 0, Features::BASE),
    e(Opcode::BrTable, PREFIX_NONE, 0x0e, "br_table", Void, &[I32], 0, Features::BASE),
    e(Opcode::Return, PREFIX_NONE, 0x0f, "return", Void, &[], 0, Features::BASE),
    e(Opcode::Call, PREFIX_NONE, 0x10, "call", Void, &[], 0, Features::BASE),
    e(Opcode::CallIndirect, PREFIX_NONE, 0x11, "call_indirect", Void, &[I32], 0, Features::BASE),
    e(Opcode::ReturnCall, PREFIX_NONE, 0x12, "return_call", Void, &[], 0, Features::TAIL_CALL),
    e(Opcode::ReturnCallIndirect, PREFIX_NONE, 0x13, "return_call_indirect", Void, &[I32], 0, Features::TAIL_CALL),
    e(Opcode::Drop, PREFIX_NONE, 0x1a, "drop", Void, &[], 0, Features::BASE),
    e(Opcode::Select, PREFIX_NONE, 0x1b, "select", Void, &[], 0, Features::BASE),
    e(Opcode::SelectT, PREFIX_NONE, 0x1c, "select_t", Void, &[], 0, Features::REFERENCE_TYPES),
    e(Opcode::LocalGet, PREFIX_NONE, 0x20, "local.get", Void, &[], 0, Features::BASE),
    e(Opcode::LocalSet, PREFIX_NONE, 0x21, "local.set", Void, &[], 0, Features::BASE),
    e(Opcode::LocalTee, PREFIX_NONE, 0x22, "local.tee", Void, &[], 0, Features::BASE),
    e(Opcode::GlobalGet, PREFIX_NONE, 0x23, "global.get", Void, &[], 0, Features::BASE),
    e(Opcode::GlobalSet, PREFIX_NONE, 0x24, "global.set", Void, &[], 0, Features::BASE),
    e(Opcode::TableGet, PREFIX_NONE, 0x25, "table.get", AnyRef, &[I32], 0, Features::REFERENCE_TYPES),
    e(Opcode::TableSet, PREFIX_NONE, 0x26, "table.set", Void, &[I32, AnyRef], 0, Features::REFERENCE_TYPES),
    e(Opcode::I32Load, PREFIX_NONE, 0x28, "i32.load", I32, &[I32], 4, Features::BASE),
    e(Opcode::I64Load, PREFIX_NONE, 0x29, "i64.load", I64, &[I32], 8, Features::BASE),
    e(Opcode::F32Load, PREFIX_NONE, 0x2a, "f32.load", F32, &[I32], 4, Features::BASE),
    e(Opcode::F64Load, PREFIX_NONE, 0x2b, "f64.load", F64, &[I32], 8, Features::BASE),
    e(Opcode::I32Load8S, PREFIX_NONE, 0x2c, "i32.load8_s", I32, &[I32], 1, Features::BASE),
    e(Opcode::I32Load8U, PREFIX_NONE, 0x2d, "i32.load8_u", I32, &[I32], 1, Features::BASE),
    e(Opcode::I32Load16S, PREFIX_NONE, 0x2e, "i32.load16_s", I32, &[I32], 2, Features::BASE),
    e(Opcode::I32Load16U, PREFIX_NONE, 0x2f, "i32.load16_u", I32, &[I32], 2, Features::BASE),
    e(Opcode::I64Load8S, PREFIX_NONE, 0x30, "i64.load8_s", I64, &[I32], 1, Features::BASE),
    e(Opcode::I64Load8U, PREFIX_NONE, 0x31, "i64.load8_u", I64, &[I32], 1, Features::BASE),
    e(Opcode::I64Load16S, PREFIX_NONE, 0x32, "i64.load16_s", I64, &[I32], 2, Features::BASE),
    e(Opcode::I64Load16U, PREFIX_NONE, 0x33, "i64.load16_u", I64, &[I32], 2, Features::BASE),
    e(Opcode::I64Load32S, PREFIX_NONE, 0x34, "i64.load32_s", I64, &[I32], 4, Features::BASE),
    e(Opcode::I64Load32U, PREFIX_NONE, 0x35, "i64.load32_u", I64, &[I32], 4, Features::BASE),
    e(Opcode::I32Store, PREFIX_NONE, 0x36, "i32.store", Void, &[I32, I32], 4, Features::BASE),
    e(Opcode::I64Store, PREFIX_NONE, 0x37, "i64.store", Void, &[I32, I64], 8, Features::BASE),
    e(Opcode::F32Store, PREFIX_NONE, 0x38, "f32.store", Void, &[I32, F32], 4, Features::BASE),
    e(Opcode::F64Store, PREFIX_NONE, 0x39, "f64.store", Void, &[I32, F64], 8, Features::BASE),
    e(Opcode::I32Store8, PREFIX_NONE, 0x3a, "i32.store8", Void, &[I32, I32], 1, Features::BASE),
    e(Opcode::I32Store16, PREFIX_NONE, 0x3b, "i32.store16", Void, &[I32, I32], 2, Features::BASE),
    e(Opcode::I64Store8, PREFIX_NONE, 0x3c, "i64.store8", Void, &[I32, I64], 1, Features::BASE),
    e(Opcode::I64Store16, PREFIX_NONE, 0x3d, "i64.store16", Void, &[I32, I64], 2, Features::BASE),
    e(Opcode::I64Store32, PREFIX_NONE, 0x3e, "i64.store32", Void, &[I32, I64], 4, Features::BASE),
    e(Opcode::MemorySize, PREFIX_NONE, 0x3f, "memory.size", I32, &[], 0, Features::BASE),
    e(Opcode::MemoryGrow, PREFIX_NONE, 0x40, "memory.grow", I32, &[I32], 0, Features::BASE),
    e(Opcode::I32Const, PREFIX_NONE, 0x41, "i32.const", I32, &[], 0, Features::BASE),
    e(Opcode::I64Const, PREFIX_NONE, 0x42, "i64.const", I64, &[], 0, Features::BASE),
    e(Opcode::F32Const, PREFIX_NONE, 0x43, "f32.const", F32, &[], 0, Features::BASE),
    e(Opcode::F64Const, PREFIX_NONE, 0x44, "f64.const", F64, &[], 0, Features::BASE),
    e(Opcode::I32Eqz, PREFIX_NONE, 0x45, "i32.eqz", I32, &[I32], 0, Features::BASE),
    e(Opcode::I32Eq, PREFIX_NONE, 0x46, "i32.eq", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32Ne, PREFIX_NONE, 0x47, "i32.ne", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32LtS, PREFIX_NONE, 0x48, "i32.lt_s", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32LtU, PREFIX_NONE, 0x49, "i32.lt_u", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32GtS, PREFIX_NONE, 0x4a, "i32.gt_s", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32GtU, PREFIX_NONE, 0x4b, "i32.gt_u", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32LeS, PREFIX_NONE, 0x4c, "i32.le_s", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32LeU, PREFIX_NONE, 0x4d, "i32.le_u", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32GeS, PREFIX_NONE, 0x4e, "i32.ge_s", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32GeU, PREFIX_NONE, 0x4f, "i32.ge_u", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I64Eqz, PREFIX_NONE, 0x50, "i64.eqz", I32, &[I64], 0, Features::BASE),
    e(Opcode::I64Eq, PREFIX_NONE, 0x51, "i64.eq", I32, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64Ne, PREFIX_NONE, 0x52, "i64.ne", I32, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64LtS, PREFIX_NONE, 0x53, "i64.lt_s", I32, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64LtU, PREFIX_NONE, 0x54, "i64.lt_u", I32, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64GtS, PREFIX_NONE, 0x55, "i64.gt_s", I32, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64GtU, PREFIX_NONE, 0x56, "i64.gt_u", I32, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64LeS, PREFIX_NONE, 0x57, "i64.le_s", I32, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64LeU, PREFIX_NONE, 0x58, "i64.le_u", I32, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64GeS, PREFIX_NONE, 0x59, "i64.ge_s", I32, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64GeU, PREFIX_NONE, 0x5a, "i64.ge_u", I32, &[I64, I64], 0, Features::BASE),
    e(Opcode::F32Eq, PREFIX_NONE, 0x5b, "f32.eq", I32, &[F32, F32], 0, Features::BASE),
    e(Opcode::F32Ne, PREFIX_NONE, 0x5c, "f32.ne", I32, &[F32, F32], 0, Features::BASE),
    e(Opcode::F32Lt, PREFIX_NONE, 0x5d, "f32.lt", I32, &[F32, F32], 0, Features::BASE),
    e(Opcode::F32Gt, PREFIX_NONE, 0x5e, "f32.gt", I32, &[F32, F32], 0, Features::BASE),
    e(Opcode::F32Le, PREFIX_NONE, 0x5f, "f32.le", I32, &[F32, F32], 0, Features::BASE),
    e(Opcode::F32Ge, PREFIX_NONE, 0x60, "f32.ge", I32, &[F32, F32], 0, Features::BASE),
    e(Opcode::F64Eq, PREFIX_NONE, 0x61, "f64.eq", I32, &[F64, F64], 0, Features::BASE),
    e(Opcode::F64Ne, PREFIX_NONE, 0x62, "f64.ne", I32, &[F64, F64], 0, Features::BASE),
    e(Opcode::F64Lt, PREFIX_NONE, 0x63, "f64.lt", I32, &[F64, F64], 0, Features::BASE),
    e(Opcode::F64Gt, PREFIX_NONE, 0x64, "f64.gt", I32, &[F64, F64], 0, Features::BASE),
    e(Opcode::F64Le, PREFIX_NONE, 0x65, "f64.le", I32, &[F64, F64], 0, Features::BASE),
    e(Opcode::F64Ge, PREFIX_NONE, 0x66, "f64.ge", I32, &[F64, F64], 0, Features::BASE),
    e(Opcode::I32Clz, PREFIX_NONE, 0x67, "i32.clz", I32, &[I32], 0, Features::BASE),
    e(Opcode::I32Ctz, PREFIX_NONE, 0x68, "i32.ctz", I32, &[I32], 0, Features::BASE),
    e(Opcode::I32Popcnt, PREFIX_NONE, 0x69, "i32.popcnt", I32, &[I32], 0, Features::BASE),
    e(Opcode::I32Add, PREFIX_NONE, 0x6a, "i32.add", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32Sub, PREFIX_NONE, 0x6b, "i32.sub", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32Mul, PREFIX_NONE, 0x6c, "i32.mul", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32DivS, PREFIX_NONE, 0x6d, "i32.div_s", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32DivU, PREFIX_NONE, 0x6e, "i32.div_u", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32RemS, PREFIX_NONE, 0x6f, "i32.rem_s", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32RemU, PREFIX_NONE, 0x70, "i32.rem_u", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32And, PREFIX_NONE, 0x71, "i32.and", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32Or, PREFIX_NONE, 0x72, "i32.or", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32Xor, PREFIX_NONE, 0x73, "i32.xor", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32Shl, PREFIX_NONE, 0x74, "i32.shl", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32ShrS, PREFIX_NONE, 0x75, "i32.shr_s", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32ShrU, PREFIX_NONE, 0x76, "i32.shr_u", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32Rotl, PREFIX_NONE, 0x77, "i32.rotl", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I32Rotr, PREFIX_NONE, 0x78, "i32.rotr", I32, &[I32, I32], 0, Features::BASE),
    e(Opcode::I64Clz, PREFIX_NONE, 0x79, "i64.clz", I64, &[I64], 0, Features::BASE),
    e(Opcode::I64Ctz, PREFIX_NONE, 0x7a, "i64.ctz", I64, &[I64], 0, Features::BASE),
    e(Opcode::I64Popcnt, PREFIX_NONE, 0x7b, "i64.popcnt", I64, &[I64], 0, Features::BASE),
    e(Opcode::I64Add, PREFIX_NONE, 0x7c, "i64.add", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64Sub, PREFIX_NONE, 0x7d, "i64.sub", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64Mul, PREFIX_NONE, 0x7e, "i64.mul", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64DivS, PREFIX_NONE, 0x7f, "i64.div_s", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64DivU, PREFIX_NONE, 0x80, "i64.div_u", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64RemS, PREFIX_NONE, 0x81, "i64.rem_s", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64RemU, PREFIX_NONE, 0x82, "i64.rem_u", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64And, PREFIX_NONE, 0x83, "i64.and", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64Or, PREFIX_NONE, 0x84, "i64.or", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64Xor, PREFIX_NONE, 0x85, "i64.xor", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64Shl, PREFIX_NONE, 0x86, "i64.shl", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64ShrS, PREFIX_NONE, 0x87, "i64.shr_s", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64ShrU, PREFIX_NONE, 0x88, "i64.shr_u", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64Rotl, PREFIX_NONE, 0x89, "i64.rotl", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::I64Rotr, PREFIX_NONE, 0x8a, "i64.rotr", I64, &[I64, I64], 0, Features::BASE),
    e(Opcode::F32Abs, PREFIX_NONE, 0x8b, "f32.abs", F32, &[F32], 0, Features::BASE),
    e(Opcode::F32Neg, PREFIX_NONE, 0x8c, "f32.neg", F32, &[F32], 0, Features::BASE),
    e(Opcode::F32Ceil, PREFIX_NONE, 0x8d, "f32.ceil", F32, &[F32], 0, Features::BASE),
    e(Opcode::F32Floor, PREFIX_NONE, 0x8e, "f32.floor", F32, &[F32], 0, Features::BASE),
    e(Opcode::F32Trunc, PREFIX_NONE, 0x8f, "f32.trunc", F32, &[F32], 0, Features::BASE),
    e(Opcode::F32Nearest, PREFIX_NONE, 0x90, "f32.nearest", F32, &[F32], 0, Features::BASE),
    e(Opcode::F32Sqrt, PREFIX_NONE, 0x91, "f32.sqrt", F32, &[F32], 0, Features::BASE),
    e(Opcode::F32Add, PREFIX_NONE, 0x92, "f32.add", F32, &[F32, F32], 0, Features::BASE),
    e(Opcode::F32Sub, PREFIX_NONE, 0x93, "f32.sub", F32, &[F32, F32], 0, Features::BASE),
    e(Opcode::F32Mul, PREFIX_NONE, 0x94, "f32.mul", F32, &[F32, F32], 0, Features::BASE),
    e(Opcode::F32Div, PREFIX_NONE, 0x95, "f32.div", F32, &[F32, F32], 0, Features::BASE),
    e(Opcode::F32Min, PREFIX_NONE, 0x96, "f32.min", F32, &[F32, F32], 0, Features::BASE),
    e(Opcode::F32Max, PREFIX_NONE, 0x97, "f32.max", F32, &[F32, F32], 0, Features::BASE),
    e(Opcode::F32Copysign, PREFIX_NONE, 0x98, "f32.copysign", F32, &[F32, F32], 0, Features::BASE),
    e(Opcode::F64Abs, PREFIX_NONE, 0x99, "f64.abs", F64, &[F64], 0, Features::BASE),
    e(Opcode::F64Neg, PREFIX_NONE, 0x9a, "f64.neg", F64, &[F64], 0, Features::BASE),
    e(Opcode::F64Ceil, PREFIX_NONE, 0x9b, "f64.ceil", F64, &[F64], 0, Features::BASE),
    e(Opcode::F64Floor, PREFIX_NONE, 0x9c, "f64.floor", F64, &[F64], 0, Features::BASE),
    e(Opcode::F64Trunc, PREFIX_NONE, 0x9d, "f64.trunc", F64, &[F64], 0, Features::BASE),
    e(Opcode::F64Nearest, PREFIX_NONE, 0x9e, "f64.nearest", F64, &[F64], 0, Features::BASE),
    e(Opcode::F64Sqrt, PREFIX_NONE, 0x9f, "f64.sqrt", F64, &[F64], 0, Features::BASE),
    e(Opcode::F64Add, PREFIX_NONE, 0xa0, "f64.add", F64, &[F64, F64], 0, Features::BASE),
    e(Opcode::F64Sub, PREFIX_NONE, 0xa1, "f64.sub", F64, &[F64, F64], 0, Features::BASE),
    e(Opcode::F64Mul, PREFIX_NONE, 0xa2, "f64.mul", F64, &[F64, F64], 0, Features::BASE),
    e(Opcode::F64Div, PREFIX_NONE, 0xa3, "f64.div", F64, &[F64, F64], 0, Features::BASE),
    e(Opcode::F64Min, PREFIX_NONE, 0xa4, "f64.min", F64, &[F64, F64], 0, Features::BASE),
    e(Opcode::F64Max, PREFIX_NONE, 0xa5, "f64.max", F64, &[F64, F64], 0, Features::BASE),
    e(Opcode::F64Copysign, PREFIX_NONE, 0xa6, "f64.copysign", F64, &[F64, F64], 0, Features::BASE),
    e(Opcode::I32WrapI64, PREFIX_NONE, 0xa7, "i32.wrap_i64", I32, &[I64], 0, Features::BASE),
    e(Opcode::I32TruncF32S, PREFIX_NONE, 0xa8, "i32.trunc_f32_s", I32, &[F32], 0, Features::BASE),
    e(Opcode::I32TruncF32U, PREFIX_NONE, 0xa9, "i32.trunc_f32_u", I32, &[F32], 0, Features::BASE),
    e(Opcode::I32TruncF64S, PREFIX_NONE, 0xaa, "i32.trunc_f64_s", I32, &[F64], 0, Features::BASE),
    e(Opcode::I32TruncF64U, PREFIX_NONE, 0xab, "i32.trunc_f64_u", I32, &[F64], 0, Features::BASE),
    e(Opcode::I64ExtendI32S, PREFIX_NONE, 0xac, "i64.extend_i32_s", I64, &[I32], 0, Features::BASE),
    e(Opcode::I64ExtendI32U, PREFIX_NONE, 0xad, "i64.extend_i32_u", I64, &[I32], 0, Features::BASE),
    e(Opcode::I64TruncF32S, PREFIX_NONE, 0xae, "i64.trunc_f32_s", I64, &[F32], 0, Features::BASE),
    e(Opcode::I64TruncF32U, PREFIX_NONE, 0xaf, "i64.trunc_f32_u", I64, &[F32], 0, Features::BASE),
    e(Opcode::I64TruncF64S, PREFIX_NONE, 0xb0, "i64.trunc_f64_s", I64, &[F64], 0, Features::BASE),
    e(Opcode::I64TruncF64U, PREFIX_NONE, 0xb1, "i64.trunc_f64_u", I64, &[F64], 0, Features::BASE),
    e(Opcode::F32ConvertI32S, PREFIX_NONE, 0xb2, "f32.convert_i32_s", F32, &[I32], 0, Features::BASE),
    e(Opcode::F32ConvertI32U, PREFIX_NONE, 0xb3, "f32.convert_i32_u", F32, &[I32], 0, Features::BASE),
    e(Opcode::F32ConvertI64S, PREFIX_NONE, 0xb4, "f32.convert_i64_s", F32, &[I64], 0, Features::BASE),
    e(Opcode::F32ConvertI64U, PREFIX_NONE, 0xb5, "f32.convert_i64_u", F32, &[I64], 0, Features::BASE),
    e(Opcode::F32DemoteF64, PREFIX_NONE, 0xb6, "f32.demote_f64", F32, &[F64], 0, Features::BASE),
    e(Opcode::F64ConvertI32S, PREFIX_NONE, 0xb7, "f64.convert_i32_s", F64, &[I32], 0, Features::BASE),
    e(Opcode::F64ConvertI32U, PREFIX_NONE, 0xb8, "f64.convert_i32_u", F64, &[I32], 0, Features::BASE),
    e(Opcode::F64ConvertI64S, PREFIX_NONE, 0xb9, "f64.convert_i64_s", F64, &[I64], 0, Features::BASE),
    e(Opcode::F64ConvertI64U, PREFIX_NONE, 0xba, "f64.convert_i64_u", F64, &[I64], 0, Features::BASE),
    e(Opcode::F64PromoteF32, PREFIX_NONE, 0xbb, "f64.promote_f32", F64, &[F32], 0, Features::BASE),
    e(Opcode::I32ReinterpretF32, PREFIX_NONE, 0xbc, "i32.reinterpret_f32", I32, &[F32], 0, Features::BASE),
    e(Opcode::I64ReinterpretF64, PREFIX_NONE, 0xbd, "i64.reinterpret_f64", I64, &[F64], 0, Features::BASE),
    e(Opcode::F32ReinterpretI32, PREFIX_NONE, 0xbe, "f32.reinterpret_i32", F32, &[I32], 0, Features::BASE),
    e(Opcode::F64ReinterpretI64, PREFIX_NONE, 0xbf, "f64.reinterpret_i64", F64, &[I64], 0, Features::BASE),
    e(Opcode::I32Extend8S, PREFIX_NONE, 0xc0, "i32.extend8_s", I32, &[I32], 0, Features::SIGN_EXTENSION),
    e(Opcode::I32Extend16S, PREFIX_NONE, 0xc1, "i32.extend16_s", I32, &[I32], 0, Features::SIGN_EXTENSION),
    e(Opcode::I64Extend8S, PREFIX_NONE, 0xc2, "i64.extend8_s", I64, &[I64], 0, Features::SIGN_EXTENSION),
    e(Opcode::I64Extend16S, PREFIX_NONE, 0xc3, "i64.extend16_s", I64, &[I64], 0, Features::SIGN_EXTENSION),
    e(Opcode::I64Extend32S, PREFIX_NONE, 0xc4, "i64.extend32_s", I64, &[I64], 0, Features::SIGN_EXTENSION),
    e(Opcode::RefNull, PREFIX_NONE, 0xd0, "ref.null", AnyRef, &[], 0, Features::REFERENCE_TYPES),
    e(Opcode::RefIsNull, PREFIX_NONE, 0xd1, "ref.is_null", I32, &[AnyRef], 0, Features::REFERENCE_TYPES),
    e(Opcode::RefFunc, PREFIX_NONE, 0xd2, "ref.func", FuncRef, &[], 0, Features::REFERENCE_TYPES),
    // 0xFC prefix: non-trapping conversions (subcodes 0-7), then bulk memory/table (8-17).
    e(Opcode::I32TruncSatF32S, PREFIX_BULK, 0, "i32.trunc_sat_f32_s", I32, &[F32], 0, Features::NON_TRAPPING_FLOAT_TO_INT),
    e(Opcode::I32TruncSatF32U, PREFIX_BULK, 1, "i32.trunc_sat_f32_u", I32, &[F32], 0, Features::NON_TRAPPING_FLOAT_TO_INT),
    e(Opcode::I32TruncSatF64S, PREFIX_BULK, 2, "i32.trunc_sat_f64_s", I32, &[F64], 0, Features::NON_TRAPPING_FLOAT_TO_INT),
    e(Opcode::I32TruncSatF64U, PREFIX_BULK, 3, "i32.trunc_sat_f64_u", I32, &[F64], 0, Features::NON_TRAPPING_FLOAT_TO_INT),
    e(Opcode::I64TruncSatF32S, PREFIX_BULK, 4, "i64.trunc_sat_f32_s", I64, &[F32], 0, Features::NON_TRAPPING_FLOAT_TO_INT),
    e(Opcode::I64TruncSatF32U, PREFIX_BULK, 5, "i64.trunc_sat_f32_u", I64, &[F32], 0, Features::NON_TRAPPING_FLOAT_TO_INT),
    e(Opcode::I64TruncSatF64S, PREFIX_BULK, 6, "i64.trunc_sat_f64_s", I64, &[F64], 0, Features::NON_TRAPPING_FLOAT_TO_INT),
    e(Opcode::I64TruncSatF64U, PREFIX_BULK, 7, "i64.trunc_sat_f64_u", I64, &[F64], 0, Features::NON_TRAPPING_FLOAT_TO_INT),
    e(Opcode::MemoryInit, PREFIX_BULK, 8, "memory.init", Void, &[I32, I32, I32], 0, Features::BULK_MEMORY),
    e(Opcode::DataDrop, PREFIX_BULK, 9, "data.drop", Void, &[], 0, Features::BULK_MEMORY),
    e(Opcode::MemoryCopy, PREFIX_BULK, 10, "memory.copy", Void, &[I32, I32, I32], 0, Features::BULK_MEMORY),
    e(Opcode::MemoryFill, PREFIX_BULK, 11, "memory.fill", Void, &[I32, I32, I32], 0, Features::BULK_MEMORY),
    e(Opcode::TableInit, PREFIX_BULK, 12, "table.init", Void, &[I32, I32, I32], 0, Features::BULK_MEMORY),
    e(Opcode::ElemDrop, PREFIX_BULK, 13, "elem.drop", Void, &[], 0, Features::BULK_MEMORY),
    e(Opcode::TableCopy, PREFIX_BULK, 14, "table.copy", Void, &[I32, I32, I32], 0, Features::BULK_MEMORY),
    e(Opcode::TableGrow, PREFIX_BULK, 15, "table.grow", I32, &[AnyRef, I32], 0, Features::REFERENCE_TYPES),
    e(Opcode::TableSize, PREFIX_BULK, 16, "table.size", I32, &[], 0, Features::REFERENCE_TYPES),
    e(Opcode::TableFill, PREFIX_BULK, 17, "table.fill", Void, &[I32, AnyRef, I32], 0, Features::REFERENCE_TYPES),
    // 0xFD prefix: SIMD (representative subset, ascending subcode order).
    e(Opcode::V128Load, PREFIX_SIMD, 0, "v128.load", Vec128, &[I32], 16, Features::SIMD),
    e(Opcode::V128Load8Splat, PREFIX_SIMD, 7, "v128.load8_splat", Vec128, &[I32], 1, Features::SIMD),
    e(Opcode::V128Load16Splat, PREFIX_SIMD, 8, "v128.load16_splat", Vec128, &[I32], 2, Features::SIMD),
    e(Opcode::V128Load32Splat, PREFIX_SIMD, 9, "v128.load32_splat", Vec128, &[I32], 4, Features::SIMD),
    e(Opcode::V128Load64Splat, PREFIX_SIMD, 10, "v128.load64_splat", Vec128, &[I32], 8, Features::SIMD),
    e(Opcode::V128Store, PREFIX_SIMD, 11, "v128.store", Void, &[I32, Vec128], 16, Features::SIMD),
    e(Opcode::V128Const, PREFIX_SIMD, 12, "v128.const", Vec128, &[], 0, Features::SIMD),
    e(Opcode::I8x16Shuffle, PREFIX_SIMD, 13, "i8x16.shuffle", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::I8x16Splat, PREFIX_SIMD, 15, "i8x16.splat", Vec128, &[I32], 0, Features::SIMD),
    e(Opcode::I16x8Splat, PREFIX_SIMD, 16, "i16x8.splat", Vec128, &[I32], 0, Features::SIMD),
    e(Opcode::I32x4Splat, PREFIX_SIMD, 17, "i32x4.splat", Vec128, &[I32], 0, Features::SIMD),
    e(Opcode::I64x2Splat, PREFIX_SIMD, 18, "i64x2.splat", Vec128, &[I64], 0, Features::SIMD),
    e(Opcode::F32x4Splat, PREFIX_SIMD, 19, "f32x4.splat", Vec128, &[F32], 0, Features::SIMD),
    e(Opcode::F64x2Splat, PREFIX_SIMD, 20, "f64x2.splat", Vec128, &[F64], 0, Features::SIMD),
    e(Opcode::I8x16ExtractLaneS, PREFIX_SIMD, 21, "i8x16.extract_lane_s", I32, &[Vec128], 0, Features::SIMD),
    e(Opcode::I8x16ReplaceLane, PREFIX_SIMD, 23, "i8x16.replace_lane", Vec128, &[Vec128, I32], 0, Features::SIMD),
    e(Opcode::I32x4ExtractLane, PREFIX_SIMD, 27, "i32x4.extract_lane", I32, &[Vec128], 0, Features::SIMD),
    e(Opcode::I32x4ReplaceLane, PREFIX_SIMD, 28, "i32x4.replace_lane", Vec128, &[Vec128, I32], 0, Features::SIMD),
    e(Opcode::I8x16Eq, PREFIX_SIMD, 35, "i8x16.eq", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::I32x4Eq, PREFIX_SIMD, 55, "i32x4.eq", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::F32x4Eq, PREFIX_SIMD, 65, "f32x4.eq", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::V128Not, PREFIX_SIMD, 77, "v128.not", Vec128, &[Vec128], 0, Features::SIMD),
    e(Opcode::V128And, PREFIX_SIMD, 78, "v128.and", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::V128Or, PREFIX_SIMD, 80, "v128.or", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::V128Xor, PREFIX_SIMD, 81, "v128.xor", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::V128Bitselect, PREFIX_SIMD, 82, "v128.bitselect", Vec128, &[Vec128, Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::I8x16Add, PREFIX_SIMD, 110, "i8x16.add", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::I8x16Sub, PREFIX_SIMD, 113, "i8x16.sub", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::I16x8Add, PREFIX_SIMD, 142, "i16x8.add", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::I16x8Sub, PREFIX_SIMD, 145, "i16x8.sub", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::I16x8Mul, PREFIX_SIMD, 149, "i16x8.mul", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::I32x4Add, PREFIX_SIMD, 174, "i32x4.add", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::I32x4Sub, PREFIX_SIMD, 177, "i32x4.sub", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::I32x4Mul, PREFIX_SIMD, 181, "i32x4.mul", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::I64x2Add, PREFIX_SIMD, 206, "i64x2.add", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::I64x2Sub, PREFIX_SIMD, 209, "i64x2.sub", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::F32x4Add, PREFIX_SIMD, 228, "f32x4.add", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::F32x4Sub, PREFIX_SIMD, 229, "f32x4.sub", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::F32x4Mul, PREFIX_SIMD, 230, "f32x4.mul", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::F32x4Div, PREFIX_SIMD, 231, "f32x4.div", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::F64x2Add, PREFIX_SIMD, 240, "f64x2.add", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::F64x2Sub, PREFIX_SIMD, 241, "f64x2.sub", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::F64x2Mul, PREFIX_SIMD, 242, "f64x2.mul", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    e(Opcode::F64x2Div, PREFIX_SIMD, 243, "f64x2.div", Vec128, &[Vec128, Vec128], 0, Features::SIMD),
    // 0xFE prefix: threads & atomics (representative subset).
    e(Opcode::MemoryAtomicNotify, PREFIX_THREADS, 0, "memory.atomic.notify", I32, &[I32, I32], 4, Features::THREADS),
    e(Opcode::MemoryAtomicWait32, PREFIX_THREADS, 1, "memory.atomic.wait32", I32, &[I32, I32, I64], 4, Features::THREADS),
    e(Opcode::MemoryAtomicWait64, PREFIX_THREADS, 2, "memory.atomic.wait64", I32, &[I32, I64, I64], 8, Features::THREADS),
    e(Opcode::AtomicFence, PREFIX_THREADS, 3, "atomic.fence", Void, &[], 0, Features::THREADS),
    e(Opcode::I32AtomicLoad, PREFIX_THREADS, 0x10, "i32.atomic.load", I32, &[I32], 4, Features::THREADS),
    e(Opcode::I64AtomicLoad, PREFIX_THREADS, 0x11, "i64.atomic.load", I64, &[I32], 8, Features::THREADS),
    e(Opcode::I32AtomicStore, PREFIX_THREADS, 0x17, "i32.atomic.store", Void, &[I32, I32], 4, Features::THREADS),
    e(Opcode::I64AtomicStore, PREFIX_THREADS, 0x18, "i64.atomic.store", Void, &[I32, I64], 8, Features::THREADS),
    e(Opcode::I32AtomicRmwAdd, PREFIX_THREADS, 0x1e, "i32.atomic.rmw.add", I32, &[I32, I32], 4, Features::THREADS),
    e(Opcode::I64AtomicRmwAdd, PREFIX_THREADS, 0x1f, "i64.atomic.rmw.add", I64, &[I32, I64], 8, Features::THREADS),
    e(Opcode::I32AtomicRmwCmpxchg, PREFIX_THREADS, 0x48, "i32.atomic.rmw.cmpxchg", I32, &[I32, I32, I32], 4, Features::THREADS),
    e(Opcode::I64AtomicRmwCmpxchg, PREFIX_THREADS, 0x49, "i64.atomic.rmw.cmpxchg", I64, &[I32, I64, I64], 8, Features::THREADS),
];

fn group_for_prefix(prefix: u8) -> &'static [Entry] {
    let start = CATALOG.iter().position(|row| row.prefix == prefix);
    let Some(start) = start else { return &[] };
    let end = CATALOG[start..].iter().position(|row| row.prefix != prefix).map_or(CATALOG.len(), |n| start + n);
    &CATALOG[start..end]
}

impl Opcode {
    /// Looks up the catalogue row for this opcode. Every [`Opcode`] variant
    /// has exactly one row; this never fails.
    pub fn entry(self) -> &'static Entry {
        CATALOG.iter().find(|row| row.op == self).expect("every Opcode variant has a catalogue row")
    }

    /// Resolves a binary `(prefix, code)` pair to its opcode.
    pub fn from_code(prefix: u8, code: u32) -> Result<Opcode> {
        let group = group_for_prefix(prefix);
        group
            .binary_search_by_key(&code, |row| row.code)
            .map(|i| group[i].op)
            .map_err(|_| IrError::UnknownOpcode { prefix, code })
    }

    /// Resolves a textual mnemonic (e.g. `"i32.add"`) to its opcode.
    ///
    /// Mnemonics are unique across the catalogue, so this is a proper
    /// inverse of the `text` field: `from_name(op.entry().text) == op`
    /// for every catalogue entry.
    pub fn from_name(text: &str) -> Result<Opcode> {
        CATALOG
            .iter()
            .find(|row| row.text == text)
            .map(|row| row.op)
            .ok_or_else(|| IrError::UnknownMnemonic(text.to_owned()))
    }

    /// `(result_type, operand_types)`.
    pub fn signature(self) -> (ValType, &'static [ValType]) {
        let entry = self.entry();
        (entry.result, entry.operands)
    }

    /// The opcode's binary encoding: `[prefix,] code` with `code` as
    /// ULEB128 for prefixed opcodes (a single byte suffices for every
    /// entry in this catalogue, but the encoding rule is general).
    pub fn binary_encoding(self) -> Vec<u8> {
        let entry = self.entry();
        let mut bytes = Vec::new();
        if entry.prefix != PREFIX_NONE {
            bytes.push(entry.prefix);
            let mut code = entry.code;
            loop {
                let mut byte = (code & 0x7f) as u8;
                code >>= 7;
                if code != 0 {
                    byte |= 0x80;
                }
                bytes.push(byte);
                if code == 0 {
                    break;
                }
            }
        } else {
            bytes.push(entry.code as u8);
        }
        bytes
    }

    /// `⌊log2(memory_size)⌋`; fails for opcodes that do not touch memory.
    pub fn natural_alignment_log2(self) -> Result<u32> {
        let entry = self.entry();
        if entry.memory_size == 0 {
            return Err(IrError::WrongVariant { expected: "memory opcode", found: "non-memory opcode" });
        }
        Ok(entry.memory_size.trailing_zeros())
    }

    /// The proposal(s) gating this opcode.
    pub fn features(self) -> Features {
        self.entry().features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_no_duplicate_prefix_code_pairs() {
        for (i, a) in CATALOG.iter().enumerate() {
            for b in &CATALOG[i + 1..] {
                assert!((a.prefix, a.code) != (b.prefix, b.code), "duplicate encoding for {:?}/{:?}", a.op, b.op);
            }
        }
    }

    #[test]
    fn catalog_groups_are_sorted_by_code() {
        for prefix in [PREFIX_NONE, PREFIX_BULK, PREFIX_SIMD, PREFIX_THREADS] {
            let group = group_for_prefix(prefix);
            for w in group.windows(2) {
                assert!(w[0].code < w[1].code, "unsorted group for prefix {prefix:#x}");
            }
        }
    }

    #[test]
    fn from_name_i32_add_matches_scenario_s2() {
        let op = Opcode::from_name("i32.add").unwrap();
        assert_eq!(op, Opcode::I32Add);
        let entry = op.entry();
        assert_eq!(entry.code, 0x6A);
        assert_eq!(entry.prefix, PREFIX_NONE);
        assert_eq!(entry.result, I32);
        assert_eq!(entry.operands, &[I32, I32]);
        assert_eq!(entry.memory_size, 0);
    }

    #[test]
    fn from_code_v128_load_matches_scenario_s3() {
        let op = Opcode::from_code(PREFIX_SIMD, 0x00).unwrap();
        assert_eq!(op, Opcode::V128Load);
        let entry = op.entry();
        assert_eq!(entry.result, Vec128);
        assert_eq!(entry.operands, &[I32]);
        assert_eq!(entry.memory_size, 16);
    }

    #[test]
    fn catalog_has_no_duplicate_mnemonics() {
        for (i, a) in CATALOG.iter().enumerate() {
            for b in &CATALOG[i + 1..] {
                assert_ne!(a.text, b.text, "duplicate mnemonic for {:?}/{:?}", a.op, b.op);
            }
        }
    }

    #[test]
    fn round_trip_every_entry() {
        for row in CATALOG {
            assert_eq!(Opcode::from_code(row.prefix, row.code).unwrap(), row.op);
            assert_eq!(Opcode::from_name(row.text).unwrap(), row.op);
        }
    }

    #[test]
    fn unknown_opcode_and_mnemonic_are_errors() {
        assert!(Opcode::from_code(PREFIX_NONE, 0xfe).is_err());
        assert!(Opcode::from_name("nope.nope").is_err());
    }

    #[test]
    fn natural_alignment_log2_matches_memory_size() {
        assert_eq!(Opcode::I32Load.natural_alignment_log2().unwrap(), 2);
        assert_eq!(Opcode::V128Load.natural_alignment_log2().unwrap(), 4);
        assert!(Opcode::I32Add.natural_alignment_log2().is_err());
    }

    #[test]
    fn features_gate_extension_families() {
        assert_eq!(Opcode::I32Add.features(), Features::BASE);
        assert_eq!(Opcode::I32Extend8S.features(), Features::SIGN_EXTENSION);
        assert_eq!(Opcode::V128Load.features(), Features::SIMD);
        assert_eq!(Opcode::I32AtomicLoad.features(), Features::THREADS);
        assert_eq!(Opcode::Try.features(), Features::EXCEPTIONS);
        assert_eq!(Opcode::ReturnCall.features(), Features::TAIL_CALL);
        assert_eq!(Opcode::ReturnCallIndirect.features(), Features::TAIL_CALL);
    }
}
