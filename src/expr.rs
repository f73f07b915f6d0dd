// Copyright (c) 2025 Joshua Seaton
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! The instruction tree: [`Expr`] nodes organised into [`ExprList`]
//! sequences.
//!
//! The source this crate's design is grounded on uses an intrusive
//! doubly-linked list so that a node can be spliced out of one sequence and
//! into another in O(1) without disturbing the rest. This port uses an
//! owned `Vec<Expr>` instead: the only splices this IR actually performs
//! (building a block's body, appending to a function) happen at the ends of
//! a list, where a `Vec` is O(1) amortized too, and the ownership tree
//! (moving a `Block` moves its whole subtree) falls out of ordinary Rust
//! moves without any unsafe linked-list bookkeeping.

use crate::error::{IrError, Result};
use crate::opcode::Opcode;
use crate::types::{Const, FuncDeclaration, Location, ValType};
use crate::var::Var;

/// An ordered, owning sequence of instructions.
pub type ExprList = Vec<Expr>;

/// Memory access operands shared by load/store/atomic instructions.
#[derive(Clone, Debug)]
pub struct MemArg {
    /// Alignment hint, in bytes (not log2 — callers combine with
    /// [`Opcode::natural_alignment_log2`] as needed).
    pub align: u32,
    /// Static offset added to the dynamic address.
    pub offset: u32,
}

/// A `block` or `loop`'s signature, label, and owned body.
#[derive(Clone, Debug)]
pub struct Block {
    /// Optional source-level label (e.g. `$done`).
    pub label: Option<String>,
    /// The block's declared signature.
    pub sig: BlockSignature,
    /// The block's owned instruction sequence.
    pub body: ExprList,
    /// Location of this block's `end`.
    pub end_loc: Location,
}

/// A block's result signature as written: no results, a single inline
/// result type, or a reference to a module type-section entry (used when a
/// block takes parameters or returns more than one value).
#[derive(Clone, Debug)]
pub enum BlockSignature {
    /// Produces no values.
    Empty,
    /// Produces exactly one value of the given type.
    Result(ValType),
    /// Signature given by a module type-section entry.
    TypeIndex(Var),
}

/// The lane-selector immediate for `i8x16.shuffle`: one lane index (0-31)
/// per output lane.
pub type ShuffleMask = [u8; 16];

/// One instruction node.
#[derive(Clone, Debug)]
pub struct Expr {
    /// Where this instruction was written.
    pub loc: Location,
    /// The instruction's kind and operands.
    pub kind: ExprKind,
}

impl Expr {
    /// Wraps `kind` with a location.
    pub fn new(kind: ExprKind, loc: Location) -> Self {
        Expr { loc, kind }
    }

    /// The underlying opcode, for variants that carry one directly. Control
    /// instructions built from dedicated variants (`Block`, `If`, ...)
    /// return their conventional opcode even though they store no `Opcode`
    /// field.
    pub fn opcode(&self) -> Opcode {
        match &self.kind {
            ExprKind::Unreachable => Opcode::Unreachable,
            ExprKind::Nop => Opcode::Nop,
            ExprKind::Drop => Opcode::Drop,
            ExprKind::Return => Opcode::Return,
            ExprKind::Select => Opcode::Select,
            ExprKind::MemorySize => Opcode::MemorySize,
            ExprKind::MemoryGrow => Opcode::MemoryGrow,
            ExprKind::MemoryCopy => Opcode::MemoryCopy,
            ExprKind::MemoryFill => Opcode::MemoryFill,
            ExprKind::RefIsNull => Opcode::RefIsNull,
            ExprKind::Rethrow => Opcode::Rethrow,
            ExprKind::Binary(op)
            | ExprKind::Compare(op)
            | ExprKind::Convert(op)
            | ExprKind::Unary(op) => *op,
            ExprKind::Br(_) => Opcode::Br,
            ExprKind::BrIf(_) => Opcode::BrIf,
            ExprKind::Call(_) => Opcode::Call,
            ExprKind::ReturnCall(_) => Opcode::ReturnCall,
            ExprKind::GlobalGet(_) => Opcode::GlobalGet,
            ExprKind::GlobalSet(_) => Opcode::GlobalSet,
            ExprKind::LocalGet(_) => Opcode::LocalGet,
            ExprKind::LocalSet(_) => Opcode::LocalSet,
            ExprKind::LocalTee(_) => Opcode::LocalTee,
            ExprKind::RefFunc(_) => Opcode::RefFunc,
            ExprKind::TableGet(_) => Opcode::TableGet,
            ExprKind::TableSet(_) => Opcode::TableSet,
            ExprKind::TableGrow(_) => Opcode::TableGrow,
            ExprKind::TableSize(_) => Opcode::TableSize,
            ExprKind::MemoryInit(_) => Opcode::MemoryInit,
            ExprKind::DataDrop(_) => Opcode::DataDrop,
            ExprKind::ElemDrop(_) => Opcode::ElemDrop,
            ExprKind::Throw(_) => Opcode::Throw,
            ExprKind::TableInit { .. } => Opcode::TableInit,
            ExprKind::TableCopy { .. } => Opcode::TableCopy,
            ExprKind::BrOnExn { .. } => Opcode::BrOnExn,
            ExprKind::Load { op, .. }
            | ExprKind::Store { op, .. }
            | ExprKind::LoadSplat { op, .. }
            | ExprKind::AtomicLoad { op, .. }
            | ExprKind::AtomicStore { op, .. }
            | ExprKind::AtomicRmw { op, .. }
            | ExprKind::AtomicRmwCmpxchg { op, .. }
            | ExprKind::AtomicWait { op, .. }
            | ExprKind::AtomicNotify { op, .. } => *op,
            ExprKind::Const(c) => match c {
                Const::I32(_) => Opcode::I32Const,
                Const::I64(_) => Opcode::I64Const,
                Const::F32(_) => Opcode::F32Const,
                Const::F64(_) => Opcode::F64Const,
                Const::V128(_) => Opcode::V128Const,
                Const::RefNull(_) => Opcode::RefNull,
                Const::RefFunc(_) => Opcode::RefFunc,
            },
            ExprKind::Block(_) => Opcode::Block,
            ExprKind::Loop(_) => Opcode::Loop,
            ExprKind::If { .. } => Opcode::If,
            ExprKind::Try { .. } => Opcode::Try,
            ExprKind::CallIndirect { .. } => Opcode::CallIndirect,
            ExprKind::ReturnCallIndirect { .. } => Opcode::ReturnCallIndirect,
            ExprKind::BrTable { .. } => Opcode::BrTable,
            ExprKind::SimdLaneOp { op, .. } => *op,
            ExprKind::SimdShuffleOp { op, .. } => *op,
        }
    }
}

/// The variant payload of an [`Expr`], grouped the way the catalogue groups
/// opcodes: nullary, opcode-carrying, `Var`-carrying, two-`Var`,
/// load/store-shaped, constant, block-shaped, call-indirect, `br_table`,
/// and SIMD-lane/-shuffle.
#[derive(Clone, Debug)]
pub enum ExprKind {
    // Nullary.
    Unreachable,
    Nop,
    Drop,
    Return,
    Select,
    MemorySize,
    MemoryGrow,
    MemoryCopy,
    MemoryFill,
    RefIsNull,
    Rethrow,

    // Opcode-carrying.
    Binary(Opcode),
    Compare(Opcode),
    Convert(Opcode),
    Unary(Opcode),

    // Var-carrying.
    Br(Var),
    BrIf(Var),
    Call(Var),
    ReturnCall(Var),
    GlobalGet(Var),
    GlobalSet(Var),
    LocalGet(Var),
    LocalSet(Var),
    LocalTee(Var),
    RefFunc(Var),
    TableGet(Var),
    TableSet(Var),
    TableGrow(Var),
    TableSize(Var),
    MemoryInit(Var),
    DataDrop(Var),
    ElemDrop(Var),
    Throw(Var),

    // Two-var.
    TableInit { segment: Var, table: Var },
    TableCopy { dst: Var, src: Var },
    BrOnExn { label: Var, event: Var },

    // Load/store-shaped.
    Load { op: Opcode, arg: MemArg },
    Store { op: Opcode, arg: MemArg },
    LoadSplat { op: Opcode, arg: MemArg },
    AtomicLoad { op: Opcode, arg: MemArg },
    AtomicStore { op: Opcode, arg: MemArg },
    AtomicRmw { op: Opcode, arg: MemArg },
    AtomicRmwCmpxchg { op: Opcode, arg: MemArg },
    AtomicWait { op: Opcode, arg: MemArg },
    AtomicNotify { op: Opcode, arg: MemArg },

    // Constant.
    Const(Const),

    // Block-shaped.
    Block(Block),
    Loop(Block),
    If { then: Block, else_: ExprList, else_end_loc: Location },
    Try { body: Block, catch: ExprList },

    // Call-indirect family.
    CallIndirect { decl: FuncDeclaration, table: Var },
    ReturnCallIndirect { decl: FuncDeclaration, table: Var },

    // BrTable.
    BrTable { targets: Vec<Var>, default: Var },

    // SIMD.
    SimdLaneOp { op: Opcode, lane: u64 },
    SimdShuffleOp { op: Opcode, mask: ShuffleMask },
}

impl ExprKind {
    /// The variant name, for [`IrError::WrongVariant`] messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            ExprKind::Unreachable => "Unreachable",
            ExprKind::Nop => "Nop",
            ExprKind::Drop => "Drop",
            ExprKind::Return => "Return",
            ExprKind::Select => "Select",
            ExprKind::MemorySize => "MemorySize",
            ExprKind::MemoryGrow => "MemoryGrow",
            ExprKind::MemoryCopy => "MemoryCopy",
            ExprKind::MemoryFill => "MemoryFill",
            ExprKind::RefIsNull => "RefIsNull",
            ExprKind::Rethrow => "Rethrow",
            ExprKind::Binary(_) => "Binary",
            ExprKind::Compare(_) => "Compare",
            ExprKind::Convert(_) => "Convert",
            ExprKind::Unary(_) => "Unary",
            ExprKind::Br(_) => "Br",
            ExprKind::BrIf(_) => "BrIf",
            ExprKind::Call(_) => "Call",
            ExprKind::ReturnCall(_) => "ReturnCall",
            ExprKind::GlobalGet(_) => "GlobalGet",
            ExprKind::GlobalSet(_) => "GlobalSet",
            ExprKind::LocalGet(_) => "LocalGet",
            ExprKind::LocalSet(_) => "LocalSet",
            ExprKind::LocalTee(_) => "LocalTee",
            ExprKind::RefFunc(_) => "RefFunc",
            ExprKind::TableGet(_) => "TableGet",
            ExprKind::TableSet(_) => "TableSet",
            ExprKind::TableGrow(_) => "TableGrow",
            ExprKind::TableSize(_) => "TableSize",
            ExprKind::MemoryInit(_) => "MemoryInit",
            ExprKind::DataDrop(_) => "DataDrop",
            ExprKind::ElemDrop(_) => "ElemDrop",
            ExprKind::Throw(_) => "Throw",
            ExprKind::TableInit { .. } => "TableInit",
            ExprKind::TableCopy { .. } => "TableCopy",
            ExprKind::BrOnExn { .. } => "BrOnExn",
            ExprKind::Load { .. } => "Load",
            ExprKind::Store { .. } => "Store",
            ExprKind::LoadSplat { .. } => "LoadSplat",
            ExprKind::AtomicLoad { .. } => "AtomicLoad",
            ExprKind::AtomicStore { .. } => "AtomicStore",
            ExprKind::AtomicRmw { .. } => "AtomicRmw",
            ExprKind::AtomicRmwCmpxchg { .. } => "AtomicRmwCmpxchg",
            ExprKind::AtomicWait { .. } => "AtomicWait",
            ExprKind::AtomicNotify { .. } => "AtomicNotify",
            ExprKind::Const(_) => "Const",
            ExprKind::Block(_) => "Block",
            ExprKind::Loop(_) => "Loop",
            ExprKind::If { .. } => "If",
            ExprKind::Try { .. } => "Try",
            ExprKind::CallIndirect { .. } => "CallIndirect",
            ExprKind::ReturnCallIndirect { .. } => "ReturnCallIndirect",
            ExprKind::BrTable { .. } => "BrTable",
            ExprKind::SimdLaneOp { .. } => "SimdLaneOp",
            ExprKind::SimdShuffleOp { .. } => "SimdShuffleOp",
        }
    }
}

/// Downcasts `$expr.kind` to `$pat`, returning [`IrError::WrongVariant`] on
/// a mismatch. Used by accessors below and available to callers needing
/// their own variant-specific projections.
macro_rules! downcast {
    ($expr:expr, $pat:pat => $out:expr, $expected:literal) => {
        match &$expr.kind {
            $pat => Ok($out),
            other => Err(IrError::WrongVariant { expected: $expected, found: other.variant_name() }),
        }
    };
}

impl Expr {
    /// Downcasts to a `Block`/`Loop`'s body, failing on any other variant.
    pub fn as_block(&self) -> Result<&Block> {
        match &self.kind {
            ExprKind::Block(b) | ExprKind::Loop(b) => Ok(b),
            other => Err(IrError::WrongVariant { expected: "Block or Loop", found: other.variant_name() }),
        }
    }

    /// Downcasts to a `Const` payload.
    pub fn as_const(&self) -> Result<Const> {
        downcast!(self, ExprKind::Const(c) => *c, "Const")
    }

    /// Downcasts to a `br_table`'s targets and default.
    pub fn as_br_table(&self) -> Result<(&[Var], &Var)> {
        downcast!(self, ExprKind::BrTable { targets, default } => (targets.as_slice(), default), "BrTable")
    }

    /// Downcasts to a `try`'s body and catch clause.
    pub fn as_try(&self) -> Result<(&Block, &ExprList)> {
        downcast!(self, ExprKind::Try { body, catch } => (body, catch), "Try")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    fn loc() -> Location {
        Location::default()
    }

    #[test]
    fn const_opcode_matches_value_type() {
        let expr = Expr::new(ExprKind::Const(Const::I32(1)), loc());
        assert_eq!(expr.opcode(), Opcode::I32Const);
        let expr = Expr::new(ExprKind::Const(Const::V128(crate::types::V128([0; 4]))), loc());
        assert_eq!(expr.opcode(), Opcode::V128Const);
    }

    #[test]
    fn downcast_wrong_variant_is_an_error() {
        let expr = Expr::new(ExprKind::Nop, loc());
        assert!(expr.as_const().is_err());
        assert!(expr.as_br_table().is_err());
    }

    #[test]
    fn downcast_right_variant_succeeds() {
        let expr = Expr::new(ExprKind::Const(Const::I64(42)), loc());
        assert_eq!(expr.as_const().unwrap(), Const::I64(42));
    }

    #[test]
    fn block_owns_its_body_as_a_vec() {
        let body: ExprList = vec![Expr::new(ExprKind::Nop, loc()), Expr::new(ExprKind::Drop, loc())];
        let block = Block { label: None, sig: BlockSignature::Empty, body, end_loc: loc() };
        let expr = Expr::new(ExprKind::Block(block), loc());
        assert_eq!(expr.as_block().unwrap().body.len(), 2);
    }

    #[test]
    fn try_owns_body_and_catch() {
        let body = Block { label: None, sig: BlockSignature::Empty, body: vec![], end_loc: loc() };
        let catch: ExprList = vec![Expr::new(ExprKind::Rethrow, loc())];
        let expr = Expr::new(ExprKind::Try { body, catch }, loc());
        assert_eq!(expr.opcode(), Opcode::Try);
        let (body, catch) = expr.as_try().unwrap();
        assert!(body.body.is_empty());
        assert_eq!(catch.len(), 1);
    }

    #[test]
    fn br_on_exn_carries_label_and_event() {
        let expr =
            Expr::new(ExprKind::BrOnExn { label: Var::index(0, loc()), event: Var::index(1, loc()) }, loc());
        assert_eq!(expr.opcode(), Opcode::BrOnExn);
    }

    #[test]
    fn return_call_reports_tail_call_opcode_distinct_from_call() {
        let call = Expr::new(ExprKind::Call(Var::index(0, loc())), loc());
        let tail_call = Expr::new(ExprKind::ReturnCall(Var::index(0, loc())), loc());
        assert_eq!(call.opcode(), Opcode::Call);
        assert_eq!(tail_call.opcode(), Opcode::ReturnCall);
        assert_ne!(call.opcode(), tail_call.opcode());
    }

    #[test]
    fn return_call_indirect_reports_tail_call_opcode_distinct_from_call_indirect() {
        use crate::types::FuncSignature;

        let decl = FuncDeclaration::inline(FuncSignature::empty());
        let call = Expr::new(
            ExprKind::CallIndirect { decl: decl.clone(), table: Var::index(0, loc()) },
            loc(),
        );
        let tail_call =
            Expr::new(ExprKind::ReturnCallIndirect { decl, table: Var::index(0, loc()) }, loc());
        assert_eq!(call.opcode(), Opcode::CallIndirect);
        assert_eq!(tail_call.opcode(), Opcode::ReturnCallIndirect);
        assert_ne!(call.opcode(), tail_call.opcode());
    }

    #[test]
    fn br_table_carries_targets_and_default() {
        let targets = vec![Var::index(0, loc()), Var::index(1, loc())];
        let default = Var::index(2, loc());
        let expr = Expr::new(ExprKind::BrTable { targets, default }, loc());
        let (targets, default) = expr.as_br_table().unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(default.as_index(), Some(2));
    }
}
