// Copyright (c) 2025 Joshua Seaton
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Core intermediate representation and opcode catalogue for a WebAssembly
//! toolchain.
//!
//! This crate is the single source of truth consumed by a surrounding
//! toolchain's text parser, binary decoder/encoder, validator, interpreter,
//! and text formatter: the [`opcode`] catalogue assigns every instruction a
//! stable identifier and binary encoding, [`expr`] organises instructions
//! into the recursive [`Expr`]/[`ExprList`] tree, and [`module`]/[`script`]
//! aggregate those trees into addressable, named `Module` and `Script`
//! values. It is not itself a parser, encoder, validator, or interpreter;
//! see each module's docs for where its contract ends and an external
//! collaborator's begins.

pub mod binding;
pub mod error;
pub mod expr;
pub mod local_types;
pub mod module;
pub mod opcode;
pub mod script;
pub mod types;
pub mod var;

pub use binding::BindingHash;
pub use error::{IrError, Result};
pub use expr::{Block, BlockSignature, Expr, ExprKind, ExprList, MemArg, ShuffleMask};
pub use local_types::LocalTypes;
pub use module::{
    DataSegment, ElemExpr, ElemExprKind, ElemSegment, Event, Export, ExternalKind, Func, Global,
    Import, ImportKind, Memory, Module, ModuleField, Table,
};
pub use opcode::{Features, Opcode};
pub use script::{Action, Command, Script};
pub use types::{Const, FuncDeclaration, FuncSignature, FuncType, Limits, Location, ValType, V128};
pub use var::Var;
