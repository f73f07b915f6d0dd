// Copyright (c) 2025 Joshua Seaton
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Error taxonomy for the core intermediate representation.
//!
//! Most lookups in this crate return sentinel values rather than errors (an
//! out-of-range index, a null handle); this enum exists for the smaller set
//! of operations a caller cannot treat as mere absence, such as resolving an
//! unknown opcode or downcasting an [`crate::expr::Expr`] to the wrong
//! variant.

use thiserror::Error;

/// Errors produced by the core IR.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum IrError {
    /// No opcode table entry has the given `(prefix, code)` pair.
    #[error("unknown opcode: prefix {prefix:#x}, code {code:#x}")]
    UnknownOpcode {
        /// Prefix byte (0 for unprefixed opcodes).
        prefix: u8,
        /// Subcode or single-byte code.
        code: u32,
    },

    /// No opcode table entry has the given textual mnemonic.
    #[error("unknown mnemonic: {0:?}")]
    UnknownMnemonic(String),

    /// A [`crate::var::Var`] in name form did not resolve against any
    /// binding in the relevant namespace.
    #[error("unknown name: {0:?}")]
    UnknownName(String),

    /// A numeric index exceeded the bounds of the relevant handle array.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// The length of the array it was checked against.
        len: u32,
    },

    /// A tagged union was downcast to a variant other than the one it
    /// actually holds.
    #[error("wrong variant: expected {expected}, found {found}")]
    WrongVariant {
        /// The variant name the caller expected.
        expected: &'static str,
        /// The variant name actually present.
        found: &'static str,
    },

    /// Two or more entries in the same binding namespace share a name.
    #[error("duplicate binding {name:?} ({count} occurrences)")]
    DuplicateBinding {
        /// The colliding name.
        name: String,
        /// How many entries share it.
        count: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, IrError>;
