// Copyright (c) 2025 Joshua Seaton
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Value types, source locations, constants, and function signatures.

use num_enum::TryFromPrimitive;

/// Defines a public newtype with a `new` constructor and `Deref`/`AsRef` to
/// the wrapped type, without exposing mutable access to it.
macro_rules! newtype {
    (
        $(#[$meta:meta])*
        pub struct $type:ident($underlying:ty);
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $type($underlying);

        impl $type {
            /// Wraps `value`.
            pub fn new(value: $underlying) -> Self {
                Self(value)
            }
        }

        impl ::core::ops::Deref for $type {
            type Target = $underlying;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl AsRef<$underlying> for $type {
            fn as_ref(&self) -> &$underlying {
                &self.0
            }
        }
    };
}
pub(crate) use newtype;

/// Value types classify the individual values that WebAssembly code can
/// compute with, the values a local or global accepts, and the structural
/// "no type"/"any type" markers used by this IR's own bookkeeping (neither
/// of which has a binary encoding and so neither ever appears in a decoded
/// module).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum ValType {
    /// 32-bit integer.
    I32 = 0x7f,
    /// 64-bit integer.
    I64 = 0x7e,
    /// 32-bit float.
    F32 = 0x7d,
    /// 64-bit float.
    F64 = 0x7c,
    /// 128-bit SIMD vector.
    V128 = 0x7b,
    /// Function reference.
    FuncRef = 0x70,
    /// Host reference (any reference, including `funcref`).
    AnyRef = 0x6f,
    /// Absence of a type (e.g. a block that produces no values).
    Void = 0x00,
    /// Wildcard type, usable only as a validation bound.
    Any = 0x01,
}

impl ValType {
    /// True for `FuncRef` and `AnyRef`.
    pub fn is_ref(self) -> bool {
        matches!(self, ValType::FuncRef | ValType::AnyRef)
    }
}

/// A source position attached to every IR node. Purely informational: never
/// compared for equality by IR-level operations.
#[derive(Clone, Copy, Debug, Default)]
pub struct Location {
    /// Source file name, if known.
    pub file: Option<&'static str>,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column of the first character.
    pub first_column: u32,
    /// 1-based column one past the last character.
    pub last_column: u32,
}

/// Size range of resizable storage (pages for memories, elements for
/// tables).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Limits {
    /// Minimum size.
    pub initial: u32,
    /// Maximum size, if bounded.
    pub max: Option<u32>,
    /// Whether the storage is shared across agents (threads proposal).
    pub is_shared: bool,
    /// Whether indices are 64-bit (memory64 proposal).
    pub is_64: bool,
}

impl Limits {
    /// A limits value with only a minimum.
    pub fn unbounded(initial: u32) -> Self {
        Limits { initial, max: None, is_shared: false, is_64: false }
    }

    /// Whether `max`, if present, is at least `initial`.
    pub fn is_well_formed(&self) -> bool {
        self.max.is_none_or(|max| self.initial <= max)
    }
}

/// A 128-bit SIMD constant, stored as four little-endian lanes so that it
/// can be viewed either as raw bytes or as `u32` lanes without re-encoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct V128(pub [u32; 4]);

impl V128 {
    /// View as 16 raw bytes.
    pub fn to_bytes(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        for (lane, chunk) in self.0.iter().zip(out.chunks_exact_mut(4)) {
            chunk.copy_from_slice(&lane.to_le_bytes());
        }
        out
    }
}

/// A typed constant value. Numeric payloads are stored bitwise (NaN payloads
/// preserved) rather than as native floating point values, so that
/// round-tripping through this IR is always lossless.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Const {
    /// 32-bit integer.
    I32(i32),
    /// 64-bit integer.
    I64(i64),
    /// 32-bit float, stored as its raw bit pattern.
    F32(u32),
    /// 64-bit float, stored as its raw bit pattern.
    F64(u64),
    /// 128-bit SIMD vector.
    V128(V128),
    /// A typed null reference.
    RefNull(ValType),
    /// A function reference constant (by index).
    RefFunc(u32),
}

impl Const {
    /// The raw bit pattern of an `F32` constant; panics for other variants.
    pub fn f32_bits(self) -> u32 {
        match self {
            Const::F32(bits) => bits,
            _ => panic!("Const::f32_bits called on non-F32 constant"),
        }
    }

    /// The raw bit pattern of an `F64` constant; panics for other variants.
    pub fn f64_bits(self) -> u64 {
        match self {
            Const::F64(bits) => bits,
            _ => panic!("Const::f64_bits called on non-F64 constant"),
        }
    }

    /// The value type this constant inhabits.
    pub fn val_type(&self) -> ValType {
        match self {
            Const::I32(_) => ValType::I32,
            Const::I64(_) => ValType::I64,
            Const::F32(_) => ValType::F32,
            Const::F64(_) => ValType::F64,
            Const::V128(_) => ValType::V128,
            Const::RefNull(ty) => *ty,
            Const::RefFunc(_) => ValType::FuncRef,
        }
    }
}

/// An ordered sequence of parameter types and an ordered sequence of result
/// types. Equality is structural.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FuncSignature {
    /// Parameter types, in order.
    pub params: Vec<ValType>,
    /// Result types, in order.
    pub results: Vec<ValType>,
}

impl FuncSignature {
    /// An empty `() -> ()` signature.
    pub fn empty() -> Self {
        FuncSignature::default()
    }
}

/// A named function signature, as it appears in a module's type section.
#[derive(Clone, Debug)]
pub struct FuncType {
    /// Optional binding name (e.g. `$block_i32`).
    pub name: Option<String>,
    /// The underlying signature.
    pub sig: FuncSignature,
}

/// A function's declared type: either a reference to a named signature in
/// the enclosing module's type section, or an inline signature. After `Var`
/// resolution both forms, if both present, must agree; this invariant is
/// checked by validation, not by this type.
#[derive(Clone, Debug)]
pub struct FuncDeclaration {
    /// Reference to the module's type section, if this declaration was
    /// written with an explicit type use.
    pub type_var: Option<crate::var::Var>,
    /// The signature, either copied from the referenced type or written
    /// inline.
    pub sig: FuncSignature,
    /// True when `sig` was written out inline rather than copied from
    /// `type_var`.
    pub has_inline_sig: bool,
}

impl FuncDeclaration {
    /// Builds a declaration from an inline signature only.
    pub fn inline(sig: FuncSignature) -> Self {
        FuncDeclaration { type_var: None, sig, has_inline_sig: true }
    }

    /// Builds a declaration that references a type-section entry.
    pub fn from_type_var(type_var: crate::var::Var, sig: FuncSignature) -> Self {
        FuncDeclaration { type_var: Some(type_var), sig, has_inline_sig: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn val_type_round_trips_through_binary_code() {
        assert_eq!(ValType::try_from(0x7f_u8).unwrap(), ValType::I32);
        assert_eq!(ValType::try_from(0x7b_u8).unwrap(), ValType::V128);
        assert!(ValType::try_from(0xff_u8).is_err());
    }

    #[test]
    fn const_preserves_nan_payload_bits() {
        let nan = 0x7FC0_0001_u32;
        assert_eq!(Const::F32(nan).f32_bits(), nan);
        let nan64 = 0xFFC0_0000_u64;
        assert_eq!(Const::F64(nan64).f64_bits(), nan64);
    }

    #[test]
    fn limits_well_formed_checks_bounds() {
        assert!(Limits::unbounded(3).is_well_formed());
        assert!(Limits { initial: 3, max: Some(5), is_shared: false, is_64: false }.is_well_formed());
        assert!(!(Limits { initial: 6, max: Some(5), is_shared: false, is_64: false }.is_well_formed()));
    }
}
