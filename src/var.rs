// Copyright (c) 2025 Joshua Seaton
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Symbolic-or-numeric references (`Var`).

use crate::types::Location;

/// Sentinel returned by index-resolution lookups on a miss.
pub const INVALID_INDEX: u32 = u32::MAX;

/// A reference that is either a numeric index or a symbolic name (e.g.
/// `$main`) within one namespace. The parser always produces a `Var`; a
/// separate resolution pass rewrites every name-form `Var` to its index
/// form once binding tables are built. After resolution, no `Var` in a
/// well-formed module is still in name form.
#[derive(Clone, Debug)]
pub struct Var {
    payload: VarPayload,
    /// Where this reference was written.
    pub loc: Location,
}

#[derive(Clone, Debug)]
enum VarPayload {
    Index(u32),
    Name(String),
}

impl Var {
    /// Builds a numeric reference.
    pub fn index(index: u32, loc: Location) -> Self {
        Var { payload: VarPayload::Index(index), loc }
    }

    /// Builds a symbolic reference. `name` conventionally begins with `$`.
    pub fn name(name: impl Into<String>, loc: Location) -> Self {
        Var { payload: VarPayload::Name(name.into()), loc }
    }

    /// True when this reference is currently in index form.
    pub fn is_index(&self) -> bool {
        matches!(self.payload, VarPayload::Index(_))
    }

    /// True when this reference is currently in name form.
    pub fn is_name(&self) -> bool {
        matches!(self.payload, VarPayload::Name(_))
    }

    /// The index, if in index form.
    pub fn as_index(&self) -> Option<u32> {
        match self.payload {
            VarPayload::Index(i) => Some(i),
            VarPayload::Name(_) => None,
        }
    }

    /// The name, if in name form.
    pub fn as_name(&self) -> Option<&str> {
        match &self.payload {
            VarPayload::Index(_) => None,
            VarPayload::Name(name) => Some(name),
        }
    }

    /// Rewrites this reference to index form, discarding any name payload.
    pub fn set_index(&mut self, index: u32) {
        self.payload = VarPayload::Index(index);
    }

    /// Rewrites this reference to name form, discarding any index payload.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.payload = VarPayload::Name(name.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::default()
    }

    #[test]
    fn index_form_round_trips() {
        let var = Var::index(3, loc());
        assert!(var.is_index());
        assert_eq!(var.as_index(), Some(3));
        assert_eq!(var.as_name(), None);
    }

    #[test]
    fn name_form_round_trips() {
        let var = Var::name("$main", loc());
        assert!(var.is_name());
        assert_eq!(var.as_name(), Some("$main"));
        assert_eq!(var.as_index(), None);
    }

    #[test]
    fn set_index_overwrites_name() {
        let mut var = Var::index(7, loc());
        var.set_name("$f");
        assert!(var.is_name());
        var.set_index(2);
        assert!(var.is_index());
        assert_eq!(var.as_index(), Some(2));
    }

    #[test]
    fn set_name_overwrites_index() {
        let mut var = Var::name("$f", loc());
        var.set_index(9);
        assert!(var.is_index());
        var.set_name("$g");
        assert!(var.is_name());
        assert_eq!(var.as_name(), Some("$g"));
    }
}
