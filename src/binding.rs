// Copyright (c) 2025 Joshua Seaton
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Name-to-index binding tables.

use std::collections::HashMap;

use crate::types::Location;
use crate::var::{INVALID_INDEX, Var};

/// One binding: the index it resolves to and where it was declared.
#[derive(Clone, Copy, Debug)]
pub struct Binding {
    /// The index this name resolves to within its namespace.
    pub index: u32,
    /// Where the binding was declared.
    pub loc: Location,
}

/// A multi-map from name to `(location, index)` within one namespace of one
/// module. Duplicate names are retained (they denote source-level duplicate
/// declarations, reported as errors only by a later validation pass, not
/// rejected here). Entries for one name are kept in first-insertion order;
/// `resolve` always returns the first.
#[derive(Clone, Debug, Default)]
pub struct BindingHash {
    buckets: HashMap<String, Vec<Binding>>,
}

impl BindingHash {
    /// An empty binding table.
    pub fn new() -> Self {
        BindingHash::default()
    }

    /// Records a binding from `name` to `index`. Does not replace or merge
    /// with any existing binding of the same name.
    pub fn insert(&mut self, name: impl Into<String>, index: u32, loc: Location) {
        self.buckets.entry(name.into()).or_default().push(Binding { index, loc });
    }

    /// All bindings recorded for `name`, in first-insertion order.
    pub fn bindings_for(&self, name: &str) -> &[Binding] {
        self.buckets.get(name).map_or(&[], Vec::as_slice)
    }

    /// The index of the first-inserted binding for `name`, if any.
    pub fn resolve(&self, name: &str) -> Option<u32> {
        self.buckets.get(name).and_then(|v| v.first()).map(|b| b.index)
    }

    /// Resolves `var`: if already an index, returns it verbatim; if a name,
    /// looks it up, returning [`crate::var::INVALID_INDEX`] on a miss.
    pub fn resolve_var(&self, var: &Var) -> u32 {
        if let Some(index) = var.as_index() {
            return index;
        }
        var.as_name().and_then(|name| self.resolve(name)).unwrap_or(INVALID_INDEX)
    }

    /// Names bound to more than one index.
    pub fn duplicates(&self) -> impl Iterator<Item = (&str, &[Binding])> {
        self.buckets.iter().filter(|(_, v)| v.len() > 1).map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Builds `out[i] = name at index i`, with `None` at indices with no
    /// name. Ties (multiple names bound to one index) resolve to the
    /// lexicographically first name encountered.
    pub fn reverse_mapping(&self, count: usize) -> Vec<Option<&str>> {
        let mut out: Vec<Option<&str>> = vec![None; count];
        let mut names: Vec<&str> = self.buckets.keys().map(String::as_str).collect();
        names.sort_unstable();
        for name in names {
            for binding in &self.buckets[name] {
                let index = binding.index as usize;
                if index < count && out[index].is_none() {
                    out[index] = Some(name);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::default()
    }

    #[test]
    fn resolve_returns_first_insertion() {
        let mut table = BindingHash::new();
        table.insert("$f", 0, loc());
        table.insert("$f", 1, loc());
        assert_eq!(table.resolve("$f"), Some(0));
        assert_eq!(table.bindings_for("$f").len(), 2);
    }

    #[test]
    fn resolve_var_passes_through_indices() {
        let table = BindingHash::new();
        let var = Var::index(5, loc());
        assert_eq!(table.resolve_var(&var), 5);
    }

    #[test]
    fn resolve_var_misses_return_invalid_index() {
        let table = BindingHash::new();
        let var = Var::name("$missing", loc());
        assert_eq!(table.resolve_var(&var), crate::var::INVALID_INDEX);
    }

    #[test]
    fn duplicates_reports_only_colliding_names() {
        let mut table = BindingHash::new();
        table.insert("$f", 0, loc());
        table.insert("$g", 1, loc());
        table.insert("$g", 2, loc());
        let dups: Vec<_> = table.duplicates().collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].0, "$g");
    }

    #[test]
    fn reverse_mapping_picks_lexicographically_first_name_on_tie() {
        let mut table = BindingHash::new();
        table.insert("$b", 0, loc());
        table.insert("$a", 0, loc());
        let mapping = table.reverse_mapping(1);
        assert_eq!(mapping[0], Some("$a"));
    }
}
