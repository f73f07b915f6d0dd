// Copyright (c) 2025 Joshua Seaton
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! A parsed module: definitions addressable by index or name.
//!
//! [`Module`] aggregates functions, tables, memories, globals, events,
//! element/data segments, imports, exports, the start function, and
//! function types, each in its own index space. Fields are owned in
//! source order by [`Module::fields`] (significant for round-tripping);
//! per-kind caches are non-owning back-references (stored as indices into
//! `fields`, never raw pointers) populated as fields are appended.

use crate::binding::BindingHash;
use crate::error::{IrError, Result};
use crate::expr::ExprList;
use crate::local_types::LocalTypes;
use crate::types::{FuncDeclaration, Limits, Location, ValType};
use crate::var::{INVALID_INDEX, Var};

/// A function definition: its declared type, local variable declarations,
/// body, and the binding table mapping local names to their positional
/// index within (parameters ∪ locals).
#[derive(Clone, Debug)]
pub struct Func {
    /// Optional binding name (e.g. `$main`).
    pub name: Option<String>,
    /// The function's declared signature.
    pub decl: FuncDeclaration,
    /// Declared local variable types, beyond the parameters.
    pub local_types: LocalTypes,
    /// The function body.
    pub body: ExprList,
    /// Local name -> positional index, across parameters and locals.
    pub bindings: BindingHash,
}

impl Func {
    /// A function with the given declaration and an empty body.
    pub fn new(name: Option<String>, decl: FuncDeclaration) -> Self {
        Func { name, decl, local_types: LocalTypes::new(), body: ExprList::new(), bindings: BindingHash::new() }
    }

    /// Number of declared parameters.
    pub fn num_params(&self) -> u32 {
        self.decl.sig.params.len() as u32
    }

    /// Number of declared locals, not counting parameters.
    pub fn num_locals(&self) -> u32 {
        self.local_types.size()
    }

    /// Resolves `var` against this function's combined parameter/local
    /// index space: a numeric `var` is returned verbatim (bounds are
    /// checked by validation, not here); a named `var` is looked up,
    /// yielding [`crate::var::INVALID_INDEX`] on a miss.
    pub fn get_local_index(&self, var: &Var) -> u32 {
        if let Some(index) = var.as_index() {
            return index;
        }
        var.as_name().and_then(|name| self.bindings.resolve(name)).unwrap_or(INVALID_INDEX)
    }

    /// The type of the `i`th entry of the combined parameter/local index
    /// space (parameters occupy `[0, num_params)`, locals occupy
    /// `[num_params, num_params + num_locals)`).
    pub fn get_local_type(&self, i: u32) -> Option<ValType> {
        let num_params = self.num_params();
        if i < num_params {
            self.decl.sig.params.get(i as usize).copied()
        } else {
            self.local_types.index(i - num_params)
        }
    }

    /// Records a local binding at `name` -> `index`.
    pub fn bind_local(&mut self, name: impl Into<String>, index: u32, loc: Location) {
        self.bindings.insert(name, index, loc);
    }
}

/// A table definition: its size limits and element type.
#[derive(Clone, Debug)]
pub struct Table {
    /// Optional binding name.
    pub name: Option<String>,
    /// Size limits, in elements.
    pub limits: Limits,
    /// The type of reference this table stores (`FuncRef` or `AnyRef`).
    pub elem_type: ValType,
}

/// A linear memory definition: its size limits, in pages.
#[derive(Clone, Debug)]
pub struct Memory {
    /// Optional binding name.
    pub name: Option<String>,
    /// Size limits, in 64 KiB pages.
    pub limits: Limits,
}

/// A global variable definition.
#[derive(Clone, Debug)]
pub struct Global {
    /// Optional binding name.
    pub name: Option<String>,
    /// The global's value type.
    pub value_type: ValType,
    /// Whether the global may be written after initialization.
    pub mutable: bool,
    /// The initializer expression.
    pub init: ExprList,
}

/// An event (exception tag) definition: a function-style declaration
/// describing its payload types.
#[derive(Clone, Debug)]
pub struct Event {
    /// Optional binding name.
    pub name: Option<String>,
    /// The event's payload signature (results are always empty).
    pub decl: FuncDeclaration,
}

/// What kind of entity an [`Import`] or [`Export`] refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExternalKind {
    /// A function.
    Func,
    /// A table.
    Table,
    /// A linear memory.
    Memory,
    /// A global variable.
    Global,
    /// An event (exception tag).
    Event,
}

/// The type-specific payload of an [`Import`].
#[derive(Clone, Debug)]
pub enum ImportKind {
    /// Imported function, with its declared signature.
    Func(FuncDeclaration),
    /// Imported table.
    Table(Table),
    /// Imported memory.
    Memory(Memory),
    /// Imported global.
    Global(Global),
    /// Imported event.
    Event(Event),
}

impl ImportKind {
    /// The [`ExternalKind`] this import occupies an index space in.
    pub fn external_kind(&self) -> ExternalKind {
        match self {
            ImportKind::Func(_) => ExternalKind::Func,
            ImportKind::Table(_) => ExternalKind::Table,
            ImportKind::Memory(_) => ExternalKind::Memory,
            ImportKind::Global(_) => ExternalKind::Global,
            ImportKind::Event(_) => ExternalKind::Event,
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            ImportKind::Func(_) => "Func",
            ImportKind::Table(_) => "Table",
            ImportKind::Memory(_) => "Memory",
            ImportKind::Global(_) => "Global",
            ImportKind::Event(_) => "Event",
        }
    }

    /// Downcasts to the imported function's declaration.
    pub fn as_func(&self) -> Result<&FuncDeclaration> {
        match self {
            ImportKind::Func(decl) => Ok(decl),
            other => Err(IrError::WrongVariant { expected: "Func", found: other.variant_name() }),
        }
    }

    /// Downcasts to the imported table.
    pub fn as_table(&self) -> Result<&Table> {
        match self {
            ImportKind::Table(table) => Ok(table),
            other => Err(IrError::WrongVariant { expected: "Table", found: other.variant_name() }),
        }
    }

    /// Downcasts to the imported memory.
    pub fn as_memory(&self) -> Result<&Memory> {
        match self {
            ImportKind::Memory(memory) => Ok(memory),
            other => Err(IrError::WrongVariant { expected: "Memory", found: other.variant_name() }),
        }
    }

    /// Downcasts to the imported global.
    pub fn as_global(&self) -> Result<&Global> {
        match self {
            ImportKind::Global(global) => Ok(global),
            other => Err(IrError::WrongVariant { expected: "Global", found: other.variant_name() }),
        }
    }

    /// Downcasts to the imported event.
    pub fn as_event(&self) -> Result<&Event> {
        match self {
            ImportKind::Event(event) => Ok(event),
            other => Err(IrError::WrongVariant { expected: "Event", found: other.variant_name() }),
        }
    }
}

/// An import declaration: a two-level `(module, field)` name pair naming
/// the external entity, and a local binding name for referencing it within
/// this module.
#[derive(Clone, Debug)]
pub struct Import {
    /// Name of the module to import from.
    pub module: String,
    /// Name of the imported entity within that module.
    pub field: String,
    /// Optional local binding name (e.g. `$f` in `(import "a" "b" (func $f ...))`).
    pub name: Option<String>,
    /// The imported entity's kind and type.
    pub kind: ImportKind,
}

/// An export declaration: a local name and the `Var` of the exported
/// entity.
#[derive(Clone, Debug)]
pub struct Export {
    /// The externally visible name.
    pub name: String,
    /// Which index space `var` addresses.
    pub kind: ExternalKind,
    /// The exported entity.
    pub var: Var,
}

/// Bit layout of an element/data segment's `flags` byte.
pub mod segment_flags {
    /// The segment is passive: not copied at instantiation, only via an
    /// explicit `*.init` or dropped via `*.drop`.
    pub const PASSIVE: u8 = 1;
    /// The segment carries an explicit table/memory index rather than
    /// implicitly targeting index 0.
    pub const HAS_INDEX: u8 = 2;
    /// (Element segments only.) The segment's initializer is a vector of
    /// element expressions rather than a plain function-index vector.
    pub const USE_ELEM_EXPRS: u8 = 4;
}

/// One entry of an element segment's initializer, when the segment uses
/// the `UseElemExprs` encoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ElemExprKind {
    /// A typed null reference.
    RefNull,
    /// A function reference.
    RefFunc,
}

/// One element-expression entry: its kind and, for `RefFunc`, the
/// referenced function.
#[derive(Clone, Debug)]
pub struct ElemExpr {
    /// Whether this entry is a null reference or a function reference.
    pub kind: ElemExprKind,
    /// The referenced function, meaningful only when `kind` is `RefFunc`.
    pub var: Var,
}

/// An element segment: initializes a table range, either at instantiation
/// (active) or on demand via `table.init` (passive).
#[derive(Clone, Debug)]
pub struct ElemSegment {
    /// Optional binding name.
    pub name: Option<String>,
    /// Bit flags; see [`segment_flags`].
    pub flags: u8,
    /// The table this segment initializes. Ignored for passive segments.
    pub table: Var,
    /// The type of references this segment contains.
    pub elem_type: ValType,
    /// Offset within the table, active segments only (empty otherwise).
    pub offset: ExprList,
    /// The segment's contents.
    pub elems: Vec<ElemExpr>,
}

impl ElemSegment {
    /// True iff [`segment_flags::PASSIVE`] is set.
    pub fn is_passive(&self) -> bool {
        self.flags & segment_flags::PASSIVE != 0
    }
}

/// A data segment: initializes a memory range, either at instantiation
/// (active) or on demand via `memory.init` (passive).
#[derive(Clone, Debug)]
pub struct DataSegment {
    /// Optional binding name.
    pub name: Option<String>,
    /// Bit flags; see [`segment_flags`].
    pub flags: u8,
    /// The memory this segment initializes. Ignored for passive segments.
    pub memory: Var,
    /// Offset within the memory, active segments only (empty otherwise).
    pub offset: ExprList,
    /// The raw initializer bytes.
    pub data: Vec<u8>,
}

impl DataSegment {
    /// True iff [`segment_flags::PASSIVE`] is set.
    pub fn is_passive(&self) -> bool {
        self.flags & segment_flags::PASSIVE != 0
    }
}

/// One field of a module's field list, in source order. Fields own their
/// payloads; [`Module`]'s per-kind caches are non-owning back-references
/// into this list.
#[derive(Clone, Debug)]
pub enum ModuleField {
    /// A named function-type declaration.
    FuncType(crate::types::FuncType),
    /// An import.
    Import(Import),
    /// A function definition.
    Func(Func),
    /// A table definition.
    Table(Table),
    /// A memory definition.
    Memory(Memory),
    /// A global definition.
    Global(Global),
    /// An event definition.
    Event(Event),
    /// An export.
    Export(Export),
    /// The start function.
    Start(Var),
    /// An element segment.
    ElemSegment(ElemSegment),
    /// A data segment.
    DataSegment(DataSegment),
}

// Downcasts `$field` to `$pat`, returning `IrError::WrongVariant` on a
// mismatch. Mirrors `expr::downcast!`.
macro_rules! downcast_field {
    ($field:expr, $pat:pat => $out:expr, $expected:literal) => {
        match $field {
            $pat => Ok($out),
            other => Err(IrError::WrongVariant { expected: $expected, found: other.variant_name() }),
        }
    };
}

impl ModuleField {
    fn variant_name(&self) -> &'static str {
        match self {
            ModuleField::FuncType(_) => "FuncType",
            ModuleField::Import(_) => "Import",
            ModuleField::Func(_) => "Func",
            ModuleField::Table(_) => "Table",
            ModuleField::Memory(_) => "Memory",
            ModuleField::Global(_) => "Global",
            ModuleField::Event(_) => "Event",
            ModuleField::Export(_) => "Export",
            ModuleField::Start(_) => "Start",
            ModuleField::ElemSegment(_) => "ElemSegment",
            ModuleField::DataSegment(_) => "DataSegment",
        }
    }

    /// Downcasts to a named function-type declaration.
    pub fn as_func_type(&self) -> Result<&crate::types::FuncType> {
        downcast_field!(self, ModuleField::FuncType(ty) => ty, "FuncType")
    }

    /// Downcasts to an import.
    pub fn as_import(&self) -> Result<&Import> {
        downcast_field!(self, ModuleField::Import(import) => import, "Import")
    }

    /// Downcasts to a function definition.
    pub fn as_func(&self) -> Result<&Func> {
        downcast_field!(self, ModuleField::Func(func) => func, "Func")
    }

    /// Downcasts to a table definition.
    pub fn as_table(&self) -> Result<&Table> {
        downcast_field!(self, ModuleField::Table(table) => table, "Table")
    }

    /// Downcasts to a memory definition.
    pub fn as_memory(&self) -> Result<&Memory> {
        downcast_field!(self, ModuleField::Memory(memory) => memory, "Memory")
    }

    /// Downcasts to a global definition.
    pub fn as_global(&self) -> Result<&Global> {
        downcast_field!(self, ModuleField::Global(global) => global, "Global")
    }

    /// Downcasts to an event definition.
    pub fn as_event(&self) -> Result<&Event> {
        downcast_field!(self, ModuleField::Event(event) => event, "Event")
    }

    /// Downcasts to an export.
    pub fn as_export(&self) -> Result<&Export> {
        downcast_field!(self, ModuleField::Export(export) => export, "Export")
    }

    /// Downcasts to the start function's `Var`.
    pub fn as_start(&self) -> Result<&Var> {
        downcast_field!(self, ModuleField::Start(var) => var, "Start")
    }

    /// Downcasts to an element segment.
    pub fn as_elem_segment(&self) -> Result<&ElemSegment> {
        downcast_field!(self, ModuleField::ElemSegment(segment) => segment, "ElemSegment")
    }

    /// Downcasts to a data segment.
    pub fn as_data_segment(&self) -> Result<&DataSegment> {
        downcast_field!(self, ModuleField::DataSegment(segment) => segment, "DataSegment")
    }
}

// Generates, for one index space: `get_x_index`, `get_x`, `is_x_import`,
// and the `append_x`/`append_x_import` pair that keep the cache, the
// binding table, and the import counter in lockstep. `$variant` names the
// `ModuleField` arm this index space's entries live in.
macro_rules! index_space {
    (
        $ty:ty,
        variant = $variant:ident,
        cache = $cache:ident,
        bindings = $bindings:ident,
        num_imports = $num_imports:ident,
        get_index = $get_index:ident,
        get = $get:ident,
        is_import = $is_import:ident,
        append = $append:ident,
    ) => {
        /// Resolves `var` to its numeric index within this index space.
        /// A numeric `var` is returned verbatim; a named `var` is looked
        /// up, yielding [`crate::var::INVALID_INDEX`] on a miss.
        pub fn $get_index(&self, var: &Var) -> u32 {
            if let Some(index) = var.as_index() {
                return index;
            }
            var.as_name().and_then(|name| self.$bindings.resolve(name)).unwrap_or(INVALID_INDEX)
        }

        /// Resolves `var` and dereferences it against this index space's
        /// cache, returning `None` on a miss.
        pub fn $get(&self, var: &Var) -> Option<&$ty> {
            let index = self.$get_index(var) as usize;
            let field_index = *self.$cache.get(index)?;
            match &self.fields[field_index] {
                ModuleField::$variant(entry) => Some(entry),
                _ => None,
            }
        }

        /// True iff `var` resolves to an index that originated as an
        /// import (i.e. is less than this index space's import count).
        pub fn $is_import(&self, var: &Var) -> bool {
            self.$get_index(var) < self.$num_imports
        }

        /// Appends `entry` as a new, non-import definition: moves it into
        /// [`Module::fields`], caches its position, and binds its name if
        /// it has one.
        pub fn $append(&mut self, entry: $ty, loc: Location) {
            let name = entry.name.clone();
            let index = self.$cache.len() as u32;
            let field_index = self.fields.len();
            self.fields.push(ModuleField::$variant(entry));
            self.$cache.push(field_index);
            if let Some(name) = name {
                self.$bindings.insert(name, index, loc);
            }
        }
    };
}

// As `index_space!`, but for index spaces with no corresponding import
// kind (function types, element segments, data segments).
macro_rules! index_space_no_import {
    (
        $ty:ty,
        variant = $variant:ident,
        cache = $cache:ident,
        bindings = $bindings:ident,
        get_index = $get_index:ident,
        get = $get:ident,
        append = $append:ident,
    ) => {
        /// Resolves `var` to its numeric index within this index space.
        pub fn $get_index(&self, var: &Var) -> u32 {
            if let Some(index) = var.as_index() {
                return index;
            }
            var.as_name().and_then(|name| self.$bindings.resolve(name)).unwrap_or(INVALID_INDEX)
        }

        /// Resolves `var` and dereferences it against this index space's
        /// cache, returning `None` on a miss.
        pub fn $get(&self, var: &Var) -> Option<&$ty> {
            let index = self.$get_index(var) as usize;
            let field_index = *self.$cache.get(index)?;
            match &self.fields[field_index] {
                ModuleField::$variant(entry) => Some(entry),
                _ => None,
            }
        }

        /// Appends `entry`: moves it into [`Module::fields`], caches its
        /// position, and binds its name if it has one.
        pub fn $append(&mut self, entry: $ty, loc: Location) {
            let name = entry.name.clone();
            let index = self.$cache.len() as u32;
            let field_index = self.fields.len();
            self.fields.push(ModuleField::$variant(entry));
            self.$cache.push(field_index);
            if let Some(name) = name {
                self.$bindings.insert(name, index, loc);
            }
        }
    };
}

/// A parsed module: an ordered field list plus per-kind index-space
/// caches, binding tables, and import counts.
#[derive(Clone, Debug, Default)]
pub struct Module {
    /// Optional module name, as used by script-level `register`/actions.
    pub name: Option<String>,
    /// The start function, if declared.
    pub start: Option<Var>,

    fields: Vec<ModuleField>,

    funcs: Vec<usize>,
    tables: Vec<usize>,
    memories: Vec<usize>,
    globals: Vec<usize>,
    events: Vec<usize>,
    func_types: Vec<usize>,
    elem_segments: Vec<usize>,
    data_segments: Vec<usize>,
    exports: Vec<usize>,

    num_func_imports: u32,
    num_table_imports: u32,
    num_memory_imports: u32,
    num_global_imports: u32,
    num_event_imports: u32,

    func_bindings: BindingHash,
    table_bindings: BindingHash,
    memory_bindings: BindingHash,
    global_bindings: BindingHash,
    event_bindings: BindingHash,
    type_bindings: BindingHash,
    elem_bindings: BindingHash,
    data_bindings: BindingHash,
}

impl Module {
    /// An empty, unnamed module.
    pub fn new() -> Self {
        Module::default()
    }

    /// The field list, in source order. Significant for index assignment
    /// and round-tripping.
    pub fn fields(&self) -> &[ModuleField] {
        &self.fields
    }

    index_space!(
        Func,
        variant = Func,
        cache = funcs,
        bindings = func_bindings,
        num_imports = num_func_imports,
        get_index = get_func_index,
        get = get_func,
        is_import = is_func_import,
        append = append_func,
    );
    index_space!(
        Table,
        variant = Table,
        cache = tables,
        bindings = table_bindings,
        num_imports = num_table_imports,
        get_index = get_table_index,
        get = get_table,
        is_import = is_table_import,
        append = append_table,
    );
    index_space!(
        Memory,
        variant = Memory,
        cache = memories,
        bindings = memory_bindings,
        num_imports = num_memory_imports,
        get_index = get_memory_index,
        get = get_memory,
        is_import = is_memory_import,
        append = append_memory,
    );
    index_space!(
        Global,
        variant = Global,
        cache = globals,
        bindings = global_bindings,
        num_imports = num_global_imports,
        get_index = get_global_index,
        get = get_global,
        is_import = is_global_import,
        append = append_global,
    );
    index_space!(
        Event,
        variant = Event,
        cache = events,
        bindings = event_bindings,
        num_imports = num_event_imports,
        get_index = get_event_index,
        get = get_event,
        is_import = is_event_import,
        append = append_event,
    );
    index_space_no_import!(
        crate::types::FuncType,
        variant = FuncType,
        cache = func_types,
        bindings = type_bindings,
        get_index = get_func_type_index,
        get = get_func_type,
        append = append_func_type,
    );
    index_space_no_import!(
        ElemSegment,
        variant = ElemSegment,
        cache = elem_segments,
        bindings = elem_bindings,
        get_index = get_elem_segment_index,
        get = get_elem_segment,
        append = append_elem_segment,
    );
    index_space_no_import!(
        DataSegment,
        variant = DataSegment,
        cache = data_segments,
        bindings = data_bindings,
        get_index = get_data_segment_index,
        get = get_data_segment,
        append = append_data_segment,
    );

    /// Number of function-index-space entries (imports plus definitions).
    pub fn num_funcs(&self) -> u32 {
        self.funcs.len() as u32
    }

    /// Number of function imports. Imports always occupy indices
    /// `[0, num_func_imports)`.
    pub fn num_func_imports(&self) -> u32 {
        self.num_func_imports
    }

    /// Number of table imports.
    pub fn num_table_imports(&self) -> u32 {
        self.num_table_imports
    }

    /// Number of memory imports.
    pub fn num_memory_imports(&self) -> u32 {
        self.num_memory_imports
    }

    /// Number of global imports.
    pub fn num_global_imports(&self) -> u32 {
        self.num_global_imports
    }

    /// Number of event imports.
    pub fn num_event_imports(&self) -> u32 {
        self.num_event_imports
    }

    /// Appends an import: moves it into the field list, updates the
    /// cache and binding table for the kind it carries, and increments
    /// that kind's import counter. Imports must precede non-import
    /// fields of the same kind for index assignment to match the binary
    /// format; this is the parser's invariant to maintain, not enforced
    /// here.
    pub fn append_import(&mut self, import: Import, loc: Location) {
        let name = import.name.clone();
        let external_kind = import.kind.external_kind();
        let field_index = self.fields.len();
        let (cache, bindings, num_imports) = match external_kind {
            ExternalKind::Func => (&mut self.funcs, &mut self.func_bindings, &mut self.num_func_imports),
            ExternalKind::Table => (&mut self.tables, &mut self.table_bindings, &mut self.num_table_imports),
            ExternalKind::Memory => (&mut self.memories, &mut self.memory_bindings, &mut self.num_memory_imports),
            ExternalKind::Global => (&mut self.globals, &mut self.global_bindings, &mut self.num_global_imports),
            ExternalKind::Event => (&mut self.events, &mut self.event_bindings, &mut self.num_event_imports),
        };
        let index = cache.len() as u32;
        cache.push(field_index);
        *num_imports += 1;
        if let Some(name) = name {
            bindings.insert(name, index, loc);
        }
        self.fields.push(ModuleField::Import(import));
    }

    /// Appends an export. Exports have no index space of their own (they
    /// are looked up by external name, not `Var`), so this only extends
    /// the field list and the export cache.
    pub fn append_export(&mut self, export: Export) {
        let field_index = self.fields.len();
        self.fields.push(ModuleField::Export(export));
        self.exports.push(field_index);
    }

    /// All exports, in declaration order.
    pub fn exports(&self) -> impl Iterator<Item = &Export> {
        self.exports.iter().map(|&i| match &self.fields[i] {
            ModuleField::Export(export) => export,
            _ => unreachable!("export cache entry did not point at an Export field"),
        })
    }

    /// Appends the start-function declaration.
    pub fn append_start(&mut self, var: Var) {
        self.start = Some(var.clone());
        self.fields.push(ModuleField::Start(var));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FuncSignature;

    fn loc() -> Location {
        Location::default()
    }

    fn func_decl() -> FuncDeclaration {
        FuncDeclaration::inline(FuncSignature::empty())
    }

    // Scenario S5: import precedes definition.
    #[test]
    fn import_precedes_definition_matches_scenario_s5() {
        let mut module = Module::new();
        module.append_import(
            Import {
                module: "env".into(),
                field: "f".into(),
                name: None,
                kind: ImportKind::Func(func_decl()),
            },
            loc(),
        );
        module.append_func(Func::new(None, func_decl()), loc());

        assert_eq!(module.num_func_imports(), 1);
        assert!(module.is_func_import(&Var::index(0, loc())));
        assert!(!module.is_func_import(&Var::index(1, loc())));
        assert_eq!(module.num_funcs(), 2);
    }

    // Scenario S4: binding collision.
    #[test]
    fn duplicate_binding_resolves_to_first_and_is_reported_matches_scenario_s4() {
        let mut module = Module::new();
        module.append_func(Func::new(Some("$f".into()), func_decl()), loc());
        module.append_func(Func::new(Some("$f".into()), func_decl()), loc());

        assert_eq!(module.get_func_index(&Var::name("$f", loc())), 0);
        let dups: Vec<_> = module.func_bindings.duplicates().collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].1.len(), 2);
    }

    #[test]
    fn module_binding_idempotence_matches_testable_property_6() {
        let mut module = Module::new();
        module.append_table(
            Table { name: Some("$t".into()), limits: Limits::unbounded(1), elem_type: ValType::AnyRef },
            loc(),
        );
        assert_eq!(module.get_table_index(&Var::name("$t", loc())), 0);
        assert!(!module.is_table_import(&Var::index(0, loc())));
    }

    #[test]
    fn get_func_resolves_through_cache() {
        let mut module = Module::new();
        module.append_func(Func::new(Some("$main".into()), func_decl()), loc());
        let got = module.get_func(&Var::name("$main", loc())).unwrap();
        assert_eq!(got.name.as_deref(), Some("$main"));
    }

    #[test]
    fn unresolved_name_yields_invalid_index() {
        let module = Module::new();
        assert_eq!(module.get_func_index(&Var::name("$missing", loc())), INVALID_INDEX);
        assert!(module.get_func(&Var::name("$missing", loc())).is_none());
    }

    #[test]
    fn elem_segment_flags_byte_matches_passive_layout() {
        let segment = ElemSegment {
            name: None,
            flags: segment_flags::PASSIVE | segment_flags::USE_ELEM_EXPRS,
            table: Var::index(0, loc()),
            elem_type: ValType::FuncRef,
            offset: ExprList::new(),
            elems: vec![ElemExpr { kind: ElemExprKind::RefNull, var: Var::index(0, loc()) }],
        };
        assert_eq!(segment.flags, 0x05);
        assert!(segment.is_passive());
    }

    // Scenario S1: reference-types module, reduced to one function per
    // table operation instead of nine (the exercised mechanics are the
    // same; the extra copies don't exercise anything new in this layer).
    #[test]
    fn reference_types_module_matches_scenario_s1() {
        use crate::expr::{Expr, ExprKind};
        use crate::types::{Const, FuncType};

        let mut module = Module::new();

        module.append_func_type(
            FuncType { name: None, sig: FuncSignature { params: vec![], results: vec![ValType::AnyRef] } },
            loc(),
        );
        module.append_func_type(
            FuncType { name: None, sig: FuncSignature { params: vec![ValType::AnyRef], results: vec![] } },
            loc(),
        );
        module.append_func_type(
            FuncType { name: None, sig: FuncSignature { params: vec![], results: vec![ValType::I32] } },
            loc(),
        );
        module.append_func_type(
            FuncType { name: None, sig: FuncSignature { params: vec![ValType::AnyRef], results: vec![] } },
            loc(),
        );
        assert_eq!(module.get_func_type(&Var::index(3, loc())).unwrap().sig.params, vec![ValType::AnyRef]);

        module.append_table(
            Table { name: Some("$anyref_a".into()), limits: Limits::unbounded(1), elem_type: ValType::AnyRef },
            loc(),
        );
        module.append_table(
            Table { name: Some("$anyref_b".into()), limits: Limits::unbounded(1), elem_type: ValType::AnyRef },
            loc(),
        );
        module.append_table(
            Table { name: Some("$funcs".into()), limits: Limits::unbounded(1), elem_type: ValType::FuncRef },
            loc(),
        );

        module.append_func(Func::new(Some("$target".into()), func_decl()), loc());

        module.append_elem_segment(
            ElemSegment {
                name: None,
                flags: segment_flags::HAS_INDEX,
                table: Var::name("$funcs", loc()),
                elem_type: ValType::FuncRef,
                offset: vec![Expr::new(ExprKind::Const(Const::I32(0)), loc())],
                elems: vec![ElemExpr { kind: ElemExprKind::RefFunc, var: Var::name("$target", loc()) }],
            },
            loc(),
        );
        module.append_elem_segment(
            ElemSegment {
                name: None,
                flags: segment_flags::PASSIVE | segment_flags::USE_ELEM_EXPRS,
                table: Var::name("$funcs", loc()),
                elem_type: ValType::FuncRef,
                offset: vec![],
                elems: vec![ElemExpr { kind: ElemExprKind::RefNull, var: Var::index(0, loc()) }],
            },
            loc(),
        );

        let mut exercise = Func::new(Some("$exercise".into()), func_decl());
        exercise.body = vec![
            Expr::new(ExprKind::TableGet(Var::name("$anyref_a", loc())), loc()),
            Expr::new(ExprKind::TableSet(Var::name("$anyref_b", loc())), loc()),
            Expr::new(ExprKind::TableGrow(Var::name("$funcs", loc())), loc()),
            Expr::new(ExprKind::RefIsNull, loc()),
            Expr::new(ExprKind::TableSize(Var::name("$funcs", loc())), loc()),
        ];
        module.append_func(exercise, loc());

        assert_eq!(module.get_table_index(&Var::name("$anyref_a", loc())), 0);
        assert_eq!(module.get_table_index(&Var::name("$anyref_b", loc())), 1);
        assert_eq!(module.get_table_index(&Var::name("$funcs", loc())), 2);
        assert_eq!(module.get_func_index(&Var::name("$target", loc())), 0);

        let passive = module.get_elem_segment(&Var::index(1, loc())).unwrap();
        assert_eq!(passive.flags, 0x05);
        assert!(passive.is_passive());

        let active = module.get_elem_segment(&Var::index(0, loc())).unwrap();
        assert!(!active.is_passive());
        assert_eq!(module.get_table_index(&active.table), 2);
    }

    #[test]
    fn exports_iterate_in_declaration_order() {
        let mut module = Module::new();
        module.append_export(Export { name: "a".into(), kind: ExternalKind::Func, var: Var::index(0, loc()) });
        module.append_export(Export { name: "b".into(), kind: ExternalKind::Func, var: Var::index(1, loc()) });
        let names: Vec<_> = module.exports().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn import_kind_downcast_reports_wrong_variant() {
        let kind = ImportKind::Func(func_decl());
        assert!(kind.as_func().is_ok());
        let err = kind.as_table().unwrap_err();
        assert_eq!(err, IrError::WrongVariant { expected: "Table", found: "Func" });
    }

    #[test]
    fn module_field_downcast_reports_wrong_variant() {
        let field = ModuleField::Start(Var::index(0, loc()));
        assert!(field.as_start().is_ok());
        let err = field.as_func().unwrap_err();
        assert_eq!(err, IrError::WrongVariant { expected: "Func", found: "Start" });
    }
}
