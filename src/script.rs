// Copyright (c) 2025 Joshua Seaton
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! The conformance-testing AST layered above [`Module`](crate::module::Module):
//! a [`Script`] is an ordered sequence of [`Command`]s plus a binding table
//! from module name to declaration position.

use crate::error::{IrError, Result};
use crate::module::Module;
use crate::types::{Const, Location};
use crate::var::Var;

/// How a script-level module was written: parsed inline text, a raw binary
/// blob (for malformed-binary assertions), or a quoted text blob (for
/// malformed-text assertions). Only `Text` carries a structured [`Module`];
/// the other two are opaque bytes the assertion is checking the rejection
/// of, not a module this crate can otherwise address.
#[derive(Clone, Debug)]
pub enum ScriptModuleKind {
    /// A successfully parsed module.
    Text(Module),
    /// Raw bytes of a binary module, kept opaque.
    Binary(Vec<u8>),
    /// Raw bytes of quoted module text, kept opaque.
    Quote(Vec<u8>),
}

/// A script-level module definition: its optional binding name and how it
/// was written.
#[derive(Clone, Debug)]
pub struct ScriptModule {
    /// Optional binding name (`register`/`Action` targets resolve through
    /// this, or through `Script::module_bindings` once appended).
    pub name: Option<String>,
    /// The module payload.
    pub kind: ScriptModuleKind,
}

impl ScriptModule {
    /// Wraps a parsed module.
    pub fn text(name: Option<String>, module: Module) -> Self {
        ScriptModule { name, kind: ScriptModuleKind::Text(module) }
    }

    /// Downcasts to the parsed module, failing for `Binary`/`Quote`.
    pub fn as_text(&self) -> Result<&Module> {
        match &self.kind {
            ScriptModuleKind::Text(module) => Ok(module),
            ScriptModuleKind::Binary(_) => Err(IrError::WrongVariant { expected: "Text", found: "Binary" }),
            ScriptModuleKind::Quote(_) => Err(IrError::WrongVariant { expected: "Text", found: "Quote" }),
        }
    }
}

/// A script-level action: invoking an exported function or reading an
/// exported global, optionally against a module other than the most
/// recently defined one.
#[derive(Clone, Debug)]
pub enum Action {
    /// Calls an exported function with the given arguments.
    Invoke {
        /// Target module, or the most recently defined module if `None`.
        module: Option<Var>,
        /// Exported field name.
        field: String,
        /// Argument values.
        args: Vec<Const>,
    },
    /// Reads an exported global.
    Get {
        /// Target module, or the most recently defined module if `None`.
        module: Option<Var>,
        /// Exported field name.
        field: String,
    },
}

impl Action {
    fn variant_name(&self) -> &'static str {
        match self {
            Action::Invoke { .. } => "Invoke",
            Action::Get { .. } => "Get",
        }
    }

    /// Downcasts to an `Invoke`'s target, field, and arguments.
    pub fn as_invoke(&self) -> Result<(Option<&Var>, &str, &[Const])> {
        match self {
            Action::Invoke { module, field, args } => Ok((module.as_ref(), field.as_str(), args.as_slice())),
            other => Err(IrError::WrongVariant { expected: "Invoke", found: other.variant_name() }),
        }
    }

    /// Downcasts to a `Get`'s target and field.
    pub fn as_get(&self) -> Result<(Option<&Var>, &str)> {
        match self {
            Action::Get { module, field } => Ok((module.as_ref(), field.as_str())),
            other => Err(IrError::WrongVariant { expected: "Get", found: other.variant_name() }),
        }
    }
}

/// One top-level script command, in the order it was declared.
#[derive(Clone, Debug)]
pub enum Command {
    /// Defines a module, becoming the implicit target of subsequent
    /// actions until another module command appears.
    Module(ScriptModule),
    /// Performs an action for its side effect, discarding any result.
    Action(Action),
    /// Registers a module under an external name, for import resolution
    /// by modules defined later in the script.
    Register {
        /// The external name to register under.
        name: String,
        /// The module to register, or the most recently defined one.
        module: Option<Var>,
    },
    /// Asserts that a module's binary or text encoding fails to parse.
    AssertMalformed {
        /// The (intentionally malformed) module.
        module: ScriptModule,
        /// Expected failure message substring.
        text: String,
    },
    /// Asserts that a module fails validation.
    AssertInvalid {
        /// The module expected to be rejected.
        module: ScriptModule,
        /// Expected failure message substring.
        text: String,
    },
    /// Asserts that a module fails to link (an import cannot be resolved,
    /// or resolves to an incompatible type).
    AssertUnlinkable {
        /// The module expected to fail linking.
        module: ScriptModule,
        /// Expected failure message substring.
        text: String,
    },
    /// Asserts that a module fails during instantiation (e.g. its start
    /// function traps).
    AssertUninstantiable {
        /// The module expected to fail instantiation.
        module: ScriptModule,
        /// Expected failure message substring.
        text: String,
    },
    /// Asserts that an action returns the given values.
    AssertReturn {
        /// The action to perform.
        action: Action,
        /// Expected result values.
        expected: Vec<Const>,
    },
    /// Asserts that an action returns a function reference.
    AssertReturnFunc {
        /// The action to perform.
        action: Action,
    },
    /// Asserts that an action returns a canonical NaN.
    AssertReturnCanonicalNan {
        /// The action to perform.
        action: Action,
    },
    /// Asserts that an action returns an arithmetic NaN.
    AssertReturnArithmeticNan {
        /// The action to perform.
        action: Action,
    },
    /// Asserts that an action traps.
    AssertTrap {
        /// The action to perform.
        action: Action,
        /// Expected trap message substring.
        text: String,
    },
    /// Asserts that an action exhausts a resource (e.g. the call stack).
    AssertExhaustion {
        /// The action to perform.
        action: Action,
        /// Expected failure message substring.
        text: String,
    },
}

/// Downcasts `$cmd` to `$pat`, returning [`IrError::WrongVariant`] on a
/// mismatch.
macro_rules! downcast_command {
    ($cmd:expr, $pat:pat => $out:expr, $expected:literal, $found:expr) => {
        match $cmd {
            $pat => Ok($out),
            _ => Err(IrError::WrongVariant { expected: $expected, found: $found }),
        }
    };
}

impl Command {
    /// The variant name, for [`IrError::WrongVariant`] messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Command::Module(_) => "Module",
            Command::Action(_) => "Action",
            Command::Register { .. } => "Register",
            Command::AssertMalformed { .. } => "AssertMalformed",
            Command::AssertInvalid { .. } => "AssertInvalid",
            Command::AssertUnlinkable { .. } => "AssertUnlinkable",
            Command::AssertUninstantiable { .. } => "AssertUninstantiable",
            Command::AssertReturn { .. } => "AssertReturn",
            Command::AssertReturnFunc { .. } => "AssertReturnFunc",
            Command::AssertReturnCanonicalNan { .. } => "AssertReturnCanonicalNan",
            Command::AssertReturnArithmeticNan { .. } => "AssertReturnArithmeticNan",
            Command::AssertTrap { .. } => "AssertTrap",
            Command::AssertExhaustion { .. } => "AssertExhaustion",
        }
    }

    /// Downcasts to the wrapped module, for a `Module` command.
    pub fn as_module(&self) -> Result<&ScriptModule> {
        downcast_command!(self, Command::Module(m) => m, "Module", self.variant_name())
    }

    /// Downcasts to the wrapped action, for an `Action` command.
    pub fn as_action(&self) -> Result<&Action> {
        downcast_command!(self, Command::Action(a) => a, "Action", self.variant_name())
    }
}

/// An ordered sequence of commands plus a binding table from module name to
/// declaration position, used to resolve `register` and action targets.
#[derive(Clone, Debug, Default)]
pub struct Script {
    commands: Vec<Command>,
    module_bindings: std::collections::HashMap<String, usize>,
}

impl Script {
    /// An empty script.
    pub fn new() -> Self {
        Script::default()
    }

    /// Appends `command`, recording a module binding if it is a named
    /// `Module` command.
    pub fn append_command(&mut self, command: Command) {
        if let Command::Module(script_module) = &command {
            if let Some(name) = &script_module.name {
                self.module_bindings.insert(name.clone(), self.commands.len());
            }
        }
        self.commands.push(command);
    }

    /// All commands, in declaration order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The module of the first `Module` command, scanning forward past any
    /// leading non-module commands. `None` if the script declares no
    /// module.
    pub fn get_first_module(&self) -> Option<&ScriptModule> {
        self.commands.iter().find_map(|cmd| match cmd {
            Command::Module(m) => Some(m),
            _ => None,
        })
    }

    /// Resolves `var` to a module: a numeric `var` indexes directly into
    /// `commands` (and must address a `Module` command); a named `var` is
    /// looked up in `module_bindings`.
    pub fn get_module(&self, var: &Var) -> Option<&ScriptModule> {
        let index = if let Some(index) = var.as_index() {
            index as usize
        } else {
            *self.module_bindings.get(var.as_name()?)?
        };
        match self.commands.get(index)? {
            Command::Module(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Module;

    fn loc() -> Location {
        Location::default()
    }

    fn script_module(name: Option<&str>) -> ScriptModule {
        ScriptModule::text(name.map(String::from), Module::new())
    }

    #[test]
    fn get_first_module_scans_past_non_module_commands() {
        let mut script = Script::new();
        script.append_command(Command::Action(Action::Get { module: None, field: "x".into() }));
        script.append_command(Command::Module(script_module(Some("$m"))));
        assert!(script.get_first_module().is_some());
    }

    #[test]
    fn get_first_module_is_none_for_empty_script() {
        let script = Script::new();
        assert!(script.get_first_module().is_none());
    }

    #[test]
    fn get_module_resolves_by_name_and_by_index() {
        let mut script = Script::new();
        script.append_command(Command::Module(script_module(Some("$m"))));
        script.append_command(Command::Action(Action::Invoke {
            module: None,
            field: "f".into(),
            args: vec![],
        }));

        assert!(script.get_module(&Var::name("$m", loc())).is_some());
        assert!(script.get_module(&Var::index(0, loc())).is_some());
        assert!(script.get_module(&Var::index(1, loc())).is_none());
        assert!(script.get_module(&Var::name("$missing", loc())).is_none());
    }

    #[test]
    fn command_downcast_reports_wrong_variant() {
        let command = Command::Action(Action::Get { module: None, field: "x".into() });
        assert!(command.as_module().is_err());
        assert!(command.as_action().is_ok());
    }

    #[test]
    fn script_module_as_text_rejects_binary_and_quote() {
        let binary = ScriptModule { name: None, kind: ScriptModuleKind::Binary(vec![0, 1, 2]) };
        assert!(binary.as_text().is_err());
        let quote = ScriptModule { name: None, kind: ScriptModuleKind::Quote(vec![]) };
        assert!(quote.as_text().is_err());
    }

    #[test]
    fn assert_return_carries_action_and_expected_values() {
        let command = Command::AssertReturn {
            action: Action::Invoke { module: None, field: "add".into(), args: vec![Const::I32(1), Const::I32(2)] },
            expected: vec![Const::I32(3)],
        };
        assert_eq!(command.variant_name(), "AssertReturn");
    }

    #[test]
    fn action_downcast_reports_wrong_variant() {
        let action = Action::Get { module: None, field: "x".into() };
        assert!(action.as_get().is_ok());
        let err = action.as_invoke().unwrap_err();
        assert_eq!(err, IrError::WrongVariant { expected: "Invoke", found: "Get" });
    }
}
