//! Checker tables: types, symbols and the declaration tree used for scope walks.

use super::flags::{ModifierFlags, TypeFlags};
use super::ids::{DeclId, SymbolId, TypeId, UnitId};

/// A checked type.
#[derive(Debug, Clone, Default)]
pub struct Type {
    pub flags: TypeFlags,
    pub symbol: Option<SymbolId>,
    /// Generic instantiation arguments (`Promise<string>` -> `[string]`).
    pub type_arguments: Vec<TypeId>,
    /// Constituents of a union or intersection.
    pub types: Vec<TypeId>,
    /// Text of a literal type, unquoted.
    pub literal: Option<String>,
}

impl Type {
    pub fn with_flags(flags: TypeFlags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    pub fn object(symbol: SymbolId, type_arguments: Vec<TypeId>) -> Self {
        Self {
            flags: TypeFlags::OBJECT,
            symbol: Some(symbol),
            type_arguments,
            ..Self::default()
        }
    }

    pub fn union(types: Vec<TypeId>) -> Self {
        Self {
            flags: TypeFlags::UNION,
            types,
            ..Self::default()
        }
    }

    pub fn literal(flags: TypeFlags, text: impl Into<String>) -> Self {
        Self {
            flags,
            literal: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub declarations: Vec<DeclId>,
    pub value_declaration: Option<DeclId>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, declaration: Option<DeclId>) -> Self {
        Self {
            name: name.into(),
            declarations: declaration.into_iter().collect(),
            value_declaration: None,
        }
    }

    /// The declaration a scope walk starts from.
    pub fn primary_declaration(&self) -> Option<DeclId> {
        self.value_declaration
            .or_else(|| self.declarations.first().copied())
    }
}

/// A node of the enclosing-scope tree.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub parent: Option<DeclId>,
    pub modifiers: ModifierFlags,
}

impl Declaration {
    pub fn new(kind: DeclarationKind, parent: Option<DeclId>, modifiers: ModifierFlags) -> Self {
        Self {
            kind,
            parent,
            modifiers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationKind {
    SourceUnit(UnitId),
    /// `namespace N {}`, `module N {}` or `declare module "n" {}`.
    Namespace {
        name: String,
        /// Declared with the `namespace` keyword rather than `module`.
        is_namespace: bool,
        /// Inner part of a dotted declaration (`B` in `namespace A.B`).
        is_nested: bool,
    },
    Class,
    Interface,
    Enum,
    TypeAlias,
    Function,
    Variable,
    TypeParameter,
    Other,
}
