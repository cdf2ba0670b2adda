//! Symbol tables filled while lowering and read while binding.

use rustc_hash::{FxHashMap, FxHashSet};
use tsdoc::program::{DeclId, Keyword, SymbolId, TypeFlags};

/// A type expression with names still unresolved.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TypeExpr {
    Keyword(Keyword),
    Literal { flags: TypeFlags, text: String },
    /// Possibly dotted name (`ns.Options`) with type arguments.
    Reference { name: String, args: Vec<TypeExpr> },
    Array(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Function,
    /// Inline object shape.
    Object,
    /// Shapes the binder does not model (tuples, mapped and conditional types).
    Any,
}

/// Where a type expression was written.
#[derive(Debug, Clone)]
pub(crate) struct Scope {
    pub unit: usize,
    /// Enclosing namespace declarations, outermost first.
    pub namespaces: Vec<DeclId>,
    /// Type parameters in scope, outermost first.
    pub type_params: Vec<(String, SymbolId)>,
}

impl Scope {
    pub fn unit(unit: usize) -> Self {
        Self {
            unit,
            namespaces: Vec::new(),
            type_params: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExportTarget {
    /// Exported under a local name of the same unit.
    Local(String),
    /// `export { name } from "specifier"`.
    From { specifier: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ImportKind {
    Named(String),
    Default,
    Namespace,
}

#[derive(Debug, Clone)]
pub(crate) struct ImportBinding {
    pub specifier: String,
    pub kind: ImportKind,
}

/// Names visible at the top level of one unit.
#[derive(Debug, Default)]
pub(crate) struct UnitTable {
    pub file_name: String,
    pub locals: FxHashMap<String, SymbolId>,
    pub imports: FxHashMap<String, ImportBinding>,
    pub exports: FxHashMap<String, ExportTarget>,
    /// `export * from` specifiers in source order.
    pub star_exports: Vec<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct AliasDef {
    pub target: TypeExpr,
    pub scope: Scope,
}

#[derive(Debug, Default)]
pub(crate) struct SymbolTables {
    pub units: Vec<UnitTable>,
    pub unit_by_file: FxHashMap<String, usize>,
    /// Members of each namespace declaration.
    pub members: FxHashMap<DeclId, FxHashMap<String, SymbolId>>,
    /// Symbol naming a namespace, to its (first) declaration.
    pub namespaces: FxHashMap<SymbolId, DeclId>,
    /// `declare module "name" {}` blocks.
    pub ambient_modules: FxHashMap<String, DeclId>,
    pub aliases: FxHashMap<SymbolId, AliasDef>,
    pub type_params: FxHashSet<SymbolId>,
}
