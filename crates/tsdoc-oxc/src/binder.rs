//! Binds lowered type expressions to checked types.
//!
//! Names resolve through type parameters, enclosing namespaces, the unit's
//! own declarations and its imports. Anything still unknown is treated as a
//! global from the runtime's declaration files and gets an ambient symbol.

use rustc_hash::FxHashMap;
use tracing::trace;
use tsdoc::ProgramBuilder;
use tsdoc::module_path::specifier_candidates;
use tsdoc::program::{
    DeclId, Declaration, DeclarationKind, Keyword, ModifierFlags, Symbol, SymbolId, Type,
    TypeFlags, TypeId,
};

use crate::lower::Pending;
use crate::scope::{ExportTarget, ImportBinding, ImportKind, Scope, SymbolTables, TypeExpr};

/// Re-export and alias chains longer than this are treated as unresolved.
const MAX_DEPTH: usize = 8;

/// What a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Symbol(SymbolId),
    /// A whole unit, through `import * as ns`.
    Unit(usize),
    /// A namespace or ambient module body.
    Container(DeclId),
}

pub(crate) struct Binder<'p, 't> {
    builder: &'p mut ProgramBuilder,
    tables: &'t SymbolTables,
    globals: FxHashMap<String, SymbolId>,
    keywords: FxHashMap<Keyword, TypeId>,
}

impl<'p, 't> Binder<'p, 't> {
    pub fn new(builder: &'p mut ProgramBuilder, tables: &'t SymbolTables) -> Self {
        Self {
            builder,
            tables,
            globals: FxHashMap::default(),
            keywords: FxHashMap::default(),
        }
    }

    /// Record the checked type of every pending node.
    pub fn bind_all(&mut self, pending: Vec<Pending>) {
        for Pending { node, expr, scope } in pending {
            let ty = self.bind(&expr, &scope, 0);
            self.builder.set_type_at(node, ty);
        }
    }

    fn bind(&mut self, expr: &TypeExpr, scope: &Scope, depth: usize) -> TypeId {
        match expr {
            TypeExpr::Keyword(keyword) => self.keyword(*keyword),
            TypeExpr::Literal { flags, text } => {
                self.builder.add_type(Type::literal(*flags, text.clone()))
            }
            TypeExpr::Any => self.keyword(Keyword::Any),
            TypeExpr::Array(element) => {
                let element = self.bind(element, scope, depth);
                let array = self.global("Array");
                self.builder.add_type(Type::object(array, vec![element]))
            }
            TypeExpr::Union(members) => {
                let types = members.iter().map(|m| self.bind(m, scope, depth)).collect();
                self.builder.add_type(Type::union(types))
            }
            TypeExpr::Intersection(members) => {
                let types = members.iter().map(|m| self.bind(m, scope, depth)).collect();
                self.builder.add_type(Type {
                    flags: TypeFlags::INTERSECTION,
                    types,
                    ..Type::default()
                })
            }
            TypeExpr::Function => {
                let function = self.global("Function");
                self.builder.add_type(Type::object(function, Vec::new()))
            }
            TypeExpr::Object => {
                let object = self.global("Object");
                self.builder.add_type(Type::object(object, Vec::new()))
            }
            TypeExpr::Reference { name, args } => self.bind_reference(name, args, scope, depth),
        }
    }

    fn bind_reference(
        &mut self,
        name: &str,
        args: &[TypeExpr],
        scope: &Scope,
        depth: usize,
    ) -> TypeId {
        let tables = self.tables;
        let symbol = self.resolve_name(name, scope);

        if let Some(symbol) = symbol {
            if tables.type_params.contains(&symbol) {
                return self.builder.add_type(Type {
                    flags: TypeFlags::TYPE_PARAMETER,
                    symbol: Some(symbol),
                    ..Type::default()
                });
            }
            if let Some(alias) = tables.aliases.get(&symbol) {
                let keeps_symbol = matches!(alias.target, TypeExpr::Object | TypeExpr::Function);
                if !keeps_symbol && depth < MAX_DEPTH {
                    return self.bind(&alias.target, &alias.scope, depth + 1);
                }
            }
        }

        let symbol = match symbol {
            Some(symbol) => symbol,
            None => {
                trace!(name, "unresolved type name bound to a global");
                self.global(name)
            }
        };
        let args = args.iter().map(|arg| self.bind(arg, scope, depth)).collect();
        self.builder.add_type(Type::object(symbol, args))
    }

    fn keyword(&mut self, keyword: Keyword) -> TypeId {
        if let Some(&id) = self.keywords.get(&keyword) {
            return id;
        }
        let flags = match keyword {
            Keyword::Number => TypeFlags::NUMBER,
            Keyword::String => TypeFlags::STRING,
            Keyword::Boolean => TypeFlags::BOOLEAN,
            Keyword::Null => TypeFlags::NULL,
            Keyword::Undefined => TypeFlags::UNDEFINED,
            Keyword::Any => TypeFlags::ANY,
            Keyword::Unknown => TypeFlags::UNKNOWN,
            Keyword::Void => TypeFlags::VOID,
            Keyword::Never => TypeFlags::NEVER,
            Keyword::Object => TypeFlags::NON_PRIMITIVE,
            Keyword::Symbol => TypeFlags::SYMBOL,
            Keyword::BigInt => TypeFlags::BIGINT,
        };
        let id = self.builder.add_type(Type::with_flags(flags));
        self.keywords.insert(keyword, id);
        id
    }

    /// Ambient symbol for a runtime global, created on first use.
    fn global(&mut self, name: &str) -> SymbolId {
        if let Some(&symbol) = self.globals.get(name) {
            return symbol;
        }
        let decl = self.builder.add_declaration(Declaration::new(
            DeclarationKind::Interface,
            None,
            ModifierFlags::AMBIENT,
        ));
        let symbol = self.builder.add_symbol(Symbol::new(name, Some(decl)));
        self.globals.insert(name.to_string(), symbol);
        symbol
    }

    // ---- name resolution ----

    fn resolve_name(&self, name: &str, scope: &Scope) -> Option<SymbolId> {
        let mut segments = name.split('.').map(str::trim);
        let first = segments.next()?;
        let rest: Vec<&str> = segments.collect();

        if rest.is_empty() {
            let param = scope.type_params.iter().rev().find(|(n, _)| n == first);
            if let Some((_, symbol)) = param {
                return Some(*symbol);
            }
        }

        let mut current = self.lookup_in_scope(first, scope)?;
        for segment in rest {
            current = self.member(current, segment)?;
        }
        match current {
            Binding::Symbol(symbol) => Some(symbol),
            Binding::Unit(_) | Binding::Container(_) => None,
        }
    }

    fn lookup_in_scope(&self, name: &str, scope: &Scope) -> Option<Binding> {
        let tables = self.tables;
        for namespace in scope.namespaces.iter().rev() {
            if let Some(&symbol) = tables.members.get(namespace).and_then(|m| m.get(name)) {
                return Some(Binding::Symbol(symbol));
            }
        }
        let unit = tables.units.get(scope.unit)?;
        if let Some(&symbol) = unit.locals.get(name) {
            return Some(Binding::Symbol(symbol));
        }
        let import = unit.imports.get(name)?;
        self.resolve_import(scope.unit, import, 0)
    }

    fn member(&self, binding: Binding, name: &str) -> Option<Binding> {
        let tables = self.tables;
        match binding {
            Binding::Symbol(symbol) => {
                let decl = tables.namespaces.get(&symbol)?;
                self.member(Binding::Container(*decl), name)
            }
            Binding::Container(decl) => tables
                .members
                .get(&decl)
                .and_then(|members| members.get(name))
                .map(|&symbol| Binding::Symbol(symbol)),
            Binding::Unit(unit) => self.export_lookup(unit, name, 0),
        }
    }

    fn resolve_import(&self, from: usize, import: &ImportBinding, depth: usize) -> Option<Binding> {
        if depth > MAX_DEPTH {
            return None;
        }
        let Some(target) = self.resolve_specifier(from, &import.specifier) else {
            let module = *self.tables.ambient_modules.get(&import.specifier)?;
            return match &import.kind {
                ImportKind::Named(name) => self.member(Binding::Container(module), name),
                ImportKind::Default => self.member(Binding::Container(module), "default"),
                ImportKind::Namespace => Some(Binding::Container(module)),
            };
        };
        match &import.kind {
            ImportKind::Named(name) => self.export_lookup(target, name, depth + 1),
            ImportKind::Default => self.export_lookup(target, "default", depth + 1),
            ImportKind::Namespace => Some(Binding::Unit(target)),
        }
    }

    fn export_lookup(&self, unit: usize, name: &str, depth: usize) -> Option<Binding> {
        if depth > MAX_DEPTH {
            return None;
        }
        let table = self.tables.units.get(unit)?;
        match table.exports.get(name) {
            Some(ExportTarget::Local(local)) => {
                if let Some(&symbol) = table.locals.get(local) {
                    return Some(Binding::Symbol(symbol));
                }
                let import = table.imports.get(local)?;
                self.resolve_import(unit, import, depth + 1)
            }
            Some(ExportTarget::From { specifier, name }) => {
                let target = self.resolve_specifier(unit, specifier)?;
                if name == "*" {
                    return Some(Binding::Unit(target));
                }
                self.export_lookup(target, name, depth + 1)
            }
            None => table.star_exports.iter().find_map(|specifier| {
                let target = self.resolve_specifier(unit, specifier)?;
                self.export_lookup(target, name, depth + 1)
            }),
        }
    }

    /// Unit index of a relative specifier seen from `from`.
    fn resolve_specifier(&self, from: usize, specifier: &str) -> Option<usize> {
        resolve_relative(self.tables, from, specifier)
    }
}

/// Resolve `./x`-style specifiers against the program's files.
pub(crate) fn resolve_relative(tables: &SymbolTables, from: usize, specifier: &str) -> Option<usize> {
    let file = &tables.units.get(from)?.file_name;
    specifier_candidates(file, specifier)
        .iter()
        .find_map(|candidate| tables.unit_by_file.get(candidate).copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::UnitTable;

    fn tables(files: &[&str]) -> SymbolTables {
        let mut tables = SymbolTables::default();
        for (index, file) in files.iter().enumerate() {
            tables.units.push(UnitTable {
                file_name: file.to_string(),
                ..UnitTable::default()
            });
            tables.unit_by_file.insert(file.to_string(), index);
        }
        tables
    }

    #[test]
    fn relative_specifiers_try_typescript_extensions() {
        let tables = tables(&[
            "/p/src/index.ts",
            "/p/src/util.ts",
            "/p/src/lib/index.ts",
            "/p/src/types.d.ts",
            "/p/src/widgets/index.tsx",
        ]);
        assert_eq!(resolve_relative(&tables, 0, "./util"), Some(1));
        assert_eq!(resolve_relative(&tables, 0, "./util.js"), Some(1));
        assert_eq!(resolve_relative(&tables, 0, "./lib"), Some(2));
        assert_eq!(resolve_relative(&tables, 2, "../types"), Some(3));
        assert_eq!(resolve_relative(&tables, 0, "./widgets"), Some(4));
        assert_eq!(resolve_relative(&tables, 0, "lodash"), None);
        assert_eq!(resolve_relative(&tables, 0, "./missing"), None);
    }
}
