//! Lowering of OXC syntax into the owned program model.
//!
//! Every declaration gets a node in the declaration tree and a symbol in the
//! table of its container. Type annotations become [`TypeNode`]s whose
//! checked types are bound later, once every unit has been lowered and
//! imports can be followed.

use oxc_ast::ast::{
    BindingPatternKind, Class, ClassBody, ClassElement, Declaration as AstDeclaration,
    ExportAllDeclaration, ExportDefaultDeclaration, ExportDefaultDeclarationKind,
    ExportNamedDeclaration, Expression, Function, ImportDeclaration, ImportDeclarationSpecifier,
    MethodDefinition, MethodDefinitionKind, ModuleExportName, Program as AstProgram,
    PropertyDefinition, PropertyKey, Statement as AstStatement, TSAccessibility,
    TSClassImplements, TSEnumDeclaration, TSEnumMemberName, TSInterfaceBody,
    TSInterfaceDeclaration, TSInterfaceHeritage, TSLiteral, TSMethodSignatureKind,
    TSModuleDeclaration, TSModuleDeclarationBody, TSModuleDeclarationKind,
    TSModuleDeclarationName, TSSignature, TSType, TSTypeAliasDeclaration,
    TSTypeOperatorOperator, TSTypeParameterDeclaration, TSTypeParameterInstantiation,
    UnaryOperator, VariableDeclaration, VariableDeclarationKind,
};
use oxc_ast_visit::Visit;
use oxc_span::{GetSpan, Span};
use rustc_hash::{FxHashMap, FxHashSet};
use tsdoc::ProgramBuilder;
use tsdoc::program::{
    ClassLike, ClassMember, DeclId, Declaration, DeclarationKind, EnumDecl, ExportDecl,
    ExportElement, FunctionDecl, HeritageClause, Initializer, InitializerKind, Keyword,
    MethodDecl, ModifierFlags, ModuleSpecifier, NodeId, PropertyDecl, Statement, Symbol,
    SymbolId, TypeFlags, TypeNode, TypeNodeKind, VariableDeclarator, VariableStatement,
};

use crate::scope::{
    AliasDef, ExportTarget, ImportBinding, ImportKind, Scope, SymbolTables, TypeExpr, UnitTable,
};

/// Name given to `export default` declarations without one.
const DEFAULT_NAME: &str = "default";

/// A node whose checked type is bound after lowering.
#[derive(Debug)]
pub(crate) struct Pending {
    pub node: NodeId,
    pub expr: TypeExpr,
    pub scope: Scope,
}

/// Where a statement sits.
#[derive(Debug, Clone)]
struct Ctx {
    container: DeclId,
    scope: Scope,
    ambient: bool,
    /// Directly in the unit, not inside a namespace.
    top_level: bool,
}

/// Lowers one parsed unit.
pub(crate) struct Lowerer<'b, 's> {
    builder: &'b mut ProgramBuilder,
    tables: &'b mut SymbolTables,
    pending: &'b mut Vec<Pending>,
    source: &'s str,
    unit: usize,
    unit_scope: DeclId,
    declaration_file: bool,
    /// Overload signatures share a name; only the first is kept.
    seen_functions: FxHashSet<(DeclId, String)>,
}

impl<'b, 's> Lowerer<'b, 's> {
    pub fn new(
        builder: &'b mut ProgramBuilder,
        tables: &'b mut SymbolTables,
        pending: &'b mut Vec<Pending>,
        source: &'s str,
        unit: usize,
        unit_scope: DeclId,
        declaration_file: bool,
    ) -> Self {
        Self {
            builder,
            tables,
            pending,
            source,
            unit,
            unit_scope,
            declaration_file,
            seen_functions: FxHashSet::default(),
        }
    }

    /// Top-level statements of the unit, in source order.
    pub fn lower_program(&mut self, program: &AstProgram<'_>) -> Vec<Statement> {
        let ctx = Ctx {
            container: self.unit_scope,
            scope: Scope::unit(self.unit),
            ambient: self.declaration_file,
            top_level: true,
        };
        program
            .body
            .iter()
            .map(|stmt| self.lower_statement(stmt, &ctx))
            .collect()
    }

    fn lower_statement(&mut self, stmt: &AstStatement<'_>, ctx: &Ctx) -> Statement {
        let none = ModifierFlags::empty();
        match stmt {
            AstStatement::ImportDeclaration(import) => {
                if ctx.top_level {
                    self.record_import(import);
                }
                Statement::Other
            }
            AstStatement::ExportNamedDeclaration(export) => self.lower_named_export(export, ctx),
            AstStatement::ExportDefaultDeclaration(export) => {
                self.lower_default_export(export, ctx)
            }
            AstStatement::ExportAllDeclaration(export) => self.lower_export_all(export, ctx),
            AstStatement::ClassDeclaration(class) => self.lower_class(class, none, ctx),
            AstStatement::TSInterfaceDeclaration(iface) => self.lower_interface(iface, none, ctx),
            AstStatement::FunctionDeclaration(func) => self.lower_function(func, none, ctx),
            AstStatement::VariableDeclaration(var) => self.lower_variables(var, none, ctx),
            AstStatement::TSEnumDeclaration(decl) => self.lower_enum(decl, none, ctx),
            AstStatement::TSTypeAliasDeclaration(alias) => {
                self.lower_alias(alias, none, ctx);
                Statement::Other
            }
            AstStatement::TSModuleDeclaration(module) => {
                self.lower_namespace(module, none, ctx, false);
                Statement::Other
            }
            _ => Statement::Other,
        }
    }

    fn lower_declaration(
        &mut self,
        decl: &AstDeclaration<'_>,
        flags: ModifierFlags,
        ctx: &Ctx,
    ) -> Statement {
        match decl {
            AstDeclaration::ClassDeclaration(class) => self.lower_class(class, flags, ctx),
            AstDeclaration::TSInterfaceDeclaration(iface) => self.lower_interface(iface, flags, ctx),
            AstDeclaration::FunctionDeclaration(func) => self.lower_function(func, flags, ctx),
            AstDeclaration::VariableDeclaration(var) => self.lower_variables(var, flags, ctx),
            AstDeclaration::TSEnumDeclaration(decl) => self.lower_enum(decl, flags, ctx),
            AstDeclaration::TSTypeAliasDeclaration(alias) => {
                self.lower_alias(alias, flags, ctx);
                Statement::Other
            }
            AstDeclaration::TSModuleDeclaration(module) => {
                self.lower_namespace(module, flags, ctx, false);
                Statement::Other
            }
            _ => Statement::Other,
        }
    }

    // ---- exports and imports ----

    fn lower_named_export(&mut self, export: &ExportNamedDeclaration<'_>, ctx: &Ctx) -> Statement {
        if let Some(decl) = &export.declaration {
            return self.lower_declaration(decl, ModifierFlags::EXPORT, ctx);
        }
        if !ctx.top_level {
            return Statement::Other;
        }

        let specifier = export.source.as_ref().map(|source| source.value.to_string());
        let mut elements = Vec::with_capacity(export.specifiers.len());
        for spec in &export.specifiers {
            let local = export_name(&spec.local);
            let exported = export_name(&spec.exported);
            let target = match &specifier {
                Some(specifier) => ExportTarget::From {
                    specifier: specifier.clone(),
                    name: local.clone(),
                },
                None => ExportTarget::Local(local.clone()),
            };
            self.unit_table().exports.insert(exported.clone(), target);
            elements.push(ExportElement::Specifier {
                property_name: (local != exported).then_some(local),
                name: exported,
            });
        }

        Statement::Export(ExportDecl {
            node: self.builder.node_id(),
            text: self.slice(export.span).to_string(),
            module_specifier: specifier.map(ModuleSpecifier::String),
            elements: Some(elements),
        })
    }

    fn lower_default_export(
        &mut self,
        export: &ExportDefaultDeclaration<'_>,
        ctx: &Ctx,
    ) -> Statement {
        let flags = ModifierFlags::EXPORT | ModifierFlags::DEFAULT;
        match &export.declaration {
            ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                self.lower_class(class, flags, ctx)
            }
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                self.lower_function(func, flags, ctx)
            }
            ExportDefaultDeclarationKind::TSInterfaceDeclaration(iface) => {
                self.lower_interface(iface, flags, ctx)
            }
            ExportDefaultDeclarationKind::Identifier(ident) => {
                if ctx.top_level {
                    self.unit_table().exports.insert(
                        DEFAULT_NAME.to_string(),
                        ExportTarget::Local(ident.name.to_string()),
                    );
                }
                Statement::Other
            }
            _ => Statement::Other,
        }
    }

    fn lower_export_all(&mut self, export: &ExportAllDeclaration<'_>, ctx: &Ctx) -> Statement {
        if !ctx.top_level {
            return Statement::Other;
        }
        let specifier = export.source.value.to_string();
        let elements = match &export.exported {
            None => {
                self.unit_table().star_exports.push(specifier.clone());
                None
            }
            Some(name) => {
                let name = export_name(name);
                self.unit_table().exports.insert(
                    name.clone(),
                    ExportTarget::From {
                        specifier: specifier.clone(),
                        name: "*".to_string(),
                    },
                );
                Some(vec![ExportElement::Other {
                    text: format!("* as {name}"),
                }])
            }
        };

        Statement::Export(ExportDecl {
            node: self.builder.node_id(),
            text: self.slice(export.span).to_string(),
            module_specifier: Some(ModuleSpecifier::String(specifier)),
            elements,
        })
    }

    fn record_import(&mut self, import: &ImportDeclaration<'_>) {
        let specifier = import.source.value.to_string();
        let Some(specifiers) = &import.specifiers else {
            return;
        };
        for spec in specifiers {
            let (local, kind) = match spec {
                ImportDeclarationSpecifier::ImportSpecifier(s) => (
                    s.local.name.to_string(),
                    ImportKind::Named(export_name(&s.imported)),
                ),
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                    (s.local.name.to_string(), ImportKind::Default)
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                    (s.local.name.to_string(), ImportKind::Namespace)
                }
            };
            self.unit_table().imports.insert(
                local,
                ImportBinding {
                    specifier: specifier.clone(),
                    kind,
                },
            );
        }
    }

    // ---- declarations ----

    fn lower_class(&mut self, class: &Class<'_>, flags: ModifierFlags, ctx: &Ctx) -> Statement {
        let mut modifiers = self.modifiers(flags, class.declare, ctx);
        modifiers.set(ModifierFlags::ABSTRACT, class.r#abstract);
        let name = class.id.as_ref().map(|id| id.name.to_string());
        let local = name.clone().unwrap_or_else(|| DEFAULT_NAME.to_string());
        let (decl, _) = self.declare(&local, DeclarationKind::Class, modifiers, true, ctx);

        let mut scope = ctx.scope.clone();
        self.bind_type_params(class.type_parameters.as_deref(), decl, &mut scope);

        let mut heritage_clauses = Vec::new();
        if let Some(super_class) = &class.super_class {
            let arguments = class.super_type_arguments.as_deref();
            let end = arguments.map_or(super_class.span().end, |args| args.span.end);
            let text = Span::new(super_class.span().start, end);
            let node = self.heritage_node(text, super_class.span(), arguments, &scope);
            heritage_clauses.push(HeritageClause { types: vec![node] });
        }
        let implements = self.collect_heritage(&scope, |collector| collector.visit_class(class));
        if !implements.is_empty() {
            heritage_clauses.push(HeritageClause { types: implements });
        }

        let mut members = Vec::with_capacity(class.body.body.len());
        let mut seen_methods = FxHashSet::default();
        for element in &class.body.body {
            let member = match element {
                ClassElement::PropertyDefinition(prop) => self.lower_class_property(prop, &scope),
                ClassElement::MethodDefinition(method) => {
                    lower_class_method(self.builder, method, &mut seen_methods)
                }
                _ => ClassMember::Other,
            };
            members.push(member);
        }

        Statement::Class(ClassLike {
            node: self.builder.node_id(),
            name,
            is_interface: false,
            modifiers,
            heritage_clauses,
            members,
        })
    }

    fn lower_class_property(&mut self, prop: &PropertyDefinition<'_>, scope: &Scope) -> ClassMember {
        let Some(name) = property_key_name(&prop.key) else {
            return ClassMember::Other;
        };
        let mut modifiers = member_visibility(&prop.key, prop.accessibility);
        modifiers.set(ModifierFlags::READONLY, prop.readonly);
        modifiers.set(ModifierFlags::STATIC, prop.r#static);
        let annotation = prop.type_annotation.as_deref().map(|a| &a.type_annotation);
        ClassMember::Property(self.property(
            name,
            modifiers,
            false,
            prop.optional,
            annotation,
            prop.value.as_ref(),
            scope,
        ))
    }

    fn lower_interface(
        &mut self,
        iface: &TSInterfaceDeclaration<'_>,
        flags: ModifierFlags,
        ctx: &Ctx,
    ) -> Statement {
        let modifiers = self.modifiers(flags, iface.declare, ctx);
        let name = iface.id.name.to_string();
        let (decl, _) = self.declare(&name, DeclarationKind::Interface, modifiers, false, ctx);

        let mut scope = ctx.scope.clone();
        self.bind_type_params(iface.type_parameters.as_deref(), decl, &mut scope);

        let extends = self.collect_heritage(&scope, |collector| {
            collector.visit_ts_interface_declaration(iface)
        });
        let heritage_clauses = if extends.is_empty() {
            Vec::new()
        } else {
            vec![HeritageClause { types: extends }]
        };

        let mut members = Vec::with_capacity(iface.body.body.len());
        let mut seen_methods = FxHashSet::default();
        for signature in &iface.body.body {
            let member = match signature {
                TSSignature::TSPropertySignature(sig) => match property_key_name(&sig.key) {
                    Some(name) => {
                        let mut modifiers = ModifierFlags::empty();
                        modifiers.set(ModifierFlags::READONLY, sig.readonly);
                        let annotation = sig.type_annotation.as_deref().map(|a| &a.type_annotation);
                        ClassMember::Property(self.property(
                            name,
                            modifiers,
                            true,
                            sig.optional,
                            annotation,
                            None,
                            &scope,
                        ))
                    }
                    None => ClassMember::Other,
                },
                TSSignature::TSMethodSignature(sig)
                    if matches!(sig.kind, TSMethodSignatureKind::Method) =>
                {
                    match property_key_name(&sig.key) {
                        Some(name) if seen_methods.insert(name.clone()) => {
                            ClassMember::Method(MethodDecl {
                                node: self.builder.node_id(),
                                name,
                                modifiers: ModifierFlags::empty(),
                            })
                        }
                        _ => ClassMember::Other,
                    }
                }
                _ => ClassMember::Other,
            };
            members.push(member);
        }

        Statement::Class(ClassLike {
            node: self.builder.node_id(),
            name: Some(name),
            is_interface: true,
            modifiers,
            heritage_clauses,
            members,
        })
    }

    fn lower_function(&mut self, func: &Function<'_>, flags: ModifierFlags, ctx: &Ctx) -> Statement {
        let modifiers = self.modifiers(flags, func.declare, ctx);
        let name = func.id.as_ref().map(|id| id.name.to_string());
        let local = name.clone().unwrap_or_else(|| DEFAULT_NAME.to_string());
        if !self.seen_functions.insert((ctx.container, local.clone())) {
            return Statement::Other;
        }
        self.declare(&local, DeclarationKind::Function, modifiers, true, ctx);
        Statement::Function(FunctionDecl {
            node: self.builder.node_id(),
            name,
            modifiers,
        })
    }

    fn lower_variables(
        &mut self,
        var: &VariableDeclaration<'_>,
        flags: ModifierFlags,
        ctx: &Ctx,
    ) -> Statement {
        let modifiers = self.modifiers(flags, var.declare, ctx);
        let is_const = matches!(var.kind, VariableDeclarationKind::Const);

        let mut declarations = Vec::with_capacity(var.declarations.len());
        for declarator in &var.declarations {
            let name = match &declarator.id.kind {
                BindingPatternKind::BindingIdentifier(ident) => Some(ident.name.to_string()),
                _ => None,
            };
            if let Some(name) = &name {
                self.declare(name, DeclarationKind::Variable, modifiers, true, ctx);
            }

            let node = self.builder.node_id();
            let annotation = declarator
                .id
                .type_annotation
                .as_deref()
                .map(|a| &a.type_annotation);
            let type_node = annotation.map(|ty| self.type_node(ty, &ctx.scope));
            let expr = match annotation {
                Some(ty) => self.type_expr(ty),
                None => declarator
                    .init
                    .as_ref()
                    .map_or(TypeExpr::Any, |init| self.infer(init, is_const)),
            };
            self.pending.push(Pending {
                node,
                expr,
                scope: ctx.scope.clone(),
            });
            declarations.push(VariableDeclarator {
                node,
                name,
                type_node,
            });
        }

        Statement::Variable(VariableStatement {
            node: self.builder.node_id(),
            modifiers,
            is_const,
            declarations,
        })
    }

    fn lower_enum(
        &mut self,
        decl: &TSEnumDeclaration<'_>,
        flags: ModifierFlags,
        ctx: &Ctx,
    ) -> Statement {
        let modifiers = self.modifiers(flags, decl.declare, ctx);
        let name = decl.id.name.to_string();
        self.declare(&name, DeclarationKind::Enum, modifiers, true, ctx);

        let members = decl
            .body
            .members
            .iter()
            .filter_map(|member| match &member.id {
                TSEnumMemberName::Identifier(ident) => Some(ident.name.to_string()),
                TSEnumMemberName::String(lit) => Some(lit.value.to_string()),
                _ => None,
            })
            .collect();

        Statement::Enum(EnumDecl {
            node: self.builder.node_id(),
            name,
            modifiers,
            members,
        })
    }

    fn lower_alias(&mut self, alias: &TSTypeAliasDeclaration<'_>, flags: ModifierFlags, ctx: &Ctx) {
        let modifiers = self.modifiers(flags, alias.declare, ctx);
        let name = alias.id.name.to_string();
        let (decl, symbol) = self.declare(&name, DeclarationKind::TypeAlias, modifiers, false, ctx);
        let mut scope = ctx.scope.clone();
        self.bind_type_params(alias.type_parameters.as_deref(), decl, &mut scope);
        let target = self.type_expr(&alias.type_annotation);
        self.tables.aliases.insert(symbol, AliasDef { target, scope });
    }

    /// Namespaces only feed the declaration tree and symbol tables.
    fn lower_namespace(
        &mut self,
        module: &TSModuleDeclaration<'_>,
        flags: ModifierFlags,
        ctx: &Ctx,
        is_nested: bool,
    ) {
        let modifiers = self.modifiers(flags, module.declare, ctx);
        let name = module.id.name().to_string();
        let kind = DeclarationKind::Namespace {
            name: name.clone(),
            is_namespace: matches!(module.kind, TSModuleDeclarationKind::Namespace),
            is_nested,
        };

        let decl = if matches!(module.id, TSModuleDeclarationName::StringLiteral(_)) {
            let container = ctx.container;
            *self
                .tables
                .ambient_modules
                .entry(name)
                .or_insert_with(|| {
                    self.builder
                        .add_declaration(Declaration::new(kind, Some(container), modifiers))
                })
        } else {
            let symbol = self.table_for(ctx).get(&name).copied();
            let existing = symbol.and_then(|symbol| self.tables.namespaces.get(&symbol).copied());
            match existing {
                Some(decl) => decl,
                None => {
                    let (decl, symbol) = self.declare(&name, kind, modifiers, false, ctx);
                    self.tables.namespaces.insert(symbol, decl);
                    decl
                }
            }
        };

        let mut scope = ctx.scope.clone();
        scope.namespaces.push(decl);
        let inner = Ctx {
            container: decl,
            scope,
            ambient: modifiers.contains(ModifierFlags::AMBIENT),
            top_level: false,
        };
        match &module.body {
            Some(TSModuleDeclarationBody::TSModuleBlock(block)) => {
                for stmt in &block.body {
                    self.lower_statement(stmt, &inner);
                }
            }
            Some(TSModuleDeclarationBody::TSModuleDeclaration(nested)) => {
                self.lower_namespace(nested, ModifierFlags::EXPORT, &inner, true);
            }
            None => {}
        }
    }

    // ---- symbols ----

    fn modifiers(&self, flags: ModifierFlags, declare: bool, ctx: &Ctx) -> ModifierFlags {
        let mut modifiers = flags;
        modifiers.set(ModifierFlags::AMBIENT, declare || ctx.ambient);
        modifiers
    }

    fn unit_table(&mut self) -> &mut UnitTable {
        &mut self.tables.units[self.unit]
    }

    fn table_for(&mut self, ctx: &Ctx) -> &mut FxHashMap<String, SymbolId> {
        if ctx.top_level {
            &mut self.tables.units[self.unit].locals
        } else {
            self.tables.members.entry(ctx.container).or_default()
        }
    }

    /// Add a declaration under the context's container, merging with an
    /// existing symbol of the same name.
    fn declare(
        &mut self,
        name: &str,
        kind: DeclarationKind,
        modifiers: ModifierFlags,
        is_value: bool,
        ctx: &Ctx,
    ) -> (DeclId, SymbolId) {
        let decl = self
            .builder
            .add_declaration(Declaration::new(kind, Some(ctx.container), modifiers));

        let symbol = match self.table_for(ctx).get(name).copied() {
            Some(symbol) => {
                if let Some(existing) = self.builder.symbol_mut(symbol) {
                    existing.declarations.push(decl);
                }
                symbol
            }
            None => {
                let symbol = self.builder.add_symbol(Symbol::new(name, Some(decl)));
                self.table_for(ctx).insert(name.to_string(), symbol);
                symbol
            }
        };
        if is_value {
            if let Some(existing) = self.builder.symbol_mut(symbol) {
                existing.value_declaration.get_or_insert(decl);
            }
        }

        if ctx.top_level && modifiers.contains(ModifierFlags::EXPORT) {
            let exported = if modifiers.contains(ModifierFlags::DEFAULT) {
                DEFAULT_NAME
            } else {
                name
            };
            self.unit_table()
                .exports
                .insert(exported.to_string(), ExportTarget::Local(name.to_string()));
        }
        (decl, symbol)
    }

    fn bind_type_params(
        &mut self,
        params: Option<&TSTypeParameterDeclaration<'_>>,
        owner: DeclId,
        scope: &mut Scope,
    ) {
        let Some(params) = params else {
            return;
        };
        for param in &params.params {
            let decl = self.builder.add_declaration(Declaration::new(
                DeclarationKind::TypeParameter,
                Some(owner),
                ModifierFlags::empty(),
            ));
            let name = param.name.name.to_string();
            let symbol = self.builder.add_symbol(Symbol::new(name.clone(), Some(decl)));
            self.tables.type_params.insert(symbol);
            scope.type_params.push((name, symbol));
        }
    }

    // ---- types ----

    #[allow(clippy::too_many_arguments)]
    fn property(
        &mut self,
        name: String,
        modifiers: ModifierFlags,
        is_signature: bool,
        has_question_token: bool,
        annotation: Option<&TSType<'_>>,
        value: Option<&Expression<'_>>,
        scope: &Scope,
    ) -> PropertyDecl {
        let node = self.builder.node_id();
        let type_node = annotation.map(|ty| self.type_node(ty, scope));
        let expr = match annotation {
            Some(ty) => self.type_expr(ty),
            None => value.map_or(TypeExpr::Any, |value| self.infer(value, false)),
        };
        self.pending.push(Pending {
            node,
            expr,
            scope: scope.clone(),
        });

        let initializer = value.map(|value| Initializer {
            text: self.slice(value.span()).to_string(),
            kind: initializer_kind(value),
        });

        PropertyDecl {
            node,
            name,
            modifiers,
            is_signature,
            has_question_token,
            type_node,
            initializer,
        }
    }

    fn collect_heritage(
        &mut self,
        scope: &Scope,
        visit: impl FnOnce(&mut HeritageCollector<'_, 'b, 's>),
    ) -> Vec<TypeNode> {
        let mut collector = HeritageCollector {
            lowerer: self,
            scope,
            types: Vec::new(),
        };
        visit(&mut collector);
        collector.types
    }

    fn heritage_node(
        &mut self,
        text: Span,
        name: Span,
        arguments: Option<&TSTypeParameterInstantiation<'_>>,
        scope: &Scope,
    ) -> TypeNode {
        let args = arguments
            .map(|args| args.params.iter().map(|ty| self.type_expr(ty)).collect())
            .unwrap_or_default();
        let expr = TypeExpr::Reference {
            name: self.slice(name).to_string(),
            args,
        };
        let text = self.slice(text).to_string();
        self.typed_node(text, TypeNodeKind::Reference, expr, scope)
    }

    fn typed_node(&mut self, text: String, kind: TypeNodeKind, expr: TypeExpr, scope: &Scope) -> TypeNode {
        let id = self.builder.node_id();
        self.pending.push(Pending {
            node: id,
            expr,
            scope: scope.clone(),
        });
        TypeNode { id, text, kind }
    }

    fn type_node(&mut self, ty: &TSType<'_>, scope: &Scope) -> TypeNode {
        let ty = unparenthesize(ty);
        let kind = match ty {
            TSType::TSFunctionType(_) | TSType::TSConstructorType(_) => TypeNodeKind::Function,
            TSType::TSTypeLiteral(_) => TypeNodeKind::TypeLiteral,
            TSType::TSTypeReference(_) => TypeNodeKind::Reference,
            TSType::TSLiteralType(lit) => TypeNodeKind::Literal(self.literal_text(&lit.literal)),
            TSType::TSUnionType(union) => {
                let mut members = Vec::with_capacity(union.types.len());
                for member in &union.types {
                    members.push(self.type_node(member, scope));
                }
                TypeNodeKind::Union(members)
            }
            _ => keyword(ty).map_or(TypeNodeKind::Other, TypeNodeKind::Keyword),
        };
        let expr = self.type_expr(ty);
        let text = self.slice(ty.span()).to_string();
        self.typed_node(text, kind, expr, scope)
    }

    fn type_expr(&self, ty: &TSType<'_>) -> TypeExpr {
        if let Some(keyword) = keyword(ty) {
            return TypeExpr::Keyword(keyword);
        }
        match ty {
            TSType::TSParenthesizedType(inner) => self.type_expr(&inner.type_annotation),
            TSType::TSTypeReference(reference) => TypeExpr::Reference {
                name: self.slice(reference.type_name.span()).to_string(),
                args: reference
                    .type_arguments
                    .as_deref()
                    .map(|args| args.params.iter().map(|ty| self.type_expr(ty)).collect())
                    .unwrap_or_default(),
            },
            TSType::TSArrayType(array) => {
                TypeExpr::Array(Box::new(self.type_expr(&array.element_type)))
            }
            TSType::TSUnionType(union) => {
                TypeExpr::Union(union.types.iter().map(|ty| self.type_expr(ty)).collect())
            }
            TSType::TSIntersectionType(intersection) => TypeExpr::Intersection(
                intersection.types.iter().map(|ty| self.type_expr(ty)).collect(),
            ),
            TSType::TSFunctionType(_) | TSType::TSConstructorType(_) => TypeExpr::Function,
            TSType::TSTypeLiteral(_) => TypeExpr::Object,
            TSType::TSLiteralType(lit) => self.literal_expr(&lit.literal),
            TSType::TSTemplateLiteralType(_) => TypeExpr::Keyword(Keyword::String),
            TSType::TSTypePredicate(_) => TypeExpr::Keyword(Keyword::Boolean),
            TSType::TSTypeOperatorType(op)
                if matches!(op.operator, TSTypeOperatorOperator::Readonly) =>
            {
                self.type_expr(&op.type_annotation)
            }
            _ => TypeExpr::Any,
        }
    }

    fn literal_text(&self, literal: &TSLiteral<'_>) -> String {
        match literal {
            TSLiteral::StringLiteral(lit) => lit.value.to_string(),
            TSLiteral::TemplateLiteral(lit) => self.slice(lit.span).trim_matches('`').to_string(),
            other => self.slice(other.span()).to_string(),
        }
    }

    fn literal_expr(&self, literal: &TSLiteral<'_>) -> TypeExpr {
        let flags = match literal {
            TSLiteral::StringLiteral(_) | TSLiteral::TemplateLiteral(_) => TypeFlags::STRING_LITERAL,
            TSLiteral::BooleanLiteral(_) => TypeFlags::BOOLEAN_LITERAL,
            TSLiteral::BigIntLiteral(_) => return TypeExpr::Keyword(Keyword::BigInt),
            _ => TypeFlags::NUMBER_LITERAL,
        };
        TypeExpr::Literal {
            flags,
            text: self.literal_text(literal),
        }
    }

    /// Type of an un-annotated initializer. `const` keeps literal types.
    fn infer(&self, expr: &Expression<'_>, is_const: bool) -> TypeExpr {
        let literal = |flags: TypeFlags, text: String, widened: Keyword| {
            if is_const {
                TypeExpr::Literal { flags, text }
            } else {
                TypeExpr::Keyword(widened)
            }
        };
        match expr {
            Expression::StringLiteral(lit) => {
                literal(TypeFlags::STRING_LITERAL, lit.value.to_string(), Keyword::String)
            }
            Expression::NumericLiteral(lit) => literal(
                TypeFlags::NUMBER_LITERAL,
                self.slice(lit.span).to_string(),
                Keyword::Number,
            ),
            Expression::BooleanLiteral(lit) => literal(
                TypeFlags::BOOLEAN_LITERAL,
                self.slice(lit.span).to_string(),
                Keyword::Boolean,
            ),
            Expression::TemplateLiteral(_) => TypeExpr::Keyword(Keyword::String),
            Expression::BigIntLiteral(_) => TypeExpr::Keyword(Keyword::BigInt),
            Expression::ArrayExpression(array) => {
                let element = array
                    .elements
                    .iter()
                    .find_map(|element| element.as_expression())
                    .map_or(TypeExpr::Any, |element| self.infer(element, false));
                TypeExpr::Array(Box::new(element))
            }
            Expression::ObjectExpression(_) => TypeExpr::Object,
            Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_) => {
                TypeExpr::Function
            }
            Expression::NewExpression(new) => match &new.callee {
                Expression::Identifier(_) | Expression::StaticMemberExpression(_) => {
                    TypeExpr::Reference {
                        name: self.slice(new.callee.span()).to_string(),
                        args: Vec::new(),
                    }
                }
                _ => TypeExpr::Any,
            },
            Expression::UnaryExpression(unary) => match unary.operator {
                UnaryOperator::LogicalNot | UnaryOperator::Delete => {
                    TypeExpr::Keyword(Keyword::Boolean)
                }
                UnaryOperator::Typeof => TypeExpr::Keyword(Keyword::String),
                UnaryOperator::Void => TypeExpr::Keyword(Keyword::Undefined),
                _ => TypeExpr::Keyword(Keyword::Number),
            },
            Expression::ParenthesizedExpression(inner) => self.infer(&inner.expression, is_const),
            Expression::TSAsExpression(cast) => {
                if self.slice(cast.type_annotation.span()) == "const" {
                    self.infer(&cast.expression, true)
                } else {
                    self.type_expr(&cast.type_annotation)
                }
            }
            Expression::TSSatisfiesExpression(inner) => self.infer(&inner.expression, is_const),
            _ => TypeExpr::Any,
        }
    }

    fn slice(&self, span: Span) -> &'s str {
        self.source
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
    }
}

/// Gathers `implements` and interface `extends` entries without entering bodies.
struct HeritageCollector<'l, 'b, 's> {
    lowerer: &'l mut Lowerer<'b, 's>,
    scope: &'l Scope,
    types: Vec<TypeNode>,
}

impl<'a> Visit<'a> for HeritageCollector<'_, '_, '_> {
    fn visit_ts_class_implements(&mut self, it: &TSClassImplements<'a>) {
        let node = self.lowerer.heritage_node(
            it.span,
            it.expression.span(),
            it.type_arguments.as_deref(),
            self.scope,
        );
        self.types.push(node);
    }

    fn visit_ts_interface_heritage(&mut self, it: &TSInterfaceHeritage<'a>) {
        let node = self.lowerer.heritage_node(
            it.span,
            it.expression.span(),
            it.type_arguments.as_deref(),
            self.scope,
        );
        self.types.push(node);
    }

    fn visit_expression(&mut self, _it: &Expression<'a>) {}

    fn visit_class_body(&mut self, _it: &ClassBody<'a>) {}

    fn visit_ts_interface_body(&mut self, _it: &TSInterfaceBody<'a>) {}
}

fn lower_class_method(
    builder: &mut ProgramBuilder,
    method: &MethodDefinition<'_>,
    seen: &mut FxHashSet<String>,
) -> ClassMember {
    if !matches!(method.kind, MethodDefinitionKind::Method) {
        return ClassMember::Other;
    }
    let Some(name) = property_key_name(&method.key) else {
        return ClassMember::Other;
    };
    if !seen.insert(name.clone()) {
        return ClassMember::Other;
    }
    let mut modifiers = member_visibility(&method.key, method.accessibility);
    modifiers.set(ModifierFlags::STATIC, method.r#static);
    ClassMember::Method(MethodDecl {
        node: builder.node_id(),
        name,
        modifiers,
    })
}

fn member_visibility(key: &PropertyKey<'_>, accessibility: Option<TSAccessibility>) -> ModifierFlags {
    if matches!(key, PropertyKey::PrivateIdentifier(_)) {
        return ModifierFlags::PRIVATE;
    }
    match accessibility {
        Some(TSAccessibility::Private) => ModifierFlags::PRIVATE,
        Some(TSAccessibility::Protected) => ModifierFlags::PROTECTED,
        Some(TSAccessibility::Public) | None => ModifierFlags::empty(),
    }
}

/// Static name of a member key; computed keys have none.
fn property_key_name(key: &PropertyKey<'_>) -> Option<String> {
    match key {
        PropertyKey::StaticIdentifier(ident) => Some(ident.name.to_string()),
        PropertyKey::PrivateIdentifier(ident) => Some(format!("#{}", ident.name)),
        PropertyKey::StringLiteral(lit) => Some(lit.value.to_string()),
        PropertyKey::NumericLiteral(lit) => Some(lit.value.to_string()),
        _ => None,
    }
}

fn export_name(name: &ModuleExportName<'_>) -> String {
    match name {
        ModuleExportName::IdentifierName(ident) => ident.name.to_string(),
        ModuleExportName::IdentifierReference(ident) => ident.name.to_string(),
        ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
    }
}

fn initializer_kind(expr: &Expression<'_>) -> InitializerKind {
    match expr {
        Expression::NullLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::NumericLiteral(_)
        | Expression::StringLiteral(_)
        | Expression::BigIntLiteral(_)
        | Expression::ArrayExpression(_)
        | Expression::ObjectExpression(_)
        | Expression::UnaryExpression(_)
        | Expression::Identifier(_) => InitializerKind::Literal,
        _ => InitializerKind::Expression,
    }
}

fn unparenthesize<'t, 'a>(mut ty: &'t TSType<'a>) -> &'t TSType<'a> {
    while let TSType::TSParenthesizedType(inner) = ty {
        ty = &inner.type_annotation;
    }
    ty
}

fn keyword(ty: &TSType<'_>) -> Option<Keyword> {
    let keyword = match ty {
        TSType::TSNumberKeyword(_) => Keyword::Number,
        TSType::TSStringKeyword(_) => Keyword::String,
        TSType::TSBooleanKeyword(_) => Keyword::Boolean,
        TSType::TSNullKeyword(_) => Keyword::Null,
        TSType::TSUndefinedKeyword(_) => Keyword::Undefined,
        TSType::TSAnyKeyword(_) => Keyword::Any,
        TSType::TSUnknownKeyword(_) => Keyword::Unknown,
        TSType::TSVoidKeyword(_) => Keyword::Void,
        TSType::TSNeverKeyword(_) => Keyword::Never,
        TSType::TSObjectKeyword(_) => Keyword::Object,
        TSType::TSSymbolKeyword(_) => Keyword::Symbol,
        TSType::TSBigIntKeyword(_) => Keyword::BigInt,
        _ => return None,
    };
    Some(keyword)
}
