//! Walks source units and builds the per-module documentation model.

use std::borrow::Cow;
use std::cmp::Ordering;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{DocsError, Result};
use crate::evaluator::{self, Constant};
use crate::model::{
    ClassDescriptor, DefaultValue, EnumDescriptor, EnumMemberDescriptor, MemberDescriptor,
    MethodDescriptor, PropertyDescriptor, SourceUnitModel, TypeRef, VariableDescriptor,
};
use crate::module_path::{ModuleInfo, ModuleNaming, specifier_candidates};
use crate::program::{
    ClassLike, ClassMember, EnumDecl, ExportDecl, ExportElement, FunctionDecl, InitializerKind,
    MethodDecl, ModifierFlags, ModuleSpecifier, PropertyDecl, SourceUnit, Statement, TypeFlags,
    TypedProgram, VariableStatement,
};
use crate::resolver::TypeResolver;

/// Origin module id to the names the main module re-exports from it.
pub type ReexportMap = IndexMap<String, Vec<String>>;

/// Name given to `export default` declarations without one.
const DEFAULT_EXPORT_NAME: &str = "default";
const PROTECTED_TAG: &str = "@protected";

/// Output of one extraction run.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Per module id, in first-seen order.
    pub models: IndexMap<String, SourceUnitModel>,
    /// Re-exports found in the main unit.
    pub reexports: ReexportMap,
    pub main_module: String,
}

/// Extraction session over a typed program.
pub struct Generator<'a, P: TypedProgram + ?Sized> {
    program: &'a P,
    resolver: TypeResolver<'a, P>,
}

/// The unit currently being walked.
struct UnitScope<'u> {
    unit: &'u SourceUnit,
    info: ModuleInfo,
    /// `module:<id>`
    module_path: String,
}

impl<'a, P: TypedProgram + ?Sized> Generator<'a, P> {
    pub fn new(program: &'a P, naming: &'a ModuleNaming) -> Self {
        Self {
            program,
            resolver: TypeResolver::new(program, naming),
        }
    }

    /// Extract every non-declaration, non-empty unit. Units sharing a module id are merged.
    pub fn extract(&self) -> Result<Extraction> {
        let mut extraction = Extraction {
            main_module: self.resolver.modules().main_module_id(),
            ..Extraction::default()
        };

        for unit in self.program.source_units() {
            if unit.is_declaration_file || unit.is_empty {
                continue;
            }

            let info = self.resolver.modules().resolve(unit);
            debug!(module = %info.id, file = %unit.file_name, is_main = info.is_main, "extracting source unit");
            let scope = UnitScope {
                unit,
                module_path: format!("module:{}", info.id),
                info,
            };
            let model = self.extract_unit(&scope, &mut extraction.reexports)?;
            extraction
                .models
                .entry(scope.info.id)
                .or_default()
                .extend(model);
        }

        info!(
            modules = extraction.models.len(),
            reexported_modules = extraction.reexports.len(),
            "extraction finished"
        );
        Ok(extraction)
    }

    fn extract_unit(&self, scope: &UnitScope<'_>, reexports: &mut ReexportMap) -> Result<SourceUnitModel> {
        let mut model = SourceUnitModel::default();
        for statement in &scope.unit.statements {
            match statement {
                Statement::Class(class) => {
                    if let Some(descriptor) = self.describe_class(scope, class)? {
                        model.classes.push(descriptor);
                    }
                }
                Statement::Function(function) => {
                    if let Some(descriptor) = describe_function(function) {
                        model.functions.push(descriptor);
                    }
                }
                Statement::Variable(variable) => {
                    if let Some(descriptor) = self.describe_variable(variable)? {
                        model.members.push(MemberDescriptor::Variable(descriptor));
                    }
                }
                Statement::Enum(enumeration) => {
                    if let Some(descriptor) = describe_enum(scope, enumeration) {
                        model.members.push(MemberDescriptor::Enum(descriptor));
                    }
                }
                Statement::Export(export) if scope.info.is_main => {
                    self.record_reexport(scope, export, reexports);
                }
                Statement::Export(_) | Statement::Other => {}
            }
        }
        Ok(model)
    }

    fn describe_class(&self, scope: &UnitScope<'_>, class: &ClassLike) -> Result<Option<ClassDescriptor>> {
        if !class.modifiers.contains(ModifierFlags::EXPORT) {
            return Ok(None);
        }

        // Only the last heritage type is kept.
        let mut parents = Vec::new();
        for clause in &class.heritage_clauses {
            for heritage in &clause.types {
                parents = self.resolver.resolve_node(heritage)?;
            }
        }

        let mut methods = Vec::new();
        let mut properties = Vec::new();
        for member in &class.members {
            match member {
                ClassMember::Property(property) => {
                    if let Some(descriptor) = self.describe_property(property, !class.is_interface)? {
                        properties.push(descriptor);
                    }
                }
                ClassMember::Method(method) => {
                    if let Some(descriptor) = describe_method(method) {
                        methods.push(descriptor);
                    }
                }
                ClassMember::Other => {}
            }
        }
        methods.sort_by(method_order);

        Ok(Some(ClassDescriptor {
            module_path: scope.module_path.clone(),
            name: class
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_EXPORT_NAME.to_string()),
            methods,
            properties,
            parents,
            is_interface: class.is_interface,
            examples: Vec::new(),
        }))
    }

    fn describe_property(&self, property: &PropertyDecl, in_class: bool) -> Result<Option<PropertyDescriptor>> {
        if property.modifiers.contains(ModifierFlags::PRIVATE) {
            return Ok(None);
        }

        let types = match &property.type_node {
            Some(node) => self.resolver.resolve_node(node)?,
            None => {
                let ty = self.program.type_at(property.node).ok_or_else(|| {
                    DocsError::unresolved(&property.name, "property has no checked type")
                })?;
                self.resolver.resolve_type(ty, &property.name)?
            }
        };

        let default_value = property.initializer.as_ref().and_then(|initializer| {
            match initializer.kind {
                InitializerKind::Expression => Some(DefaultValue::Expression(initializer.text.clone())),
                InitializerKind::Literal => evaluate_default(&property.name, &initializer.text),
            }
        });

        let is_null = TypeRef::name("null");
        let is_optional = property.has_question_token
            || default_value.is_some()
            || types.contains(&is_null)
            || (in_class && property.modifiers.contains(ModifierFlags::READONLY));

        Ok(Some(PropertyDescriptor {
            name: property.name.clone(),
            types,
            is_optional,
            default_value,
        }))
    }

    fn describe_variable(&self, statement: &VariableStatement) -> Result<Option<VariableDescriptor>> {
        if !statement.modifiers.contains(ModifierFlags::EXPORT) {
            return Ok(None);
        }
        let [declaration] = statement.declarations.as_slice() else {
            return Ok(None);
        };
        let Some(name) = &declaration.name else {
            return Ok(None);
        };

        let checked = self.program.type_at(declaration.node);
        let types = match &declaration.type_node {
            Some(node) => {
                let named = checked.or_else(|| self.program.type_at(node.id)).filter(|ty| {
                    ty.symbol
                        .and_then(|id| self.program.symbol(id))
                        .is_some_and(|symbol| symbol.value_declaration.is_some())
                });
                match named {
                    Some(ty) => vec![TypeRef::Name(self.resolver.type_name_path(ty, &node.text)?)],
                    None => self.resolver.resolve_node(node)?,
                }
            }
            None => match checked {
                Some(ty) if !ty.flags.intersects(TypeFlags::ANY) => {
                    self.resolver.resolve_type(ty, name)?
                }
                _ => return Ok(None),
            },
        };

        Ok(Some(VariableDescriptor {
            types,
            name: name.clone(),
            is_const: statement.is_const,
        }))
    }

    fn record_reexport(&self, scope: &UnitScope<'_>, export: &ExportDecl, reexports: &mut ReexportMap) {
        let specifier = match &export.module_specifier {
            None => return,
            Some(ModuleSpecifier::Other(text)) => {
                warn!(export = %export.text, specifier = %text, "unsupported re-export module specifier");
                return;
            }
            Some(ModuleSpecifier::String(specifier)) => specifier,
        };
        if !specifier.starts_with('.') {
            return;
        }
        let Some(elements) = &export.elements else {
            warn!(export = %export.text, "wildcard re-export from main module is not flattened");
            return;
        };

        let Some(target) = self.resolve_relative_unit(scope.unit, specifier) else {
            warn!(export = %export.text, "cannot resolve re-exported module");
            return;
        };
        let origin = self.resolver.modules().resolve(target).id;

        let mut names = Vec::with_capacity(elements.len());
        for element in elements {
            match element {
                ExportElement::Specifier {
                    name,
                    property_name,
                } => names.push(property_name.clone().unwrap_or_else(|| name.clone())),
                ExportElement::Other { text } => {
                    warn!(element = %text, "unsupported export element");
                }
            }
        }
        debug!(origin = %origin, names = ?names, "recorded re-export");
        reexports.entry(origin).or_default().extend(names);
    }

    fn resolve_relative_unit(&self, unit: &SourceUnit, specifier: &str) -> Option<&'a SourceUnit> {
        specifier_candidates(&unit.file_name, specifier)
            .iter()
            .find_map(|file| self.program.unit_by_file_name(file))
    }
}

fn describe_function(function: &FunctionDecl) -> Option<MethodDescriptor> {
    if !function.modifiers.contains(ModifierFlags::EXPORT) {
        return None;
    }
    Some(MethodDescriptor::new(
        function.name.as_deref().unwrap_or(DEFAULT_EXPORT_NAME),
    ))
}

fn describe_method(method: &MethodDecl) -> Option<MethodDescriptor> {
    if method.modifiers.contains(ModifierFlags::PRIVATE) {
        return None;
    }
    let mut descriptor = MethodDescriptor::new(method.name.clone());
    if method.modifiers.contains(ModifierFlags::PROTECTED) {
        descriptor.is_protected = true;
        descriptor.tags.push(PROTECTED_TAG.to_string());
    }
    Some(descriptor)
}

fn describe_enum(scope: &UnitScope<'_>, enumeration: &EnumDecl) -> Option<EnumDescriptor> {
    if !enumeration.modifiers.contains(ModifierFlags::EXPORT) {
        return None;
    }
    let id = format!("{}.{}", scope.module_path, enumeration.name);
    let members = enumeration
        .members
        .iter()
        .map(|name| EnumMemberDescriptor {
            name: name.clone(),
            member_of: id.clone(),
            types: vec![TypeRef::name("number")],
        })
        .collect();
    Some(EnumDescriptor {
        id,
        name: enumeration.name.clone(),
        member_of: scope.module_path.clone(),
        types: vec![TypeRef::name("number")],
        members,
    })
}

fn evaluate_default(property: &str, text: &str) -> Option<DefaultValue> {
    match evaluator::evaluate(text) {
        Ok(Constant::Value(Value::Null)) => None,
        Ok(Constant::Value(Value::Object(_)) | Constant::Undefined) => {
            warn!(property, initializer = text, "unrecognized initializer value");
            None
        }
        Ok(Constant::Value(value)) => Some(DefaultValue::Literal(value)),
        Err(error) => {
            info!(property, %error, "cannot evaluate initializer, keeping source text");
            Some(DefaultValue::Expression(text.to_string()))
        }
    }
}

/// Strip a `get`/`set` prefix followed by a non-lowercase character,
/// lowercasing that character (`getFoo` -> `foo`).
pub fn trim_accessor_prefix(name: &str) -> Cow<'_, str> {
    if name.chars().count() > 4 && (name.starts_with("get") || name.starts_with("set")) {
        let rest = &name[3..];
        if let Some(first) = rest.chars().next() {
            if !first.is_lowercase() {
                let mut trimmed: String = first.to_lowercase().collect();
                trimmed.push_str(&rest[first.len_utf8()..]);
                return Cow::Owned(trimmed);
            }
        }
    }
    Cow::Borrowed(name)
}

/// Protected methods last; otherwise case-insensitive by accessor-trimmed name.
pub fn method_order(a: &MethodDescriptor, b: &MethodDescriptor) -> Ordering {
    a.is_protected
        .cmp(&b.is_protected)
        .then_with(|| compare_names(&trim_accessor_prefix(&a.name), &trim_accessor_prefix(&b.name)))
}

/// Case-insensitive order; on a tie lowercase sorts before uppercase.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| swap_case(a).cmp(&swap_case(b)))
}

fn swap_case(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                c.to_uppercase().next().unwrap_or(c)
            }
        })
        .collect()
}
