//! Type expressions and checked types to [`TypeRef`] lists.
//!
//! A union is documented as "any of these alternatives", so every resolution
//! returns a flat list. Generic instantiations keep their arguments as nested
//! `subTypes`.

mod locator;

pub use locator::SymbolLocator;

use crate::error::{DocsError, Result};
use crate::model::TypeRef;
use crate::module_path::{ModuleNaming, ModulePathResolver};
use crate::program::{Keyword, Type, TypeFlags, TypeNode, TypeNodeKind, TypedProgram};

/// Marker for function types.
pub const CALLBACK_TYPE: &str = "callback";
/// Marker for inline object shapes, which are not modelled member by member.
pub const OBJECT_SHAPE_TYPE: &str = "Object.<string, any>";

pub struct TypeResolver<'a, P: TypedProgram + ?Sized> {
    program: &'a P,
    locator: SymbolLocator<'a, P>,
}

impl<'a, P: TypedProgram + ?Sized> TypeResolver<'a, P> {
    pub fn new(program: &'a P, naming: &'a ModuleNaming) -> Self {
        Self {
            program,
            locator: SymbolLocator::new(program, naming),
        }
    }

    pub fn modules(&self) -> &ModulePathResolver<'a> {
        self.locator.modules()
    }

    /// Resolve a type annotation node.
    pub fn resolve_node(&self, node: &TypeNode) -> Result<Vec<TypeRef>> {
        match &node.kind {
            TypeNodeKind::Union(types) => {
                let mut names = Vec::with_capacity(types.len());
                for member in types {
                    names.extend(self.resolve_node(member)?);
                }
                Ok(names)
            }
            TypeNodeKind::Function => Ok(vec![TypeRef::name(CALLBACK_TYPE)]),
            TypeNodeKind::Keyword(
                keyword @ (Keyword::Number
                | Keyword::String
                | Keyword::Boolean
                | Keyword::Null
                | Keyword::Undefined),
            ) => Ok(vec![TypeRef::name(keyword.as_str())]),
            TypeNodeKind::Literal(text) => Ok(vec![TypeRef::Name(format!("\"{text}\""))]),
            TypeNodeKind::TypeLiteral => Ok(vec![TypeRef::name(OBJECT_SHAPE_TYPE)]),
            _ => {
                let ty = self.program.type_at(node.id).ok_or_else(|| {
                    DocsError::unresolved(&node.text, "no checked type for node")
                })?;
                self.resolve_type(ty, &node.text)
            }
        }
    }

    /// Resolve an already checked type. `source_text` is reported on failure.
    pub fn resolve_type(&self, ty: &Type, source_text: &str) -> Result<Vec<TypeRef>> {
        // Booleans and enums may carry union bits without being documented as unions.
        if ty.flags.intersects(TypeFlags::UNION_OR_INTERSECTION)
            && !ty.flags.intersects(TypeFlags::ENUM | TypeFlags::BOOLEAN)
        {
            let mut names = Vec::with_capacity(ty.types.len());
            for id in &ty.types {
                let constituent = self.program.type_by_id(*id).ok_or_else(|| {
                    DocsError::unresolved(source_text, format!("dangling type {id:?}"))
                })?;
                names.extend(self.resolve_type(constituent, source_text)?);
            }
            return Ok(names);
        }

        let name = self.type_name_path(ty, source_text)?;
        if ty.type_arguments.is_empty() {
            return Ok(vec![TypeRef::Name(name)]);
        }

        let mut sub_types = Vec::with_capacity(ty.type_arguments.len());
        for id in &ty.type_arguments {
            let argument = self.program.type_by_id(*id).ok_or_else(|| {
                DocsError::unresolved(source_text, format!("dangling type argument {id:?}"))
            })?;
            sub_types.extend(self.resolve_type(argument, source_text)?);
        }
        Ok(vec![TypeRef::Generic { name, sub_types }])
    }

    /// Qualified name of a single, non-union type.
    pub fn type_name_path(&self, ty: &Type, source_text: &str) -> Result<String> {
        self.locator
            .type_name_path(ty)
            .map_err(|error| DocsError::unresolved(source_text, error))
    }
}
