//! Qualified paths for the symbols behind checked types.

use tracing::warn;

use crate::error::{DocsError, Result};
use crate::module_path::{ModuleNaming, ModulePathResolver};
use crate::program::{DeclarationKind, ModifierFlags, Type, TypeFlags, TypedProgram};

/// Primitive names recognized from type flags alone, in lookup order.
const PRIMITIVES: &[(TypeFlags, &str)] = &[
    (TypeFlags::BOOLEAN, "boolean"),
    (TypeFlags::VOID, "void"),
    (TypeFlags::NULL, "null"),
    (TypeFlags::STRING, "string"),
    (TypeFlags::NUMBER, "number"),
    (TypeFlags::UNDEFINED, "undefined"),
    (TypeFlags::ANY, "any"),
    (TypeFlags::UNKNOWN, "unknown"),
    (TypeFlags::NEVER, "never"),
    (TypeFlags::BIGINT, "bigint"),
    (TypeFlags::SYMBOL, "symbol"),
    (TypeFlags::NON_PRIMITIVE, "object"),
];

/// Maps a checked type to `module:<id>.<Name>`, `<namespace>:<Name>`, a bare
/// ambient name, or a primitive name.
pub struct SymbolLocator<'a, P: TypedProgram + ?Sized> {
    program: &'a P,
    modules: ModulePathResolver<'a>,
}

impl<'a, P: TypedProgram + ?Sized> SymbolLocator<'a, P> {
    pub fn new(program: &'a P, naming: &'a ModuleNaming) -> Self {
        Self {
            program,
            modules: ModulePathResolver::new(naming, program.common_source_dir()),
        }
    }

    pub fn modules(&self) -> &ModulePathResolver<'a> {
        &self.modules
    }

    pub fn type_name_path(&self, ty: &Type) -> Result<String> {
        if let Some((_, name)) = PRIMITIVES
            .iter()
            .find(|(flag, _)| ty.flags.intersects(*flag))
        {
            return Ok((*name).to_string());
        }
        if ty.flags.intersects(TypeFlags::LITERAL) {
            return Ok(format!("\"{}\"", ty.literal.as_deref().unwrap_or_default()));
        }

        let symbol = ty
            .symbol
            .and_then(|id| self.program.symbol(id))
            .ok_or_else(|| DocsError::MissingDeclaration {
                symbol: "<anonymous>".to_string(),
            })?;
        let declaration_id =
            symbol
                .primary_declaration()
                .ok_or_else(|| DocsError::MissingDeclaration {
                    symbol: symbol.name.clone(),
                })?;
        let declaration = self.program.declaration(declaration_id).ok_or_else(|| {
            DocsError::MissingDeclaration {
                symbol: symbol.name.clone(),
            }
        })?;

        // Ecosystem-provided declarations (lib.d.ts and friends) are globally known.
        if declaration.modifiers.contains(ModifierFlags::AMBIENT) {
            return Ok(symbol.name.clone());
        }

        let mut current = Some(declaration_id);
        while let Some(id) = current {
            let Some(scope) = self.program.declaration(id) else {
                break;
            };
            match &scope.kind {
                DeclarationKind::Namespace {
                    name,
                    is_namespace,
                    is_nested: false,
                } => {
                    return Ok(if *is_namespace {
                        format!("{name}:{}", symbol.name)
                    } else {
                        format!("module:{name}.{}", symbol.name)
                    });
                }
                DeclarationKind::SourceUnit(unit_id) => {
                    let unit = self.program.unit(*unit_id).ok_or_else(|| {
                        DocsError::MissingScope {
                            symbol: symbol.name.clone(),
                        }
                    })?;
                    let module_id = self.modules.resolve(unit).id;
                    return Ok(format!("module:{module_id}.{}", symbol.name));
                }
                _ => current = scope.parent,
            }
        }

        warn!(symbol = %symbol.name, "cannot find parent scope for symbol");
        Err(DocsError::MissingScope {
            symbol: symbol.name.clone(),
        })
    }
}
