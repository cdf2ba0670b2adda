#![deny(clippy::all)]

//! Declaration extraction and symbol resolution for TypeScript API documentation.
//!
//! This crate provides:
//! - The [`TypedProgram`] interface over a parsed, type-checked program, and an
//!   owned [`Program`] implementation.
//! - Module identifiers, type reference resolution and qualified symbol paths.
//! - The declaration extractor, which builds a per-module documentation model.
//! - Re-export flattening into the package's main module.
//! - Output assembly with reference mapping, example snippets and a JSON renderer.
//!
//! ```ignore
//! let extraction = Generator::new(&program, &naming).extract()?;
//! let flattened = extraction.flatten();
//! let units = assemble(&flattened, &JsonRenderer, &AssembleOptions::default()).await?;
//! write_units(out_dir, &units).await?;
//! ```

pub mod assembler;
pub mod error;
pub mod evaluator;
pub mod extractor;
pub mod flatten;
pub mod model;
pub mod module_path;
pub mod program;
pub mod resolver;
pub mod snippets;

#[cfg(feature = "json")]
pub mod generators;

pub use assembler::{
    AssembleOptions, ExternalAlias, ModulePathMapper, OutputUnit, RenderInput, Renderer, assemble,
    write_units,
};
pub use error::{DocsError, Result};
pub use extractor::{Extraction, Generator, ReexportMap};
pub use flatten::{Flattened, PathRewriteTable};
pub use model::{
    ClassDescriptor, DefaultValue, EnumDescriptor, EnumMemberDescriptor, Example,
    MemberDescriptor, MethodDescriptor, PropertyDescriptor, SourceUnitModel, TypeRef,
    VariableDescriptor,
};
pub use module_path::{ModuleInfo, ModuleNaming, ModulePathResolver};
pub use program::{Program, ProgramBuilder, TypedProgram};
pub use resolver::TypeResolver;

#[cfg(feature = "json")]
pub use generators::json::JsonRenderer;
