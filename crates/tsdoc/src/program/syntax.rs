//! Owned syntax of a source unit, reduced to the declarations the extractor walks.

use super::flags::ModifierFlags;
use super::ids::{NodeId, UnitId};

/// One file of the program.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub id: UnitId,
    /// Normalized absolute path with forward slashes.
    pub file_name: String,
    pub is_declaration_file: bool,
    /// The file has no text at all.
    pub is_empty: bool,
    /// Top-level statements in source order.
    pub statements: Vec<Statement>,
}

impl SourceUnit {
    /// File name without its final extension.
    pub fn file_name_without_ext(&self) -> &str {
        strip_extension(&self.file_name)
    }
}

pub(crate) fn strip_extension(file_name: &str) -> &str {
    let file_start = file_name.rfind('/').map_or(0, |idx| idx + 1);
    match file_name[file_start..].rfind('.') {
        Some(dot) => &file_name[..file_start + dot],
        None => file_name,
    }
}

#[derive(Debug, Clone)]
pub enum Statement {
    /// A class or interface declaration.
    Class(ClassLike),
    Function(FunctionDecl),
    Variable(VariableStatement),
    Enum(EnumDecl),
    Export(ExportDecl),
    /// Anything the extractor never documents (imports, type aliases, namespaces, expressions).
    Other,
}

#[derive(Debug, Clone)]
pub struct ClassLike {
    pub node: NodeId,
    /// `None` for `export default class {}`.
    pub name: Option<String>,
    pub is_interface: bool,
    pub modifiers: ModifierFlags,
    pub heritage_clauses: Vec<HeritageClause>,
    pub members: Vec<ClassMember>,
}

/// `extends` or `implements` list.
#[derive(Debug, Clone, Default)]
pub struct HeritageClause {
    pub types: Vec<TypeNode>,
}

#[derive(Debug, Clone)]
pub enum ClassMember {
    Property(PropertyDecl),
    Method(MethodDecl),
    /// Constructors, accessors, index and call signatures.
    Other,
}

#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub node: NodeId,
    pub name: String,
    pub modifiers: ModifierFlags,
    /// Interface property signature rather than a class property declaration.
    pub is_signature: bool,
    pub has_question_token: bool,
    pub type_node: Option<TypeNode>,
    pub initializer: Option<Initializer>,
}

#[derive(Debug, Clone)]
pub struct Initializer {
    /// Source text of the initializer expression.
    pub text: String,
    pub kind: InitializerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerKind {
    /// Literal-shaped: may be evaluated to a constant.
    Literal,
    /// Calls, `new`, member access, templates: kept as raw text.
    Expression,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub node: NodeId,
    pub name: String,
    pub modifiers: ModifierFlags,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub node: NodeId,
    pub name: Option<String>,
    pub modifiers: ModifierFlags,
}

#[derive(Debug, Clone)]
pub struct VariableStatement {
    pub node: NodeId,
    pub modifiers: ModifierFlags,
    /// `const` flag of the declaration list.
    pub is_const: bool,
    pub declarations: Vec<VariableDeclarator>,
}

#[derive(Debug, Clone)]
pub struct VariableDeclarator {
    pub node: NodeId,
    /// `None` for destructuring patterns.
    pub name: Option<String>,
    pub type_node: Option<TypeNode>,
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub node: NodeId,
    pub name: String,
    pub modifiers: ModifierFlags,
    pub members: Vec<String>,
}

/// `export ... from "..."` or `export { ... }`.
#[derive(Debug, Clone)]
pub struct ExportDecl {
    pub node: NodeId,
    pub text: String,
    pub module_specifier: Option<ModuleSpecifier>,
    /// `None` for `export * from`.
    pub elements: Option<Vec<ExportElement>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSpecifier {
    String(String),
    /// A specifier that is not a plain string literal.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportElement {
    Specifier {
        /// Exported name.
        name: String,
        /// Name in the origin module when aliased (`export { a as b }`).
        property_name: Option<String>,
    },
    Other { text: String },
}

/// A type annotation node.
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub id: NodeId,
    pub text: String,
    pub kind: TypeNodeKind,
}

#[derive(Debug, Clone)]
pub enum TypeNodeKind {
    Function,
    Keyword(Keyword),
    /// Literal type; holds the literal's text without quotes.
    Literal(String),
    /// Inline object shape `{ a: string }`.
    TypeLiteral,
    Union(Vec<TypeNode>),
    /// Named reference; its meaning comes from the checked type.
    Reference,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Number,
    String,
    Boolean,
    Null,
    Undefined,
    Any,
    Unknown,
    Void,
    Never,
    Object,
    Symbol,
    BigInt,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Number => "number",
            Keyword::String => "string",
            Keyword::Boolean => "boolean",
            Keyword::Null => "null",
            Keyword::Undefined => "undefined",
            Keyword::Any => "any",
            Keyword::Unknown => "unknown",
            Keyword::Void => "void",
            Keyword::Never => "never",
            Keyword::Object => "object",
            Keyword::Symbol => "symbol",
            Keyword::BigInt => "bigint",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_the_final_extension() {
        assert_eq!(strip_extension("/p/src/a.ts"), "/p/src/a");
        assert_eq!(strip_extension("/p/src/node.d.ts"), "/p/src/node.d");
        assert_eq!(strip_extension("/p/src.v2/a"), "/p/src.v2/a");
    }
}
