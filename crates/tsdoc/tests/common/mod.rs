//! Hand-built typed programs for engine tests.

#![allow(dead_code)]

use tsdoc::program::{
    ClassLike, ClassMember, DeclId, Declaration, DeclarationKind, HeritageClause, Keyword,
    MethodDecl, ModifierFlags, PropertyDecl, SourceUnit, Statement, Symbol, Type, TypeFlags,
    TypeId, TypeNode, TypeNodeKind, UnitId,
};
use tsdoc::{Program, ProgramBuilder};

pub const ROOT: &str = "/p/src";

pub struct Fixture {
    pub builder: ProgramBuilder,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            builder: Program::builder(ROOT),
        }
    }

    /// Reserve a unit and its scope declaration.
    pub fn unit_scope(&mut self) -> (UnitId, DeclId) {
        let unit = self.builder.unit_id();
        let scope = self.builder.add_declaration(Declaration::new(
            DeclarationKind::SourceUnit(unit),
            None,
            ModifierFlags::empty(),
        ));
        (unit, scope)
    }

    pub fn add_unit(&mut self, id: UnitId, file: &str, statements: Vec<Statement>) {
        self.builder.add_unit(SourceUnit {
            id,
            file_name: format!("{ROOT}/{file}"),
            is_declaration_file: file.ends_with(".d.ts"),
            is_empty: statements.is_empty(),
            statements,
        });
    }

    /// Declare `name` under `parent` and return the object type naming it.
    pub fn declare(&mut self, name: &str, kind: DeclarationKind, parent: Option<DeclId>, modifiers: ModifierFlags) -> TypeId {
        let decl = self.builder.add_declaration(Declaration::new(kind, parent, modifiers));
        let symbol = self.builder.add_symbol(Symbol::new(name, Some(decl)));
        self.builder.add_type(Type::object(symbol, Vec::new()))
    }

    pub fn class_type(&mut self, name: &str, scope: DeclId) -> TypeId {
        self.declare(name, DeclarationKind::Class, Some(scope), ModifierFlags::EXPORT)
    }

    /// A global from the runtime's declaration files.
    pub fn ambient(&mut self, name: &str, arguments: Vec<TypeId>) -> TypeId {
        let decl = self.builder.add_declaration(Declaration::new(
            DeclarationKind::Interface,
            None,
            ModifierFlags::AMBIENT,
        ));
        let symbol = self.builder.add_symbol(Symbol::new(name, Some(decl)));
        self.builder.add_type(Type::object(symbol, arguments))
    }

    pub fn primitive(&mut self, flags: TypeFlags) -> TypeId {
        self.builder.add_type(Type::with_flags(flags))
    }

    pub fn node(&mut self, text: &str, kind: TypeNodeKind, ty: Option<TypeId>) -> TypeNode {
        let id = self.builder.node_id();
        if let Some(ty) = ty {
            self.builder.set_type_at(id, ty);
        }
        TypeNode {
            id,
            text: text.to_string(),
            kind,
        }
    }

    pub fn keyword(&mut self, keyword: Keyword) -> TypeNode {
        self.node(keyword.as_str(), TypeNodeKind::Keyword(keyword), None)
    }

    pub fn reference(&mut self, text: &str, ty: TypeId) -> TypeNode {
        self.node(text, TypeNodeKind::Reference, Some(ty))
    }

    pub fn property(&mut self, name: &str, modifiers: ModifierFlags, type_node: Option<TypeNode>) -> ClassMember {
        ClassMember::Property(PropertyDecl {
            node: self.builder.node_id(),
            name: name.to_string(),
            modifiers,
            is_signature: false,
            has_question_token: false,
            type_node,
            initializer: None,
        })
    }

    pub fn method(&mut self, name: &str, modifiers: ModifierFlags) -> ClassMember {
        ClassMember::Method(MethodDecl {
            node: self.builder.node_id(),
            name: name.to_string(),
            modifiers,
        })
    }

    pub fn class(&mut self, name: &str, modifiers: ModifierFlags, members: Vec<ClassMember>) -> ClassLike {
        ClassLike {
            node: self.builder.node_id(),
            name: Some(name.to_string()),
            is_interface: false,
            modifiers,
            heritage_clauses: Vec::<HeritageClause>::new(),
            members,
        }
    }

    pub fn build(self) -> Program {
        self.builder.build()
    }
}
