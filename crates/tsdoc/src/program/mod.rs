//! The typed-program interface the engine queries, and its in-memory implementation.
//!
//! Parsing and type checking happen in a front end; the engine only reads the
//! resulting syntax, checked types, symbols and declaration tree through
//! [`TypedProgram`]. [`Program`] is an owned snapshot built with
//! [`ProgramBuilder`].

mod checker;
mod flags;
mod ids;
mod syntax;

use rustc_hash::FxHashMap;

pub use checker::{Declaration, DeclarationKind, Symbol, Type};
pub use flags::{ModifierFlags, TypeFlags};
pub use ids::{DeclId, NodeId, SymbolId, TypeId, UnitId};
pub use syntax::{
    ClassLike, ClassMember, EnumDecl, ExportDecl, ExportElement, FunctionDecl, HeritageClause,
    Initializer, InitializerKind, Keyword, MethodDecl, ModuleSpecifier, PropertyDecl, SourceUnit,
    Statement, TypeNode, TypeNodeKind, VariableDeclarator, VariableStatement,
};

/// Read-only queries over a parsed and type-checked program.
pub trait TypedProgram {
    /// All source units in program order.
    fn source_units(&self) -> &[SourceUnit];

    fn unit(&self, id: UnitId) -> Option<&SourceUnit>;

    /// Lookup by normalized file name.
    fn unit_by_file_name(&self, file_name: &str) -> Option<&SourceUnit>;

    /// Common root directory of the program's own sources, without a trailing slash.
    fn common_source_dir(&self) -> &str;

    /// Checked type of a syntax node.
    fn type_at(&self, node: NodeId) -> Option<&Type>;

    fn type_by_id(&self, id: TypeId) -> Option<&Type>;

    fn symbol(&self, id: SymbolId) -> Option<&Symbol>;

    fn declaration(&self, id: DeclId) -> Option<&Declaration>;
}

/// Owned program snapshot.
#[derive(Debug, Default)]
pub struct Program {
    units: Vec<SourceUnit>,
    unit_index: FxHashMap<UnitId, usize>,
    file_index: FxHashMap<String, usize>,
    common_source_dir: String,
    types: Vec<Type>,
    symbols: Vec<Symbol>,
    declarations: Vec<Declaration>,
    node_types: FxHashMap<NodeId, TypeId>,
}

impl Program {
    pub fn builder(common_source_dir: impl Into<String>) -> ProgramBuilder {
        ProgramBuilder::new(common_source_dir)
    }
}

impl TypedProgram for Program {
    fn source_units(&self) -> &[SourceUnit] {
        &self.units
    }

    fn unit(&self, id: UnitId) -> Option<&SourceUnit> {
        self.unit_index.get(&id).map(|&idx| &self.units[idx])
    }

    fn unit_by_file_name(&self, file_name: &str) -> Option<&SourceUnit> {
        self.file_index.get(file_name).map(|&idx| &self.units[idx])
    }

    fn common_source_dir(&self) -> &str {
        &self.common_source_dir
    }

    fn type_at(&self, node: NodeId) -> Option<&Type> {
        self.node_types
            .get(&node)
            .and_then(|&id| self.type_by_id(id))
    }

    fn type_by_id(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.index())
    }

    fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    fn declaration(&self, id: DeclId) -> Option<&Declaration> {
        self.declarations.get(id.index())
    }
}

/// Incremental construction of a [`Program`].
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
    next_unit: u32,
    next_node: u32,
}

impl ProgramBuilder {
    pub fn new(common_source_dir: impl Into<String>) -> Self {
        let mut common_source_dir = common_source_dir.into().replace('\\', "/");
        while common_source_dir.len() > 1 && common_source_dir.ends_with('/') {
            common_source_dir.pop();
        }
        Self {
            program: Program {
                common_source_dir,
                ..Program::default()
            },
            next_unit: 0,
            next_node: 0,
        }
    }

    /// Reserve the id of the next unit, so declarations can point at it
    /// before the unit itself is added.
    pub fn unit_id(&mut self) -> UnitId {
        let id = UnitId::from_raw(self.next_unit);
        self.next_unit += 1;
        id
    }

    pub fn node_id(&mut self) -> NodeId {
        let id = NodeId::from_raw(self.next_node);
        self.next_node += 1;
        id
    }

    pub fn set_common_source_dir(&mut self, dir: impl Into<String>) {
        let mut dir = dir.into().replace('\\', "/");
        while dir.len() > 1 && dir.ends_with('/') {
            dir.pop();
        }
        self.program.common_source_dir = dir;
    }

    pub fn add_declaration(&mut self, declaration: Declaration) -> DeclId {
        self.program.declarations.push(declaration);
        DeclId::from_raw((self.program.declarations.len() - 1) as u32)
    }

    pub fn add_symbol(&mut self, symbol: Symbol) -> SymbolId {
        self.program.symbols.push(symbol);
        SymbolId::from_raw((self.program.symbols.len() - 1) as u32)
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.program.symbols.get_mut(id.index())
    }

    pub fn add_type(&mut self, ty: Type) -> TypeId {
        self.program.types.push(ty);
        TypeId::from_raw((self.program.types.len() - 1) as u32)
    }

    pub fn set_type_at(&mut self, node: NodeId, ty: TypeId) {
        self.program.node_types.insert(node, ty);
    }

    pub fn add_unit(&mut self, unit: SourceUnit) {
        let idx = self.program.units.len();
        self.program.unit_index.insert(unit.id, idx);
        self.program.file_index.insert(unit.file_name.clone(), idx);
        self.program.units.push(unit);
    }

    pub fn build(self) -> Program {
        self.program
    }
}
