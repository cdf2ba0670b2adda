//! Strongly typed identifiers for the tables a [`TypedProgram`](super::TypedProgram) exposes.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default)]
        pub struct $name(pub u32);

        impl $name {
            /// Construct an identifier from a raw value.
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Retrieve the underlying integer value.
            pub const fn to_raw(self) -> u32 {
                self.0
            }

            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_id!(
    /// A source unit (one file) of the program.
    UnitId
);
define_id!(
    /// A syntax node that may carry a checked type.
    NodeId
);
define_id!(
    /// An entry of the checker's type table.
    TypeId
);
define_id!(
    /// An entry of the checker's symbol table.
    SymbolId
);
define_id!(
    /// A declaration in the enclosing-scope tree.
    DeclId
);
