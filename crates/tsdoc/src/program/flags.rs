//! Bit sets for declaration modifiers and checked type kinds.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

macro_rules! define_flags {
    ($(#[$meta:meta])* $name:ident { $($(#[$flag_meta:meta])* $flag:ident = $bit:expr,)* }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(u32);

        impl $name {
            $($(#[$flag_meta])* pub const $flag: Self = Self(1 << $bit);)*

            /// No bits set.
            pub const fn empty() -> Self {
                Self(0)
            }

            /// Raw bit pattern.
            pub const fn bits(self) -> u32 {
                self.0
            }

            /// `true` when every bit of `other` is set.
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// `true` when at least one bit of `other` is set.
            pub const fn intersects(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }

            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// Set or clear the bits of `other`.
            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.0 |= other.0;
                } else {
                    self.0 &= !other.0;
                }
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut names = Vec::new();
                $(if self.contains(Self::$flag) { names.push(stringify!($flag)); })*
                write!(f, concat!(stringify!($name), "({})"), names.join(" | "))
            }
        }
    };
}

define_flags!(
    /// Combined modifier flags of a declaration, including those inherited
    /// from its enclosing statement (e.g. `export` on a variable statement).
    ModifierFlags {
        EXPORT = 0,
        DEFAULT = 1,
        /// Declared with `declare` or inside a declaration file.
        AMBIENT = 2,
        PRIVATE = 3,
        PROTECTED = 4,
        READONLY = 5,
        STATIC = 6,
        ABSTRACT = 7,
    }
);

define_flags!(
    /// Kind bits of a checked type.
    TypeFlags {
        ANY = 0,
        UNKNOWN = 1,
        STRING = 2,
        NUMBER = 3,
        BOOLEAN = 4,
        BIGINT = 5,
        SYMBOL = 6,
        ENUM = 7,
        STRING_LITERAL = 8,
        NUMBER_LITERAL = 9,
        BOOLEAN_LITERAL = 10,
        UNDEFINED = 11,
        NULL = 12,
        VOID = 13,
        NEVER = 14,
        /// The `object` keyword type.
        NON_PRIMITIVE = 15,
        UNION = 16,
        INTERSECTION = 17,
        OBJECT = 18,
        TYPE_PARAMETER = 19,
    }
);

impl TypeFlags {
    pub const LITERAL: Self =
        Self(Self::STRING_LITERAL.0 | Self::NUMBER_LITERAL.0 | Self::BOOLEAN_LITERAL.0);
    pub const UNION_OR_INTERSECTION: Self = Self(Self::UNION.0 | Self::INTERSECTION.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_and_intersects() {
        let flags = ModifierFlags::EXPORT | ModifierFlags::READONLY;
        assert!(flags.contains(ModifierFlags::EXPORT));
        assert!(!flags.contains(ModifierFlags::EXPORT | ModifierFlags::PRIVATE));
        assert!(flags.intersects(ModifierFlags::EXPORT | ModifierFlags::PRIVATE));
        assert!(!ModifierFlags::empty().intersects(ModifierFlags::EXPORT));
    }

    #[test]
    fn set_clears_bits() {
        let mut flags = TypeFlags::UNION | TypeFlags::BOOLEAN;
        flags.set(TypeFlags::BOOLEAN, false);
        assert_eq!(flags, TypeFlags::UNION);
        assert_eq!(format!("{flags:?}"), "TypeFlags(UNION)");
    }
}
