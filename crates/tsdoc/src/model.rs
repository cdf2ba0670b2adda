use serde::{Deserialize, Serialize};

/// Resolved representation of a type: a bare (qualified or primitive) name, or a
/// generic instantiation with nested arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Name(String),
    Generic {
        name: String,
        #[serde(rename = "subTypes")]
        sub_types: Vec<TypeRef>,
    },
}

impl TypeRef {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn generic(name: impl Into<String>, sub_types: Vec<TypeRef>) -> Self {
        Self::Generic {
            name: name.into(),
            sub_types,
        }
    }

    /// The head name (`Array` for `Array<string>`).
    pub fn head(&self) -> &str {
        match self {
            TypeRef::Name(name) | TypeRef::Generic { name, .. } => name,
        }
    }

    /// Rebuild the reference with every name passed through `map`.
    pub fn map_names(&self, map: &mut impl FnMut(&str) -> String) -> TypeRef {
        match self {
            TypeRef::Name(name) => TypeRef::Name(map(name)),
            TypeRef::Generic { name, sub_types } => TypeRef::Generic {
                name: map(name),
                sub_types: sub_types.iter().map(|sub| sub.map_names(map)).collect(),
            },
        }
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::Name(name.to_string())
    }
}

/// Anything kept in a module collection and looked up by name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Documentation collected for one module identifier.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUnitModel {
    pub classes: Vec<ClassDescriptor>,
    pub functions: Vec<MethodDescriptor>,
    /// Variables and enums.
    pub members: Vec<MemberDescriptor>,
}

impl SourceUnitModel {
    /// Returns `true` when the module has nothing to document.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.functions.is_empty() && self.members.is_empty()
    }

    /// Append another unit's collections (several files may share one module id).
    pub fn extend(&mut self, other: SourceUnitModel) {
        self.classes.extend(other.classes);
        self.functions.extend(other.functions);
        self.members.extend(other.members);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDescriptor {
    /// `module:<id>` of the module that owns the class.
    pub module_path: String,
    pub name: String,
    pub methods: Vec<MethodDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
    pub parents: Vec<TypeRef>,
    pub is_interface: bool,
    /// Snippets attached during output assembly.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub examples: Vec<Example>,
}

impl Named for ClassDescriptor {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    pub name: String,
    pub tags: Vec<String>,
    pub is_protected: bool,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            is_protected: false,
        }
    }
}

impl Named for MethodDescriptor {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    pub types: Vec<TypeRef>,
    pub is_optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
}

/// Default value of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// Constant recovered by evaluating a literal initializer.
    Literal(serde_json::Value),
    /// Raw source text of an initializer that was not evaluated.
    Expression(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemberDescriptor {
    Variable(VariableDescriptor),
    Enum(EnumDescriptor),
}

impl Named for MemberDescriptor {
    fn name(&self) -> &str {
        match self {
            MemberDescriptor::Variable(variable) => &variable.name,
            MemberDescriptor::Enum(enumeration) => &enumeration.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDescriptor {
    pub types: Vec<TypeRef>,
    pub name: String,
    pub is_const: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDescriptor {
    /// `module:<id>.<Name>`.
    pub id: String,
    pub name: String,
    /// `module:<id>` of the declaring module.
    pub member_of: String,
    /// Always `["number"]`.
    pub types: Vec<TypeRef>,
    pub members: Vec<EnumMemberDescriptor>,
}

/// A static member of an enum; literal values are not captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumMemberDescriptor {
    pub name: String,
    pub member_of: String,
    pub types: Vec<TypeRef>,
}

/// A code snippet attached to a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub name: String,
    pub content: String,
    /// File extension without the dot.
    pub lang: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_refs_serialize_as_string_or_generic_object() {
        let reference = TypeRef::generic(
            "Array",
            vec![TypeRef::generic("Promise", vec![TypeRef::name("string")])],
        );
        let json = serde_json::to_value(&reference).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Array",
                "subTypes": [{ "name": "Promise", "subTypes": ["string"] }]
            })
        );
    }

    #[test]
    fn map_names_reaches_nested_arguments() {
        let reference = TypeRef::generic("module:a.Box", vec![TypeRef::name("module:a.Item")]);
        let mapped = reference.map_names(&mut |name| name.replace("module:a", "module:main"));
        assert_eq!(
            mapped,
            TypeRef::generic("module:main.Box", vec![TypeRef::name("module:main.Item")])
        );
    }

    #[test]
    fn members_are_tagged_by_kind() {
        let member = MemberDescriptor::Variable(VariableDescriptor {
            types: vec![TypeRef::name("string")],
            name: "version".into(),
            is_const: true,
        });
        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["kind"], "variable");
        assert_eq!(member.name(), "version");
    }
}
