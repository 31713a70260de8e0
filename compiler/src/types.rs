use indexmap::IndexMap;
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::mangle::to_camel;

/// A parsed schema expression: object, array or quoted literal.
///
/// Object keys keep their source order, and equality is order-sensitive
/// because key order decides emitted field order.
#[derive(Debug, Clone)]
pub enum Document {
    Object(IndexMap<String, Document>),
    Array(Vec<Document>),
    Literal(String),
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Document::Object(a), Document::Object(b)) => a.len() == b.len() && a.iter().eq(b.iter()),
            (Document::Array(a), Document::Array(b)) => a == b,
            (Document::Literal(a), Document::Literal(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Document {}

impl Document {
    pub fn as_object(&self) -> Option<&IndexMap<String, Document>> {
        match self {
            Document::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Document]> {
        match self {
            Document::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Document::Literal(text) => Some(text),
            _ => None,
        }
    }

    /// Object member lookup; `None` for missing keys and non-objects.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_object().and_then(|map| map.get(key))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Document::Object(_) => "object",
            Document::Array(_) => "array",
            Document::Literal(_) => "literal",
        }
    }
}

/// Builtin scalar types understood by every visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scalar {
    Str,
    Int,
    Bool,
    Number,
}

impl Scalar {
    pub const ALL: [Scalar; 4] = [Scalar::Str, Scalar::Int, Scalar::Bool, Scalar::Number];

    pub fn from_name(name: &str) -> Option<Scalar> {
        Scalar::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Scalar::Str    => "str",
            Scalar::Int    => "int",
            Scalar::Bool   => "bool",
            Scalar::Number => "number",
        }
    }

    pub fn c_type(self) -> &'static str {
        match self {
            Scalar::Str    => "char *",
            Scalar::Int    => "int64_t",
            Scalar::Bool   => "bool",
            Scalar::Number => "double",
        }
    }
}

/// How an instance of a named type is held by its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Passing {
    /// Enum-like types are stored inline.
    ByValue,
    /// Structs and unions are stored behind a pointer owned by the caller.
    ByReference,
}

/// A resolved field or variant type.
///
/// Traversals only need [`TypeRef::type_name`], since every `visit_type_*`
/// call takes the member's address whatever its storage. The storage side
/// ([`TypeRef::passing`], [`TypeRef::c_type`]) is what the registry dump
/// reports for each field, for tools laying out the matching C types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Scalar(Scalar),
    Named { name: String, passing: Passing },
    List(Box<TypeRef>),
    InlineStruct(Vec<Field>),
}

impl TypeRef {
    /// Suffix of the `visit_type_*` function that traverses this type.
    /// Inline structs have no traversal of their own.
    pub fn type_name(&self) -> Option<String> {
        match self {
            TypeRef::Scalar(scalar) => Some(scalar.name().to_string()),
            TypeRef::Named { name, .. } => Some(name.clone()),
            TypeRef::List(inner) => inner.type_name().map(|name| format!("{}List", name)),
            TypeRef::InlineStruct(_) => None,
        }
    }

    /// C storage type of a member holding this type.
    pub fn c_type(&self) -> Option<String> {
        match self {
            TypeRef::Scalar(scalar) => Some(scalar.c_type().to_string()),
            TypeRef::List(inner) => inner.type_name().map(|name| format!("{}List *", name)),
            TypeRef::Named { name, passing: Passing::ByValue } => Some(name.clone()),
            TypeRef::Named { name, .. } if *name == name.to_uppercase() => {
                Some(format!("{}Event *", to_camel(name)))
            }
            TypeRef::Named { name, .. } => Some(format!("{} *", name)),
            TypeRef::InlineStruct(_) => None,
        }
    }

    pub fn passing(&self) -> Passing {
        match self {
            TypeRef::Scalar(_) => Passing::ByValue,
            TypeRef::Named { passing, .. } => *passing,
            TypeRef::List(_) | TypeRef::InlineStruct(_) => Passing::ByReference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name:     String,
    pub optional: bool,
    pub type_:    TypeRef,
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Field", 4)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("optional", &self.optional)?;
        state.serialize_field("type", &self.type_)?;
        state.serialize_field("c_type", &self.type_.c_type())?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructDecl {
    pub name:   String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDecl {
    pub name:   String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnionDecl {
    pub name:     String,
    pub variants: IndexMap<String, TypeRef>,
}

impl UnionDecl {
    pub fn kind_name(&self) -> String {
        format!("{}Kind", self.name)
    }

    /// The tag enum every union introduces, one value per variant.
    pub fn kind_enum(&self) -> EnumDecl {
        EnumDecl {
            name:   self.kind_name(),
            values: self.variants.keys().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Declaration {
    Struct(StructDecl),
    Enum(EnumDecl),
    Union(UnionDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Struct(s) => &s.name,
            Declaration::Enum(e) => &e.name,
            Declaration::Union(u) => &u.name,
        }
    }
}
