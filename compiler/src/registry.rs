//! Declaration collection and the type registry.
//!
//! Collection runs in two passes over the parsed documents. The first pass
//! records every enum-like name (declared enums and the implicit
//! `<Union>Kind` tag enums) across the whole file. The second pass builds
//! declarations and resolves field types against that complete set, so a
//! field may name an enum declared further down.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::{
    error::SchemaError,
    mangle::{c_var, enum_const_name},
    types::{Declaration, Document, EnumDecl, Field, Passing, Scalar, StructDecl, TypeRef, UnionDecl},
    verifier::verify_registry,
};

const DISCRIMINATORS: [&str; 3] = ["type", "enum", "union"];

/// Names whose instances are passed by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnumNames(BTreeSet<String>);

impl EnumNames {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

/// C identifiers already taken inside one scope, with the schema name that
/// produced each.
struct CNames<'a> {
    owner: &'a str,
    taken: HashMap<String, String>,
}

impl<'a> CNames<'a> {
    fn new(owner: &'a str) -> Self {
        CNames { owner, taken: HashMap::new() }
    }

    fn claim(&mut self, c_name: String, name: &str) -> Result<(), SchemaError> {
        if let Some(first) = self.taken.get(&c_name) {
            return Err(SchemaError::CollidingNames {
                owner:  self.owner.to_string(),
                first:  first.clone(),
                second: name.to_string(),
                c_name,
            });
        }
        self.taken.insert(c_name, name.to_string());
        Ok(())
    }
}

/// First pass: every enum-like name declared anywhere in the file.
pub fn discover_enum_names(documents: &[Document]) -> EnumNames {
    let mut names = BTreeSet::new();
    for doc in documents {
        if let Some(name) = doc.get("enum").and_then(Document::as_literal) {
            names.insert(name.to_string());
        }
        if let Some(name) = doc.get("union").and_then(Document::as_literal) {
            names.insert(format!("{}Kind", name));
        }
    }
    debug!(enum_like = names.len(), "discovered enum-like names");
    EnumNames(names)
}

fn resolve_name(name: &str, enum_names: &EnumNames) -> TypeRef {
    if let Some(scalar) = Scalar::from_name(name) {
        TypeRef::Scalar(scalar)
    } else if enum_names.contains(name) {
        TypeRef::Named { name: name.to_string(), passing: Passing::ByValue }
    } else {
        TypeRef::Named { name: name.to_string(), passing: Passing::ByReference }
    }
}

fn resolve_type(used_by: &str, value: &Document, enum_names: &EnumNames) -> Result<TypeRef, SchemaError> {
    match value {
        Document::Literal(name) => Ok(resolve_name(name, enum_names)),
        Document::Array(items) => match items.as_slice() {
            [Document::Literal(name)] => Ok(TypeRef::List(Box::new(resolve_name(name, enum_names)))),
            _ => Err(SchemaError::InvalidListType { used_by: used_by.to_string() }),
        },
        Document::Object(members) => Ok(TypeRef::InlineStruct(collect_fields(used_by, members, enum_names)?)),
    }
}

fn collect_fields(
    owner: &str,
    members: &IndexMap<String, Document>,
    enum_names: &EnumNames,
) -> Result<Vec<Field>, SchemaError> {
    let mut fields = Vec::with_capacity(members.len());
    let mut c_names = CNames::new(owner);
    for (key, value) in members {
        let (name, optional) = match key.strip_prefix('*') {
            Some(stripped) => (stripped, true),
            None => (key.as_str(), false),
        };
        if name.is_empty() {
            return Err(SchemaError::MalformedDeclaration {
                name: owner.to_string(),
                msg:  "field names must not be empty".to_string(),
            });
        }
        let member = c_var(name);
        if optional {
            c_names.claim(format!("has_{}", member), key)?;
        }
        c_names.claim(member, key)?;

        let used_by = format!("{}.{}", owner, name);
        fields.push(Field {
            name: name.to_string(),
            optional,
            type_: resolve_type(&used_by, value, enum_names)?,
        });
    }
    Ok(fields)
}

fn malformed(name: &str, msg: &str) -> SchemaError {
    SchemaError::MalformedDeclaration {
        name: name.to_string(),
        msg:  msg.to_string(),
    }
}

fn collect_enum(name: &str, data: &Document) -> Result<EnumDecl, SchemaError> {
    let items = data
        .as_array()
        .ok_or_else(|| malformed(name, &format!("enum data must be an array, found an {}", data.kind_name())))?;

    let mut values: Vec<String> = Vec::with_capacity(items.len());
    let mut c_names = CNames::new(name);
    for item in items {
        let value = item
            .as_literal()
            .ok_or_else(|| malformed(name, "enum values must be literals"))?;
        if values.iter().any(|v| v == value) {
            return Err(SchemaError::DuplicateEnumValue {
                name:  name.to_string(),
                value: value.to_string(),
            });
        }
        c_names.claim(enum_const_name(name, value), value)?;
        values.push(value.to_string());
    }
    Ok(EnumDecl { name: name.to_string(), values })
}

fn collect_declaration(index: usize, doc: &Document, enum_names: &EnumNames) -> Result<Declaration, SchemaError> {
    let members = doc.as_object().ok_or(SchemaError::NotAnObject { index })?;

    let present: Vec<&str> = DISCRIMINATORS
        .iter()
        .copied()
        .filter(|key| members.contains_key(*key))
        .collect();
    let key = match present.as_slice() {
        [key] => *key,
        [] => {
            return Err(SchemaError::AmbiguousDeclaration {
                index,
                found: "none".to_string(),
            })
        }
        _ => {
            return Err(SchemaError::AmbiguousDeclaration {
                index,
                found: present.join(", "),
            })
        }
    };

    let name = members[key]
        .as_literal()
        .ok_or_else(|| malformed(&format!("#{}", index), &format!("the \"{}\" name must be a literal", key)))?;
    let data = members
        .get("data")
        .ok_or_else(|| malformed(name, "missing \"data\""))?;

    match key {
        "type" => {
            let fields = data
                .as_object()
                .ok_or_else(|| malformed(name, &format!("struct data must be an object, found an {}", data.kind_name())))?;
            Ok(Declaration::Struct(StructDecl {
                name:   name.to_string(),
                fields: collect_fields(name, fields, enum_names)?,
            }))
        }
        "enum" => Ok(Declaration::Enum(collect_enum(name, data)?)),
        _ => {
            let members = data
                .as_object()
                .ok_or_else(|| malformed(name, &format!("union data must be an object, found an {}", data.kind_name())))?;
            let kind_name = format!("{}Kind", name);
            let mut c_names = CNames::new(&kind_name);
            let mut variants = IndexMap::with_capacity(members.len());
            for (variant, value) in members {
                c_names.claim(enum_const_name(&kind_name, variant), variant)?;
                let used_by = format!("{}.{}", name, variant);
                variants.insert(variant.clone(), resolve_type(&used_by, value, enum_names)?);
            }
            Ok(Declaration::Union(UnionDecl {
                name: name.to_string(),
                variants,
            }))
        }
    }
}

/// Second pass: one declaration per document, in file order.
pub fn collect_declarations(documents: &[Document], enum_names: &EnumNames) -> Result<Vec<Declaration>, SchemaError> {
    let declarations = documents
        .iter()
        .enumerate()
        .map(|(index, doc)| collect_declaration(index, doc, enum_names))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(declarations = declarations.len(), "collected declarations");
    Ok(declarations)
}

/// Every declaration of one schema file plus the enum-like names among them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeRegistry {
    declarations: Vec<Declaration>,
    enum_names:   EnumNames,
}

impl TypeRegistry {
    /// Runs both collection passes and verifies the result.
    pub fn build(documents: &[Document]) -> Result<Self, SchemaError> {
        let enum_names = discover_enum_names(documents);
        let declarations = collect_declarations(documents, &enum_names)?;
        let registry = TypeRegistry { declarations, enum_names };
        verify_registry(&registry)?;
        Ok(registry)
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn enum_names(&self) -> &EnumNames {
        &self.enum_names
    }

    pub fn is_enum_like(&self, name: &str) -> bool {
        self.enum_names.contains(name)
    }

    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|decl| decl.name() == name)
    }
}
