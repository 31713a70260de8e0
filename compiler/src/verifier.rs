use std::collections::HashSet;

use crate::{
    error::SchemaError,
    registry::TypeRegistry,
    types::{Declaration, Field, Scalar, TypeRef},
};

fn check_type(type_: &TypeRef, used_by: &str, defined_types: &HashSet<&str>) -> Result<(), SchemaError> {
    match type_ {
        TypeRef::Scalar(_) => Ok(()),
        TypeRef::Named { name, .. } => {
            if defined_types.contains(name.as_str()) {
                Ok(())
            } else {
                Err(SchemaError::UnresolvedTypeReference {
                    name:    name.clone(),
                    used_by: used_by.to_string(),
                })
            }
        }
        TypeRef::List(inner) => check_type(inner, used_by, defined_types),
        TypeRef::InlineStruct(fields) => check_fields(fields, used_by, defined_types),
    }
}

fn check_fields(fields: &[Field], owner: &str, defined_types: &HashSet<&str>) -> Result<(), SchemaError> {
    for field in fields {
        check_type(&field.type_, &format!("{}.{}", owner, field.name), defined_types)?;
    }
    Ok(())
}

/// Rejects duplicate declaration names and references to undeclared types.
///
/// Builtin scalar names count as already defined, and every union also
/// defines its `<Union>Kind` tag enum.
pub fn verify_registry(registry: &TypeRegistry) -> Result<(), SchemaError> {
    let mut kind_names = Vec::new();
    let mut defined_types: HashSet<&str> = Scalar::ALL.iter().map(|s| s.name()).collect();

    // 1) Check duplicate type names
    for decl in registry.declarations() {
        if !defined_types.insert(decl.name()) {
            return Err(SchemaError::DuplicateDeclarationName(decl.name().to_string()));
        }
        if let Declaration::Union(union) = decl {
            kind_names.push(union.kind_name());
        }
    }
    for kind_name in &kind_names {
        if !defined_types.insert(kind_name.as_str()) {
            return Err(SchemaError::DuplicateDeclarationName(kind_name.clone()));
        }
    }

    // 2) Check that every referenced type is declared
    for decl in registry.declarations() {
        match decl {
            Declaration::Struct(s) => check_fields(&s.fields, &s.name, &defined_types)?,
            Declaration::Union(u) => {
                for (variant, type_) in &u.variants {
                    check_type(type_, &format!("{}.{}", u.name, variant), &defined_types)?;
                }
            }
            Declaration::Enum(_) => {}
        }
    }

    Ok(())
}
