use tracing::debug;

use crate::{
    error::GenError,
    gen_c::{compile_registry_to_c, GeneratedCode, GeneratorOptions},
    parser::parse_schema,
    registry::TypeRegistry,
};

/// Parse, classify and verify a textual schema.
/// Returns `Err(GenError)` if tokenization, parsing or validation fails.
pub fn compile_schema(text: &str) -> Result<TypeRegistry, GenError> {
    let documents = parse_schema(text)?;
    let registry = TypeRegistry::build(&documents)?;
    debug!(
        declarations = registry.declarations().len(),
        enum_like = ?registry.enum_names(),
        "compiled schema"
    );
    Ok(registry)
}

/// Compile a textual schema straight to the visitor header and source text.
/// Nothing is produced unless the whole schema compiles.
pub fn compile_schema_to_c(text: &str, options: &GeneratorOptions) -> Result<GeneratedCode, GenError> {
    let registry = compile_schema(text)?;
    Ok(compile_registry_to_c(&registry, options))
}
