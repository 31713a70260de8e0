//! C visitor emitter.
//!
//! For every declaration of a [`TypeRegistry`] this produces a declaration
//! fragment (prototypes, and optionally enum typedefs) and a definition
//! fragment (traversal bodies). Traversals only call the generic visitor
//! core (`visit_start_struct`, `visit_next_list`, `visit_type_enum`, ...),
//! so one generated file serves every visitor backend.

use tracing::{debug, trace};

use crate::{
    mangle::{c_fun, c_list_type, c_var, enum_const_name, enum_const_prefix},
    registry::TypeRegistry,
    types::{Declaration, EnumDecl, Field, StructDecl, TypeRef, UnionDecl},
    utils::{basename, guard_name},
    writer::CodeWriter,
};

const BANNER: &str = "/* THIS FILE IS AUTOMATICALLY GENERATED, DO NOT MODIFY */";

/// Knobs of one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Prepended to output file names and to the types header include.
    pub prefix: String,
    /// Emit enum typedefs and `<Enum>_lookup` tables alongside the traversals.
    pub enum_tables: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            prefix:      String::new(),
            enum_tables: true,
        }
    }
}

impl GeneratorOptions {
    pub fn header_file(&self) -> String {
        format!("{}qapi-visit.h", self.prefix)
    }

    pub fn source_file(&self) -> String {
        format!("{}qapi-visit.c", self.prefix)
    }

    pub fn types_header(&self) -> String {
        format!("{}qapi-types.h", self.prefix)
    }
}

/// The two output streams of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    /// Header text: prototypes wrapped in an include guard.
    pub declarations: String,
    /// Source text: traversal function bodies.
    pub definitions: String,
}

fn c_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

pub struct Emitter<'a> {
    registry: &'a TypeRegistry,
    options:  &'a GeneratorOptions,
}

impl<'a> Emitter<'a> {
    pub fn new(registry: &'a TypeRegistry, options: &'a GeneratorOptions) -> Self {
        Emitter { registry, options }
    }

    /// Both output streams, declarations in registry order.
    pub fn generate(&self) -> GeneratedCode {
        let mut definitions = CodeWriter::new();
        let mut declarations = CodeWriter::new();

        self.definitions_preamble(&mut definitions);
        self.declarations_preamble(&mut declarations);

        for decl in self.registry.declarations() {
            trace!(name = decl.name(), "emitting declaration");
            self.emit_definition(decl, &mut definitions);
            self.emit_declaration(decl, &mut declarations);
        }

        declarations.blank();
        declarations.line("#endif");

        let generated = GeneratedCode {
            declarations: declarations.finish(),
            definitions:  definitions.finish(),
        };
        debug!(
            declarations = generated.declarations.len(),
            definitions = generated.definitions.len(),
            "generated visitor code"
        );
        generated
    }

    /// Prototype fragment of one declaration.
    pub fn declaration_fragment(&self, decl: &Declaration) -> String {
        let mut w = CodeWriter::new();
        self.emit_declaration(decl, &mut w);
        w.finish()
    }

    /// Traversal fragment of one declaration.
    pub fn definition_fragment(&self, decl: &Declaration) -> String {
        let mut w = CodeWriter::new();
        self.emit_definition(decl, &mut w);
        w.finish()
    }

    fn definitions_preamble(&self, w: &mut CodeWriter) {
        w.line(BANNER);
        w.blank();
        w.line("/*");
        w.line(" * schema-defined visitor functions");
        w.line(" */");
        w.blank();
        w.line(format!("#include {}", c_string(basename(&self.options.header_file()))));
    }

    fn declarations_preamble(&self, w: &mut CodeWriter) {
        let guard = guard_name(&self.options.header_file());
        w.line(BANNER);
        w.blank();
        w.line("/*");
        w.line(" * schema-defined visitor function prototypes");
        w.line(" */");
        w.blank();
        w.line(format!("#ifndef {}", guard));
        w.line(format!("#define {}", guard));
        w.blank();
        w.line("#include \"qapi/qapi-visit-core.h\"");
        w.line(format!("#include {}", c_string(&self.options.types_header())));
    }

    pub fn emit_declaration(&self, decl: &Declaration, w: &mut CodeWriter) {
        match decl {
            Declaration::Struct(s) => self.declare_aggregate(&s.name, w),
            Declaration::Enum(e) => self.declare_enum(e, w),
            Declaration::Union(u) => {
                self.declare_enum(&u.kind_enum(), w);
                self.declare_aggregate(&u.name, w);
            }
        }
    }

    pub fn emit_definition(&self, decl: &Declaration, w: &mut CodeWriter) {
        match decl {
            Declaration::Struct(s) => {
                self.visit_struct(s, w);
                self.visit_list(&s.name, w);
            }
            Declaration::Enum(e) => self.visit_enum(e, w),
            Declaration::Union(u) => {
                self.visit_enum(&u.kind_enum(), w);
                self.visit_union(u, w);
                self.visit_list(&u.name, w);
            }
        }
    }

    fn declare_aggregate(&self, name: &str, w: &mut CodeWriter) {
        let list = c_list_type(name);
        w.blank();
        w.line(format!(
            "void visit_type_{}(Visitor *m, {} ** obj, const char *name, Error **errp);",
            name, name
        ));
        w.line(format!(
            "void visit_type_{}(Visitor *m, {} ** obj, const char *name, Error **errp);",
            list, list
        ));
    }

    fn declare_enum(&self, e: &EnumDecl, w: &mut CodeWriter) {
        if self.options.enum_tables {
            w.blank();
            w.block(format!("typedef enum {} {{", e.name), format!("}} {};", e.name), |w| {
                for (index, value) in e.values.iter().enumerate() {
                    w.line(format!("{} = {},", enum_const_name(&e.name, value), index));
                }
                w.line(format!("{}_MAX = {},", enum_const_prefix(&e.name), e.values.len()));
            });
            w.blank();
            w.line(format!("extern const char *{}_lookup[];", e.name));
        }
        w.blank();
        w.line(format!(
            "void visit_type_{}(Visitor *m, {} * obj, const char *name, Error **errp);",
            e.name, e.name
        ));
    }

    /// Opening of a struct-shaped traversal, up to and including the null
    /// instance check.
    fn start_struct_traversal(&self, name: &str, err: &str, w: &mut CodeWriter) {
        w.block("if (error_is_set(errp)) {", "}", |w| w.line("return;"));
        w.line(format!(
            "visit_start_struct(m, (void **)obj, {}, name, sizeof({}), {});",
            c_string(name),
            name,
            err
        ));
        w.block("if (obj && !*obj) {", "}", |w| w.line("goto end;"));
    }

    fn end_struct_traversal(&self, w: &mut CodeWriter) {
        w.line("end:");
        w.indented(|w| w.line("visit_end_struct(m, errp);"));
        w.line("}");
    }

    fn visit_struct(&self, s: &StructDecl, w: &mut CodeWriter) {
        w.blank();
        w.line(format!(
            "void visit_type_{}(Visitor *m, {} ** obj, const char *name, Error **errp)",
            s.name, s.name
        ));
        w.line("{");
        w.indented(|w| {
            self.start_struct_traversal(&s.name, "errp", w);
            self.visit_struct_body("", &s.fields, w);
        });
        self.end_struct_traversal(w);
    }

    /// Field visits of a struct body; `prefix` is the dotted C path of the
    /// enclosing inline structs.
    fn visit_struct_body(&self, prefix: &str, fields: &[Field], w: &mut CodeWriter) {
        let field_prefix = if prefix.is_empty() {
            String::new()
        } else {
            format!("{}.", prefix)
        };

        for field in fields {
            let c_name = c_var(&field.name);
            if field.optional {
                w.line(format!(
                    "visit_start_optional(m, (obj && *obj) ? &(*obj)->{}has_{} : NULL, {}, errp);",
                    c_var(&field_prefix),
                    c_name,
                    c_string(&field.name)
                ));
                w.block(
                    format!("if ((*obj)->{}has_{}) {{", c_var(&field_prefix), c_name),
                    "}",
                    |w| self.visit_field(prefix, field, w),
                );
                w.line("visit_end_optional(m, errp);");
            } else {
                self.visit_field(prefix, field, w);
            }
        }
    }

    fn visit_field(&self, prefix: &str, field: &Field, w: &mut CodeWriter) {
        if let TypeRef::InlineStruct(fields) = &field.type_ {
            w.line(format!(
                "visit_start_struct(m, NULL, \"\", {}, 0, errp);",
                c_string(&field.name)
            ));
            w.indented(|w| self.visit_struct_body(&join_path(prefix, &field.name), fields, w));
            w.line("visit_end_struct(m, errp);");
            return;
        }

        let field_prefix = if prefix.is_empty() {
            String::new()
        } else {
            format!("{}.", prefix)
        };
        w.line(format!(
            "visit_type_{}(m, (obj && *obj) ? &(*obj)->{}{} : NULL, {}, errp);",
            field.type_.type_name().unwrap_or_default(),
            c_var(&field_prefix),
            c_var(&field.name),
            c_string(&field.name)
        ));
    }

    fn visit_list(&self, name: &str, w: &mut CodeWriter) {
        let list = c_list_type(name);
        w.blank();
        w.line(format!(
            "void visit_type_{}(Visitor *m, {} ** obj, const char *name, Error **errp)",
            list, list
        ));
        w.block("{", "}", |w| {
            w.line("GenericList *i, **prev = (GenericList **)obj;");
            w.blank();
            w.block("if (error_is_set(errp)) {", "}", |w| w.line("return;"));
            w.line("visit_start_list(m, name, errp);");
            w.blank();
            w.block(
                "for (; (i = visit_next_list(m, prev, errp)) != NULL; prev = &i) {",
                "}",
                |w| {
                    w.line(format!("{} *native_i = ({} *)i;", list, list));
                    w.line(format!("visit_type_{}(m, &native_i->value, NULL, errp);", name));
                },
            );
            w.blank();
            w.line("visit_end_list(m, errp);");
        });
    }

    fn visit_enum(&self, e: &EnumDecl, w: &mut CodeWriter) {
        if self.options.enum_tables {
            w.blank();
            w.block(format!("const char *{}_lookup[] = {{", e.name), "};", |w| {
                for value in &e.values {
                    w.line(format!("{},", c_string(value)));
                }
                w.line("NULL,");
            });
        }
        w.blank();
        w.line(format!(
            "void visit_type_{}(Visitor *m, {} * obj, const char *name, Error **errp)",
            e.name, e.name
        ));
        w.block("{", "}", |w| {
            w.line(format!(
                "visit_type_enum(m, (int *)obj, {}_lookup, {}, name, errp);",
                e.name,
                c_string(&e.name)
            ));
        });
    }

    fn visit_union(&self, u: &UnionDecl, w: &mut CodeWriter) {
        let kind_name = u.kind_name();

        w.blank();
        w.line(format!(
            "void visit_type_{}(Visitor *m, {} ** obj, const char *name, Error **errp)",
            u.name, u.name
        ));
        w.line("{");
        w.indented(|w| {
            w.line("Error *err = NULL;");
            w.blank();
            self.start_struct_traversal(&u.name, "&err", w);
            w.line(format!("visit_type_{}(m, &(*obj)->kind, \"type\", &err);", kind_name));
            w.block("if (err) {", "}", |w| {
                w.line("error_propagate(errp, err);");
                w.line("goto end;");
            });
            w.line("switch ((*obj)->kind) {");
            for (variant, type_) in &u.variants {
                w.line(format!("case {}:", enum_const_name(&kind_name, variant)));
                w.indented(|w| {
                    self.visit_variant(variant, type_, w);
                    w.line("break;");
                });
            }
            w.line("default:");
            w.indented(|w| w.line("abort();"));
            w.line("}");
        });
        self.end_struct_traversal(w);
    }

    fn visit_variant(&self, variant: &str, type_: &TypeRef, w: &mut CodeWriter) {
        match type_ {
            TypeRef::InlineStruct(fields) => {
                w.line("visit_start_struct(m, NULL, \"\", \"data\", 0, errp);");
                w.indented(|w| self.visit_struct_body(&c_fun(variant), fields, w));
                w.line("visit_end_struct(m, errp);");
            }
            _ => w.line(format!(
                "visit_type_{}(m, &(*obj)->{}, \"data\", errp);",
                type_.type_name().unwrap_or_default(),
                c_fun(variant)
            )),
        }
    }
}

/// Generates both output streams for a verified registry.
pub fn compile_registry_to_c(registry: &TypeRegistry, options: &GeneratorOptions) -> GeneratedCode {
    Emitter::new(registry, options).generate()
}
