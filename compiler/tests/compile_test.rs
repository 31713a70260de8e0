use visitgen_compiler::{
    compile_schema, compile_schema_to_c,
    error::{GenError, SchemaError},
    types::{Declaration, Passing, TypeRef},
    Emitter, GeneratorOptions,
};

fn definitions(text: &str) -> String {
    compile_schema_to_c(text, &GeneratorOptions::default())
        .expect("schema should compile")
        .definitions
}

#[test]
fn enum_scenario() {
    let out = compile_schema_to_c(
        "{'enum':'Color','data':['red','green','blue']}\n",
        &GeneratorOptions::default(),
    )
    .unwrap();

    assert_eq!(out.definitions.matches("void visit_type_Color(").count(), 1);
    assert!(out.definitions.contains(
        "const char *Color_lookup[] = {\n    \"red\",\n    \"green\",\n    \"blue\",\n    NULL,\n};\n"
    ));
    assert!(out.definitions.contains("visit_type_enum(m, (int *)obj, Color_lookup, \"Color\", name, errp);"));
    assert!(out.declarations.contains("    COLOR_RED = 0,\n    COLOR_GREEN = 1,\n    COLOR_BLUE = 2,\n    COLOR_MAX = 3,\n"));
    assert!(!out.definitions.contains("ColorList"));
}

#[test]
fn struct_scenario() {
    let out = definitions("{'type':'Point','data':{'x':'int','y':'int'}}\n");

    let x = out.find("visit_type_int(m, (obj && *obj) ? &(*obj)->x : NULL, \"x\", errp);").unwrap();
    let y = out.find("visit_type_int(m, (obj && *obj) ? &(*obj)->y : NULL, \"y\", errp);").unwrap();
    assert!(x < y);
    assert_eq!(out.matches("visit_start_struct(").count(), 1);
    assert_eq!(out.matches("visit_end_struct(").count(), 1);
    assert!(!out.contains("visit_start_optional"));

    assert!(out.contains("void visit_type_PointList(Visitor *m, PointList ** obj, const char *name, Error **errp)"));
    assert!(out.contains("for (; (i = visit_next_list(m, prev, errp)) != NULL; prev = &i) {"));
    assert!(out.contains("visit_type_Point(m, &native_i->value, NULL, errp);"));
}

#[test]
fn union_scenario() {
    let out = definitions(
        "{'type':'Circle','data':{'radius':'number'}}\n\
         {'type':'Square','data':{'side':'number'}}\n\
         {'union':'Shape','data':{'circle':'Circle','square':'Square'}}\n",
    );

    assert!(out.contains("const char *ShapeKind_lookup[] = {\n    \"circle\",\n    \"square\",\n    NULL,\n};\n"));
    let tag = out.find("visit_type_ShapeKind(m, &(*obj)->kind, \"type\", &err);").unwrap();
    let circle = out.find("visit_type_Circle(m, &(*obj)->circle, \"data\", errp);").unwrap();
    let square = out.find("visit_type_Square(m, &(*obj)->square, \"data\", errp);").unwrap();
    assert!(tag < circle && circle < square);
    assert!(out.contains("    default:\n        abort();\n"));
}

#[test]
fn union_dispatch_is_exhaustive() {
    let out = definitions(
        "{ 'type': 'A', 'data': {} }\n\
         { 'type': 'B', 'data': {} }\n\
         { 'union': 'Pair', 'data': { 'b': 'B', 'a': 'A' } }\n",
    );

    let cases: Vec<&str> = out
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("case "))
        .collect();
    assert_eq!(cases, vec!["case PAIR_KIND_B:", "case PAIR_KIND_A:"]);
    assert_eq!(out.matches("default:").count(), 1);
}

#[test]
fn optional_fields_are_guarded() {
    let registry = compile_schema("{ 'type': 'Stats', 'data': { '*count': 'int', 'total': 'int' } }\n").unwrap();
    let options = GeneratorOptions::default();
    let out = Emitter::new(&registry, &options).definition_fragment(&registry.declarations()[0]);

    assert!(out.contains("visit_start_optional(m, (obj && *obj) ? &(*obj)->has_count : NULL, \"count\", errp);"));
    assert!(out.contains("    if ((*obj)->has_count) {\n        visit_type_int(m, (obj && *obj) ? &(*obj)->count : NULL, \"count\", errp);\n    }\n"));
    assert!(out.contains("\n    visit_type_int(m, (obj && *obj) ? &(*obj)->total : NULL, \"total\", errp);\n"));
    assert_eq!(out.matches("visit_end_optional").count(), 1);
}

#[test]
fn forward_enum_reference_is_by_value() {
    let registry = compile_schema(
        "{ 'type': 'Pixel', 'data': { 'color': 'Color', 'shape': 'Shape', 'next': 'Pixel' } }\n\
         { 'type': 'Dot', 'data': {} }\n\
         { 'union': 'Shape', 'data': { 'dot': 'Dot' } }\n\
         { 'enum': 'Color', 'data': ['red'] }\n",
    )
    .unwrap();

    let Some(Declaration::Struct(pixel)) = registry.get("Pixel") else {
        panic!("Pixel should be a struct");
    };
    assert_eq!(pixel.fields[0].type_, TypeRef::Named { name: "Color".into(), passing: Passing::ByValue });
    assert_eq!(pixel.fields[0].type_.c_type().as_deref(), Some("Color"));
    assert_eq!(pixel.fields[1].type_.passing(), Passing::ByReference);
    assert_eq!(pixel.fields[2].type_.c_type().as_deref(), Some("Pixel *"));
    assert!(registry.is_enum_like("ShapeKind"));
}

#[test]
fn comments_and_continuations() {
    let out = definitions(
        "# A schema with a multi-line declaration\n\
         \n\
         { 'type': 'Window',\n\
         \x20 'data': { 'title': 'str',\n\
         \x20           '*tags': ['str'] } }\n",
    );
    assert!(out.contains("visit_type_str(m, (obj && *obj) ? &(*obj)->title : NULL, \"title\", errp);"));
    assert!(out.contains("visit_type_strList(m, (obj && *obj) ? &(*obj)->tags : NULL, \"tags\", errp);"));
}

#[test]
fn failures_produce_no_output() {
    let cases = [
        "{ 'type': 'A', 'data': { 'b': 'Nope' } }\n",
        "{ 'type': 'A', 'data': {} }\n{ 'type': 'A', 'data': {} }\n",
        "{ 'type': 'A', 'union': 'A', 'data': {} }\n",
        "{ 'type': 'A', 'data': { 'b': ['int', 'str'] } }\n",
        "{ 'enum': 'E', 'data': ['x', 'x'] }\n",
        "{ 'enum': 'E', 'data': ['a-b', 'a_b'] }\n",
        "{ 'type': 'S', 'data': { 'x': 'int', '*x': 'int' } }\n",
    ];
    for text in cases {
        let err = compile_schema_to_c(text, &GeneratorOptions::default()).unwrap_err();
        assert!(matches!(err, GenError::Schema(_)), "{}: {:?}", text, err);
    }
}

#[test]
fn schema_errors_name_the_culprit() {
    let err = compile_schema("{ 'type': 'A', 'data': { 'geo': { 'pos': 'Pos' } } }\n").unwrap_err();
    assert!(matches!(
        &err,
        GenError::Schema(SchemaError::UnresolvedTypeReference { name, used_by })
            if name == "Pos" && used_by == "A.geo.pos"
    ));
    assert!(err.to_string().contains("\"A.geo.pos\""));
}
