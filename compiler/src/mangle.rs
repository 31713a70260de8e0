//! Identifier mangling for generated C symbols.
//!
//! All functions here are pure string transforms.

/// Converts a CamelCase or dashed name to snake_case.
///
/// Every internal uppercase letter gets a `_` in front of it and `-` becomes
/// `_`, without ever producing two separators in a row from one boundary.
/// `"MyUnionKind"` → `"my_union_kind"`.
pub fn to_snake(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_uppercase() && !snake.is_empty() && !snake.ends_with('_') {
            snake.push('_');
        }
        if ch == '-' {
            snake.push('_');
        } else {
            snake.extend(ch.to_lowercase());
        }
    }
    snake
}

/// Converts a snake_case or dashed name to CamelCase.
///
/// Each chunk between `_`/`-` separators is capitalised and the rest of
/// the chunk lowercased. `"my_union-kind"` → `"MyUnionKind"`.
pub fn to_camel(name: &str) -> String {
    let mut camel = String::with_capacity(name.len());
    let mut word_start = true;
    for ch in name.chars() {
        if ch == '_' || ch == '-' {
            word_start = true;
        } else if word_start {
            camel.extend(ch.to_uppercase());
            word_start = false;
        } else {
            camel.extend(ch.to_lowercase());
        }
    }
    camel
}

/// C-safe variable name: drops the optional-field `*` marker, `-` → `_`.
pub fn c_var(name: &str) -> String {
    name.trim_start_matches('*').replace('-', "_")
}

/// C-safe function name fragment: like [`c_var`], and `.` → `_` as well.
pub fn c_fun(name: &str) -> String {
    c_var(name).replace('.', "_")
}

/// Name of the generated list type for an element type.
pub fn c_list_type(name: &str) -> String {
    format!("{}List", name)
}

/// Upper-case constant prefix of an enum, `"ShapeKind"` → `"SHAPE_KIND"`.
pub fn enum_const_prefix(enum_name: &str) -> String {
    c_fun(&to_snake(enum_name)).to_uppercase()
}

/// Enum constant for one value, `("ShapeKind", "circle")` → `"SHAPE_KIND_CIRCLE"`.
pub fn enum_const_name(enum_name: &str, value: &str) -> String {
    format!(
        "{}_{}",
        enum_const_prefix(enum_name),
        c_fun(&to_snake(value)).to_uppercase()
    )
}
