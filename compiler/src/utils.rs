use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref GUARD_SEPARATORS: Regex = Regex::new(r"[. \-]").unwrap();
}

/// JSON-style quoting for user text inside diagnostics.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Last path component of a `/`-separated file name.
pub fn basename(filename: &str) -> &str {
    filename.rsplit('/').next().unwrap_or(filename)
}

/// Include guard macro for a header file, e.g. `out/my-qapi-visit.h` → `MY_QAPI_VISIT_H`.
pub fn guard_name(filename: &str) -> String {
    let base = basename(filename);
    let stem = match base.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => base,
    };
    format!("{}_H", GUARD_SEPARATORS.replace_all(stem, "_").to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a\"b"), r#""a\"b""#);
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("out/dir/qapi-visit.h"), "qapi-visit.h");
        assert_eq!(basename("qapi-visit.h"), "qapi-visit.h");
    }

    #[test]
    fn test_guard_name() {
        assert_eq!(guard_name("qapi-visit.h"), "QAPI_VISIT_H");
        assert_eq!(guard_name("out/test-qapi-visit.h"), "TEST_QAPI_VISIT_H");
        assert_eq!(guard_name("my.gen qapi-visit.h"), "MY_GEN_QAPI_VISIT_H");
    }
}
