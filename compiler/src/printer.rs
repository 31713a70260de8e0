use crate::types::Document;

fn print_into(doc: &Document, out: &mut String) {
    match doc {
        Document::Literal(text) => {
            out.push('\'');
            out.push_str(text);
            out.push('\'');
        }
        Document::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                print_into(item, out);
            }
            out.push(']');
        }
        Document::Object(map) => {
            out.push('{');
            for (i, (key, value)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('\'');
                out.push_str(key);
                out.push_str("': ");
                print_into(value, out);
            }
            out.push('}');
        }
    }
}

/// Renders a document back into schema notation.
///
/// Literal text is written verbatim, so anything the tokenizer produced
/// re-tokenizes to the same literal. The output is a single line unless a
/// literal itself holds a newline.
pub fn print_document(doc: &Document) -> String {
    let mut out = String::new();
    print_into(doc, &mut out);
    out
}

/// Renders a schema file, one top-level document per line.
///
/// A literal holding a newline followed by a non-blank character does not
/// survive [`crate::parser::parse_schema`], which would start a new
/// expression at that line; such documents only round-trip through
/// [`crate::parser::evaluate`].
pub fn print_schema(docs: &[Document]) -> String {
    docs.iter().map(|doc| print_document(doc) + "\n").collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{evaluate, parse_schema};

    #[test]
    fn test_print_nested() {
        let doc = evaluate("{ 'type': 'A', 'data': { '*x': ['int'], 'y': {} } }", 1).unwrap();
        assert_eq!(print_document(&doc), "{'type': 'A', 'data': {'*x': ['int'], 'y': {}}}");
    }

    #[test]
    fn test_print_schema_reparses() {
        let text = "{ 'enum': 'Color',\n  'data': [ 'red', 'green' ] }\n# comment\n{ 'type': 'P', 'data': {} }\n";
        let docs = parse_schema(text).unwrap();
        let printed = print_schema(&docs);
        assert_eq!(printed.lines().count(), 2);
        assert_eq!(parse_schema(&printed).unwrap(), docs);
    }

    #[test]
    fn test_multiline_literal_round_trips_as_expression() {
        let doc = evaluate("{ 'doc': 'first\nsecond' }", 1).unwrap();
        let printed = print_document(&doc);
        assert_eq!(printed, "{'doc': 'first\nsecond'}");
        assert_eq!(evaluate(&printed, 1).unwrap(), doc);
        assert!(parse_schema(&print_schema(&[doc])).is_err());
    }

    #[test]
    fn test_escaped_literal_survives() {
        let doc = evaluate(r"'it\'s'", 1).unwrap();
        assert_eq!(print_document(&doc), r"'it\'s'");
        assert_eq!(evaluate(&print_document(&doc), 1).unwrap(), doc);
    }
}
