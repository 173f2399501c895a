pub mod ast;
pub mod lexer;
pub mod locate;
pub mod mutation;
pub mod parser;
pub mod serializer;

use mutation::FieldSpec;
use parser::{ParseError, Parser};

/// Parse schema text, apply field specifications to the named model,
/// and return the updated canonical text.
pub fn apply(source: &str, model: &str, specs: &[FieldSpec]) -> Result<String, ParseError> {
    let mut parser = Parser::new(source)?;
    let schema = parser.parse()?;
    let schema = mutation::mutate(schema, model, specs);
    Ok(serializer::serialize(&schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutation::{Cardinality, RelationSpec};

    #[test]
    fn test_apply_end_to_end() {
        let source = r#"
            model Category {
                id Int @id @default(autoincrement())
            }
        "#;
        let specs = [
            FieldSpec {
                name: "title".into(),
                typ: "String".into(),
                optional: false,
                relation: None,
            },
            FieldSpec {
                name: "category".into(),
                typ: "Category".into(),
                optional: false,
                relation: Some(RelationSpec {
                    cardinality: Cardinality::ManyToOne,
                    target_model: "Category".into(),
                }),
            },
        ];

        let updated = apply(source, "Product", &specs).unwrap();

        assert!(updated.contains("model Product {"));
        assert!(updated.contains("@id @default(autoincrement())"));
        assert!(updated.contains(
            "category   Category @relation(\"Product_category\", fields: [categoryId], references: [id])"
        ));
        assert!(updated.contains("categoryId Int\n"));
        assert!(updated.contains("products Product[] @relation(\"Product_category\")"));

        // A second pass over its own output changes nothing
        assert_eq!(updated, apply(&updated, "Product", &specs).unwrap());
    }

    #[test]
    fn test_apply_rejects_malformed_input() {
        assert!(apply("model {", "Product", &[]).is_err());
    }
}
