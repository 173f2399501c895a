//! Serializer for converting a schema tree to canonical DSL text.

use crate::ast::{Argument, Attribute, Block, Declaration, Field, Model, Property, Schema};
use unicode_width::UnicodeWidthStr;

/// Serialize a Schema to canonical schema text.
pub fn serialize(schema: &Schema) -> String {
    let mut output = String::new();

    for (i, declaration) in schema.declarations.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        match declaration {
            Declaration::Generator(block) => serialize_block(&mut output, "generator", block),
            Declaration::Datasource(block) => serialize_block(&mut output, "datasource", block),
            Declaration::Model(model) => serialize_model(&mut output, model),
        }
    }

    output
}

fn serialize_block(output: &mut String, keyword: &str, block: &Block) {
    output.push_str(&format!("{} {} {{\n", keyword, block.name));

    let key_width = block
        .assignments
        .iter()
        .map(|a| a.key.width())
        .max()
        .unwrap_or(0);

    for assignment in &block.assignments {
        output.push_str("  ");
        pad(output, &assignment.key, key_width);
        output.push_str(" = ");
        serialize_argument(output, &assignment.value);
        output.push('\n');
    }

    output.push_str("}\n");
}

fn serialize_model(output: &mut String, model: &Model) {
    output.push_str(&format!("model {} {{\n", model.name));

    // Field name and type columns are aligned per model
    let name_width = model.fields().map(|f| f.name.width()).max().unwrap_or(0);
    let type_width = model
        .fields()
        .map(|f| type_string(f).width())
        .max()
        .unwrap_or(0);

    for property in &model.properties {
        match property {
            Property::Field(field) => {
                serialize_field(output, field, name_width, type_width);
            }
            Property::Attribute(attribute) => {
                output.push_str("  @@");
                serialize_attribute(output, attribute);
                output.push('\n');
            }
        }
    }

    output.push_str("}\n");
}

fn type_string(field: &Field) -> String {
    if field.array {
        format!("{}[]", field.typ)
    } else if field.optional {
        format!("{}?", field.typ)
    } else {
        field.typ.clone()
    }
}

fn serialize_field(output: &mut String, field: &Field, name_width: usize, type_width: usize) {
    output.push_str("  ");
    pad(output, &field.name, name_width);
    output.push(' ');

    let typ = type_string(field);
    if field.attributes.is_empty() {
        // No trailing padding on attribute-less lines
        output.push_str(&typ);
    } else {
        pad(output, &typ, type_width);
        for attribute in &field.attributes {
            output.push_str(" @");
            serialize_attribute(output, attribute);
        }
    }

    output.push('\n');
}

fn serialize_attribute(output: &mut String, attribute: &Attribute) {
    output.push_str(&attribute.name);
    if !attribute.args.is_empty() {
        output.push('(');
        for (i, arg) in attribute.args.iter().enumerate() {
            if i > 0 {
                output.push_str(", ");
            }
            serialize_argument(output, arg);
        }
        output.push(')');
    }
}

fn serialize_argument(output: &mut String, argument: &Argument) {
    match argument {
        Argument::Str(s) => output.push_str(&format!("\"{}\"", s)),
        Argument::Ident(s) => output.push_str(s),
        Argument::Int(n) => output.push_str(&n.to_string()),
        Argument::List(items) => {
            output.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    output.push_str(", ");
                }
                serialize_argument(output, item);
            }
            output.push(']');
        }
        Argument::Call(name, args) => {
            output.push_str(name);
            output.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    output.push_str(", ");
                }
                serialize_argument(output, arg);
            }
            output.push(')');
        }
        Argument::KeyValue(key, value) => {
            output.push_str(key);
            output.push_str(": ");
            serialize_argument(output, value);
        }
    }
}

fn pad(output: &mut String, s: &str, width: usize) {
    output.push_str(s);
    for _ in s.width()..width {
        output.push(' ');
    }
}
