use modelsmith::locate;
use modelsmith::mutation::{self, Cardinality, FieldSpec, RelationSpec};
use modelsmith::parser::Parser;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <model-name> [options]", args[0]);
        eprintln!("       {} --list [options]", args[0]);
        eprintln!();
        eprintln!("Options:");
        eprintln!("  -f, --field <name:Type[?]>            Add a scalar field (repeatable)");
        eprintln!("  -r, --relation <name:Target:card[?]>  Add a relation field (repeatable)");
        eprintln!("                                        card: n-1, 1-n, n-n, 1-1");
        eprintln!("  -s, --schema <file>                   Schema file (default: auto-locate)");
        process::exit(1);
    }

    let list_only = args[1] == "--list";
    let model_name = &args[1];
    let mut schema_path: Option<PathBuf> = None;
    let mut specs: Vec<FieldSpec> = Vec::new();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-f" | "--field" => {
                i += 1;
                if i < args.len() {
                    specs.push(parse_field_spec(&args[i]).unwrap_or_else(|| {
                        eprintln!("Invalid field spec: {}", args[i]);
                        process::exit(1);
                    }));
                }
            }
            "-r" | "--relation" => {
                i += 1;
                if i < args.len() {
                    specs.push(parse_relation_spec(&args[i]).unwrap_or_else(|| {
                        eprintln!("Invalid relation spec: {}", args[i]);
                        process::exit(1);
                    }));
                }
            }
            "-s" | "--schema" => {
                i += 1;
                if i < args.len() {
                    schema_path = Some(PathBuf::from(&args[i]));
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    if !list_only && !valid_model_name(model_name) {
        eprintln!(
            "Invalid model name: {} (must start with an uppercase letter)",
            model_name
        );
        process::exit(1);
    }

    let path = match schema_path.or_else(locate::find_schema) {
        Some(p) => p,
        None if list_only => {
            eprintln!("No schema file found");
            process::exit(1);
        }
        None => {
            let p = PathBuf::from(locate::DEFAULT_SCHEMA_PATH);
            if let Err(e) = locate::bootstrap(&p) {
                eprintln!("Failed to create {}: {}", p.display(), e);
                process::exit(1);
            }
            println!("Created {}", p.display());
            p
        }
    };

    let input = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path.display(), e);
            process::exit(1);
        }
    };

    let mut parser = match Parser::new(&input) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Lex error: {}", e);
            process::exit(1);
        }
    };

    let schema = match parser.parse() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            process::exit(1);
        }
    };

    if list_only {
        for name in schema.model_names() {
            println!("{}", name);
        }
        return;
    }

    let schema = mutation::mutate(schema, model_name, &specs);

    if let Err(e) = locate::write_schema(&path, &schema) {
        eprintln!("Failed to write {}: {}", path.display(), e);
        process::exit(1);
    }

    println!("Updated {}", path.display());
}

fn valid_model_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// `name:Type`, with a trailing `?` for an optional field.
fn parse_field_spec(spec: &str) -> Option<FieldSpec> {
    let (spec, optional) = split_optional(spec);
    let (name, typ) = spec.split_once(':')?;
    if name.is_empty() || typ.is_empty() || typ.contains(':') {
        return None;
    }
    Some(FieldSpec {
        name: name.to_string(),
        typ: typ.to_string(),
        optional,
        relation: None,
    })
}

/// `name:Target:cardinality`, with a trailing `?` for an optional field.
fn parse_relation_spec(spec: &str) -> Option<FieldSpec> {
    let (spec, optional) = split_optional(spec);
    let mut parts = spec.split(':');
    let name = parts.next()?;
    let target = parts.next()?;
    let cardinality = Cardinality::from_str(parts.next()?)?;
    if name.is_empty() || target.is_empty() || parts.next().is_some() {
        return None;
    }
    Some(FieldSpec {
        name: name.to_string(),
        typ: target.to_string(),
        optional,
        relation: Some(RelationSpec {
            cardinality,
            target_model: target.to_string(),
        }),
    })
}

fn split_optional(spec: &str) -> (&str, bool) {
    match spec.strip_suffix('?') {
        Some(rest) => (rest, true),
        None => (spec, false),
    }
}
