//! Schema file discovery and bootstrap.

use crate::ast::{Argument, Assignment, Block, Declaration, Schema};
use crate::serializer::serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCHEMA_PATH: &str = "prisma/schema.prisma";

/// Look for a schema file in the conventional locations, nearest first.
pub fn find_schema() -> Option<PathBuf> {
    [DEFAULT_SCHEMA_PATH, "schema.prisma"]
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Minimal starting schema: a generator block and a datasource block.
pub fn default_schema() -> Schema {
    Schema {
        declarations: vec![
            Declaration::Generator(Block {
                name: "client".into(),
                assignments: vec![Assignment {
                    key: "provider".into(),
                    value: Argument::Str("prisma-client-js".into()),
                }],
            }),
            Declaration::Datasource(Block {
                name: "db".into(),
                assignments: vec![
                    Assignment {
                        key: "provider".into(),
                        value: Argument::Str("postgresql".into()),
                    },
                    Assignment {
                        key: "url".into(),
                        value: Argument::Call(
                            "env".into(),
                            vec![Argument::Str("DATABASE_URL".into())],
                        ),
                    },
                ],
            }),
        ],
    }
}

/// Create the default schema file, including its parent directory.
pub fn bootstrap(path: &Path) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    write_schema(path, &default_schema())
}

/// Replace the file contents with the serialized schema in a single write.
pub fn write_schema(path: &Path, schema: &Schema) -> io::Result<()> {
    fs::write(path, serialize(schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    #[test]
    fn test_default_schema_text() {
        let text = serialize(&default_schema());
        assert!(text.contains("generator client {"));
        assert!(text.contains("  provider = \"prisma-client-js\""));
        assert!(text.contains("datasource db {"));
        assert!(text.contains("  url      = env(\"DATABASE_URL\")"));
    }

    #[test]
    fn test_default_schema_round_trips() {
        let schema = default_schema();
        let reparsed = Parser::new(&serialize(&schema)).unwrap().parse().unwrap();
        assert_eq!(schema, reparsed);
    }
}
