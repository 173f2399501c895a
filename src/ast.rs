#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Generator(Block),
    Datasource(Block),
    Model(Model),
}

/// Configuration block: `generator client { ... }` or `datasource db { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub name: String,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub key: String,
    pub value: Argument,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Field(Field),
    /// Model-level `@@` attribute (e.g. `@@unique([a, b])`).
    Attribute(Attribute),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    /// Primitive type name, or another model's name (relation by convention).
    pub typ: String,
    pub optional: bool,
    pub array: bool,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub args: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Str(String),
    Ident(String),
    Int(i64),
    List(Vec<Argument>),
    Call(String, Vec<Argument>),
    KeyValue(String, Box<Argument>),
}

impl Schema {
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.declarations.iter().find_map(|d| match d {
            Declaration::Model(m) if m.name == name => Some(m),
            _ => None,
        })
    }

    pub fn model_names(&self) -> Vec<&str> {
        self.declarations
            .iter()
            .filter_map(|d| match d {
                Declaration::Model(m) => Some(m.name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.properties.iter().filter_map(|p| match p {
            Property::Field(f) => Some(f),
            Property::Attribute(_) => None,
        })
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn push_field(&mut self, field: Field) {
        self.properties.push(Property::Field(field));
    }
}

impl Field {
    pub fn scalar(name: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typ: typ.into(),
            optional: false,
            array: false,
            attributes: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

impl Attribute {
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }
}
