//! Schema tree mutation: locate-or-create a model and synthesize
//! scalar and relation fields with their foreign-key wiring.

use crate::ast::{Argument, Attribute, Declaration, Field, Model, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ManyToOne,
    OneToMany,
    ManyToMany,
    OneToOne,
}

impl Cardinality {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "n-1" => Some(Self::ManyToOne),
            "1-n" => Some(Self::OneToMany),
            "n-n" => Some(Self::ManyToMany),
            "1-1" => Some(Self::OneToOne),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationSpec {
    pub cardinality: Cardinality,
    pub target_model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    /// Scalar type name, or ignored in favor of the relation target.
    pub typ: String,
    pub optional: bool,
    pub relation: Option<RelationSpec>,
}

/// Apply a batch of field specifications to the named model,
/// creating the model first if the tree has no declaration for it.
/// Requests whose field name is already taken are skipped, which makes
/// repeated calls with overlapping specs idempotent.
pub fn mutate(mut schema: Schema, model_name: &str, specs: &[FieldSpec]) -> Schema {
    let owner = resolve_model(&mut schema, model_name);

    for spec in specs {
        match &spec.relation {
            None => add_scalar(&mut schema, owner, spec),
            Some(relation) => add_relation(&mut schema, owner, model_name, spec, relation),
        }
    }

    schema
}

/// Index of the model declaration with this name, creating and appending
/// one (with its identity field) when absent.
fn resolve_model(schema: &mut Schema, name: &str) -> usize {
    if let Some(idx) = model_index(schema, name) {
        return idx;
    }

    let mut model = Model::new(name);
    model.push_field(identity_field());
    schema.declarations.push(Declaration::Model(model));
    schema.declarations.len() - 1
}

fn model_index(schema: &Schema, name: &str) -> Option<usize> {
    schema
        .declarations
        .iter()
        .position(|d| matches!(d, Declaration::Model(m) if m.name == name))
}

/// `id Int @id @default(autoincrement())`
fn identity_field() -> Field {
    Field {
        name: "id".into(),
        typ: "Int".into(),
        optional: false,
        array: false,
        attributes: vec![
            Attribute::bare("id"),
            Attribute {
                name: "default".into(),
                args: vec![Argument::Call("autoincrement".into(), vec![])],
            },
        ],
    }
}

/// First free name in the sequence `base`, `base_2`, `base_3`, ...
/// probed against the model's field names at call time.
fn unique_name(model: &Model, base: &str) -> String {
    if !model.has_field(base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if !model.has_field(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn unique_field_name(schema: &Schema, idx: usize, base: &str) -> String {
    match &schema.declarations[idx] {
        Declaration::Model(model) => unique_name(model, base),
        _ => base.to_string(),
    }
}

fn field_exists(schema: &Schema, idx: usize, name: &str) -> bool {
    matches!(&schema.declarations[idx], Declaration::Model(m) if m.has_field(name))
}

fn push_field(schema: &mut Schema, idx: usize, field: Field) {
    if let Declaration::Model(model) = &mut schema.declarations[idx] {
        model.push_field(field);
    }
}

fn push_field_if_absent(schema: &mut Schema, idx: usize, field: Field) {
    if !field_exists(schema, idx, &field.name) {
        push_field(schema, idx, field);
    }
}

fn add_scalar(schema: &mut Schema, owner: usize, spec: &FieldSpec) {
    if field_exists(schema, owner, &spec.name) {
        return;
    }
    push_field(
        schema,
        owner,
        Field {
            name: spec.name.clone(),
            typ: spec.typ.clone(),
            optional: spec.optional,
            array: false,
            attributes: Vec::new(),
        },
    );
}

/// Expand a relation request into fields on one or both sides.
/// The back-reference step is skipped when the target model is not in
/// the tree; the owning side is still created.
fn add_relation(
    schema: &mut Schema,
    owner: usize,
    owner_name: &str,
    spec: &FieldSpec,
    relation: &RelationSpec,
) {
    if field_exists(schema, owner, &spec.name) {
        return;
    }

    // Both sides carry the same relation name, pairing them without a
    // global registry.
    let relation_name = format!("{}_{}", owner_name, spec.name);
    let fk_name = format!("{}Id", spec.name);
    let target = model_index(schema, &relation.target_model);

    match relation.cardinality {
        Cardinality::ManyToOne => {
            push_field(
                schema,
                owner,
                Field {
                    name: spec.name.clone(),
                    typ: relation.target_model.clone(),
                    optional: spec.optional,
                    array: false,
                    attributes: vec![relation_fk_attr(&relation_name, &fk_name)],
                },
            );
            push_field_if_absent(schema, owner, foreign_key(&fk_name, spec.optional, false));

            if let Some(target) = target {
                let name = unique_field_name(schema, target, &plural(owner_name));
                push_field(
                    schema,
                    target,
                    Field {
                        name,
                        typ: owner_name.into(),
                        optional: false,
                        array: true,
                        attributes: vec![relation_name_attr(&relation_name)],
                    },
                );
            }
        }
        Cardinality::OneToMany => {
            push_field(
                schema,
                owner,
                Field {
                    name: spec.name.clone(),
                    typ: relation.target_model.clone(),
                    optional: false,
                    array: true,
                    attributes: vec![relation_name_attr(&relation_name)],
                },
            );

            // The target becomes the "one" side holding the foreign key
            if let Some(target) = target {
                let name = unique_field_name(schema, target, &owner_name.to_lowercase());
                let back_fk = format!("{}Id", name);
                push_field(
                    schema,
                    target,
                    Field {
                        name,
                        typ: owner_name.into(),
                        optional: true,
                        array: false,
                        attributes: vec![relation_fk_attr(&relation_name, &back_fk)],
                    },
                );
                push_field_if_absent(schema, target, foreign_key(&back_fk, true, false));
            }
        }
        Cardinality::ManyToMany => {
            push_field(
                schema,
                owner,
                Field {
                    name: spec.name.clone(),
                    typ: relation.target_model.clone(),
                    optional: false,
                    array: true,
                    attributes: Vec::new(),
                },
            );

            if let Some(target) = target {
                let name = unique_field_name(schema, target, &plural(owner_name));
                push_field(
                    schema,
                    target,
                    Field {
                        name,
                        typ: owner_name.into(),
                        optional: false,
                        array: true,
                        attributes: Vec::new(),
                    },
                );
            }
        }
        Cardinality::OneToOne => {
            push_field(
                schema,
                owner,
                Field {
                    name: spec.name.clone(),
                    typ: relation.target_model.clone(),
                    optional: spec.optional,
                    array: false,
                    attributes: vec![relation_fk_attr(&relation_name, &fk_name)],
                },
            );
            push_field_if_absent(schema, owner, foreign_key(&fk_name, spec.optional, true));

            if let Some(target) = target {
                let name = unique_field_name(schema, target, &owner_name.to_lowercase());
                push_field(
                    schema,
                    target,
                    Field {
                        name,
                        typ: owner_name.into(),
                        optional: true,
                        array: false,
                        attributes: vec![relation_name_attr(&relation_name)],
                    },
                );
            }
        }
    }
}

/// Shadow foreign-key column backing a relation field.
fn foreign_key(name: &str, optional: bool, unique: bool) -> Field {
    let mut field = Field::scalar(name, "Int");
    field.optional = optional;
    if unique {
        field.attributes.push(Attribute::bare("unique"));
    }
    field
}

/// `@relation("Name")` - the side without the foreign key.
fn relation_name_attr(name: &str) -> Attribute {
    Attribute {
        name: "relation".into(),
        args: vec![Argument::Str(name.into())],
    }
}

/// `@relation("Name", fields: [fk], references: [id])`
fn relation_fk_attr(name: &str, fk: &str) -> Attribute {
    Attribute {
        name: "relation".into(),
        args: vec![
            Argument::Str(name.into()),
            Argument::KeyValue(
                "fields".into(),
                Box::new(Argument::List(vec![Argument::Ident(fk.into())])),
            ),
            Argument::KeyValue(
                "references".into(),
                Box::new(Argument::List(vec![Argument::Ident("id".into())])),
            ),
        ],
    }
}

/// Naive `lowercase(name) + "s"`; no irregular-plural handling.
fn plural(name: &str) -> String {
    format!("{}s", name.to_lowercase())
}
