use std::str::FromStr;

use graphql_parser::schema::{
    Definition, Directive, DirectiveDefinition, DirectiveLocation, Document, EnumType, EnumValue,
    Field, InputObjectType, InputValue, InterfaceType, ObjectType, ScalarType, SchemaDefinition,
    Type, TypeDefinition, UnionType, Value,
};
use graphql_parser::Pos;
use tracing::trace;

use crate::introspection::{
    IntrospectionDirective, IntrospectionEnumValue, IntrospectionField, IntrospectionInputValue,
    IntrospectionNamedTypeRef, IntrospectionSchema, IntrospectionType, IntrospectionTypeRef,
    TypeKind,
};

pub type SchemaDocument = Document<'static, String>;

const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];
const SPECIFIED_DIRECTIVES: [&str; 4] = ["skip", "include", "deprecated", "specifiedBy"];
const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// Prints the schema as SDL, leaving out introspection types, built-in
/// scalars and the directives every GraphQL server has.
pub fn print_schema(schema: &IntrospectionSchema) -> String {
    schema_document(schema).to_string()
}

pub fn schema_document(schema: &IntrospectionSchema) -> SchemaDocument {
    let mut definitions = vec![];

    if let Some(schema_definition) = schema_definition(schema) {
        definitions.push(Definition::SchemaDefinition(schema_definition));
    }

    definitions.extend(
        schema
            .directives
            .iter()
            .filter(|directive| !SPECIFIED_DIRECTIVES.contains(&directive.name.as_str()))
            .map(|directive| Definition::DirectiveDefinition(directive_definition(directive))),
    );

    for ty in schema.types.iter() {
        if is_builtin_type(ty) {
            continue;
        }

        match type_definition(ty) {
            Some(definition) => definitions.push(Definition::TypeDefinition(definition)),
            None => trace!("type '{}' of kind {:?} has no SDL form", ty.name, ty.kind),
        }
    }

    Document { definitions }
}

fn is_builtin_type(ty: &IntrospectionType) -> bool {
    ty.is_introspection_type()
        || (ty.kind == TypeKind::Scalar && BUILTIN_SCALARS.contains(&ty.name.as_str()))
}

/// A `schema { ... }` block is only needed when a root type does not use its
/// conventional name.
fn schema_definition(schema: &IntrospectionSchema) -> Option<SchemaDefinition<'static, String>> {
    let root_name = |root: &Option<IntrospectionNamedTypeRef>| {
        root.as_ref().map(|root| root.name.clone())
    };
    let query = root_name(&schema.query_type);
    let mutation = root_name(&schema.mutation_type);
    let subscription = root_name(&schema.subscription_type);

    let is_conventional = [
        (&query, "Query"),
        (&mutation, "Mutation"),
        (&subscription, "Subscription"),
    ]
    .iter()
    .all(|(name, conventional)| name.as_deref().map_or(true, |name| name == *conventional));

    if is_conventional {
        return None;
    }

    Some(SchemaDefinition {
        position: Pos::default(),
        directives: vec![],
        query,
        mutation,
        subscription,
    })
}

fn type_definition(ty: &IntrospectionType) -> Option<TypeDefinition<'static, String>> {
    let definition = match ty.kind {
        TypeKind::Scalar => {
            let mut scalar = ScalarType::new(ty.name.clone());
            scalar.description = ty.description.clone();
            TypeDefinition::Scalar(scalar)
        }
        TypeKind::Object => {
            let mut object = ObjectType::new(ty.name.clone());
            object.description = ty.description.clone();
            object.implements_interfaces = named_types(ty.interfaces.as_deref());
            object.fields = ty.fields().iter().map(field).collect();
            TypeDefinition::Object(object)
        }
        TypeKind::Interface => {
            let mut interface = InterfaceType::new(ty.name.clone());
            interface.description = ty.description.clone();
            interface.implements_interfaces = named_types(ty.interfaces.as_deref());
            interface.fields = ty.fields().iter().map(field).collect();
            TypeDefinition::Interface(interface)
        }
        TypeKind::Union => {
            let mut union = UnionType::new(ty.name.clone());
            union.description = ty.description.clone();
            union.types = named_types(ty.possible_types.as_deref());
            TypeDefinition::Union(union)
        }
        TypeKind::Enum => {
            let mut enum_type = EnumType::new(ty.name.clone());
            enum_type.description = ty.description.clone();
            enum_type.values = ty
                .enum_values
                .iter()
                .flatten()
                .map(enum_value)
                .collect();
            TypeDefinition::Enum(enum_type)
        }
        TypeKind::InputObject => {
            let mut input_object = InputObjectType::new(ty.name.clone());
            input_object.description = ty.description.clone();
            input_object.fields = ty
                .input_fields
                .iter()
                .flatten()
                .map(input_value)
                .collect();
            TypeDefinition::InputObject(input_object)
        }
        TypeKind::List | TypeKind::NonNull => return None,
    };

    Some(definition)
}

fn named_types(type_refs: Option<&[IntrospectionTypeRef]>) -> Vec<String> {
    type_refs
        .unwrap_or_default()
        .iter()
        .filter_map(|type_ref| type_ref.named_type().map(str::to_string))
        .collect()
}

fn field(field: &IntrospectionField) -> Field<'static, String> {
    Field {
        position: Pos::default(),
        description: field.description.clone(),
        name: field.name.clone(),
        arguments: field.args.iter().map(input_value).collect(),
        field_type: type_from_ref(&field.field_type),
        directives: deprecated_directive(field.is_deprecated, field.deprecation_reason.as_deref()),
    }
}

fn input_value(value: &IntrospectionInputValue) -> InputValue<'static, String> {
    InputValue {
        position: Pos::default(),
        description: value.description.clone(),
        name: value.name.clone(),
        value_type: type_from_ref(&value.value_type),
        // Introspection already hands out the literal, so it is printed as-is.
        default_value: value.default_value.clone().map(Value::Enum),
        directives: vec![],
    }
}

fn enum_value(value: &IntrospectionEnumValue) -> EnumValue<'static, String> {
    let mut enum_value = EnumValue::new(value.name.clone());
    enum_value.description = value.description.clone();
    enum_value.directives =
        deprecated_directive(value.is_deprecated, value.deprecation_reason.as_deref());
    enum_value
}

fn directive_definition(directive: &IntrospectionDirective) -> DirectiveDefinition<'static, String> {
    let mut definition = DirectiveDefinition::new(directive.name.clone());
    definition.description = directive.description.clone();
    definition.arguments = directive.args.iter().map(input_value).collect();
    definition.repeatable = directive.is_repeatable;
    definition.locations = directive
        .locations
        .iter()
        .filter_map(|location| DirectiveLocation::from_str(location).ok())
        .collect();
    definition
}

fn type_from_ref(type_ref: &IntrospectionTypeRef) -> Type<'static, String> {
    match (type_ref.kind, &type_ref.of_type) {
        (TypeKind::NonNull, Some(of_type)) => Type::NonNullType(Box::new(type_from_ref(of_type))),
        (TypeKind::List, Some(of_type)) => Type::ListType(Box::new(type_from_ref(of_type))),
        _ => Type::NamedType(type_ref.named_type().unwrap_or_default().to_string()),
    }
}

fn deprecated_directive(
    is_deprecated: bool,
    reason: Option<&str>,
) -> Vec<Directive<'static, String>> {
    if !is_deprecated {
        return vec![];
    }

    let arguments = match reason {
        Some(reason) if reason != DEFAULT_DEPRECATION_REASON => {
            vec![("reason".to_string(), Value::String(reason.to_string()))]
        }
        _ => vec![],
    };

    vec![Directive {
        position: Pos::default(),
        name: "deprecated".to_string(),
        arguments,
    }]
}
