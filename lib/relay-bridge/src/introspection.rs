//! Owned model of a GraphQL `__schema` introspection result.
//!
//! The shapes follow the standard introspection query, so a response from any
//! GraphQL server deserializes straight into [`IntrospectionResponse`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The query sent to both endpoints. Type references are unwrapped seven
/// levels deep, which covers anything like `[[Foo!]!]!`.
pub const INTROSPECTION_QUERY: &str = r#"query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      ...FullType
    }
    directives {
      name
      description
      locations
      args {
        ...InputValue
      }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type {
      ...TypeRef
    }
    isDeprecated
    deprecationReason
  }
  inputFields {
    ...InputValue
  }
  interfaces {
    ...TypeRef
  }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrospectionNamedTypeRef {
    pub name: String,
}

impl IntrospectionNamedTypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A (possibly wrapped) reference to a named type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionTypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub of_type: Option<Box<IntrospectionTypeRef>>,
}

impl IntrospectionTypeRef {
    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            of_type: None,
        }
    }

    pub fn non_null(of_type: IntrospectionTypeRef) -> Self {
        Self {
            kind: TypeKind::NonNull,
            name: None,
            of_type: Some(Box::new(of_type)),
        }
    }

    pub fn list(of_type: IntrospectionTypeRef) -> Self {
        Self {
            kind: TypeKind::List,
            name: None,
            of_type: Some(Box::new(of_type)),
        }
    }

    /// The name at the bottom of the `NON_NULL`/`LIST` wrapper chain.
    pub fn named_type(&self) -> Option<&str> {
        match (&self.name, &self.of_type) {
            (Some(name), _) => Some(name.as_str()),
            (None, Some(of_type)) => of_type.named_type(),
            (None, None) => None,
        }
    }

    pub fn named_type_mut(&mut self) -> Option<&mut String> {
        match (&mut self.name, &mut self.of_type) {
            (Some(name), _) => Some(name),
            (None, Some(of_type)) => of_type.named_type_mut(),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionInputValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub value_type: IntrospectionTypeRef,
    /// The default value as a GraphQL literal, e.g. `"10"` or `"{a: 1}"`.
    #[serde(default)]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    pub field_type: IntrospectionTypeRef,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

impl IntrospectionField {
    pub fn new(name: impl Into<String>, field_type: IntrospectionTypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            args: vec![],
            field_type,
            is_deprecated: false,
            deprecation_reason: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionEnumValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionType {
    pub kind: TypeKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<IntrospectionField>>,
    #[serde(default)]
    pub input_fields: Option<Vec<IntrospectionInputValue>>,
    #[serde(default)]
    pub interfaces: Option<Vec<IntrospectionTypeRef>>,
    #[serde(default)]
    pub enum_values: Option<Vec<IntrospectionEnumValue>>,
    #[serde(default)]
    pub possible_types: Option<Vec<IntrospectionTypeRef>>,
}

impl IntrospectionType {
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: None,
            fields: None,
            input_fields: None,
            interfaces: None,
            enum_values: None,
            possible_types: None,
        }
    }

    pub fn object(name: impl Into<String>, fields: Vec<IntrospectionField>) -> Self {
        Self {
            fields: Some(fields),
            interfaces: Some(vec![]),
            ..Self::new(TypeKind::Object, name)
        }
    }

    pub fn fields(&self) -> &[IntrospectionField] {
        self.fields.as_deref().unwrap_or_default()
    }

    pub fn field_by_name(&self, name: &str) -> Option<&IntrospectionField> {
        self.fields().iter().find(|field| field.name == name)
    }

    pub fn field_by_name_mut(&mut self, name: &str) -> Option<&mut IntrospectionField> {
        self.fields
            .as_mut()
            .and_then(|fields| fields.iter_mut().find(|field| field.name == name))
    }

    pub fn is_introspection_type(&self) -> bool {
        self.name.starts_with("__")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionDirective {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
    #[serde(default)]
    pub is_repeatable: bool,
}

/// Named types of a schema, keyed by name in declaration order.
///
/// Serializes as the plain `types` array of the introspection result. When a
/// name appears more than once the first definition is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "Vec<IntrospectionType>",
    into = "Vec<IntrospectionType>"
)]
pub struct TypeRegistry {
    types: IndexMap<String, IntrospectionType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&IntrospectionType> {
        self.types.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut IntrospectionType> {
        self.types.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Appends `ty` unless a type with the same name is already registered.
    /// Returns `false` when the existing definition was kept.
    pub fn insert_if_absent(&mut self, ty: IntrospectionType) -> bool {
        match self.types.entry(ty.name.clone()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(ty);
                true
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &IntrospectionType> {
        self.types.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<IntrospectionType> for TypeRegistry {
    fn from_iter<I: IntoIterator<Item = IntrospectionType>>(iter: I) -> Self {
        let mut registry = TypeRegistry::new();
        for ty in iter {
            registry.insert_if_absent(ty);
        }
        registry
    }
}

impl From<Vec<IntrospectionType>> for TypeRegistry {
    fn from(types: Vec<IntrospectionType>) -> Self {
        types.into_iter().collect()
    }
}

impl From<TypeRegistry> for Vec<IntrospectionType> {
    fn from(registry: TypeRegistry) -> Self {
        registry.into_iter().collect()
    }
}

impl IntoIterator for TypeRegistry {
    type Item = IntrospectionType;
    type IntoIter = indexmap::map::IntoValues<String, IntrospectionType>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.into_values()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    #[serde(default)]
    pub query_type: Option<IntrospectionNamedTypeRef>,
    #[serde(default)]
    pub mutation_type: Option<IntrospectionNamedTypeRef>,
    #[serde(default)]
    pub subscription_type: Option<IntrospectionNamedTypeRef>,
    pub types: TypeRegistry,
    #[serde(default)]
    pub directives: Vec<IntrospectionDirective>,
}

impl IntrospectionSchema {
    pub fn type_by_name(&self, name: &str) -> Option<&IntrospectionType> {
        self.types.get(name)
    }

    pub fn subscription_type_name(&self) -> Option<&str> {
        self.subscription_type.as_ref().map(|root| root.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntrospectionResponseError {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IntrospectionData {
    #[serde(rename = "__schema", default)]
    pub schema: Option<IntrospectionSchema>,
}

/// The `{ data, errors }` envelope returned by a GraphQL endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IntrospectionResponse {
    #[serde(default)]
    pub data: Option<IntrospectionData>,
    #[serde(default)]
    pub errors: Vec<IntrospectionResponseError>,
}

impl IntrospectionResponse {
    pub fn into_schema(self) -> Option<IntrospectionSchema> {
        self.data.and_then(|data| data.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn named_type_unwraps_wrappers() {
        let type_ref = IntrospectionTypeRef::non_null(IntrospectionTypeRef::list(
            IntrospectionTypeRef::non_null(IntrospectionTypeRef::named(TypeKind::Object, "Post")),
        ));

        assert_eq!(type_ref.named_type(), Some("Post"));
    }

    #[test]
    fn registry_keeps_first_definition_and_order() {
        let registry: TypeRegistry = vec![
            IntrospectionType::object("Post", vec![]),
            IntrospectionType::new(TypeKind::Scalar, "DateTime"),
            IntrospectionType::new(TypeKind::Scalar, "Post"),
        ]
        .into();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Post", "DateTime"]);
        assert_eq!(registry.get("Post").map(|t| t.kind), Some(TypeKind::Object));
    }

    #[test]
    fn deserializes_introspection_response() {
        let raw = r#"{
          "data": {
            "__schema": {
              "queryType": { "name": "Query" },
              "mutationType": null,
              "subscriptionType": null,
              "types": [
                {
                  "kind": "OBJECT",
                  "name": "Query",
                  "description": null,
                  "fields": [
                    {
                      "name": "allPosts",
                      "description": null,
                      "args": [],
                      "type": {
                        "kind": "NON_NULL",
                        "name": null,
                        "ofType": {
                          "kind": "LIST",
                          "name": null,
                          "ofType": { "kind": "OBJECT", "name": "Post", "ofType": null }
                        }
                      },
                      "isDeprecated": false,
                      "deprecationReason": null
                    }
                  ],
                  "inputFields": null,
                  "interfaces": [],
                  "enumValues": null,
                  "possibleTypes": null
                }
              ],
              "directives": []
            }
          }
        }"#;

        let response: IntrospectionResponse = serde_json::from_str(raw).unwrap();
        assert!(response.errors.is_empty());

        let schema = response.into_schema().unwrap();
        assert_eq!(schema.query_type, Some(IntrospectionNamedTypeRef::new("Query")));
        assert_eq!(schema.subscription_type_name(), None);

        let query = schema.type_by_name("Query").unwrap();
        let all_posts = query.field_by_name("allPosts").unwrap();
        assert_eq!(all_posts.field_type.kind, TypeKind::NonNull);
        assert_eq!(all_posts.field_type.named_type(), Some("Post"));
    }

    #[test]
    fn types_serialize_as_array() {
        let schema = IntrospectionSchema {
            query_type: Some(IntrospectionNamedTypeRef::new("Query")),
            types: vec![IntrospectionType::new(TypeKind::Scalar, "DateTime")].into(),
            ..Default::default()
        };

        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["types"][0]["name"], "DateTime");
        assert_eq!(value["types"][0]["kind"], "SCALAR");
        assert_eq!(value["queryType"]["name"], "Query");
    }
}
