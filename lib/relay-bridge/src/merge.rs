use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::introspection::{IntrospectionSchema, IntrospectionType};

const NODE_FIELD: &str = "node";
const EDGE_FIELD: &str = "edge";
const EDGE_SUFFIX: &str = "Edge";
const UNNAMED_TYPE: &str = "<unnamed>";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaMergeError {
    #[error("subscription schema must include a subscription type")]
    MissingSubscriptionType,
    #[error("subscription type '{0}' is not declared in the subscription schema")]
    UnresolvedSubscriptionType(String),
    #[error("payload type '{type_name}' of subscription field '{field}' is not declared in the subscription schema")]
    UnresolvedPayloadType { field: String, type_name: String },
}

/// Grafts the subscription root of `subscription` into `base`.
///
/// Payload types have their `node` field turned into an `edge` field of the
/// matching `<Type>Edge` type before being copied. Types already declared in
/// `base` are never replaced.
pub fn merge_schemas(
    base: IntrospectionSchema,
    mut subscription: IntrospectionSchema,
) -> Result<IntrospectionSchema, SchemaMergeError> {
    let subscription_root = subscription
        .subscription_type
        .clone()
        .ok_or(SchemaMergeError::MissingSubscriptionType)?;

    let payload_types = collect_payload_types(&subscription, &subscription_root.name)?;
    debug!(
        "found {} subscription payload types on '{}'",
        payload_types.len(),
        subscription_root.name
    );

    for type_name in &payload_types {
        // Presence was checked while collecting.
        if let Some(payload) = subscription.types.get_mut(type_name) {
            wrap_node_into_edge(payload);
        }
    }

    let mut merged = base;
    merged.subscription_type = Some(subscription_root);

    for ty in subscription.types {
        let name = ty.name.clone();
        if merged.types.insert_if_absent(ty) {
            trace!("included type '{}' from subscription schema", name);
        } else {
            trace!("kept base definition of type '{}'", name);
        }
    }

    for directive in subscription.directives {
        if !merged.directives.iter().any(|d| d.name == directive.name) {
            merged.directives.push(directive);
        }
    }

    Ok(merged)
}

/// Names of the types returned by the fields of the subscription root, in
/// field order and without duplicates.
fn collect_payload_types(
    schema: &IntrospectionSchema,
    root_name: &str,
) -> Result<IndexSet<String>, SchemaMergeError> {
    let root = schema
        .type_by_name(root_name)
        .ok_or_else(|| SchemaMergeError::UnresolvedSubscriptionType(root_name.to_string()))?;

    let mut payload_types = IndexSet::new();

    for field in root.fields() {
        let Some(type_name) = field.field_type.named_type() else {
            return Err(SchemaMergeError::UnresolvedPayloadType {
                field: field.name.clone(),
                type_name: UNNAMED_TYPE.to_string(),
            });
        };

        if !schema.types.contains(type_name) {
            return Err(SchemaMergeError::UnresolvedPayloadType {
                field: field.name.clone(),
                type_name: type_name.to_string(),
            });
        }

        payload_types.insert(type_name.to_string());
    }

    Ok(payload_types)
}

/// Renames `node: X` to `edge: XEdge`. Payloads without a `node` field are
/// left as they are.
fn wrap_node_into_edge(payload: &mut IntrospectionType) {
    let payload_name = payload.name.clone();
    let Some(node) = payload.field_by_name_mut(NODE_FIELD) else {
        trace!("payload type '{}' has no node field", payload_name);
        return;
    };

    node.name = EDGE_FIELD.to_string();
    if let Some(type_name) = node.field_type.named_type_mut() {
        type_name.push_str(EDGE_SUFFIX);
        trace!("wrapped node of '{}' into '{}'", payload_name, type_name);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{merge_schemas, SchemaMergeError};
    use crate::introspection::{
        IntrospectionField, IntrospectionNamedTypeRef, IntrospectionSchema, IntrospectionType,
        IntrospectionTypeRef, TypeKind,
    };

    fn object_ref(name: &str) -> IntrospectionTypeRef {
        IntrospectionTypeRef::named(TypeKind::Object, name)
    }

    fn scalar_field(name: &str, scalar: &str) -> IntrospectionField {
        IntrospectionField::new(name, IntrospectionTypeRef::named(TypeKind::Scalar, scalar))
    }

    fn post() -> IntrospectionType {
        IntrospectionType::object(
            "Post",
            vec![
                scalar_field("id", "ID"),
                scalar_field("title", "String"),
            ],
        )
    }

    fn base_schema() -> IntrospectionSchema {
        IntrospectionSchema {
            query_type: Some(IntrospectionNamedTypeRef::new("Query")),
            types: vec![
                IntrospectionType::object(
                    "Query",
                    vec![IntrospectionField::new("post", object_ref("Post"))],
                ),
                post(),
            ]
            .into(),
            ..Default::default()
        }
    }

    fn subscription_schema() -> IntrospectionSchema {
        IntrospectionSchema {
            query_type: Some(IntrospectionNamedTypeRef::new("Query")),
            subscription_type: Some(IntrospectionNamedTypeRef::new("Subscription")),
            types: vec![
                IntrospectionType::object(
                    "Subscription",
                    vec![IntrospectionField::new(
                        "newPost",
                        object_ref("PostSubscriptionPayload"),
                    )],
                ),
                IntrospectionType::object(
                    "PostSubscriptionPayload",
                    vec![
                        IntrospectionField::new("node", object_ref("Post")),
                        IntrospectionField::new(
                            "mutation",
                            IntrospectionTypeRef::non_null(IntrospectionTypeRef::named(
                                TypeKind::Enum,
                                "_ModelMutationType",
                            )),
                        ),
                    ],
                ),
                post(),
            ]
            .into(),
            ..Default::default()
        }
    }

    #[test]
    fn wraps_payload_node_into_edge() {
        let merged = merge_schemas(base_schema(), subscription_schema()).unwrap();

        let payload = merged.type_by_name("PostSubscriptionPayload").unwrap();
        let field_names: Vec<_> = payload.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(field_names, vec!["edge", "mutation"]);
        assert!(payload.field_by_name("node").is_none());

        let edge = payload.field_by_name("edge").unwrap();
        assert_eq!(edge.field_type.named_type(), Some("PostEdge"));
        assert_eq!(edge.field_type.kind, TypeKind::Object);
    }

    #[test]
    fn adopts_subscription_root_and_exclusive_types() {
        let merged = merge_schemas(base_schema(), subscription_schema()).unwrap();

        assert_eq!(
            merged.subscription_type,
            Some(IntrospectionNamedTypeRef::new("Subscription"))
        );
        assert_eq!(
            merged.types.names().collect::<Vec<_>>(),
            vec!["Query", "Post", "Subscription", "PostSubscriptionPayload"]
        );
    }

    #[test]
    fn wraps_named_type_under_non_null() {
        let mut subscription = subscription_schema();
        let payload = subscription
            .types
            .get_mut("PostSubscriptionPayload")
            .unwrap();
        payload.field_by_name_mut("node").unwrap().field_type =
            IntrospectionTypeRef::non_null(object_ref("Post"));

        let merged = merge_schemas(base_schema(), subscription).unwrap();
        let edge = merged
            .type_by_name("PostSubscriptionPayload")
            .and_then(|t| t.field_by_name("edge"))
            .unwrap();

        assert_eq!(
            edge.field_type,
            IntrospectionTypeRef::non_null(object_ref("PostEdge"))
        );
    }

    #[test]
    fn base_definition_wins_on_name_collision() {
        let user = IntrospectionType::object(
            "User",
            vec![scalar_field("id", "ID"), scalar_field("name", "String")],
        );
        let mut base = base_schema();
        base.types.insert_if_absent(user.clone());

        let mut subscription = subscription_schema();
        subscription.types.insert_if_absent(IntrospectionType::object(
            "User",
            vec![scalar_field("id", "ID"), scalar_field("email", "String")],
        ));

        let merged = merge_schemas(base, subscription).unwrap();
        assert_eq!(merged.type_by_name("User"), Some(&user));
    }

    #[test]
    fn merging_twice_does_not_grow_type_list() {
        let once = merge_schemas(base_schema(), subscription_schema()).unwrap();
        let size_after_first = once.types.len();

        let twice = merge_schemas(once, subscription_schema()).unwrap();
        assert_eq!(twice.types.len(), size_after_first);

        // The payload merged first is kept, so it stays edge-wrapped.
        let payload = twice.type_by_name("PostSubscriptionPayload").unwrap();
        assert_eq!(
            payload
                .field_by_name("edge")
                .and_then(|f| f.field_type.named_type()),
            Some("PostEdge")
        );
    }

    #[test]
    fn payload_without_node_is_untouched() {
        let mut subscription = subscription_schema();
        let deleted = IntrospectionType::object(
            "PostDeletedPayload",
            vec![scalar_field("deletedId", "ID")],
        );
        subscription.types.insert_if_absent(deleted.clone());
        if let Some(fields) = subscription
            .types
            .get_mut("Subscription")
            .and_then(|root| root.fields.as_mut())
        {
            fields.push(IntrospectionField::new(
                "deletedPost",
                object_ref("PostDeletedPayload"),
            ));
        }

        let merged = merge_schemas(base_schema(), subscription).unwrap();
        assert_eq!(merged.type_by_name("PostDeletedPayload"), Some(&deleted));
    }

    #[test]
    fn payload_shared_by_two_fields_is_wrapped_once() {
        let mut subscription = subscription_schema();
        if let Some(fields) = subscription
            .types
            .get_mut("Subscription")
            .and_then(|root| root.fields.as_mut())
        {
            fields.push(IntrospectionField::new(
                "updatedPost",
                object_ref("PostSubscriptionPayload"),
            ));
        }

        let merged = merge_schemas(base_schema(), subscription).unwrap();
        let edge = merged
            .type_by_name("PostSubscriptionPayload")
            .and_then(|t| t.field_by_name("edge"))
            .unwrap();
        assert_eq!(edge.field_type.named_type(), Some("PostEdge"));
    }

    #[test]
    fn non_payload_types_keep_their_node_field() {
        let mut subscription = subscription_schema();
        subscription.types.insert_if_absent(IntrospectionType::object(
            "TreeItem",
            vec![IntrospectionField::new("node", object_ref("Post"))],
        ));

        let merged = merge_schemas(base_schema(), subscription).unwrap();
        let tree_item = merged.type_by_name("TreeItem").unwrap();
        assert!(tree_item.field_by_name("node").is_some());
    }

    // Older tooling only logged a missing subscription type and then crashed
    // on the null root. Here it is an error, raised before either schema is
    // touched.
    #[test]
    fn missing_subscription_type_fails_fast() {
        let mut subscription = subscription_schema();
        subscription.subscription_type = None;

        assert_eq!(
            merge_schemas(base_schema(), subscription),
            Err(SchemaMergeError::MissingSubscriptionType)
        );
    }

    #[test]
    fn undeclared_subscription_root_is_reported() {
        let mut subscription = subscription_schema();
        subscription.subscription_type = Some(IntrospectionNamedTypeRef::new("RootSubscription"));

        assert_eq!(
            merge_schemas(base_schema(), subscription),
            Err(SchemaMergeError::UnresolvedSubscriptionType(
                "RootSubscription".to_string()
            ))
        );
    }

    #[test]
    fn payload_field_without_named_type_is_reported() {
        let mut subscription = subscription_schema();
        if let Some(fields) = subscription
            .types
            .get_mut("Subscription")
            .and_then(|root| root.fields.as_mut())
        {
            fields.push(IntrospectionField::new(
                "broken",
                IntrospectionTypeRef {
                    kind: TypeKind::NonNull,
                    name: None,
                    of_type: None,
                },
            ));
        }

        assert_eq!(
            merge_schemas(base_schema(), subscription),
            Err(SchemaMergeError::UnresolvedPayloadType {
                field: "broken".to_string(),
                type_name: "<unnamed>".to_string(),
            })
        );
    }

    #[test]
    fn undeclared_payload_type_is_reported() {
        let mut subscription = subscription_schema();
        if let Some(fields) = subscription
            .types
            .get_mut("Subscription")
            .and_then(|root| root.fields.as_mut())
        {
            fields.push(IntrospectionField::new(
                "newComment",
                object_ref("CommentSubscriptionPayload"),
            ));
        }

        assert_eq!(
            merge_schemas(base_schema(), subscription),
            Err(SchemaMergeError::UnresolvedPayloadType {
                field: "newComment".to_string(),
                type_name: "CommentSubscriptionPayload".to_string(),
            })
        );
    }
}
