use pretty_assertions::assert_eq;

use crate::{
    merge::merge_schemas, rewrite::rewrite_subscription, sdl::print_schema,
    tests::testkit::read_introspection,
};

#[test]
fn merges_simple_subscriptions_into_relay_schema() {
    let relay = read_introspection("fixture/relay.introspection.json");
    let simple = read_introspection("fixture/simple.introspection.json");

    let merged = merge_schemas(relay, simple).unwrap();

    insta::assert_snapshot!(print_schema(&merged), @r"
    type Query {
      viewer: Viewer!
      node(id: ID!): Node
    }

    interface Node {
      id: ID!
    }

    type Viewer {
      allPosts(first: Int): PostConnection!
      id: ID!
    }

    type Post implements Node {
      id: ID!
      title: String!
    }

    type PostConnection {
      edges: [PostEdge]
      count: Int!
    }

    type PostEdge {
      node: Post!
      cursor: String!
    }

    type Mutation {
      createPost(input: CreatePostInput!): CreatePostPayload
    }

    input CreatePostInput {
      title: String!
      clientMutationId: String!
    }

    type CreatePostPayload {
      post: Post
      edge: PostEdge
      clientMutationId: String!
    }

    type Subscription {
      Post(filter: PostSubscriptionFilter): PostSubscriptionPayload
    }

    type PostSubscriptionPayload {
      mutation: _ModelMutationType!
      edge: PostEdge
      updatedFields: [String!]
      previousValues: PostPreviousValues
    }

    type PostPreviousValues {
      id: ID!
      title: String!
    }

    enum _ModelMutationType {
      CREATED
      UPDATED
      DELETED
    }

    input PostSubscriptionFilter {
      mutation_in: [_ModelMutationType!]
    }
    ");
}

#[test]
fn relay_query_keeps_relay_definitions() {
    let relay = read_introspection("fixture/relay.introspection.json");
    let relay_query = relay.type_by_name("Query").cloned();
    let simple = read_introspection("fixture/simple.introspection.json");

    let merged = merge_schemas(relay, simple).unwrap();

    assert_eq!(merged.type_by_name("Query").cloned(), relay_query);
    assert_eq!(
        merged.mutation_type.as_ref().map(|root| root.name.as_str()),
        Some("Mutation")
    );
}

#[test]
fn rewritten_subscription_targets_merged_payload() {
    let relay = read_introspection("fixture/relay.introspection.json");
    let simple = read_introspection("fixture/simple.introspection.json");
    let merged = merge_schemas(relay, simple.clone()).unwrap();

    let result = rewrite_subscription(
        "subscription PostFeed { Post { mutation edge { node { id title } } } }",
    );

    // The relay client asks for `edge`, which only exists on the merged
    // schema, while the rewritten query asks for `node`, which the simple
    // endpoint serves.
    let merged_payload = merged.type_by_name("PostSubscriptionPayload").unwrap();
    let simple_payload = simple.type_by_name("PostSubscriptionPayload").unwrap();
    assert!(merged_payload.field_by_name("edge").is_some());
    assert!(simple_payload.field_by_name("node").is_some());
    assert_eq!(
        result.query,
        "subscription PostFeed { Post { mutation node { id title } } }"
    );
}
