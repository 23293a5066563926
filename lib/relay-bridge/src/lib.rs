pub mod introspection;
pub mod merge;
pub mod rewrite;
pub mod sdl;

pub use introspection::{IntrospectionResponse, IntrospectionSchema, INTROSPECTION_QUERY};
pub use merge::{merge_schemas, SchemaMergeError};
pub use rewrite::{rewrite_subscription, PayloadTransform, RewriteResult};
pub use sdl::print_schema;

#[cfg(test)]
mod tests;
