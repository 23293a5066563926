//! Rewrites relay-shaped subscriptions into their simple counterpart.
//!
//! Only one document shape is recognized. Everything else is returned as-is
//! together with [`PayloadTransform::Identity`].
//!
//! ```text
//! Document   := ws "subscription" ws Name ws "{" ws RootField ws "}" ws EOF
//! RootField  := Name ws Arguments? ws "{" ws (Name ws)* Edge ws (Name ws)* "}"
//! Arguments  := "(" [^)]* ")"
//! Edge       := "edge" ws "{" ws Node ws "}"
//! Node       := "node" ws "{" [^{}]* "}"
//! Name       := [A-Za-z0-9_]+
//! ws         := (whitespace | ",")*
//! ```
//!
//! Selections inside `node` cannot nest, operations must be named and carry
//! no variable definitions, and only a single root field is allowed.

use serde_json::{json, Value};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadTransform {
    Identity,
    /// Moves `node` of the root field back under `edge`.
    RewrapEdge { field: String },
}

impl PayloadTransform {
    /// Reshapes a response of the rewritten query into the shape the
    /// original query asked for.
    pub fn apply(&self, data: Value) -> Value {
        match self {
            PayloadTransform::Identity => data,
            PayloadTransform::RewrapEdge { field } => rewrap_edge(data, field),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, PayloadTransform::Identity)
    }
}

fn rewrap_edge(mut data: Value, field: &str) -> Value {
    if let Some(Value::Object(payload)) = data.get_mut(field) {
        let node = payload.remove("node").unwrap_or(Value::Null);
        payload.insert("edge".to_string(), json!({ "node": node }));
    }

    data
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub query: String,
    pub payload_transform: PayloadTransform,
}

pub fn rewrite_subscription(query: &str) -> RewriteResult {
    match RelaySubscription::scan(query) {
        Some(subscription) => {
            trace!(
                "stripping edge from subscription field '{}'",
                subscription.field
            );

            let mut rewritten = String::with_capacity(query.len());
            rewritten.push_str(&query[..subscription.edge_start]);
            rewritten.push_str(&query[subscription.node_start..subscription.edge_close]);
            rewritten.push_str(&query[subscription.after_edge..]);

            RewriteResult {
                query: rewritten,
                payload_transform: PayloadTransform::RewrapEdge {
                    field: subscription.field.to_string(),
                },
            }
        }
        None => RewriteResult {
            query: query.to_string(),
            payload_transform: PayloadTransform::Identity,
        },
    }
}

/// Byte offsets of a recognized document.
struct RelaySubscription<'a> {
    field: &'a str,
    /// Start of the `edge` keyword.
    edge_start: usize,
    /// Start of the `node` keyword.
    node_start: usize,
    /// The closing brace of `edge`.
    edge_close: usize,
    /// First byte after the closing brace of `edge` and its trailing whitespace.
    after_edge: usize,
}

impl<'a> RelaySubscription<'a> {
    fn scan(source: &'a str) -> Option<Self> {
        let mut scanner = Scanner::new(source);

        scanner.skip_ignored();
        scanner.keyword("subscription")?;
        scanner.skip_ignored();
        scanner.name()?;
        scanner.skip_ignored();
        scanner.expect(b'{')?;
        scanner.skip_ignored();

        let field = scanner.name()?;
        scanner.skip_ignored();
        if scanner.peek() == Some(b'(') {
            scanner.skip_past(b')')?;
            scanner.skip_ignored();
        }
        scanner.expect(b'{')?;
        scanner.skip_ignored();

        let edge_start = loop {
            let start = scanner.position();
            let name = scanner.name()?;
            scanner.skip_ignored();
            if scanner.peek() == Some(b'{') {
                if name == "edge" {
                    break start;
                }
                return None;
            }
        };
        scanner.expect(b'{')?;
        scanner.skip_ignored();

        let node_start = scanner.position();
        scanner.keyword("node")?;
        scanner.skip_ignored();
        scanner.expect(b'{')?;
        loop {
            match scanner.bump()? {
                b'}' => break,
                b'{' => return None,
                _ => {}
            }
        }
        scanner.skip_ignored();

        let edge_close = scanner.position();
        scanner.expect(b'}')?;
        scanner.skip_ignored();
        let after_edge = scanner.position();

        while scanner.peek()? != b'}' {
            scanner.name()?;
            scanner.skip_ignored();
        }
        scanner.expect(b'}')?;
        scanner.skip_ignored();
        scanner.expect(b'}')?;
        scanner.skip_ignored();

        if !scanner.is_done() {
            return None;
        }

        Some(RelaySubscription {
            field,
            edge_start,
            node_start,
            edge_close,
            after_edge,
        })
    }
}

/// Byte cursor over the query. Every token of the grammar is ASCII, so all
/// offsets it hands out are char boundaries.
struct Scanner<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    fn position(&self) -> usize {
        self.position
    }

    fn is_done(&self) -> bool {
        self.position >= self.source.len()
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.position).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.position += 1;
        Some(byte)
    }

    fn skip_ignored(&mut self) {
        while let Some(byte) = self.peek() {
            if byte.is_ascii_whitespace() || byte == b',' {
                self.position += 1;
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: u8) -> Option<()> {
        (self.bump()? == expected).then_some(())
    }

    fn skip_past(&mut self, terminator: u8) -> Option<()> {
        while self.bump()? != terminator {}
        Some(())
    }

    fn name(&mut self) -> Option<&'a str> {
        let source = self.source;
        let start = self.position;
        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphanumeric() || byte == b'_' {
                self.position += 1;
            } else {
                break;
            }
        }

        (self.position > start).then(|| &source[start..self.position])
    }

    fn keyword(&mut self, keyword: &str) -> Option<()> {
        (self.name()? == keyword).then_some(())
    }
}
