//! Connection types.
//!
//! A connection binds one producer output port to one [`Endpoint`]. Fan-out is
//! several connections from the same output port; every consumer receives its
//! own copy of each token, in production order.

use super::port::PortRef;

/// Unique identifier for a connection.
///
/// Connection IDs are assigned sequentially and never reused within a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub(crate) u32);

impl ConnectionId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Where a producer's tokens go.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Input port of another node.
    Port(PortRef),
    /// Appended to the aggregation pool under this key.
    Pool(String),
    /// Computed but intentionally unused.
    Discard,
}

impl Endpoint {
    /// Pool endpoint for `key`.
    pub fn pool(key: impl Into<String>) -> Self {
        Endpoint::Pool(key.into())
    }
}

impl From<PortRef> for Endpoint {
    fn from(port: PortRef) -> Self {
        Endpoint::Port(port)
    }
}

/// A directed connection from an output port to an endpoint.
#[derive(Debug, Clone)]
pub(crate) struct Connection {
    pub from: PortRef,
    pub to: Endpoint,
}
