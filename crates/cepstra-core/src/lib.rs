//! Cepstra Core - dataflow model for frame-based feature extraction.
//!
//! This crate provides the execution core shared by every Cepstra pipeline:
//! typed ports, the processing graph, the scheduler, the aggregation pool and
//! the contracts leaf algorithms and composites implement. It contains no
//! signal processing of its own.
//!
//! # Core Abstractions
//!
//! ## Nodes
//!
//! - [`Algorithm`] - Object-safe trait for leaf processing units
//! - [`Composite`] - A node that owns a sub-graph and re-exposes proxy ports
//! - [`ParamDescriptor`] / [`ParameterMap`] - Declared, range-checked parameters
//!
//! ## Execution
//!
//! - [`ProcessingGraph`] - Node arena and wiring API (cycle-free by construction)
//! - [`Network`] - Compiled chain-from order, runs a graph to exhaustion
//! - [`Pool`] - Keyed, append-only store for terminal outputs
//!
//! ## Errors
//!
//! [`ConfigError`], [`GraphError`] and [`DataError`] separate configuration,
//! topology and run-time failures; [`Error`] wraps all three.
//!
//! # Feature Flags
//!
//! - `tracing` - emit `tracing` debug events for graph edits, compilation and runs

pub mod algorithm;
pub mod composite;
pub mod error;
pub mod graph;
pub mod param;
pub mod pool;

pub use algorithm::{Algorithm, StepStatus};
pub use composite::{Composite, SinkProxy, SourceProxy};
pub use error::{ConfigError, DataError, Error, GraphError, Result};
pub use graph::{
    ConnectionId, Endpoint, Network, NodeId, PortRef, PortSpec, PortType, ProcessingGraph,
    StepIo, Token,
};
pub use param::{MAX_FRAME_SIZE, ParamDescriptor, ParamRange, ParamValue, ParameterMap};
pub use pool::{Pool, PoolEntry, PoolValue};
