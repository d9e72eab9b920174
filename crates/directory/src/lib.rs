//! # pNode Directory
//!
//! Discovers cluster nodes through the RPC `getClusterNodes` call and turns
//! each descriptor into a fully-populated [`NodeRecord`].
//!
//! - [`client`]: the [`NodeDirectory`] trait, its JSON-RPC implementation and a mock
//! - [`normalize`]: sentinel substitution for fields the cluster did not report
//!
//! [`NodeRecord`]: pnode_common::NodeRecord

pub mod client;
pub mod normalize;

pub use client::{MockNodeDirectory, NodeDirectory, RpcNodeDirectory, CLUSTER_NODES_METHOD};
pub use normalize::{normalize_node, normalize_nodes, RawClusterNode};
