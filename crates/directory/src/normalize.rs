//! Normalization of upstream node descriptors.
//!
//! The RPC node reports whatever subset of fields it knows about. Every
//! missing, `null` or empty value is replaced with a sentinel so a
//! [`NodeRecord`] never carries an absent field:
//!
//! | Upstream field | Record field    | Sentinel    |
//! |----------------|-----------------|-------------|
//! | `gossip`       | `gossip_addr`   | `"N/A"`     |
//! | `tpu`          | `tpu_addr`      | `"N/A"`     |
//! | `rpc`          | `rpc_addr`      | `"N/A"`     |
//! | `version`      | `version`       | `"Unknown"` |
//! | `featureSet`   | `feature_set`   | `0`         |
//! | `shredVersion` | `shred_version` | `0`         |
//!
//! `pubkey` is the node identity and has no sentinel; a descriptor without
//! one makes the whole response malformed.

use serde::Deserialize;

use pnode_common::{DirectoryError, NodeRecord, ADDR_SENTINEL, VERSION_SENTINEL};

/// Node descriptor as returned by `getClusterNodes`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClusterNode {
    #[serde(default)]
    pub pubkey: Option<String>,
    #[serde(default)]
    pub gossip: Option<String>,
    #[serde(default)]
    pub tpu: Option<String>,
    #[serde(default)]
    pub rpc: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub feature_set: Option<u64>,
    #[serde(default)]
    pub shred_version: Option<u64>,
}

fn or_sentinel(value: Option<String>, sentinel: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => sentinel.to_string(),
    }
}

/// Converts one descriptor into a [`NodeRecord`].
pub fn normalize_node(raw: RawClusterNode) -> Result<NodeRecord, DirectoryError> {
    let pubkey = match raw.pubkey {
        Some(pk) if !pk.is_empty() => pk,
        _ => {
            return Err(DirectoryError::Malformed(
                "node descriptor without pubkey".to_string(),
            ))
        }
    };

    Ok(NodeRecord {
        pubkey,
        gossip_addr: or_sentinel(raw.gossip, ADDR_SENTINEL),
        tpu_addr: or_sentinel(raw.tpu, ADDR_SENTINEL),
        rpc_addr: or_sentinel(raw.rpc, ADDR_SENTINEL),
        version: or_sentinel(raw.version, VERSION_SENTINEL),
        feature_set: raw.feature_set.unwrap_or(0),
        shred_version: raw.shred_version.unwrap_or(0),
    })
}

/// Normalizes a whole response. All-or-nothing: one bad descriptor fails the batch.
pub fn normalize_nodes(raw: Vec<RawClusterNode>) -> Result<Vec<NodeRecord>, DirectoryError> {
    raw.into_iter().map(normalize_node).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RawClusterNode {
        serde_json::from_str(json).expect("descriptor should parse")
    }

    #[test]
    fn test_full_descriptor_kept_verbatim() {
        let raw = parse(
            r#"{
                "pubkey": "9QxCLckBiJc783jnMvXZubK4wH86Eqqvashtrwvcsgkv",
                "gossip": "10.0.0.1:8001",
                "tpu": "10.0.0.1:8003",
                "rpc": "10.0.0.1:8899",
                "version": "1.18.22",
                "featureSet": 3469865029,
                "shredVersion": 50093,
                "pubsub": "10.0.0.1:8900"
            }"#,
        );
        let node = normalize_node(raw).expect("should normalize");

        assert_eq!(node.pubkey, "9QxCLckBiJc783jnMvXZubK4wH86Eqqvashtrwvcsgkv");
        assert_eq!(node.gossip_addr, "10.0.0.1:8001");
        assert_eq!(node.tpu_addr, "10.0.0.1:8003");
        assert_eq!(node.rpc_addr, "10.0.0.1:8899");
        assert_eq!(node.version, "1.18.22");
        assert_eq!(node.feature_set, 3_469_865_029);
        assert_eq!(node.shred_version, 50093);
    }

    #[test]
    fn test_pubkey_only_gets_sentinels() {
        let node = normalize_node(parse(r#"{"pubkey":"pk"}"#)).expect("should normalize");
        assert_eq!(node, NodeRecord::with_pubkey("pk"));
    }

    #[test]
    fn test_null_and_empty_fields_get_sentinels() {
        let node = normalize_node(parse(
            r#"{"pubkey":"pk","gossip":null,"tpu":"","rpc":null,"version":"","featureSet":null,"shredVersion":null}"#,
        ))
        .expect("should normalize");

        assert_eq!(node.gossip_addr, ADDR_SENTINEL);
        assert_eq!(node.tpu_addr, ADDR_SENTINEL);
        assert_eq!(node.rpc_addr, ADDR_SENTINEL);
        assert_eq!(node.version, VERSION_SENTINEL);
        assert_eq!(node.feature_set, 0);
        assert_eq!(node.shred_version, 0);
    }

    #[test]
    fn test_missing_pubkey_is_malformed() {
        let result = normalize_node(parse(r#"{"gossip":"10.0.0.1:8001"}"#));
        assert!(matches!(result, Err(DirectoryError::Malformed(_))));
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let batch = vec![parse(r#"{"pubkey":"a"}"#), parse(r#"{"version":"2.0"}"#)];
        assert!(normalize_nodes(batch).is_err());
    }

    #[test]
    fn test_batch_preserves_upstream_order() {
        let batch = vec![
            parse(r#"{"pubkey":"z"}"#),
            parse(r#"{"pubkey":"a"}"#),
            parse(r#"{"pubkey":"m"}"#),
        ];
        let nodes = normalize_nodes(batch).expect("should normalize");
        let keys: Vec<_> = nodes.iter().map(|n| n.pubkey.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
