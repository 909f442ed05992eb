//! In-memory rainbow table
//!
//! Chains are kept in file order and indexed by endpoint. Chains that share an
//! endpoint are all kept; lookups return every one of them.

use crate::domain::chain::{Chain, ChainEntry, validate_chain_length};
use crate::domain::digest::Digest;
use crate::domain::hash::hash_password;
use crate::domain::password::Password;
use crate::domain::reduction::Reducer;
use crate::error::Result;
use std::sync::OnceLock;

#[cfg(feature = "hashmap-search")]
type Index<K> = rustc_hash::FxHashMap<K, Vec<usize>>;

#[cfg(not(feature = "hashmap-search"))]
type Index<K> = std::collections::HashMap<K, Vec<usize>>;

/// Read-only rainbow table
#[derive(Debug)]
pub struct Table {
    chain_length: u32,
    reducer: Reducer,
    entries: Vec<ChainEntry>,
    by_endpoint: Index<Password>,
    /// Built on first use: digest of each endpoint
    by_endpoint_digest: OnceLock<Index<Digest>>,
}

impl Table {
    /// Build a table from chain entries
    pub fn new(entries: Vec<ChainEntry>, chain_length: u32, reducer: Reducer) -> Result<Self> {
        validate_chain_length(chain_length)?;

        let mut by_endpoint = Index::<Password>::default();
        for (i, entry) in entries.iter().enumerate() {
            by_endpoint.entry(entry.end).or_default().push(i);
        }

        Ok(Self {
            chain_length,
            reducer,
            entries,
            by_endpoint,
            by_endpoint_digest: OnceLock::new(),
        })
    }

    /// Build a table from materialized chains of equal length
    pub fn from_chains(chains: &[Chain], chain_length: u32, reducer: Reducer) -> Result<Self> {
        let entries = chains.iter().map(Chain::entry).collect();
        Self::new(entries, chain_length, reducer)
    }

    pub fn chain_length(&self) -> u32 {
        self.chain_length
    }

    pub fn reducer(&self) -> Reducer {
        self.reducer
    }

    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    /// Number of chains
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chains ending at `endpoint`
    pub fn lookup(&self, endpoint: &Password) -> impl Iterator<Item = &ChainEntry> + '_ {
        self.by_endpoint
            .get(endpoint)
            .into_iter()
            .flatten()
            .map(move |&i| &self.entries[i])
    }

    /// Chains whose endpoint hashes to `digest`
    pub fn lookup_endpoint_digest(&self, digest: &Digest) -> impl Iterator<Item = &ChainEntry> + '_ {
        self.endpoint_digests()
            .get(digest)
            .into_iter()
            .flatten()
            .map(move |&i| &self.entries[i])
    }

    fn endpoint_digests(&self) -> &Index<Digest> {
        self.by_endpoint_digest.get_or_init(|| {
            let mut index = Index::<Digest>::default();
            for (endpoint, chains) in &self.by_endpoint {
                index
                    .entry(hash_password(endpoint))
                    .or_default()
                    .extend_from_slice(chains);
            }
            index
        })
    }

    /// Number of distinct endpoints
    pub fn distinct_endpoints(&self) -> usize {
        self.by_endpoint.len()
    }

    /// Number of chains whose endpoint is shared with an earlier chain
    pub fn colliding_chains(&self) -> usize {
        self.entries.len() - self.by_endpoint.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chain::generate_chain;
    use crate::error::Error;

    fn pw(s: &str) -> Password {
        s.parse().unwrap()
    }

    #[test]
    fn test_table_lookup() {
        let entries = vec![
            ChainEntry::new(pw("0000000"), pw("aaaaaaa")),
            ChainEntry::new(pw("0000001"), pw("bbbbbbb")),
        ];
        let table = Table::new(entries, 10, Reducer::Fixed).unwrap();

        let found: Vec<_> = table.lookup(&pw("bbbbbbb")).collect();
        assert_eq!(found, vec![&ChainEntry::new(pw("0000001"), pw("bbbbbbb"))]);
        assert_eq!(table.lookup(&pw("ccccccc")).count(), 0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.chain_length(), 10);
    }

    #[test]
    fn test_table_records_all_colliding_chains() {
        let entries = vec![
            ChainEntry::new(pw("0000000"), pw("aaaaaaa")),
            ChainEntry::new(pw("0000001"), pw("aaaaaaa")),
            ChainEntry::new(pw("0000002"), pw("bbbbbbb")),
            ChainEntry::new(pw("0000003"), pw("aaaaaaa")),
        ];
        let table = Table::new(entries, 10, Reducer::Fixed).unwrap();

        let starts: Vec<Password> = table.lookup(&pw("aaaaaaa")).map(|e| e.start).collect();
        assert_eq!(starts, vec![pw("0000000"), pw("0000001"), pw("0000003")]);
        assert_eq!(table.distinct_endpoints(), 2);
        assert_eq!(table.colliding_chains(), 2);
    }

    #[test]
    fn test_table_endpoint_digest_lookup() {
        let chain = generate_chain(pw("0000000"), 5).unwrap();
        let table = Table::from_chains(&[chain.clone()], 5, Reducer::Fixed).unwrap();

        let digest = hash_password(&chain.endpoint());
        let found: Vec<_> = table.lookup_endpoint_digest(&digest).collect();
        assert_eq!(found, vec![&chain.entry()]);
        assert_eq!(table.lookup_endpoint_digest(&Digest::new([0; 32])).count(), 0);
    }

    #[test]
    fn test_table_empty() {
        let table = Table::new(Vec::new(), 10, Reducer::Fixed).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.colliding_chains(), 0);
    }

    #[test]
    fn test_table_rejects_invalid_chain_length() {
        assert!(matches!(
            Table::new(Vec::new(), 0, Reducer::Fixed),
            Err(Error::InvalidChainLength(0))
        ));
    }

    #[test]
    fn test_table_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Table>();
    }
}
