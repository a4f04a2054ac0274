//! Provider lookup seam
//!
//! The aggregator resolves each booking against its own assigned provider, so
//! it only needs "find provider by id" from whatever the caller fetched.

use std::collections::{BTreeMap, HashMap};

use shared::models::Provider;

pub trait ProviderLookup {
    fn provider(&self, id: &str) -> Option<&Provider>;
}

impl ProviderLookup for HashMap<String, Provider> {
    fn provider(&self, id: &str) -> Option<&Provider> {
        self.get(id)
    }
}

impl ProviderLookup for BTreeMap<String, Provider> {
    fn provider(&self, id: &str) -> Option<&Provider> {
        self.get(id)
    }
}

impl ProviderLookup for [Provider] {
    fn provider(&self, id: &str) -> Option<&Provider> {
        self.iter().find(|p| p.id == id)
    }
}

impl ProviderLookup for Vec<Provider> {
    fn provider(&self, id: &str) -> Option<&Provider> {
        self.as_slice().provider(id)
    }
}

/// Provider directory snapshot indexed by id
///
/// Later duplicates replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ProviderIndex {
    by_id: HashMap<String, Provider>,
}

impl ProviderIndex {
    pub fn new(providers: impl IntoIterator<Item = Provider>) -> Self {
        providers.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FromIterator<Provider> for ProviderIndex {
    fn from_iter<I: IntoIterator<Item = Provider>>(iter: I) -> Self {
        Self {
            by_id: iter.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }
}

impl ProviderLookup for ProviderIndex {
    fn provider(&self, id: &str) -> Option<&Provider> {
        self.by_id.get(id)
    }
}
