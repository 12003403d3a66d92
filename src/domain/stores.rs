use std::collections::HashMap;

/// Store id → display name. Lookups never fail: unknown ids name themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreDirectory {
    names: HashMap<String, String>,
}

impl StoreDirectory {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self { names }
    }

    pub fn name<'a>(&'a self, store_id: &'a str) -> &'a str {
        match self.names.get(store_id) {
            Some(name) if !name.trim().is_empty() => name.as_str(),
            _ => store_id,
        }
    }

    /// 依 id 排序，讓每次執行的 scope 順序一致
    pub fn store_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.names.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StoreDirectory {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(id, name)| (id.into(), name.into()))
                .collect(),
        )
    }
}
