use crc32fast::Hasher;
use std::collections::HashSet;

pub const DEFAULT_ID_PREFIX: &str = "comp";

/// Generate a short seed from an arbitrary key using CRC32
pub fn get_seed(key: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential generator for component ids (`comp-<seed>-<n>`).
///
/// Ids are written into source text as `id` attributes, so the generator
/// skips any id it has been told is already taken.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    seed: String,
    count: u32,
    taken: HashSet<String>,
}

impl IdGenerator {
    pub fn new(key: &str) -> Self {
        Self::with_prefix(DEFAULT_ID_PREFIX, key)
    }

    pub fn with_prefix(prefix: &str, key: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            seed: get_seed(key),
            count: 0,
            taken: HashSet::new(),
        }
    }

    /// Record ids that already exist so they are never handed out
    pub fn reserve<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.taken.extend(ids.into_iter().map(Into::into));
    }

    /// Generate next unused id
    pub fn new_id(&mut self) -> String {
        loop {
            self.count += 1;
            let id = format!("{}-{}-{}", self.prefix, self.seed, self.count);
            if self.taken.insert(id.clone()) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
