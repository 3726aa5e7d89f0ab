/// Deduplicating string table shared by identifiers, numbers and strings.
///
/// Entries are addressed by dense [`Symbol`] handles. Deduplication is keyed
/// on a 32-bit DJB2 hash; see [`CollisionPolicy`] for what happens when two
/// different texts share a hash.
use serde::Serialize;
use tracing::trace;

/// Initial number of slots in the backing arrays.
pub const TABLE_DEFAULT_LEN: usize = 16;
/// Number of slots added each time the table is full.
pub const TABLE_STEP: usize = 2;

const DJB2_SEED: u32 = 5381;

/// Handle to an interned string. Stable for the lifetime of its table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Symbol(u32);

impl Symbol {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a hash match is treated during [`Interner::intern`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// An equal hash is taken as an equal string. Two distinct texts with the
    /// same hash alias to one handle.
    #[default]
    HashOnly,
    /// An equal hash is confirmed by comparing the stored text.
    Verified,
}

pub fn djb2(text: &str) -> u32 {
    text.bytes()
        .fold(DJB2_SEED, |h, b| (h << 5).wrapping_add(h).wrapping_add(b as u32))
}

#[derive(Debug)]
pub struct Interner {
    strings: Vec<String>,
    hashes: Vec<u32>,
    policy: CollisionPolicy,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        Self::with_policy(CollisionPolicy::default())
    }

    pub fn with_policy(policy: CollisionPolicy) -> Self {
        Self {
            strings: Vec::with_capacity(TABLE_DEFAULT_LEN),
            hashes: Vec::with_capacity(TABLE_DEFAULT_LEN),
            policy,
        }
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    pub fn intern(&mut self, text: impl Into<String>) -> Symbol {
        let text = text.into();
        let hash = djb2(&text);

        let found = self.hashes.iter().enumerate().find(|&(i, &h)| {
            h == hash
                && match self.policy {
                    CollisionPolicy::HashOnly => true,
                    CollisionPolicy::Verified => self.strings[i] == text,
                }
        });
        if let Some((i, _)) = found {
            return Symbol(i as u32);
        }

        if self.strings.len() == self.strings.capacity() {
            self.strings.reserve_exact(TABLE_STEP);
            self.hashes.reserve_exact(TABLE_STEP);
        }

        let symbol = Symbol(self.strings.len() as u32);
        trace!(symbol = symbol.0, text = %text, "interned");
        self.strings.push(text);
        self.hashes.push(hash);
        symbol
    }

    /// Text of an interned entry. Panics on a handle from another table.
    pub fn lookup(&self, symbol: Symbol) -> &str {
        &self.strings[symbol.index()]
    }

    pub fn get(&self, symbol: Symbol) -> Option<&str> {
        self.strings.get(symbol.index()).map(String::as_str)
    }

    pub fn hash_of(&self, symbol: Symbol) -> Option<u32> {
        self.hashes.get(symbol.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.strings
            .iter()
            .enumerate()
            .map(|(i, s)| (Symbol(i as u32), s.as_str()))
    }
}
