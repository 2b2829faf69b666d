//! Identifier minting for manifest records
//!
//! Xcode object identifiers are 24-character uppercase hexadecimal tokens.
//! Fresh tokens are cut from UUIDv4 bytes; the generator re-rolls on a repeat
//! so every token issued in one batch is distinct. Uniqueness is not checked
//! against identifiers already present in the manifest.

use std::collections::HashSet;

use uuid::Uuid;

/// Length of an Xcode object identifier
pub const ID_LEN: usize = 24;

/// Mints batch-unique 24-character uppercase hex tokens
#[derive(Debug, Default)]
pub struct IdGenerator {
    issued: HashSet<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh token, distinct from every token this generator has
    /// issued so far.
    pub fn next_id(&mut self) -> String {
        loop {
            let hex = Uuid::new_v4().simple().to_string();
            let id = hex[..ID_LEN].to_uppercase();
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}
