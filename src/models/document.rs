// file: src/models/document.rs
// description: loaded document model with content hashing
// reference: internal data structures

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// File name the document was loaded from.
    pub identifier: String,
    pub text: String,
    pub content_hash: String,
    pub size: u64,
}

impl Document {
    pub fn new(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let content_hash = Self::compute_hash(&text);
        let size = text.len() as u64;

        Self {
            identifier: identifier.into(),
            text,
            content_hash,
            size,
        }
    }

    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn short_hash(&self) -> &str {
        &self.content_hash[..12]
    }
}
