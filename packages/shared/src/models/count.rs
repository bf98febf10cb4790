use serde::{Deserialize, Serialize};

/// Response body of the count and bulk update operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    pub count: u64,
}

impl Count {
    pub fn new(count: u64) -> Self {
        Count { count }
    }
}
