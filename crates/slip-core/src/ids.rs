//! Receipt identifier generation.

use uuid::Uuid;

/// Produces identifiers for newly created receipts.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random UUID v4 identifiers; collisions are practically impossible even for
/// receipts created within the same millisecond.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
