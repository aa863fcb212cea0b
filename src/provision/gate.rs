use std::path::Path;

/// Idempotency check run before any acquisition.
///
/// An entry counts as provisioned when its final path exists. Size and
/// content are not inspected, so a damaged file is not re-fetched.
pub struct ExistenceGate;

impl ExistenceGate {
    pub fn is_satisfied(path: &Path) -> bool {
        path.exists()
    }
}
