use hcpguard_types::Product;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a rule result.
///
/// Identity fields:
/// - rule_id
/// - product the document was evaluated as
/// - target path (as reported)
pub fn fingerprint_for_result(rule_id: &str, product: Product, target: &str) -> String {
    let canonical = [rule_id, product.as_str(), target].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
