use hcpguard_types::{Product, Value};

/// Guess the product from top-level keys.
///
/// - Vault: `storage` and `listener`
/// - Nomad: `datacenter`, `data_dir` and `region`
/// - Consul: `datacenter` and `data_dir`
pub fn detect_product(root: &Value) -> Option<Product> {
    let has = |key: &str| root.get(key).is_some();

    if has("storage") && has("listener") {
        Some(Product::Vault)
    } else if has("datacenter") && has("data_dir") && has("region") {
        Some(Product::Nomad)
    } else if has("datacenter") && has("data_dir") {
        Some(Product::Consul)
    } else {
        None
    }
}
