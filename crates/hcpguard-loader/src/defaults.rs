//! Documented product defaults, injected only where a key is absent.

use hcpguard_types::{Map, Product, Value};

const VAULT_LISTENER: &[(&str, Preset)] = &[
    ("tls_disable", Preset::Bool(false)),
    ("tls_min_version", Preset::Text("tls12")),
    ("tls_require_and_verify_client_cert", Preset::Bool(false)),
    ("address", Preset::Text("127.0.0.1:8200")),
    ("http_idle_timeout", Preset::Text("5m")),
    ("http_read_timeout", Preset::Text("5m")),
    ("http_write_timeout", Preset::Text("5m")),
    ("tcp_keepalive", Preset::Text("0s")),
];

const VAULT_TOP: &[(&str, Preset)] = &[
    ("disable_mlock", Preset::Bool(false)),
    ("default_lease_ttl", Preset::Text("768h")),
    ("max_lease_ttl", Preset::Text("768h")),
    ("ui", Preset::Bool(false)),
];

const CONSUL_TOP: &[(&str, Preset)] = &[
    ("datacenter", Preset::Text("dc1")),
    ("data_dir", Preset::Text("/opt/consul")),
    ("log_level", Preset::Text("INFO")),
    ("ui", Preset::Bool(false)),
];

const CONSUL_ADDRESSES: &[(&str, Preset)] = &[("http", Preset::Text("127.0.0.1"))];

const NOMAD_TOP: &[(&str, Preset)] = &[
    ("region", Preset::Text("global")),
    ("datacenter", Preset::Text("dc1")),
    ("data_dir", Preset::Text("/opt/nomad")),
    ("log_level", Preset::Text("INFO")),
    ("enable_syslog", Preset::Bool(false)),
];

#[derive(Clone, Copy)]
enum Preset {
    Bool(bool),
    Text(&'static str),
}

impl From<Preset> for Value {
    fn from(d: Preset) -> Self {
        match d {
            Preset::Bool(b) => Value::Bool(b),
            Preset::Text(s) => Value::from(s),
        }
    }
}

fn fill(map: &mut Map, defaults: &[(&str, Preset)]) {
    for (key, value) in defaults {
        if !map.contains_key(*key) {
            map.insert((*key).to_string(), Value::from(*value));
        }
    }
}

/// Return `root` with the product's documented defaults filled in. Existing keys are never
/// overwritten; non-map roots and `Product::All` are returned unchanged.
pub fn apply_product_defaults(root: Value, product: Product) -> Value {
    let mut map = match root {
        Value::Map(map) => map,
        other => return other,
    };

    match product {
        Product::Vault => {
            match map.get_mut("listener") {
                Some(Value::List(listeners)) => {
                    for listener in listeners {
                        if let Value::Map(l) = listener {
                            fill(l, VAULT_LISTENER);
                        }
                    }
                }
                Some(Value::Map(listener)) => fill(listener, VAULT_LISTENER),
                _ => {}
            }
            fill(&mut map, VAULT_TOP);
        }
        Product::Consul => {
            fill(&mut map, CONSUL_TOP);
            if let Some(Value::Map(addresses)) = map.get_mut("addresses") {
                fill(addresses, CONSUL_ADDRESSES);
            }
        }
        Product::Nomad => fill(&mut map, NOMAD_TOP),
        Product::All => {}
    }

    Value::Map(map)
}
