/// A loose record of named fields. Key order follows insertion order.
pub type Record = serde_json::Map<String, serde_json::Value>;
