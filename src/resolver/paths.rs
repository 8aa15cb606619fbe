use serde_json::Value;

/// Fallback-path table: one ordered candidate list per semantic field.
/// Every document-shape fallback lives here instead of being chained ad hoc
/// at the call sites; `first_present` is the single evaluator.
///
/// The invoice root may sit under a processed wrapper (nfeProc) or arrive
/// bare (NFe).
pub const INVOICE_ROOT: &[&[&str]] = &[&["nfeProc", "NFe", "infNFe"], &["NFe", "infNFe"]];

/// Access key of a processed document (the protocol block).
pub const ACCESS_KEY: &[&[&str]] = &[&["nfeProc", "protNFe", "infProt", "chNFe"]];

/// Invoice-level totals block.
pub const TOTALS: &[&[&str]] = &[&["total", "ICMSTot"]];

/// Item-level IPI: only the taxed shape carries a value.
pub const ITEM_IPI: &[&[&str]] = &[&["imposto", "IPI", "IPITrib", "vIPI"]];

/// Item-level PIS: standard-rate shape first, substitution shape second.
pub const ITEM_PIS: &[&[&str]] = &[
    &["imposto", "PIS", "PISAliq", "vPIS"],
    &["imposto", "PIS", "PISST", "vPIS"],
];

/// Item-level COFINS: same two-step fallback as PIS.
pub const ITEM_COFINS: &[&[&str]] = &[
    &["imposto", "COFINS", "COFINSAliq", "vCOFINS"],
    &["imposto", "COFINS", "COFINSST", "vCOFINS"],
];

/// The ICMS group holds one numbered variant (ICMS00, ICMS10, ICMSSN101, …)
/// whose key is not known up front; the resolver iterates the group's own
/// keys instead of probing a candidate list.
pub const ITEM_ICMS_GROUP: &[&str] = &["imposto", "ICMS"];

/// Walks a key path down an object tree.
pub fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut node = root;
    for key in path {
        node = node.get(key)?;
    }
    Some(node)
}

/// First candidate path that resolves, in table order.
pub fn first_present<'a>(root: &'a Value, candidates: &[&[&str]]) -> Option<&'a Value> {
    candidates.iter().find_map(|path| lookup(root, path))
}

/// Shape of a list-or-single node. Upstream parsers emit a one-element list
/// as a bare object; this is normalized once at the boundary and downstream
/// code only ever sees a uniform list.
#[derive(Debug)]
pub enum NodeShape<'a> {
    Empty,
    Single(&'a Value),
    Many(&'a [Value]),
}

impl<'a> NodeShape<'a> {
    pub fn of(node: Option<&'a Value>) -> Self {
        match node {
            Some(Value::Array(list)) => NodeShape::Many(list),
            Some(v @ Value::Object(_)) => NodeShape::Single(v),
            _ => NodeShape::Empty,
        }
    }

    /// Collapses to a uniform list of object nodes.
    pub fn into_vec(self) -> Vec<&'a Value> {
        match self {
            NodeShape::Empty => Vec::new(),
            NodeShape::Single(v) => vec![v],
            NodeShape::Many(list) => list.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_walks_nested_keys() {
        let tree = json!({"a": {"b": {"c": "x"}}});
        assert_eq!(lookup(&tree, &["a", "b", "c"]), Some(&json!("x")));
        assert_eq!(lookup(&tree, &["a", "missing"]), None);
    }

    #[test]
    fn first_present_respects_table_order() {
        let standard = json!({"imposto": {"PIS": {"PISAliq": {"vPIS": "1.00"}, "PISST": {"vPIS": "9.99"}}}});
        assert_eq!(first_present(&standard, ITEM_PIS), Some(&json!("1.00")));

        let substitution = json!({"imposto": {"PIS": {"PISST": {"vPIS": "2.00"}}}});
        assert_eq!(first_present(&substitution, ITEM_PIS), Some(&json!("2.00")));

        assert_eq!(first_present(&json!({}), ITEM_PIS), None);
    }

    #[test]
    fn single_object_normalizes_to_one_element_list() {
        let single = json!({"prod": {}});
        assert_eq!(NodeShape::of(Some(&single)).into_vec().len(), 1);

        let many = json!([{"prod": {}}, {"prod": {}}]);
        assert_eq!(NodeShape::of(Some(&many)).into_vec().len(), 2);

        assert!(NodeShape::of(None).into_vec().is_empty());
        assert!(NodeShape::of(Some(&json!("scalar"))).into_vec().is_empty());
    }
}
