//! Category tree store
//!
//! Owns the category tree, the open/closed state of its nodes, the search
//! query and the currently selected node. Selecting a node yields the group
//! codes of its whole subtree, which the catalog filter uses as its source
//! restriction.
//!
//! Parent links are plain ids resolved through an id -> parent index, so an
//! ancestor walk is one map lookup per level.

use std::collections::{BTreeSet, HashMap, HashSet};

use shared::{CategoryNode, NodeId, ProductRecord, RawCategory};
use tracing::{debug, warn};

/// Product count per group code
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    counts: HashMap<String, usize>,
}

impl GroupIndex {
    pub fn from_products(products: &[ProductRecord]) -> Self {
        let mut counts = HashMap::new();
        for product in products {
            *counts.entry(product.group_code.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Number of products whose `group_code` equals `code`
    pub fn count(&self, code: &str) -> usize {
        self.counts.get(code).copied().unwrap_or(0)
    }
}

/// Category tree state
#[derive(Debug, Default)]
pub struct CategoryStore {
    roots: Vec<CategoryNode>,
    /// id -> parent id (`None` for roots)
    parents: HashMap<NodeId, Option<NodeId>>,
    open: HashSet<NodeId>,
    selected: Option<NodeId>,
    query: String,
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree from the raw source and reset all UI state.
    ///
    /// The first root starts expanded.
    pub fn load(&mut self, raw: Vec<RawCategory>) {
        self.roots = raw
            .into_iter()
            .map(|node| CategoryNode::from_raw(node, None))
            .collect();

        self.parents.clear();
        for root in &self.roots {
            root.walk(&mut |node| {
                self.parents.insert(node.id.clone(), node.parent_id.clone());
            });
        }

        self.open.clear();
        if let Some(first) = self.roots.first() {
            self.open.insert(first.id.clone());
        }
        self.selected = None;
        self.query.clear();

        debug!(
            roots = self.roots.len(),
            nodes = self.parents.len(),
            "Category tree loaded"
        );
    }

    /// Parse `groups.json` text; malformed input leaves an empty tree
    pub fn load_json(&mut self, text: &str) {
        match serde_json::from_str::<Vec<RawCategory>>(text) {
            Ok(raw) => self.load(raw),
            Err(e) => {
                warn!(error = %e, "Malformed category source, using empty tree");
                self.load(Vec::new());
            }
        }
    }

    pub fn roots(&self) -> &[CategoryNode] {
        &self.roots
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.parents.contains_key(id)
    }

    pub fn find(&self, id: &NodeId) -> Option<&CategoryNode> {
        find_in(&self.roots, id)
    }

    pub fn parent_of(&self, id: &NodeId) -> Option<&NodeId> {
        self.parents.get(id).and_then(Option::as_ref)
    }

    // ==================== Selection ====================

    /// Select a node and return the group codes of its subtree.
    ///
    /// Unknown ids leave the selection untouched and return `None`.
    pub fn select(&mut self, id: &NodeId) -> Option<BTreeSet<String>> {
        let codes = collect_codes(find_in(&self.roots, id)?);
        self.selected = Some(id.clone());
        debug!(node = %id, codes = codes.len(), "Category selected");
        Some(codes)
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    /// Drop the group restriction ("show all products")
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // ==================== Search ====================

    /// Set the search query; a non-empty query force-opens every node on a
    /// path to a match
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        if self.query.is_empty() {
            return;
        }
        let filtered = filter_tree(&self.roots, &self.query);
        let expand = self.auto_expand_for(&filtered);
        self.open.extend(expand);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The tree as it should be displayed for the current query
    pub fn visible_tree(&self) -> Vec<CategoryNode> {
        filter_tree(&self.roots, &self.query)
    }

    /// Ids that must be opened so every node of `filtered` is reachable.
    ///
    /// Internal filtered nodes open themselves; a filtered leaf opens its
    /// whole ancestor chain in the original tree.
    pub fn auto_expand_for(&self, filtered: &[CategoryNode]) -> HashSet<NodeId> {
        let mut ids = HashSet::new();
        self.expand_walk(&self.roots, filtered, &mut ids);
        ids
    }

    fn expand_walk(
        &self,
        originals: &[CategoryNode],
        filtered: &[CategoryNode],
        ids: &mut HashSet<NodeId>,
    ) {
        for node in filtered {
            let Some(original) = originals.iter().find(|n| n.id == node.id) else {
                continue;
            };

            if node.has_children() {
                ids.insert(node.id.clone());
                self.expand_walk(&original.children, &node.children, ids);
                continue;
            }

            let mut cursor = self.parent_of(&node.id);
            while let Some(parent) = cursor {
                // An id already present has its ancestors present too
                if !ids.insert(parent.clone()) {
                    break;
                }
                cursor = self.parent_of(parent);
            }
        }
    }

    // ==================== Open state ====================

    pub fn is_open(&self, id: &NodeId) -> bool {
        self.open.contains(id)
    }

    pub fn open_ids(&self) -> &HashSet<NodeId> {
        &self.open
    }

    /// Flip a node's open state; unknown ids are ignored
    pub fn toggle(&mut self, id: &NodeId) {
        if !self.contains(id) {
            return;
        }
        if !self.open.remove(id) {
            self.open.insert(id.clone());
        }
    }

    pub fn collapse_all(&mut self) {
        self.open.clear();
    }

    pub fn expand_all(&mut self) {
        self.open = self.parents.keys().cloned().collect();
    }

    // ==================== Counts ====================

    /// Per-node product counts for one render pass, computed in a single
    /// post-order walk
    pub fn product_counts(&self, index: &GroupIndex) -> HashMap<NodeId, usize> {
        let mut counts = HashMap::with_capacity(self.parents.len());
        for root in &self.roots {
            tally(root, index, &mut counts);
        }
        counts
    }
}

fn find_in<'a>(nodes: &'a [CategoryNode], id: &NodeId) -> Option<&'a CategoryNode> {
    for node in nodes {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in(&node.children, id) {
            return Some(found);
        }
    }
    None
}

fn tally(node: &CategoryNode, index: &GroupIndex, counts: &mut HashMap<NodeId, usize>) -> usize {
    let total = index.count(&node.code)
        + node
            .children
            .iter()
            .map(|child| tally(child, index, counts))
            .sum::<usize>();
    counts.insert(node.id.clone(), total);
    total
}

/// The node's own code plus the codes of all its descendants
pub fn collect_codes(node: &CategoryNode) -> BTreeSet<String> {
    let mut codes = BTreeSet::new();
    node.walk(&mut |n| {
        codes.insert(n.code.clone());
    });
    codes
}

/// Products in the node's group and in every descendant group
pub fn count_products(node: &CategoryNode, index: &GroupIndex) -> usize {
    index.count(&node.code)
        + node
            .children
            .iter()
            .map(|child| count_products(child, index))
            .sum::<usize>()
}

/// Prune the tree to nodes whose name contains `query` (case-insensitive).
///
/// A node with children survives when it matches or when any child survives,
/// and keeps only its surviving children. A leaf survives only when it
/// matches. An empty query returns the tree unchanged.
pub fn filter_tree(nodes: &[CategoryNode], query: &str) -> Vec<CategoryNode> {
    if query.is_empty() {
        return nodes.to_vec();
    }
    let needle = query.to_lowercase();
    nodes
        .iter()
        .filter_map(|node| filter_node(node, &needle))
        .collect()
}

fn filter_node(node: &CategoryNode, needle: &str) -> Option<CategoryNode> {
    let matches = node.name.to_lowercase().contains(needle);

    if node.has_children() {
        let children: Vec<CategoryNode> = node
            .children
            .iter()
            .filter_map(|child| filter_node(child, needle))
            .collect();
        if matches || !children.is_empty() {
            return Some(CategoryNode {
                children,
                ..shallow(node)
            });
        }
        return None;
    }

    matches.then(|| node.clone())
}

fn shallow(node: &CategoryNode) -> CategoryNode {
    CategoryNode {
        id: node.id.clone(),
        code: node.code.clone(),
        name: node.name.clone(),
        parent_id: node.parent_id.clone(),
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_from(json: &str) -> CategoryStore {
        let mut store = CategoryStore::new();
        store.load_json(json);
        store
    }

    /// Tools
    /// ├── Drills
    /// │   ├── Cordless drills
    /// │   └── Hammer drills
    /// └── Saws
    /// Garden
    /// └── Hoses
    fn sample() -> CategoryStore {
        store_from(
            r#"[
                {"id": 1, "code": "T", "name": "Tools", "children": [
                    {"id": 2, "code": "T1", "name": "Drills", "children": [
                        {"id": 3, "code": "T11", "name": "Cordless drills"},
                        {"id": 4, "code": "T12", "name": "Hammer drills"}
                    ]},
                    {"id": 5, "code": "T2", "name": "Saws"}
                ]},
                {"id": 6, "code": "G", "name": "Garden", "children": [
                    {"id": 7, "code": "G1", "name": "Hoses"}
                ]}
            ]"#,
        )
    }

    fn ids(nodes: &[CategoryNode]) -> Vec<String> {
        let mut out = Vec::new();
        for node in nodes {
            node.walk(&mut |n| out.push(n.id.to_string()));
        }
        out
    }

    fn product(code: &str, group: &str) -> ProductRecord {
        serde_json::from_value(serde_json::json!({
            "code": code, "name": code, "price": 1, "group_code": group
        }))
        .unwrap()
    }

    #[test]
    fn test_load_opens_first_root_and_links_parents() {
        let store = sample();
        assert!(store.is_open(&NodeId::from(1)));
        assert!(!store.is_open(&NodeId::from(6)));
        assert_eq!(store.parent_of(&NodeId::from(3)), Some(&NodeId::from(2)));
        assert_eq!(store.parent_of(&NodeId::from(1)), None);
    }

    #[test]
    fn test_malformed_source_yields_empty_tree() {
        let store = store_from("{not json");
        assert!(store.roots().is_empty());
        assert!(store.open_ids().is_empty());
    }

    #[test]
    fn test_collect_codes_single_branch() {
        let mut store = store_from(
            r#"[{"id":1,"code":"A","name":"Tools","children":[{"id":2,"code":"A1","name":"Drills"}]}]"#,
        );
        let codes = store.select(&NodeId::from(1)).unwrap();
        assert_eq!(codes, BTreeSet::from(["A".to_string(), "A1".to_string()]));
        assert_eq!(store.selected(), Some(&NodeId::from(1)));
    }

    #[test]
    fn test_collect_codes_is_closed_over_subtree() {
        let store = sample();
        let drills = store.find(&NodeId::from(2)).unwrap();
        let codes = collect_codes(drills);
        assert_eq!(
            codes,
            BTreeSet::from(["T1".to_string(), "T11".to_string(), "T12".to_string()])
        );
        assert!(!codes.contains("T"));
        assert!(!codes.contains("T2"));
    }

    #[test]
    fn test_select_unknown_keeps_selection() {
        let mut store = sample();
        store.select(&NodeId::from(5)).unwrap();
        assert!(store.select(&NodeId::from(99)).is_none());
        assert_eq!(store.selected(), Some(&NodeId::from(5)));
        store.clear_selection();
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_count_products_matches_memoized_counts() {
        let store = sample();
        let index = GroupIndex::from_products(&[
            product("1", "T"),
            product("2", "T11"),
            product("3", "T11"),
            product("4", "T12"),
            product("5", "G1"),
            product("6", "unknown"),
        ]);

        let counts = store.product_counts(&index);
        for root in store.roots() {
            root.walk(&mut |node| {
                assert_eq!(counts[&node.id], count_products(node, &index), "node {}", node.id);
            });
        }
        assert_eq!(counts[&NodeId::from(1)], 4);
        assert_eq!(counts[&NodeId::from(2)], 3);
        assert_eq!(counts[&NodeId::from(5)], 0);
        assert_eq!(counts[&NodeId::from(6)], 1);
    }

    #[test]
    fn test_filter_empty_query_is_identity() {
        let store = sample();
        assert_eq!(filter_tree(store.roots(), ""), store.roots().to_vec());
    }

    #[test]
    fn test_filter_no_match_is_empty_forest() {
        let store = sample();
        assert!(filter_tree(store.roots(), "nothing here").is_empty());
    }

    #[test]
    fn test_filter_leaf_match_drops_unmatched_siblings() {
        let store = sample();
        let filtered = filter_tree(store.roots(), "HAMMER");
        assert_eq!(ids(&filtered), vec!["1", "2", "4"]);
    }

    #[test]
    fn test_filter_matching_parent_keeps_only_filtered_children() {
        let store = sample();
        // "drills" matches the internal node and both leaves
        assert_eq!(ids(&filter_tree(store.roots(), "drills")), vec!["1", "2", "3", "4"]);

        // "tools" matches only the root, whose children are all filtered away
        let filtered = filter_tree(store.roots(), "tools");
        assert_eq!(ids(&filtered), vec!["1"]);
        assert!(filtered[0].children.is_empty());
    }

    #[test]
    fn test_filter_preserves_display_order() {
        let store = sample();
        let filtered = filter_tree(store.roots(), "s");
        assert_eq!(ids(&filtered), vec!["1", "2", "3", "4", "5", "6", "7"]);
    }

    #[test]
    fn test_auto_expand_opens_ancestor_chains() {
        let store = sample();
        let filtered = filter_tree(store.roots(), "cordless");
        let expand = store.auto_expand_for(&filtered);
        assert_eq!(expand, HashSet::from([NodeId::from(1), NodeId::from(2)]));
    }

    #[test]
    fn test_auto_expand_for_matching_parent_without_children() {
        let store = sample();
        // Garden matches but Hoses does not: Garden is a filtered leaf, root has no parent
        let filtered = filter_tree(store.roots(), "garden");
        assert!(store.auto_expand_for(&filtered).is_empty());
    }

    #[test]
    fn test_set_query_only_adds_open_ids() {
        let mut store = sample();
        store.toggle(&NodeId::from(1));
        assert!(!store.is_open(&NodeId::from(1)));

        store.set_query("hoses");
        assert!(store.is_open(&NodeId::from(6)));
        assert!(!store.is_open(&NodeId::from(1)));
        assert_eq!(ids(&store.visible_tree()), vec!["6", "7"]);

        store.set_query("");
        assert!(store.is_open(&NodeId::from(6)));
        assert_eq!(store.visible_tree().len(), 2);
    }

    #[test]
    fn test_toggle_collapse_expand() {
        let mut store = sample();
        store.toggle(&NodeId::from(99));
        assert_eq!(store.open_ids().len(), 1);

        store.expand_all();
        assert_eq!(store.open_ids().len(), 7);

        store.collapse_all();
        assert!(store.open_ids().is_empty());

        store.toggle(&NodeId::from(2));
        assert!(store.is_open(&NodeId::from(2)));
    }
}
