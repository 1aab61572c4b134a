//! Category Model

use serde::{Deserialize, Serialize};

use crate::ids::{NodeId, key_string};

/// Category as delivered by the catalog source (`groups.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCategory {
    pub id: NodeId,
    /// Group code matched against `ProductRecord::group_code`
    #[serde(deserialize_with = "key_string")]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawCategory>>,
}

/// Category tree node with its parent link resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: NodeId,
    pub code: String,
    pub name: String,
    /// Parent reference (lookup key only, `None` for roots)
    pub parent_id: Option<NodeId>,
    /// Children in display order
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Build a node (and its whole subtree) from the raw shape
    pub fn from_raw(raw: RawCategory, parent_id: Option<NodeId>) -> Self {
        let id = raw.id;
        let children = raw
            .children
            .unwrap_or_default()
            .into_iter()
            .map(|child| CategoryNode::from_raw(child, Some(id.clone())))
            .collect();
        Self {
            id,
            code: raw.code,
            name: raw.name,
            parent_id,
            children,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Visit this node and every descendant, depth-first pre-order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a CategoryNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}
