//! Hierarchical data for tree, treemap and sunburst charts.

use crate::encoder::EncodeContext;
use crate::error::Result;
use crate::part::{Capabilities, Component, Part, PartId, PartKind};
use crate::property::{Properties, PropertyGroup, PropertyValue};

use super::{DataProvider, DataType};

/// A node with a name, a value and child nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    name: String,
    value: f64,
    children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a leaf.
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            children: Vec::new(),
        }
    }

    /// Append a child.
    #[must_use]
    pub fn child(mut self, node: TreeNode) -> Self {
        self.children.push(node);
        self
    }

    /// Node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Child nodes.
    #[must_use]
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }
}

impl PropertyGroup for TreeNode {
    fn write_properties(&self, props: &mut Properties) {
        let children: Vec<PropertyValue> = self
            .children
            .iter()
            .map(|c| PropertyValue::Object(c.to_properties()))
            .collect();
        props
            .set("name", self.name.as_str())
            .set("value", self.value)
            .set("children", children);
    }
}

/// A forest of [`TreeNode`]s. Always encoded inline.
#[derive(Debug, Clone)]
pub struct TreeData {
    id: PartId,
    name: Option<String>,
    roots: Vec<TreeNode>,
}

impl TreeData {
    /// Create from root nodes.
    #[must_use]
    pub fn new(roots: impl IntoIterator<Item = TreeNode>) -> Self {
        Self {
            id: PartId::next(),
            name: None,
            roots: roots.into_iter().collect(),
        }
    }

    /// Set a name (used in error messages).
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Root nodes.
    #[must_use]
    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }
}

impl Part for TreeData {
    fn id(&self) -> PartId {
        self.id
    }

    fn kind(&self) -> PartKind {
        PartKind::Data
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SKIP_ELIGIBLE | Capabilities::DATA_CARRYING
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    // Trees never become dataset columns.
    fn encode(&self, _ctx: &EncodeContext<'_>, _props: &mut Properties) -> Result<()> {
        Ok(())
    }

    fn as_data(&self) -> Option<&dyn DataProvider> {
        Some(self)
    }
}

impl Component for TreeData {}

impl DataProvider for TreeData {
    fn data_type(&self) -> DataType {
        DataType::Number
    }

    fn len(&self) -> usize {
        self.roots.len()
    }

    fn supports_dataset(&self) -> bool {
        false
    }

    fn encode_value(&self, index: usize, out: &mut String) -> Result<()> {
        match self.roots.get(index) {
            Some(node) => PropertyValue::Object(node.to_properties()).write_json(out),
            None => {
                out.push_str("null");
                Ok(())
            }
        }
    }
}
