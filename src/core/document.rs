//! Ordered document model for generated catalogs.
//!
//! A [`Document`] is what the builder assembles and what the renderers
//! serialize: entries in insertion order, interleaved with provenance
//! comments and section markers. Markers only ever appear at the top level.

use serde_json::{Map, Value};

use super::key_path::{DELIMITER, SetOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    New,
    Kept,
    Protected,
    Obsolete,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::New => "New strings to translate",
            Section::Kept => "Translations",
            Section::Protected => "Dynamic protected strings",
            Section::Obsolete => "Obsolete strings",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Marker(Section),
    Comment(String),
    Entry(String, Item),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Leaf(Option<String>),
    Branch(Vec<Node>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn push_marker(&mut self, section: Section) {
        self.nodes.push(Node::Marker(section));
    }

    /// True when the document holds no entry at all.
    pub fn has_entries(&self) -> bool {
        self.nodes.iter().any(|node| matches!(node, Node::Entry(..)))
    }

    /// Place a leaf at `segments`, creating branches on the way.
    ///
    /// `comment` is written right before the leaf when the leaf is created;
    /// it is dropped when an existing entry is overwritten.
    pub fn insert(
        &mut self,
        segments: &[&str],
        value: Option<String>,
        comment: Option<String>,
    ) -> SetOutcome {
        insert_into(&mut self.nodes, segments, value, comment)
    }

    /// Collapse every branch into dotted top-level entries.
    ///
    /// Markers and comments keep their relative position; empty branches are
    /// kept as empty entries.
    pub fn flattened(&self) -> Document {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        flatten_nodes(&self.nodes, "", &mut nodes);
        Document { nodes }
    }

    /// Plain tree of the entries, without markers and comments.
    pub fn to_value(&self) -> Value {
        Value::Object(nodes_to_map(&self.nodes))
    }
}

fn entry_mut<'a>(nodes: &'a mut [Node], key: &str) -> Option<&'a mut Item> {
    nodes.iter_mut().find_map(|node| match node {
        Node::Entry(k, item) if k == key => Some(item),
        _ => None,
    })
}

fn insert_into(
    nodes: &mut Vec<Node>,
    segments: &[&str],
    value: Option<String>,
    comment: Option<String>,
) -> SetOutcome {
    let Some((head, rest)) = segments.split_first() else {
        return SetOutcome::Inserted;
    };

    if rest.is_empty() {
        if let Some(item) = entry_mut(nodes, head) {
            let outcome = match item {
                Item::Branch(_) => SetOutcome::Conflict,
                Item::Leaf(_) => SetOutcome::Replaced,
            };
            *item = Item::Leaf(value);
            return outcome;
        }
        if let Some(comment) = comment {
            nodes.push(Node::Comment(comment));
        }
        nodes.push(Node::Entry(head.to_string(), Item::Leaf(value)));
        return SetOutcome::Inserted;
    }

    if entry_mut(nodes, head).is_none() {
        nodes.push(Node::Entry(head.to_string(), Item::Branch(Vec::new())));
    }
    let Some(item) = entry_mut(nodes, head) else {
        return SetOutcome::Inserted;
    };

    let mut outcome = SetOutcome::Inserted;
    if let Item::Leaf(_) = item {
        *item = Item::Branch(Vec::new());
        outcome = SetOutcome::Conflict;
    }
    match item {
        Item::Branch(children) => outcome.then(insert_into(children, rest, value, comment)),
        Item::Leaf(_) => SetOutcome::Conflict,
    }
}

fn flatten_nodes(nodes: &[Node], prefix: &str, out: &mut Vec<Node>) {
    for node in nodes {
        match node {
            Node::Entry(key, Item::Branch(children)) if !children.is_empty() => {
                flatten_nodes(children, &join(prefix, key), out);
            }
            Node::Entry(key, item) => out.push(Node::Entry(join(prefix, key), item.clone())),
            other => out.push(other.clone()),
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{DELIMITER}{key}")
    }
}

fn nodes_to_map(nodes: &[Node]) -> Map<String, Value> {
    let mut map = Map::new();
    for node in nodes {
        if let Node::Entry(key, item) = node {
            let value = match item {
                Item::Leaf(Some(text)) => Value::String(text.clone()),
                Item::Leaf(None) => Value::Null,
                Item::Branch(children) => Value::Object(nodes_to_map(children)),
            };
            map.insert(key.clone(), value);
        }
    }
    map
}
