use std::fmt;

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::{FormError, TaskRef};

pub type NodeId = u64;

/// Key under which a node appears in the node dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKey {
    /// The synthetic "let the system pick" entry.
    Auto,
    Id(NodeId),
}

impl NodeKey {
    /// Parses a dropdown value: `auto` or a numeric node id.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw == "auto" {
            return Some(NodeKey::Auto);
        }
        raw.parse().ok().map(NodeKey::Id)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Auto => write!(f, "auto"),
            NodeKey::Id(id) => write!(f, "{id}"),
        }
    }
}

/// One configurable option a node exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOption {
    pub name: String,
    pub kind: String,
    pub value: String,
    pub help: String,
}

/// A node as reported by the node listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSummary {
    pub id: NodeId,
    pub hostname: String,
    pub port: u16,
    pub queue_count: u32,
    pub online: bool,
    pub available_options: Vec<NodeOption>,
}

/// A dropdown entry: either a concrete node or the auto alias of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingNode {
    pub id: NodeId,
    pub key: NodeKey,
    pub label: String,
    pub options: Vec<NodeOption>,
    pub queue_count: u32,
    pub enabled: bool,
    pub url: String,
}

impl ProcessingNode {
    fn from_summary(summary: &NodeSummary) -> Self {
        Self {
            id: summary.id,
            key: NodeKey::Id(summary.id),
            label: format!(
                "{}:{} (queue: {})",
                summary.hostname, summary.port, summary.queue_count
            ),
            options: summary.available_options.clone(),
            queue_count: summary.queue_count,
            enabled: summary.online,
            url: format!("http://{}:{}", summary.hostname, summary.port),
        }
    }

    fn auto_alias(target: &ProcessingNode) -> Self {
        Self {
            id: target.id,
            key: NodeKey::Auto,
            label: "Auto".to_string(),
            options: target.options.clone(),
            queue_count: target.queue_count,
            enabled: true,
            url: target.url.clone(),
        }
    }

    pub fn is_auto(&self) -> bool {
        self.key == NodeKey::Auto
    }
}

/// Label and address of a node we tried to use, shown when none is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLink {
    pub label: String,
    pub url: String,
}

/// Builds the dropdown list from the endpoint response.
///
/// The first entry is always the auto alias. Its target is the task's
/// recorded node when the task was auto-assigned and that node is still
/// listed; otherwise a random pick among enabled nodes at the lowest queue
/// count.
pub fn build_node_list<R>(
    summaries: &[NodeSummary],
    task: Option<&TaskRef>,
    rng: &mut R,
) -> Result<Vec<ProcessingNode>, FormError>
where
    R: Rng + ?Sized,
{
    if summaries.is_empty() {
        return Err(FormError::NoUsableNodes { tried: Vec::new() });
    }

    let mut nodes: Vec<ProcessingNode> = summaries.iter().map(ProcessingNode::from_summary).collect();

    let assigned = task
        .filter(|task| task.auto_processing_node)
        .and_then(|task| task.processing_node)
        .and_then(|node_id| nodes.iter().find(|node| node.id == node_id));

    let target = match assigned {
        Some(node) => node,
        None => match least_loaded(&nodes).choose(rng) {
            Some(node) => *node,
            None => {
                return Err(FormError::NoUsableNodes {
                    tried: nodes
                        .iter()
                        .map(|node| NodeLink {
                            label: node.label.clone(),
                            url: node.url.clone(),
                        })
                        .collect(),
                })
            }
        },
    };

    let auto = ProcessingNode::auto_alias(target);
    nodes.insert(0, auto);
    Ok(nodes)
}

/// Enabled nodes tied at the lowest queue count among enabled nodes.
pub fn least_loaded(nodes: &[ProcessingNode]) -> Vec<&ProcessingNode> {
    let enabled = nodes.iter().filter(|node| node.enabled && !node.is_auto());
    let Some(min_queue) = enabled.clone().map(|node| node.queue_count).min() else {
        return Vec::new();
    };
    enabled.filter(|node| node.queue_count == min_queue).collect()
}

/// Key the form selects once the node list is published.
pub(crate) fn initial_node_key(task: Option<&TaskRef>) -> NodeKey {
    match task.and_then(|task| task.processing_node.map(|id| (id, task.auto_processing_node))) {
        Some((_, true)) | None => NodeKey::Auto,
        Some((id, false)) => NodeKey::Id(id),
    }
}
