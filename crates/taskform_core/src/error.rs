use std::fmt;

use crate::NodeLink;

/// Configuration problems that block the form until the user retries.
///
/// Transient transport failures never become a `FormError`; they are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// No node can take the task. `tried` lists the nodes we saw, if any.
    NoUsableNodes { tried: Vec<NodeLink> },
    /// The preset endpoint returned an empty list.
    NoPresets,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::NoUsableNodes { tried } => {
                write!(f, "There are no usable processing nodes. ")?;
                if !tried.is_empty() {
                    writeln!(f, "We tried to reach:")?;
                    for node in tried {
                        writeln!(f, "  - {} <{}>", node.label, node.url)?;
                    }
                }
                write!(
                    f,
                    "Make sure that at least one processing node is reachable and that you have \
                     granted the current user sufficient permissions to view the processing node \
                     (Administration -- Processing Nodes -- Select Node -- Object Permissions -- \
                     Add User/Group and check CAN VIEW PROCESSING NODE). If you are bringing a \
                     node back online, it will take about 30 seconds for it to be recognized."
                )
            }
            FormError::NoPresets => write!(
                f,
                "There are no presets. Please create a system preset from the \
                 Administration -- Presets page, then try again."
            ),
        }
    }
}

impl std::error::Error for FormError {}
