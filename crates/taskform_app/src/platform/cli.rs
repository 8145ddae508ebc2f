use std::path::PathBuf;

use clap::Parser;
use taskform_core::TaskRef;

/// Configure and launch a processing task.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "taskform", version)]
pub struct Cli {
    /// RON config file (default: ./taskform.ron when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Server root, overriding the config file.
    #[arg(long)]
    pub server: Option<String>,

    /// Name of the task being edited.
    #[arg(long)]
    pub name: Option<String>,

    /// Node the edited task is currently assigned to.
    #[arg(long)]
    pub task_node: Option<u64>,

    /// The edited task's node was picked automatically.
    #[arg(long, requires = "task_node")]
    pub auto_assigned: bool,

    /// Also write logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The task being edited, if any task flag was given.
    pub fn task(&self) -> Option<TaskRef> {
        if self.name.is_none() && self.task_node.is_none() {
            return None;
        }
        Some(TaskRef {
            name: self.name.clone(),
            processing_node: self.task_node,
            auto_processing_node: self.auto_assigned,
        })
    }
}
