use serde::{Deserialize, Serialize};

/// A group of application-relative file paths placed in their own image layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    #[serde(default)]
    pub paths: Vec<String>,
}

impl Slice {
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Slices in precedence order. Consumers assemble layers in this order.
pub type Slices = Vec<Slice>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    #[serde(rename = "type")]
    pub process_type: String,
    pub command: String,
}

impl Process {
    pub fn new(process_type: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            process_type: process_type.into(),
            command: command.into(),
        }
    }
}

/// Contents of `launch.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processes: Vec<Process>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slices: Slices,
}

impl LaunchMetadata {
    /// Builds the same command under each of `types`.
    pub fn with_processes(types: &[&str], command: &str) -> Self {
        Self {
            processes: types
                .iter()
                .map(|process_type| Process::new(*process_type, command))
                .collect(),
            slices: Vec::new(),
        }
    }

    pub fn with_slices(mut self, slices: Slices) -> Self {
        self.slices = slices;
        self
    }
}
