use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Queue depth at which `add` starts shedding blocks.
    pub max_queue: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self { max_queue: 8192 }
    }
}
