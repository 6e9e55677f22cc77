//! Plugin registry configuration.

use serde::{Deserialize, Serialize};

/// Registry limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Maximum number of registered plugins. Unlimited when unset.
    #[serde(default)]
    pub max_plugins: Option<usize>,
}
