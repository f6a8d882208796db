//! Juju client configuration

/// Configuration for the Juju client
#[derive(Debug, Clone)]
pub struct JujuClientConfig {
    /// Path to the juju executable
    ///
    /// Defaults to "juju" (assumes it's on PATH).
    pub binary: String,

    /// Model to operate on; the controller's current model when unset
    pub model: Option<String>,

    /// Timeout for a single juju invocation in seconds
    pub timeout_secs: u64,
}

impl Default for JujuClientConfig {
    fn default() -> Self {
        Self {
            binary: "juju".to_string(),
            model: None,
            timeout_secs: 600,
        }
    }
}

impl JujuClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(mut self, binary: String) -> Self {
        self.binary = binary;
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_juju_client_config_builder() {
        let config = JujuClientConfig::new()
            .with_binary("/snap/bin/juju".to_string())
            .with_model(Some("openstack".to_string()))
            .with_timeout(60);

        assert_eq!(config.binary, "/snap/bin/juju");
        assert_eq!(config.model.as_deref(), Some("openstack"));
        assert_eq!(config.timeout_secs, 60);
    }
}
