//! Identity of the machine running the dashboard.

/// Source of the server identity shown alongside host status.
pub trait EnvironmentInfo: Send + Sync {
    fn hostname(&self) -> String;
    fn primary_address(&self) -> String;
}

/// Reads identity from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl EnvironmentInfo for SystemEnvironment {
    fn hostname(&self) -> String {
        let name = gethostname::gethostname().to_string_lossy().trim().to_string();
        if name.is_empty() {
            "Unknown".to_string()
        } else {
            name
        }
    }

    fn primary_address(&self) -> String {
        match local_ip_address::local_ip() {
            Ok(ip) => ip.to_string(),
            Err(e) => {
                tracing::warn!("Could not determine local IP address: {}", e);
                "Unknown".to_string()
            }
        }
    }
}

/// Fixed identity used by tests.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct StaticEnvironment {
    pub hostname: String,
    pub address: String,
}

#[cfg(test)]
impl EnvironmentInfo for StaticEnvironment {
    fn hostname(&self) -> String {
        self.hostname.clone()
    }

    fn primary_address(&self) -> String {
        self.address.clone()
    }
}
