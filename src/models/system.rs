//! Execution environment description
//!
//! Free-form, ordered key/value pairs shown next to a result set. Never used
//! in scoring.

use crate::config::ServerConfig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Environment variable holding the deployment region of the server
pub const REGION_ENV: &str = "CPURB_REGION";
/// Environment variable holding the memory size of the server in megabytes
pub const MEMORY_ENV: &str = "CPURB_MEMORY_MB";

/// Ordered string-keyed description of where a run happened
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemInfo {
    entries: Vec<(String, String)>,
}

impl SystemInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, keeping the original position of existing keys
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Describe the machine running a local benchmark
    pub fn detect_local() -> Self {
        let mut info = Self::new();
        info.insert("platform", std::env::consts::OS);
        info.insert("arch", std::env::consts::ARCH);
        info.insert(
            "cores",
            std::thread::available_parallelism()
                .map(|n| n.get().to_string())
                .unwrap_or_else(|_| "N/A".to_string()),
        );
        info.insert("memory", local_memory_label());
        info.insert("version", env!("CARGO_PKG_VERSION"));
        info
    }

    /// Describe the server process answering the benchmark endpoint
    pub fn detect_server(server: &ServerConfig) -> Self {
        Self::detect_server_with(server, |key| std::env::var(key).ok())
    }

    /// Same as [`SystemInfo::detect_server`] with an injectable environment lookup
    pub fn detect_server_with<F>(server: &ServerConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut info = Self::new();
        info.insert("platform", server.platform_label.clone());
        info.insert(
            "region",
            lookup(REGION_ENV).unwrap_or_else(|| "Unknown".to_string()),
        );
        info.insert("version", format!("cpurb {}", env!("CARGO_PKG_VERSION")));
        info.insert("arch", std::env::consts::ARCH);
        info.insert(
            "memory",
            lookup(MEMORY_ENV)
                .map(|mb| format!("{}MB", mb))
                .unwrap_or_else(|| "Default".to_string()),
        );
        info.insert("timestamp", chrono::Utc::now().to_rfc3339());
        info
    }
}

fn local_memory_label() -> String {
    let mut system = sysinfo::System::new();
    system.refresh_memory();
    memory_label(system.total_memory())
}

/// Total memory in GB with one decimal, "N/A" when unknown
fn memory_label(total_bytes: u64) -> String {
    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
    if total_bytes == 0 {
        return "N/A".to_string();
    }
    format!("{:.1}GB", total_bytes as f64 / GIB)
}

impl Serialize for SystemInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        super::ordered::serialize(&self.entries, serializer)
    }
}

impl<'de> Deserialize<'de> for SystemInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self {
            entries: super::ordered::deserialize(deserializer)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut info = SystemInfo::new();
        info.insert("a", "1");
        info.insert("b", "2");
        info.insert("a", "3");

        let keys: Vec<&str> = info.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(info.get("a"), Some("3"));
        assert_eq!(info.len(), 2);
    }

    #[test]
    fn test_local_detection() {
        let info = SystemInfo::detect_local();
        assert!(!info.get("platform").unwrap().is_empty());
        assert!(info.get("cores").is_some());
        assert_eq!(info.get("version"), Some(env!("CARGO_PKG_VERSION")));

        let memory = info.get("memory").unwrap();
        assert!(memory == "N/A" || memory.ends_with("GB"), "memory = {}", memory);
        let keys: Vec<&str> = info.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["platform", "arch", "cores", "memory", "version"]);
    }

    #[test]
    fn test_memory_label() {
        assert_eq!(memory_label(0), "N/A");
        assert_eq!(memory_label(8 * 1024 * 1024 * 1024), "8.0GB");
        assert_eq!(memory_label(1536 * 1024 * 1024), "1.5GB");
    }

    #[test]
    fn test_server_detection_with_env() {
        let server = ServerConfig::default();
        let info = SystemInfo::detect_server_with(&server, |key| match key {
            REGION_ENV => Some("fra1".to_string()),
            MEMORY_ENV => Some("1024".to_string()),
            _ => None,
        });

        assert_eq!(info.get("platform"), Some("Serverless Function"));
        assert_eq!(info.get("region"), Some("fra1"));
        assert_eq!(info.get("memory"), Some("1024MB"));
        assert!(info.get("timestamp").is_some());

        let keys: Vec<&str> = info.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["platform", "region", "version", "arch", "memory", "timestamp"]);
    }

    #[test]
    fn test_server_detection_without_env() {
        let info = SystemInfo::detect_server_with(&ServerConfig::default(), |_| None);
        assert_eq!(info.get("region"), Some("Unknown"));
        assert_eq!(info.get("memory"), Some("Default"));
    }

    #[test]
    fn test_serde_keeps_order() {
        let mut info = SystemInfo::new();
        info.insert("zone", "z");
        info.insert("arch", "a");
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"zone":"z","arch":"a"}"#);
        let decoded: SystemInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, info);
    }
}
