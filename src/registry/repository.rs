//! Host lookup and CRUD on top of the registry store.

use std::sync::{Mutex, MutexGuard};

use super::models::{HostInput, HostRecord};
use super::store::{RegistryError, RegistryStore};

/// Host CRUD over a [`RegistryStore`].
///
/// Each call loads the full registry and mutating calls save it back. Within
/// one process, load-modify-save sequences are serialized by `write_lock`;
/// other processes writing the same file can still race.
pub struct HostRepository {
    store: RegistryStore,
    write_lock: Mutex<()>,
}

impl HostRepository {
    pub fn new(store: RegistryStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    /// All hosts in stored order.
    pub fn list(&self) -> Result<Vec<HostRecord>, RegistryError> {
        self.store.load()
    }

    pub fn find_by_ip(&self, ip: &str) -> Result<Option<HostRecord>, RegistryError> {
        Ok(self.store.load()?.into_iter().find(|h| h.ip == ip))
    }

    /// Create a host from `input`, applying creation defaults.
    pub fn add(&self, input: HostInput) -> Result<HostRecord, RegistryError> {
        let ip = match input.ip.as_deref() {
            Some(ip) if !ip.trim().is_empty() => ip.to_string(),
            _ => return Err(RegistryError::Validation("IP address required".to_string())),
        };

        let _guard = self.lock();
        let mut hosts = self.store.load()?;
        if hosts.iter().any(|h| h.ip == ip) {
            return Err(RegistryError::DuplicateKey(
                "Host with this IP already exists".to_string(),
            ));
        }

        let record = HostRecord::from_input(ip, input);
        hosts.push(record.clone());
        self.store.save(&hosts)?;

        tracing::info!("Added host {} ({})", record.ip, record.display_name());
        Ok(record)
    }

    /// Apply `input` to the host currently keyed by `ip`.
    ///
    /// Changing the key moves the host to the end of the registry; otherwise
    /// it keeps its position.
    pub fn update(&self, ip: &str, input: HostInput) -> Result<HostRecord, RegistryError> {
        let _guard = self.lock();
        let mut hosts = self.store.load()?;
        let index = hosts
            .iter()
            .position(|h| h.ip == ip)
            .ok_or_else(|| RegistryError::NotFound("Host not found".to_string()))?;

        let new_ip = match input.ip.as_deref() {
            Some(new_ip) if new_ip.trim().is_empty() => {
                return Err(RegistryError::Validation("IP address required".to_string()))
            }
            Some(new_ip) => new_ip.to_string(),
            None => ip.to_string(),
        };
        let key_changed = new_ip != ip;
        if key_changed && hosts.iter().any(|h| h.ip == new_ip) {
            return Err(RegistryError::DuplicateKey("New IP already in use".to_string()));
        }

        let updated = hosts[index].clone().merged(new_ip, input);
        if key_changed {
            hosts.retain(|h| h.ip != ip);
            hosts.push(updated.clone());
            tracing::info!("Re-keyed host {} to {}", ip, updated.ip);
        } else {
            hosts[index] = updated.clone();
            tracing::info!("Updated host {}", ip);
        }
        self.store.save(&hosts)?;

        Ok(updated)
    }

    /// Remove every host keyed by `ip`. Returns whether anything was removed.
    pub fn delete(&self, ip: &str) -> Result<bool, RegistryError> {
        let _guard = self.lock();
        let mut hosts = self.store.load()?;
        let before = hosts.len();
        hosts.retain(|h| h.ip != ip);

        if hosts.len() == before {
            return Ok(false);
        }

        self.store.save(&hosts)?;
        tracing::info!("Deleted host {}", ip);
        Ok(true)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // Guards no data, so poisoning is harmless.
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn repo() -> (TempDir, HostRepository) {
        let dir = tempdir().unwrap();
        let repo = HostRepository::new(RegistryStore::new(dir.path().join("hosts.json")));
        (dir, repo)
    }

    fn input(ip: &str) -> HostInput {
        HostInput {
            ip: Some(ip.to_string()),
            ..Default::default()
        }
    }

    fn ips(repo: &HostRepository) -> Vec<String> {
        repo.list().unwrap().into_iter().map(|h| h.ip).collect()
    }

    #[test]
    fn test_add_applies_defaults() {
        let (_dir, repo) = repo();
        let host = repo.add(input("10.0.0.5")).unwrap();

        assert_eq!(host.name.as_deref(), Some("10.0.0.5"));
        assert_eq!(host.category.as_deref(), Some("Other"));
        assert_eq!(host.critical, Some(false));
        assert_eq!(host.enabled, Some(true));
        assert_eq!(repo.find_by_ip("10.0.0.5").unwrap(), Some(host));
    }

    #[test]
    fn test_add_requires_ip() {
        let (_dir, repo) = repo();
        assert!(matches!(
            repo.add(HostInput::default()),
            Err(RegistryError::Validation(_))
        ));
        assert!(matches!(repo.add(input("  ")), Err(RegistryError::Validation(_))));
        assert!(!repo.store().exists());
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let (_dir, repo) = repo();
        repo.add(input("10.0.0.1")).unwrap();
        assert!(matches!(
            repo.add(input("10.0.0.1")),
            Err(RegistryError::DuplicateKey(_))
        ));
        assert_eq!(ips(&repo), vec!["10.0.0.1"]);
    }

    #[test]
    fn test_find_missing_host() {
        let (_dir, repo) = repo();
        assert_eq!(repo.find_by_ip("10.0.0.1").unwrap(), None);
    }

    #[test]
    fn test_update_preserves_unspecified_fields() {
        let (_dir, repo) = repo();
        repo.add(HostInput {
            name: Some("Server A".to_string()),
            ..input("10.0.0.1")
        })
        .unwrap();

        let updated = repo
            .update(
                "10.0.0.1",
                HostInput {
                    purpose: Some("backup".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name.as_deref(), Some("Server A"));
        assert_eq!(updated.purpose.as_deref(), Some("backup"));
        assert_eq!(repo.find_by_ip("10.0.0.1").unwrap(), Some(updated));
    }

    #[test]
    fn test_update_in_place_keeps_position() {
        let (_dir, repo) = repo();
        for ip in ["10.0.0.1", "10.0.0.2", "10.0.0.3"] {
            repo.add(input(ip)).unwrap();
        }

        repo.update("10.0.0.1", HostInput { notes: Some("rack 4".to_string()), ..Default::default() })
            .unwrap();
        assert_eq!(ips(&repo), vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    }

    #[test]
    fn test_update_key_change_moves_to_end() {
        let (_dir, repo) = repo();
        for ip in ["10.0.0.1", "10.0.0.2", "10.0.0.3"] {
            repo.add(input(ip)).unwrap();
        }

        let moved = repo.update("10.0.0.1", input("10.0.0.9")).unwrap();
        assert_eq!(moved.ip, "10.0.0.9");
        // The name was defaulted from the old IP on creation and is kept.
        assert_eq!(moved.name.as_deref(), Some("10.0.0.1"));
        assert_eq!(ips(&repo), vec!["10.0.0.2", "10.0.0.3", "10.0.0.9"]);
    }

    #[test]
    fn test_update_same_ip_in_body_is_not_a_key_change() {
        let (_dir, repo) = repo();
        repo.add(input("10.0.0.1")).unwrap();
        repo.add(input("10.0.0.2")).unwrap();

        repo.update("10.0.0.1", input("10.0.0.1")).unwrap();
        assert_eq!(ips(&repo), vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_update_errors() {
        let (_dir, repo) = repo();
        repo.add(input("10.0.0.1")).unwrap();
        repo.add(input("10.0.0.2")).unwrap();

        assert!(matches!(
            repo.update("10.0.0.1", input(" ")),
            Err(RegistryError::Validation(_))
        ));
        assert!(matches!(
            repo.update("10.0.0.7", input("10.0.0.8")),
            Err(RegistryError::NotFound(_))
        ));
        assert!(matches!(
            repo.update("10.0.0.1", input("10.0.0.2")),
            Err(RegistryError::DuplicateKey(_))
        ));
        assert_eq!(ips(&repo), vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_update_fills_missing_fields_of_sparse_record() {
        let (dir, repo) = repo();
        fs::write(
            dir.path().join("hosts.json"),
            r#"{"hosts": [{"ip": "10.0.0.1", "name": "Legacy"}]}"#,
        )
        .unwrap();

        let updated = repo
            .update("10.0.0.1", HostInput { critical: Some(true), ..Default::default() })
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("Legacy"));
        assert_eq!(updated.critical, Some(true));
        assert_eq!(updated.location.as_deref(), Some("Nakasero Hospital"));
        assert_eq!(updated.department.as_deref(), Some("IT"));
    }

    #[test]
    fn test_update_without_known_fields_rewrites_defaults() {
        let (dir, repo) = repo();
        fs::write(
            dir.path().join("hosts.json"),
            r#"{"hosts": [{"ip": "10.0.0.1", "name": "Legacy"}]}"#,
        )
        .unwrap();

        let updated = repo.update("10.0.0.1", HostInput::default()).unwrap();
        assert_eq!(updated.name.as_deref(), Some("Legacy"));
        assert_eq!(updated.category.as_deref(), Some("Other"));
    }

    #[test]
    fn test_ip_is_stored_as_sent() {
        let (_dir, repo) = repo();
        let host = repo.add(input(" 10.0.0.1")).unwrap();
        assert_eq!(host.ip, " 10.0.0.1");
        assert!(repo.find_by_ip(" 10.0.0.1").unwrap().is_some());
        assert!(repo.find_by_ip("10.0.0.1").unwrap().is_none());
    }

    #[test]
    fn test_extra_keys_survive_unrelated_writes() {
        let (dir, repo) = repo();
        let path = dir.path().join("hosts.json");
        fs::write(
            &path,
            r#"{"hosts":[{"ip":"10.0.0.1","name":"PACS","vlan":"20","mac":"aa:bb"}]}"#,
        )
        .unwrap();

        repo.add(input("10.0.0.2")).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["hosts"][0]["vlan"], "20");
        assert_eq!(raw["hosts"][0]["mac"], "aa:bb");
        assert!(raw["hosts"][1].get("vlan").is_none());

        let updated = repo
            .update("10.0.0.1", HostInput { purpose: Some("imaging".to_string()), ..Default::default() })
            .unwrap();
        assert_eq!(updated.extra["vlan"], "20");

        repo.delete("10.0.0.2").unwrap();
        let host = repo.find_by_ip("10.0.0.1").unwrap().unwrap();
        assert_eq!(host.extra["mac"], "aa:bb");
        assert_eq!(host.purpose.as_deref(), Some("imaging"));
    }

    #[test]
    fn test_delete() {
        let (_dir, repo) = repo();
        repo.add(input("10.0.0.1")).unwrap();
        repo.add(input("10.0.0.2")).unwrap();

        assert!(repo.delete("10.0.0.1").unwrap());
        assert_eq!(ips(&repo), vec!["10.0.0.2"]);
        assert!(!repo.delete("10.0.0.1").unwrap());
    }

    #[test]
    fn test_delete_absent_leaves_file_untouched() {
        let (_empty_dir, empty) = repo();
        assert!(!empty.delete("10.0.0.2").unwrap());
        assert!(!empty.store().exists());

        let (dir, repo) = repo();
        let path = dir.path().join("hosts.json");
        fs::write(&path, r#"{"hosts":[{"ip":"10.0.0.1"}]}"#).unwrap();

        assert!(!repo.delete("10.0.0.2").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"hosts":[{"ip":"10.0.0.1"}]}"#);
    }

    #[test]
    fn test_ips_stay_unique_across_mutations() {
        let (_dir, repo) = repo();
        for ip in ["10.0.0.1", "10.0.0.2", "10.0.0.3"] {
            repo.add(input(ip)).unwrap();
        }
        let _ = repo.add(input("10.0.0.2"));
        let _ = repo.update("10.0.0.3", input("10.0.0.1"));
        repo.update("10.0.0.3", input("10.0.0.4")).unwrap();
        repo.delete("10.0.0.2").unwrap();
        repo.add(input("10.0.0.2")).unwrap();
        let _ = repo.update("10.0.0.2", input("10.0.0.4"));

        let all = ips(&repo);
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
        assert_eq!(all, vec!["10.0.0.1", "10.0.0.4", "10.0.0.2"]);
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let (_dir, repo) = repo();
        let repo = std::sync::Arc::new(repo);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = repo.clone();
                std::thread::spawn(move || repo.add(input(&format!("10.0.1.{}", i))).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(repo.list().unwrap().len(), 8);
    }
}
