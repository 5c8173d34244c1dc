use sha2::{Digest, Sha256};

/// The per-process fields stamped into every ObjectId: a 3-byte hash of the
/// host name and the low 16 bits of the OS process id.
///
/// Both are fixed for a generator's lifetime. Tests and multi-tenant hosts
/// can inject their own values with [`ProcessIdentity::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProcessIdentity {
    machine_hash: [u8; 3],
    process_id: u16,
}

impl ProcessIdentity {
    pub const fn new(machine_hash: [u8; 3], process_id: u16) -> Self {
        Self {
            machine_hash,
            process_id,
        }
    }

    /// The identity of the running process.
    ///
    /// The host name is taken from `HOSTNAME` (or `COMPUTERNAME` on Windows),
    /// then `/etc/hostname`, falling back to `"localhost"`.
    pub fn current() -> Self {
        Self::from_hostname(&hostname(), std::process::id() as u16)
    }

    /// Hashes `hostname` with SHA-256 and keeps the first three bytes.
    pub fn from_hostname(hostname: &str, process_id: u16) -> Self {
        let digest = Sha256::digest(hostname.as_bytes());
        Self {
            machine_hash: [digest[0], digest[1], digest[2]],
            process_id,
        }
    }

    pub const fn machine_hash(&self) -> [u8; 3] {
        self.machine_hash
    }

    pub const fn process_id(&self) -> u16 {
        self.process_id
    }
}

fn hostname() -> String {
    ["HOSTNAME", "COMPUTERNAME"]
        .into_iter()
        .find_map(|key| std::env::var(key).ok())
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_owned())
}
