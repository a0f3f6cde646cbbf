// IdentityResolver over explicit passwd/group files, e.g. a chroot image or fixtures

use std::path::Path;

use super::IdentityResolver;
use crate::types::errors::{Error, ErrorKind, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
struct UserEntry {
    name: String,
    uid: u32,
    gid: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct GroupEntry {
    name: String,
    gid: u32,
}

/// Resolver reading colon-separated user and group databases once at load time.
/// The first entry wins when a name or id appears more than once.
#[derive(Clone, Debug, Default)]
pub struct EtcIdentityResolver {
    users: Vec<UserEntry>,
    groups: Vec<GroupEntry>,
}

impl EtcIdentityResolver {
    /// Load user and group databases from explicit paths.
    ///
    /// # Errors
    ///
    /// Returns an IO error if either file cannot be read.
    pub fn from_paths(passwd: &Path, group: &Path) -> Result<Self> {
        let read = |p: &Path| {
            std::fs::read_to_string(p).map_err(|e| {
                Error::new(ErrorKind::Io, format!("read {}: {e}", p.display()))
            })
        };
        Ok(Self::parse(&read(passwd)?, &read(group)?))
    }

    /// Build from database contents. Malformed lines and comments are skipped.
    #[must_use]
    pub fn parse(passwd: &str, group: &str) -> Self {
        let users = passwd
            .lines()
            .filter(|l| !l.starts_with('#'))
            .filter_map(|line| {
                // name:passwd:uid:gid:gecos:home:shell
                let parts: Vec<&str> = line.split(':').collect();
                if parts.len() < 4 || parts[0].is_empty() {
                    return None;
                }
                Some(UserEntry {
                    name: parts[0].to_string(),
                    uid: parts[2].parse().ok()?,
                    gid: parts[3].parse().ok()?,
                })
            })
            .collect();
        let groups = group
            .lines()
            .filter(|l| !l.starts_with('#'))
            .filter_map(|line| {
                // name:passwd:gid:members
                let parts: Vec<&str> = line.split(':').collect();
                if parts.len() < 3 || parts[0].is_empty() {
                    return None;
                }
                Some(GroupEntry {
                    name: parts[0].to_string(),
                    gid: parts[2].parse().ok()?,
                })
            })
            .collect();
        Self { users, groups }
    }
}

impl IdentityResolver for EtcIdentityResolver {
    fn name_to_uid(&self, name: &str) -> Option<u32> {
        self.users.iter().find(|u| u.name == name).map(|u| u.uid)
    }

    fn name_to_gid(&self, name: &str) -> Option<u32> {
        self.groups.iter().find(|g| g.name == name).map(|g| g.gid)
    }

    fn uid_to_name(&self, uid: u32) -> Option<String> {
        self.users.iter().find(|u| u.uid == uid).map(|u| u.name.clone())
    }

    fn gid_to_name(&self, gid: u32) -> Option<String> {
        self.groups.iter().find(|g| g.gid == gid).map(|g| g.name.clone())
    }

    fn primary_gid_of(&self, uid: u32) -> Option<u32> {
        self.users.iter().find(|u| u.uid == uid).map(|u| u.gid)
    }
}
