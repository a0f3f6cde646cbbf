// Default IdentityResolver implementation backed by the system name service

use nix::unistd::{Gid, Group, Uid, User};

use super::IdentityResolver;

/// Resolver that asks the C library (getpwnam_r/getgrgid_r and friends), so
/// every NSS source configured on the host is consulted.
///
/// Lookup errors are logged and treated as "not found".
#[derive(Clone, Copy, Debug, Default)]
pub struct NssIdentityResolver;

fn user_by_name(name: &str) -> Option<User> {
    User::from_name(name)
        .map_err(|e| log::debug!("user lookup '{name}': {e}"))
        .ok()
        .flatten()
}

fn user_by_uid(uid: u32) -> Option<User> {
    User::from_uid(Uid::from_raw(uid))
        .map_err(|e| log::debug!("user lookup {uid}: {e}"))
        .ok()
        .flatten()
}

fn group_by_name(name: &str) -> Option<Group> {
    Group::from_name(name)
        .map_err(|e| log::debug!("group lookup '{name}': {e}"))
        .ok()
        .flatten()
}

fn group_by_gid(gid: u32) -> Option<Group> {
    Group::from_gid(Gid::from_raw(gid))
        .map_err(|e| log::debug!("group lookup {gid}: {e}"))
        .ok()
        .flatten()
}

impl IdentityResolver for NssIdentityResolver {
    fn name_to_uid(&self, name: &str) -> Option<u32> {
        user_by_name(name).map(|u| u.uid.as_raw())
    }

    fn name_to_gid(&self, name: &str) -> Option<u32> {
        group_by_name(name).map(|g| g.gid.as_raw())
    }

    fn uid_to_name(&self, uid: u32) -> Option<String> {
        user_by_uid(uid).map(|u| u.name)
    }

    fn gid_to_name(&self, gid: u32) -> Option<String> {
        group_by_gid(gid).map(|g| g.name)
    }

    fn primary_gid_of(&self, uid: u32) -> Option<u32> {
        user_by_uid(uid).map(|u| u.gid.as_raw())
    }
}
