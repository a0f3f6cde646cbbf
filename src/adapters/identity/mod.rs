pub mod etc;
pub mod nss;
pub mod parse;

pub use etc::EtcIdentityResolver;
pub use nss::NssIdentityResolver;
pub use parse::{lookup_group, lookup_user, parse_filter_spec, parse_owner_spec};

/// Maps user and group names to numeric ids and back.
///
/// The traversal engine only consumes numeric ids; names are used to parse
/// caller input and to render diagnostics.
pub trait IdentityResolver: Send + Sync {
    fn name_to_uid(&self, name: &str) -> Option<u32>;
    fn name_to_gid(&self, name: &str) -> Option<u32>;
    fn uid_to_name(&self, uid: u32) -> Option<String>;
    fn gid_to_name(&self, gid: u32) -> Option<String>;
    /// Login group of `uid`, used for `OWNER:` specs.
    fn primary_gid_of(&self, uid: u32) -> Option<u32>;
}
