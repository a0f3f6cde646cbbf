pub mod handle;
pub mod meta;
pub mod restricted;
pub mod walk;

pub use handle::{close_checked, open_dir, open_parent};
pub use meta::{
    observe, observe_at, observe_fd, resolve_symlink_target, root_identity, Observed,
};
pub use restricted::{
    change_owner, open_entry, ordinary_chown, restricted_chown, ChangeResult, OpenOutcome,
    Restricted, RestrictedStatus,
};
pub use walk::read_dir_sorted;
