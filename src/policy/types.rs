use serde::Serialize;

/// How symlinks are handled during recursive descent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalPolicy {
    /// `-P`: never descend through a symlink.
    #[default]
    NoFollow,
    /// `-H`: descend through traversal roots that are symlinks to directories.
    FollowCommandLineSymlinks,
    /// `-L`: descend through every symlink that resolves to a directory.
    FollowAllSymlinks,
}

impl TraversalPolicy {
    /// Mutually exclusive flags: the last one given wins, `NoFollow` when none.
    pub fn last_wins<I: IntoIterator<Item = TraversalPolicy>>(flags: I) -> Self {
        flags.into_iter().last().unwrap_or_default()
    }

    /// Whether a traversal root that is a symlink to a directory is descended into.
    #[must_use]
    pub const fn follows_roots(self) -> bool {
        !matches!(self, TraversalPolicy::NoFollow)
    }

    /// Whether a symlink found below a root is descended into.
    #[must_use]
    pub const fn follows_children(self) -> bool {
        matches!(self, TraversalPolicy::FollowAllSymlinks)
    }
}

/// Whether a change aimed at a symlink affects the link or its referent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dereference {
    /// Referent, except for recursive `NoFollow` runs where it is the link.
    #[default]
    Unspecified,
    Referent,
    Link,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RootProtection {
    /// Operate on `/` like any other directory, with a warning.
    #[default]
    Off,
    /// Abort a recursive run that reaches `/`.
    Preserve,
}

/// Which human-readable diagnostics reach the `AuditSink`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Suppress most failure diagnostics.
    Silent,
    /// Failure diagnostics only.
    #[default]
    Normal,
    /// Failures plus a line for every entry whose ownership changed.
    Changes,
    /// A line for every processed entry.
    Verbose,
}
