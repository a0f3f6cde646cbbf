//! Pre-order traversal of one or more roots.
//!
//! Every directory is changed before its children, and children are visited in
//! byte-lexicographic order. Children are observed and changed relative to a
//! handle on their parent that was checked against the parent's observed identity.
use std::path::Path;

use rustix::fd::{AsFd, BorrowedFd};

use super::report::Reporter;
use crate::api::errors::ApiError;
use crate::fs::restricted::classify_io;
use crate::fs::{
    change_owner, observe, observe_at, observe_fd, open_dir, read_dir_sorted,
    resolve_symlink_target, Observed,
};
use crate::policy::types::RootProtection;
use crate::policy::Policy;
use crate::types::{
    EntryIdentity, EntryRecord, FailureReason, FileKind, OwnershipFilter, OwnershipInfo,
    OwnershipSpec,
};

pub(crate) fn root_warning(path: &Path) -> String {
    format!("it is dangerous to operate recursively on '{}'", path.display())
}

pub(crate) struct Walk<'a> {
    pub policy: &'a Policy,
    pub spec: &'a OwnershipSpec,
    pub filter: &'a OwnershipFilter,
    pub reporter: Reporter<'a>,
    pub root: Option<EntryIdentity>,
    ancestors: Vec<EntryIdentity>,
    pub entries: Vec<EntryRecord>,
    pub warnings: Vec<String>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(
        policy: &'a Policy,
        spec: &'a OwnershipSpec,
        filter: &'a OwnershipFilter,
        reporter: Reporter<'a>,
        root: Option<EntryIdentity>,
    ) -> Self {
        Self {
            policy,
            spec,
            filter,
            reporter,
            root,
            ancestors: Vec::new(),
            entries: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Process one traversal root.
    ///
    /// Only root protection aborts; every other problem is recorded and the walk continues.
    pub(crate) fn root(&mut self, path: &Path) -> Result<(), ApiError> {
        if !self.policy.recursive {
            let follow = self.policy.affects_referent();
            return match observe(path, follow) {
                Ok(obs) => self.entry(path, None, &obs, follow),
                Err(e) => {
                    self.observe_failed(path, follow, &e);
                    Ok(())
                }
            };
        }
        let obs = match observe(path, false) {
            Ok(obs) => obs,
            Err(e) => {
                self.observe_failed(path, false, &e);
                return Ok(());
            }
        };
        match obs.identity.kind {
            FileKind::Symlink => self.symlink(path, None, &obs, self.policy.traversal.follows_roots()),
            FileKind::Directory => self.directory(path, None, &obs),
            _ => self.entry(path, None, &obs, false),
        }
    }

    fn observe_failed(&mut self, path: &Path, follow: bool, e: &std::io::Error) {
        let link_exists = std::fs::symlink_metadata(path).is_ok_and(|md| md.file_type().is_symlink());
        let reason = if follow && link_exists {
            FailureReason::CannotDereference(e.to_string())
        } else {
            classify_io(e)
        };
        self.fail(path, reason, None, None);
    }

    fn fail(
        &mut self,
        path: &Path,
        reason: FailureReason,
        before: Option<OwnershipInfo>,
        identity: Option<&EntryIdentity>,
    ) {
        log::debug!("{}: {reason}", path.display());
        let rec = EntryRecord::failed(path.to_path_buf(), reason, before);
        self.reporter.entry(&rec, identity);
        self.entries.push(rec);
    }

    fn warn(&mut self, msg: String) {
        self.reporter.warn(&msg);
        self.warnings.push(msg);
    }

    /// Change one entry, after the root-protection check.
    fn entry(
        &mut self,
        path: &Path,
        parent: Option<BorrowedFd<'_>>,
        observed: &Observed,
        follow: bool,
    ) -> Result<(), ApiError> {
        let is_root = self
            .root
            .is_some_and(|r| r.same_object(&observed.identity));
        if self.policy.recursive && is_root {
            if self.policy.root_protection == RootProtection::Preserve {
                return Err(ApiError::RootProtected(path.display().to_string()));
            }
            self.warn(root_warning(path));
        }
        let res = change_owner(path, parent, observed, self.spec, self.filter, follow);
        let rec = EntryRecord {
            path: path.to_path_buf(),
            outcome: res.outcome,
            reason: res.reason,
            before: Some(res.before),
            secondary: res.secondary,
        };
        self.reporter.entry(&rec, Some(&observed.identity));
        self.entries.push(rec);
        Ok(())
    }

    /// A symlink reached as a root or a child.
    ///
    /// When `descend` is set and the link resolves to a directory, the link itself
    /// is changed first and then its referent is walked.
    fn symlink(
        &mut self,
        path: &Path,
        parent: Option<BorrowedFd<'_>>,
        link: &Observed,
        descend: bool,
    ) -> Result<(), ApiError> {
        if descend {
            if let Ok(target) = observe(path, true) {
                if target.identity.kind == FileKind::Directory {
                    self.entry(path, parent, link, false)?;
                    return match resolve_symlink_target(path) {
                        Some(dir) => self.directory(&dir, None, &target),
                        None => {
                            self.fail(
                                path,
                                FailureReason::CannotDereference("unresolvable link".into()),
                                Some(link.owner),
                                Some(&link.identity),
                            );
                            Ok(())
                        }
                    };
                }
            }
        }
        if !self.policy.affects_referent() {
            return self.entry(path, parent, link, false);
        }
        match observe(path, true) {
            Ok(target) => self.entry(path, parent, &target, true),
            Err(e) => {
                self.fail(
                    path,
                    FailureReason::CannotDereference(e.to_string()),
                    Some(link.owner),
                    Some(&link.identity),
                );
                Ok(())
            }
        }
    }

    fn directory(
        &mut self,
        path: &Path,
        parent: Option<BorrowedFd<'_>>,
        observed: &Observed,
    ) -> Result<(), ApiError> {
        if self
            .ancestors
            .iter()
            .any(|a| a.same_object(&observed.identity))
        {
            self.warn(format!(
                "'{}': directory cycle, already being visited",
                path.display()
            ));
            return Ok(());
        }
        self.entry(path, parent, observed, false)?;

        let names = match read_dir_sorted(path) {
            Ok(names) => names,
            Err(e) => {
                self.fail(
                    path,
                    FailureReason::CannotReadDir(e.to_string()),
                    Some(observed.owner),
                    Some(&observed.identity),
                );
                return Ok(());
            }
        };
        let dir = match open_dir(path, false) {
            Ok(fd) => fd,
            Err(e) => {
                self.fail(
                    path,
                    FailureReason::CannotReadDir(e.to_string()),
                    Some(observed.owner),
                    Some(&observed.identity),
                );
                return Ok(());
            }
        };
        match observe_fd(dir.as_fd()) {
            Ok(opened) if opened.identity.same_object(&observed.identity) => {}
            Ok(_) => {
                self.fail(
                    path,
                    FailureReason::InodeChanged,
                    Some(observed.owner),
                    Some(&observed.identity),
                );
                return Ok(());
            }
            Err(e) => {
                self.fail(
                    path,
                    FailureReason::CannotReadDir(e.to_string()),
                    Some(observed.owner),
                    Some(&observed.identity),
                );
                return Ok(());
            }
        }

        self.ancestors.push(observed.identity);
        for name in names {
            let child = path.join(&name);
            let obs = match observe_at(dir.as_fd(), &name, false) {
                Ok(obs) => obs,
                Err(e) => {
                    self.fail(&child, classify_io(&e), None, None);
                    continue;
                }
            };
            let descend = self.policy.traversal.follows_children();
            match obs.identity.kind {
                FileKind::Symlink => self.symlink(&child, Some(dir.as_fd()), &obs, descend)?,
                FileKind::Directory => self.directory(&child, Some(dir.as_fd()), &obs)?,
                _ => self.entry(&child, Some(dir.as_fd()), &obs, false)?,
            }
        }
        self.ancestors.pop();
        Ok(())
    }
}
