//! Parsing of `OWNER[:GROUP]` and `CURRENT_OWNER[:CURRENT_GROUP]` strings into numeric form.
//!
//! Names are looked up first, then the string is tried as a decimal id.
//! A leading `+` forces the numeric reading.
use super::IdentityResolver;
use crate::types::errors::{Error, ErrorKind, Result};
use crate::types::{IdLookup, OwnershipFilter, OwnershipSpec};

fn numeric(s: &str) -> Option<u32> {
    // u32::MAX is the "leave unchanged" value of chown(2) and cannot name an id.
    s.parse::<u32>().ok().filter(|id| *id != u32::MAX)
}

fn lookup(s: &str, by_name: impl Fn(&str) -> Option<u32>) -> IdLookup {
    if s.is_empty() {
        return IdLookup::NotSpecified;
    }
    if let Some(forced) = s.strip_prefix('+') {
        return numeric(forced).map_or_else(|| IdLookup::Failed(s.to_string()), IdLookup::Resolved);
    }
    by_name(s)
        .or_else(|| numeric(s))
        .map_or_else(|| IdLookup::Failed(s.to_string()), IdLookup::Resolved)
}

#[must_use]
pub fn lookup_user(resolver: &dyn IdentityResolver, s: &str) -> IdLookup {
    lookup(s, |n| resolver.name_to_uid(n))
}

#[must_use]
pub fn lookup_group(resolver: &dyn IdentityResolver, s: &str) -> IdLookup {
    lookup(s, |n| resolver.name_to_gid(n))
}

/// Split at ':'; a '.' separator is accepted only when the whole string is not a user name.
fn split_spec<'a>(resolver: &dyn IdentityResolver, s: &'a str) -> (&'a str, Option<&'a str>) {
    if let Some((user, group)) = s.split_once(':') {
        return (user, Some(group));
    }
    if resolver.name_to_uid(s).is_none() {
        if let Some((user, group)) = s.split_once('.') {
            return (user, Some(group));
        }
    }
    (s, None)
}

/// Parse the new ownership requested by the caller.
///
/// `OWNER:` (separator, empty group) selects the login group of OWNER.
///
/// # Errors
///
/// Returns an `Identity` error for unknown names, or when OWNER has no login group.
pub fn parse_owner_spec(resolver: &dyn IdentityResolver, s: &str) -> Result<OwnershipSpec> {
    let (user, group) = split_spec(resolver, s);
    let owner = lookup_user(resolver, user).into_option("user")?;
    let group = match group {
        Some(g) if !g.is_empty() => lookup_group(resolver, g).into_option("group")?,
        Some(_) => match owner {
            Some(uid) => Some(resolver.primary_gid_of(uid).ok_or_else(|| {
                Error::new(
                    ErrorKind::Identity,
                    format!("invalid spec: '{s}': no login group for user"),
                )
            })?),
            None => None,
        },
        None => None,
    };
    Ok(OwnershipSpec::new(owner, group))
}

/// Parse the `--from` filter. Either side may be omitted.
///
/// # Errors
///
/// Returns an `Identity` error for unknown names.
pub fn parse_filter_spec(resolver: &dyn IdentityResolver, s: &str) -> Result<OwnershipFilter> {
    let (user, group) = split_spec(resolver, s);
    let owner = lookup_user(resolver, user).into_option("user")?;
    let group = match group {
        Some(g) => lookup_group(resolver, g).into_option("group")?,
        None => None,
    };
    Ok(OwnershipFilter::new(owner, group))
}
