//! Azure resource identifier parsing.
//!
//! Identifiers look like
//! `/subscriptions/{sub}/resourceGroups/{group}/providers/{namespace}/{type}/{name}`.
//! Malformed identifiers show up in real listings (cross-subscription or
//! legacy references), so parsing reports an error value and never panics.

use crate::error::SweepError;

pub const COMPUTE_NAMESPACE: &str = "Microsoft.Compute";
pub const DISK_TYPE: &str = "disks";

const MIN_SEGMENTS: usize = 9;
const GROUP_SEGMENT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId<'a> {
    pub subscription: &'a str,
    pub resource_group: &'a str,
    pub namespace: &'a str,
    pub resource_type: &'a str,
    pub name: &'a str,
}

impl<'a> ResourceId<'a> {
    /// Parses a managed disk identifier. Anything that is not
    /// `.../providers/Microsoft.Compute/disks/{name}` is rejected.
    ///
    /// ARM treats identifiers case-insensitively, so the namespace and type
    /// are compared ignoring ASCII case.
    pub fn parse_disk(raw: &'a str) -> Result<Self, SweepError> {
        let id = Self::parse(raw)?;

        if !id.namespace.eq_ignore_ascii_case(COMPUTE_NAMESPACE)
            || !id.resource_type.eq_ignore_ascii_case(DISK_TYPE)
        {
            return Err(SweepError::InvalidIdentifierFormat(raw.to_string()));
        }

        Ok(id)
    }

    fn parse(raw: &'a str) -> Result<Self, SweepError> {
        let parts: Vec<&str> = raw.split('/').collect();

        if parts.len() < MIN_SEGMENTS {
            return Err(SweepError::InvalidIdentifierFormat(raw.to_string()));
        }

        Ok(ResourceId {
            subscription: parts[2],
            resource_group: parts[GROUP_SEGMENT],
            namespace: parts[6],
            resource_type: parts[7],
            name: parts[8],
        })
    }
}

/// Resource group of any resource, taken from segment 4 of its identifier.
pub fn resource_group_of(raw: &str) -> Option<&str> {
    raw.split('/')
        .nth(GROUP_SEGMENT)
        .filter(|group| !group.is_empty())
}
