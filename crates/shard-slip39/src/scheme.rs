//! Two-level split and recombine over whole share sets.
//!
//! `split` strengthens the master secret, splits it across groups, then
//! splits each group secret across that group's members, emitting one
//! `Share` per member. `combine` reverses the pipeline and enforces the
//! share-set consistency rules. `summarize` runs only the grouping and
//! consistency stage, producing a have/need report a recovery flow can
//! prompt from without touching any key derivation.

use std::collections::BTreeMap;

use rand::rngs::OsRng;
use rand::RngCore;
use shard_primitives::Secret;
use zeroize::{Zeroize, Zeroizing};

use crate::shamir::{recover_secret, split_secret, MAX_SHARE_COUNT};
use crate::share::{Share, ID_BITS};
use crate::{cipher, Slip39Error};

/// Default iteration exponent for new splits.
const DEFAULT_ITERATION_EXPONENT: u8 = 1;

/// Member sharing parameters for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    member_threshold: u8,
    member_count: u8,
}

impl GroupSpec {
    /// Create a group spec.
    ///
    /// # Arguments
    /// * `member_threshold` - Shares needed from this group, `1..=member_count`.
    /// * `member_count` - Shares issued to this group, up to 16.
    ///
    /// # Returns
    /// `Ok(GroupSpec)`, or `InvalidParameters` out of bounds.
    pub fn new(member_threshold: u8, member_count: u8) -> Result<Self, Slip39Error> {
        if member_threshold == 0
            || member_threshold > member_count
            || member_count > MAX_SHARE_COUNT
        {
            return Err(Slip39Error::InvalidParameters(format!(
                "group of {} members with threshold {} is out of range",
                member_count, member_threshold
            )));
        }
        Ok(GroupSpec {
            member_threshold,
            member_count,
        })
    }

    /// Shares needed from this group.
    pub fn member_threshold(&self) -> u8 {
        self.member_threshold
    }

    /// Shares issued to this group.
    pub fn member_count(&self) -> u8 {
        self.member_count
    }
}

/// Full parameters of a split: the groups, how many of them recovery
/// needs, and the strengthening cost.
#[derive(Debug, Clone)]
pub struct SplitSpec {
    group_threshold: u8,
    groups: Vec<GroupSpec>,
    iteration_exponent: u8,
}

impl SplitSpec {
    /// Create a split spec with the default iteration exponent.
    ///
    /// # Arguments
    /// * `group_threshold` - Groups required for recovery, `1..=groups.len()`.
    /// * `groups` - Per-group member parameters, at most 16 groups.
    ///
    /// # Returns
    /// `Ok(SplitSpec)`, or `InvalidParameters` out of bounds.
    pub fn new(group_threshold: u8, groups: Vec<GroupSpec>) -> Result<Self, Slip39Error> {
        if group_threshold == 0
            || group_threshold as usize > groups.len()
            || groups.len() > MAX_SHARE_COUNT as usize
        {
            return Err(Slip39Error::InvalidParameters(format!(
                "group threshold {} of {} groups is out of range",
                group_threshold,
                groups.len()
            )));
        }
        Ok(SplitSpec {
            group_threshold,
            groups,
            iteration_exponent: DEFAULT_ITERATION_EXPONENT,
        })
    }

    /// Create a spec with a single group, the common flat sharing case.
    ///
    /// # Arguments
    /// * `member_threshold` - Shares needed for recovery.
    /// * `member_count` - Shares produced.
    pub fn single_group(member_threshold: u8, member_count: u8) -> Result<Self, Slip39Error> {
        SplitSpec::new(1, vec![GroupSpec::new(member_threshold, member_count)?])
    }

    /// Override the iteration exponent, `0..=20`.
    ///
    /// The wire field is five bits wide, but exponents above 20 overflow
    /// the KDF's u32 iteration count, so the usable range ends there.
    pub fn with_iteration_exponent(mut self, exponent: u8) -> Result<Self, Slip39Error> {
        if exponent > cipher::MAX_ITERATION_EXPONENT {
            return Err(Slip39Error::InvalidParameters(format!(
                "iteration exponent {} exceeds {}",
                exponent,
                cipher::MAX_ITERATION_EXPONENT
            )));
        }
        self.iteration_exponent = exponent;
        Ok(self)
    }

    /// Groups required for recovery.
    pub fn group_threshold(&self) -> u8 {
        self.group_threshold
    }

    /// The per-group member parameters.
    pub fn groups(&self) -> &[GroupSpec] {
        &self.groups
    }

    /// The strengthening iteration exponent.
    pub fn iteration_exponent(&self) -> u8 {
        self.iteration_exponent
    }
}

/// Split a master secret into two-level threshold shares.
///
/// # Arguments
/// * `secret` - The 16- or 32-byte master secret.
/// * `spec` - Group layout and strengthening cost.
/// * `passphrase` - Strengthening passphrase, printable ASCII; empty for none.
///
/// # Returns
/// One `Vec<Share>` per group, in spec order, or a typed error.
pub fn split(
    secret: &Secret,
    spec: &SplitSpec,
    passphrase: &str,
) -> Result<Vec<Vec<Share>>, Slip39Error> {
    check_passphrase(passphrase)?;

    let identifier = random_identifier();
    let strengthened = Zeroizing::new(cipher::encrypt(
        secret.as_bytes(),
        passphrase.as_bytes(),
        identifier,
        spec.iteration_exponent,
    )?);

    let group_count = spec.groups.len() as u8;
    let mut group_shares = split_secret(spec.group_threshold, group_count, &strengthened)?;

    let mut output = Vec::with_capacity(spec.groups.len());
    for ((group_index, group_secret), group_spec) in group_shares.iter().zip(&spec.groups) {
        let members = split_secret(
            group_spec.member_threshold,
            group_spec.member_count,
            group_secret,
        )?;
        let shares = members
            .into_iter()
            .map(|(member_index, value)| {
                Share::new(
                    identifier,
                    spec.iteration_exponent,
                    *group_index,
                    spec.group_threshold,
                    group_count,
                    member_index,
                    group_spec.member_threshold,
                    value,
                )
            })
            .collect();
        output.push(shares);
    }

    for (_, group_secret) in group_shares.iter_mut() {
        group_secret.zeroize();
    }

    Ok(output)
}

/// Generate a fresh random master secret and split it in one step.
///
/// # Arguments
/// * `spec` - Group layout and strengthening cost.
/// * `passphrase` - Strengthening passphrase, printable ASCII.
/// * `secret_len` - 16 or 32 bytes of entropy.
///
/// # Returns
/// The generated secret together with its shares.
pub fn split_random(
    spec: &SplitSpec,
    passphrase: &str,
    secret_len: usize,
) -> Result<(Secret, Vec<Vec<Share>>), Slip39Error> {
    let secret = Secret::generate(secret_len)?;
    let shares = split(&secret, spec, passphrase)?;
    Ok((secret, shares))
}

/// Recombine shares into the master secret.
///
/// Shares may come in any order and may span more groups than the group
/// threshold; every represented group must meet its member threshold.
/// A wrong passphrase silently yields a different valid secret, exactly
/// as the strengthening step defines.
///
/// # Arguments
/// * `shares` - The collected shares.
/// * `passphrase` - Strengthening passphrase used at split time.
///
/// # Returns
/// The master secret, or a typed error describing what the set is missing.
pub fn combine(shares: &[Share], passphrase: &str) -> Result<Secret, Slip39Error> {
    check_passphrase(passphrase)?;
    let grouped = group_shares(shares)?;

    let represented = grouped.groups.len();
    if represented < grouped.group_threshold as usize {
        return Err(Slip39Error::InsufficientShares {
            threshold: grouped.group_threshold as usize,
            got: represented,
        });
    }

    let mut group_points: Vec<(u8, Vec<u8>)> = Vec::with_capacity(represented);
    for (group_index, group) in &grouped.groups {
        let needed = group.member_threshold as usize;
        if group.members.len() < needed {
            return Err(Slip39Error::InsufficientShares {
                threshold: needed,
                got: group.members.len(),
            });
        }
        let points: Vec<(u8, Vec<u8>)> = group
            .members
            .iter()
            .map(|(index, value)| (*index, value.clone()))
            .collect();
        let group_secret = recover_secret(group.member_threshold, &points)?;
        group_points.push((*group_index, group_secret));
    }

    let strengthened = Zeroizing::new(recover_secret(
        grouped.group_threshold,
        &group_points,
    )?);
    for (_, group_secret) in group_points.iter_mut() {
        group_secret.zeroize();
    }

    let master = Zeroizing::new(cipher::decrypt(
        &strengthened,
        passphrase.as_bytes(),
        grouped.identifier,
        grouped.iteration_exponent,
    )?);
    Ok(Secret::from_bytes(&master)?)
}

/// Per-group state of a partially collected share set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStatus {
    /// Which group this reports on.
    pub group_index: u8,
    /// Shares needed from the group.
    pub member_threshold: u8,
    /// Distinct member shares collected so far.
    pub shares_present: usize,
}

impl GroupStatus {
    /// Whether this group already meets its member threshold.
    pub fn is_complete(&self) -> bool {
        self.shares_present >= self.member_threshold as usize
    }
}

/// Consistency report over a pile of shares, for recovery prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSetSummary {
    /// The split's shared identifier.
    pub identifier: u16,
    /// The split's iteration exponent.
    pub iteration_exponent: u8,
    /// Groups required for recovery.
    pub group_threshold: u8,
    /// Groups the split produced.
    pub group_count: u8,
    /// One status per represented group, ordered by group index.
    pub groups: Vec<GroupStatus>,
}

impl ShareSetSummary {
    /// Count of represented groups that meet their member threshold.
    pub fn groups_complete(&self) -> usize {
        self.groups.iter().filter(|g| g.is_complete()).count()
    }

    /// Whether `combine` would proceed past the consistency stage:
    /// enough groups, every represented group complete.
    pub fn is_recoverable(&self) -> bool {
        self.groups.len() >= self.group_threshold as usize
            && self.groups.iter().all(GroupStatus::is_complete)
    }
}

/// Validate and summarize a share set without recovering anything.
///
/// # Arguments
/// * `shares` - The collected shares.
///
/// # Returns
/// A have/need report, or the same consistency errors `combine` raises.
pub fn summarize(shares: &[Share]) -> Result<ShareSetSummary, Slip39Error> {
    let grouped = group_shares(shares)?;
    let groups = grouped
        .groups
        .iter()
        .map(|(group_index, group)| GroupStatus {
            group_index: *group_index,
            member_threshold: group.member_threshold,
            shares_present: group.members.len(),
        })
        .collect();
    Ok(ShareSetSummary {
        identifier: grouped.identifier,
        iteration_exponent: grouped.iteration_exponent,
        group_threshold: grouped.group_threshold,
        group_count: grouped.group_count,
        groups,
    })
}

struct GroupMembers {
    member_threshold: u8,
    members: BTreeMap<u8, Vec<u8>>,
}

struct GroupedShares {
    identifier: u16,
    iteration_exponent: u8,
    group_threshold: u8,
    group_count: u8,
    groups: BTreeMap<u8, GroupMembers>,
}

fn group_shares(shares: &[Share]) -> Result<GroupedShares, Slip39Error> {
    let first = shares.first().ok_or(Slip39Error::InsufficientShares {
        threshold: 1,
        got: 0,
    })?;

    let mut grouped = GroupedShares {
        identifier: first.identifier(),
        iteration_exponent: first.iteration_exponent(),
        group_threshold: first.group_threshold(),
        group_count: first.group_count(),
        groups: BTreeMap::new(),
    };

    for share in shares {
        if share.identifier() != grouped.identifier
            || share.iteration_exponent() != grouped.iteration_exponent
        {
            return Err(Slip39Error::InconsistentShareSet(
                "shares come from different splits".to_string(),
            ));
        }
        if share.group_threshold() != grouped.group_threshold
            || share.group_count() != grouped.group_count
        {
            return Err(Slip39Error::InconsistentShareSet(
                "shares disagree on group parameters".to_string(),
            ));
        }
        if share.value().len() != first.value().len() {
            return Err(Slip39Error::InconsistentShareSet(
                "shares carry different value lengths".to_string(),
            ));
        }

        let group = grouped
            .groups
            .entry(share.group_index())
            .or_insert_with(|| GroupMembers {
                member_threshold: share.member_threshold(),
                members: BTreeMap::new(),
            });
        if group.member_threshold != share.member_threshold() {
            return Err(Slip39Error::InconsistentShareSet(format!(
                "group {} shares disagree on member threshold",
                share.group_index()
            )));
        }
        if group
            .members
            .insert(share.member_index(), share.value().to_vec())
            .is_some()
        {
            return Err(Slip39Error::InconsistentShareSet(format!(
                "member index {} of group {} appears twice",
                share.member_index(),
                share.group_index()
            )));
        }
    }

    Ok(grouped)
}

fn check_passphrase(passphrase: &str) -> Result<(), Slip39Error> {
    if passphrase
        .bytes()
        .all(|b| (0x20..=0x7E).contains(&b))
    {
        Ok(())
    } else {
        Err(Slip39Error::InvalidPassphrase)
    }
}

fn random_identifier() -> u16 {
    (OsRng.next_u32() & ((1 << ID_BITS) - 1)) as u16
}
