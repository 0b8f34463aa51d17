// Branch prediction hints. Plain identities on stable, kept so hot paths
// read the same once the intrinsics stabilize.
pub(crate) use core::convert::identity as likely;
pub(crate) use core::convert::identity as unlikely;
use core::hash::BuildHasher;

#[inline]
pub(crate) fn make_hash<S>(hash_builder: &S, key: i64) -> u64
where
    S: BuildHasher,
{
    hash_builder.hash_one(key)
}

/// A reference to a non-full slot into which a new entry can be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InsertSlot {
    pub(crate) index: usize,
}
