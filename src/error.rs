use thiserror::Error;

/// Result type alias for map construction.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised while configuring a map.
///
/// Lookups and removals never fail: an absent key is reported through the
/// `0` sentinel or a `bool`, not through this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A constructor argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
