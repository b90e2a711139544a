//! The two data-access components.
//!
//! `vulnerable` splices caller text into SQL; `secure` binds it. Both run
//! against the same schema through the same [`ConnectionProvider`], and for
//! ordinary input they return the same values.
//!
//! [`ConnectionProvider`]: crate::db::ConnectionProvider

pub mod secure;
pub mod vulnerable;

pub use secure::SecureUserRepository;
pub use vulnerable::VulnerableUserRepository;

pub const USER_NOT_FOUND: &str = "User not found";
pub const NO_USERS_FOUND: &str = "No users found";

/// Separator for multi-row results. A joined value is how a row-exposing
/// injection becomes visible to the caller.
pub const ROW_SEPARATOR: &str = ", ";

/// Join row values with [`ROW_SEPARATOR`]; `None` when there are none.
pub(crate) fn join_rows<I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    let joined = values.into_iter().collect::<Vec<_>>().join(ROW_SEPARATOR);
    (!joined.is_empty()).then_some(joined)
}
