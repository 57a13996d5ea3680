//! RandomSource trait for identifiers that must be unguessable.

pub trait RandomSource: Send + Sync {
    /// A string of `len` random decimal digits.
    fn digits(&self, len: usize) -> String;

    /// A fresh opaque bearer token for a login session.
    fn session_token(&self) -> String;
}
