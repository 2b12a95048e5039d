mod repo;

pub use repo::{PgUserLookup, UserLookup};

#[cfg(test)]
pub use repo::KnownUsers;
