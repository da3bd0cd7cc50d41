//! InMemory implementations backed by `HashMap`.

mod user;

pub use user::InMemoryUserDirectory;
