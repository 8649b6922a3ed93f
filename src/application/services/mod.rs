mod users;

pub use users::{IssuedSession, UserService};
