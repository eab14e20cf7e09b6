pub mod user;

pub use user::{UserService, UserServiceImpl};
