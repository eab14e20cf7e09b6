pub mod user;

pub use user::{is_valid_user_name, CreateUserRequest, NewUser, User};
