mod get_review;
mod set_is_active;

pub use get_review::{get_review, ReviewListResponse};
pub use set_is_active::{set_is_active, SetIsActiveRequest, UserResponse};
