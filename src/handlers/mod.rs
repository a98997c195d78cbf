pub mod blogs;
pub mod comments;
pub mod session;
pub mod wishlist;
