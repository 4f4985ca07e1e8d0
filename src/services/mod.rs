pub mod files;
pub mod homeworks;
pub mod session;
pub mod submissions;
