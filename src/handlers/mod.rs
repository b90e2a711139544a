pub mod lab;
pub mod users;
