pub mod analyze;
pub mod catalog;
pub mod define;
pub mod init;
pub mod session;
