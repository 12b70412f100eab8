pub mod message;
pub mod user;

// Re-export for convenience
pub use message::MessageVM;
pub use user::UserVM;
