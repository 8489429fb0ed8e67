//! Notes service models

pub mod note;
pub mod user;

// Re-export for convenience
pub use note::{Note, NoteRequest, NoteResponse};
pub use user::{
    AuthResponse, LoginRequest, NewUser, RegisterRequest, RegisterResponse, Role, User,
    UserResponse,
};
