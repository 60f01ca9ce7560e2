pub mod auth_service;
pub mod product_service;

pub use auth_service::{AuthError, AuthService, PasswordPolicy};
pub use product_service::{ProductError, ProductService};
