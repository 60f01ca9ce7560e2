pub mod product;
pub mod user;

pub use product::{NewProduct, Price, Product, ProductPatch};
pub use user::User;
