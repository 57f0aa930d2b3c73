//! Domain types returned by the API.
//!
//! Database-backed entities serialize with their column names (snake_case),
//! matching what the web client already consumes. Request payloads live next
//! to their route handlers and use camelCase like the client sends.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderItemDetail, OrderWithItems};
pub use product::{BrandRef, Category, CategoryRef, FavoriteEntry, Product};
pub use user::User;
