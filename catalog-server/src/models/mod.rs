//! Domain models with validation at construction
//!
//! Entities are what the store returns. Drafts carry the mutable fields of an
//! insert or a full update, and are validated when built from request input.

pub mod validation;
pub mod name;
pub mod pagination;
pub mod category;
pub mod product;
pub mod role;
pub mod user;

pub use validation::ValidationError;
pub use name::Name;
pub use pagination::{Pagination, Paginated, PaginationParams};
pub use category::{Category, CategoryDraft};
pub use product::{Product, ProductDraft};
pub use role::{Role, RoleDraft};
pub use user::{Email, Password, User, UserDraft};
