//! Shared request/response types.

mod pagination;
mod response;

pub use pagination::{ListQuery, Page, PageRequest, PaginationMeta};
pub use response::{Created, MessageResponse};
