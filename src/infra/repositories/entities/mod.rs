//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod category;
pub mod comment;
pub mod post;
pub mod user;

#[allow(unused_imports)]
pub use category::{ActiveModel as CategoryActiveModel, Entity as CategoryEntity};
#[allow(unused_imports)]
pub use comment::{ActiveModel as CommentActiveModel, Entity as CommentEntity};
#[allow(unused_imports)]
pub use post::{ActiveModel as PostActiveModel, Entity as PostEntity};
#[allow(unused_imports)]
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity};
