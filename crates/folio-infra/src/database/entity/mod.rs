//! SeaORM entities for the content schema.

pub mod author;
pub mod post;
pub mod post_author;
pub mod post_tag;
pub mod tag;
