//! Domain entities - the core business objects.

mod author;
mod page;
mod post;
mod tag;

pub use author::{Author, NewAuthor};
pub use page::{Page, Pagination};
pub use post::{NewPost, Post, PostChanges};
pub use tag::Tag;
