//! Use-case services.
//!
//! Services are stateless: each holds shared handles to the repositories it
//! needs and is cheap to clone into request handlers.

mod authors;
mod posts;
mod tags;

pub use authors::AuthorService;
pub use posts::PostService;
pub use tags::TagService;
