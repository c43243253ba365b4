//! Database integration for seeding catalogs.
//!
//! The [`Seeder`] writes fixture items into a catalog through any
//! [`CatalogStore`](catalog::CatalogStore), in one bulk insert per run.

mod seeder;

pub use seeder::{COMPLETION_MESSAGE, SeedError, SeedReport, Seeder};
