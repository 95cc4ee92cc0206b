//! Schema migrations for the SQLite persistent store.
refinery::embed_migrations!("./src/schema");
