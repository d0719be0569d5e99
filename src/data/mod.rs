pub mod bar;
pub mod diagnostics;
pub mod loader;
pub mod schema;

pub use bar::Bar;
pub use diagnostics::{Diagnostics, LoadError, RowWarning};
pub use loader::{load, load_from_reader, LoadedBars};
pub use schema::Schema;
