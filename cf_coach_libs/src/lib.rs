pub mod codeforces;
pub mod color;
pub mod export;
pub mod fs;
pub mod heatmap;
pub mod models;
pub mod narrative;
pub mod prompt;
pub mod stats;
pub mod store;
pub mod table;

pub use cf_coach_derive::TableRow;
pub use table::{TableRow, ToCell};
