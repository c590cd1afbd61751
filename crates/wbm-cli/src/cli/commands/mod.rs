//! Action handlers, one per file.

mod jsonmap;
mod printtime;
mod saveto;
mod timemap;

pub use jsonmap::run_jsonmap;
pub use printtime::run_printtime;
pub use saveto::run_saveto;
pub use timemap::run_timemap;
