//! Commands - host to backend bridge

mod auth;
mod meetings;
mod notes;
mod page;
mod search;

pub use auth::*;
pub use meetings::*;
pub use notes::*;
pub use page::*;
pub use search::*;
