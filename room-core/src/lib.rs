pub mod evaluate;
pub mod registry;
pub mod room;
pub mod words;

// Re-export main components
pub use evaluate::*;
pub use registry::*;
pub use room::*;
pub use words::*;
