pub mod clock;
pub mod opponent;
pub mod round;
pub mod rules;
pub mod statistics;

// Re-export main components
pub use clock::*;
pub use opponent::*;
pub use round::*;
pub use rules::*;
pub use statistics::*;
