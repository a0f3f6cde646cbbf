pub mod errors;
pub mod identity;
pub mod ids;
pub mod outcome;
pub mod ownership;
pub mod report;

pub use errors::*;
pub use identity::*;
pub use ids::*;
pub use outcome::*;
pub use ownership::*;
pub use report::*;
