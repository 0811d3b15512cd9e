pub mod document;
pub mod edge;
pub mod live;
pub mod node;

pub use document::*;
pub use edge::*;
pub use live::*;
pub use node::*;
