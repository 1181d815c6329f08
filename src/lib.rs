pub mod classes;
pub use classes::generated as KnownClasses;
pub use classes::{ClassInfo, ClassKind};

pub mod ast;
pub mod parser;
pub mod polyflags;
pub mod t3dfile;

pub use ast::{CsgOper, PropertyValue, Reference, T3dObject, Value};
pub use parser::{parse_t3d, SyntaxError};
pub use polyflags::PolyFlags;
pub use t3dfile::T3dFile;

mod util;
