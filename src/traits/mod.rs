pub mod compiler;
pub mod facade;
pub mod module;

pub use compiler::{Compiler, CompilerModule};
pub use facade::ModuleFacade;
pub use module::{ModuleDef, NativeModule};
