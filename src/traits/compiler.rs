use std::path::Path;

use crate::compiler::CompileError;

/// Entry point into the compiler toolchain: loads a saved module into an
/// in-memory compiler module that can be inspected, transformed and
/// compiled.
pub trait Compiler {
    /// Import a saved-module directory.
    ///
    /// `exported_names` restricts which entry points are considered for
    /// compilation; empty means all of them.
    fn load_saved_module(
        &self,
        path: &Path,
        exported_names: &[String],
    ) -> Result<Box<dyn CompilerModule>, CompileError>;
}

/// A module inside the compiler, between import and final compilation.
pub trait CompilerModule {
    /// Current textual form of the module.
    fn to_text(&self) -> String;

    /// Run named passes over the module, in order.
    fn run_pass_pipeline(&mut self, passes: &[&str]) -> Result<(), CompileError>;

    /// Compile to the given target backends, producing one binary blob.
    fn compile(&self, target_backends: &[String]) -> Result<Vec<u8>, CompileError>;
}
