use crate::tensor::TensorValue;

/// A module definition: the blueprint from which every backend builds a
/// runnable instance.
///
/// The definition carries the module's textual source (handed to the
/// compiler for compiled backends) and, when available, a factory for fresh
/// native instances (used by reference backends). Each `build_native` call
/// must return an instance at the module's initial state so backends can
/// reinitialize without recompiling.
pub trait ModuleDef: Send + Sync {
    fn name(&self) -> &str;

    /// Textual source in the toolchain's input format.
    fn source(&self) -> &str;

    /// A fresh native instance, or `None` for compiled-only definitions.
    fn build_native(&self) -> Option<Box<dyn NativeModule>> {
        None
    }
}

/// The framework-module side of the bridge: an in-process implementation
/// with named entry points operating on tensor values.
///
/// Implementations return results as an explicit ordered sequence, even for
/// a single value.
pub trait NativeModule {
    /// Names of the module's exported entry points.
    fn functions(&self) -> Vec<String>;

    fn call(&mut self, function: &str, args: &[TensorValue])
        -> anyhow::Result<Vec<TensorValue>>;
}
