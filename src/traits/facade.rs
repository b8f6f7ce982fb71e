use crate::config::BackendInfo;
use crate::errors::FacadeError;
use crate::tensor::TensorValue;

/// Uniform call interface over the two module shapes (compiled artifact vs
/// framework-native module).
///
/// The callable function set is fixed at construction time by enumerating
/// the underlying module's exported entry points; there is no dynamic
/// attribute lookup. Results are always an explicit ordered sequence.
pub trait ModuleFacade {
    /// The backend configuration this façade was built for.
    fn backend(&self) -> &BackendInfo;

    /// Callable function names, sorted.
    fn functions(&self) -> Vec<String>;

    /// Invoke a function by name.
    ///
    /// Unknown or non-exported names fail with an error naming the function.
    fn call(
        &mut self,
        function: &str,
        args: &[TensorValue],
    ) -> Result<Vec<TensorValue>, FacadeError>;

    /// Duplicate this module with its initial state, without recompiling.
    ///
    /// The duplicate's state is independent of the original's.
    fn create_reinitialized(&self) -> Result<Box<dyn ModuleFacade>, FacadeError>;
}
