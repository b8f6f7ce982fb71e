/// Default fuel level for compiled-module execution (100 million instructions)
pub const DEFAULT_FUEL_LEVEL: u64 = 100_000_000;
/// Minimum allowed fuel level (1 million instructions)
pub const MIN_FUEL_LEVEL: u64 = 1_000_000;
/// Maximum allowed fuel level (500 million instructions) - security limit
pub const MAX_FUEL_LEVEL: u64 = 500_000_000;

/// Maximum allowed compiled module size (16MB)
pub const MAX_COMPILED_MODULE_SIZE: usize = 16 * 1024 * 1024;

/// Input values dump written into the artifacts directory
pub const INPUTS_FILENAME: &str = "inputs.txt";
/// Saved-module directory created under the artifacts directory
pub const SAVED_MODULE_DIRNAME: &str = "saved_model";
/// Manifest file inside a saved-module directory
pub const MANIFEST_FILENAME: &str = "manifest.json";
/// Module source file inside a saved-module directory
pub const SOURCE_FILENAME: &str = "module.wat";
/// Imported module text, before the import pass pipeline
pub const FRONTEND_INPUT_FILENAME: &str = "tf_input.mlir";
/// Imported module text, after the import pass pipeline
pub const IMPORTED_INPUT_FILENAME: &str = "iree_input.mlir";
/// Compiled artifact name prefix; target backends are appended, sanitized
/// and joined with double underscores
pub const COMPILED_PREFIX: &str = "compiled__";
/// Compiled artifact file extension
pub const COMPILED_EXTENSION: &str = "vmfb";

/// Passes every imported module runs before compilation, in order
pub const IMPORT_PASS_PIPELINE: &[&str] = &["strip-comments", "verify"];

/// Compiler targets the shipped toolchain accepts
pub const KNOWN_COMPILER_TARGETS: &[&str] = &["wasm32", "wasm32-simd"];
/// Runtime driver for compiled backends
pub const WASMTIME_DRIVER: &str = "wasmtime";
