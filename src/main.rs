// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crosscheck::compiler::save_input_values;
use crosscheck::config::{load_and_validate_config, BackendRegistry};
use crosscheck::tensor::{format_entry, parse_entries, TensorValue};
use crosscheck::traits::{ModuleDef, NativeModule};

/// Options parsed from the command line.
struct CliOptions {
    module_path: PathBuf,
    config: Option<PathBuf>,
    backends: Vec<String>,
    artifacts_dir: Option<PathBuf>,
    call: Option<String>,
    inputs: Option<PathBuf>,
}

/// A module definition loaded from a source file on disk.
///
/// File-loaded modules carry no native implementation, so they run on
/// compiled backends only.
struct SourceDef {
    name: String,
    source: String,
}

impl ModuleDef for SourceDef {
    fn name(&self) -> &str {
        &self.name
    }
    fn source(&self) -> &str {
        &self.source
    }
    fn build_native(&self) -> Option<Box<dyn NativeModule>> {
        None
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [options] <module.wat>", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <file>         YAML backend configuration (default: built-in table)");
    eprintln!("  --backend <name>        Backend to run on; repeatable (default: wasm32)");
    eprintln!("  --artifacts-dir <dir>   Persist compilation artifacts into <dir>");
    eprintln!("  --call <function>       Invoke <function> on every selected backend");
    eprintln!("  --inputs <file>         Arguments for --call, one dump entry per line");
    eprintln!();
    eprintln!("Example: {} --backend wasm32 --call get_count counter.wat", program);
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut module_path = None;
    let mut config = None;
    let mut backends = Vec::new();
    let mut artifacts_dir = None;
    let mut call = None;
    let mut inputs = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value_of = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} requires a value", flag))
        };
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(value_of("--config")?)),
            "--backend" => backends.push(value_of("--backend")?),
            "--artifacts-dir" => artifacts_dir = Some(PathBuf::from(value_of("--artifacts-dir")?)),
            "--call" => call = Some(value_of("--call")?),
            "--inputs" => inputs = Some(PathBuf::from(value_of("--inputs")?)),
            other if other.starts_with("--") => return Err(format!("unknown option '{}'", other)),
            other => {
                if module_path.replace(PathBuf::from(other)).is_some() {
                    return Err("expected exactly one module source file".to_string());
                }
            }
        }
    }

    let module_path = module_path.ok_or_else(|| "missing module source file".to_string())?;
    if backends.is_empty() {
        backends.push("wasm32".to_string());
    }

    Ok(CliOptions {
        module_path,
        config,
        backends,
        artifacts_dir,
        call,
        inputs,
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args[1..]) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!();
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(options) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run(options: CliOptions) -> anyhow::Result<()> {
    let registry = match &options.config {
        Some(path) => load_and_validate_config(path)
            .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?,
        None => BackendRegistry::with_defaults(),
    };

    let source = fs::read_to_string(&options.module_path)?;
    let name = options
        .module_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "module".to_string());
    let def = Arc::new(SourceDef { name, source });

    if let Some(dir) = &options.artifacts_dir {
        fs::create_dir_all(dir)?;
    }

    let inputs: Vec<TensorValue> = match &options.inputs {
        Some(path) => parse_entries(&fs::read_to_string(path)?)?,
        None => Vec::new(),
    };
    if !inputs.is_empty() {
        save_input_values(&inputs, options.artifacts_dir.as_deref())?;
    }

    println!("📋 Module: {}", def.name());
    println!("🔧 Backends: {}", options.backends.join(", "));

    // The first backend's results are the baseline the rest are compared
    // against.
    let mut baseline: Option<(String, Vec<TensorValue>)> = None;
    let mut agreement = true;

    for backend_name in &options.backends {
        println!();
        println!("── Backend: {}", backend_name);

        let mut facade = match registry.instantiate(
            backend_name,
            def.clone(),
            &[],
            options.artifacts_dir.as_deref(),
        ) {
            Ok(facade) => facade,
            Err(e) => {
                eprintln!("❌ Failed to instantiate on '{}': {}", backend_name, e);
                agreement = false;
                continue;
            }
        };

        println!("   Functions: {}", facade.functions().join(", "));

        let function = match &options.call {
            Some(function) => function,
            None => continue,
        };

        match facade.call(function, &inputs) {
            Ok(results) => {
                for result in &results {
                    println!("   {}", format_entry(result)?);
                }
                if let Some((baseline_name, baseline_results)) = &baseline {
                    let matches = baseline_results.len() == results.len()
                        && baseline_results
                            .iter()
                            .zip(&results)
                            .all(|(a, b)| a.allclose(b, 1e-5, 1e-5));
                    if matches {
                        println!("   ✅ Matches '{}'", baseline_name);
                    } else {
                        println!("   ❌ Differs from '{}'", baseline_name);
                        agreement = false;
                    }
                } else {
                    baseline = Some((backend_name.clone(), results));
                }
            }
            Err(e) => {
                eprintln!("❌ Call to '{}' failed on '{}': {}", function, backend_name, e);
                agreement = false;
            }
        }
    }

    if !agreement {
        anyhow::bail!("backends disagree");
    }
    Ok(())
}
