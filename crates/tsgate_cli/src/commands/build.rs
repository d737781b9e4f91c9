//! Build command implementation

use std::path::Path;

use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::{error, info};
use tsgate_core::{
    BuildAggregator, SourceTree, StageError, StageOptions, TestGenerator, write_artifacts,
};

use crate::cli::BuildArgs;

/// Runs one build. Returns `Ok(true)` when escalation failed the build.
pub fn run_build(config: Option<&Path>, args: &BuildArgs) -> Result<bool> {
    let options = stage_options(config, args);
    let extensions = options.extensions.clone();

    let aggregator = match BuildAggregator::from_options(options) {
        Ok(aggregator) => aggregator,
        Err(e) if e.is_config_error() => {
            return Err(e)
                .into_diagnostic()
                .wrap_err("No usable rules document; run `tsgate init` to create one");
        }
        Err(e) => return Err(e).into_diagnostic(),
    };
    let files = SourceTree::new(&args.input, &extensions, &args.exclude)
        .and_then(|tree| tree.collect())
        .into_diagnostic()?;

    let output = match aggregator.run(&files) {
        Ok(output) => output,
        Err(StageError::BuildFailed) => {
            error!("{}", StageError::BuildFailed);
            return Ok(true);
        }
        Err(e) => return Err(e).into_diagnostic(),
    };

    write_artifacts(&args.out, &output.artifacts).into_diagnostic()?;
    info!(
        "Wrote {} lint tests to {}",
        output.artifacts.len(),
        args.out.display()
    );

    Ok(false)
}

fn stage_options(config: Option<&Path>, args: &BuildArgs) -> StageOptions {
    let generator = TestGenerator::from_name(args.test_generator.name()).unwrap_or_default();

    let mut options = StageOptions::new()
        .fail_build(args.fail_build)
        .disable_test_generator(args.disable_test_generator)
        .test_generator(generator);

    if let Some(path) = config {
        options = options.configuration_path(path);
    }
    if let Some(path) = &args.output_file {
        options = options.output_file(path);
    }
    if args.nested_configs {
        options = options.nested_configs(&args.input);
    }
    if !args.no_cache {
        options = options.cache_dir(&args.cache_dir);
    }

    options
}
