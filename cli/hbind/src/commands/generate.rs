//! `hbind generate`: interface files to C headers.

use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use hbind_c::{GeneratorOptions, WriteOutcome};
use hbind_model::InterfaceModel;

/// Result of generating one header.
#[derive(Debug)]
pub struct Generated {
    pub input: PathBuf,
    pub output: PathBuf,
    pub outcome: WriteOutcome,
}

/// Path of the header generated for `model`.
pub fn output_path(out_dir: &Path, model: &InterfaceModel) -> PathBuf {
    out_dir.join(format!("{}.h", model.namespace()))
}

fn load(input: &Path) -> Result<InterfaceModel> {
    hbind_model::load_model(input).with_context(|| format!("loading {}", input.display()))
}

/// Generate and write the header for a loaded model.
fn write_model(
    input: &Path,
    model: &InterfaceModel,
    output: PathBuf,
    options: &GeneratorOptions,
) -> Result<Generated> {
    let header = hbind_c::generate_header(model, options)
        .with_context(|| format!("generating header for {}", input.display()))?;
    let outcome = hbind_c::write_header(&output, &header)
        .with_context(|| format!("writing {}", output.display()))?;

    Ok(Generated {
        input: input.to_path_buf(),
        output,
        outcome,
    })
}

/// Generate and write the header for a single interface file.
///
/// The header lands at `<out_dir>/<namespace>.h`. Nothing is written if
/// loading or generation fails.
pub fn generate_one(
    input: &Path,
    out_dir: &Path,
    options: &GeneratorOptions,
) -> Result<Generated> {
    let model = load(input)?;
    let output = output_path(out_dir, &model);
    write_model(input, &model, output, options)
}

/// A loaded input waiting for generation.
struct Job<'a> {
    input: &'a Path,
    model: InterfaceModel,
    output: PathBuf,
}

/// Load every input and assign output paths.
///
/// Inputs that fail to load are reported and counted. Two inputs that
/// would write the same header fail the whole command before anything is
/// written.
fn plan<'a>(inputs: &'a [PathBuf], out_dir: &Path) -> Result<(Vec<Job<'a>>, usize)> {
    let mut jobs: Vec<Job<'a>> = Vec::new();
    let mut failures = 0usize;
    for input in inputs {
        let model = match load(input) {
            Ok(model) => model,
            Err(e) => {
                eprintln!("error: {e:#}");
                failures += 1;
                continue;
            }
        };
        let output = output_path(out_dir, &model);
        if let Some(first) = jobs.iter().find(|job| job.output == output) {
            bail!(
                "{} and {} both generate {} (namespace '{}')",
                first.input.display(),
                input.display(),
                output.display(),
                model.namespace()
            );
        }
        jobs.push(Job {
            input,
            model,
            output,
        });
    }
    Ok((jobs, failures))
}

/// Run `hbind generate` over every input, one thread per input.
///
/// Each run owns its model and a distinct output path. Failures are
/// reported per input; the command fails if any input failed.
pub fn run(
    inputs: &[PathBuf],
    out_dir: &Path,
    options: &GeneratorOptions,
) -> Result<Vec<Generated>> {
    if inputs.is_empty() {
        bail!("no interface files given");
    }

    let (jobs, mut failures) = plan(inputs, out_dir)?;
    let results: Vec<Result<Generated>> = thread::scope(|scope| {
        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let input = job.input;
                let handle = scope.spawn(move || {
                    write_model(job.input, &job.model, job.output, options)
                });
                (handle, input)
            })
            .collect();
        handles
            .into_iter()
            .map(|(handle, input)| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(anyhow!("generation panicked for {}", input.display())))
            })
            .collect()
    });

    let mut generated = Vec::new();
    for result in results {
        match result {
            Ok(g) => {
                let status = match g.outcome {
                    WriteOutcome::Written => "wrote",
                    WriteOutcome::Unchanged => "unchanged",
                };
                println!("{} → {} ({status})", g.input.display(), g.output.display());
                generated.push(g);
            }
            Err(e) => {
                eprintln!("error: {e:#}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} interface file(s) failed", inputs.len());
    }
    Ok(generated)
}
