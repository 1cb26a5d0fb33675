use std::path::Path;

use ms2psd_rs::io::diagnostics::DirectorySink;
use ms2psd_rs::io::sacpz::read_sacpz;
use ms2psd_rs::io::table::{write_psd_table, DEFAULT_PSD_PATH};
use ms2psd_rs::io::waveform::{read_waveform, write_slist};
use ms2psd_rs::{NullSink, PipelineResult, TracePipeline};

use crate::cli::Cli;
use crate::exit_codes;
use crate::output::{self, RunReport};
use crate::params;

fn validate_inputs(args: &Cli) -> Result<(), String> {
    params::validate_file(&args.input, "Input")?;
    params::validate_file(&args.resp, "Response")?;
    params::validate_output_path(&args.output, "Output")?;
    params::validate_output_path(DEFAULT_PSD_PATH, "PSD output")?;
    if let Some(copy) = &args.psd_out {
        params::validate_output_path(copy, "PSD output")?;
    }
    if let Some(dir) = &args.diagnostics {
        params::validate_diagnostics_dir(dir)?;
    }
    params::validate_sample_rate(args.sample_rate)
}

pub fn execute(args: &Cli) -> i32 {
    if let Err(msg) = validate_inputs(args) {
        eprintln!("Error: {}", msg);
        return exit_codes::INPUT_ERROR;
    }

    let config = match params::build_config(args) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let trace = match read_waveform(Path::new(&args.input), args.sample_rate) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::INPUT_ERROR;
        }
    };

    let model = match read_sacpz(Path::new(&args.resp)) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::INPUT_ERROR;
        }
    };

    let pipeline = match TracePipeline::new(config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::INPUT_ERROR;
        }
    };

    if !args.quiet {
        eprintln!("Processing {}...", args.input);
        eprintln!("  Trace: {} ({} samples at {} Hz)", trace.header.id, trace.len(), trace.sample_rate);
        eprintln!(
            "  Band: {} / {} / {} / {} Hz, output {}",
            args.f1,
            args.f2,
            args.f3,
            args.f4,
            pipeline.config().output_type
        );
    }

    let (result, diagnostics) = match &args.diagnostics {
        Some(dir) => {
            let mut sink = match DirectorySink::new(dir) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: cannot create diagnostics directory '{}': {}", dir, e);
                    return exit_codes::EXECUTION_ERROR;
                }
            };
            let result = pipeline.run_with_diagnostics(&trace, &model, &mut sink);
            let written = sink
                .written()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>();
            (result, Some(written))
        }
        None => (pipeline.run_with_diagnostics(&trace, &model, &mut NullSink), None),
    };

    let result = match result {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Processing failed: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };

    if let Err(msg) = write_results(args, &result) {
        eprintln!("Error: {}", msg);
        return exit_codes::EXECUTION_ERROR;
    }

    if !args.quiet {
        eprintln!("Waveform written to {}", args.output);
        eprintln!("PSD written to {}", DEFAULT_PSD_PATH);
        if let Some(copy) = &args.psd_out {
            eprintln!("PSD copied to {}", copy);
        }
        if let Some(f) = result.summary.psd_peak_frequency {
            eprintln!("  PSD peak at {:.4} Hz", f);
        }
    }

    if args.json {
        let report = RunReport {
            input: &args.input,
            response: &args.resp,
            output: &args.output,
            psd_out: DEFAULT_PSD_PATH,
            psd_copy: args.psd_out.as_deref(),
            diagnostics,
            summary: &result.summary,
        };
        let written = output::to_json(&report).and_then(|json| output::write_output(&json));
        if let Err(e) = written {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    }

    exit_codes::SUCCESS
}

fn write_results(args: &Cli, result: &PipelineResult) -> Result<(), String> {
    write_slist(Path::new(&args.output), &result.waveform)
        .map_err(|e| format!("Failed to write waveform '{}': {}", args.output, e))?;
    let mut psd_paths = vec![DEFAULT_PSD_PATH];
    if let Some(copy) = args.psd_out.as_deref().filter(|c| *c != DEFAULT_PSD_PATH) {
        psd_paths.push(copy);
    }
    for path in psd_paths {
        write_psd_table(Path::new(path), &result.psd)
            .map_err(|e| format!("Failed to write PSD '{}': {}", path, e))?;
    }
    Ok(())
}
