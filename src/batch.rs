//! Multi-file conversion and output bundling.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use crate::convert::{convert_file, ConversionKind, ConversionOutcome, ConvertOptions};
use crate::error::{Error, Result};

/// Outcome of converting one input of a batch.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    /// Source file
    pub input: PathBuf,

    /// Conversion result for this file
    pub outcome: ConversionOutcome,
}

/// Destination path for `input` inside `output_dir`.
pub fn output_path(kind: ConversionKind, input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    output_dir.join(format!("{}.{}", stem, kind.target_extension()))
}

/// Destination paths for a batch of jobs, made unique within the batch.
///
/// The first input with a given stem keeps `<stem>.<ext>`; later ones get
/// `<stem>_1.<ext>`, `<stem>_2.<ext>` and so on. Names are compared
/// case-insensitively.
pub fn output_paths(jobs: &[(ConversionKind, PathBuf)], output_dir: &Path) -> Vec<PathBuf> {
    let mut taken = HashSet::new();

    jobs.iter()
        .map(|(kind, input)| {
            let mut dst = output_path(*kind, input, output_dir);
            let mut n = 1;
            while !taken.insert(dst.to_string_lossy().to_lowercase()) {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "document".to_string());
                dst = output_dir.join(format!("{}_{}.{}", stem, n, kind.target_extension()));
                n += 1;
            }
            dst
        })
        .collect()
}

/// Convert every input into `output_dir`, in parallel across files.
///
/// Entries come back in input order. A failed file does not stop the rest.
pub fn convert_batch(
    kind: ConversionKind,
    inputs: &[PathBuf],
    output_dir: &Path,
    options: &ConvertOptions,
) -> Vec<BatchEntry> {
    let jobs: Vec<(ConversionKind, PathBuf)> =
        inputs.iter().map(|input| (kind, input.clone())).collect();
    convert_jobs(&jobs, output_dir, options)
}

/// Convert jobs of possibly different kinds into `output_dir`.
///
/// Destinations come from [`output_paths`], so no two jobs write the same
/// file. Entries come back in job order.
pub fn convert_jobs(
    jobs: &[(ConversionKind, PathBuf)],
    output_dir: &Path,
    options: &ConvertOptions,
) -> Vec<BatchEntry> {
    log::info!(
        "converting {} files into {}",
        jobs.len(),
        output_dir.display()
    );

    let destinations = output_paths(jobs, output_dir);
    jobs.par_iter()
        .zip(destinations.par_iter())
        .map(|((kind, input), dst)| BatchEntry {
            input: input.clone(),
            outcome: convert_file(*kind, input, dst, options),
        })
        .collect()
}

/// Name of a bundle created now, e.g. `converted_files_20240131_142501.zip`.
pub fn bundle_name() -> String {
    format!(
        "converted_files_{}.zip",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}

/// Zip the outputs of the successful entries into one archive in
/// `output_dir` and remove the bundled files.
///
/// Fails if no entry succeeded.
pub fn bundle_outputs(entries: &[BatchEntry], output_dir: &Path) -> Result<PathBuf> {
    let outputs: Vec<&Path> = entries
        .iter()
        .filter(|e| e.outcome.success)
        .filter_map(|e| e.outcome.output.as_deref())
        .collect();
    if outputs.is_empty() {
        return Err(Error::Other("no converted files to bundle".to_string()));
    }

    std::fs::create_dir_all(output_dir)?;
    let bundle = output_dir.join(bundle_name());
    let mut zip = zip::ZipWriter::new(tempfile::NamedTempFile::new_in(output_dir)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &outputs {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Other(format!("not a file: {}", path.display())))?;
        zip.start_file(name, options)?;
        zip.write_all(&std::fs::read(path)?)?;
    }
    let tmp = zip.finish()?;
    tmp.as_file().sync_all()?;
    tmp.persist(&bundle).map_err(|e| Error::Io(e.error))?;

    for path in &outputs {
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("could not remove {}: {}", path.display(), e);
        }
    }

    log::info!("bundled {} files into {}", outputs.len(), bundle.display());
    Ok(bundle)
}
