//! Stream the entries of a jar into a new jar, rewriting class files along the way

use crate::inject::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Should an entry go through the class handler?
///
/// Names starting with `.` are skipped, even when they end in `.class`.
pub fn is_class_entry(name: &str) -> bool {
    name.ends_with(".class") && !name.starts_with('.')
}

/// Copy every entry of `input` into `output`, in order
///
/// Class entries (see [`is_class_entry`]) are replaced by whatever `handler` returns for them.
/// Directory entries are re-created and all other entries are copied byte for byte. Entry
/// timestamps are kept so that the output only depends on the input.
///
/// The first failure aborts the whole pass. The output writer is handed back once the archive
/// has been finished.
pub fn transform<R, W, F>(input: R, output: W, mut handler: F) -> Result<W, Error>
where
    R: Read + Seek,
    W: Write + Seek,
    F: FnMut(&[u8]) -> Result<Vec<u8>, Error>,
{
    let mut archive = ZipArchive::new(input)?;
    let mut writer = ZipWriter::new(output);

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_owned();
        let options = FileOptions::default().last_modified_time(entry.last_modified());

        if entry.is_dir() {
            writer.add_directory(name, options)?;
            continue;
        }

        let mut data = Vec::with_capacity(entry.size().min(1 << 20) as usize);
        entry
            .read_to_end(&mut data)
            .map_err(|err| Error::io(format!("Could not read {}", name), err))?;

        let compression = if is_class_entry(&name) {
            log::info!("Processing {}", name);
            let processed = handler(&data)?;
            log::info!("Processed {} -> {}", data.len(), processed.len());
            data = processed;
            CompressionMethod::Deflated
        } else {
            log::info!("Copying {}", name);
            match entry.compression() {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            }
        };

        writer.start_file(name.as_str(), options.compression_method(compression))?;
        writer
            .write_all(&data)
            .map_err(|err| Error::io(format!("Could not write {}", name), err))?;
    }

    Ok(writer.finish()?)
}

/// Same as [`transform`], but between files on disk
///
/// An existing output file gets overwritten.
pub fn transform_paths<F>(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    handler: F,
) -> Result<(), Error>
where
    F: FnMut(&[u8]) -> Result<Vec<u8>, Error>,
{
    let input = input.as_ref();
    let output = output.as_ref();

    let input_file = File::open(input).map_err(|err| {
        Error::io(format!("Could not open input file: {}", input.display()), err)
    })?;
    let output_file = File::create(output).map_err(|err| {
        Error::io(format!("Could not open output file: {}", output.display()), err)
    })?;

    let mut written = transform(
        BufReader::new(input_file),
        BufWriter::new(output_file),
        handler,
    )?;
    written.flush().map_err(|err| {
        Error::io(format!("Could not write output file: {}", output.display()), err)
    })?;
    Ok(())
}
