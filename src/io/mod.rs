/// Text stream helpers shared by the PDB and FASTA readers/writers.
///
/// Compression is detected from the file extension: `.gz` and `.gzip` paths
/// are read through a gzip decoder and written through a gzip encoder.
use crate::error::Error;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Whether a path names a gzip-compressed file.
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    path_str.ends_with(".gz") || path_str.ends_with(".gzip")
}

/// Open a text file for buffered reading (plain or gzip compressed).
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(path).map_err(|e| Error::io(e, path))?;

    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Buffered output file, plain or gzip compressed.
///
/// Call [`OutputWriter::finish`] once everything is written: it flushes the
/// buffer and, for gzip output, writes the stream trailer and reports any
/// error doing so.
pub enum OutputWriter {
    Plain(BufWriter<File>),
    Gzip(BufWriter<GzEncoder<File>>),
}

impl OutputWriter {
    pub fn finish(self) -> std::io::Result<()> {
        match self {
            OutputWriter::Plain(mut writer) => writer.flush(),
            OutputWriter::Gzip(writer) => {
                let encoder = writer.into_inner().map_err(|e| e.into_error())?;
                encoder.finish()?.flush()
            }
        }
    }
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            OutputWriter::Plain(writer) => writer.write(buf),
            OutputWriter::Gzip(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            OutputWriter::Plain(writer) => writer.flush(),
            OutputWriter::Gzip(writer) => writer.flush(),
        }
    }
}

/// Create a text file for buffered writing (plain or gzip compressed).
pub fn create_writer(path: &Path) -> Result<OutputWriter, Error> {
    let file = File::create(path).map_err(|e| Error::io(e, path))?;

    if is_gzipped(path) {
        Ok(OutputWriter::Gzip(BufWriter::new(GzEncoder::new(
            file,
            Compression::default(),
        ))))
    } else {
        Ok(OutputWriter::Plain(BufWriter::new(file)))
    }
}
