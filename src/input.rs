//! Purpose: Read CLI inputs (files or stdin) into text for the pipeline.
//! Exports: `InputSource`, `read_input`, `read_text`.
//! Role: Isolates byte handling from command logic; the pipeline only sees `&str`.
//! Invariants: Invalid UTF-8 is replaced, never rejected; a leading UTF-8 BOM is dropped.
//! Invariants: Empty-body policy belongs to the pipeline, not to this reader.
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use bstr::ByteSlice;
use diffuse_normalize::api::{Error, ErrorKind};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InputSource {
    Stdin,
    Path(PathBuf),
}

impl InputSource {
    pub fn from_arg(arg: Option<PathBuf>) -> Self {
        match arg {
            None => InputSource::Stdin,
            Some(path) if path.as_os_str() == "-" => InputSource::Stdin,
            Some(path) => InputSource::Path(path),
        }
    }

    pub fn label(&self) -> String {
        match self {
            InputSource::Stdin => "-".to_string(),
            InputSource::Path(path) => path.display().to_string(),
        }
    }
}

fn io_error(err: io::Error, message: &str) -> Error {
    Error::new(ErrorKind::Io)
        .with_message(message)
        .with_source(err)
}

pub fn read_input(source: &InputSource) -> Result<String, Error> {
    match source {
        InputSource::Stdin => {
            read_text(io::stdin().lock()).map_err(|err| io_error(err, "failed to read stdin"))
        }
        InputSource::Path(path) => {
            let file = File::open(path).map_err(|err| {
                io_error(err, "failed to open input").with_path(path.clone())
            })?;
            read_text(file)
                .map_err(|err| io_error(err, "failed to read input").with_path(path.clone()))
        }
    }
}

pub fn read_text<R: Read>(mut reader: R) -> io::Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    Ok(body.to_str_lossy().into_owned())
}
