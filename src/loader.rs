//! Loads a whole program into memory before it runs.

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

use tracing::info;

use crate::tape::AllocError;

/// Buffer growth step when the source size is not known up front.
const ALLOC_SIZE: usize = 1024;

/// Errors that can occur while reading a program.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Alloc(#[from] AllocError),
}

/// Read the program at `path`, or from stdin when `path` is `None`.
pub fn load_program(path: Option<&Path>) -> Result<Vec<u8>, LoadError> {
    let (name, code) = match path {
        Some(path) => {
            let name = path.display().to_string();
            let io_err = |source| LoadError::Io { name: name.clone(), source };
            let mut file = File::open(path).map_err(io_err)?;
            let size_hint = file
                .metadata()
                .ok()
                .filter(|m| m.is_file())
                .and_then(|m| usize::try_from(m.len()).ok());
            let code = read_all(&mut file, size_hint).map_err(|e| e.named(&name))?;
            (name, code)
        }
        None => {
            let name = String::from("<stdin>");
            let code = read_all(&mut io::stdin().lock(), None).map_err(|e| e.named(&name))?;
            (name, code)
        }
    };

    info!(source = %name, bytes = code.len(), "loaded program");
    Ok(code)
}

enum ReadAllError {
    Io(io::Error),
    Alloc(AllocError),
}

impl ReadAllError {
    fn named(self, name: &str) -> LoadError {
        match self {
            Self::Io(source) => LoadError::Io { name: name.to_string(), source },
            Self::Alloc(e) => LoadError::Alloc(e),
        }
    }
}

/// Read `reader` to the end, reserving `size_hint` bytes at once when known
/// and growing in [`ALLOC_SIZE`] steps otherwise.
fn read_all<R: Read>(reader: &mut R, size_hint: Option<usize>) -> Result<Vec<u8>, ReadAllError> {
    let alloc = |_| ReadAllError::Alloc(AllocError("program buffer"));

    let mut code = Vec::new();
    if let Some(hint) = size_hint {
        code.try_reserve_exact(hint).map_err(alloc)?;
    }

    let mut chunk = [0u8; ALLOC_SIZE];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ReadAllError::Io(e)),
        };
        if code.capacity() - code.len() < n {
            code.try_reserve_exact(ALLOC_SIZE).map_err(alloc)?;
        }
        code.extend_from_slice(&chunk[..n]);
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_a_file_fully() {
        let mut tf = tempfile::NamedTempFile::new().unwrap();
        let program: Vec<u8> = b"+[;]\n".iter().copied().cycle().take(5000).collect();
        tf.write_all(&program).unwrap();

        let code = load_program(Some(tf.path())).unwrap();
        assert_eq!(code, program);
    }

    #[test]
    fn keeps_raw_bytes() {
        let mut tf = tempfile::NamedTempFile::new().unwrap();
        tf.write_all(&[0xff, b'+', 0x00, b';']).unwrap();
        assert_eq!(load_program(Some(tf.path())).unwrap(), vec![0xff, b'+', 0x00, b';']);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.bool");
        let err = load_program(Some(&path)).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("nope.bool"));
    }

    #[test]
    fn unknown_size_grows_in_steps() {
        let data = vec![b'+'; ALLOC_SIZE * 3 + 7];
        let code = read_all(&mut &data[..], None).ok().unwrap();
        assert_eq!(code.len(), data.len());
    }
}
