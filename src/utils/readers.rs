use super::Result;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read as ioRead};
use std::path::Path;

/// Opens a statistics file, transparently decompressing `.gz`/`.gzip` input.
pub fn open_input_reader(path: &Path) -> Result<BufReader<Box<dyn ioRead>>> {
    fn is_gzipped(path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_lowercase();
        path_str.ends_with(".gz") || path_str.ends_with(".gzip")
    }
    let file = File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    if is_gzipped(path) {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(format!("Invalid gzip header: {}", path.to_string_lossy()))
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::{Read, Write};

    #[test]
    fn read_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alleles.json");
        std::fs::write(&path, "{}").unwrap();
        let mut content = String::new();
        open_input_reader(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "{}");
    }

    #[test]
    fn read_gzipped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alleles.json.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"{\"a\": 1}").unwrap();
        encoder.finish().unwrap();

        let mut content = String::new();
        open_input_reader(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "{\"a\": 1}");
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_input_reader(&dir.path().join("absent.json")).is_err());
    }
}
