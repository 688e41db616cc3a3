use crate::utils::Result;
use std::{fs::File, io::BufWriter};

pub fn create_writer(output_prefix: &str, output_suffix: &str) -> Result<BufWriter<File>> {
    let output_path = format!("{}.{}", output_prefix, output_suffix);
    let file = File::create(&output_path)
        .map_err(|e| format!("Failed to create output file {}: {}", output_path, e))?;
    log::debug!("Writing {}", output_path);
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn writer_appends_suffix_to_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("sample");
        let prefix = prefix.to_str().unwrap();
        {
            let mut writer = create_writer(prefix, "summary.tsv").unwrap();
            writer.write_all(b"allele\n").unwrap();
        }
        let written = std::fs::read_to_string(format!("{}.summary.tsv", prefix)).unwrap();
        assert_eq!(written, "allele\n");
    }

    #[test]
    fn writer_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("missing").join("sample");
        assert!(create_writer(prefix.to_str().unwrap(), "report.json").is_err());
    }
}
