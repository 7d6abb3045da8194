use std::path::{Path, PathBuf};

/// Locations of the three output files for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub csv: PathBuf,
    pub json: PathBuf,
    pub parquet: PathBuf,
}

impl OutputPaths {
    /// Build `{root}/{output}/{name}.{csv,json,parquet}` where `name` is the
    /// last path component of `output`.
    pub fn new(root: &Path, output: &str) -> Self {
        let dir = root.join(output);
        let name = output_file_stem(output);

        Self {
            csv: dir.join(format!("{}.csv", name)),
            json: dir.join(format!("{}.json", name)),
            parquet: dir.join(format!("{}.parquet", name)),
            dir,
        }
    }

    pub fn all(&self) -> [&Path; 3] {
        [&self.csv, &self.json, &self.parquet]
    }
}

/// Last component of an output name, ignoring either path separator.
fn output_file_stem(output: &str) -> &str {
    output
        .trim_end_matches(['/', '\\'])
        .split(['/', '\\'])
        .next_back()
        .filter(|s| !s.is_empty())
        .unwrap_or(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_output_name() {
        let paths = OutputPaths::new(Path::new("output"), "january");

        assert_eq!(paths.dir, PathBuf::from("output/january"));
        assert_eq!(paths.csv, PathBuf::from("output/january/january.csv"));
        assert_eq!(paths.json, PathBuf::from("output/january/january.json"));
        assert_eq!(
            paths.parquet,
            PathBuf::from("output/january/january.parquet")
        );
    }

    #[test]
    fn test_nested_output_name_uses_last_component() {
        let paths = OutputPaths::new(Path::new("/tmp/runs"), "eu/winter");

        assert_eq!(paths.dir, PathBuf::from("/tmp/runs/eu/winter"));
        assert_eq!(paths.csv, PathBuf::from("/tmp/runs/eu/winter/winter.csv"));
        assert_eq!(output_file_stem("eu\\winter"), "winter");
        assert_eq!(output_file_stem("winter/"), "winter");
    }

    #[test]
    fn test_all_lists_three_files() {
        let paths = OutputPaths::new(Path::new("output"), "x");
        let extensions: Vec<_> = paths
            .all()
            .iter()
            .map(|p| p.extension().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(extensions, vec!["csv", "json", "parquet"]);
    }
}
