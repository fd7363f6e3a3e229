use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_EXTENSION: &str = "md";

#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub extension: String,
}

impl ConvertConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            config,
            input,
            output: cli_output,
            extension: cli_extension,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };
        let PartialConfig {
            output: file_output,
            extension: file_extension,
        } = file_config;

        let output_dir = match cli_output.or(file_output) {
            Some(dir) => dir,
            None => derive_output_dir(&input)?,
        };

        let extension = cli_extension
            .or(file_extension)
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
            .trim()
            .trim_start_matches('.')
            .to_ascii_lowercase();
        anyhow::ensure!(!extension.is_empty(), "output extension must not be empty");

        Ok(Self {
            input,
            output_dir,
            extension,
        })
    }

    pub fn ensure_input(&self) -> Result<()> {
        anyhow::ensure!(
            self.input.exists(),
            "input file {:?} does not exist",
            self.input
        );
        anyhow::ensure!(
            self.input.is_file(),
            "input path {:?} is not a file",
            self.input
        );
        Ok(())
    }

    pub fn document_path(&self, title: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", title, self.extension))
    }
}

/// The default output directory sits beside the input file and carries the
/// project's stem: `stories/novel.aeon` -> `stories/novel/`.
fn derive_output_dir(input: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("cannot derive an output directory from {:?}", input))?;
    Ok(input.parent().unwrap_or_else(|| Path::new(".")).join(stem))
}

#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "aeon2md",
    about = "Convert an Aeon Timeline 2 project to a Markdown vault",
    version
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)"
    )]
    pub config: Option<PathBuf>,

    #[arg(value_name = "INPUT", help = "Path of the .aeon project file")]
    pub input: PathBuf,

    #[arg(
        long,
        env = "AEON2MD_OUTPUT",
        value_name = "DIR",
        help = "Output directory (defaults to a sibling directory named after the project)"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        env = "AEON2MD_EXTENSION",
        value_name = "EXT",
        help = "Extension for generated documents"
    )]
    pub extension: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    output: Option<PathBuf>,
    extension: Option<String>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: &str) -> CliArgs {
        CliArgs {
            config: None,
            input: PathBuf::from(input),
            output: None,
            extension: None,
        }
    }

    #[test]
    fn test_output_dir_is_sibling_named_after_stem() {
        let config = ConvertConfig::from_args(args("stories/novel.aeon")).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("stories/novel"));
        assert_eq!(config.extension, "md");
    }

    #[test]
    fn test_explicit_output_wins_over_derived() {
        let mut cli = args("novel.aeon");
        cli.output = Some(PathBuf::from("elsewhere"));
        let config = ConvertConfig::from_args(cli).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn test_extension_is_normalized() {
        let mut cli = args("novel.aeon");
        cli.extension = Some(".MD ".to_string());
        let config = ConvertConfig::from_args(cli).unwrap();
        assert_eq!(config.extension, "md");
        assert_eq!(
            config.document_path("Alice"),
            PathBuf::from("novel/Alice.md")
        );
    }

    #[test]
    fn test_config_file_fills_unset_options() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("aeon2md.yaml");
        fs::write(&config_path, "extension: txt\n").unwrap();

        let mut cli = args("novel.aeon");
        cli.config = Some(config_path);
        let config = ConvertConfig::from_args(cli).unwrap();
        assert_eq!(config.extension, "txt");
    }
}
