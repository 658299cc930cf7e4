//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::codec::{decode, RowEncoder};
use crate::config::CodecOptions;
use crate::error::{Result, ResultExt};
use crate::infer::infer_schema;
use crate::schema::Schema;
use crate::source::{JsonLinesSource, RecordSource};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing results to stdout
    pub fn run(&self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(&mut out)
    }

    /// Run the CLI command, writing results to `out`
    pub fn run_with_output<W: Write>(&self, out: &mut W) -> Result<()> {
        let options = self.load_options()?;
        match &self.cli.command {
            Commands::Infer {
                input,
                sampling_ratio,
                pretty,
            } => {
                let options = match sampling_ratio {
                    Some(ratio) => options.with_sampling_ratio(*ratio),
                    None => options,
                };
                self.infer(input, &options, *pretty, out)
            }
            Commands::Normalize { input, schema } => {
                self.normalize(input, schema.as_deref(), &options, out)
            }
        }
    }

    /// Load codec options, falling back to defaults
    fn load_options(&self) -> Result<CodecOptions> {
        match &self.cli.options {
            Some(path) => {
                debug!(path = %path.display(), "Loading codec options");
                CodecOptions::from_file(path)
            }
            None => Ok(CodecOptions::default()),
        }
    }

    fn infer<W: Write>(
        &self,
        input: &Path,
        options: &CodecOptions,
        pretty: bool,
        out: &mut W,
    ) -> Result<()> {
        let start = Instant::now();
        let records = JsonLinesSource::new(input).scan()?;
        let schema = infer_schema(&records, options)?;

        info!(
            records = records.len(),
            fields = schema.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Schema inferred"
        );

        let text = if pretty {
            schema.to_json_pretty()?
        } else {
            schema.to_json()?.to_string()
        };
        writeln!(out, "{text}")?;
        Ok(())
    }

    fn normalize<W: Write>(
        &self,
        input: &Path,
        schema_path: Option<&Path>,
        options: &CodecOptions,
        out: &mut W,
    ) -> Result<()> {
        let source = JsonLinesSource::new(input);
        let schema = match schema_path {
            Some(path) => Self::load_schema(path)?,
            None => infer_schema(source.scan()?, options)?,
        };

        let records = source.scan()?;
        let encoder = RowEncoder::new(&schema);
        let mut written = 0usize;
        let mut failed = 0usize;

        for item in decode(&records, &schema, options) {
            match item.and_then(|row| encoder.encode(&row)) {
                Ok(line) => {
                    writeln!(out, "{line}")?;
                    written += 1;
                }
                Err(e) if e.is_record_level() => {
                    warn!(error = %e, "Skipping record");
                    failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(rows = written, failed, "Records normalized");

        if failed > 0 {
            let total = records.len();
            return Err(anyhow::anyhow!("{failed} of {total} records failed to normalize").into());
        }
        Ok(())
    }

    fn load_schema(path: &Path) -> Result<Schema> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file {}", path.display()))?;
        Schema::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn input(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    fn run(args: &[&str]) -> (Result<()>, String) {
        let cli = Cli::parse_from(args);
        let mut out = Vec::new();
        let result = Runner::new(cli).run_with_output(&mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_infer_command() {
        let file = input(&[r#"{"a": 1}"#, r#"{"b": "x"}"#]);
        let path = file.path().to_str().unwrap();
        let (result, out) = run(&["solidafy-json", "infer", "--input", path]);
        result.unwrap();

        let schema = Schema::from_json_str(out.trim()).unwrap();
        assert_eq!(schema.to_string(), "struct<a:long,b:string>");
    }

    #[test]
    fn test_normalize_command() {
        let file = input(&[r#"{"a": 1, "b": "x"}"#, r#"[{"a": 2}, {"a": 3}]"#]);
        let path = file.path().to_str().unwrap();
        let (result, out) = run(&["solidafy-json", "normalize", "--input", path]);
        result.unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec![r#"{"a":1,"b":"x"}"#, r#"{"a":2}"#, r#"{"a":3}"#]);
    }

    #[test]
    fn test_normalize_with_schema_reports_failures() {
        let schema = input(&[r#"{"fields": [{"name": "a", "data_type": {"type": "long"}}]}"#]);
        let file = input(&[r#"{"a": 1}"#, r#"{"a": "not a number"}"#]);
        let (result, out) = run(&[
            "solidafy-json",
            "normalize",
            "--input",
            file.path().to_str().unwrap(),
            "--schema",
            schema.path().to_str().unwrap(),
        ]);

        assert!(result.is_err());
        assert_eq!(out.lines().collect::<Vec<_>>(), vec![r#"{"a":1}"#]);
    }

    #[test]
    fn test_missing_input_fails() {
        let (result, _) = run(&["solidafy-json", "infer", "--input", "/nonexistent.jsonl"]);
        assert!(result.is_err());
    }
}
