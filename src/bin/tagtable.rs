//! Tagtable CLI - Table reconstruction for tagged manuscript text

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use tagtable::{
    config::load_options,
    diagnostics::{check_document, format_diagnostics},
    parse_tables, tables_to_json, xlsx::write_tables_to_xlsx, ConversionError,
    ConversionWarning, HeaderDepth, TableOptions, ValuePolicy,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "tagtable")]
#[command(version)]
#[command(about = "Tagtable - Rebuild tables from tagged manuscript text", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode: suppress warning output to stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Strict mode: exit with error if any conversion warnings occur
    #[arg(long, global = true)]
    strict: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Write tables as a JSON record document
    Json {
        /// Input file path (reads from stdin if not provided)
        input: Option<String>,

        /// Output file path (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        table: TableArgs,
    },

    /// Write one worksheet per table to an xlsx workbook
    Xlsx {
        /// Input file path
        input: String,

        /// Output workbook path
        #[arg(default_value = "parsed_tables.xlsx")]
        output: String,

        /// Do not count a leading "分類" row as part of the header
        #[arg(long)]
        no_classification_bump: bool,

        #[command(flatten)]
        table: TableArgs,
    },

    /// Check markup for issues reconstruction would silently tolerate
    Check {
        /// Input file to check (reads from stdin if not provided)
        input: Option<String>,

        #[command(flatten)]
        table: TableArgs,
    },

    /// Show version and feature info
    Info,
}

/// Reconstruction options shared by every subcommand
#[cfg(feature = "cli")]
#[derive(Args)]
struct TableArgs {
    /// TOML option file, applied before the flags below
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Fixed header depth (values below 1 are corrected to 1)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    header_depth: Option<i64>,

    /// How multi-column values combine: first_nonempty, last_nonempty or concat
    #[arg(long, value_parser = parse_value_policy)]
    value_policy: Option<ValuePolicy>,

    /// Separator for the concat policy
    #[arg(long)]
    concat_sep: Option<String>,

    /// Detect vertical classification spans
    #[arg(long)]
    add_classification: bool,

    /// Key of the classification column in flat mode
    #[arg(long)]
    group_key: Option<String>,

    /// Group records by classification span (with --add-classification)
    #[arg(long)]
    nested: bool,

    /// Keep cell-less rows as divider records
    #[arg(long)]
    keep_dividers: bool,

    /// 1-based column searched for classification spans
    #[arg(long, value_name = "COL")]
    classification_column: Option<usize>,
}

#[cfg(feature = "cli")]
fn parse_value_policy(s: &str) -> Result<ValuePolicy, String> {
    s.parse().map_err(|e: ConversionError| e.to_string())
}

#[cfg(feature = "cli")]
impl TableArgs {
    /// Defaults, then the option file, then flags
    fn resolve(&self, base: TableOptions) -> Result<(TableOptions, Vec<ConversionWarning>), ConversionError> {
        let mut warnings = Vec::new();
        let mut options = match self.config {
            Some(ref path) => {
                let loaded = load_options(path, base)?;
                warnings.extend(loaded.warnings);
                loaded.value
            }
            None => base,
        };

        if let Some(depth) = self.header_depth {
            let (depth, warning) = HeaderDepth::from_override(depth);
            if let HeaderDepth::Fixed(n) = depth {
                log::info!("header_depth fixed to {}", n);
            }
            options.header_depth = depth;
            warnings.extend(warning);
        }
        if let Some(policy) = self.value_policy {
            options.value_policy = policy;
        }
        if let Some(ref sep) = self.concat_sep {
            options.concat_separator = sep.clone();
        }
        if let Some(ref key) = self.group_key {
            options.group_key = key.clone();
        }
        if let Some(col) = self.classification_column {
            if col == 0 {
                return Err(ConversionError::invalid(
                    "--classification-column is 1-based and must be at least 1",
                ));
            }
            options.classification_target_column = col;
        }
        options.add_classification |= self.add_classification;
        options.nested |= self.nested;
        options.keep_dividers |= self.keep_dividers;

        Ok((options, warnings))
    }
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let report = Reporting {
        quiet: cli.quiet,
        strict: cli.strict,
        color: !cli.no_color,
    };

    match cli.command {
        Commands::Json {
            input,
            output,
            table,
        } => {
            let content = read_input(input.as_deref())?;
            let (options, mut warnings) = resolve_or_exit(&table, TableOptions::default());

            let converted = tables_to_json(&content, &options).unwrap_or_else(|e| exit_with(&e));
            warnings.extend(converted.warnings);
            report.warnings(&warnings);

            match output {
                Some(path) => {
                    let mut file = fs::File::create(&path)?;
                    writeln!(file, "{}", converted.value)?;
                    if warnings.is_empty() {
                        eprintln!("✓ Output written to: {}", path);
                    } else {
                        eprintln!(
                            "⚠ Output written to: {} ({} warning(s))",
                            path,
                            warnings.len()
                        );
                    }
                }
                None => {
                    println!("{}", converted.value);
                }
            }
        }

        Commands::Xlsx {
            input,
            output,
            no_classification_bump,
            table,
        } => {
            let content = fs::read_to_string(&input)?;
            let base = TableOptions {
                classification_row_header_bump: !no_classification_bump,
                ..TableOptions::default()
            };
            let (options, mut warnings) = resolve_or_exit(&table, base);

            let tables = parse_tables(&content, options.keep_dividers);
            if tables.is_empty() {
                eprintln!("No tables detected.");
                return Ok(());
            }

            let written =
                write_tables_to_xlsx(&output, &tables, &options).unwrap_or_else(|e| exit_with(&e));
            warnings.extend(written.warnings);
            report.warnings(&warnings);

            if !report.quiet {
                for sheet in &written.value {
                    match sheet.header_depth {
                        Some(depth) => eprintln!("Table '{}': header_depth = {}", sheet.name, depth),
                        None => eprintln!("Table '{}': no cells", sheet.name),
                    }
                }
            }
            eprintln!(
                "✓ Wrote {} table(s) to: {}",
                written.value.len(),
                output
            );
        }

        Commands::Check { input, table } => {
            let content = read_input(input.as_deref())?;
            let (options, _) = resolve_or_exit(&table, TableOptions::default());

            let result = check_document(&content, &options);
            println!("{}", format_diagnostics(&result, report.color));

            if result.has_errors() || (report.strict && !result.is_empty()) {
                std::process::exit(1);
            }
        }

        Commands::Info => {
            println!("Tagtable - Rebuild tables from tagged manuscript text");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Features:");
            println!("  ✓ Caption, table, row and cell tag recognition");
            println!("  ✓ Rowspan/colspan placement (＝C<rows>_C<cols>)");
            println!("  ✓ Multi-row header paths and unique column keys");
            println!("  ✓ Classification columns and grouped records");
            println!("  ✓ JSON and xlsx output");
            println!("  ✓ Markup checking");
            println!();
            println!("Value policies: first_nonempty, last_nonempty, concat");
            println!();
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(feature = "cli")]
fn resolve_or_exit(
    table: &TableArgs,
    base: TableOptions,
) -> (TableOptions, Vec<ConversionWarning>) {
    table.resolve(base).unwrap_or_else(|e| exit_with(&e))
}

#[cfg(feature = "cli")]
fn exit_with(err: &ConversionError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}

/// How warnings reach the user
#[cfg(feature = "cli")]
#[derive(Clone, Copy)]
struct Reporting {
    quiet: bool,
    strict: bool,
    color: bool,
}

#[cfg(feature = "cli")]
impl Reporting {
    /// Print warnings to stderr and enforce strict mode
    fn warnings(&self, warnings: &[ConversionWarning]) {
        if !self.quiet && !warnings.is_empty() {
            let (yellow, reset) = if self.color {
                ("\x1b[33m", "\x1b[0m")
            } else {
                ("", "")
            };
            eprintln!();
            eprintln!("{}Conversion Warnings ({}):{}", yellow, warnings.len(), reset);
            eprintln!();
            for warning in warnings {
                eprintln!("  {}", warning);
            }
            eprintln!();
        }

        if self.strict && !warnings.is_empty() {
            eprintln!(
                "Error: {} conversion warning(s) in strict mode",
                warnings.len()
            );
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install tagtable --features cli");
    eprintln!("  tagtable json [INPUT_FILE]");
}
