//! Portfolio KPI CLI
//!
//! Command-line interface for computing KPIs, forecasts, sensitivity grids,
//! report packs and the portfolio dashboard from actuals CSV files

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use portfolio_kpi::actuals::{load_raw_actuals, CategoryMapping, RawActual};
use portfolio_kpi::report::{write_kpis_csv, write_sensitivity_csv};
use portfolio_kpi::{
    compute_kpis, forecast, portfolio_dashboard, sensitivity_grid, ActualRecord, CompanyActuals,
    EngineSettings, ReportPack,
};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "portfolio-kpi", version, about = "KPI, forecast and sensitivity engine for portfolio actuals")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct Input {
    /// Actuals CSV with period,category,amount columns
    #[arg(long)]
    actuals: PathBuf,

    /// Mapping CSV with source_account,canonical_category columns
    #[arg(long)]
    mappings: Option<PathBuf>,

    /// Write output here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Per-period KPIs as CSV
    Kpis {
        #[command(flatten)]
        input: Input,
    },
    /// Project KPIs forward under constant drivers, as CSV
    Forecast {
        #[command(flatten)]
        input: Input,
        #[arg(long, default_value_t = 12)]
        months: u32,
        #[arg(long, allow_hyphen_values = true)]
        revenue_growth: f64,
        #[arg(long, allow_hyphen_values = true)]
        gross_margin: f64,
        #[arg(long, allow_hyphen_values = true)]
        opex_growth: f64,
    },
    /// Terminal runway across revenue growth x gross margin, as CSV
    Sensitivity {
        #[command(flatten)]
        input: Input,
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "-0.05,0,0.05")]
        revenue_growth_range: Vec<f64>,
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "0.4,0.5,0.6")]
        gross_margin_range: Vec<f64>,
        #[arg(long, allow_hyphen_values = true)]
        opex_growth: f64,
        #[arg(long, default_value_t = 12)]
        months: u32,
    },
    /// Full reporting pack for one company, as JSON
    Pack {
        #[command(flatten)]
        input: Input,
        #[arg(long)]
        company: String,
        /// Engine settings JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Latest KPIs and risk flags across companies, as JSON
    Dashboard {
        /// Company actuals as NAME=PATH[,MAPPINGS], repeatable
        #[arg(long = "company", required = true)]
        companies: Vec<String>,
        /// Mapping CSV for companies that do not name their own
        #[arg(long)]
        mappings: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Unmapped source labels and suggested translations, as JSON
    Mappings {
        #[command(flatten)]
        input: Input,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Kpis { input } => {
            let records = load_records(&input.actuals, input.mappings.as_deref())?;
            let kpis = compute_kpis(&records);
            write_kpis_csv(open_output(input.output.as_deref())?, &kpis)?;
        }
        Command::Forecast {
            input,
            months,
            revenue_growth,
            gross_margin,
            opex_growth,
        } => {
            let records = load_records(&input.actuals, input.mappings.as_deref())?;
            let kpis = compute_kpis(&records);
            let projected = forecast(&kpis, months, revenue_growth, gross_margin, opex_growth);
            write_kpis_csv(open_output(input.output.as_deref())?, &projected)?;
        }
        Command::Sensitivity {
            input,
            revenue_growth_range,
            gross_margin_range,
            opex_growth,
            months,
        } => {
            let records = load_records(&input.actuals, input.mappings.as_deref())?;
            let kpis = compute_kpis(&records);
            let grid = sensitivity_grid(&kpis, &revenue_growth_range, &gross_margin_range, opex_growth, months);
            write_sensitivity_csv(open_output(input.output.as_deref())?, &grid)?;
        }
        Command::Pack { input, company, config } => {
            let settings = EngineSettings::load(config.as_deref())
                .with_context(|| "failed to load engine settings")?;
            let mapping = load_mapping(input.mappings.as_deref())?;
            let rows = read_rows(&input.actuals)?;
            let pack = ReportPack::from_raw(company, &rows, &mapping, &settings)?;
            pack.write_json(open_output(input.output.as_deref())?)?;
        }
        Command::Dashboard {
            companies,
            mappings,
            config,
            output,
        } => {
            let settings = EngineSettings::load(config.as_deref())
                .with_context(|| "failed to load engine settings")?;
            let shared_mapping = load_mapping(mappings.as_deref())?;

            let mut portfolio = Vec::with_capacity(companies.len());
            for spec in &companies {
                let source = CompanySource::parse(spec)?;
                let own_mapping = match &source.mappings {
                    Some(path) => Some(load_mapping(Some(path))?),
                    None => None,
                };
                let mapping = own_mapping.as_ref().unwrap_or(&shared_mapping);

                let rows = read_rows(&source.actuals)?;
                let records = mapping
                    .normalize(&rows)
                    .with_context(|| format!("normalizing actuals for {}", source.name))?;
                portfolio.push(CompanyActuals {
                    company: source.name,
                    records,
                });
            }

            let dashboard = portfolio_dashboard(&portfolio, &settings.risk);
            write_json(open_output(output.as_deref())?, &dashboard)?;
        }
        Command::Mappings { input } => {
            let mapping = load_mapping(input.mappings.as_deref())?;
            let rows = read_rows(&input.actuals)?;
            let labels: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();

            let report = serde_json::json!({
                "unmapped_accounts": mapping.unmapped_accounts(labels.iter().copied()),
                "mapped_count": mapping.len(),
                "suggestions": CategoryMapping::suggest(labels.iter().copied()),
            });
            write_json(open_output(input.output.as_deref())?, &report)?;
        }
    }

    Ok(())
}

/// One `--company NAME=PATH[,MAPPINGS]` argument
#[derive(Debug, PartialEq)]
struct CompanySource {
    name: String,
    actuals: PathBuf,
    mappings: Option<PathBuf>,
}

impl CompanySource {
    fn parse(spec: &str) -> anyhow::Result<Self> {
        let Some((name, paths)) = spec.split_once('=') else {
            bail!("expected NAME=PATH[,MAPPINGS] for --company, got '{}'", spec);
        };
        let (actuals, mappings) = match paths.split_once(',') {
            Some((actuals, mappings)) => (actuals, Some(PathBuf::from(mappings))),
            None => (paths, None),
        };
        if name.is_empty() || actuals.is_empty() {
            bail!("expected NAME=PATH[,MAPPINGS] for --company, got '{}'", spec);
        }
        Ok(Self {
            name: name.to_string(),
            actuals: PathBuf::from(actuals),
            mappings,
        })
    }
}

/// Pretty JSON followed by an explicit flush so write errors reach the exit code
fn write_json<W: Write, T: Serialize>(mut out: W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    out.flush()?;
    Ok(())
}

fn read_rows(path: &Path) -> anyhow::Result<Vec<RawActual>> {
    load_raw_actuals(path).with_context(|| format!("reading actuals from {}", path.display()))
}

fn load_mapping(path: Option<&Path>) -> anyhow::Result<CategoryMapping> {
    match path {
        Some(p) => {
            let file = File::open(p).with_context(|| format!("opening mappings {}", p.display()))?;
            Ok(CategoryMapping::from_reader(file)?)
        }
        None => Ok(CategoryMapping::new()),
    }
}

fn load_records(actuals: &Path, mappings: Option<&Path>) -> anyhow::Result<Vec<ActualRecord>> {
    let mapping = load_mapping(mappings)?;
    let rows = read_rows(actuals)?;
    Ok(mapping.normalize(&rows)?)
}

fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            let file = File::create(p).with_context(|| format!("creating {}", p.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts writes into its buffer but fails every flush, like a full disk behind a BufWriter
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "No space left on device"))
        }
    }

    #[test]
    fn test_json_output_reports_flush_failure() {
        let value = serde_json::json!({"company": "Atlas Labs"});
        assert!(write_json(BufWriter::new(FullDisk), &value).is_err());
    }

    #[test]
    fn test_json_output_writes_everything() {
        let mut out = Vec::new();
        write_json(&mut out, &serde_json::json!({"risks": []})).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"risks\""));
    }

    #[test]
    fn test_negative_gross_margin_is_accepted() {
        let cli = Cli::try_parse_from([
            "portfolio-kpi", "forecast", "--actuals", "a.csv",
            "--revenue-growth", "0", "--gross-margin", "-0.1", "--opex-growth", "0",
        ])
        .unwrap();
        match cli.command {
            Command::Forecast { gross_margin, .. } => assert_eq!(gross_margin, -0.1),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_negative_gross_margin_range_is_accepted() {
        let cli = Cli::try_parse_from([
            "portfolio-kpi", "sensitivity", "--actuals", "a.csv",
            "--gross-margin-range", "-0.2,0,0.4", "--opex-growth", "-0.01",
        ])
        .unwrap();
        match cli.command {
            Command::Sensitivity {
                gross_margin_range,
                revenue_growth_range,
                opex_growth,
                ..
            } => {
                assert_eq!(gross_margin_range, vec![-0.2, 0.0, 0.4]);
                assert_eq!(revenue_growth_range, vec![-0.05, 0.0, 0.05]);
                assert_eq!(opex_growth, -0.01);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_company_source_with_own_mappings() {
        let source = CompanySource::parse("Atlas Labs=atlas.csv,atlas_map.csv").unwrap();
        assert_eq!(
            source,
            CompanySource {
                name: "Atlas Labs".to_string(),
                actuals: PathBuf::from("atlas.csv"),
                mappings: Some(PathBuf::from("atlas_map.csv")),
            }
        );
    }

    #[test]
    fn test_company_source_falls_back_to_shared_mappings() {
        let source = CompanySource::parse("Crest=crest.csv").unwrap();
        assert_eq!(source.actuals, PathBuf::from("crest.csv"));
        assert_eq!(source.mappings, None);
    }

    #[test]
    fn test_company_source_requires_name_and_path() {
        assert!(CompanySource::parse("crest.csv").is_err());
        assert!(CompanySource::parse("=crest.csv").is_err());
        assert!(CompanySource::parse("Crest=").is_err());
    }
}
