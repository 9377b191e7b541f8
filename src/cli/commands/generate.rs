use clap::Args;
use rand::{rngs::StdRng, SeedableRng};

use crate::cli::{utils, OutputFormat};
use crate::config::config;
use crate::generator::{FieldSpec, FieldTypeRegistry, RecordSynthesizer};

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(
        long = "field",
        short = 'f',
        required = true,
        value_parser = parse_field,
        help = "Field as name:type, repeat for more fields (e.g. -f id:uuid -f email:email)"
    )]
    pub fields: Vec<FieldSpec>,

    #[arg(long, short = 'n', help = "Number of records (defaults to GENERATION_DEFAULT_COUNT)")]
    pub count: Option<usize>,

    #[arg(long, help = "Seed for reproducible output")]
    pub seed: Option<u64>,
}

pub fn handle(args: GenerateArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let limits = &config().generation;
    let count = args
        .count
        .unwrap_or_else(|| usize::try_from(limits.default_count).unwrap_or(0));
    let max = usize::try_from(limits.max_count).unwrap_or(0);
    if count > max {
        anyhow::bail!("count {} exceeds the maximum of {}", count, max);
    }

    let synthesizer = RecordSynthesizer::new(FieldTypeRegistry::with_defaults());
    for field in &args.fields {
        if field.kind().is_none() {
            tracing::warn!("Unknown field type '{}' for '{}', using word", field.field_type, field.name);
        }
    }

    let records = match args.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            synthesizer.synthesize_with_rng(&args.fields, count, &mut rng)
        }
        None => synthesizer.synthesize(&args.fields, count),
    };

    utils::output_list(&output_format, &records)
}

/// `name:type`; the type may be omitted, which falls back to `word`
pub fn parse_field(raw: &str) -> Result<FieldSpec, String> {
    let (name, field_type) = raw.split_once(':').unwrap_or((raw, "word"));
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }
    Ok(FieldSpec::new(name, field_type.trim()))
}
