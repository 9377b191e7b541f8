use crate::cli::{utils, OutputFormat};
use crate::generator::FieldTypeRegistry;

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let registry = FieldTypeRegistry::with_defaults();
    utils::output_list(&output_format, &registry.tags())
}
