//! Mock data generation: field type registry and record synthesizer.

pub mod field_type;
pub mod registry;
pub mod synthesizer;

pub use field_type::{FieldKind, FieldSpec};
pub use registry::{FieldTypeRegistry, GeneratorFn};
pub use synthesizer::{MockRecord, RecordSynthesizer};
