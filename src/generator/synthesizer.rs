use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{Map, Value};

use super::field_type::FieldSpec;
use super::registry::FieldTypeRegistry;

/// One generated record. Keys keep field declaration order.
pub type MockRecord = Map<String, Value>;

/// Builds mock records from a resource's field list.
///
/// The field list is resolved once by the caller and borrowed for every record.
/// Each field is generated independently, so records share shape but not
/// values.
#[derive(Debug, Clone, Default)]
pub struct RecordSynthesizer {
    registry: FieldTypeRegistry,
}

impl RecordSynthesizer {
    pub fn new(registry: FieldTypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FieldTypeRegistry {
        &self.registry
    }

    /// Synthesize `count` records using a freshly seeded RNG.
    pub fn synthesize(&self, fields: &[FieldSpec], count: usize) -> Vec<MockRecord> {
        let mut rng = StdRng::from_os_rng();
        self.synthesize_with_rng(fields, count, &mut rng)
    }

    /// Synthesize `count` records drawing randomness from `rng`.
    ///
    /// Every declared field is generated, in order, for every record. When two
    /// fields share a name the later value wins and the key stays where it
    /// first appeared.
    pub fn synthesize_with_rng(
        &self,
        fields: &[FieldSpec],
        count: usize,
        rng: &mut StdRng,
    ) -> Vec<MockRecord> {
        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            let mut record = Map::with_capacity(fields.len());
            for field in fields {
                let value = self.registry.generate(&field.field_type, rng);
                record.insert(field.name.clone(), value);
            }
            records.push(record);
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn synthesizer() -> RecordSynthesizer {
        RecordSynthesizer::new(FieldTypeRegistry::with_defaults())
    }

    fn keys(record: &MockRecord) -> Vec<&str> {
        record.keys().map(String::as_str).collect()
    }

    fn person_fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("zeta", "name"),
            FieldSpec::new("alpha", "email"),
            FieldSpec::new("middle", "number"),
            FieldSpec::new("mystery", "zzz"),
        ]
    }

    #[test]
    fn produces_exactly_count_records_in_declaration_order() {
        let records = synthesizer().synthesize(&person_fields(), 25);
        assert_eq!(records.len(), 25);
        for record in &records {
            assert_eq!(keys(record), vec!["zeta", "alpha", "middle", "mystery"]);
        }
    }

    #[test]
    fn zero_count_is_an_empty_list() {
        assert!(synthesizer().synthesize(&person_fields(), 0).is_empty());
    }

    #[test]
    fn empty_field_list_gives_empty_objects() {
        let records = synthesizer().synthesize(&[], 4);
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(Map::is_empty));
    }

    #[test]
    fn duplicate_names_keep_first_position_and_last_value() {
        let mut registry = FieldTypeRegistry::empty();
        registry.register("first", |_: &mut StdRng| Value::from(1));
        registry.register("second", |_: &mut StdRng| Value::from(2));
        let synthesizer = RecordSynthesizer::new(registry);
        let fields = vec![
            FieldSpec::new("dup", "first"),
            FieldSpec::new("other", "first"),
            FieldSpec::new("dup", "second"),
        ];

        let records = synthesizer.synthesize(&fields, 2);
        for record in &records {
            assert_eq!(keys(record), vec!["dup", "other"]);
            assert_eq!(record["dup"], Value::from(2));
        }
    }

    #[test]
    fn repeated_calls_share_shape_not_values() {
        let synthesizer = synthesizer();
        let fields = vec![FieldSpec::new("id", "uuid"), FieldSpec::new("n", "name")];
        let first = synthesizer.synthesize(&fields, 5);
        let second = synthesizer.synthesize(&fields, 5);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(keys(a), keys(b));
        }
        assert_ne!(first, second);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let synthesizer = synthesizer();
        let fields = person_fields();
        let a = synthesizer.synthesize_with_rng(&fields, 3, &mut StdRng::seed_from_u64(99));
        let b = synthesizer.synthesize_with_rng(&fields, 3, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
