use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{Duration, SecondsFormat, Utc};
use fake::faker::address::en::CountryName;
use fake::faker::internet::en::FreeEmail;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::Name;
use fake::faker::number::en::NumberWithFormat;
use fake::Fake;
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::Value;

use super::field_type::FieldKind;

/// A value generator for one field type tag.
pub type GeneratorFn = dyn Fn(&mut StdRng) -> Value + Send + Sync;

const NUMBER_MIN: i64 = 18;
const NUMBER_MAX: i64 = 99;
const PHONE_PREFIX: &str = "+91-";
const PHONE_DIGITS: usize = 10;
/// `#` is one random digit
const PHONE_FORMAT: &str = "+91-##########";
/// Dates are drawn from this window before "now".
const PAST_WINDOW_MS: i64 = 365 * 24 * 60 * 60 * 1000;

/// Lookup table from field type tag to value generator.
///
/// Dispatch never branches on the tag: every tag is a key in the table and
/// anything missing from it goes to the fallback generator, which yields a
/// single word. Generating a value can therefore never fail.
#[derive(Clone)]
pub struct FieldTypeRegistry {
    generators: HashMap<String, Arc<GeneratorFn>>,
    fallback: Arc<GeneratorFn>,
}

impl FieldTypeRegistry {
    /// A registry with no tags; every tag falls back to a word.
    pub fn empty() -> Self {
        Self {
            generators: HashMap::new(),
            fallback: Arc::new(fake_word),
        }
    }

    /// A registry holding every built-in [`FieldKind`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for kind in FieldKind::ALL {
            registry.register(kind.as_str(), builtin(kind));
        }
        registry
    }

    /// Add or replace the generator for `tag`.
    pub fn register<F>(&mut self, tag: impl Into<String>, generator: F) -> &mut Self
    where
        F: Fn(&mut StdRng) -> Value + Send + Sync + 'static,
    {
        self.generators.insert(tag.into(), Arc::new(generator));
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.generators.contains_key(tag)
    }

    /// Registered tags in alphabetical order.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Produce one value for `tag`.
    pub fn generate(&self, tag: &str, rng: &mut StdRng) -> Value {
        let generator = self.generators.get(tag).unwrap_or(&self.fallback);
        generator(rng)
    }
}

impl Default for FieldTypeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for FieldTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTypeRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

fn builtin(kind: FieldKind) -> fn(&mut StdRng) -> Value {
    match kind {
        FieldKind::Name => fake_name,
        FieldKind::Email => fake_email,
        FieldKind::Phone => fake_phone,
        FieldKind::Number => fake_number,
        FieldKind::Boolean => fake_boolean,
        FieldKind::Date => fake_past_date,
        FieldKind::Country => fake_country,
        FieldKind::Word => fake_word,
        FieldKind::Uuid => fake_uuid,
    }
}

fn fake_name(rng: &mut StdRng) -> Value {
    Value::String(Name().fake_with_rng(rng))
}

fn fake_email(rng: &mut StdRng) -> Value {
    Value::String(FreeEmail().fake_with_rng(rng))
}

fn fake_phone(rng: &mut StdRng) -> Value {
    Value::String(NumberWithFormat(PHONE_FORMAT).fake_with_rng(rng))
}

fn fake_number(rng: &mut StdRng) -> Value {
    Value::from(rng.random_range(NUMBER_MIN..=NUMBER_MAX))
}

fn fake_boolean(rng: &mut StdRng) -> Value {
    Value::Bool(rng.random_bool(0.5))
}

fn fake_past_date(rng: &mut StdRng) -> Value {
    let offset = Duration::milliseconds(rng.random_range(1..=PAST_WINDOW_MS));
    let date = Utc::now() - offset;
    Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn fake_country(rng: &mut StdRng) -> Value {
    Value::String(CountryName().fake_with_rng(rng))
}

fn fake_word(rng: &mut StdRng) -> Value {
    Value::String(Word().fake_with_rng(rng))
}

fn fake_uuid(rng: &mut StdRng) -> Value {
    let id = uuid::Builder::from_random_bytes(rng.random()).into_uuid();
    Value::String(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rand::SeedableRng;
    use rstest::rstest;

    const SAMPLES: usize = 500;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn sample(tag: &str) -> Vec<Value> {
        let registry = FieldTypeRegistry::with_defaults();
        let mut rng = rng();
        (0..SAMPLES).map(|_| registry.generate(tag, &mut rng)).collect()
    }

    fn is_email(value: &str) -> bool {
        match value.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.contains('@') && domain.contains('.') && !domain.ends_with('.')
            }
            None => false,
        }
    }

    #[test]
    fn default_registry_knows_every_builtin_kind() {
        let registry = FieldTypeRegistry::with_defaults();
        for kind in FieldKind::ALL {
            assert!(registry.contains(kind.as_str()), "missing {kind}");
        }
        assert_eq!(registry.tags().len(), FieldKind::ALL.len());
    }

    #[test]
    fn number_stays_within_inclusive_bounds() {
        let values = sample("number");
        for value in &values {
            let n = value.as_i64().expect("number should be an integer");
            assert!((NUMBER_MIN..=NUMBER_MAX).contains(&n), "out of range: {n}");
        }
    }

    #[test]
    fn boolean_is_strictly_bool_and_takes_both_values() {
        let values = sample("boolean");
        assert!(values.iter().all(Value::is_boolean));
        assert!(values.iter().any(|v| v == &Value::Bool(true)));
        assert!(values.iter().any(|v| v == &Value::Bool(false)));
    }

    #[test]
    fn date_is_a_past_iso_timestamp() {
        let values = sample("date");
        let now = Utc::now();
        for value in values {
            let text = value.as_str().expect("date should be a string");
            assert!(text.ends_with('Z'), "not UTC: {text}");
            let parsed = DateTime::parse_from_rfc3339(text)
                .expect("valid RFC 3339")
                .with_timezone(&Utc);
            assert!(parsed < now, "not in the past: {text}");
            assert!(parsed > now - Duration::days(366), "too far back: {text}");
        }
    }

    #[test]
    fn email_is_email_shaped() {
        for value in sample("email") {
            let text = value.as_str().expect("email should be a string");
            assert!(is_email(text), "not an email: {text}");
        }
    }

    #[test]
    fn phone_uses_fixed_regional_format() {
        for value in sample("phone") {
            let text = value.as_str().expect("phone should be a string");
            let digits = text.strip_prefix(PHONE_PREFIX).expect("missing +91- prefix");
            assert_eq!(digits.len(), PHONE_DIGITS);
            assert!(digits.chars().all(|c| c.is_ascii_digit()), "bad digits: {text}");
        }
    }

    #[test]
    fn phone_is_reproducible_from_a_seed() {
        let registry = FieldTypeRegistry::with_defaults();
        let first = registry.generate("phone", &mut StdRng::seed_from_u64(42));
        let second = registry.generate("phone", &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
        assert_eq!(PHONE_FORMAT.len(), PHONE_PREFIX.len() + PHONE_DIGITS);
    }

    #[test]
    fn uuid_is_version_four() {
        for value in sample("uuid") {
            let text = value.as_str().expect("uuid should be a string");
            let id = uuid::Uuid::parse_str(text).expect("valid uuid");
            assert_eq!(id.get_version_num(), 4);
        }
    }

    #[rstest]
    #[case("name")]
    #[case("country")]
    #[case("word")]
    fn text_kinds_produce_non_empty_strings(#[case] tag: &str) {
        for value in sample(tag) {
            let text = value.as_str().expect("should be a string");
            assert!(!text.trim().is_empty());
        }
    }

    #[test]
    fn name_has_at_least_two_parts() {
        for value in sample("name") {
            let text = value.as_str().unwrap();
            assert!(text.split_whitespace().count() >= 2, "not a full name: {text}");
        }
    }

    #[rstest]
    #[case("zzz")]
    #[case("")]
    #[case("EMAIL")]
    fn unrecognized_tags_fall_back_to_a_word(#[case] tag: &str) {
        for value in sample(tag) {
            let text = value.as_str().expect("fallback should be a string");
            assert!(!text.is_empty());
            assert!(!text.contains(char::is_whitespace));
        }
    }

    #[test]
    fn registered_tags_extend_dispatch() {
        let mut registry = FieldTypeRegistry::with_defaults();
        registry.register("constant", |_: &mut StdRng| Value::from("fixed"));
        let mut rng = rng();
        assert_eq!(registry.generate("constant", &mut rng), Value::from("fixed"));
        assert!(registry.tags().contains(&"constant"));
    }

    #[test]
    fn register_replaces_an_existing_generator() {
        let mut registry = FieldTypeRegistry::with_defaults();
        registry.register("number", |_: &mut StdRng| Value::from(42));
        let mut rng = rng();
        assert_eq!(registry.generate("number", &mut rng), Value::from(42));
    }

    #[test]
    fn same_seed_gives_same_values() {
        let registry = FieldTypeRegistry::with_defaults();
        let mut a = rng();
        let mut b = rng();
        for tag in ["name", "email", "phone", "number", "uuid"] {
            assert_eq!(registry.generate(tag, &mut a), registry.generate(tag, &mut b));
        }
    }
}
