use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use xxhash_rust::xxh3::{xxh3_64, xxh3_64_with_seed};

use crate::BenchError;

/// Multiplier of the well-distributed strategy.
pub const NORMAL_PRIME: u64 = 99654;

/// Hash every collided key reports.
pub const COLLIDED_HASH: u64 = 1;

/// The three key variants under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Native,
    Collided,
    Normal,
}

impl KeyKind {
    /// Name used in report labels ("Native", "Collided", "Normal").
    pub fn type_name(self) -> &'static str {
        match self {
            KeyKind::Native => "Native",
            KeyKind::Collided => "Collided",
            KeyKind::Normal => "Normal",
        }
    }

    /// Field value of the key generated for population index `index`,
    /// e.g. `collidedObject_15000`.
    pub fn field_value(self, index: usize) -> String {
        format!("{}Object_{}", self.type_name().to_lowercase(), index)
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/* -------- Strategies -------- */

/// Hash/equality strategy of one key variant.
///
/// Implementors are zero-sized markers; `Key<S>` routes its `Hash` and `Eq`
/// impls through them so a map keyed by `Key<S>` sees exactly these hashes.
pub trait KeyStrategy: Send + Sync + 'static {
    const KIND: KeyKind;

    fn hash(key: &KeyData) -> u64;

    fn equals(a: &KeyData, b: &KeyData) -> bool;
}

/// Identity hash and identity equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct Native;

/// Constant hash, equality by field value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Collided;

/// Field-value hash, equality by field value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normal;

impl KeyStrategy for Native {
    const KIND: KeyKind = KeyKind::Native;

    #[inline]
    fn hash(key: &KeyData) -> u64 {
        // Scramble the address so the table gets high-entropy top bits.
        let addr = key as *const KeyData as usize as u64;
        xxh3_64(&addr.to_le_bytes())
    }

    #[inline]
    fn equals(a: &KeyData, b: &KeyData) -> bool {
        std::ptr::eq(a, b)
    }
}

impl KeyStrategy for Collided {
    const KIND: KeyKind = KeyKind::Collided;

    #[inline]
    fn hash(_key: &KeyData) -> u64 {
        COLLIDED_HASH
    }

    #[inline]
    fn equals(a: &KeyData, b: &KeyData) -> bool {
        std::ptr::eq(a, b) || a.field_value == b.field_value
    }
}

impl KeyStrategy for Normal {
    const KIND: KeyKind = KeyKind::Normal;

    #[inline]
    fn hash(key: &KeyData) -> u64 {
        let mut result: u64 = 1;
        result = NORMAL_PRIME
            .wrapping_mul(result)
            .wrapping_add(xxh3_64(key.field_value.as_bytes()));
        result
    }

    #[inline]
    fn equals(a: &KeyData, b: &KeyData) -> bool {
        std::ptr::eq(a, b) || a.field_value == b.field_value
    }
}

/* -------- Key -------- */

/// Immutable payload shared by every handle to one key instance.
#[derive(Debug)]
pub struct KeyData {
    field_value: Box<str>,
}

impl KeyData {
    #[inline]
    pub fn field_value(&self) -> &str {
        &self.field_value
    }
}

/// A benchmark key. Cloning yields another handle to the same instance, so
/// identity-based strategies treat the clone as the original.
pub struct Key<S: KeyStrategy> {
    data: Arc<KeyData>,
    _strategy: PhantomData<S>,
}

/// Builds the key for a population index. Harnesses take one of these so
/// tests can substitute a failing factory.
pub type KeyFactory<S> = fn(usize) -> Result<Key<S>, BenchError>;

impl<S: KeyStrategy> Key<S> {
    pub fn new(field_value: impl Into<String>) -> Result<Self, BenchError> {
        let field_value = field_value.into();
        if field_value.is_empty() {
            return Err(BenchError::Construction {
                kind: S::KIND,
                field_value,
                reason: "field value is empty".to_string(),
            });
        }
        Ok(Self {
            data: Arc::new(KeyData { field_value: field_value.into_boxed_str() }),
            _strategy: PhantomData,
        })
    }

    /// Default factory: the key for population index `index`.
    pub fn for_index(index: usize) -> Result<Self, BenchError> {
        Self::new(S::KIND.field_value(index))
    }

    #[inline]
    pub fn kind(&self) -> KeyKind {
        S::KIND
    }

    #[inline]
    pub fn field_value(&self) -> &str {
        self.data.field_value()
    }

    #[inline]
    pub fn hash_value(&self) -> u64 {
        S::hash(&self.data)
    }

    /// Whether both handles point at the same instance.
    #[inline]
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl<S: KeyStrategy> Clone for Key<S> {
    fn clone(&self) -> Self {
        Self { data: Arc::clone(&self.data), _strategy: PhantomData }
    }
}

impl<S: KeyStrategy> PartialEq for Key<S> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        S::equals(&self.data, &other.data)
    }
}

impl<S: KeyStrategy> Eq for Key<S> {}

impl<S: KeyStrategy> Hash for Key<S> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

impl<S: KeyStrategy> fmt::Display for Key<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Object({})@{:x}", S::KIND, self.field_value(), self.hash_value())
    }
}

impl<S: KeyStrategy> fmt::Debug for Key<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("kind", &S::KIND)
            .field("field_value", &self.field_value())
            .finish()
    }
}

/* -------- Pass-through hasher -------- */

/// Hands the strategy's hash to the table unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyHasher {
    hash: u64,
}

impl Hasher for KeyHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.hash = xxh3_64_with_seed(bytes, self.hash);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct KeyHashBuilder;

impl BuildHasher for KeyHashBuilder {
    type Hasher = KeyHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        KeyHasher::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_values_follow_type_name() {
        assert_eq!(KeyKind::Native.field_value(0), "nativeObject_0");
        assert_eq!(KeyKind::Collided.field_value(15000), "collidedObject_15000");
        assert_eq!(KeyKind::Normal.field_value(29999), "normalObject_29999");
    }

    #[test]
    fn empty_field_value_is_rejected() {
        let err = Key::<Normal>::new("").unwrap_err();
        assert!(matches!(err, BenchError::Construction { kind: KeyKind::Normal, .. }));
    }

    #[test]
    fn native_equality_is_identity() {
        let a = Key::<Native>::new("nativeObject_1").unwrap();
        let b = Key::<Native>::new("nativeObject_1").unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.hash_value(), a.clone().hash_value());
    }

    #[test]
    fn collided_hash_is_constant() {
        let a = Key::<Collided>::for_index(0).unwrap();
        let b = Key::<Collided>::for_index(29999).unwrap();
        assert_eq!(a.hash_value(), COLLIDED_HASH);
        assert_eq!(a.hash_value(), b.hash_value());
        assert_ne!(a, b);
        assert_eq!(a, Key::<Collided>::for_index(0).unwrap());
    }

    #[test]
    fn normal_hash_follows_field_value() {
        let a = Key::<Normal>::for_index(1).unwrap();
        let b = Key::<Normal>::for_index(1).unwrap();
        let c = Key::<Normal>::for_index(2).unwrap();
        assert!(!a.same_instance(&b));
        assert_eq!(a, b);
        assert_eq!(a.hash_value(), b.hash_value());
        assert_ne!(a.hash_value(), c.hash_value());
        assert_eq!(
            a.hash_value(),
            NORMAL_PRIME.wrapping_add(xxh3_64(b"normalObject_1"))
        );
    }

    #[test]
    fn pass_through_hasher_keeps_strategy_hash() {
        let key = Key::<Collided>::new("collidedObject_7").unwrap();
        assert_eq!(KeyHashBuilder.hash_one(&key), COLLIDED_HASH);
    }

    #[test]
    fn display_names_variant_and_field() {
        let key = Key::<Collided>::new("collidedObject_3").unwrap();
        assert_eq!(key.to_string(), "CollidedObject(collidedObject_3)@1");
    }
}
