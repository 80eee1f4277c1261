//! The entry point: a [`Codec`] fixes one strategy, one filter policy and
//! one nested-admission mode, then encodes, decodes and materializes.

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod global;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Exports

pub use builder::CodecBuilder;
pub use global::{global, install};

// -----------------------------------------------------------------------------
// Codec

use alloc::boxed::Box;
use alloc::sync::Arc;

use bytes::Bytes;

use crate::de::{FromValue, LazyRecord, Materializer};
use crate::filter::{Admission, FilterPolicy, NestedAdmission};
use crate::info::{TypeIdentity, TypeRef, Typed};
use crate::registry::TypeDescriptor;
use crate::ser::{EncodedRecord, Encoder};
use crate::strategy::{DescriptorDriven, PatternMatching, PatternRules, Strategy, StrategyKind};
use crate::{DescribeError, EncodeError, Error, FieldValue, MalformedRecordError};
use crate::{MaterializeError, Record};

/// Encoder, decoder and materializer for one configuration.
///
/// The configuration is fixed at construction; build a new codec to change
/// it. A codec is `Send + Sync` and every call is independent, so one codec
/// can serve any number of threads.
///
/// # Examples
///
/// ```
/// use vc_record::{Codec, derive::Record, filter::{FilterPolicy, NestedAdmission}};
/// use vc_record::strategy::StrategyKind;
///
/// #[derive(Record, Debug, PartialEq)]
/// enum Status {
///     Active,
///     Closed,
/// }
///
/// #[derive(Record, Debug, PartialEq)]
/// struct Account {
///     #[record(identity)]
///     id: u64,
///     status: Status,
/// }
///
/// let codec = Codec::builder()
///     .strategy(StrategyKind::DescriptorDriven)
///     .policy(FilterPolicy::new().allow::<Account>())
///     .nested_admission(NestedAdmission::Inherit)
///     .build();
///
/// let account = Account { id: 9, status: Status::Closed };
/// let view = codec.decode(codec.encode(&account).unwrap()).unwrap();
///
/// assert_eq!(view.field("status").unwrap().as_enum().unwrap().variant(), "Closed");
/// assert_eq!(view.identity_fields().collect::<Vec<_>>(), ["id"]);
/// assert_eq!(codec.materialize::<Account>(&view).unwrap(), account);
/// ```
#[derive(Debug)]
pub struct Codec {
    strategy: Box<dyn Strategy>,
    policy: FilterPolicy,
    nested: NestedAdmission,
}

impl Codec {
    #[inline]
    pub fn builder() -> CodecBuilder {
        CodecBuilder::new()
    }

    /// A codec with a custom strategy.
    pub fn new(strategy: impl Strategy + 'static, policy: FilterPolicy, nested: NestedAdmission) -> Self {
        Self {
            strategy: Box::new(strategy),
            policy,
            nested,
        }
    }

    /// Descriptor-driven codec backed by [`TypeRegistry::shared`].
    ///
    /// [`TypeRegistry::shared`]: crate::registry::TypeRegistry::shared
    pub fn descriptor_driven(policy: FilterPolicy) -> Self {
        Self::new(DescriptorDriven::default(), policy, NestedAdmission::default())
    }

    /// Pattern-matching codec with the given field rules.
    pub fn pattern_matching(policy: FilterPolicy, rules: PatternRules) -> Self {
        Self::new(PatternMatching::new(rules), policy, NestedAdmission::default())
    }

    #[inline]
    pub fn strategy(&self) -> StrategyKind {
        self.strategy.kind()
    }

    #[inline]
    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    #[inline]
    pub fn nested_admission(&self) -> NestedAdmission {
        self.nested
    }

    /// Whether `ty` may be serialized by this codec.
    #[inline]
    pub fn permits(&self, ty: &TypeIdentity) -> bool {
        self.policy.permits(ty, self.strategy())
    }

    /// The descriptor this codec materializes `T` with.
    pub fn describe<T: Typed>(&self) -> Result<Arc<TypeDescriptor>, DescribeError> {
        self.strategy.describe(TypeRef::of::<T>())
    }

    /// Encode `value` with `T` as the root type.
    #[inline]
    pub fn encode<T: Record>(&self, value: &T) -> Result<EncodedRecord, EncodeError> {
        self.encode_dyn(value)
    }

    /// Encode a record whose type is only known at runtime.
    pub fn encode_dyn(&self, value: &dyn Record) -> Result<EncodedRecord, EncodeError> {
        let encoded = Encoder::new(&*self.strategy, self.admission()).encode(value)?;
        log::trace!(
            "encoded `{}` into {} bytes",
            value.reflect_identity(),
            encoded.len()
        );
        Ok(encoded)
    }

    /// Validate `bytes` and return a lazy view of the root record.
    ///
    /// Decoding does not depend on the codec's configuration; it is here so
    /// one value covers the whole round trip.
    #[inline]
    pub fn decode(&self, bytes: impl Into<Bytes>) -> Result<LazyRecord, MalformedRecordError> {
        crate::de::decode(bytes)
    }

    /// Rebuild a `T` from a decoded record.
    pub fn materialize<T: FromValue + Typed>(&self, record: &LazyRecord) -> Result<T, MaterializeError> {
        let mut cx = Materializer::new(&*self.strategy, self.admission());
        T::from_value(FieldValue::Record(record.clone()), &mut cx)
    }

    /// Decode and materialize in one step.
    pub fn read<T: FromValue + Typed>(&self, bytes: impl Into<Bytes>) -> Result<T, Error> {
        let record = self.decode(bytes)?;
        Ok(self.materialize(&record)?)
    }

    #[inline]
    fn admission(&self) -> Admission<'_> {
        Admission::new(&self.policy, self.strategy(), self.nested)
    }
}
