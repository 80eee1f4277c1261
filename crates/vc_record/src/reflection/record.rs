use core::iter::FusedIterator;

use crate::Reflect;
use crate::info::TypeRef;

/// A value with named fields in declaration order.
///
/// Fields marked `#[record(skip)]` are not visible through this trait.
///
/// # Examples
///
/// ```
/// use vc_record::{Record, derive::Record};
///
/// #[derive(Record)]
/// struct Step {
///     step_id: u32,
///     label: String,
/// }
///
/// let step = Step { step_id: 3, label: "copay".into() };
/// let record: &dyn Record = &step;
///
/// assert_eq!(record.field_len(), 2);
/// assert_eq!(record.name_at(1), Some("label"));
/// assert_eq!(record.field("step_id").unwrap().downcast_ref::<u32>(), Some(&3));
/// assert_eq!(record.iter_fields().count(), 2);
/// ```
pub trait Record: Reflect {
    /// Handle to the static type of `self`.
    fn type_ref(&self) -> TypeRef;

    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    fn name_at(&self, index: usize) -> Option<&'static str>;

    fn field_len(&self) -> usize;
}

impl dyn Record {
    /// Iterate `(name, value)` pairs in declaration order.
    #[inline]
    pub fn iter_fields(&self) -> RecordFieldIter<'_> {
        RecordFieldIter {
            record: self,
            index: 0,
        }
    }
}

/// Iterator returned by `iter_fields`.
pub struct RecordFieldIter<'a> {
    record: &'a dyn Record,
    index: usize,
}

impl<'a> Iterator for RecordFieldIter<'a> {
    type Item = (&'static str, &'a dyn Reflect);

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.record.name_at(self.index)?;
        let value = self.record.field_at(self.index)?;
        self.index += 1;
        Some((name, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.record.field_len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RecordFieldIter<'_> {}
impl FusedIterator for RecordFieldIter<'_> {}
