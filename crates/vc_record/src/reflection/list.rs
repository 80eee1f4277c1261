use alloc::boxed::Box;

use crate::Reflect;

/// Boxed iterator over the items of a [`List`].
pub type ListItemIter<'a> = Box<dyn Iterator<Item = &'a dyn Reflect> + 'a>;

/// An ordered collection, encoded in iteration order.
pub trait List: Reflect {
    fn len(&self) -> usize;

    fn iter(&self) -> ListItemIter<'_>;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
