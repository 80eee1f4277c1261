use alloc::boxed::Box;
use alloc::collections::{LinkedList, VecDeque};
use alloc::vec::Vec;

use crate::de::{FieldValue, FromValue, Materializer};
use crate::info::{TypeIdentity, TypeRef, TypeShape, Typed};
use crate::{List, ListItemIter, MaterializeError, Reflect, ReflectRef};

macro_rules! impl_list {
    ($($list:ident),+) => {$(
        impl<T: Typed> Typed for $list<T> {
            #[inline]
            fn type_shape() -> TypeShape {
                TypeShape::List(TypeRef::of::<T>())
            }
        }

        impl<T: Reflect> Reflect for $list<T> {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::List(self)
            }

            #[inline]
            fn reflect_identity(&self) -> TypeIdentity {
                TypeIdentity::of::<Self>()
            }
        }

        impl<T: Reflect> List for $list<T> {
            #[inline]
            fn len(&self) -> usize {
                <$list<T>>::len(self)
            }

            fn iter(&self) -> ListItemIter<'_> {
                Box::new(<&$list<T>>::into_iter(self).map(|item| item as &dyn Reflect))
            }
        }

        impl<T: FromValue> FromValue for $list<T> {
            fn from_value(
                value: FieldValue,
                cx: &mut Materializer<'_>,
            ) -> Result<Self, MaterializeError> {
                let FieldValue::List(items) = value else {
                    return Err(cx.mismatch("list", &value));
                };
                let mut out = $list::new();
                for (index, item) in items.iter().enumerate() {
                    let item = item?;
                    out.extend([cx.at_index(index, |cx| T::from_value(item, cx))?]);
                }
                Ok(out)
            }
        }
    )+};
}

impl_list!(Vec, VecDeque, LinkedList);
