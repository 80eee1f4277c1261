//! [`Typed`](crate::info::Typed), [`Reflect`](crate::Reflect) and
//! [`FromValue`](crate::FromValue) for foreign types.
//!
//! - scalars: `bool`, `char`, `String`, all integers up to 64 bits, `f32`, `f64`
//! - temporals: `chrono` dates, times, date-times and UTC instants
//! - lists: `Vec`, `VecDeque`, `LinkedList`
//! - optional: `Option`, `OnceLock`
//! - transparent: `Box`, `Arc`, `Rc`
//! - dynamic: `Box<dyn Reflect>`

mod collections;
mod dynamic;
mod scalar;
mod temporal;
mod wrappers;
