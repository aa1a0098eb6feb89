//! Panic payload formatting for examples that panic instead of failing.

use std::any::Any;

/// Formats a panic payload into a readable message.
///
/// String payloads are extracted directly; common primitive payloads are
/// rendered with `Display`; anything else is described by its type id.
///
/// # Examples
///
/// ```
/// use xunit_bdd::panic_message;
///
/// let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
/// assert_eq!(panic_message(payload.as_ref()), "boom");
/// ```
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    macro_rules! try_downcast {
        ($($ty:ty),* $(,)?) => {
            $(
                if let Some(value) = payload.downcast_ref::<$ty>() {
                    return value.to_string();
                }
            )*
        };
    }

    try_downcast!(&str, String, i32, u32, i64, u64, isize, usize);
    format!("panic with opaque payload (TypeId({:?}))", payload.type_id())
}
