//! Input masks.
//!
//! A mask is a template such as `__.__.____` where each [`FILL_SLOT`] marks a
//! position for a user-entered character and every other character is a
//! literal separator. These functions are pure: they never look at field
//! state, which lets the masked setter in [`fields`](crate::fields) decide
//! when to apply them.

/// The fill-slot character used in mask templates.
pub const FILL_SLOT: char = '_';

/// Removes every character that occurs in `mask` from `value`.
///
/// The whole character set of the mask is removed, fill slots included, so
/// `"+7_99"` under mask `"+___"` becomes `"799"`.
///
/// # Examples
///
/// ```
/// use crform_forms::mask::strip;
///
/// assert_eq!(strip("26.12.2000", "__.__.____"), "26122000");
/// assert_eq!(strip("+79999999999", "+_______________"), "79999999999");
/// ```
pub fn strip(value: &str, mask: &str) -> String {
    value.chars().filter(|c| !mask.contains(*c)).collect()
}

/// Fills the slots of `mask` with the characters of `clean`, in order.
///
/// When `clean` runs out before the last slot, the result is cut at the
/// first unfilled slot, producing an in-progress value. Characters beyond
/// the last slot are dropped.
///
/// # Examples
///
/// ```
/// use crform_forms::mask::apply;
///
/// assert_eq!(apply("2612", "__.__.____"), "26.12.");
/// assert_eq!(apply("26122000", "__.__.____"), "26.12.2000");
/// assert_eq!(apply("261220001", "__.__.____"), "26.12.2000");
/// ```
pub fn apply(clean: &str, mask: &str) -> String {
    let mut chars = clean.chars();
    let mut out = String::with_capacity(mask.len());
    for slot in mask.chars() {
        if slot == FILL_SLOT {
            match chars.next() {
                Some(c) => out.push(c),
                None => break,
            }
        } else {
            out.push(slot);
        }
    }
    tracing::trace!(mask, result = %out, "mask applied");
    out
}

/// Normalizes a newly entered value against a mask.
///
/// `current` is the value stored before the edit. A new value shorter than
/// `current` is a deletion and passes through untouched, so backspacing
/// through literal separators works. Otherwise the literals are stripped and
/// the remaining characters are laid into the template.
pub fn normalize(current: &str, incoming: &str, mask: &str) -> String {
    if incoming.chars().count() < current.chars().count() {
        return incoming.to_string();
    }
    let clean = strip(incoming, mask);
    if clean.is_empty() {
        return String::new();
    }
    apply(&clean, mask)
}

/// Returns `true` if every slot of `mask` is filled in `value`.
pub fn is_complete(value: &str, mask: &str) -> bool {
    let slots = mask.chars().filter(|c| *c == FILL_SLOT).count();
    strip(value, mask).chars().count() >= slots
}
