/// Argument coercion: read each declared option off the interaction and fall
/// back to its default.
use slashwire_core::{OptionSource, OptionValue};

use crate::types::{Arguments, CommandLeaf, OptionType};

/// Reads one raw option value of a fixed type.
type Extractor<S> = fn(&S, &str) -> Option<OptionValue>;

/// Accessor used for each option type. `choice` options are plain strings on the wire.
fn extractor<S: OptionSource + ?Sized>(kind: OptionType) -> Extractor<S> {
    match kind {
        OptionType::String | OptionType::Choice => |s: &S, name: &str| s.get_string(name).map(OptionValue::String),
        OptionType::Integer => |s: &S, name: &str| s.get_integer(name).map(OptionValue::Integer),
        OptionType::Number => |s: &S, name: &str| s.get_number(name).map(OptionValue::Number),
        OptionType::Boolean => |s: &S, name: &str| s.get_boolean(name).map(OptionValue::Boolean),
        OptionType::User => |s: &S, name: &str| s.get_user(name).map(OptionValue::User),
        OptionType::Attachment => |s: &S, name: &str| s.get_attachment(name).map(OptionValue::Attachment),
    }
}

/// Build the argument mapping for `leaf` from the interaction's raw options.
///
/// Every declared option gets an entry. An absent raw value takes the
/// declared default; with no default either, the entry is `None`.
pub fn coerce<S: OptionSource + ?Sized>(leaf: &CommandLeaf, source: &S) -> Arguments {
    let mut args = Arguments::default();
    for (name, spec) in leaf.options() {
        let raw = extractor::<S>(spec.kind())(source, name);
        args.insert(name, raw.or_else(|| spec.default_value().cloned()));
    }
    args
}
