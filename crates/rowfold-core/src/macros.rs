/// Build a [`Record`](crate::field::Record) from `name => entry` pairs.
///
/// Entries accept anything convertible into an `Entry`: plain values, nested
/// `Field` descriptors, or `Option<Field>` for optional relations.
#[macro_export]
macro_rules! record {
    () => {
        $crate::field::Record::new()
    };
    ($($name:expr => $entry:expr),+ $(,)?) => {
        $crate::field::Record::new()
            $(.entry($name, $entry))+
    };
}
