use crate::value::Value;
use xxhash_rust::xxh3::Xxh3;

/// Value-hash format version byte used by canonical digest encoding.
pub(crate) const VALUE_HASH_VERSION: u8 = 1;

/// Stable XXH3 seed used by canonical value hashing.
pub(crate) const VALUE_HASH_SEED: u64 = 0;

fn feed_u8(h: &mut Xxh3, x: u8) {
    h.update(&[x]);
}
fn feed_u32(h: &mut Xxh3, x: u32) {
    h.update(&x.to_be_bytes());
}
fn feed_u64(h: &mut Xxh3, x: u64) {
    h.update(&x.to_be_bytes());
}
fn feed_i64(h: &mut Xxh3, x: i64) {
    h.update(&x.to_be_bytes());
}
fn feed_bytes(h: &mut Xxh3, b: &[u8]) {
    h.update(b);
}

// Lengths are hashed as u32; longer payloads saturate, which only widens a
// bucket and never splits equal values.
fn feed_len(h: &mut Xxh3, len: usize) {
    feed_u32(h, u32::try_from(len).unwrap_or(u32::MAX));
}

fn write_to_hasher(value: &Value, h: &mut Xxh3) {
    feed_u8(h, value.canonical_tag().to_u8());

    match value {
        Value::Bool(b) => feed_u8(h, u8::from(*b)),
        Value::Float64(v) => feed_u64(h, v.to_bits()),
        Value::Int(i) => feed_i64(h, *i),
        Value::List(xs) => {
            feed_len(h, xs.len());
            for x in xs {
                feed_u8(h, 0xFF);
                write_to_hasher(x, h); // recurse, no sub-hash
            }
        }
        Value::Map(entries) => {
            // BTreeMap iteration is already in canonical key order.
            feed_len(h, entries.len());
            for (key, value) in entries {
                feed_u8(h, 0xFD);
                feed_len(h, key.len());
                feed_bytes(h, key.as_bytes());
                feed_u8(h, 0xFE);
                write_to_hasher(value, h);
            }
        }
        Value::Null => {
            // No additional payload beyond canonical tag.
        }
        Value::Text(s) => {
            feed_len(h, s.len());
            feed_bytes(h, s.as_bytes());
        }
        Value::Uint(u) => feed_u64(h, *u),
    }
}

/// Stable 128-bit digest of the canonical form of one value.
///
/// Identity-equal values always produce the same digest.
#[must_use]
pub(crate) fn hash_value(value: &Value) -> [u8; 16] {
    let canonical = value.canonicalize();

    let mut h = Xxh3::with_seed(VALUE_HASH_SEED);
    feed_u8(&mut h, VALUE_HASH_VERSION); // version

    write_to_hasher(&canonical, &mut h);
    h.digest128().to_be_bytes()
}

///
/// TESTS
///
