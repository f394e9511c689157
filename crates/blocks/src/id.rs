//! Block id generation.
//!
//! Format: `block_<unix-millis>_<9 lowercase base-36 chars>`, for example
//! `block_1700000000000_ab12cd3ef`.
//!
//! Ids only need to be unique within a single page, and blocks are created at human pace, so a
//! millisecond timestamp plus a short random suffix is enough. These ids are not
//! cryptographically strong and not globally unique; do not use them as such.

use chrono::{DateTime, Utc};
use rand::Rng;

const PREFIX: &str = "block_";
const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a new block id.
pub fn generate_block_id() -> String {
    generate_block_id_at(Utc::now(), &mut rand::thread_rng())
}

pub(crate) fn generate_block_id_at<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("{PREFIX}{}_{suffix}", now.timestamp_millis())
}

/// Returns true if `id` has the shape produced by [`generate_block_id`].
///
/// Purely syntactic. Caller-supplied ids of any other shape are still valid block ids.
pub fn is_generated_block_id(id: &str) -> bool {
    let Some(rest) = id.strip_prefix(PREFIX) else {
        return false;
    };
    let Some((millis, suffix)) = rest.split_once('_') else {
        return false;
    };

    !millis.is_empty()
        && millis.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == SUFFIX_LEN
        && suffix.bytes().all(|b| BASE36.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_id_has_expected_shape() {
        let id = generate_block_id();
        assert!(is_generated_block_id(&id), "unexpected id shape: {id}");
    }

    #[test]
    fn timestamp_component_is_unix_millis() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let id = generate_block_id_at(now, &mut rng);

        assert!(id.starts_with("block_1700000000000_"));
        assert_eq!(id.len(), "block_1700000000000_".len() + SUFFIX_LEN);
    }

    #[test]
    fn consecutive_ids_differ() {
        let a = generate_block_id();
        let b = generate_block_id();
        assert_ne!(a, b);
    }

    #[test]
    fn recognises_documented_example() {
        assert!(is_generated_block_id("block_1700000000000_ab12cd3ef"));
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(!is_generated_block_id("x"));
        assert!(!is_generated_block_id("block__ab12cd3ef"));
        assert!(!is_generated_block_id("block_1700000000000_AB12CD3EF"));
        assert!(!is_generated_block_id("block_1700000000000_ab12"));
        assert!(!is_generated_block_id("blk_1700000000000_ab12cd3ef"));
    }
}
