//! Cluster identifiers

use rand::Rng;

use crate::asset::Resolved;

/// Maximum length of a generated infra ID
const INFRA_ID_MAX_LEN: usize = 27;

/// Number of random characters appended to the infra ID
const INFRA_ID_RANDOM_LEN: usize = 5;

/// Characters used for the random suffix (no vowels, no look-alikes)
const INFRA_ID_ALPHABET: &[u8] = b"bcdfghjklmnpqrstvwxz2456789";

/// Identifiers generated once per installation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterId {
    /// Globally unique cluster UUID
    pub uuid: String,
    /// Short identifier used as the prefix for every cloud resource
    pub infra_id: String,
}

impl ClusterId {
    /// Use an existing infra ID with a fresh UUID
    pub fn new(infra_id: impl Into<String>) -> Self {
        Self {
            uuid: uuid::Uuid::new_v4().to_string(),
            infra_id: infra_id.into(),
        }
    }

    /// Generate identifiers for the named cluster
    pub fn generate(cluster_name: &str) -> Self {
        Self::new(generate_infra_id(cluster_name, &mut rand::thread_rng()))
    }
}

impl Resolved for ClusterId {
    const NAME: &'static str = "Cluster ID";
}

/// Derive an infra ID from the cluster name.
///
/// Anything outside `[A-Za-z0-9-]` becomes `-`, dash runs collapse, the base is
/// cut so the result fits [`INFRA_ID_MAX_LEN`], and a random suffix is added.
fn generate_infra_id<R: Rng + ?Sized>(cluster_name: &str, rng: &mut R) -> String {
    let max_base_len = INFRA_ID_MAX_LEN - (INFRA_ID_RANDOM_LEN + 1);

    let mut base = String::with_capacity(cluster_name.len());
    for c in cluster_name.chars() {
        let c = if c.is_ascii_alphanumeric() { c } else { '-' };
        if c == '-' && base.ends_with('-') {
            continue;
        }
        base.push(c);
    }
    base.truncate(max_base_len);
    let base = base.trim_end_matches('-');

    let suffix: String = (0..INFRA_ID_RANDOM_LEN)
        .map(|_| INFRA_ID_ALPHABET[rng.gen_range(0..INFRA_ID_ALPHABET.len())] as char)
        .collect();

    format!("{base}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn base_of(infra_id: &str) -> &str {
        &infra_id[..infra_id.len() - (INFRA_ID_RANDOM_LEN + 1)]
    }

    #[test]
    fn test_short_name_is_kept() {
        let id = generate_infra_id("mycluster", &mut StdRng::seed_from_u64(1));
        assert_eq!(base_of(&id), "mycluster");
        assert_eq!(id.len(), "mycluster".len() + 1 + INFRA_ID_RANDOM_LEN);
    }

    #[test]
    fn test_invalid_characters_collapse_to_single_dash() {
        let id = generate_infra_id("my_cluster..prod", &mut StdRng::seed_from_u64(1));
        assert_eq!(base_of(&id), "my-cluster-prod");
    }

    #[test]
    fn test_long_names_are_truncated_without_trailing_dash() {
        let name = "a-very-long-cluster-na-me-that-keeps-going";
        let id = generate_infra_id(name, &mut StdRng::seed_from_u64(1));
        assert!(id.len() <= INFRA_ID_MAX_LEN);
        assert!(!base_of(&id).ends_with('-'));
        assert!(name.starts_with(base_of(&id)));
    }

    #[test]
    fn test_suffix_uses_restricted_alphabet() {
        let id = generate_infra_id("c", &mut StdRng::seed_from_u64(42));
        let suffix = &id[id.len() - INFRA_ID_RANDOM_LEN..];
        assert!(suffix.bytes().all(|b| INFRA_ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generate_produces_unique_uuids() {
        let a = ClusterId::generate("cluster");
        let b = ClusterId::generate("cluster");
        assert_ne!(a.uuid, b.uuid);
        assert!(a.infra_id.starts_with("cluster-"));
    }
}
