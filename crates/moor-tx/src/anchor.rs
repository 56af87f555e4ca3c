use moor_ledger::{CallArg, Operation};
use moor_types::ContentHash;

/// Call target for a root anchor (a standalone type hash).
pub const ROOT_ANCHOR_TARGET: &str = "mtype.anchor";

/// Call target for a linked anchor (a hash referencing a parent).
pub const LINKED_ANCHOR_TARGET: &str = "mark.anchor";

/// Build a root anchor operation for a content hash.
pub fn root_anchor(hash: &ContentHash) -> Operation {
    Operation::new(ROOT_ANCHOR_TARGET, vec![CallArg::Hash(hash.clone())])
}

/// Build a linked anchor operation: a content hash referencing its parent.
///
/// The third argument is a metadata slot reserved by the call shape; it is
/// always empty today.
pub fn linked_anchor(hash: &ContentHash, parent: &ContentHash) -> Operation {
    Operation::new(
        LINKED_ANCHOR_TARGET,
        vec![
            CallArg::Hash(hash.clone()),
            CallArg::Hash(parent.clone()),
            CallArg::Empty,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use moor_crypto::ContentHasher;
    use moor_types::HashWidth;

    fn hash(payload: &[u8]) -> ContentHash {
        ContentHasher::hash(payload, HashWidth::W256)
    }

    #[test]
    fn root_anchor_carries_only_the_hash() {
        let h = hash(b"{ name, company }1600000000000");
        let op = root_anchor(&h);
        assert_eq!(op.target, ROOT_ANCHOR_TARGET);
        assert_eq!(op.args, vec![CallArg::Hash(h)]);
    }

    #[test]
    fn linked_anchor_references_parent_and_reserves_metadata() {
        let parent = hash(b"root");
        let item = hash(b"https://example.org/1600000000000/0");
        let op = linked_anchor(&item, &parent);
        assert_eq!(op.target, LINKED_ANCHOR_TARGET);
        assert_eq!(op.args.len(), 3);
        assert_eq!(op.args[0], CallArg::Hash(item));
        assert_eq!(op.args[1], CallArg::Hash(parent));
        assert_eq!(op.args[2], CallArg::Empty);
    }

    #[test]
    fn construction_is_pure() {
        let h = hash(b"same");
        assert_eq!(root_anchor(&h), root_anchor(&h));
    }
}
