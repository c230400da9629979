//! KeyIndex Tests
//!
//! Tests verify:
//! - Basic set/get/delete
//! - Node retention on delete
//! - Lexicographic walk order
//! - Prefix lookup semantics (path existence, not liveness)
//! - Callback error propagation
//! - Compaction

use keylog::{ByteRange, KeyIndex, KeylogError};

// =============================================================================
// Helper Functions
// =============================================================================

fn r(offset: u64) -> ByteRange {
    ByteRange::new(offset, 10)
}

fn collect(index: &KeyIndex, prefix: &[u8]) -> Result<Vec<Vec<u8>>, KeylogError> {
    let mut keys = Vec::new();
    index.walk(prefix, |key, _| {
        keys.push(key.to_vec());
        Ok(())
    })?;
    Ok(keys)
}

fn index_with(keys: &[&[u8]]) -> KeyIndex {
    let mut index = KeyIndex::new();
    for (i, key) in keys.iter().enumerate() {
        index.set(key, r(i as u64 * 10));
    }
    index
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_index_is_empty() {
    let index = KeyIndex::new();
    assert!(index.is_empty());
    assert_eq!(index.len(), 0);
    assert_eq!(index.node_count(), 1);
}

#[test]
fn test_set_and_get() {
    let mut index = KeyIndex::new();
    index.set(b"key", r(0));

    assert_eq!(index.get(b"key"), Some(r(0)));
    assert_eq!(index.len(), 1);
}

#[test]
fn test_get_missing_key() {
    let index = index_with(&[b"abc"]);

    assert_eq!(index.get(b"abd"), None);
    assert_eq!(index.get(b"abcd"), None);
    // Interior node exists but holds no ref
    assert_eq!(index.get(b"ab"), None);
}

#[test]
fn test_set_overwrites() {
    let mut index = KeyIndex::new();
    index.set(b"key", r(0));
    index.set(b"key", r(50));

    assert_eq!(index.get(b"key"), Some(r(50)));
    assert_eq!(index.len(), 1);
}

#[test]
fn test_empty_key() {
    let mut index = KeyIndex::new();
    index.set(b"", r(7));

    assert_eq!(index.get(b""), Some(r(7)));
    assert_eq!(collect(&index, b"").unwrap(), vec![Vec::<u8>::new()]);
}

#[test]
fn test_delete_clears_ref() {
    let mut index = index_with(&[b"a", b"b"]);
    index.delete(b"a");

    assert_eq!(index.get(b"a"), None);
    assert_eq!(index.get(b"b"), Some(r(10)));
    assert_eq!(index.len(), 1);
}

#[test]
fn test_delete_missing_is_noop() {
    let mut index = index_with(&[b"abc"]);
    let nodes = index.node_count();

    index.delete(b"xyz");
    index.delete(b"ab");
    index.delete(b"abc");
    index.delete(b"abc");

    assert!(index.is_empty());
    assert_eq!(index.node_count(), nodes);
}

#[test]
fn test_delete_retains_nodes() {
    let mut index = index_with(&[b"abc"]);
    assert_eq!(index.node_count(), 4);

    index.delete(b"abc");

    assert_eq!(index.node_count(), 4);
    // The path still exists, so walking it succeeds with nothing to visit
    assert_eq!(collect(&index, b"ab").unwrap(), Vec::<Vec<u8>>::new());
}

#[test]
fn test_shared_prefixes_share_nodes() {
    let index = index_with(&[b"abc", b"abd", b"ab"]);
    // root + a + b + c + d
    assert_eq!(index.node_count(), 5);
}

// =============================================================================
// Walk Tests
// =============================================================================

#[test]
fn test_walk_is_lexicographic() {
    let index = index_with(&[b"b", b"a", b"ab", b"", b"ba", b"aa", b"\xff", b"\x00"]);

    let keys = collect(&index, b"").unwrap();
    let expected: Vec<Vec<u8>> = vec![
        b"".to_vec(),
        b"\x00".to_vec(),
        b"a".to_vec(),
        b"aa".to_vec(),
        b"ab".to_vec(),
        b"b".to_vec(),
        b"ba".to_vec(),
        b"\xff".to_vec(),
    ];
    assert_eq!(keys, expected);
}

#[test]
fn test_walk_order_for_many_keys() {
    let mut index = KeyIndex::new();
    // Insert in a scrambled order
    for i in 0..500u64 {
        let n = (i * 7919) % 500;
        index.set(format!("key{}", n).as_bytes(), r(n));
    }

    let keys = collect(&index, b"").unwrap();
    assert_eq!(keys.len(), 500);
    for pair in keys.windows(2) {
        assert!(pair[0] < pair[1], "{:?} !< {:?}", pair[0], pair[1]);
    }
}

#[test]
fn test_walk_passes_ranges() {
    let index = index_with(&[b"x", b"y"]);
    let mut seen = Vec::new();
    index
        .walk(b"", |key, range| {
            seen.push((key.to_vec(), range));
            Ok(())
        })
        .unwrap();

    assert_eq!(seen, vec![(b"x".to_vec(), r(0)), (b"y".to_vec(), r(10))]);
}

#[test]
fn test_walk_prefix_only_yields_matching_keys() {
    let index = index_with(&[b"user:1", b"user:2", b"users", b"usr", b"admin"]);

    let keys = collect(&index, b"user:").unwrap();
    assert_eq!(keys, vec![b"user:1".to_vec(), b"user:2".to_vec()]);

    let keys = collect(&index, b"user").unwrap();
    assert_eq!(
        keys,
        vec![b"user:1".to_vec(), b"user:2".to_vec(), b"users".to_vec()]
    );
}

#[test]
fn test_walk_includes_prefix_itself() {
    let index = index_with(&[b"ab", b"abc"]);
    let keys = collect(&index, b"ab").unwrap();
    assert_eq!(keys, vec![b"ab".to_vec(), b"abc".to_vec()]);
}

#[test]
fn test_walk_prefix_not_found() {
    let index = index_with(&[b"abc"]);

    let result = collect(&index, b"abd");
    assert!(matches!(
        result,
        Err(KeylogError::PrefixNotFound { ref prefix }) if prefix == b"abd"
    ));

    let result = collect(&index, b"abcd");
    assert!(matches!(result, Err(KeylogError::PrefixNotFound { .. })));
}

#[test]
fn test_walk_empty_prefix_on_empty_index() {
    let index = KeyIndex::new();
    assert_eq!(collect(&index, b"").unwrap(), Vec::<Vec<u8>>::new());
}

#[test]
fn test_walk_stops_on_callback_error() {
    let index = index_with(&[b"a", b"b", b"c", b"d"]);
    let mut visited = Vec::new();

    let result = index.walk(b"", |key, _| {
        visited.push(key.to_vec());
        if key == b"b" {
            return Err(KeylogError::callback("stop here"));
        }
        Ok(())
    });

    assert!(matches!(result, Err(KeylogError::Callback(_))));
    assert_eq!(visited, vec![b"a".to_vec(), b"b".to_vec()]);
}

#[test]
fn test_walk_count_matches_len() {
    let mut index = index_with(&[b"a", b"ab", b"abc", b"b"]);
    index.delete(b"ab");
    index.set(b"c", r(99));

    assert_eq!(collect(&index, b"").unwrap().len(), index.len());
    assert_eq!(index.len(), 4);
}

// =============================================================================
// Compaction Tests
// =============================================================================

#[test]
fn test_compacted_drops_dead_paths() {
    let mut index = index_with(&[b"keep", b"drop-me"]);
    index.delete(b"drop-me");
    let before = index.node_count();

    let compacted = index.compacted();

    assert!(compacted.node_count() < before);
    assert_eq!(compacted.node_count(), 5); // root + k + e + e + p
    assert_eq!(compacted.get(b"keep"), index.get(b"keep"));
    assert_eq!(compacted.len(), 1);
    assert!(matches!(
        collect(&compacted, b"drop"),
        Err(KeylogError::PrefixNotFound { .. })
    ));
}

#[test]
fn test_compacted_preserves_entries() {
    let mut index = KeyIndex::new();
    for i in 0..100u64 {
        index.set(format!("{:03}", i).as_bytes(), r(i));
    }
    for i in (0..100u64).step_by(3) {
        index.delete(format!("{:03}", i).as_bytes());
    }

    let compacted = index.compacted();
    let mut original = Vec::new();
    index
        .walk(b"", |k, range| {
            original.push((k.to_vec(), range));
            Ok(())
        })
        .unwrap();
    let mut rebuilt = Vec::new();
    compacted
        .walk(b"", |k, range| {
            rebuilt.push((k.to_vec(), range));
            Ok(())
        })
        .unwrap();

    assert_eq!(original, rebuilt);
}

#[test]
fn test_compacted_keeps_empty_key() {
    let mut index = index_with(&[b"", b"x"]);
    index.delete(b"x");

    let compacted = index.compacted();
    assert_eq!(compacted.node_count(), 1);
    assert_eq!(compacted.get(b""), Some(r(0)));
    assert_eq!(collect(&compacted, b"").unwrap(), vec![b"".to_vec()]);
}

#[test]
fn test_compacted_empty_index() {
    let compacted = KeyIndex::new().compacted();
    assert!(compacted.is_empty());
    assert_eq!(compacted.node_count(), 1);
}

// =============================================================================
// Scale Tests
// =============================================================================

#[test]
fn test_arena_grows_past_u16_node_ids() {
    let mut index = KeyIndex::new();
    let tail = [b'z'; 250];

    for i in 0..300u16 {
        let mut key = i.to_be_bytes().to_vec();
        key.extend_from_slice(&tail);
        index.set(&key, r(u64::from(i)));
    }

    assert!(index.node_count() > usize::from(u16::MAX) + 1);
    assert_eq!(index.len(), 300);

    for i in [0u16, 150, 299] {
        let mut key = i.to_be_bytes().to_vec();
        key.extend_from_slice(&tail);
        assert_eq!(index.get(&key), Some(r(u64::from(i))));
    }

    let compacted = index.compacted();
    assert_eq!(compacted.len(), 300);
    assert_eq!(compacted.node_count(), index.node_count());
}
