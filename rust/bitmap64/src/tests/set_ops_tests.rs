use std::collections::BTreeSet;

use crate::{Bitmap64, ErrorKind, TaskPool, TaskPoolConfig};

use super::test_util::{FaultyBitmap, assert_same_values, clustered_values, pool};

const MAX: u64 = i64::MAX as u64;

#[test]
fn test_and_scenario() {
    let pool = pool();
    let mut a = Bitmap64::from_values([
        1_000_000_000_000,
        2_000_000_000_000_000,
        MAX,
        123_456_789_000,
    ]);
    let b = Bitmap64::from_values([1_000_000_000_000, MAX - 100]);

    a.and(&b, &pool).unwrap();
    assert_eq!(a, Bitmap64::from_values([1_000_000_000_000]));
    assert_eq!(a.cardinality(), 1);
    a.check_invariants();
    // MAX and MAX - 100 share a bucket, which must be dropped once it is empty.
    assert_eq!(a.bucket_count(), 1);
}

#[test]
fn test_or_scenario() {
    let pool = pool();
    let mut a = Bitmap64::from_values([1_000_000_000_000, 1, MAX, 123_456_789_000]);
    let b = Bitmap64::from_values([1_000_000_000_000, MAX - 100]);

    a.or(&b, &pool).unwrap();
    assert_eq!(
        a.to_vec(),
        vec![1, 123_456_789_000, 1_000_000_000_000, MAX - 100, MAX]
    );
    assert_eq!(a.cardinality(), 5);
    a.check_invariants();
}

#[test]
fn test_and_not_scenario() {
    let pool = pool();
    let mut a = Bitmap64::from_values([
        1_000_000_000_000,
        2_000_000_000_000_000,
        MAX,
        123_456_789_000,
    ]);
    let b = Bitmap64::from_values([1_000_000_000_000, MAX - 100]);

    a.and_not(&b, &pool).unwrap();
    assert_eq!(a.to_vec(), vec![123_456_789_000, 2_000_000_000_000_000, MAX]);
    assert_eq!(a.cardinality(), 3);
    a.check_invariants();
}

#[test]
fn test_operand_is_not_modified() {
    let pool = pool();
    let b = Bitmap64::from_values(clustered_values(1, 3000, 12));
    let snapshot = b.clone();

    let mut a = Bitmap64::from_values(clustered_values(2, 3000, 12));
    a.and(&b, &pool).unwrap();
    let mut a = Bitmap64::from_values(clustered_values(3, 3000, 12));
    a.or(&b, &pool).unwrap();
    let mut a = Bitmap64::from_values(clustered_values(4, 3000, 12));
    a.and_not(&b, &pool).unwrap();

    assert_eq!(b, snapshot);
}

#[test]
fn test_random_set_algebra_matches_model() {
    let pool = pool();
    for seed in 0..8u64 {
        let left = clustered_values(seed * 2 + 100, 4000, 24);
        let right = clustered_values(seed * 2 + 101, 4000, 24);
        let left_model = left.iter().copied().collect::<BTreeSet<_>>();
        let right_model = right.iter().copied().collect::<BTreeSet<_>>();
        let a = Bitmap64::from_values(left);
        let b = Bitmap64::from_values(right);

        let mut and = a.clone();
        and.and(&b, &pool).unwrap();
        assert_same_values(
            &and,
            &left_model.intersection(&right_model).copied().collect(),
        );

        let mut or = a.clone();
        or.or(&b, &pool).unwrap();
        assert_same_values(&or, &left_model.union(&right_model).copied().collect());

        let mut and_not = a.clone();
        and_not.and_not(&b, &pool).unwrap();
        assert_same_values(
            &and_not,
            &left_model.difference(&right_model).copied().collect(),
        );
    }
}

#[test]
fn test_disjoint_buckets() {
    let pool = pool();
    let a = Bitmap64::from_values((0..100u64).map(|i| i << 32));
    let b = Bitmap64::from_values((100..200u64).map(|i| i << 32));

    let mut and = a.clone();
    and.and(&b, &pool).unwrap();
    assert!(and.is_empty());
    and.check_invariants();

    let mut or = a.clone();
    or.or(&b, &pool).unwrap();
    assert_eq!(or.bucket_count(), 200);
    assert_eq!(or.to_vec(), (0..200u64).map(|i| i << 32).collect::<Vec<_>>());

    let mut and_not = a.clone();
    and_not.and_not(&b, &pool).unwrap();
    assert_eq!(and_not, a);
}

#[test]
fn test_shared_buckets_without_shared_members() {
    let pool = pool();
    let mut a = Bitmap64::from_values([(7 << 32) | 1, (7 << 32) | 3, 9]);
    let b = Bitmap64::from_values([(7 << 32) | 2, (7 << 32) | 4, 9]);
    a.and(&b, &pool).unwrap();
    assert_eq!(a.to_vec(), vec![9]);
    assert_eq!(a.bucket_count(), 1);
    a.check_invariants();
}

#[test]
fn test_and_not_empties_buckets() {
    let pool = pool();
    let mut a = Bitmap64::from_values([1 << 32, (1 << 32) + 1, 2 << 32, 5]);
    let b = Bitmap64::from_values([1 << 32, (1 << 32) + 1, 2 << 32, 6]);
    a.and_not(&b, &pool).unwrap();
    assert_eq!(a.to_vec(), vec![5]);
    assert_eq!(a.bucket_count(), 1);
    a.check_invariants();

    let mut c = b.clone();
    c.and_not(&b, &pool).unwrap();
    assert!(c.is_empty());
    c.check_invariants();
}

#[test]
fn test_self_operations() {
    let pool = pool();
    let a = Bitmap64::from_values(clustered_values(77, 5000, 32));

    let mut and = a.clone();
    and.and(&a, &pool).unwrap();
    assert_eq!(and, a);
    assert_eq!(and.cardinality(), a.cardinality());

    let mut or = a.clone();
    or.or(&a, &pool).unwrap();
    assert_eq!(or, a);

    let mut and_not = a.clone();
    and_not.and_not(&a, &pool).unwrap();
    assert!(and_not.is_empty());
}

#[test]
fn test_empty_operands() {
    let pool = pool();
    let empty = Bitmap64::new();
    let a = Bitmap64::from_values([1, 1 << 40]);

    let mut x = a.clone();
    x.and(&empty, &pool).unwrap();
    assert!(x.is_empty());

    let mut x = a.clone();
    x.or(&empty, &pool).unwrap();
    assert_eq!(x, a);

    let mut x = empty.clone();
    x.or(&a, &pool).unwrap();
    assert_eq!(x, a);

    let mut x = a.clone();
    x.and_not(&empty, &pool).unwrap();
    assert_eq!(x, a);

    let mut x = empty.clone();
    x.and_not(&a, &pool).unwrap();
    assert!(x.is_empty());
}

#[test]
fn test_non_mutating_forms() {
    let pool = pool();
    let a = Bitmap64::from_values([1, 2, 3, 1 << 33]);
    let b = Bitmap64::from_values([2, 3, 4, 1 << 34]);
    let (a_before, b_before) = (a.clone(), b.clone());

    assert_eq!(a.intersection(&b, &pool).unwrap().to_vec(), vec![2, 3]);
    assert_eq!(
        a.union(&b, &pool).unwrap().to_vec(),
        vec![1, 2, 3, 4, 1 << 33, 1 << 34]
    );
    assert_eq!(a.difference(&b, &pool).unwrap().to_vec(), vec![1, 1 << 33]);
    a.intersection(&b, &pool).unwrap().check_invariants();

    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

#[test]
fn test_and_not_does_not_leak_into_clones() {
    let pool = pool();
    let mut a = Bitmap64::from_values([1, 2, 3]);
    let earlier = a.clone();
    a.and_not(&Bitmap64::from_values([2]), &pool).unwrap();
    assert_eq!(a.to_vec(), vec![1, 3]);
    assert_eq!(earlier.to_vec(), vec![1, 2, 3]);
}

#[test]
fn test_sequential_pool() {
    let pool = TaskPool::new(TaskPoolConfig::with_threads(2).max_degree(1)).unwrap();
    let mut a = Bitmap64::from_values(clustered_values(8, 2000, 16));
    let b = Bitmap64::from_values(clustered_values(9, 2000, 16));
    let expected = a.intersection(&b, &pool).unwrap();
    a.and(&b, &TaskPool::with_threads(3).unwrap()).unwrap();
    assert_eq!(a, expected);
}

fn faulty_pair() -> (Bitmap64<FaultyBitmap>, Bitmap64<FaultyBitmap>) {
    let mut a: Bitmap64<FaultyBitmap> = (0..20u64).map(|high| (high << 32) | 1).collect();
    a.add((3 << 32) | FaultyBitmap::POISON as u64);
    let b: Bitmap64<FaultyBitmap> = (0..20u64).map(|high| (high << 32) | 2).collect();
    (a, b)
}

#[test]
fn test_failed_and_leaves_receiver_unchanged() {
    let pool = pool();
    let (mut a, b) = faulty_pair();
    let before = a.clone();
    let err = a.and(&b, &pool).unwrap_err();
    assert!(err.is_task_failure());
    assert!(matches!(
        err.kind(),
        ErrorKind::ConcurrentTaskFailure { operation, message, .. }
            if operation == "AND" && message == "poisoned bucket"
    ));
    assert_eq!(a, before);
    a.check_invariants();
}

#[test]
fn test_failed_or_leaves_receiver_unchanged() {
    let pool = pool();
    let (mut a, b) = faulty_pair();
    let before = a.clone();
    let err = a.or(&b, &pool).unwrap_err();
    assert!(err.is_task_failure());
    assert_eq!(a, before);
    a.check_invariants();
}

#[test]
fn test_failed_and_not_leaves_receiver_unchanged() {
    let pool = pool();
    let (mut a, b) = faulty_pair();
    let before = a.clone();
    let err = a.and_not(&b, &pool).unwrap_err();
    assert!(err.is_task_failure());
    assert_eq!(a, before);
    assert_eq!(a.cardinality(), 21);
    a.check_invariants();
}

#[test]
fn test_faulty_container_works_without_poison() {
    let pool = pool();
    let (_, b) = faulty_pair();
    let mut c: Bitmap64<FaultyBitmap> = (0..40u64).map(|high| (high << 32) | 2).collect();
    c.and_not(&b, &pool).unwrap();
    assert_eq!(c.bucket_count(), 20);
    assert_eq!(c.min(), Some((20 << 32) | 2));
    c.check_invariants();
}

#[test]
fn test_set_algebra_on_boundary_values() {
    let pool = pool();
    let left = [
        0u64,
        1,
        (1u64 << 32) - 1,
        1u64 << 32,
        (1u64 << 32) + 1,
        i64::MAX as u64,
        i64::MIN as u64,
        u64::MAX - 1,
        u64::MAX,
    ];
    let right = [
        0u64,
        (1u64 << 32) - 1,
        (1u64 << 32) + 1,
        (2u64 << 32) + 1,
        i64::MAX as u64 - 1,
        i64::MIN as u64,
        u64::MAX,
    ];
    let left_model = left.iter().copied().collect::<BTreeSet<_>>();
    let right_model = right.iter().copied().collect::<BTreeSet<_>>();
    let a = Bitmap64::from_values(left);
    let b = Bitmap64::from_values(right);

    let and = a.intersection(&b, &pool).unwrap();
    assert_same_values(
        &and,
        &left_model.intersection(&right_model).copied().collect(),
    );
    assert_eq!(
        and.to_vec(),
        vec![0, (1u64 << 32) - 1, (1u64 << 32) + 1, i64::MIN as u64, u64::MAX]
    );

    let or = a.union(&b, &pool).unwrap();
    assert_same_values(&or, &left_model.union(&right_model).copied().collect());
    assert_eq!(or.min(), Some(0));
    assert_eq!(or.max(), Some(u64::MAX));

    let and_not = a.difference(&b, &pool).unwrap();
    assert_same_values(
        &and_not,
        &left_model.difference(&right_model).copied().collect(),
    );
    assert_eq!(
        and_not.to_vec(),
        vec![1, 1u64 << 32, i64::MAX as u64, u64::MAX - 1]
    );

    let mut reversed = b.clone();
    reversed.and_not(&a, &pool).unwrap();
    assert_same_values(
        &reversed,
        &right_model.difference(&left_model).copied().collect(),
    );
}
