use sovran_polyset::{natural_by_ord, type_list, PolySet, PtrUnion, UnionError};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

type Mixed = type_list![f64, i32];

#[test]
fn test_insert_find_erase() -> Result<(), UnionError> {
    init_logging();
    let mut ps = PolySet::<Mixed>::new();
    assert!(ps.is_empty());

    {
        let (handle, fresh) = ps.insert(1.5);
        assert!(fresh);
        assert_eq!(*handle.downcast::<f64, _>()?, 1.5);
    }
    assert_eq!(ps.len(), 1);
    assert_eq!(ps.len(), ps.len_of::<f64, _>() + ps.len_of::<i32, _>());

    let first_int = {
        let (handle, fresh) = ps.insert(1i32);
        assert!(fresh);
        assert_eq!(*handle.downcast::<i32, _>()?, 1);
        (handle.id(), handle.as_void())
    };
    assert_eq!(ps.len(), 2);

    {
        let (handle, fresh) = ps.insert(1i32);
        assert!(!fresh);
        assert_eq!(handle.id(), PtrUnion::<Mixed>::id_of::<i32, _>());
        assert_eq!((handle.id(), handle.as_void()), first_int);
        assert_eq!(*handle.downcast::<i32, _>()?, 1);
    }
    assert_eq!(ps.len(), 2);
    assert_eq!(ps.len(), ps.len_of::<f64, _>() + ps.len_of::<i32, _>());

    {
        let found = ps.find(&1i32);
        assert!(found.is::<i32, _>());
        assert_eq!((found.id(), found.as_void()), first_int);
        assert_eq!(found.try_as::<i32, _>(), Some(&1));
    }

    assert!(ps.erase(&1i32));
    let missing = ps.find(&1i32);
    assert_eq!(missing, PtrUnion::null());
    assert_eq!(missing.id(), 0);
    assert!(missing.try_as::<i32, _>().is_none());

    assert_eq!(ps.len(), 1);
    assert!(!ps.is_empty());
    Ok(())
}

#[test]
fn test_find_never_crosses_stores() {
    init_logging();
    let mut ps = PolySet::<type_list![i32, i64]>::new();
    ps.insert(5i64);

    assert!(ps.find(&5i32).is_null());
    assert!(ps.find(&5i64).is::<i64, _>());
    assert!(!ps.erase(&5i32));
    assert_eq!(ps.len(), 1);
}

#[test]
fn test_not_found_is_uniform() {
    let ps = PolySet::<Mixed>::new();
    assert_eq!(ps.find(&2.0), ps.find(&2i32));
    assert_eq!(ps.find(&2.0).id(), 0);
}

#[test]
fn test_empty_and_clear() {
    init_logging();
    let mut ps = PolySet::<Mixed>::new();
    ps.insert(1i32);
    assert!(!ps.is_empty());
    ps.erase(&1i32);
    assert!(ps.is_empty());

    ps.insert(0.25);
    assert!(!ps.is_empty());
    ps.insert(3i32);
    assert_eq!(ps.len(), 2);

    ps.clear();
    assert!(ps.is_empty());
    assert_eq!(ps.len(), 0);
    assert_eq!(ps.len_of::<f64, _>(), 0);
    assert_eq!(ps.len_of::<i32, _>(), 0);
}

#[test]
fn test_erase_missing_is_noop() {
    let mut ps = PolySet::<Mixed>::new();
    ps.insert(2i32);
    assert!(!ps.erase(&3i32));
    assert!(!ps.erase(&2.0));
    assert_eq!(ps.len(), 1);
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct User {
    name: String,
}

natural_by_ord!(User);

#[test]
fn test_user_types_and_owned_copies() {
    init_logging();
    let mut ps = PolySet::<type_list![User, String, Vec<u8>]>::new();

    let alice = User {
        name: "alice".to_string(),
    };
    ps.insert(alice.clone());
    ps.insert("alice".to_string());
    ps.insert(vec![1u8, 2, 3]);
    assert_eq!(ps.len(), 3);

    let found = ps.find(&alice);
    let stored = found.try_as::<User, _>().expect("user was inserted");
    assert_eq!(stored, &alice);
    assert_ne!(stored as *const User, &alice as *const User);

    assert_eq!(ps.take(&alice), Some(alice));
    assert_eq!(ps.len(), 2);
    assert!(ps.contains(&vec![1u8, 2, 3]));
}

#[test]
fn test_handles_cover_every_store() {
    let mut ps = PolySet::<Mixed>::new();
    ps.extend(vec![3i32, 1, 2]);
    ps.extend(vec![0.5, -1.0]);

    let handles = ps.handles();
    assert_eq!(handles.len(), ps.len());

    let doubles: Vec<f64> = handles
        .iter()
        .filter_map(|h| h.try_as::<f64, _>().copied())
        .collect();
    let ints: Vec<i32> = handles
        .iter()
        .filter_map(|h| h.try_as::<i32, _>().copied())
        .collect();
    assert_eq!(doubles, vec![-1.0, 0.5]);
    assert_eq!(ints, vec![1, 2, 3]);
}
