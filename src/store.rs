use std::cmp::Ordering;
use std::slice::Iter;

/// The natural total order of a set element.
///
/// A [`PolySet`](crate::PolySet) keeps at most one element per equivalence
/// class of `natural_cmp`. Types that already implement [`Ord`] can opt in
/// with [`natural_by_ord!`](crate::natural_by_ord); floats use `total_cmp`,
/// so `NaN` is storable and `-0.0` is distinct from `0.0`.
pub trait Natural {
    fn natural_cmp(&self, other: &Self) -> Ordering;
}

/// Implements [`Natural`] for types whose natural order is their [`Ord`] impl.
///
/// ```
/// use sovran_polyset::{natural_by_ord, Natural};
/// use std::cmp::Ordering;
///
/// #[derive(PartialEq, Eq, PartialOrd, Ord)]
/// struct Version(u32, u32);
///
/// natural_by_ord!(Version);
///
/// assert_eq!(Version(1, 2).natural_cmp(&Version(1, 10)), Ordering::Less);
/// ```
#[macro_export]
macro_rules! natural_by_ord {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::Natural for $t {
                fn natural_cmp(&self, other: &Self) -> ::std::cmp::Ordering {
                    ::std::cmp::Ord::cmp(self, other)
                }
            }
        )*
    };
}

natural_by_ord!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char, (), String,
    &'static str,
);

macro_rules! natural_by_total_cmp {
    ($($t:ty),*) => {
        $(
            impl Natural for $t {
                fn natural_cmp(&self, other: &Self) -> Ordering {
                    self.total_cmp(other)
                }
            }
        )*
    };
}

natural_by_total_cmp!(f32, f64);

impl<T: Natural> Natural for Option<T> {
    fn natural_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.natural_cmp(b),
        }
    }
}

impl<T: Natural + ?Sized> Natural for Box<T> {
    fn natural_cmp(&self, other: &Self) -> Ordering {
        (**self).natural_cmp(&**other)
    }
}

impl<T: Natural> Natural for Vec<T> {
    fn natural_cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.iter().zip(other.iter()) {
            match a.natural_cmp(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.len().cmp(&other.len())
    }
}

macro_rules! impl_natural_tuple {
    ($($t:ident $idx:tt),+) => {
        impl<$($t: Natural),+> Natural for ($($t,)+) {
            fn natural_cmp(&self, other: &Self) -> Ordering {
                Ordering::Equal
                    $(.then_with(|| self.$idx.natural_cmp(&other.$idx)))+
            }
        }
    };
}

impl_natural_tuple!(A 0);
impl_natural_tuple!(A 0, B 1);
impl_natural_tuple!(A 0, B 1, C 2);
impl_natural_tuple!(A 0, B 1, C 2, D 3);

/// A uniqueness store for one element type, kept sorted by [`Natural`] order.
///
/// Insertion and removal shift elements, so addresses of stored values are
/// only stable while the store is not mutated; the borrow checker enforces
/// this for handles taken out of a [`PolySet`](crate::PolySet).
#[derive(Debug, Clone)]
pub struct SortedStore<T> {
    items: Vec<T>,
}

impl<T> Default for SortedStore<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Natural> SortedStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, value: &T) -> Result<usize, usize> {
        self.items.binary_search_by(|probe| probe.natural_cmp(value))
    }

    /// Inserts `value` unless an equal element is already stored.
    ///
    /// Returns the stored element and whether it was freshly inserted.
    pub fn insert(&mut self, value: T) -> (&T, bool) {
        match self.position(&value) {
            Ok(idx) => (&self.items[idx], false),
            Err(idx) => {
                self.items.insert(idx, value);
                (&self.items[idx], true)
            }
        }
    }

    pub fn get(&self, value: &T) -> Option<&T> {
        self.position(value).ok().map(|idx| &self.items[idx])
    }

    pub fn contains(&self, value: &T) -> bool {
        self.position(value).is_ok()
    }

    pub fn remove(&mut self, value: &T) -> Option<T> {
        match self.position(value) {
            Ok(idx) => Some(self.items.remove(idx)),
            Err(_) => None,
        }
    }
}

impl<T> SortedStore<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterates stored elements in natural order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a SortedStore<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_one_per_value() {
        let mut store = SortedStore::<i32>::new();
        assert_eq!(store.insert(3), (&3, true));
        assert_eq!(store.insert(1), (&1, true));
        assert_eq!(store.insert(3), (&3, false));
        assert_eq!(store.len(), 2);
        assert_eq!(store.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_get_and_remove() {
        let mut store = SortedStore::new();
        store.insert("b".to_string());
        store.insert("a".to_string());

        assert_eq!(store.get(&"a".to_string()).map(String::as_str), Some("a"));
        assert!(store.contains(&"b".to_string()));
        assert_eq!(store.remove(&"a".to_string()), Some("a".to_string()));
        assert_eq!(store.remove(&"a".to_string()), None);
        assert_eq!(store.get(&"a".to_string()), None);
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_floats_use_total_order() {
        let mut store = SortedStore::<f64>::new();
        assert!(store.insert(f64::NAN).1);
        assert!(!store.insert(f64::NAN).1);
        assert!(store.insert(0.0).1);
        assert!(store.insert(-0.0).1);
        assert!(store.insert(1.5).1);
        assert_eq!(store.len(), 4);
        assert!(store.contains(&1.5));
        assert!(store.iter().last().map_or(false, |v| v.is_nan()));
    }

    #[test]
    fn test_compound_orders() {
        assert_eq!(None::<u8>.natural_cmp(&Some(0)), Ordering::Less);
        assert_eq!(vec![1i32, 2].natural_cmp(&vec![1, 2, 0]), Ordering::Less);
        assert_eq!(vec![2i32].natural_cmp(&vec![1, 9]), Ordering::Greater);
        assert_eq!((1u8, 2.0f64).natural_cmp(&(1, 2.0)), Ordering::Equal);
        assert_eq!((1u8, "b", 'c').natural_cmp(&(1, "a", 'z')), Ordering::Greater);
        assert_eq!(Box::new(4u32).natural_cmp(&Box::new(5u32)), Ordering::Less);
    }
}
