use crate::list::{sealed, Cons, Here, Member, Nil, Position, There, TypeList};
use crate::ptr_union::PtrUnion;
use crate::store::{Natural, SortedStore};
use log::trace;
use std::any::type_name;
use std::slice::Iter;

/// One link of a [`PolySet`]'s store chain: the store for `H`, then the rest.
#[derive(Debug, Clone)]
pub struct Link<H, Tail> {
    store: SortedStore<H>,
    rest: Tail,
}

impl<H, Tail: Default> Default for Link<H, Tail> {
    fn default() -> Self {
        Self {
            store: SortedStore::default(),
            rest: Tail::default(),
        }
    }
}

/// The end of a store chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct End;

impl sealed::Sealed for End {}
impl<H, Tail> sealed::Sealed for Link<H, Tail> {}

/// Operations that fold over every store of a [`PolySet`].
pub trait StoreChain: sealed::Sealed + Default {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool;

    fn clear(&mut self);

    #[doc(hidden)]
    fn collect_handles<'a, L: TypeList>(&'a self, tag: u8, out: &mut Vec<PtrUnion<'a, L>>);
}

impl StoreChain for End {
    fn len(&self) -> usize {
        0
    }

    fn is_empty(&self) -> bool {
        true
    }

    fn clear(&mut self) {}

    fn collect_handles<'a, L: TypeList>(&'a self, _tag: u8, _out: &mut Vec<PtrUnion<'a, L>>) {}
}

impl<H, Tail: StoreChain> StoreChain for Link<H, Tail> {
    fn len(&self) -> usize {
        self.store.len() + self.rest.len()
    }

    fn is_empty(&self) -> bool {
        self.store.is_empty() && self.rest.is_empty()
    }

    fn clear(&mut self) {
        self.store.clear();
        self.rest.clear();
    }

    fn collect_handles<'a, L: TypeList>(&'a self, tag: u8, out: &mut Vec<PtrUnion<'a, L>>) {
        out.extend(
            self.store
                .iter()
                .map(|item| PtrUnion::with_tag(item as *const H as *const (), tag)),
        );
        self.rest.collect_handles(tag.wrapping_add(1), out);
    }
}

/// A type list whose every element can live in a [`PolySet`].
pub trait SetList: TypeList {
    /// One [`SortedStore`] per listed type, in list order.
    type Stores: StoreChain;
}

impl SetList for Nil {
    type Stores = End;
}

impl<H: Natural + 'static, T: SetList> SetList for Cons<H, T> {
    type Stores = Link<H, T::Stores>;
}

/// Routes a `T` to its store inside a list's store chain.
///
/// The index `I` is the same witness [`Member`] uses, so the store an
/// operation touches and the tag on the handle it returns always agree.
pub trait Route<T, I>: SetList + Member<T, I> {
    fn store(stores: &Self::Stores) -> &SortedStore<T>;

    fn store_mut(stores: &mut Self::Stores) -> &mut SortedStore<T>;
}

impl<T: Natural + 'static, Tail: SetList> Route<T, Here> for Cons<T, Tail> {
    fn store(stores: &Self::Stores) -> &SortedStore<T> {
        &stores.store
    }

    fn store_mut(stores: &mut Self::Stores) -> &mut SortedStore<T> {
        &mut stores.store
    }
}

impl<H, Tail, T, I> Route<T, There<I>> for Cons<H, Tail>
where
    H: Natural + 'static,
    Tail: Route<T, I>,
    I: Position,
{
    fn store(stores: &Self::Stores) -> &SortedStore<T> {
        Tail::store(&stores.rest)
    }

    fn store_mut(stores: &mut Self::Stores) -> &mut SortedStore<T> {
        Tail::store_mut(&mut stores.rest)
    }
}

/// A set of values drawn from a closed list of types, one store per type.
///
/// Every operation is routed at compile time to the store of its argument's
/// type. Results come back as [`PtrUnion`] handles over the same list, so a
/// lookup reads the same whichever store answered it, and "not found" is the
/// untyped null handle for every type.
///
/// Handles borrow the set: they cannot outlive it, and the set cannot be
/// modified while one is alive.
///
/// # Examples
///
/// ```
/// use sovran_polyset::{type_list, PolySet};
///
/// let mut set = PolySet::<type_list![f64, i32]>::new();
///
/// let (handle, fresh) = set.insert(1.5);
/// assert!(fresh);
/// assert_eq!(handle.try_as::<f64, _>(), Some(&1.5));
///
/// set.insert(1i32);
/// assert!(!set.insert(1i32).1);
/// assert_eq!(set.len(), 2);
///
/// assert!(set.find(&1i32).is::<i32, _>());
/// set.erase(&1i32);
/// assert!(set.find(&1i32).is_null());
/// ```
///
/// Types outside the list are rejected when the program is built:
///
/// ```compile_fail
/// use sovran_polyset::{type_list, PolySet};
///
/// let mut set = PolySet::<type_list![f64, i32]>::new();
/// set.insert(String::from("not listed"));
/// ```
pub struct PolySet<L: SetList> {
    stores: L::Stores,
}

impl<L: SetList> PolySet<L> {
    /// Creates a new, empty PolySet with an empty store for every listed type.
    pub fn new() -> Self {
        let _len = L::LEN;
        Self {
            stores: L::Stores::default(),
        }
    }

    /// Inserts `value` into the store for `T` unless an equal value is there.
    ///
    /// Returns a handle to the stored element (the new one, or the one that
    /// was already present) and `true` if the value was freshly inserted.
    pub fn insert<T, I>(&mut self, value: T) -> (PtrUnion<'_, L>, bool)
    where
        L: Route<T, I>,
        T: Natural + 'static,
    {
        let (stored, fresh) = L::store_mut(&mut self.stores).insert(value);
        trace!(
            "polyset insert {} (tag {}): fresh={}",
            type_name::<T>(),
            <L as Member<T, I>>::TAG,
            fresh
        );
        (PtrUnion::new::<T, I>(stored), fresh)
    }

    /// Inserts every value from `values`, returning how many were new.
    pub fn extend<T, I, V>(&mut self, values: V) -> usize
    where
        L: Route<T, I>,
        T: Natural + 'static,
        V: IntoIterator<Item = T>,
    {
        let mut fresh = 0;
        for value in values {
            if self.insert::<T, I>(value).1 {
                fresh += 1;
            }
        }
        fresh
    }

    /// Looks `value` up in the store for `T` only.
    ///
    /// Returns a handle to the stored element, or the untyped null handle if
    /// no equal value is stored. Looking up an unlisted type fails to build:
    ///
    /// ```compile_fail
    /// use sovran_polyset::{type_list, PolySet};
    ///
    /// let set = PolySet::<type_list![f64, i32]>::new();
    /// set.find(&String::from("not listed"));
    /// ```
    pub fn find<T, I>(&self, value: &T) -> PtrUnion<'_, L>
    where
        L: Route<T, I>,
        T: Natural + 'static,
    {
        match L::store(&self.stores).get(value) {
            Some(stored) => PtrUnion::new::<T, I>(stored),
            None => PtrUnion::null(),
        }
    }

    /// Returns `true` if an equal value is stored.
    pub fn contains<T, I>(&self, value: &T) -> bool
    where
        L: Route<T, I>,
        T: Natural + 'static,
    {
        L::store(&self.stores).contains(value)
    }

    /// Removes `value` from the store for `T`.
    ///
    /// Returns `true` if an element was removed, `false` if it was absent.
    ///
    /// ```compile_fail
    /// use sovran_polyset::{type_list, PolySet};
    ///
    /// let mut set = PolySet::<type_list![f64, i32]>::new();
    /// set.erase(&String::from("not listed"));
    /// ```
    pub fn erase<T, I>(&mut self, value: &T) -> bool
    where
        L: Route<T, I>,
        T: Natural + 'static,
    {
        self.take::<T, I>(value).is_some()
    }

    /// Removes `value` from the store for `T` and hands the stored element back.
    pub fn take<T, I>(&mut self, value: &T) -> Option<T>
    where
        L: Route<T, I>,
        T: Natural + 'static,
    {
        let taken = L::store_mut(&mut self.stores).remove(value);
        trace!(
            "polyset take {} (tag {}): removed={}",
            type_name::<T>(),
            <L as Member<T, I>>::TAG,
            taken.is_some()
        );
        taken
    }

    /// Number of elements stored for `T`.
    pub fn len_of<T, I>(&self) -> usize
    where
        L: Route<T, I>,
        T: Natural + 'static,
    {
        L::store(&self.stores).len()
    }

    /// Iterates the elements stored for `T` in natural order.
    pub fn iter<T, I>(&self) -> Iter<'_, T>
    where
        L: Route<T, I>,
        T: Natural + 'static,
    {
        L::store(&self.stores).iter()
    }

    /// Handles to every stored element, ordered by tag, then by natural order
    /// within each type.
    pub fn handles(&self) -> Vec<PtrUnion<'_, L>> {
        let mut out = Vec::with_capacity(self.len());
        self.stores.collect_handles(1, &mut out);
        out
    }

    /// Total number of elements across all stores.
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Returns `true` if every store is empty.
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Empties every store.
    pub fn clear(&mut self) {
        trace!("polyset clear: dropping {} elements", self.len());
        self.stores.clear();
    }
}

impl<L: SetList> Default for PolySet<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: SetList> Clone for PolySet<L>
where
    L::Stores: Clone,
{
    fn clone(&self) -> Self {
        Self {
            stores: self.stores.clone(),
        }
    }
}
