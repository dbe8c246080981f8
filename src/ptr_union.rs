use crate::error::UnionError;
use crate::list::{Member, TypeList};
use std::any::type_name;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ptr;

/// A pointer to one of the types in the list `L`, together with a tag saying which.
///
/// `PtrUnion` is a non-owning `(address, tag)` pair: it never drops or frees
/// what it points at, and copying it is as cheap as copying a pointer and a
/// byte. The lifetime `'a` is the borrow the typed pointer was taken from, so
/// typed access hands back plain `&'a T` references.
///
/// Tag 0 means "untyped": a default or explicitly untyped pointer makes no
/// claim about what its address refers to. Tags `1..=N` name the listed types
/// in list order.
///
/// Only listed types can be stored. Anything else is a compile error:
///
/// ```compile_fail
/// use sovran_polyset::{type_list, PtrUnion};
///
/// let text = String::from("not listed");
/// let _ptr = PtrUnion::<type_list![i32, f64]>::new(&text);
/// ```
///
/// # Examples
///
/// ```
/// use sovran_polyset::{type_list, PtrUnion, Untyped, Void};
///
/// type Numbers = type_list![i32, f64];
///
/// let i = 2;
/// let d = 3.14;
///
/// let mut ptr = PtrUnion::<Numbers>::new(&i);
/// assert_eq!(ptr.try_as::<i32, _>(), Some(&2));
/// assert_eq!(ptr.try_as::<f64, _>(), None);
///
/// ptr.set(&d);
/// assert!(ptr.is::<f64, _>());
/// assert!(ptr.is::<Untyped, Void>());
/// assert_eq!(ptr.id(), PtrUnion::<Numbers>::id_of::<f64, _>());
/// ```
pub struct PtrUnion<'a, L: TypeList> {
    ptr: *const (),
    tag: u8,
    _marker: PhantomData<(&'a (), fn() -> L)>,
}

impl<'a, L: TypeList> PtrUnion<'a, L> {
    /// An untyped null pointer, tag 0.
    pub const fn null() -> Self {
        Self::with_tag(ptr::null(), 0)
    }

    /// Points at `value`, tagged with the tag `L` assigns to `T`.
    pub fn new<T, I>(value: &'a T) -> Self
    where
        L: Member<T, I>,
    {
        Self::with_tag(value as *const T as *const (), <L as Member<T, I>>::TAG)
    }

    /// Points at `ptr`, tagged with the tag `L` assigns to `T`.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or valid for reads of `T` for the whole of `'a`,
    /// since [`try_as`](Self::try_as) will hand it out as `&'a T`.
    pub unsafe fn from_raw<T, I>(ptr: *const T) -> Self
    where
        L: Member<T, I>,
    {
        Self::with_tag(ptr as *const (), <L as Member<T, I>>::TAG)
    }

    /// An untyped pointer to `ptr`. The tag is 0 no matter what `ptr` refers to.
    pub const fn from_void(ptr: *const ()) -> Self {
        Self::with_tag(ptr, 0)
    }

    pub(crate) const fn with_tag(ptr: *const (), tag: u8) -> Self {
        // Lists longer than a u8 tag can count fail to evaluate LEN
        let _len = L::LEN;
        Self {
            ptr,
            tag,
            _marker: PhantomData,
        }
    }

    /// Repoints at `value`, replacing both address and tag.
    ///
    /// Assigning a type the list does not name fails to build:
    ///
    /// ```compile_fail
    /// use sovran_polyset::{type_list, PtrUnion};
    ///
    /// let i = 2;
    /// let text = String::from("not listed");
    /// let mut ptr = PtrUnion::<type_list![i32, f64]>::new(&i);
    /// ptr.set(&text);
    /// ```
    pub fn set<T, I>(&mut self, value: &'a T)
    where
        L: Member<T, I>,
    {
        *self = Self::new::<T, I>(value);
    }

    /// Repoints at `ptr` and forgets the type.
    ///
    /// This is the only way to drop type identity from an existing pointer;
    /// the tag is reset to 0 even when `ptr` is the address already held.
    pub fn set_void(&mut self, ptr: *const ()) {
        *self = Self::from_void(ptr);
    }

    /// The current tag.
    pub const fn id(&self) -> u8 {
        self.tag
    }

    /// The tag `L` assigns to `T`, evaluated at compile time.
    ///
    /// Being a `const fn`, this can initialize `const` items and so be used as
    /// a `match` pattern against [`id`](Self::id):
    ///
    /// ```
    /// use sovran_polyset::{type_list, PtrUnion};
    ///
    /// type Shapes = type_list![u8, char];
    /// const BYTE: u8 = PtrUnion::<Shapes>::id_of::<u8, _>();
    /// const CHAR: u8 = PtrUnion::<Shapes>::id_of::<char, _>();
    ///
    /// let c = 'x';
    /// let ptr = PtrUnion::<Shapes>::new(&c);
    /// let kind = match ptr.id() {
    ///     BYTE => "byte",
    ///     CHAR => "char",
    ///     _ => "untyped",
    /// };
    /// assert_eq!(kind, "char");
    /// ```
    ///
    /// There is no constant for an unlisted type; use
    /// [`tag_of`](Self::tag_of) to get 0 instead:
    ///
    /// ```compile_fail
    /// use sovran_polyset::{type_list, PtrUnion};
    ///
    /// const TEXT: u8 = PtrUnion::<type_list![i32, f64]>::id_of::<String, _>();
    /// ```
    pub const fn id_of<T, I>() -> u8
    where
        L: Member<T, I>,
    {
        <L as Member<T, I>>::TAG
    }

    /// The tag `L` assigns to `T`, or 0 when `T` is not listed.
    pub fn tag_of<T: ?Sized + 'static>() -> u8 {
        L::tag_of::<T>()
    }

    /// The held address, whatever the tag.
    pub const fn as_void(&self) -> *const () {
        self.ptr
    }

    /// Returns `true` if the held address is null.
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Returns `true` if the pointer currently holds a `T`.
    ///
    /// `is::<Untyped, Void>()` is `true` for every pointer, since any pointer
    /// can be viewed as untyped.
    pub fn is<T, I>(&self) -> bool
    where
        L: Member<T, I>,
    {
        let tag = <L as Member<T, I>>::TAG;
        tag == 0 || self.tag == tag
    }

    fn holds<T, I>(&self) -> bool
    where
        L: Member<T, I>,
    {
        let tag = <L as Member<T, I>>::TAG;
        tag != 0 && self.tag == tag
    }

    /// The held address as a `*const T` if the pointer holds a `T`, null otherwise.
    pub fn try_as_ptr<T, I>(&self) -> *const T
    where
        L: Member<T, I>,
    {
        if self.holds::<T, I>() {
            self.ptr as *const T
        } else {
            ptr::null()
        }
    }

    /// A reference to the held `T`, or `None` if the pointer holds something
    /// else, is untyped, or is null.
    pub fn try_as<T, I>(&self) -> Option<&'a T>
    where
        L: Member<T, I>,
    {
        if self.holds::<T, I>() && !self.ptr.is_null() {
            // SAFETY: a non-zero tag is only ever paired with an address taken
            // from a `&'a T` of the matching type (or promised by `from_raw`).
            Some(unsafe { &*(self.ptr as *const T) })
        } else {
            None
        }
    }

    /// Like [`try_as`](Self::try_as), but says why the access failed.
    ///
    /// # Errors
    ///
    /// - Returns `UnionError::Untyped` if the pointer has tag 0
    /// - Returns `UnionError::Null` if the tag matches but the address is null
    /// - Returns `UnionError::TypeMismatch` if another listed type is held
    pub fn downcast<T, I>(&self) -> Result<&'a T, UnionError>
    where
        L: Member<T, I>,
    {
        if let Some(value) = self.try_as::<T, I>() {
            return Ok(value);
        }

        let expected = type_name::<T>();
        match self.type_name() {
            None => Err(UnionError::Untyped { expected }),
            Some(_) if self.holds::<T, I>() => Err(UnionError::Null { expected }),
            Some(found) => Err(UnionError::TypeMismatch { expected, found }),
        }
    }

    /// Name of the currently held type, `None` when untyped.
    pub fn type_name(&self) -> Option<&'static str> {
        L::type_name(self.tag)
    }
}

impl<L: TypeList> Clone for PtrUnion<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: TypeList> Copy for PtrUnion<'_, L> {}

impl<L: TypeList> Default for PtrUnion<'_, L> {
    fn default() -> Self {
        Self::null()
    }
}

impl<L: TypeList> PartialEq for PtrUnion<'_, L> {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.ptr == other.ptr
    }
}

impl<L: TypeList> Eq for PtrUnion<'_, L> {}

impl<L: TypeList> PartialOrd for PtrUnion<'_, L> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<L: TypeList> Ord for PtrUnion<'_, L> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tag
            .cmp(&other.tag)
            .then_with(|| self.ptr.cmp(&other.ptr))
    }
}

impl<L: TypeList> Hash for PtrUnion<'_, L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
        self.ptr.hash(state);
    }
}

impl<L: TypeList> fmt::Debug for PtrUnion<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PtrUnion")
            .field("tag", &self.tag)
            .field("type", &self.type_name().unwrap_or("void"))
            .field("ptr", &self.ptr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::{Untyped, Void};
    use crate::type_list;
    use std::collections::{BTreeSet, HashSet};

    /// Stands in for a second, distinct integer type in the list.
    #[derive(Debug, PartialEq)]
    struct Frozen(i32);

    type Numbers = type_list![i32, Frozen, f64];

    #[test]
    fn test_default_is_untyped_null() {
        let ptr = PtrUnion::<Numbers>::default();
        assert_eq!(ptr.id(), 0);
        assert!(ptr.is_null());
        assert!(ptr.as_void().is_null());
        assert!(ptr.is::<Untyped, Void>());
        assert!(!ptr.is::<i32, _>());
        assert_eq!(ptr.try_as::<i32, _>(), None);
        assert_eq!(ptr.type_name(), None);
    }

    #[test]
    fn test_migrates_between_types() {
        let i = 2;
        let ci = Frozen(5);
        let d = 3.14;

        let mut ptr = PtrUnion::<Numbers>::new(&i);
        assert_eq!(ptr.try_as::<i32, _>(), Some(&i));
        assert_eq!(ptr.try_as::<Frozen, _>(), None);
        assert_eq!(ptr.try_as::<f64, _>(), None);
        assert_eq!(ptr.as_void(), &i as *const i32 as *const ());
        assert_eq!(ptr.id(), PtrUnion::<Numbers>::id_of::<i32, _>());

        ptr.set(&ci);
        assert_eq!(ptr.try_as::<Frozen, _>(), Some(&ci));
        assert_eq!(ptr.try_as::<i32, _>(), None);
        assert!(ptr.is::<Frozen, _>());
        assert!(ptr.is::<Untyped, Void>());
        assert_eq!(ptr.id(), PtrUnion::<Numbers>::id_of::<Frozen, _>());

        ptr.set(&d);
        assert_eq!(ptr.try_as::<f64, _>(), Some(&d));
        assert!(!ptr.is::<i32, _>());
        assert!(!ptr.is::<Frozen, _>());
        assert!(ptr.is::<f64, _>());
        assert_eq!(ptr.id(), PtrUnion::<Numbers>::id_of::<f64, _>());
    }

    #[test]
    fn test_set_void_forgets_type_at_same_address() {
        let i = 7;
        let mut ptr = PtrUnion::<Numbers>::new(&i);
        let addr = ptr.as_void();

        ptr.set_void(addr);
        assert_eq!(ptr.id(), 0);
        assert_eq!(ptr.as_void(), addr);
        assert!(!ptr.is::<i32, _>());
        assert!(ptr.is::<Untyped, Void>());
        assert_eq!(ptr.try_as_ptr::<i32, _>(), std::ptr::null());
    }

    #[test]
    fn test_try_as_ptr() {
        let d = 1.5;
        let ptr = PtrUnion::<Numbers>::new(&d);
        assert_eq!(ptr.try_as_ptr::<f64, _>(), &d as *const f64);
        assert!(ptr.try_as_ptr::<i32, _>().is_null());
    }

    #[test]
    fn test_typed_null_from_raw() {
        let ptr = unsafe { PtrUnion::<Numbers>::from_raw::<f64, _>(std::ptr::null()) };
        assert!(ptr.is::<f64, _>());
        assert!(ptr.is_null());
        assert_eq!(ptr.try_as::<f64, _>(), None);
        assert_eq!(
            ptr.downcast::<f64, _>(),
            Err(UnionError::Null { expected: "f64" })
        );
    }

    #[test]
    fn test_downcast_errors() {
        let i = 1;
        let ptr = PtrUnion::<Numbers>::new(&i);
        assert_eq!(ptr.downcast::<i32, _>(), Ok(&1));
        assert_eq!(
            ptr.downcast::<f64, _>(),
            Err(UnionError::TypeMismatch {
                expected: "f64",
                found: "i32"
            })
        );
        assert_eq!(
            PtrUnion::<Numbers>::null().downcast::<i32, _>(),
            Err(UnionError::Untyped { expected: "i32" })
        );
    }

    #[test]
    fn test_ids_are_distinct() {
        let ids = [
            PtrUnion::<Numbers>::id_of::<i32, _>(),
            PtrUnion::<Numbers>::id_of::<Frozen, _>(),
            PtrUnion::<Numbers>::id_of::<f64, _>(),
            PtrUnion::<Numbers>::id_of::<Untyped, Void>(),
        ];
        let unique: HashSet<u8> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(PtrUnion::<Numbers>::tag_of::<String>(), 0);
        assert_eq!(
            PtrUnion::<Numbers>::tag_of::<String>(),
            PtrUnion::<Numbers>::id_of::<Untyped, Void>()
        );
    }

    #[test]
    fn test_equality_needs_tag_and_address() {
        let i = 3;
        let typed = PtrUnion::<Numbers>::new(&i);
        let untyped = PtrUnion::<Numbers>::from_void(typed.as_void());

        assert_eq!(typed, PtrUnion::<Numbers>::new(&i));
        assert_ne!(typed, untyped);
    }

    #[test]
    fn test_ordering_is_tag_major() {
        let values = [1.0, 2.0];
        let i = 0;

        let low_tag = PtrUnion::<Numbers>::new(&i);
        let high_a = PtrUnion::<Numbers>::new(&values[0]);
        let high_b = PtrUnion::<Numbers>::new(&values[1]);
        let void = PtrUnion::<Numbers>::from_void(high_b.as_void());

        assert!(void < low_tag);
        assert!(low_tag < high_a);
        assert!(high_a < high_b);

        let sorted: BTreeSet<_> = [high_b, void, high_a, low_tag].into_iter().collect();
        let order: Vec<u8> = sorted.iter().map(|p| p.id()).collect();
        assert_eq!(order, vec![0, 1, 3, 3]);
    }

    #[test]
    fn test_debug_names_type() {
        let d = 2.5;
        let rendered = format!("{:?}", PtrUnion::<Numbers>::new(&d));
        assert!(rendered.contains("f64"));
        let rendered = format!("{:?}", PtrUnion::<Numbers>::null());
        assert!(rendered.contains("void"));
    }
}
