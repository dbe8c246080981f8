use std::any::{type_name, TypeId};
use std::marker::PhantomData;

/// The empty type list.
///
/// `Nil` is the base case of every list and doubles as the untyped (void)
/// case: anything a list does not recognize falls through to it and gets tag 0.
pub enum Nil {}

/// A type list whose first element is `H` and whose remaining elements are `T`.
///
/// Lists are never instantiated; they only exist as type parameters. Use the
/// [`type_list!`](crate::type_list) macro rather than spelling out the nesting.
pub struct Cons<H, T>(PhantomData<(fn() -> H, T)>);

/// Marker for the untyped view every [`PtrUnion`](crate::PtrUnion) supports.
///
/// `Untyped` is a member of every list with tag 0, selected with the [`Void`]
/// index: `ptr.is::<Untyped, Void>()` is always `true`.
pub enum Untyped {}

/// Index witness: the type is the head of the current link.
pub enum Here {}

/// Index witness: the type lives somewhere in the tail, at index `I`.
pub struct There<I>(PhantomData<I>);

/// Index witness for the untyped (void) member of a list.
pub enum Void {}

pub(crate) mod sealed {
    pub trait Sealed {}

    pub trait Indexed<T, I> {}

    impl Sealed for super::Nil {}
    impl<H, T> Sealed for super::Cons<H, T> {}
    impl Sealed for super::Here {}
    impl<I> Sealed for super::There<I> {}
}

/// Index witnesses that point at a real link (everything except [`Void`]).
pub trait Position: sealed::Sealed {}

impl Position for Here {}
impl<I: Position> Position for There<I> {}

/// A closed, ordered list of distinct types.
///
/// Implemented by [`Nil`] and [`Cons`] only. Duplicate types make lookups
/// ambiguous and are rejected wherever the duplicate is used.
pub trait TypeList: sealed::Sealed + 'static {
    /// Number of types in the list.
    const LEN: u8;

    #[doc(hidden)]
    fn tag_from(id: TypeId, next: u8) -> u8;

    #[doc(hidden)]
    fn name_from(tag: u8, next: u8) -> Option<&'static str>;

    /// The tag `T` would receive in this list, or 0 if `T` is not listed.
    ///
    /// Unlike [`Member::TAG`] this accepts any type, which makes it usable for
    /// probing. It walks the list comparing `TypeId`s, so it is a plain
    /// function rather than a constant.
    fn tag_of<T: ?Sized + 'static>() -> u8 {
        Self::tag_from(TypeId::of::<T>(), 1)
    }

    /// Name of the type assigned to `tag`, or `None` for 0 and unknown tags.
    fn type_name(tag: u8) -> Option<&'static str> {
        if tag == 0 {
            None
        } else {
            Self::name_from(tag, 1)
        }
    }
}

impl TypeList for Nil {
    const LEN: u8 = 0;

    fn tag_from(_id: TypeId, _next: u8) -> u8 {
        0
    }

    fn name_from(_tag: u8, _next: u8) -> Option<&'static str> {
        None
    }
}

impl<H: 'static, T: TypeList> TypeList for Cons<H, T> {
    const LEN: u8 = T::LEN + 1;

    fn tag_from(id: TypeId, next: u8) -> u8 {
        if id == TypeId::of::<H>() {
            next
        } else {
            match next.checked_add(1) {
                Some(next) => T::tag_from(id, next),
                None => 0,
            }
        }
    }

    fn name_from(tag: u8, next: u8) -> Option<&'static str> {
        if tag == next {
            Some(type_name::<H>())
        } else {
            match next.checked_add(1) {
                Some(next) => T::name_from(tag, next),
                None => None,
            }
        }
    }
}

/// `T` is a member of this list, found at index `I`.
///
/// This is the compile-time half of the dispatch engine. Each link implements
/// it once for its own head ([`Here`]) and once for everything its tail
/// contains ([`There`]), so a type outside the list has no implementation and
/// any API bounded on `Member` refuses to build for it.
///
/// Callers never name `I`; write `_` and let inference find the link.
pub trait Member<T, I>: TypeList + sealed::Indexed<T, I> {
    /// Tag assigned to `T`: 1 for the first listed type, 2 for the second,
    /// and so on. [`Untyped`] gets 0.
    const TAG: u8;
}

impl<T: 'static, Tail: TypeList> sealed::Indexed<T, Here> for Cons<T, Tail> {}

impl<T: 'static, Tail: TypeList> Member<T, Here> for Cons<T, Tail> {
    const TAG: u8 = 1;
}

impl<H, Tail, T, I> sealed::Indexed<T, There<I>> for Cons<H, Tail>
where
    H: 'static,
    Tail: Member<T, I>,
    I: Position,
{
}

impl<H, Tail, T, I> Member<T, There<I>> for Cons<H, Tail>
where
    H: 'static,
    Tail: Member<T, I>,
    I: Position,
{
    const TAG: u8 = <Tail as Member<T, I>>::TAG + 1;
}

impl<L: TypeList> sealed::Indexed<Untyped, Void> for L {}

impl<L: TypeList> Member<Untyped, Void> for L {
    const TAG: u8 = 0;
}

/// Builds a [`TypeList`] from a comma separated list of types.
///
/// ```
/// use sovran_polyset::{type_list, Cons, Nil, TypeList};
///
/// type Numbers = type_list![u8, i32, f64];
/// assert_eq!(<Numbers as TypeList>::LEN, 3);
///
/// let _same: Option<Cons<u8, Cons<i32, Cons<f64, Nil>>>> = None::<Numbers>;
/// ```
#[macro_export]
macro_rules! type_list {
    () => { $crate::Nil };
    ($head:ty $(,)?) => { $crate::Cons<$head, $crate::Nil> };
    ($head:ty, $($tail:ty),+ $(,)?) => { $crate::Cons<$head, $crate::type_list!($($tail),+)> };
}
