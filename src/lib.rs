//! # sovran-polyset
//!
//! Closed-world heterogeneous storage with compile-time type dispatch.
//!
//! `sovran-polyset` stores and refers to values of several unrelated types
//! without a common base trait, boxing or `Any`. You name the types up front
//! in a [`type_list!`], and the compiler resolves every operation to the
//! right type-specific slot.
//!
//! ## Key Features
//!
//! - **Tagged pointers**: [`PtrUnion`] is a pointer to one of N listed types plus
//!   a tag saying which, with checked access through `try_as` and `is`
//! - **Heterogeneous sets**: [`PolySet`] keeps one uniqueness store per listed type
//!   behind a single insert/find/erase API
//! - **Closed world**: using a type that is not in the list is a compile error,
//!   never a runtime surprise
//! - **Switch-friendly tags**: `id_of` is a `const fn`, so tags can be `match` patterns
//!
//! ## Usage Examples
//!
//! ### Tagged Pointers
//!
//! ```rust
//! use sovran_polyset::{type_list, PtrUnion, Untyped, Void};
//!
//! type Numbers = type_list![i32, u64, f64];
//!
//! let i = 2;
//! let d = 3.14;
//!
//! let mut ptr = PtrUnion::<Numbers>::new(&i);
//! assert_eq!(ptr.try_as::<i32, _>(), Some(&2));
//! assert_eq!(ptr.try_as::<f64, _>(), None);
//! assert!(ptr.is::<Untyped, Void>());
//!
//! // Reassigning moves every check over to the new type
//! ptr.set(&d);
//! assert!(ptr.is::<f64, _>());
//! assert!(!ptr.is::<i32, _>());
//!
//! // An explicit untyped pointer forgets the type, even at the same address
//! ptr.set_void(ptr.as_void());
//! assert_eq!(ptr.id(), 0);
//! assert!(!ptr.is::<f64, _>());
//! ```
//!
//! ### Heterogeneous Sets
//!
//! ```rust
//! use sovran_polyset::{type_list, PolySet};
//!
//! let mut set = PolySet::<type_list![f64, i32, String]>::new();
//!
//! let (handle, fresh) = set.insert(1.5);
//! assert!(fresh);
//! assert_eq!(handle.try_as::<f64, _>(), Some(&1.5));
//!
//! set.insert(1i32);
//! set.insert("hello".to_string());
//! assert_eq!(set.len(), 3);
//!
//! // Inserting an equal value hands back the element already stored
//! let (_, fresh) = set.insert(1i32);
//! assert!(!fresh);
//!
//! // A miss is the untyped null handle, whichever type was searched
//! set.erase(&1i32);
//! let missing = set.find(&1i32);
//! assert_eq!(missing.id(), 0);
//! assert!(missing.is_null());
//! ```
//!
//! ### Switch-Style Dispatch
//!
//! ```rust
//! use sovran_polyset::{type_list, PolySet, PtrUnion};
//!
//! type Items = type_list![char, u32];
//! const CHAR: u8 = PtrUnion::<Items>::id_of::<char, _>();
//! const NUMBER: u8 = PtrUnion::<Items>::id_of::<u32, _>();
//!
//! let mut set = PolySet::<Items>::new();
//! set.insert('a');
//! set.insert(7u32);
//!
//! let mut described = Vec::new();
//! for handle in set.handles() {
//!     match handle.id() {
//!         CHAR => described.push(format!("char {:?}", handle.try_as::<char, _>())),
//!         NUMBER => described.push(format!("number {:?}", handle.try_as::<u32, _>())),
//!         _ => unreachable!("set handles are always typed"),
//!     }
//! }
//! assert_eq!(described, vec!["char Some('a')", "number Some(7)"]);
//! ```
//!
//! ### Error Handling
//!
//! Lookups report absence through empty handles and `Option`. When you want to
//! know why an access failed, use [`PtrUnion::downcast`]:
//!
//! ```rust
//! use sovran_polyset::{type_list, PtrUnion, UnionError};
//!
//! type Numbers = type_list![i32, f64];
//!
//! let i = 1;
//! let ptr = PtrUnion::<Numbers>::new(&i);
//!
//! match ptr.downcast::<f64, _>() {
//!     Ok(value) => println!("Value: {}", value),
//!     Err(UnionError::TypeMismatch { expected, found }) => {
//!         println!("Wanted {}, pointer holds {}", expected, found)
//!     }
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Thread Safety
//!
//! Nothing here is synchronized. `PtrUnion` is neither `Send` nor `Sync`, and a
//! `PolySet` shared between threads needs an outer lock around the whole set.

mod error;
mod list;
mod poly_set;
mod ptr_union;
mod store;

pub use error::UnionError;
pub use list::{Cons, Here, Member, Nil, Position, There, TypeList, Untyped, Void};
pub use poly_set::{End, Link, PolySet, Route, SetList, StoreChain};
pub use ptr_union::PtrUnion;
pub use store::{Natural, SortedStore};
