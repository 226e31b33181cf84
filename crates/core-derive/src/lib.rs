//! # ioc-core-derive
//!
//! Procedural macros for the ioc-core container:
//! - `#[injectable]`: implement `Injectable` from the struct fields and
//!   declare the struct in the global descriptor registry

use proc_macro::TokenStream;

mod injectable;

/// Injectable attribute macro for automatic dependency injection
///
/// Every `Arc<T>` field becomes a constructor dependency on `T`, in field
/// order. `#[inject(alias = "...")]` makes the dependency resolve through an
/// alias instead, and `#[inject(default)]` fills the field with
/// `Default::default()` without declaring a dependency.
///
/// The declared name defaults to the struct name and can be set with
/// `#[injectable(name = "...")]`.
#[proc_macro_attribute]
pub fn injectable(args: TokenStream, input: TokenStream) -> TokenStream {
    injectable::injectable_impl(args, input)
}
