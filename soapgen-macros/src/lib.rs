extern crate proc_macro;
use proc_macro::TokenStream;

pub(crate) mod crate_path;
pub(crate) mod type_mapping;
pub(crate) mod web_service_attr;
pub(crate) mod web_service_parsing;

/// Attribute macro declaring a SOAP service interface on a trait.
///
/// The trait is emitted unchanged apart from the member attributes below,
/// together with two functions named after the trait in snake case:
///
/// - `<trait>_info() -> TypeInfo`: the interface itself, qualified by the
///   module path (`my_crate::billing::Invoices` becomes
///   `my_crate.billing.Invoices`).
/// - `<trait>_metadata() -> Vec<TypeInfo>`: the interface followed by every
///   user type referenced from its signatures.
///
/// # Arguments
///
/// | Parameter | Required | Description |
/// |-----------|----------|-------------|
/// | `target_namespace` | no | Overrides the namespace derived from the module path |
/// | `name` | no | Service name carried on the `WebService` tag |
///
/// # Member attributes
///
/// | Attribute | On | Keys |
/// |-----------|----|------|
/// | `#[web_method]` | method | `operation_name` |
/// | `#[web_result]` | method | `name`, `target_namespace` |
/// | `#[web_param]` | parameter | `name`, `target_namespace`, `mode` (`In`, `Out`, `InOut`), `header` |
/// | `#[tag(Name, k = v)]` | method, parameter | arbitrary, copied as an element tag |
///
/// # Types
///
/// | Rust | Metadata |
/// |------|----------|
/// | `String`, `&str` | `string` |
/// | `bool` | `boolean` |
/// | `i8` / `i16` / `i32` / `i64` | `byte` / `short` / `int` / `long` |
/// | `f32` / `f64` | `float` / `double` |
/// | `Vec<T>` | `list<T>` |
/// | `ElementHolder<T>` | `holder<T>` |
/// | `Option<T>`, `Box<T>`, `&T` | `T` |
/// | `Result<T, E>` (return only) | returns `T`, throws `E` |
/// | anything else | the type's qualified name |
///
/// # Example
///
/// ```ignore
/// #[web_service(target_namespace = "urn:orders")]
/// pub trait Orders {
///     #[web_result(name = "id")]
///     fn place(&self, #[web_param(name = "sku")] item: String, qty: i32) -> Result<i64, Rejected>;
/// }
///
/// let index = MetadataIndex::new(orders_metadata())?;
/// ```
#[proc_macro_attribute]
pub fn web_service(args: TokenStream, input: TokenStream) -> TokenStream {
    web_service_attr::expand(args, input)
}
