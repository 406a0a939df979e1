mod record;

use proc_macro::TokenStream;

/// Derive macro for the `Record` trait.
///
/// The collection is named by its `CollectionName` variant, so an
/// unregistered collection fails to compile:
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Record)]
/// #[record(collection = Notifications)]
/// struct StoredNotification {
///     #[record(id)]
///     pub id: String,
///     pub title: String,
/// }
/// ```
///
/// Without `#[record(id)]` the field named `id` is used.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input)
}
