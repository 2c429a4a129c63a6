mod helper;
mod table_row;

use proc_macro::TokenStream;
use table_row::impl_table_row;

#[proc_macro_derive(TableRow, attributes(column))]
pub fn derive_table_row(input: TokenStream) -> TokenStream {
    impl_table_row(input.into()).into()
}
