use crate::helper;
use proc_macro2::TokenStream;
use syn::{AttrStyle, DeriveInput, LitStr, Meta};

/// `#[column("Header")]` overrides the header of a field. Fields without the
/// attribute use their own name.
fn column_header(field: &syn::Field) -> String {
    field
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("column"))
        .find_map(|attr| match (&attr.style, &attr.meta) {
            (AttrStyle::Outer, Meta::List(metalist)) => Some(
                metalist
                    .parse_args::<LitStr>()
                    .expect("column attribute expects a string literal")
                    .value(),
            ),
            _ => None,
        })
        .unwrap_or_else(|| {
            field
                .ident
                .as_ref()
                .map(|ident| ident.to_string())
                .unwrap_or_default()
        })
}

pub fn impl_table_row(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = syn::parse2(input).expect("failed to parse input token stream");

    let struct_name = &ast.ident;
    let fields = helper::extract_fields(&ast.data);

    let headers = fields
        .named
        .iter()
        .map(column_header)
        .collect::<Vec<String>>();
    let cells = fields
        .named
        .iter()
        .filter_map(|field| field.ident.to_owned())
        .map(|ident| {
            quote::quote! {
                ToCell::to_cell(&self.#ident)
            }
        })
        .collect::<Vec<_>>();

    quote::quote! {
        impl TableRow for #struct_name {
            fn headers() -> Vec<&'static str> {
                vec![#(#headers),*]
            }

            fn cells(&self) -> Vec<String> {
                vec![#(#cells),*]
            }
        }
    }
}
