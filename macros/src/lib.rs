//! Procedural macros shared by the kiln test suites.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, ItemFn, LitStr};

/// Run a test with a `tracing-subscriber` fmt subscriber installed.
///
/// The optional argument is the maximum level to print (defaults to `DEBUG`).
/// Output is routed through the test writer, so it is only shown for failing
/// tests (or with `--nocapture`). The crate using this macro must depend on
/// `tracing-subscriber`.
///
/// # Example
///
/// ```rust,ignore
/// use kiln_macros::test_traced;
///
/// #[test_traced("TRACE")]
/// fn test_reduce_logs() {
///     tracing::trace!("visible");
/// }
/// ```
#[proc_macro_attribute]
pub fn test_traced(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let level = if attr.is_empty() {
        String::from("DEBUG")
    } else {
        parse_macro_input!(attr as LitStr).value()
    };

    let filter = match level.to_uppercase().as_str() {
        "TRACE" => quote!(::tracing_subscriber::filter::LevelFilter::TRACE),
        "DEBUG" => quote!(::tracing_subscriber::filter::LevelFilter::DEBUG),
        "INFO" => quote!(::tracing_subscriber::filter::LevelFilter::INFO),
        "WARN" => quote!(::tracing_subscriber::filter::LevelFilter::WARN),
        "ERROR" => quote!(::tracing_subscriber::filter::LevelFilter::ERROR),
        other => {
            return syn::Error::new(Span::call_site(), format!("unknown log level `{other}`"))
                .to_compile_error()
                .into();
        }
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let expanded = quote! {
        #[test]
        #(#attrs)*
        #vis #sig {
            // Another test in the same binary may have installed a subscriber already.
            let _ = ::tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(#filter)
                .try_init();
            #block
        }
    };
    expanded.into()
}
