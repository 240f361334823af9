// Copyright (C) 2024-present The Pathwire Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Expr, Lit, MetaNameValue};

/// An enum variant whose single field carries one of our helper attributes
struct MarkedField<'a> {
    variant: &'a syn::Ident,
    ty: &'a syn::TypePath,
    attr: &'a syn::Attribute,
}

fn marked_fields<'a>(data: &'a syn::DataEnum, marker: &str) -> syn::Result<Vec<MarkedField<'a>>> {
    let mut ret = vec![];
    for variant in &data.variants {
        for field in &variant.fields {
            for attr in field.attrs.iter().filter(|attr| attr.path().is_ident(marker)) {
                match &field.ty {
                    syn::Type::Path(ty) => ret.push(MarkedField {
                        variant: &variant.ident,
                        ty,
                        attr,
                    }),
                    other => {
                        return Err(syn::Error::new(
                            other.span(),
                            format!("#[{marker}] expects a named type"),
                        ))
                    }
                }
            }
        }
    }
    Ok(ret)
}

fn enum_data(input: &syn::DeriveInput) -> syn::Result<&syn::DataEnum> {
    match &input.data {
        syn::Data::Enum(data) => Ok(data),
        _ => Err(syn::Error::new(
            input.span(),
            "Works only with enum error types",
        )),
    }
}

/// Resolve `#[from_located(module = "...")] a::b::XError` into the path of
/// the generated `...::a::b::LocatedXError`.
fn located_path(marked: &MarkedField<'_>) -> syn::Result<TokenStream> {
    let name_value: MetaNameValue = marked.attr.parse_args()?;
    if !name_value.path.is_ident("module") {
        return Err(syn::Error::new(
            name_value.path.span(),
            "Only accepts one attribute 'module'",
        ));
    }
    let module = match &name_value.value {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Str(value) => value.value(),
            other => return Err(syn::Error::new(other.span(), "'module' must be a string")),
        },
        other => return Err(syn::Error::new(other.span(), "'module' must be a string")),
    };
    if module.is_empty() {
        return Err(syn::Error::new(
            name_value.value.span(),
            "'module' of the Located error must not be empty",
        ));
    }
    let module: syn::Path = syn::parse_str(&module)?;
    let segments = &marked.ty.path.segments;
    let Some(last) = segments.last() else {
        return Err(syn::Error::new(marked.ty.span(), "empty type path"));
    };
    let prefix = segments.iter().take(segments.len() - 1).map(|seg| &seg.ident);
    let located_ident = format_ident!("Located{}", last.ident);
    Ok(quote!(#module #(:: #prefix)* :: #located_ident))
}

fn expand_located_error(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let data = enum_data(input)?;
    let ident = &input.ident;
    let located = format_ident!("Located{}", ident);
    let span_ty = quote!(pathwire_parse_utils::Span<'a>);

    let from_nom = marked_fields(data, "from_nom")?;
    if from_nom.len() > 1 {
        return Err(syn::Error::new(
            from_nom[1].attr.span(),
            "#[from_nom] can be used only once per error type",
        ));
    }
    let nom_impl = from_nom.first().map(|marked| {
        let variant = marked.variant;
        quote! {
            #[automatically_derived]
            impl<'a> nom::error::ParseError<#span_ty> for #located<'a> {
                fn from_error_kind(input: #span_ty, kind: nom::error::ErrorKind) -> Self {
                    #located::new(input, #ident::#variant(kind))
                }

                fn append(_input: #span_ty, _kind: nom::error::ErrorKind, other: Self) -> Self {
                    other
                }
            }
        }
    });

    let external_impls = marked_fields(data, "from_external")?
        .into_iter()
        .map(|marked| {
            let variant = marked.variant;
            let ty = marked.ty;
            quote! {
                #[automatically_derived]
                impl<'a> nom::error::FromExternalError<#span_ty, #ty> for #located<'a> {
                    fn from_external_error(input: #span_ty, _kind: nom::error::ErrorKind, error: #ty) -> Self {
                        #located::new(input, #ident::#variant(error))
                    }
                }
            }
        })
        .collect::<Vec<_>>();

    let mut located_impls = vec![];
    for marked in marked_fields(data, "from_located")? {
        let variant = marked.variant;
        let path = located_path(&marked)?;
        located_impls.push(quote! {
            #[automatically_derived]
            impl<'a> From<#path<'a>> for #located<'a> {
                fn from(input: #path<'a>) -> Self {
                    let (span, error) = input.into();
                    #located::new(span, #ident::#variant(error))
                }
            }
        });
    }

    Ok(quote! {
        #[derive(PartialEq, Clone, Debug)]
        pub struct #located<'a> {
            span: #span_ty,
            error: #ident,
        }

        #[automatically_derived]
        impl<'a> #located<'a> {
            pub const fn new(span: #span_ty, error: #ident) -> Self {
                Self { span, error }
            }
        }

        #[automatically_derived]
        impl<'a> From<#located<'a>> for (#span_ty, #ident) {
            fn from(input: #located<'a>) -> Self {
                (input.span, input.error)
            }
        }

        #[automatically_derived]
        impl<'a> pathwire_parse_utils::LocatedParsingError for #located<'a> {
            type Span = #span_ty;
            type Error = #ident;

            fn span(&self) -> &Self::Span {
                &self.span
            }

            fn error(&self) -> &Self::Error {
                &self.error
            }
        }

        #[automatically_derived]
        impl<'a> nom::error::FromExternalError<#span_ty, #ident> for #located<'a> {
            fn from_external_error(input: #span_ty, _kind: nom::error::ErrorKind, error: #ident) -> Self {
                #located::new(input, error)
            }
        }

        #nom_impl
        #(#external_impls)*
        #(#located_impls)*
    })
}

fn expand_writing_error(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let data = enum_data(input)?;
    let ident = &input.ident;

    let io_impls = marked_fields(data, "from_std_io_error")?
        .into_iter()
        .map(|marked| {
            let variant = marked.variant;
            quote! {
                #[automatically_derived]
                impl From<std::io::Error> for #ident {
                    fn from(err: std::io::Error) -> Self {
                        #ident::#variant(err.to_string())
                    }
                }
            }
        })
        .collect::<Vec<_>>();

    let from_impls = marked_fields(data, "from")?
        .into_iter()
        .map(|marked| {
            let variant = marked.variant;
            let ty = marked.ty;
            quote! {
                #[automatically_derived]
                impl From<#ty> for #ident {
                    fn from(err: #ty) -> Self {
                        #ident::#variant(err)
                    }
                }
            }
        })
        .collect::<Vec<_>>();

    Ok(quote! {
        #(#io_impls)*
        #(#from_impls)*
    })
}

/// For a given error enum `{Name}` generate a struct called `Located{Name}`
/// that carries the [`Span`] (the error location in the input buffer) along
/// with the error. Additionally generates the `nom` error conversions:
///
/// 1. `#[from_nom]` marks the variant that wraps [`nom::error::ErrorKind`],
///    at most one per enum.
/// 2. `#[from_external]` marks a variant whose payload can be raised with
///    `map_res` and friends.
/// 3. `#[from_located(module = "...")]` marks a variant that wraps the error
///    of a nested parser, converting from its `Located` form.
///
/// ```no_compile
/// use pathwire_serde_macros::LocatedError;
///
/// #[derive(LocatedError, PartialEq, Clone, Debug)]
/// pub enum PcepObjectParsingError {
///     NomError(#[from_nom] nom::error::ErrorKind),
///     UndefinedObjectClass(#[from_external] UndefinedPcepObjectClass),
///     SubobjectError(#[from_located(module = "self")] SubobjectParsingError),
/// }
/// ```
///
/// [`Span`]: https://docs.rs/pathwire-parse-utils
#[proc_macro_derive(LocatedError, attributes(from_nom, from_external, from_located))]
pub fn located_error(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = syn::parse_macro_input!(input as syn::DeriveInput);
    expand_located_error(&ast)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Decorate an error enum used while serializing.
///
/// 1. `#[from_std_io_error]` on a `String` field generates
///    `From<std::io::Error>`.
/// 2. `#[from]` generates `From` for the field's type.
///
/// ```no_compile
/// use pathwire_serde_macros::WritingError;
///
/// #[derive(WritingError, PartialEq, Clone, Debug)]
/// pub enum PcepMessageWritingError {
///     StdIOError(#[from_std_io_error] String),
///     ObjectError(#[from] PcepObjectWritingError),
/// }
/// ```
#[proc_macro_derive(WritingError, attributes(from_std_io_error, from))]
pub fn writing_error(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = syn::parse_macro_input!(input as syn::DeriveInput);
    expand_writing_error(&ast)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
