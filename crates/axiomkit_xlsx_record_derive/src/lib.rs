//! `#[derive(XlsxRecord)]` for `axiomkit_xlsx_record`.
//!
//! Field attributes:
//! - `#[xlsx(label = "...")]` : export tag; `"-"` excludes the field
//! - `#[xlsx(skip)]`          : exclude the field
//! - `#[xlsx(nested)]`        : nested record field, `Inner` or `Option<Inner>`
//!
//! Non-`pub` fields appear in the schema as private and get no accessors.
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    Data, DeriveInput, Fields, GenericArgument, LitStr, PathArguments, Type, Visibility,
    parse_macro_input,
};

const C_TAG_EXCLUDED: &str = "-";

#[proc_macro_derive(XlsxRecord, attributes(xlsx))]
pub fn derive_xlsx_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_xlsx_record(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

////////////////////////////////////////////////////////////////////////////////
// #region FieldAttributes

#[derive(Default)]
struct SpecFieldAttrs {
    label: Option<String>,
    if_skip: bool,
    if_nested: bool,
}

fn parse_field_attrs(field: &syn::Field) -> syn::Result<SpecFieldAttrs> {
    let mut attrs = SpecFieldAttrs::default();
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("xlsx")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("label") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.label = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                attrs.if_skip = true;
                Ok(())
            } else if meta.path.is_ident("nested") {
                attrs.if_nested = true;
                Ok(())
            } else {
                Err(meta.error("expected `label = \"...\"`, `skip` or `nested`"))
            }
        })?;
    }
    Ok(attrs)
}

/// `Some(T)` for a type spelled `Option<T>` (any path ending in `Option`).
fn extract_option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Expansion

fn expand_xlsx_record(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "XlsxRecord can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "XlsxRecord can only be derived for structs with named fields",
        ));
    };

    let krate = quote! { ::axiomkit_xlsx_record };
    let ident = &input.ident;
    let c_type_name = ident.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut l_schema = Vec::new();
    let mut l_arms_ref = Vec::new();
    let mut l_arms_mut = Vec::new();

    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let attrs = parse_field_attrs(field)?;
        let c_name = field_ident.unraw().to_string();
        let if_public = matches!(field.vis, Visibility::Public(_));
        let if_excluded = attrs.if_skip || attrs.label.as_deref() == Some(C_TAG_EXCLUDED);
        let ty = &field.ty;
        let option_inner = extract_option_inner(ty);

        let mut spec = if if_excluded {
            quote! { #krate::SpecField::excluded(#c_name) }
        } else if !if_public {
            // Private fields are never mapped, so their type needs no bound.
            quote! {
                #krate::SpecField {
                    name: ::std::string::String::from(#c_name),
                    tag: ::core::option::Option::None,
                    if_public: false,
                    kind: #krate::EnumFieldKind::Excluded,
                }
            }
        } else if attrs.if_nested {
            let inner = option_inner.unwrap_or(ty);
            quote! {
                #krate::SpecField::record(
                    #c_name,
                    <#inner as #krate::access::XlsxRecord>::record_type(),
                )
            }
        } else {
            quote! {
                #krate::SpecField::scalar(#c_name, <#ty as #krate::CellScalar>::KIND)
            }
        };
        if !if_excluded && let Some(label) = &attrs.label {
            spec = quote! { #spec.with_tag(#label) };
        }
        l_schema.push(spec);

        if if_excluded || !if_public {
            continue;
        }

        if !attrs.if_nested {
            l_arms_ref.push(quote! {
                #c_name => ::core::option::Option::Some(#krate::EnumFieldRef::Scalar(
                    #krate::CellScalar::to_cell_value(&self.#field_ident),
                )),
            });
            l_arms_mut.push(quote! {
                #c_name => ::core::option::Option::Some(#krate::EnumFieldMut::Scalar(
                    &mut self.#field_ident as &mut dyn #krate::ScalarSlot,
                )),
            });
        } else if option_inner.is_some() {
            l_arms_ref.push(quote! {
                #c_name => ::core::option::Option::Some(#krate::EnumFieldRef::Record(
                    self.#field_ident
                        .as_ref()
                        .map(|val| val as &dyn #krate::RecordAccess),
                )),
            });
            l_arms_mut.push(quote! {
                #c_name => ::core::option::Option::Some(#krate::EnumFieldMut::Record(
                    self.#field_ident
                        .get_or_insert_with(::core::default::Default::default)
                        as &mut dyn #krate::RecordAccess,
                )),
            });
        } else {
            l_arms_ref.push(quote! {
                #c_name => ::core::option::Option::Some(#krate::EnumFieldRef::Record(
                    ::core::option::Option::Some(&self.#field_ident as &dyn #krate::RecordAccess),
                )),
            });
            l_arms_mut.push(quote! {
                #c_name => ::core::option::Option::Some(#krate::EnumFieldMut::Record(
                    &mut self.#field_ident as &mut dyn #krate::RecordAccess,
                )),
            });
        }
    }

    Ok(quote! {
        impl #impl_generics #krate::RecordAccess for #ident #ty_generics #where_clause {
            fn get_field(&self, name: &str) -> ::core::option::Option<#krate::EnumFieldRef<'_>> {
                match name {
                    #(#l_arms_ref)*
                    _ => ::core::option::Option::None,
                }
            }

            fn get_field_mut(
                &mut self,
                name: &str,
            ) -> ::core::option::Option<#krate::EnumFieldMut<'_>> {
                match name {
                    #(#l_arms_mut)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics #krate::access::XlsxRecord for #ident #ty_generics #where_clause {
            fn record_type() -> #krate::SpecRecordType {
                #krate::SpecRecordType::new(#c_type_name, ::std::vec![#(#l_schema),*])
            }
        }
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
