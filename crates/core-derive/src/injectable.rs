//! Injectable attribute macro implementation
//!
//! Analyzes the struct fields, emits the `Injectable` impl and submits the
//! struct to the global descriptor registry.

use proc_macro::TokenStream;
use proc_macro2::{Ident, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    parse::{Parser, Result},
    Error, Field, Fields, GenericArgument, Item, ItemStruct, LitStr, PathArguments, Type,
};

/// Main implementation function for the injectable macro
pub fn injectable_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    match expand(args.into(), input.into()) {
        Ok(result) => result.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(args: TokenStream2, input: TokenStream2) -> Result<TokenStream2> {
    let name = parse_args(args)?;
    let item: Item = syn::parse2(input)?;
    process_injectable_item(item, name)
}

/// Parse `#[injectable(name = "...")]`
fn parse_args(args: TokenStream2) -> Result<Option<LitStr>> {
    let mut name: Option<LitStr> = None;
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            name = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported injectable property, expected `name`"))
        }
    });
    parser.parse2(args)?;
    Ok(name)
}

fn process_injectable_item(item: Item, name: Option<LitStr>) -> Result<TokenStream2> {
    match item {
        Item::Struct(mut item_struct) => process_injectable_struct(&mut item_struct, name),
        _ => Err(Error::new_spanned(
            item,
            "#[injectable] can only be applied to structs",
        )),
    }
}

fn process_injectable_struct(
    item_struct: &mut ItemStruct,
    name: Option<LitStr>,
) -> Result<TokenStream2> {
    if !item_struct.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &item_struct.generics,
            "#[injectable] does not support generic structs",
        ));
    }

    let struct_name = item_struct.ident.clone();
    let name = name
        .map(|lit| lit.value())
        .unwrap_or_else(|| struct_name.to_string());
    if name.trim().is_empty() {
        return Err(Error::new_spanned(&item_struct.ident, "injectable name must not be empty"));
    }

    let fields = extract_fields(item_struct)?;
    let injectable_impl = generate_injectable_impl(&struct_name, &name, &fields);

    Ok(quote! {
        #item_struct

        #injectable_impl
    })
}

/// How a field is filled at construction time
enum FieldSource {
    /// Resolved by type
    Direct(Type),
    /// Resolved through an alias, downcast to the given type
    Aliased(Type, LitStr),
    /// Resolved through an alias registered with an upcast to the given trait object
    Interface(Type, LitStr),
    /// `Default::default()`, not a dependency
    Default,
}

struct FieldInfo {
    ident: Ident,
    source: FieldSource,
}

enum StructShape {
    Unit,
    Named(Vec<FieldInfo>),
}

fn extract_fields(item_struct: &mut ItemStruct) -> Result<StructShape> {
    match &mut item_struct.fields {
        Fields::Unit => Ok(StructShape::Unit),
        Fields::Named(fields) => {
            let mut infos = Vec::with_capacity(fields.named.len());
            for field in fields.named.iter_mut() {
                infos.push(analyze_field(field)?);
            }
            Ok(StructShape::Named(infos))
        }
        Fields::Unnamed(_) => Err(Error::new_spanned(
            &item_struct.ident,
            "#[injectable] requires a unit struct or a struct with named fields",
        )),
    }
}

/// Read and strip the `#[inject(...)]` attributes of a field
fn analyze_field(field: &mut Field) -> Result<FieldInfo> {
    let mut alias: Option<LitStr> = None;
    let mut use_default = false;

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("inject")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("alias") {
                alias = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("default") {
                use_default = true;
                Ok(())
            } else {
                Err(meta.error("unsupported inject property, expected `alias` or `default`"))
            }
        })?;
    }
    field.attrs.retain(|attr| !attr.path().is_ident("inject"));

    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(&*field, "expected a named field"))?;

    if use_default {
        if alias.is_some() {
            return Err(Error::new_spanned(
                &*field,
                "`alias` and `default` cannot be combined",
            ));
        }
        return Ok(FieldInfo {
            ident,
            source: FieldSource::Default,
        });
    }

    let inner = extract_arc_inner_type(&field.ty)?;
    let is_trait_object = matches!(inner, Type::TraitObject(_));
    let source = match alias {
        Some(alias) if alias.value().trim().is_empty() => {
            return Err(Error::new_spanned(alias, "alias must not be empty"))
        }
        Some(alias) if is_trait_object => FieldSource::Interface(inner, alias),
        Some(alias) => FieldSource::Aliased(inner, alias),
        None if is_trait_object => {
            return Err(Error::new_spanned(
                inner,
                "trait object dependencies must be injected through #[inject(alias = \"...\")]",
            ))
        }
        None => FieldSource::Direct(inner),
    };

    Ok(FieldInfo { ident, source })
}

/// Extract `T` from `Arc<T>`
fn extract_arc_inner_type(ty: &Type) -> Result<Type> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Arc" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return Ok(inner.clone());
                    }
                }
            }
        }
    }

    Err(Error::new_spanned(
        ty,
        "Dependency injection fields must be Arc<T>; mark other fields with #[inject(default)]",
    ))
}

fn generate_injectable_impl(struct_name: &Ident, name: &str, shape: &StructShape) -> TokenStream2 {
    let unit_body = quote! {
        let _ = dependencies;
        ::core::result::Result::Ok(Self)
    };

    let (slots, construct_body) = match shape {
        StructShape::Unit => (Vec::new(), unit_body),
        StructShape::Named(fields) => {
            let slots: Vec<TokenStream2> = fields
                .iter()
                .filter_map(|field| match &field.source {
                    FieldSource::Direct(ty) => Some(quote! { .depends_on::<#ty>() }),
                    FieldSource::Aliased(_, alias) | FieldSource::Interface(_, alias) => {
                        Some(quote! { .depends_on_alias(#alias) })
                    }
                    FieldSource::Default => None,
                })
                .collect();

            let initializers: Vec<TokenStream2> = fields
                .iter()
                .map(|field| {
                    let ident = &field.ident;
                    match &field.source {
                        FieldSource::Direct(ty) | FieldSource::Aliased(ty, _) => quote! {
                            #ident: dependencies.next::<#ty>()?
                        },
                        FieldSource::Interface(ty, _) => quote! {
                            #ident: dependencies.next_interface::<#ty>()?
                        },
                        FieldSource::Default => quote! {
                            #ident: ::core::default::Default::default()
                        },
                    }
                })
                .collect();

            let prelude = if slots.is_empty() {
                quote! { let _ = dependencies; }
            } else {
                quote! { let mut dependencies = dependencies; }
            };

            (
                slots,
                quote! {
                    #prelude
                    ::core::result::Result::Ok(Self {
                        #(#initializers),*
                    })
                },
            )
        }
    };

    quote! {
        impl ::ioc_core::container::Injectable for #struct_name {
            fn descriptor() -> ::ioc_core::container::InjectableDescriptor {
                ::ioc_core::container::InjectableDescriptor::builder(#name)
                    #(#slots)*
                    .build()
            }

            fn construct(
                dependencies: ::ioc_core::container::Dependencies,
            ) -> ::core::result::Result<Self, ::ioc_core::CoreError> {
                #construct_body
            }
        }

        ::ioc_core::declare_injectable!(#struct_name);
    }
}
