use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;

use crate::derive_data::RecordEnum;

/// Implements `Typed`, `Reflect` and `FromValue` for a field-less enum.
pub(crate) fn impl_enum(info: &RecordEnum) -> TokenStream {
    let meta = &info.meta;
    let vc_record = meta.vc_record_path();
    let info_ = crate::path::info_(vc_record);
    let de_ = crate::path::de_(vc_record);

    let ident = meta.ident();
    let generics = meta.bounded_generics();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let variants: Vec<_> = info.variants.iter().map(|variant| &variant.ident).collect();
    let names: Vec<_> = variants
        .iter()
        .map(|variant| variant.unraw().to_string())
        .collect();

    let type_identity = meta.type_identity_tokens();

    quote! {
        impl #impl_generics #info_::Typed for #ident #ty_generics #where_clause {
            fn type_shape() -> #info_::TypeShape {
                #info_::TypeShape::Enum(#info_::EnumShape::new(
                    <Self as #info_::Typed>::type_identity(),
                    &[ #(#names),* ],
                ))
            }

            #type_identity
        }

        impl #impl_generics #vc_record::Reflect for #ident #ty_generics #where_clause {
            fn reflect_ref(&self) -> #vc_record::ReflectRef<'_> {
                let variant = match *self {
                    #( Self::#variants => #names, )*
                };
                #vc_record::ReflectRef::Enum(#vc_record::EnumRef::new(
                    <Self as #info_::Typed>::type_identity(),
                    variant,
                ))
            }

            #[inline]
            fn reflect_identity(&self) -> #info_::TypeIdentity {
                <Self as #info_::Typed>::type_identity()
            }
        }

        impl #impl_generics #de_::FromValue for #ident #ty_generics #where_clause {
            fn from_value(
                value: #de_::FieldValue,
                cx: &mut #de_::Materializer<'_>,
            ) -> ::core::result::Result<Self, #vc_record::MaterializeError> {
                let tag = cx.variant::<Self>(value)?;
                match tag.variant() {
                    #( #names => ::core::result::Result::Ok(Self::#variants), )*
                    _ => ::core::result::Result::Err(cx.unknown_variant::<Self>(&tag)),
                }
            }
        }
    }
}
