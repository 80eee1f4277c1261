use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use crate::derive_data::RecordStruct;

/// Implements `Typed`, `Reflect`, `Record` and `FromValue` for a struct.
pub(crate) fn impl_struct(info: &RecordStruct) -> TokenStream {
    let meta = &info.meta;
    let vc_record = meta.vc_record_path();
    let info_ = crate::path::info_(vc_record);
    let de_ = crate::path::de_(vc_record);
    let exports_ = crate::path::macro_exports_(vc_record);

    let ident = meta.ident();
    let generics = meta.bounded_generics();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let active: Vec<_> = info.active_fields().collect();
    let members: Vec<_> = active.iter().map(|field| field.ident).collect();
    let names: Vec<_> = active.iter().map(|field| field.name()).collect();
    let indices = 0..active.len();
    let field_len = active.len();

    let field_shapes = active.iter().map(|field| {
        let ty = &field.data.ty;
        let name = field.name();
        let with_default = field.attrs.default.map(|_| quote!(.with_default()));
        let with_identity = field.attrs.identity.map(|_| quote!(.with_identity()));
        quote! {
            #info_::FieldShape::new::<#ty>(#name) #with_default #with_identity
        }
    });

    let reader = if active.is_empty() {
        Ident::new("_reader", Span::call_site())
    } else {
        Ident::new("reader", Span::call_site())
    };
    let field_reads = info.fields.iter().map(|field| {
        let member = field.ident;
        let name = field.name();
        if !field.is_active() {
            quote! { #member: ::core::default::Default::default() }
        } else if field.attrs.default.is_some() {
            quote! { #member: #reader.read_or_default(cx, #name)? }
        } else {
            quote! { #member: #reader.read(cx, #name)? }
        }
    });

    let type_identity = meta.type_identity_tokens();
    let auto_register = super::get_auto_register_impl(meta);

    quote! {
        impl #impl_generics #info_::Typed for #ident #ty_generics #where_clause {
            fn type_shape() -> #info_::TypeShape {
                #info_::TypeShape::Record(#info_::RecordShape::new(
                    <Self as #info_::Typed>::type_identity(),
                    #exports_::vec![ #(#field_shapes),* ],
                ))
            }

            #type_identity
        }

        impl #impl_generics #vc_record::Reflect for #ident #ty_generics #where_clause {
            #[inline]
            fn reflect_ref(&self) -> #vc_record::ReflectRef<'_> {
                #vc_record::ReflectRef::Record(self)
            }

            #[inline]
            fn reflect_identity(&self) -> #info_::TypeIdentity {
                <Self as #info_::Typed>::type_identity()
            }
        }

        impl #impl_generics #vc_record::Record for #ident #ty_generics #where_clause {
            #[inline]
            fn type_ref(&self) -> #info_::TypeRef {
                #info_::TypeRef::of::<Self>()
            }

            fn field(&self, name: &str) -> ::core::option::Option<&dyn #vc_record::Reflect> {
                match name {
                    #( #names => ::core::option::Option::Some(&self.#members as &dyn #vc_record::Reflect), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_at(&self, index: usize) -> ::core::option::Option<&dyn #vc_record::Reflect> {
                match index {
                    #( #indices => ::core::option::Option::Some(&self.#members as &dyn #vc_record::Reflect), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn name_at(&self, index: usize) -> ::core::option::Option<&'static str> {
                const NAMES: [&str; #field_len] = [ #(#names),* ];
                NAMES.get(index).copied()
            }

            #[inline]
            fn field_len(&self) -> usize {
                #field_len
            }
        }

        impl #impl_generics #de_::FromValue for #ident #ty_generics #where_clause {
            fn from_value(
                value: #de_::FieldValue,
                cx: &mut #de_::Materializer<'_>,
            ) -> ::core::result::Result<Self, #vc_record::MaterializeError> {
                let #reader = cx.record::<Self>(value)?;
                ::core::result::Result::Ok(Self {
                    #(#field_reads,)*
                })
            }
        }

        #auto_register
    }
}
