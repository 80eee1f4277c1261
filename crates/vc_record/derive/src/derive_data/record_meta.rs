use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::{GenericParam, Generics, Ident, parse_quote};

use super::TypeAttributes;

/// Information shared by every generated impl of one type.
pub(crate) struct RecordMeta<'a> {
    vc_record_path: syn::Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
}

impl core::fmt::Debug for RecordMeta<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecordMeta")
            .field("vc_record_path", &self.vc_record_path.to_token_stream())
            .field("ident", &self.ident)
            .field("attrs", &self.attrs)
            .finish()
    }
}

impl<'a> RecordMeta<'a> {
    pub fn new(attrs: TypeAttributes, ident: &'a Ident, generics: &'a Generics) -> Self {
        Self {
            vc_record_path: crate::path::vc_record(),
            attrs,
            ident,
            generics,
        }
    }

    #[inline]
    pub fn vc_record_path(&self) -> &syn::Path {
        &self.vc_record_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &'a Ident {
        self.ident
    }

    /// Whether the type has type or const parameters.
    pub fn is_generic(&self) -> bool {
        self.generics
            .params
            .iter()
            .any(|param| !matches!(param, GenericParam::Lifetime(_)))
    }

    /// Generics with `Reflect + Typed + FromValue` added for every type
    /// parameter.
    pub fn bounded_generics(&self) -> Generics {
        let vc_record = &self.vc_record_path;
        let info_ = crate::path::info_(vc_record);
        let de_ = crate::path::de_(vc_record);

        let mut generics = self.generics.clone();
        let params: Vec<Ident> = generics
            .type_params()
            .map(|param| param.ident.clone())
            .collect();
        let where_clause = generics.make_where_clause();
        for param in params {
            where_clause.predicates.push(parse_quote! {
                #param: #vc_record::Reflect + #info_::Typed + #de_::FromValue
            });
        }
        generics
    }

    /// Override of `Typed::type_identity`, empty when the default
    /// `type_name`-based identity applies.
    ///
    /// ```ignore
    /// fn type_identity() -> TypeIdentity {
    ///     TypeIdentity::new::<Self>(concat!(module_path!(), "::", "Foo"), "Foo")
    /// }
    /// ```
    pub fn type_identity_tokens(&self) -> TokenStream {
        let info_ = crate::path::info_(&self.vc_record_path);

        let (path, name) = match &self.attrs.type_path {
            Some(lit) => {
                let value = lit.value();
                let name = value.rsplit("::").next().unwrap_or(&value).to_owned();
                (lit.to_token_stream(), name)
            }
            None if self.is_generic() => return TokenStream::new(),
            None => {
                let name = self.ident.unraw().to_string();
                (quote! { concat!(module_path!(), "::", #name) }, name)
            }
        };

        quote! {
            #[inline]
            fn type_identity() -> #info_::TypeIdentity {
                #info_::TypeIdentity::new::<Self>(#path, #name)
            }
        }
    }
}
