//! `#[record(...)]` attributes at the type and field level.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr};

use crate::RECORD_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// TypeAttributes

/// Attributes on the deriving type.
///
/// - `#[record(type_path = "a::b::C")]`
/// - `#[record(auto_register)]`
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    pub type_path: Option<LitStr>,
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(RECORD_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| out.parse_meta(meta))?;
        }
        Ok(out)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("type_path") {
            let lit: LitStr = meta.value()?.parse()?;
            if lit.value().trim().is_empty() {
                return Err(syn::Error::new(lit.span(), "`type_path` must not be empty"));
            }
            if self.type_path.replace(lit).is_some() {
                return Err(meta.error("duplicate `type_path`"));
            }
            Ok(())
        } else if meta.path.is_ident("auto_register") {
            self.auto_register = Some(span_of(&meta));
            Ok(())
        } else {
            Err(meta.error("unknown type attribute, expected `type_path` or `auto_register`"))
        }
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Attributes on a struct field.
///
/// - `#[record(skip)]`
/// - `#[record(default)]`
/// - `#[record(identity)]`
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    pub skip: Option<Span>,
    pub default: Option<Span>,
    pub identity: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(RECORD_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| out.parse_meta(meta))?;
        }
        out.validate()?;
        Ok(out)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        let slot = if meta.path.is_ident("skip") {
            &mut self.skip
        } else if meta.path.is_ident("default") {
            &mut self.default
        } else if meta.path.is_ident("identity") {
            &mut self.identity
        } else {
            return Err(meta.error(
                "unknown field attribute, expected `skip`, `default` or `identity`",
            ));
        };
        *slot = Some(span_of(&meta));
        Ok(())
    }

    fn validate(&self) -> syn::Result<()> {
        if let (Some(span), Some(_)) = (self.identity, self.skip) {
            return Err(syn::Error::new(span, "a skipped field cannot be an identity field"));
        }
        if let (Some(span), Some(_)) = (self.default, self.skip) {
            return Err(syn::Error::new(span, "`default` has no effect on a skipped field"));
        }
        Ok(())
    }
}

fn span_of(meta: &ParseNestedMeta<'_>) -> Span {
    meta.path
        .get_ident()
        .map_or_else(Span::call_site, syn::Ident::span)
}
