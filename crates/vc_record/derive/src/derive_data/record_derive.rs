use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Field, Fields, GenericParam, Ident, Variant};

use super::{FieldAttributes, RecordMeta, TypeAttributes};
use crate::RECORD_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// Define

/// The kinds of type `#[derive(Record)]` accepts.
pub(crate) enum RecordDerive<'a> {
    Struct(RecordStruct<'a>),
    Enum(RecordEnum<'a>),
}

/// A struct with named fields.
pub(crate) struct RecordStruct<'a> {
    pub meta: RecordMeta<'a>,
    pub fields: Vec<RecordField<'a>>,
}

/// A field-less enum.
pub(crate) struct RecordEnum<'a> {
    pub meta: RecordMeta<'a>,
    pub variants: Vec<&'a Variant>,
}

/// A named struct field.
pub(crate) struct RecordField<'a> {
    pub data: &'a Field,
    pub ident: &'a Ident,
    pub attrs: FieldAttributes,
}

// -----------------------------------------------------------------------------
// Parsing

impl<'a> RecordDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;

        if let Some(lifetime) = input.generics.params.iter().find_map(|param| match param {
            GenericParam::Lifetime(lifetime) => Some(lifetime),
            _ => None,
        }) {
            return Err(syn::Error::new(
                lifetime.span(),
                "`Record` types must be `'static`, lifetime parameters are not supported",
            ));
        }

        let meta = RecordMeta::new(attrs, &input.ident, &input.generics);

        match &input.data {
            Data::Struct(data) => {
                let Fields::Named(named) = &data.fields else {
                    return Err(syn::Error::new(
                        data.fields.span(),
                        "`Record` can only be derived for structs with named fields",
                    ));
                };
                let fields = named
                    .named
                    .iter()
                    .map(RecordField::new)
                    .collect::<syn::Result<Vec<_>>>()?;
                Ok(Self::Struct(RecordStruct { meta, fields }))
            }
            Data::Enum(data) => {
                if let Some(span) = meta.attrs().auto_register {
                    return Err(syn::Error::new(
                        span,
                        "`auto_register` applies to records, not enums",
                    ));
                }
                for variant in &data.variants {
                    if !matches!(variant.fields, Fields::Unit) {
                        return Err(syn::Error::new(
                            variant.fields.span(),
                            "`Record` enums are encoded by name and cannot carry fields",
                        ));
                    }
                    if let Some(attr) = variant
                        .attrs
                        .iter()
                        .find(|attr| attr.path().is_ident(RECORD_ATTRIBUTE_NAME))
                    {
                        return Err(syn::Error::new(
                            attr.span(),
                            "`#[record(...)]` is not supported on variants",
                        ));
                    }
                }
                let variants = data.variants.iter().collect();
                Ok(Self::Enum(RecordEnum { meta, variants }))
            }
            Data::Union(data) => Err(syn::Error::new(
                data.union_token.span,
                "`Record` cannot be derived for unions",
            )),
        }
    }
}

impl<'a> RecordField<'a> {
    fn new(data: &'a Field) -> syn::Result<Self> {
        let ident = data
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new(data.span(), "expected a named field"))?;
        Ok(Self {
            data,
            ident,
            attrs: FieldAttributes::parse_attrs(&data.attrs)?,
        })
    }

    /// Name used in descriptors and on the wire.
    pub fn name(&self) -> String {
        self.ident.unraw().to_string()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.attrs.skip.is_none()
    }
}

impl<'a> RecordStruct<'a> {
    /// Fields visible to reflection, in declaration order.
    pub fn active_fields(&self) -> impl Iterator<Item = &RecordField<'a>> {
        self.fields.iter().filter(|field| field.is_active())
    }
}
