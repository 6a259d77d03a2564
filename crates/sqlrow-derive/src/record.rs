use darling::ast::Data;
use darling::util::Override;
use darling::{Error as DarlingError, FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::{DeriveInput, Generics, Ident, Type};

///
/// RecordInput
///

#[derive(FromDeriveInput)]
#[darling(attributes(sqlrow), supports(struct_named))]
struct RecordInput {
    ident: Ident,
    generics: Generics,
    data: Data<(), RecordField>,
}

///
/// RecordField
///
/// Per-field attributes. Exactly one of `col`, `nested`, `flatten` makes
/// the field participate; the bare forms `#[sqlrow(col)]` and
/// `#[sqlrow(nested)]` use the field identifier as the tag.
///

#[derive(FromField)]
#[darling(attributes(sqlrow))]
struct RecordField {
    ident: Option<Ident>,
    ty: Type,

    #[darling(default)]
    col: Option<Override<String>>,

    #[darling(default)]
    nested: Option<Override<String>>,

    #[darling(default)]
    flatten: bool,
}

enum FieldRole {
    Leaf { tag: String },
    Nested { tag: String },
    Flattened,
    Skipped,
}

impl RecordField {
    fn role(&self) -> Result<FieldRole, DarlingError> {
        let picked =
            usize::from(self.col.is_some()) + usize::from(self.nested.is_some()) + usize::from(self.flatten);
        if picked > 1 {
            return Err(DarlingError::custom(
                "only one of `col`, `nested`, `flatten` may be set on a field",
            )
            .with_span(&self.ident));
        }

        if let Some(col) = &self.col {
            return Ok(match self.tag(col) {
                Some(tag) => FieldRole::Leaf { tag },
                None => FieldRole::Skipped,
            });
        }
        if let Some(nested) = &self.nested {
            return Ok(match self.tag(nested) {
                Some(tag) => FieldRole::Nested { tag },
                None => FieldRole::Skipped,
            });
        }
        if self.flatten {
            return Ok(FieldRole::Flattened);
        }
        Ok(FieldRole::Skipped)
    }

    /// Resolve the column tag. `""` and `"-"` exclude the field; tags are
    /// used bytewise, with no renaming.
    fn tag(&self, value: &Override<String>) -> Option<String> {
        let tag = match value {
            Override::Explicit(tag) => tag.clone(),
            Override::Inherit => self.ident.as_ref()?.to_string(),
        };
        if tag.is_empty() || tag == "-" {
            return None;
        }
        Some(tag)
    }
}

// derive_record
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let input = match RecordInput::from_derive_input(&input) {
        Ok(input) => input,
        Err(err) => return err.write_errors(),
    };

    match expand(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.write_errors(),
    }
}

fn expand(input: &RecordInput) -> Result<TokenStream, DarlingError> {
    let ident = &input.ident;
    let ident_str = ident.to_string();

    if !input.generics.params.is_empty() {
        return Err(
            DarlingError::custom("Record cannot be derived for generic structs").with_span(ident),
        );
    }

    let fields = match &input.data {
        Data::Struct(fields) => &fields.fields,
        Data::Enum(_) => {
            return Err(DarlingError::custom(
                "Record can only be derived for structs with named fields",
            )
            .with_span(ident));
        }
    };

    let mut metas = Vec::new();
    let mut mut_arms = Vec::new();
    let mut ref_arms = Vec::new();

    for field in fields {
        let role = field.role()?;
        let field_ident = field.ident.as_ref().ok_or_else(|| {
            DarlingError::custom("Record requires named fields").with_span(ident)
        })?;
        let ty = &field.ty;
        let index = metas.len();

        match role {
            FieldRole::Leaf { tag } => {
                let ty_str = type_name(ty);
                metas.push(quote! {
                    ::sqlrow::traits::FieldMeta {
                        tag: #tag,
                        kind: ::sqlrow::traits::FieldKind::Leaf {
                            nilable: <#ty as ::sqlrow::traits::Column>::NILABLE,
                            ty: #ty_str,
                        },
                    }
                });
                mut_arms.push(quote! {
                    #index => ::sqlrow::traits::FieldMut::Leaf(&mut self.#field_ident),
                });
                ref_arms.push(quote! {
                    #index => ::sqlrow::traits::FieldRef::Leaf(&self.#field_ident),
                });
            }
            FieldRole::Nested { tag } => {
                metas.push(quote! {
                    ::sqlrow::traits::FieldMeta {
                        tag: #tag,
                        kind: ::sqlrow::traits::FieldKind::Record {
                            nilable: <#ty as ::sqlrow::traits::NestedRecord>::NILABLE,
                            fields: <<#ty as ::sqlrow::traits::NestedRecord>::Target
                                as ::sqlrow::traits::Record>::fields,
                        },
                    }
                });
                mut_arms.push(quote! {
                    #index => ::sqlrow::traits::FieldMut::Record(&mut self.#field_ident),
                });
                ref_arms.push(quote! {
                    #index => ::sqlrow::traits::FieldRef::Record,
                });
            }
            FieldRole::Flattened => {
                metas.push(quote! {
                    ::sqlrow::traits::FieldMeta {
                        tag: "",
                        kind: ::sqlrow::traits::FieldKind::Flattened {
                            fields: <#ty as ::sqlrow::traits::Record>::fields,
                        },
                    }
                });
                mut_arms.push(quote! {
                    #index => ::sqlrow::traits::FieldMut::Flattened(&mut self.#field_ident),
                });
                ref_arms.push(quote! {
                    #index => ::sqlrow::traits::FieldRef::Flattened(&self.#field_ident),
                });
            }
            FieldRole::Skipped => {}
        }
    }

    Ok(quote! {
        impl ::sqlrow::traits::Record for #ident {
            fn fields() -> &'static [::sqlrow::traits::FieldMeta] {
                const FIELDS: &[::sqlrow::traits::FieldMeta] = &[#(#metas),*];
                FIELDS
            }

            fn field_mut(&mut self, index: usize) -> ::sqlrow::traits::FieldMut<'_> {
                match index {
                    #(#mut_arms)*
                    other => panic!("field index {other} out of range for `{}`", #ident_str),
                }
            }

            fn field_ref(&self, index: usize) -> ::sqlrow::traits::FieldRef<'_> {
                match index {
                    #(#ref_arms)*
                    other => panic!("field index {other} out of range for `{}`", #ident_str),
                }
            }
        }

        impl ::sqlrow::traits::NestedRecord for #ident {
            const NILABLE: bool = false;
            type Target = Self;

            fn clear(&mut self) {
                *self = Self::default();
            }

            fn materialize(&mut self) -> &mut dyn ::sqlrow::traits::RecordDyn {
                self
            }
        }
    })
}

fn type_name(ty: &Type) -> String {
    ty.to_token_stream().to_string().replace(' ', "")
}
