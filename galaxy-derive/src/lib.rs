//! Derive macros for galaxy vertex records.
//!
//! This crate provides one derive macro, [`Vertex`], which turns a plain Rust
//! struct into a tightly packed GPU vertex record.
//!
//! # Usage
//!
//! The macro is re-exported from the main `galaxy` crate. You don't need to
//! add this crate directly:
//!
//! ```ignore
//! use galaxy::prelude::*;
//!
//! #[derive(Vertex, Clone, Default)]
//! struct Star {
//!     #[vertex(color)]
//!     color: u32,
//!     #[vertex(position)]
//!     position: Vec2,
//!     #[vertex(point_size)]
//!     point_size: f32,
//! }
//! ```
//!
//! # Layout
//!
//! Unlike WGSL storage structs, vertex buffers are read attribute by attribute,
//! so fields are packed back to back in declaration order with no padding:
//!
//! | Rust Type | Field Type | Size |
//! |-----------|------------|------|
//! | `u32` with `#[vertex(color)]` | `Unorm8x4` | 4 bytes |
//! | `[u8; 4]` | `Unorm8x4` | 4 bytes |
//! | `u32` | `Uint32` | 4 bytes |
//! | `i32` | `Sint32` | 4 bytes |
//! | `f32` | `Float32` | 4 bytes |
//! | `Vec2` | `Float32x2` | 8 bytes |
//! | `Vec3` | `Float32x3` | 12 bytes |
//! | `Vec4` | `Float32x4` | 16 bytes |

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, Type};

/// Derive macro for vertex record structs.
///
/// Generates an implementation of `galaxy::VertexTrait`:
///
/// - `schema()` builds a `VertexSchema` with one `declare_attrib` call per
///   field, in declaration order
/// - `STRIDE` is the packed record size in bytes
/// - `pack()` writes every field through a `RecordPacker`
/// - `unpack()` reads a record back through a `RecordReader`
///
/// # The `#[vertex(...)]` Attribute
///
/// Tags a field with its semantic kind: `color`, `position`, `tex_coord` or
/// `point_size`. Untagged fields are generic attributes. A `u32` tagged as
/// `color` is declared as four normalized bytes, red in the lowest byte.
///
/// # Panics
///
/// The macro panics at compile time if:
/// - Applied to an enum or union instead of a struct
/// - Struct uses tuple fields instead of named fields
/// - Any field has an unsupported type
#[proc_macro_derive(Vertex, attributes(vertex))]
pub fn derive_vertex(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("Vertex derive only supports structs with named fields"),
        },
        _ => panic!("Vertex derive only supports structs"),
    };

    let mut declarations = Vec::new();
    let mut writes = Vec::new();
    let mut reads = Vec::new();
    let mut stride = 0usize;

    for field in fields.iter() {
        let field_name = field.ident.as_ref().unwrap();
        let field_name_str = field_name.to_string();

        let mut kind = FieldKind::Generic;
        for attr in &field.attrs {
            if !attr.path().is_ident("vertex") {
                continue;
            }
            let parsed = attr.parse_nested_meta(|meta| {
                kind = if meta.path.is_ident("color") {
                    FieldKind::Color
                } else if meta.path.is_ident("position") {
                    FieldKind::Position
                } else if meta.path.is_ident("tex_coord") {
                    FieldKind::TexCoord
                } else if meta.path.is_ident("point_size") {
                    FieldKind::PointSize
                } else {
                    return Err(meta.error(
                        "expected one of: color, position, tex_coord, point_size",
                    ));
                };
                Ok(())
            });
            if let Err(e) = parsed {
                return e.to_compile_error().into();
            }
        }

        let info = vertex_type_info(&field.ty, kind);
        let field_type = info.field_type;
        let kind_tokens = kind.tokens();
        declarations.push(quote! {
            schema.declare_attrib(#field_name_str, #field_type, #kind_tokens);
        });

        let write = info.write;
        writes.push(quote! { packer.#write(self.#field_name); });

        let read = info.read;
        reads.push(quote! { #field_name: reader.#read() });

        stride += info.size;
    }

    let expanded = quote! {
        impl galaxy::VertexTrait for #name {
            const STRIDE: usize = #stride;

            fn schema() -> galaxy::VertexSchema {
                let mut schema = galaxy::VertexSchema::new();
                #(#declarations)*
                schema
            }

            fn pack(&self, packer: &mut galaxy::RecordPacker) {
                #(#writes)*
            }

            fn unpack(reader: &mut galaxy::RecordReader<'_>) -> Self {
                Self {
                    #(#reads),*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Semantic tag parsed from `#[vertex(...)]`.
#[derive(Clone, Copy, PartialEq)]
enum FieldKind {
    Generic,
    Color,
    Position,
    TexCoord,
    PointSize,
}

impl FieldKind {
    fn tokens(self) -> proc_macro2::TokenStream {
        match self {
            FieldKind::Generic => quote! { galaxy::FieldKind::Generic },
            FieldKind::Color => quote! { galaxy::FieldKind::Color },
            FieldKind::Position => quote! { galaxy::FieldKind::Position },
            FieldKind::TexCoord => quote! { galaxy::FieldKind::TexCoord },
            FieldKind::PointSize => quote! { galaxy::FieldKind::PointSize },
        }
    }
}

/// Layout and codec metadata for one supported field type.
struct TypeInfo {
    /// `galaxy::FieldType` variant
    field_type: proc_macro2::TokenStream,
    /// `RecordPacker` method writing the value
    write: Ident,
    /// `RecordReader` method reading it back
    read: Ident,
    /// Size in bytes
    size: usize,
}

fn vertex_type_info(ty: &Type, kind: FieldKind) -> TypeInfo {
    let type_str = quote!(#ty).to_string().replace(' ', "");

    let (field_type, codec, size) = match type_str.as_str() {
        "u32" if kind == FieldKind::Color => (quote! { galaxy::FieldType::Unorm8x4 }, "u32", 4),
        "[u8;4]" => (quote! { galaxy::FieldType::Unorm8x4 }, "rgba", 4),
        "u32" => (quote! { galaxy::FieldType::Uint32 }, "u32", 4),
        "i32" => (quote! { galaxy::FieldType::Sint32 }, "i32", 4),
        "f32" => (quote! { galaxy::FieldType::Float32 }, "f32", 4),
        "Vec2" | "glam::Vec2" | "galaxy::Vec2" => {
            (quote! { galaxy::FieldType::Float32x2 }, "vec2", 8)
        }
        "Vec3" | "glam::Vec3" | "galaxy::Vec3" => {
            (quote! { galaxy::FieldType::Float32x3 }, "vec3", 12)
        }
        "Vec4" | "glam::Vec4" | "galaxy::Vec4" => {
            (quote! { galaxy::FieldType::Float32x4 }, "vec4", 16)
        }
        _ => panic!("Unsupported type in Vertex struct: {}", type_str),
    };

    TypeInfo {
        field_type,
        write: Ident::new(&format!("write_{}", codec), proc_macro2::Span::call_site()),
        read: Ident::new(&format!("read_{}", codec), proc_macro2::Span::call_site()),
        size,
    }
}
