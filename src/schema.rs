//! Vertex record schemas.
//!
//! A [`VertexSchema`] is an ordered list of typed fields. Field offsets are
//! computed once, as fields are declared, and every record packed under the
//! schema shares the same layout. Fields are packed back to back with no
//! padding, so the stride is the sum of the field widths.
//!
//! ```ignore
//! let mut schema = VertexSchema::new();
//! schema.declare_attrib("color", FieldType::Unorm8x4, FieldKind::Color);
//! schema.declare_attrib("position", FieldType::Float32x2, FieldKind::Position);
//! let stride = schema.declare_attrib("point_size", FieldType::Float32, FieldKind::PointSize);
//! assert_eq!(stride, 16);
//! ```

/// Binary type of a vertex field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Four normalized bytes, typically RGBA with red in the lowest byte.
    Unorm8x4,
    Float32,
    Float32x2,
    Float32x3,
    Float32x4,
    Uint32,
    Sint32,
}

impl FieldType {
    /// Width of the field in bytes.
    pub const fn byte_width(self) -> usize {
        match self {
            FieldType::Unorm8x4 => 4,
            FieldType::Float32 => 4,
            FieldType::Float32x2 => 8,
            FieldType::Float32x3 => 12,
            FieldType::Float32x4 => 16,
            FieldType::Uint32 => 4,
            FieldType::Sint32 => 4,
        }
    }

    /// Matching wgpu vertex format.
    pub fn vertex_format(self) -> wgpu::VertexFormat {
        match self {
            FieldType::Unorm8x4 => wgpu::VertexFormat::Unorm8x4,
            FieldType::Float32 => wgpu::VertexFormat::Float32,
            FieldType::Float32x2 => wgpu::VertexFormat::Float32x2,
            FieldType::Float32x3 => wgpu::VertexFormat::Float32x3,
            FieldType::Float32x4 => wgpu::VertexFormat::Float32x4,
            FieldType::Uint32 => wgpu::VertexFormat::Uint32,
            FieldType::Sint32 => wgpu::VertexFormat::Sint32,
        }
    }

    /// WGSL type the vertex stage sees for this field.
    pub fn wgsl_type(self) -> &'static str {
        match self {
            // unorm attributes are expanded to floats by the vertex fetch
            FieldType::Unorm8x4 => "vec4<f32>",
            FieldType::Float32 => "f32",
            FieldType::Float32x2 => "vec2<f32>",
            FieldType::Float32x3 => "vec3<f32>",
            FieldType::Float32x4 => "vec4<f32>",
            FieldType::Uint32 => "u32",
            FieldType::Sint32 => "i32",
        }
    }
}

/// What a field means to the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FieldKind {
    #[default]
    Generic,
    Color,
    Position,
    TexCoord,
    PointSize,
}

/// One declared field and its byte offset within the record.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexField {
    pub name: String,
    pub ty: FieldType,
    pub kind: FieldKind,
    pub offset: usize,
}

impl VertexField {
    /// Width of the field in bytes.
    pub fn width(&self) -> usize {
        self.ty.byte_width()
    }
}

/// Ordered, tightly packed record layout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexSchema {
    fields: Vec<VertexField>,
    stride: usize,
}

impl VertexSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a generic field at the current end of the record.
    ///
    /// Returns the running stride after the field is added.
    pub fn declare_field(&mut self, name: &str, ty: FieldType) -> usize {
        self.declare_attrib(name, ty, FieldKind::Generic)
    }

    /// Append a field with a semantic kind.
    ///
    /// Returns the running stride after the field is added.
    pub fn declare_attrib(&mut self, name: &str, ty: FieldType, kind: FieldKind) -> usize {
        self.fields.push(VertexField {
            name: name.to_string(),
            ty,
            kind,
            offset: self.stride,
        });
        self.stride += ty.byte_width();
        self.stride
    }

    /// Size of one record in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[VertexField] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&VertexField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Byte offset of a named field.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.field(name).map(|f| f.offset)
    }

    /// First field with the given kind.
    pub fn field_of_kind(&self, kind: FieldKind) -> Option<&VertexField> {
        self.fields.iter().find(|f| f.kind == kind)
    }

    /// Record stride as a wgpu buffer address.
    pub fn array_stride(&self) -> wgpu::BufferAddress {
        self.stride as wgpu::BufferAddress
    }

    /// Vertex attributes for a render pipeline, one shader location per field
    /// starting at `first_location`.
    pub fn vertex_attributes(&self, first_location: u32) -> Vec<wgpu::VertexAttribute> {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, field)| wgpu::VertexAttribute {
                format: field.ty.vertex_format(),
                offset: field.offset as wgpu::BufferAddress,
                shader_location: first_location + i as u32,
            })
            .collect()
    }

    /// WGSL vertex-input struct matching [`vertex_attributes`](Self::vertex_attributes).
    pub fn wgsl_vertex_input(&self, struct_name: &str, first_location: u32) -> String {
        let fields = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                format!(
                    "    @location({}) {}: {},",
                    first_location + i as u32,
                    field.name,
                    field.ty.wgsl_type()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("struct {} {{\n{}\n}}", struct_name, fields)
    }
}
