use replica_serde::{ByteReader, ByteWrite, Serde, SerdeErr};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn components(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Quat = Quat::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    fn components(&self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Linear RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    fn components(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

pub(crate) trait FloatComponents {
    fn all_finite(&self) -> bool;
}

macro_rules! impl_float_struct {
    ($ty:ident, $($field:ident),+) => {
        impl FloatComponents for $ty {
            fn all_finite(&self) -> bool {
                self.components().iter().all(|c| c.is_finite())
            }
        }

        impl Serde for $ty {
            fn ser(&self, writer: &mut dyn ByteWrite) {
                for component in self.components() {
                    component.ser(writer);
                }
            }

            fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                Ok(Self {
                    $($field: f32::de(reader)?,)+
                })
            }

            fn byte_length(&self) -> usize {
                4 * self.components().len()
            }
        }
    };
}

impl_float_struct!(Vec3, x, y, z);
impl_float_struct!(Quat, x, y, z, w);
impl_float_struct!(Color, r, g, b, a);
