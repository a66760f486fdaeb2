// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surface materials referenced by mesh nodes.
//!
//! [`Material`] is a tagged enum over the concrete material kinds; the tag is
//! written as the `type` member so renderers can pick the right loader.
//! Only the Phong surface model is produced by the exporter.

use serde::{Deserialize, Serialize};

/// Packed `0xRRGGBB` white.
pub const WHITE: u32 = 0xFF_FF_FF;

/// Default three.js specular tint (very dark grey).
pub const DEFAULT_SPECULAR: u32 = 0x11_11_11;

/// Pack 8-bit channels into a `0xRRGGBB` integer.
#[inline]
pub fn pack_rgb(red: u8, green: u8, blue: u8) -> u32 {
    (u32::from(red) << 16) | (u32::from(green) << 8) | u32::from(blue)
}

/// A material entry of the scene's flat material list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Material {
    MeshPhongMaterial(MeshPhongMaterial),
}

impl Material {
    pub fn uuid(&self) -> &str {
        match self {
            Material::MeshPhongMaterial(m) => &m.uuid,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Material::MeshPhongMaterial(m) => &m.name,
        }
    }

    /// Type tag written to JSON.
    pub fn type_name(&self) -> &'static str {
        match self {
            Material::MeshPhongMaterial(_) => "MeshPhongMaterial",
        }
    }
}

impl From<MeshPhongMaterial> for Material {
    fn from(material: MeshPhongMaterial) -> Self {
        Material::MeshPhongMaterial(material)
    }
}

/// Blinn-Phong surface with specular highlights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshPhongMaterial {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    pub color: u32,
    pub ambient: u32,
    pub emissive: u32,
    pub specular: u32,
    pub shininess: u32,
    /// 0.0 is fully transparent, 1.0 fully opaque.
    pub opacity: f64,
    pub transparent: bool,
    pub wireframe: bool,
}

impl MeshPhongMaterial {
    /// Create a material with three.js defaults.
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: String::new(),
            color: WHITE,
            ambient: WHITE,
            emissive: 0,
            specular: DEFAULT_SPECULAR,
            shininess: 30,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
        }
    }

    /// Create a flat-tinted surface from a packed color and a transparency
    /// percentage (0 = opaque, 100 = invisible).
    pub fn from_surface(uuid: impl Into<String>, color: u32, transparency_percent: f64) -> Self {
        Self {
            color,
            ambient: color,
            emissive: 0,
            specular: color,
            shininess: 1,
            opacity: (100.0 - transparency_percent) / 100.0,
            transparent: transparency_percent > 0.0,
            wireframe: false,
            ..Self::new(uuid)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn packs_rgb_channels() {
        assert_eq!(pack_rgb(255, 0, 0), 0xFF0000);
        assert_eq!(pack_rgb(0x12, 0x34, 0x56), 0x123456);
    }

    #[test]
    fn surface_opacity_from_transparency() {
        let opaque = MeshPhongMaterial::from_surface("a", 0xFF0000, 0.0);
        assert_relative_eq!(opaque.opacity, 1.0);
        assert!(!opaque.transparent);
        assert_eq!(opaque.ambient, 0xFF0000);
        assert_eq!(opaque.specular, 0xFF0000);
        assert_eq!(opaque.shininess, 1);

        let glass = MeshPhongMaterial::from_surface("b", 0x00FF00, 75.0);
        assert_relative_eq!(glass.opacity, 0.25);
        assert!(glass.transparent);
        assert!(!glass.wireframe);
    }

    #[test]
    fn serializes_with_type_tag() {
        let material: Material = MeshPhongMaterial::from_surface("m-1", 0x0000FF, 0.0)
            .with_name("Glass")
            .into();
        let json = serde_json::to_value(&material).unwrap();
        assert_eq!(json["type"], "MeshPhongMaterial");
        assert_eq!(json["uuid"], "m-1");
        assert_eq!(json["name"], "Glass");
        assert_eq!(json["color"], 255);

        let back: Material = serde_json::from_value(json).unwrap();
        assert_eq!(back, material);
        assert_eq!(back.type_name(), "MeshPhongMaterial");
    }
}
