// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of host materials into Phong surfaces.
//!
//! Persisted materials keep their unique id. Inline appearances have no
//! identity, so their UUID is derived from color and transparency: equal
//! appearances always map to the same registry entry.

use objscene_core::MeshPhongMaterial;
use uuid::Uuid;

use crate::host::PersistedMaterial;
use crate::nodes::MaterialNode;

pub fn persisted_to_phong(material: &PersistedMaterial) -> MeshPhongMaterial {
    MeshPhongMaterial::from_surface(
        material.unique_id.clone(),
        material.color.to_packed(),
        f64::from(material.transparency),
    )
    .with_name(material.name.clone())
}

/// Stable key of an inline appearance, `MaterialNode_{color}_{percent}`.
pub fn inline_material_key(node: &MaterialNode) -> String {
    format!(
        "MaterialNode_{}_{}",
        node.color.to_packed(),
        format_percent(node.transparency * 100.0)
    )
}

/// Deterministic UUID (v5) of an inline appearance.
pub fn inline_material_uuid(node: &MaterialNode) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, inline_material_key(node).as_bytes()).to_string()
}

pub fn inline_to_phong(node: &MaterialNode) -> MeshPhongMaterial {
    MeshPhongMaterial::from_surface(
        inline_material_uuid(node),
        node.color.to_packed(),
        node.transparency * 100.0,
    )
}

/// At most two decimals, trailing zeros dropped.
fn format_percent(value: f64) -> String {
    let text = format!("{:.2}", value + 0.0);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Color, ElementId};
    use approx::assert_relative_eq;

    #[test]
    fn formats_percent_like_the_host() {
        assert_eq!(format_percent(0.0), "0");
        assert_eq!(format_percent(50.0), "50");
        assert_eq!(format_percent(12.5), "12.5");
        assert_eq!(format_percent(33.3333), "33.33");
        assert_eq!(format_percent(100.0), "100");
    }

    #[test]
    fn inline_uuid_is_deterministic() {
        let red = MaterialNode::inline(Color::new(255, 0, 0), 0.0);
        assert_eq!(inline_material_key(&red), "MaterialNode_16711680_0");
        assert_eq!(inline_material_uuid(&red), inline_material_uuid(&red.clone()));

        let glass = MaterialNode::inline(Color::new(255, 0, 0), 0.5);
        assert_ne!(inline_material_uuid(&red), inline_material_uuid(&glass));
        assert!(Uuid::parse_str(&inline_material_uuid(&glass)).is_ok());
    }

    #[test]
    fn inline_material_uses_fractional_transparency() {
        let node = MaterialNode {
            material_id: ElementId::INVALID,
            color: Color::new(0, 0, 255),
            transparency: 0.25,
        };
        let material = inline_to_phong(&node);
        assert_relative_eq!(material.opacity, 0.75);
        assert!(material.transparent);
        assert_eq!(material.color, 0x0000FF);
        assert_eq!(material.shininess, 1);
    }

    #[test]
    fn persisted_material_keeps_identity() {
        let persisted = PersistedMaterial::new(9, "mat-uid", "Glass", Color::new(0, 128, 0))
            .with_transparency(60);
        let material = persisted_to_phong(&persisted);
        assert_eq!(material.uuid, "mat-uid");
        assert_eq!(material.name, "Glass");
        assert_eq!(material.specular, material.color);
        assert_eq!(material.emissive, 0);
        assert_relative_eq!(material.opacity, 0.4);
    }
}
