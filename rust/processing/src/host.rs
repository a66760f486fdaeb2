// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host application boundary.
//!
//! The exporter never talks to the authoring tool directly. It reads elements,
//! categories, parameters and persisted materials through the [`Document`]
//! trait; the value types below are the plain data handed across it.

use objscene_core::material::pack_rgb;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric element handle inside one host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub i64);

impl ElementId {
    /// The host's "no element" sentinel.
    pub const INVALID: ElementId = ElementId(-1);

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Packed `0xRRGGBB` value.
    #[inline]
    pub fn to_packed(self) -> u32 {
        pack_rgb(self.red, self.green, self.blue)
    }
}

/// How a parameter stores its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    #[default]
    None,
    Integer,
    Double,
    String,
    ElementId,
}

/// Built-in descriptive parameters harvested into node user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuiltInParameter {
    Manufacturer,
    Model,
    Description,
    InstanceComments,
    TypeComments,
}

/// A named parameter value on an element or family symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Definition name, used as the user data key.
    pub name: String,
    #[serde(default)]
    pub storage_type: StorageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    /// Display string with units, as the host would format it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_value: Option<String>,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub built_in: Option<BuiltInParameter>,
}

impl Parameter {
    /// A string-storage parameter.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage_type: StorageType::String,
            string_value: Some(value.into()),
            ..Self::default()
        }
    }

    /// A numeric parameter carrying only its formatted display value.
    pub fn formatted(
        name: impl Into<String>,
        storage_type: StorageType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            storage_type,
            formatted_value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn shared(mut self) -> Self {
        self.is_shared = true;
        self
    }

    pub fn with_built_in(mut self, built_in: BuiltInParameter) -> Self {
        self.built_in = Some(built_in);
        self
    }

    /// Value written to user data: the raw string for string storage, the
    /// formatted value otherwise. Blank values yield `None`.
    pub fn display_value(&self) -> Option<&str> {
        let value = match self.storage_type {
            StorageType::String => self.string_value.as_deref(),
            _ => self.formatted_value.as_deref(),
        }?;
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

fn find_built_in(parameters: &[Parameter], built_in: BuiltInParameter) -> Option<&Parameter> {
    parameters.iter().find(|p| p.built_in == Some(built_in))
}

/// Element category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Default material applied to elements of this category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<ElementId>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: None,
        }
    }

    pub fn with_material(mut self, material: ElementId) -> Self {
        self.material = Some(material);
        self
    }
}

/// Family type a family instance was placed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilySymbol {
    /// Type (symbol) name.
    pub name: String,
    pub family_name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl FamilySymbol {
    pub fn new(family_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family_name: family_name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameter(&self, built_in: BuiltInParameter) -> Option<&Parameter> {
        find_built_in(&self.parameters, built_in)
    }
}

/// Broad class of a host element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    #[default]
    Generic,
    FamilyInstance,
    Level,
    View,
}

/// A host model element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Stable unique id, used as the node UUID.
    pub unique_id: String,
    #[serde(default)]
    pub name: String,
    /// Host class name, e.g. `FamilyInstance` or `Wall`.
    #[serde(default)]
    pub type_name: String,
    #[serde(default)]
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<FamilySymbol>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Materials used by the element's geometry.
    #[serde(default)]
    pub material_ids: Vec<ElementId>,
}

impl Element {
    pub fn new(id: i64, unique_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ElementId(id),
            unique_id: unique_id.into(),
            name: name.into(),
            type_name: "Element".into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: ElementKind, type_name: impl Into<String>) -> Self {
        self.kind = kind;
        self.type_name = type_name.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Make this a family instance of `symbol`.
    pub fn with_symbol(mut self, symbol: FamilySymbol) -> Self {
        self.kind = ElementKind::FamilyInstance;
        self.type_name = "FamilyInstance".into();
        self.symbol = Some(symbol);
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_materials(mut self, materials: impl IntoIterator<Item = ElementId>) -> Self {
        self.material_ids.extend(materials);
        self
    }

    pub fn is_level(&self) -> bool {
        self.kind == ElementKind::Level
    }

    /// The symbol of a family instance; `None` for other elements.
    pub fn family_symbol(&self) -> Option<&FamilySymbol> {
        match self.kind {
            ElementKind::FamilyInstance => self.symbol.as_ref(),
            _ => None,
        }
    }

    pub fn parameter(&self, built_in: BuiltInParameter) -> Option<&Parameter> {
        find_built_in(&self.parameters, built_in)
    }

    /// Human readable label: `"{type} {category} {family} {symbol} <{id} {name}>"`.
    ///
    /// The symbol is omitted when the element name equals its type name.
    pub fn description(&self) -> String {
        let category = self.category.as_ref().map_or("", |c| c.name.as_str());
        let symbol = self.family_symbol();
        let family = symbol.map_or("", |s| s.family_name.as_str());

        let description = if self.name == self.type_name {
            format!("{} {} {}", self.type_name, category, family)
        } else {
            let symbol = symbol.map_or("", |s| s.name.as_str());
            format!("{} {} {} {}", self.type_name, category, family, symbol)
        };
        let description = description.replace("  ", " ");
        format!("{} <{} {}>", description.trim_end(), self.id, self.name)
    }
}

/// A material element persisted in the host document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedMaterial {
    pub id: ElementId,
    pub unique_id: String,
    #[serde(default)]
    pub name: String,
    pub color: Color,
    /// Transparency percentage, 0 (opaque) to 100.
    #[serde(default)]
    pub transparency: u8,
}

impl PersistedMaterial {
    pub fn new(id: i64, unique_id: impl Into<String>, name: impl Into<String>, color: Color) -> Self {
        Self {
            id: ElementId(id),
            unique_id: unique_id.into(),
            name: name.into(),
            color,
            transparency: 0,
        }
    }

    pub fn with_transparency(mut self, transparency: u8) -> Self {
        self.transparency = transparency.min(100);
        self
    }
}

/// Read access to a host document.
pub trait Document {
    fn title(&self) -> &str;

    fn is_family_document(&self) -> bool;

    /// The view used when the export does not name one.
    fn active_view(&self) -> Option<&Element>;

    fn element(&self, id: ElementId) -> Option<&Element>;

    fn element_by_unique_id(&self, unique_id: &str) -> Option<&Element>;

    fn material(&self, id: ElementId) -> Option<&PersistedMaterial>;

    fn material_by_unique_id(&self, unique_id: &str) -> Option<&PersistedMaterial>;
}
