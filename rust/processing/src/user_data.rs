// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Descriptive parameters copied into element user data.

use crate::config::ExportConfig;
use crate::host::{BuiltInParameter, Element, FamilySymbol, Parameter};

/// Built-in fields harvested before shared parameters, in this order.
pub const HARVESTED_BUILT_INS: [BuiltInParameter; 5] = [
    BuiltInParameter::Manufacturer,
    BuiltInParameter::Model,
    BuiltInParameter::Description,
    BuiltInParameter::InstanceComments,
    BuiltInParameter::TypeComments,
];

/// Decides which family instances get user data and what it contains.
#[derive(Debug, Clone)]
pub struct MetadataPolicy {
    family_patterns: Vec<String>,
    excluded_shared_prefix: String,
}

impl MetadataPolicy {
    pub fn new(family_patterns: &[String], excluded_shared_prefix: &str) -> Self {
        Self {
            family_patterns: family_patterns
                .iter()
                .filter(|p| !p.is_empty())
                .map(|p| p.to_lowercase())
                .collect(),
            excluded_shared_prefix: excluded_shared_prefix.to_lowercase(),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(
            &config.metadata_family_patterns,
            &config.excluded_shared_prefix,
        )
    }

    /// The element's symbol when it is a family instance whose family name
    /// contains one of the patterns.
    pub fn matching_symbol<'e>(&self, element: &'e Element) -> Option<&'e FamilySymbol> {
        let symbol = element.family_symbol()?;
        let family = symbol.family_name.to_lowercase();
        self.family_patterns
            .iter()
            .any(|pattern| family.contains(pattern.as_str()))
            .then_some(symbol)
    }

    /// Key/value pairs to merge into user data; later pairs win on key clashes.
    pub fn harvest(&self, element: &Element, symbol: &FamilySymbol) -> Vec<(String, String)> {
        let built_ins = HARVESTED_BUILT_INS.iter().filter_map(|&built_in| {
            symbol
                .parameter(built_in)
                .or_else(|| element.parameter(built_in))
                .and_then(entry)
        });

        let mut shared: Vec<(String, String)> = element
            .parameters
            .iter()
            .filter(|p| p.is_shared && !self.is_excluded(&p.name))
            .filter_map(entry)
            .collect();
        shared.sort_by(|a, b| a.0.cmp(&b.0));

        built_ins.chain(shared).collect()
    }

    fn is_excluded(&self, name: &str) -> bool {
        !self.excluded_shared_prefix.is_empty()
            && name.to_lowercase().starts_with(&self.excluded_shared_prefix)
    }
}

fn entry(parameter: &Parameter) -> Option<(String, String)> {
    if parameter.name.trim().is_empty() {
        return None;
    }
    let value = parameter.display_value()?;
    Some((parameter.name.clone(), value.to_string()))
}
