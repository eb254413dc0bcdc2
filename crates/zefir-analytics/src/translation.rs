//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Display-name resolution for technologies, fuels, stacks and energy types."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;
use zefir_common::TranslationPaths;
use zefir_engine::model::Network;

use crate::errors::{AnalyticsError, Result};

/// Identifier to display-name mapping.
pub type Lookup = IndexMap<String, String>;

/// Read a JSON object of identifier/display-name pairs.
pub fn load_lookup(path: impl AsRef<Path>) -> Result<Lookup> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json || !path.is_file() {
        return Err(AnalyticsError::LookupResource {
            path: path.to_path_buf(),
        });
    }
    let data = fs::read_to_string(path)?;
    let lookup: Lookup = serde_json::from_str(&data)?;
    debug!(path = %path.display(), entries = lookup.len(), "translation lookup loaded");
    Ok(lookup)
}

/// `id -> lookup[id]`, falling back to the id itself.
pub fn translate_names<'a, I>(lookup: &Lookup, ids: I) -> IndexMap<String, String>
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter()
        .map(|id| {
            let name = lookup.get(id).map(String::as_str).unwrap_or(id);
            (id.to_owned(), name.to_owned())
        })
        .collect()
}

/// `id -> lookup[tag]`, falling back to the tag itself.
pub fn translate_tagged(
    lookup: &Lookup,
    id_to_tag: &IndexMap<String, String>,
) -> IndexMap<String, String> {
    id_to_tag
        .iter()
        .map(|(id, tag)| {
            let name = lookup.get(tag).unwrap_or(tag);
            (id.clone(), name.clone())
        })
        .collect()
}

/// First tag of every generator and storage type that has any.
pub fn primary_tag_map(network: &Network) -> IndexMap<String, String> {
    let generator_tags = network
        .generator_types
        .iter()
        .map(|(name, ty)| (name, ty.tags.first()));
    let storage_tags = network
        .storage_types
        .iter()
        .map(|(name, ty)| (name, ty.tags.first()));
    generator_tags
        .chain(storage_tags)
        .filter_map(|(name, tag)| tag.map(|tag| (name.clone(), tag.clone())))
        .collect()
}

/// Raw lookups before they are bound to a network.
#[derive(Debug, Clone, Default)]
pub struct TranslationLookups {
    pub tags: Lookup,
    pub names: Lookup,
    pub fuels: Lookup,
    pub lbs: Lookup,
    pub energy: Lookup,
}

impl TranslationLookups {
    pub fn load(paths: &TranslationPaths) -> Result<Self> {
        Ok(Self {
            tags: load_lookup(&paths.tags)?,
            names: load_lookup(&paths.names)?,
            fuels: load_lookup(&paths.fuels)?,
            lbs: load_lookup(&paths.lbs)?,
            energy: load_lookup(&paths.energy)?,
        })
    }
}

/// Translation maps of one network, built once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct NameTranslator {
    primary_tags: IndexMap<String, String>,
    tags: IndexMap<String, String>,
    names: IndexMap<String, String>,
    fuels: IndexMap<String, String>,
    lbs: IndexMap<String, String>,
    energy: IndexMap<String, String>,
}

impl NameTranslator {
    pub fn build(network: &Network, lookups: &TranslationLookups) -> Self {
        let primary_tags = primary_tag_map(network);
        let tags = translate_tagged(&lookups.tags, &primary_tags);
        let type_names = network
            .generator_types
            .keys()
            .chain(network.storage_types.keys())
            .map(String::as_str);
        Self {
            tags,
            names: translate_names(&lookups.names, type_names),
            fuels: translate_names(&lookups.fuels, network.fuels.keys().map(String::as_str)),
            lbs: translate_names(
                &lookups.lbs,
                network.local_balancing_stacks.keys().map(String::as_str),
            ),
            energy: translate_names(&lookups.energy, network.energy_types.iter().map(String::as_str)),
            primary_tags,
        }
    }

    /// Untranslated primary tag per technology type.
    pub fn primary_tags(&self) -> &IndexMap<String, String> {
        &self.primary_tags
    }

    /// Translated primary tag per technology type.
    pub fn tags(&self) -> &IndexMap<String, String> {
        &self.tags
    }

    pub fn names(&self) -> &IndexMap<String, String> {
        &self.names
    }

    pub fn fuels(&self) -> &IndexMap<String, String> {
        &self.fuels
    }

    pub fn lbs(&self) -> &IndexMap<String, String> {
        &self.lbs
    }

    pub fn energy(&self) -> &IndexMap<String, String> {
        &self.energy
    }

    pub fn name<'a>(&'a self, type_name: &'a str) -> &'a str {
        lookup_or_self(&self.names, type_name)
    }

    pub fn fuel<'a>(&'a self, fuel: &'a str) -> &'a str {
        lookup_or_self(&self.fuels, fuel)
    }

    pub fn stack<'a>(&'a self, stack: &'a str) -> &'a str {
        lookup_or_self(&self.lbs, stack)
    }

    pub fn energy_type<'a>(&'a self, energy_type: &'a str) -> &'a str {
        lookup_or_self(&self.energy, energy_type)
    }

    /// Translated technology name to translated primary tag.
    pub fn tags_map(&self) -> IndexMap<String, String> {
        self.tags
            .iter()
            .map(|(ty, tag)| (self.name(ty).to_owned(), tag.clone()))
            .collect()
    }
}

fn lookup_or_self<'a>(map: &'a IndexMap<String, String>, key: &'a str) -> &'a str {
    map.get(key).map(String::as_str).unwrap_or(key)
}
