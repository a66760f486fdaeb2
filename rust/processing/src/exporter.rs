// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-shot export of a traversal to a scene or a JSON file.

use objscene_core::ObjectScene;
use std::path::{Path, PathBuf};

use crate::config::ExportConfig;
use crate::error::{Error, Result};
use crate::host::{Document, ElementId};
use crate::scene_context::ObjectSceneExportContext;
use crate::traversal::{replay, TraversalEvent};

/// Output path for one type (variant) of a family file.
///
/// The variant named like the family itself gets `<stem>.json`; every other
/// variant gets `<stem>;<variant>.json` next to the source.
pub fn variant_output_path(source: &Path, variant: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = if variant.to_lowercase() == stem.to_lowercase() {
        format!("{stem}.json")
    } else {
        format!("{stem};{variant}.json")
    };
    source.with_file_name(file_name)
}

pub struct ObjectSceneExporter<'d, D: Document + ?Sized> {
    document: &'d D,
    config: ExportConfig,
}

impl<'d, D: Document + ?Sized> ObjectSceneExporter<'d, D> {
    pub fn new(document: &'d D, config: ExportConfig) -> Result<Self> {
        config.validate()?;
        if document.is_family_document() {
            return Err(Error::FamilyDocument);
        }
        Ok(Self { document, config })
    }

    /// Run the traversal for `view` (or the active view) and return the scene.
    pub fn try_export<I>(&self, view: Option<ElementId>, events: I) -> Result<ObjectScene>
    where
        I: IntoIterator<Item = TraversalEvent>,
    {
        let mut context = ObjectSceneExportContext::new(self.document, view, self.config.clone())?;
        replay(events, &mut context)?;
        context.into_scene().ok_or(Error::SceneMissing)
    }

    /// Export and write the scene as JSON to `path`.
    pub fn export_to_file<I>(
        &self,
        view: Option<ElementId>,
        events: I,
        path: impl AsRef<Path>,
    ) -> Result<PathBuf>
    where
        I: IntoIterator<Item = TraversalEvent>,
    {
        let path = path.as_ref();
        let name = path.to_string_lossy();
        if name.trim().is_empty() || path.file_name().is_none() {
            return Err(Error::InvalidOutputPath(name.into_owned()));
        }

        let scene = self.try_export(view, events)?;
        scene.write_to_file(path)?;
        if !path.exists() {
            return Err(Error::InvalidOutputPath(name.into_owned()));
        }

        tracing::info!(path = %path.display(), "Exported object scene");
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;

    #[test]
    fn variant_paths() {
        let source = Path::new("/lib/doors/Single-Flush.rfa");
        assert_eq!(
            variant_output_path(source, "single-flush"),
            PathBuf::from("/lib/doors/Single-Flush.json")
        );
        assert_eq!(
            variant_output_path(source, "0915 x 2134mm"),
            PathBuf::from("/lib/doors/Single-Flush;0915 x 2134mm.json")
        );
    }

    #[test]
    fn rejects_family_documents_and_bad_config() {
        let mut family = MemoryDocument::new("Door");
        family.set_family_document(true);
        assert!(matches!(
            ObjectSceneExporter::new(&family, ExportConfig::default()),
            Err(Error::FamilyDocument)
        ));

        let project = MemoryDocument::new("Project");
        assert!(matches!(
            ObjectSceneExporter::new(&project, ExportConfig::default().with_level_of_detail(0)),
            Err(Error::InvalidLevelOfDetail(0))
        ));
    }

    #[test]
    fn rejects_blank_output_path() {
        let project = MemoryDocument::new("Project");
        let exporter = ObjectSceneExporter::new(&project, ExportConfig::default()).unwrap();
        assert!(matches!(
            exporter.export_to_file(None, Vec::new(), "  "),
            Err(Error::InvalidOutputPath(_))
        ));
    }
}
