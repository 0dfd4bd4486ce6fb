use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::identifier::ImageIdentifier;
use crate::provider::{GraphicKind, InlineImage, InlineImageProvider, Responder, SpriteRect, Ticket};

/// Synchronous provider backed by the filesystem.
///
/// Plain paths are probed for their pixel size. `path#name` looks the name up
/// in sprite rectangles registered for that atlas path; the atlas file itself
/// is not read.
#[derive(Debug)]
pub struct FileImageProvider {
    root: PathBuf,
    atlases: HashMap<String, HashMap<String, SpriteRect>>,
}

impl FileImageProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            atlases: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn register_sprite(
        &mut self,
        atlas: impl Into<String>,
        name: impl Into<String>,
        rect: SpriteRect,
    ) {
        self.atlases
            .entry(atlas.into())
            .or_default()
            .insert(name.into(), rect);
    }

    fn load(&self, identifier: &ImageIdentifier) -> Result<InlineImage, String> {
        if let Some(name) = &identifier.name {
            let rect = self
                .atlases
                .get(&identifier.path)
                .and_then(|sprites| sprites.get(name))
                .ok_or_else(|| format!("no sprite {name:?} in atlas {:?}", identifier.path))?;
            return Ok(InlineImage {
                width: rect.width,
                height: rect.height,
                kind: GraphicKind::Sprite,
                region: Some(*rect),
            });
        }

        let path = self.root.join(&identifier.path);
        let (width, height) = image::image_dimensions(&path)
            .map_err(|err| format!("{}: {err}", path.display()))?;
        Ok(InlineImage {
            width,
            height,
            kind: GraphicKind::Texture,
            region: None,
        })
    }
}

impl InlineImageProvider for FileImageProvider {
    fn request(&mut self, identifier: &ImageIdentifier, responder: Responder) {
        match self.load(identifier) {
            Ok(image) => responder.send(image),
            Err(message) => responder.send_error(message),
        }
    }

    fn cancel(&mut self, _identifier: &ImageIdentifier, _ticket: Ticket) {
        // Requests are answered inside `request`; there is never anything
        // left to cancel.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImageError;
    use crate::repository::ImageRepository;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("inline-image-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn reads_png_dimensions_from_disk() {
        let dir = scratch_dir("png");
        image::RgbaImage::new(3, 2)
            .save(dir.join("dot.png"))
            .expect("write png");

        let mut repo = ImageRepository::new(FileImageProvider::new(&dir));
        let receiver = repo.allocate_receiver();
        repo.request(&ImageIdentifier::new("dot.png"), receiver);
        let deliveries = repo.pump();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(
            deliveries[0].result,
            Ok(InlineImage {
                width: 3,
                height: 2,
                kind: GraphicKind::Texture,
                region: None,
            })
        );
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn named_sprites_come_from_registered_atlases() {
        let mut provider = FileImageProvider::new("unused");
        let star = SpriteRect {
            x: 8,
            y: 0,
            width: 8,
            height: 8,
        };
        provider.register_sprite("icons.png", "star", star);
        let mut repo = ImageRepository::new(provider);
        let receiver = repo.allocate_receiver();
        repo.request(&ImageIdentifier::parse("icons.png#star"), receiver);
        repo.request(&ImageIdentifier::parse("icons.png#moon"), receiver);

        let deliveries = repo.pump();
        assert_eq!(deliveries.len(), 2);
        assert_eq!(
            deliveries[0].result.as_ref().map(|img| img.region),
            Ok(Some(star))
        );
        assert!(matches!(
            &deliveries[1].result,
            Err(ImageError::Provider { identifier, .. }) if identifier == "icons.png#moon"
        ));
    }

    #[test]
    fn missing_files_answer_with_an_error() {
        let mut repo = ImageRepository::new(FileImageProvider::new(scratch_dir("missing")));
        let receiver = repo.allocate_receiver();
        repo.request(&ImageIdentifier::new("nope.png"), receiver);
        let deliveries = repo.pump();
        assert_eq!(deliveries.len(), 1);
        assert!(deliveries[0].result.is_err(), "got: {:?}", deliveries[0].result);
    }
}
