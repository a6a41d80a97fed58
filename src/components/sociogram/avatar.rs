use std::collections::HashMap;

use log::warn;
use web_sys::HtmlImageElement;

use super::types::Character;

/// Portrait images keyed by character id.
///
/// Images load in the background; the renderer polls [`AvatarCache::ready`]
/// every frame and draws the placeholder until the image has decoded. A
/// portrait that fails to load never becomes ready and is not retried.
#[derive(Default)]
pub struct AvatarCache {
	images: HashMap<String, (String, HtmlImageElement)>,
}

impl AvatarCache {
	pub fn sync(&mut self, characters: &[Character]) {
		self.images.retain(|id, (url, _)| {
			characters
				.iter()
				.any(|c| &c.id == id && c.image_url.as_deref() == Some(url.as_str()))
		});

		for character in characters {
			let Some(url) = &character.image_url else {
				continue;
			};
			if self.images.contains_key(&character.id) {
				continue;
			}
			match HtmlImageElement::new() {
				Ok(img) => {
					img.set_src(url);
					self.images.insert(character.id.clone(), (url.clone(), img));
				}
				Err(err) => warn!("avatar for {} not created: {:?}", character.id, err),
			}
		}
	}

	pub fn ready(&self, id: &str) -> Option<&HtmlImageElement> {
		self.images
			.get(id)
			.map(|(_, img)| img)
			.filter(|img| img.complete() && img.natural_width() > 0)
	}
}
