//! Image selection with preview handles for the review form.
//!
//! SYSTEM CONTEXT
//! ==============
//! The review form lets users pick up to [`MAX_REVIEW_IMAGES`] images and
//! shows a thumbnail for each. Browsers back thumbnails with object URLs that
//! must be revoked, so every preview is created and released through a
//! [`PreviewFactory`] and tied to the lifetime of its entry here.
//!
//! [`MAX_REVIEW_IMAGES`]: super::validation::MAX_REVIEW_IMAGES

#[cfg(test)]
#[path = "image_upload_test.rs"]
mod image_upload_test;

/// Creates and releases preview URLs for selected files.
pub trait PreviewFactory<F> {
    /// Create a displayable URL for `file`.
    fn create(&self, file: &F) -> String;
    /// Release a URL previously returned by [`create`](Self::create).
    fn release(&self, url: &str);
}

/// A selected file and its preview URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage<F> {
    pub file: F,
    pub preview_url: String,
}

/// Bounded, ordered set of selected images.
pub struct ImageSelection<F, P: PreviewFactory<F>> {
    max: usize,
    items: Vec<SelectedImage<F>>,
    previews: P,
}

impl<F, P: PreviewFactory<F>> ImageSelection<F, P> {
    pub fn new(max: usize, previews: P) -> Self {
        Self { max, items: Vec::new(), previews }
    }

    /// Add files up to the remaining capacity; extra files are ignored.
    ///
    /// Returns how many files were accepted.
    pub fn add<I>(&mut self, files: I) -> usize
    where
        I: IntoIterator<Item = F>,
    {
        let room = self.remaining();
        let before = self.items.len();
        for file in files.into_iter().take(room) {
            let preview_url = self.previews.create(&file);
            self.items.push(SelectedImage { file, preview_url });
        }
        self.items.len() - before
    }

    /// Remove the image at `index`, releasing its preview.
    pub fn remove(&mut self, index: usize) -> Option<F> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.previews.release(&removed.preview_url);
        Some(removed.file)
    }

    /// Remove every image, releasing all previews.
    pub fn clear(&mut self) {
        for item in self.items.drain(..) {
            self.previews.release(&item.preview_url);
        }
    }

    pub fn items(&self) -> &[SelectedImage<F>] {
        &self.items
    }

    pub fn files(&self) -> impl Iterator<Item = &F> {
        self.items.iter().map(|i| &i.file)
    }

    pub fn preview_urls(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|i| i.preview_url.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn remaining(&self) -> usize {
        self.max.saturating_sub(self.items.len())
    }

    /// Whether the "add image" control should be shown.
    pub fn can_add_more(&self) -> bool {
        self.remaining() > 0
    }

    /// Counter shown under the picker, e.g. `"2/4"`.
    pub fn counter_label(&self) -> String {
        format!("{}/{}", self.items.len(), self.max)
    }
}

impl<F, P: PreviewFactory<F>> Drop for ImageSelection<F, P> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Object-URL previews for browser `File`s.
#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectUrlPreviews;

#[cfg(feature = "hydrate")]
impl PreviewFactory<web_sys::File> for ObjectUrlPreviews {
    fn create(&self, file: &web_sys::File) -> String {
        web_sys::Url::create_object_url_with_blob(file).unwrap_or_default()
    }

    fn release(&self, url: &str) {
        if !url.is_empty() {
            let _ = web_sys::Url::revoke_object_url(url);
        }
    }
}
