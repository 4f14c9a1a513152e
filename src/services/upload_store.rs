//! Upload storage: extension checking, per-request file slots, and the
//! synthesized default image.
//!
//! Every request gets a fresh hex id, so stored files never collide and
//! concurrent requests cannot overwrite each other's output.

use image::{Rgb, RgbImage};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File extensions accepted for upload, lowercase.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Name of the fallback image inside the upload directory.
pub const DEFAULT_IMAGE: &str = "default.png";

/// Check whether a filename carries an allowed image extension.
///
/// The comparison is case-insensitive and only the part after the last
/// dot counts, so `photo.backup.PNG` is accepted while `photo`, `photo.`
/// and `.` are not.
pub fn allowed_file(filename: &str) -> bool {
    match extension_of(filename) {
        Some(ext) => ALLOWED_EXTENSIONS.contains(&ext.as_str()),
        None => false,
    }
}

/// Lowercased extension after the last dot, if there is one.
pub fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Filesystem store for uploaded and processed images.
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: &Path) -> io::Result<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Generate a fresh request id (16 hex chars).
    pub fn new_request_id(&self) -> String {
        hex::encode(rand::random::<[u8; 8]>())
    }

    /// Absolute path of a stored file.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Read a stored file back.
    pub fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_of(name))
    }

    /// Store the original upload bytes under the request id.
    ///
    /// Returns the stored file name, e.g. `a1b2c3-original.png`.
    pub fn save_original(&self, id: &str, ext: &str, bytes: &[u8]) -> io::Result<String> {
        let name = format!("{id}-original.{ext}");
        fs::write(self.path_of(&name), bytes)?;
        Ok(name)
    }

    /// Store a processed image as PNG under the request id.
    pub fn save_processed(&self, id: &str, image: &RgbImage) -> io::Result<String> {
        let name = format!("{id}-processed.png");
        image
            .save(self.path_of(&name))
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(name)
    }

    /// Make sure the fallback image exists, synthesizing it on first run.
    ///
    /// The default is a 480x320 RGB gradient rather than a committed
    /// binary asset; it exercises all three channels so its histograms
    /// are non-trivial.
    pub fn ensure_default(&self) -> io::Result<PathBuf> {
        let path = self.path_of(DEFAULT_IMAGE);
        if path.exists() {
            return Ok(path);
        }

        let image = synthesize_default(480, 320);
        image
            .save(&path)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        tracing::info!(path = %path.display(), "Synthesized default image");
        Ok(path)
    }
}

/// Smooth three-channel gradient used as the fallback image.
fn synthesize_default(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        let b = ((x + y) * 255 / (width + height).max(1)) as u8;
        Rgb([r, g, b])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_file_accepts_listed_extensions() {
        assert!(allowed_file("test.jpg"));
        assert!(allowed_file("test.JPG"));
        assert!(allowed_file("test.png"));
        assert!(allowed_file("test.jpeg"));
        assert!(allowed_file("animation.gif"));
        assert!(allowed_file("photo.backup.PNG"));
    }

    #[test]
    fn test_allowed_file_rejects_everything_else() {
        assert!(!allowed_file("test.txt"));
        assert!(!allowed_file("report.pdf"));
        assert!(!allowed_file("noextension"));
        assert!(!allowed_file("."));
        assert!(!allowed_file("trailing."));
        assert!(!allowed_file(""));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.PNG"), Some("png".to_string()));
        assert_eq!(extension_of("a.b.gif"), Some("gif".to_string()));
        assert_eq!(extension_of("a"), None);
        assert_eq!(extension_of("a."), None);
    }

    #[test]
    fn test_request_ids_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).unwrap();
        let a = store.new_request_id();
        let b = store.new_request_id();
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn test_save_and_read_original() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).unwrap();

        let name = store.save_original("deadbeef", "png", b"bytes").unwrap();
        assert_eq!(name, "deadbeef-original.png");
        assert_eq!(store.read(&name).unwrap(), b"bytes");
    }

    #[test]
    fn test_save_processed_writes_decodable_png() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).unwrap();

        let image = RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]));
        let name = store.save_processed("deadbeef", &image).unwrap();
        assert_eq!(name, "deadbeef-processed.png");

        let bytes = store.read(&name).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (8, 8));
        assert_eq!(*decoded.get_pixel(3, 3), Rgb([10, 20, 30]));
    }

    #[test]
    fn test_ensure_default_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).unwrap();

        let path = store.ensure_default().unwrap();
        assert!(path.exists());
        let first = fs::metadata(&path).unwrap().len();

        // Second call leaves the existing file alone.
        store.ensure_default().unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), first);

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (480, 320));
    }

    #[test]
    fn test_store_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/uploads");
        let store = UploadStore::new(&nested).unwrap();
        assert!(nested.exists());
        store.save_original("id", "png", b"x").unwrap();
    }
}
