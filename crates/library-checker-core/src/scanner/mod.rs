mod walk;

pub use walk::{scan_artist_folders, validate_root, ArtistFolder};
