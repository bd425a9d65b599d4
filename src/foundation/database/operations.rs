use crate::foundation::database::{
    StoredSelection, HIGHLIGHTED_TEXT_KEY, PREFERRED_LANGUAGE_KEY, SELECTION_METADATA_KEY,
};
use crate::models::SongMetadata;
use sled::Db;
use std::io;

/// Opens the local key-value store at the specified path.
///
/// A thin wrapper around `sled::open` that converts the error to a standard IO error.
///
/// # Examples
///
/// ```no_run
/// use moozi::foundation::database::open_database;
/// let db = open_database("/path/to/moozi_db")?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn open_database(path: &str) -> io::Result<Db> {
    sled::open(path).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// Stores the highlighted text and the metadata of the page it came from.
///
/// Both keys are written independently; a concurrent writer may interleave and the last
/// write wins.
pub fn store_selection(db: &Db, text: &str, metadata: &SongMetadata) -> io::Result<()> {
    db.insert(HIGHLIGHTED_TEXT_KEY, text.as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    store_selection_metadata(db, metadata)
}

/// Overwrites only the selection metadata, leaving the highlighted text untouched.
pub fn store_selection_metadata(db: &Db, metadata: &SongMetadata) -> io::Result<()> {
    let serialized = bincode::serialize(metadata)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    db.insert(SELECTION_METADATA_KEY, serialized)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    Ok(())
}

/// Retrieves the stored selection.
///
/// # Returns
///
/// `None` when no text was ever highlighted (or the stored text is empty). The metadata is
/// optional because the relay buffer may only hold the text.
pub fn get_selection(db: &Db) -> io::Result<Option<StoredSelection>> {
    let text = match get_text(db, HIGHLIGHTED_TEXT_KEY)? {
        Some(text) if !text.is_empty() => text,
        _ => return Ok(None),
    };

    let metadata = db
        .get(SELECTION_METADATA_KEY)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?
        .map(|ivec| {
            bincode::deserialize::<SongMetadata>(&ivec)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
        })
        .transpose()?;

    Ok(Some(StoredSelection { text, metadata }))
}

pub fn get_preferred_language(db: &Db) -> io::Result<Option<String>> {
    Ok(get_text(db, PREFERRED_LANGUAGE_KEY)?.filter(|language| !language.is_empty()))
}

pub fn set_preferred_language(db: &Db, language: &str) -> io::Result<()> {
    db.insert(PREFERRED_LANGUAGE_KEY, language.as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    Ok(())
}

fn get_text(db: &Db, key: &str) -> io::Result<Option<String>> {
    db.get(key)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?
        .map(|ivec| {
            String::from_utf8(ivec.to_vec())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
        })
        .transpose()
}
