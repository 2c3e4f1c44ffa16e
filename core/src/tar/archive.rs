//! tar/archive.rs
//! Named-entry lookup and iteration over a borrowed archive buffer.

use crate::constants::tar_layout::BLOCK_SIZE;
use crate::tar::decode::parse_header;
use crate::tar::types::{Lookup, TarEntry, TarError, TarHeader};
use crate::utils::round_up;

/// Borrowed view over raw archive bytes. Parsing is lazy: nothing is
/// validated until a lookup or iteration walks past it.
#[derive(Debug, Clone, Copy)]
pub struct TarArchive<'a> {
    data: &'a [u8],
}

impl<'a> TarArchive<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Look an entry up by exact name.
    pub fn find(&self, name: &str) -> Result<Lookup<'a>, TarError> {
        let mut offset = 0usize;

        while let Some(header) = parse_header(self.data, offset)? {
            if header.name == name.as_bytes() {
                if !header.entry_type.is_regular() {
                    return Err(TarError::NotARegularFile {
                        name: name.to_owned(),
                        entry_type: header.entry_type,
                    });
                }
                let data = self.entry_data(&header, offset)?;
                log::debug!("tar: '{}' found at offset {} ({} bytes)", name, offset, data.len());
                return Ok(Lookup::Found(data));
            }
            offset = self.next_offset(&header, offset)?;
        }

        log::debug!("tar: '{}' not present", name);
        Ok(Lookup::Absent)
    }

    /// Mandatory lookup: absence is an error.
    pub fn extract(&self, name: &str) -> Result<&'a [u8], TarError> {
        match self.find(name)? {
            Lookup::Found(data) => Ok(data),
            Lookup::Absent => Err(TarError::EntryNotFound { name: name.to_owned() }),
        }
    }

    /// Optional lookup: absence is `None`, corruption is still an error.
    pub fn extract_optional(&self, name: &str) -> Result<Option<&'a [u8]>, TarError> {
        self.find(name).map(Lookup::found)
    }

    /// Iterate over every entry, in archive order.
    pub fn entries(&self) -> Entries<'a> {
        Entries { archive: *self, offset: 0, done: false }
    }

    fn entry_data(&self, header: &TarHeader<'_>, offset: usize) -> Result<&'a [u8], TarError> {
        let start = offset + BLOCK_SIZE;
        match start.checked_add(header.size) {
            Some(end) if end <= self.data.len() => Ok(&self.data[start..end]),
            _ => Err(TarError::EntryOutOfBounds {
                name: header.name_lossy(),
                offset,
                size: header.size,
                archive_len: self.data.len(),
            }),
        }
    }

    fn next_offset(&self, header: &TarHeader<'_>, offset: usize) -> Result<usize, TarError> {
        round_up(header.size, BLOCK_SIZE)
            .and_then(|padded| offset.checked_add(BLOCK_SIZE + padded))
            .ok_or_else(|| TarError::EntryOutOfBounds {
                name: header.name_lossy(),
                offset,
                size: header.size,
                archive_len: self.data.len(),
            })
    }
}

/// Iterator returned by [`TarArchive::entries`]. Stops after the first error.
pub struct Entries<'a> {
    archive: TarArchive<'a>,
    offset: usize,
    done: bool,
}

impl<'a> Entries<'a> {
    fn advance(&mut self) -> Result<Option<TarEntry<'a>>, TarError> {
        let Some(header) = parse_header(self.archive.data, self.offset)? else {
            return Ok(None);
        };
        let data = self.archive.entry_data(&header, self.offset)?;
        let entry = TarEntry { header, header_offset: self.offset, data };
        self.offset = self.archive.next_offset(&header, self.offset)?;
        Ok(Some(entry))
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Result<TarEntry<'a>, TarError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Extract `name`; a missing entry is `Lookup::Absent` when `optional`,
/// otherwise `TarError::EntryNotFound`.
pub fn extract<'a>(archive: &'a [u8], name: &str, optional: bool) -> Result<Lookup<'a>, TarError> {
    let lookup = TarArchive::new(archive).find(name)?;
    if lookup.is_absent() && !optional {
        return Err(TarError::EntryNotFound { name: name.to_owned() });
    }
    Ok(lookup)
}
