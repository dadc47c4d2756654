//! Likely duplicates: same case-folded name and exact size.

use std::collections::HashMap;

use docpulse_domain::{DuplicateGroup, FileRecord};

/// Groups of two or more non-folder files, most wasted bytes first. Files
/// without a size are ignored.
pub fn find_duplicates(files: &[FileRecord]) -> Vec<DuplicateGroup> {
    let mut groups: HashMap<(String, u64), DuplicateGroup> = HashMap::new();

    for file in files.iter().filter(|file| !file.is_folder()) {
        let Some(size) = file.size_bytes else { continue };
        let group = groups.entry((file.name.to_lowercase(), size)).or_insert_with(|| {
            DuplicateGroup { name: file.name.clone(), size_bytes: size, file_ids: Vec::new() }
        });
        if !group.file_ids.contains(&file.id) {
            group.file_ids.push(file.id.clone());
        }
    }

    let mut duplicates: Vec<DuplicateGroup> =
        groups.into_values().filter(|group| group.file_ids.len() > 1).collect();
    duplicates.sort_by(|a, b| {
        b.wasted_bytes().cmp(&a.wasted_bytes()).then_with(|| a.name.cmp(&b.name))
    });
    duplicates
}
