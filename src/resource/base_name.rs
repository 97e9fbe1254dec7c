/// A file name reduced to the key requirements are matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseName {
    pub name: String,
    pub minified: bool,
}

/// Strips the final extension from `file_name` and normalizes what is left.
///
/// `jQuery-1.5.4-min.js` becomes `jquery` (minified), `OpenLayers.js`
/// becomes `openlayers`.
pub fn parse_base_name(file_name: &str) -> BaseName {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _extension)) => stem,
        None => file_name,
    };
    normalize_base_name(stem)
}

/// Lower-cases `name`, drops a `-min`/`.min` suffix and then a single
/// trailing `-` segment, which is taken to be a version tag.
pub fn normalize_base_name(name: &str) -> BaseName {
    let mut name = name.to_lowercase();
    let minified = name.ends_with("-min") || name.ends_with(".min");
    if minified {
        name.truncate(name.len() - "-min".len());
    }
    if let Some(dash) = name.rfind('-') {
        name.truncate(dash);
    }
    BaseName { name, minified }
}
