use anyhow::Context;
use meshcore::model::document;
use meshcore::House;
use std::fs;
use std::path::{Path, PathBuf};

pub fn load_house<P: AsRef<Path>>(path: P) -> anyhow::Result<House> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading house file {}", path_ref.display()))?;
    document::from_json(&contents)
        .with_context(|| format!("parsing house file {}", path_ref.display()))
}

/// Writes the house as pretty JSON, forcing a `.json` extension.
pub fn save_house<P: AsRef<Path>>(house: &House, path: P) -> anyhow::Result<PathBuf> {
    let mut target = path.as_ref().to_path_buf();
    if target.extension().map_or(true, |ext| ext != "json") {
        let mut name = target.as_os_str().to_os_string();
        name.push(".json");
        target = PathBuf::from(name);
    }
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let json = document::to_json(house).context("serializing house")?;
    fs::write(&target, json).with_context(|| format!("writing house file {}", target.display()))?;
    Ok(target)
}

/// `"Kitchen,Lounge;Bedroom"`: floors separated by `;`, rooms by `,`.
///
/// Blank names get default names when the house is built. An empty layout is
/// one floor with two rooms.
pub fn parse_layout(layout: &str) -> Vec<Vec<String>> {
    if layout.trim().is_empty() {
        return vec![vec![String::new(), String::new()]];
    }
    layout
        .split(';')
        .map(|floor| floor.split(',').map(|room| room.trim().to_string()).collect())
        .collect()
}
